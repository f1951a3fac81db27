use super::operator::Operator;
use super::value::TypeDescriptor;

/// A statement node as produced by the external parser.
///
/// Statements compile to stack-neutral code: whatever their inner
/// expressions push is consumed or discarded before the next statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub kind: StatementKind,

    /// Source line the statement starts on.
    pub line: u32,
}

impl Statement {
    pub fn new(kind: StatementKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// An expression node as produced by the external parser.
///
/// Every expression compiles to a sub-sequence with a net stack effect of
/// exactly +1.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExpressionKind,

    /// Source line the expression starts on.
    pub line: u32,
}

impl Expression {
    pub fn new(kind: ExpressionKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// The statement forms the compiler can place.
#[derive(Debug, Clone, PartialEq)]
pub enum StatementKind {
    /// Print the result of an expression.
    Print(Expression),

    /// Evaluate an expression for its effect and discard the result.
    Expression(Expression),

    /// Declare a variable with a type and an optional initializer.
    Declaration {
        name: String,
        declared_type: TypeDescriptor,
        initializer: Option<Expression>,
    },

    /// Return a value from the enclosing function.
    Return(Expression),

    /// Conditional execution. `else_branch` may be empty.
    If {
        condition: Expression,
        then_branch: Vec<Statement>,
        else_branch: Vec<Statement>,
    },

    /// Re-evaluate `condition` before every iteration of `body`.
    While {
        condition: Expression,
        body: Vec<Statement>,
    },
}

/// The expression forms the compiler can place.
#[derive(Debug, Clone, PartialEq)]
pub enum ExpressionKind {
    // ───────────────────────────── Literals ─────────────────────────────
    Integer(i64),
    Float(f64),
    String(String),
    Boolean(bool),

    /// The `none` literal.
    None,

    // ──────────────────────────── Containers ────────────────────────────
    /// List literal, elements in source order.
    List(Vec<Expression>),

    /// Dictionary literal, entries in declared key order.
    ///
    /// Order matters: the emitter iterates the entries in reverse so the
    /// runtime rebuilds them in declared order.
    Dictionary(Vec<(String, Expression)>),

    /// Parenthesized expression; compiles to its inner expression alone.
    Group(Box<Expression>),

    // ──────────────────────────── Operators ─────────────────────────────
    /// Prefix operator application: `-x`, `!x`.
    Unary {
        op: Operator,
        operand: Box<Expression>,
    },

    /// Infix operator application, including assignment-as-operator.
    Binary {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    /// `and` / `or`. Shares the binary emission shape; both operands are
    /// always evaluated, there is no short-circuit at this layer.
    Logical {
        left: Box<Expression>,
        op: Operator,
        right: Box<Expression>,
    },

    // ──────────────────────────── Variables ─────────────────────────────
    /// Load a named variable.
    Variable(String),

    /// Assign to a named variable; the assigned value stays on the stack.
    Assign {
        name: String,
        value: Box<Expression>,
    },

    /// Assign to an element of a named container: `xs[i] = v`.
    AssignIndexed {
        name: String,
        index: Box<Expression>,
        value: Box<Expression>,
    },

    /// Load an element of a named container: `xs[i]`.
    Access {
        name: String,
        index: Box<Expression>,
    },

    // ──────────────────────────── Functions ─────────────────────────────
    /// Function literal. Its code is compiled into the functions segment;
    /// the expression itself leaves a function value behind.
    Function {
        /// Parameter list. Each entry must be a declaration-shaped
        /// statement; anything else is a parser contract violation.
        parameters: Vec<Statement>,
        return_type: TypeDescriptor,
        body: Vec<Statement>,
    },

    /// Call a named function with arguments in source order.
    Call {
        callee: String,
        arguments: Vec<Expression>,
    },
}
