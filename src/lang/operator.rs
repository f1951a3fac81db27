/// An operator token as delivered by the external scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operator {
    pub kind: OperatorKind,

    /// Source line the token was scanned on.
    pub line: u32,
}

impl Operator {
    pub fn new(kind: OperatorKind, line: u32) -> Self {
        Self { kind, line }
    }
}

/// The operator kinds the scanner can produce.
///
/// This is the full lexical set. Kinds without an opcode mapping
/// (`Percent`, `And`, `Or`) still appear in parsed expressions and are
/// rejected by the translator when they reach code generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    // ──────────────────────────── Arithmetic ────────────────────────────
    Plus,
    Minus,
    Star,
    Slash,
    Percent,

    // ──────────────────────────── Assignment ────────────────────────────
    Equal,

    // ───────────────────── Equality and ordering ────────────────────────
    EqualEqual,
    BangEqual,
    Lower,
    LowerEqual,
    Higher,
    HigherEqual,

    // ────────────────────────────── Prefix ──────────────────────────────
    Bang,

    // ───────────────────────────── Logical ──────────────────────────────
    And,
    Or,
}

impl OperatorKind {
    /// The source lexeme for this operator.
    pub fn lexeme(self) -> &'static str {
        match self {
            OperatorKind::Plus => "+",
            OperatorKind::Minus => "-",
            OperatorKind::Star => "*",
            OperatorKind::Slash => "/",
            OperatorKind::Percent => "%",
            OperatorKind::Equal => "=",
            OperatorKind::EqualEqual => "==",
            OperatorKind::BangEqual => "!=",
            OperatorKind::Lower => "<",
            OperatorKind::LowerEqual => "<=",
            OperatorKind::Higher => ">",
            OperatorKind::HigherEqual => ">=",
            OperatorKind::Bang => "!",
            OperatorKind::And => "and",
            OperatorKind::Or => "or",
        }
    }
}

impl std::fmt::Display for OperatorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.lexeme())
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)
    }
}
