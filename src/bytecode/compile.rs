use tracing::debug;

use crate::bytecode::compile_error::CompileError;
use crate::bytecode::ir::{Program, Segment};
use crate::bytecode::op::OpCode;
use crate::lang::node::{Expression, ExpressionKind, Statement, StatementKind};
use crate::lang::operator::{Operator, OperatorKind};
use crate::lang::value::{TypeDescriptor, Value};

/// Which program segment the emission cursor currently targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SegmentKind {
    TopLevel,
    Functions,
    /// Placeholder sibling: no compilation path selects it yet.
    #[allow(dead_code)]
    Classes,
}

/// Single-pass AST-to-bytecode compiler.
///
/// One value drives exactly one pass: [`compile`](Compiler::compile)
/// consumes it and returns either a finished [`Program`] or every error the
/// pass collected. The emission cursor (current segment, current source
/// line) lives here rather than in any shared state, so concurrent passes
/// simply use separate compilers.
pub struct Compiler {
    /// Output under construction.
    program: Program,

    /// Segment the cursor currently emits into. Saved and restored around
    /// function-literal compilation.
    segment: SegmentKind,

    /// Source line attributed to the next emitted opcode.
    line: u32,
}

impl Compiler {
    pub fn new() -> Self {
        Self {
            program: Program::new(),
            segment: SegmentKind::TopLevel,
            line: 0,
        }
    }

    /// Compile a parsed program.
    ///
    /// Errors are collected per top-level statement: a failing statement
    /// does not stop the ones after it, so one pass reports as much as it
    /// can. On success the top-level segment is terminated with `EXIT`; on
    /// failure the partial program is discarded wholesale.
    pub fn compile(mut self, statements: &[Statement]) -> Result<Program, Vec<CompileError>> {
        debug!(statements = statements.len(), "starting compile pass");

        let mut errors = Vec::new();
        for statement in statements {
            if let Err(e) = self.compile_statement(statement) {
                debug!(line = e.line(), error = %e, "statement failed to compile");
                errors.push(e);
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        self.emit(OpCode::Exit);
        debug!(
            top_level = self.program.top_level.code.len(),
            functions = self.program.functions.code.len(),
            "compile pass finished"
        );
        Ok(self.program)
    }

    // =========================================================================
    // Emission cursor
    // =========================================================================

    fn current(&mut self) -> &mut Segment {
        match self.segment {
            SegmentKind::TopLevel => &mut self.program.top_level,
            SegmentKind::Functions => &mut self.program.functions,
            SegmentKind::Classes => &mut self.program.classes,
        }
    }

    /// Append an opcode to the current segment, tagged with the cursor line.
    fn emit(&mut self, op: OpCode) {
        let line = self.line;
        self.current().emit_opcode(op, line);
    }

    /// Pool a constant and append its index as an operand cell.
    fn emit_operand(&mut self, value: Value) -> usize {
        self.current().emit_operand(value)
    }

    /// Emit a jump opcode with a zero placeholder distance.
    ///
    /// Returns the placeholder's pool index for the later patch.
    fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit(op);
        self.emit_operand(Value::Integer(0))
    }

    /// Overwrite a recorded placeholder with the resolved distance.
    fn patch_jump(&mut self, index: usize, distance: i64) -> Result<(), CompileError> {
        let line = self.line;
        self.current()
            .overwrite_constant(index, Value::Integer(distance))
            .ok_or_else(|| CompileError::unresolved_jump(line, index))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        self.line = statement.line;

        match &statement.kind {
            StatementKind::Print(expression) => {
                self.compile_expression(expression)?;
                self.emit(OpCode::Print);
            }

            // An expression in statement position leaves one value behind;
            // discard it.
            StatementKind::Expression(expression) => {
                self.compile_expression(expression)?;
                self.emit(OpCode::Pop);
            }

            StatementKind::Declaration {
                name,
                declared_type,
                initializer,
            } => {
                self.emit(OpCode::Declare);
                self.emit_operand(Value::String(name.clone()));
                self.emit_operand(Value::Type(declared_type.clone()));

                if let Some(initializer) = initializer {
                    self.compile_expression(initializer)?;
                    self.emit(OpCode::Store);
                    self.emit_operand(Value::String(name.clone()));
                    self.emit(OpCode::Pop);
                }
            }

            StatementKind::Return(expression) => {
                self.compile_expression(expression)?;
                self.emit(OpCode::Return);
            }

            StatementKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                self.compile_if(condition, then_branch, else_branch)?;
            }

            StatementKind::While { condition, body } => {
                self.compile_while(condition, body)?;
            }
        }

        Ok(())
    }

    /// Emit a conditional.
    ///
    /// Without an else branch:
    /// ```text
    ///   <condition>
    ///   BRANCH_FALSE p        ; p patched to the then-branch cell count
    ///   <then statements>
    /// ```
    /// With an else branch the then code ends in an escape jump and the
    /// branch distance covers it too:
    /// ```text
    ///   <condition>
    ///   BRANCH_FALSE p        ; p = else_start - then_start
    ///   <then statements>
    ///   JUMP_RELATIVE q       ; q = end - q's own operand cell
    ///   <else statements>
    /// ```
    fn compile_if(
        &mut self,
        condition: &Expression,
        then_branch: &[Statement],
        else_branch: &[Statement],
    ) -> Result<(), CompileError> {
        self.compile_expression(condition)?;

        let branch = self.emit_jump(OpCode::BranchFalse);
        let then_start = self.current().current_offset();

        for statement in then_branch {
            self.compile_statement(statement)?;
        }

        if else_branch.is_empty() {
            let distance = self.current().current_offset() - then_start;
            return self.patch_jump(branch, distance as i64);
        }

        self.emit(OpCode::JumpRelative);
        let escape_cell = self.current().current_offset();
        let escape = self.emit_operand(Value::Integer(0));

        let else_start = self.current().current_offset();
        self.patch_jump(branch, (else_start - then_start) as i64)?;

        for statement in else_branch {
            self.compile_statement(statement)?;
        }

        let distance = self.current().current_offset() as i64 - escape_cell as i64;
        self.patch_jump(escape, distance)
    }

    /// Emit a loop.
    ///
    /// ```text
    ///   loop_start:
    ///   <condition>
    ///   BRANCH_FALSE p        ; p = (end - body_start) + 1, past the back-jump
    ///   <body statements>
    ///   JUMP_RELATIVE q       ; q = -(q's own operand cell - loop_start)
    /// ```
    ///
    /// The back-jump distance is computed after the opcode cell is appended
    /// and before its operand cell, so it is measured from the operand cell
    /// itself; the `+1` in the branch distance makes a false condition clear
    /// the body and the back-jump in one skip.
    fn compile_while(
        &mut self,
        condition: &Expression,
        body: &[Statement],
    ) -> Result<(), CompileError> {
        let loop_start = self.current().current_offset();

        self.compile_expression(condition)?;

        let branch = self.emit_jump(OpCode::BranchFalse);
        let body_start = self.current().current_offset();

        for statement in body {
            self.compile_statement(statement)?;
        }

        self.emit(OpCode::JumpRelative);
        let back = self.current().current_offset() as i64 - loop_start as i64;
        self.emit_operand(Value::Integer(-back));

        let distance = self.current().current_offset() - body_start + 1;
        self.patch_jump(branch, distance as i64)
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn compile_expression(&mut self, expression: &Expression) -> Result<(), CompileError> {
        self.line = expression.line;

        match &expression.kind {
            ExpressionKind::Integer(n) => {
                self.emit(OpCode::Push);
                self.emit_operand(Value::Integer(*n));
            }

            ExpressionKind::Float(n) => {
                self.emit(OpCode::Push);
                self.emit_operand(Value::Float(*n));
            }

            ExpressionKind::String(s) => {
                self.emit(OpCode::Push);
                self.emit_operand(Value::String(s.clone()));
            }

            ExpressionKind::Boolean(b) => {
                self.emit(OpCode::Push);
                self.emit_operand(Value::Bool(*b));
            }

            ExpressionKind::None => {
                self.emit(OpCode::Push);
                self.emit_operand(Value::None);
            }

            // Elements are pushed last-to-first so the runtime pops them
            // back in source order.
            ExpressionKind::List(elements) => {
                for element in elements.iter().rev() {
                    self.compile_expression(element)?;
                }
                self.emit(OpCode::List);
                self.emit_operand(Value::Integer(elements.len() as i64));
            }

            // Same reversal as lists, one key push and one value expression
            // per entry.
            ExpressionKind::Dictionary(entries) => {
                for (key, value) in entries.iter().rev() {
                    self.emit(OpCode::Push);
                    self.emit_operand(Value::String(key.clone()));
                    self.compile_expression(value)?;
                }
                self.emit(OpCode::Dictionary);
                self.emit_operand(Value::Integer(entries.len() as i64));
            }

            ExpressionKind::Group(inner) => {
                self.compile_expression(inner)?;
            }

            ExpressionKind::Unary { op, operand } => {
                self.compile_expression(operand)?;
                let opcode = translate_operator(op, true)?;
                self.line = op.line;
                self.emit(opcode);
            }

            // Logical operators share the binary shape: both operands are
            // always evaluated, and the translator decides whether the
            // operator itself is placeable.
            ExpressionKind::Binary { left, op, right }
            | ExpressionKind::Logical { left, op, right } => {
                self.compile_expression(left)?;
                self.compile_expression(right)?;
                let opcode = translate_operator(op, false)?;
                self.line = op.line;
                self.emit(opcode);
            }

            ExpressionKind::Variable(name) => {
                self.emit(OpCode::Load);
                self.emit_operand(Value::String(name.clone()));
            }

            ExpressionKind::Assign { name, value } => {
                self.compile_expression(value)?;
                self.emit(OpCode::Store);
                self.emit_operand(Value::String(name.clone()));
            }

            ExpressionKind::AssignIndexed { name, index, value } => {
                self.compile_expression(value)?;
                self.compile_expression(index)?;
                self.emit(OpCode::StoreIndexed);
                self.emit_operand(Value::String(name.clone()));
            }

            ExpressionKind::Access { name, index } => {
                self.compile_expression(index)?;
                self.emit(OpCode::Access);
                self.emit_operand(Value::String(name.clone()));
            }

            ExpressionKind::Function {
                parameters,
                return_type,
                body,
            } => {
                self.compile_function(parameters, return_type, body)?;
            }

            ExpressionKind::Call { callee, arguments } => {
                for argument in arguments {
                    self.compile_expression(argument)?;
                }
                self.emit(OpCode::Call);
                self.emit_operand(Value::String(callee.clone()));
                self.emit_operand(Value::Integer(arguments.len() as i64));
            }
        }

        Ok(())
    }

    /// Compile a function literal into the functions segment and leave a
    /// function value in the segment that was active on entry.
    ///
    /// The cursor (segment selector and source line) is restored before
    /// returning, on the error path too, so a failed body cannot leave the
    /// caller emitting into the wrong segment.
    fn compile_function(
        &mut self,
        parameters: &[Statement],
        return_type: &TypeDescriptor,
        body: &[Statement],
    ) -> Result<(), CompileError> {
        let saved_segment = self.segment;
        let saved_line = self.line;

        self.segment = SegmentKind::Functions;
        let entry = self.current().current_offset();

        let body_result = self.compile_function_body(parameters, body);

        self.segment = saved_segment;
        self.line = saved_line;
        body_result?;

        self.emit(OpCode::Function);
        self.emit_operand(Value::Integer(entry as i64));
        self.emit_operand(Value::Type(return_type.clone()));
        Ok(())
    }

    fn compile_function_body(
        &mut self,
        parameters: &[Statement],
        body: &[Statement],
    ) -> Result<(), CompileError> {
        for parameter in parameters {
            match &parameter.kind {
                StatementKind::Declaration { .. } => self.compile_statement(parameter)?,
                _ => {
                    return Err(CompileError::malformed(
                        parameter.line,
                        "function parameter is not a declaration",
                    ));
                }
            }
        }

        // Arguments arrive on the stack in call order; binding in reverse
        // declared order unwinds them LIFO.
        for parameter in parameters.iter().rev() {
            if let StatementKind::Declaration { name, .. } = &parameter.kind {
                self.line = parameter.line;
                self.emit(OpCode::BindParameter);
                self.emit_operand(Value::String(name.clone()));
            }
        }

        for statement in body {
            self.compile_statement(statement)?;
        }

        // Default epilogue: every control path ends in a return, whether or
        // not the body wrote one.
        self.emit(OpCode::Push);
        self.emit_operand(Value::None);
        self.emit(OpCode::Return);
        Ok(())
    }
}

// =============================================================================
// Operator translation
// =============================================================================

/// Map an operator token to its opcode.
///
/// `unary` disambiguates negation from subtraction; it is the only
/// ambiguous case, everything else maps one-to-one. Kinds outside the
/// table (`%`, `and`, `or`) are reported, not panicked on, so the driver
/// can keep collecting.
fn translate_operator(op: &Operator, unary: bool) -> Result<OpCode, CompileError> {
    match op.kind {
        OperatorKind::Plus => Ok(OpCode::Add),
        OperatorKind::Minus if unary => Ok(OpCode::Neg),
        OperatorKind::Minus => Ok(OpCode::Sub),
        OperatorKind::Star => Ok(OpCode::Mul),
        OperatorKind::Slash => Ok(OpCode::Div),
        OperatorKind::Bang => Ok(OpCode::Not),
        OperatorKind::Equal => Ok(OpCode::Store),
        OperatorKind::EqualEqual => Ok(OpCode::Eq),
        OperatorKind::BangEqual => Ok(OpCode::Ne),
        OperatorKind::Lower => Ok(OpCode::Lt),
        OperatorKind::LowerEqual => Ok(OpCode::Le),
        OperatorKind::Higher => Ok(OpCode::Gt),
        OperatorKind::HigherEqual => Ok(OpCode::Ge),
        OperatorKind::Percent | OperatorKind::And | OperatorKind::Or => {
            Err(CompileError::unsupported_operator(op))
        }
    }
}
