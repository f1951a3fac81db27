use thiserror::Error;

use crate::lang::operator::Operator;

/// A classified failure raised while emitting bytecode.
///
/// The emitter only classifies and returns; whether a pass aborts or keeps
/// collecting is the driver's decision. Every variant carries the source
/// line it is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The parser handed over a node the emitter cannot place. This is a
    /// contract violation between parser and compiler, not a user-facing
    /// language error.
    #[error("line {line}: malformed node: {detail}")]
    MalformedNode { line: u32, detail: String },

    /// An operator with no opcode mapping reached code generation.
    #[error("line {line}: unsupported operator '{lexeme}'")]
    UnsupportedOperator { line: u32, lexeme: String },

    /// A patch was attempted against a constant index that was never handed
    /// out. Internal invariant failure; checked rather than assumed.
    #[error("line {line}: unresolved jump target (constant index {index})")]
    UnresolvedJumpTarget { line: u32, index: usize },
}

impl CompileError {
    /// Create an error for a node that violates the parser contract.
    pub fn malformed(line: u32, detail: impl Into<String>) -> Self {
        CompileError::MalformedNode {
            line,
            detail: detail.into(),
        }
    }

    /// Create an error for an operator outside the mapping table.
    pub fn unsupported_operator(op: &Operator) -> Self {
        CompileError::UnsupportedOperator {
            line: op.line,
            lexeme: op.kind.lexeme().to_string(),
        }
    }

    /// Create an error for a patch against an unknown constant index.
    pub fn unresolved_jump(line: u32, index: usize) -> Self {
        CompileError::UnresolvedJumpTarget { line, index }
    }

    /// Source line the error is attributed to.
    pub fn line(&self) -> u32 {
        match self {
            CompileError::MalformedNode { line, .. }
            | CompileError::UnsupportedOperator { line, .. }
            | CompileError::UnresolvedJumpTarget { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::operator::OperatorKind;

    #[test]
    fn test_malformed_node_display() {
        let err = CompileError::malformed(4, "function parameter is not a declaration");

        let msg = err.to_string();
        assert!(msg.contains("line 4"));
        assert!(msg.contains("malformed node"));
        assert!(msg.contains("not a declaration"));
    }

    #[test]
    fn test_unsupported_operator_display_uses_lexeme() {
        let op = Operator::new(OperatorKind::And, 12);
        let err = CompileError::unsupported_operator(&op);

        let msg = err.to_string();
        assert!(msg.contains("line 12"));
        assert!(msg.contains("'and'"));
    }

    #[test]
    fn test_unresolved_jump_display() {
        let err = CompileError::unresolved_jump(9, 3);

        let msg = err.to_string();
        assert!(msg.contains("line 9"));
        assert!(msg.contains("index 3"));
    }

    #[test]
    fn test_line_accessor() {
        let op = Operator::new(OperatorKind::Percent, 8);

        assert_eq!(CompileError::malformed(3, "x").line(), 3);
        assert_eq!(CompileError::unsupported_operator(&op).line(), 8);
        assert_eq!(CompileError::unresolved_jump(11, 0).line(), 11);
    }

    #[test]
    fn test_error_implements_std_error() {
        let err = CompileError::malformed(1, "test");
        let _: &dyn std::error::Error = &err;
    }
}
