use serde::{Deserialize, Serialize};

// =============================================================================
// OPCODE - Bytecode instruction tags
// =============================================================================

/// One bytecode instruction tag.
///
/// Opcodes never carry operands inline: an opcode cell is followed by
/// exactly [`arity`](OpCode::arity) operand cells, each holding a
/// constant-pool index. Keeping operands in the pool is what lets jump
/// patching overwrite a distance after the guarded region is emitted,
/// without rewriting the instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpCode {
    // constants & stack
    /// Push one pooled constant. `( -- x )`
    Push,
    /// Discard the top of the stack. `( x -- )`
    Pop,

    // variables
    /// Declare a variable. Operands: name, declared type.
    Declare,
    /// Store the top of the stack into a named slot, keeping it.
    /// `( x -- x )`
    Store,
    /// Store into an element of a named container. Operand: base name;
    /// the value is compiled first, then the index. `( v i -- v )`
    StoreIndexed,
    /// Load a named slot. `( -- x )`
    Load,
    /// Load an element of a named container. Operand: base name; the index
    /// comes from the stack. `( i -- x )`
    Access,

    // containers
    /// Build a list from the top `count` values; the emitter pushes
    /// elements in reverse so they pop back in source order.
    /// `( xn .. x1 -- list )`
    List,
    /// Build a dictionary from the top `count` key/value pairs.
    /// `( kn vn .. k1 v1 -- dict )`
    Dictionary,

    // arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Neg,

    // comparison & logic
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Not,

    // ==========================================================================
    // Control flow - distances in cells, pooled as integer operands
    // ==========================================================================
    /// Pop a condition; if false, skip forward by the pooled distance.
    BranchFalse,
    /// Unconditional relative jump; the pooled distance may be negative
    /// (loop back-edges).
    JumpRelative,

    // functions
    /// Push a function value. Operands: entry offset into the functions
    /// segment, declared return type. `( -- f )`
    Function,
    /// Call a named function. Operands: callee name, argument count.
    /// `( a1 .. an -- r )`
    Call,
    /// Pop one call-time argument into a named parameter slot; emitted in
    /// reverse parameter order because arguments arrive in call order.
    /// `( x -- )`
    BindParameter,
    /// Return from the current function. `( x -- )`
    Return,

    // I/O & termination
    /// Print the top of the stack. `( x -- )`
    Print,
    /// Stop the program. Terminates the top-level segment.
    Exit,
}

impl OpCode {
    /// Number of operand cells following this opcode in the stream.
    ///
    /// The stream is self-describing only together with this table: a
    /// consumer walks opcode cells by skipping `arity()` cells after each.
    pub fn arity(self) -> usize {
        match self {
            OpCode::Declare | OpCode::Function | OpCode::Call => 2,

            OpCode::Push
            | OpCode::Store
            | OpCode::StoreIndexed
            | OpCode::Load
            | OpCode::Access
            | OpCode::List
            | OpCode::Dictionary
            | OpCode::BranchFalse
            | OpCode::JumpRelative
            | OpCode::BindParameter => 1,

            OpCode::Pop
            | OpCode::Add
            | OpCode::Sub
            | OpCode::Mul
            | OpCode::Div
            | OpCode::Neg
            | OpCode::Eq
            | OpCode::Ne
            | OpCode::Lt
            | OpCode::Le
            | OpCode::Gt
            | OpCode::Ge
            | OpCode::Not
            | OpCode::Return
            | OpCode::Print
            | OpCode::Exit => 0,
        }
    }
}
