pub mod compile;
pub mod compile_error;
pub mod disasm;
pub mod ir;
pub mod op;
pub mod stack_effect;

pub use compile::Compiler;
pub use compile_error::CompileError;
pub use ir::{Cell, Program, Segment};
pub use op::OpCode;
