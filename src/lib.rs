//! # Cinder
//!
//! Bytecode back end for the Cinder language: an AST to stack-machine
//! compiler plus the instruction set, the program container, a
//! disassembler, and a straight-line stack-effect checker.
//!
//! A parsed program compiles in one pass. [`bytecode::Compiler`] walks the
//! statement list and emits into a three-segment [`bytecode::Program`];
//! jump distances are patched through the constant pool as each construct
//! closes, so the pass never revisits emitted cells.

pub mod bytecode;
pub mod lang;

pub use bytecode::{Cell, CompileError, Compiler, OpCode, Program, Segment};
pub use lang::value::Value;
