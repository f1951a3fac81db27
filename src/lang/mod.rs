//! # Cinder Abstract Syntax Tree
//!
//! This module defines the AST for the Cinder language. The AST is produced
//! by the external parser and consumed by the bytecode compiler; nothing in
//! this crate constructs it from source text.
//!
//! ## Documentation conventions
//!
//! - Stack effects are written as `( before -- after )`.
//! - `[ ... ]` denotes a Cinder list literal, `{ "k": v }` a dictionary.
//! - Offsets and distances are counted in cells (see `bytecode::ir`).

pub mod node;
pub mod operator;
pub mod value;
