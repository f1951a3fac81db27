use serde::{Deserialize, Serialize};

use crate::bytecode::op::OpCode;
use crate::lang::value::Value;

/// One slot in a segment's instruction stream.
///
/// A cell is either an instruction tag or a constant-pool index standing in
/// for an operand. The stream is decodable only together with
/// [`OpCode::arity`]: an `Op` cell is followed by exactly `arity()`
/// `Operand` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cell {
    /// An instruction tag.
    Op(OpCode),

    /// A constant-pool index used as an operand.
    Operand(usize),
}

/// An independently addressed code region: instruction cells, their
/// constant pool, and a per-opcode debug line table.
///
/// All three vectors are append-only during a compile pass. A pool index,
/// once handed out, stays valid for the segment's lifetime; jump patching
/// overwrites the pooled value in place and never reindexes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Pooled constants. Indices double as operand cells in `code`.
    pub constants: Vec<Value>,

    /// Instruction stream. Jump distances and function entry points are
    /// cell offsets into this vector, never into another segment.
    pub code: Vec<Cell>,

    /// One source line per opcode, not per cell, so this table is shorter
    /// than `code` whenever operands exist. Diagnostics only; never used
    /// for addressing.
    pub lines: Vec<u32>,
}

impl Segment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an opcode cell and its debug line entry.
    pub fn emit_opcode(&mut self, op: OpCode, line: u32) {
        self.code.push(Cell::Op(op));
        self.lines.push(line);
    }

    /// Pool `value` and append its index as an operand cell.
    ///
    /// Returns the pool index so a jump placeholder can be patched once its
    /// distance is known.
    pub fn emit_operand(&mut self, value: Value) -> usize {
        let index = self.constants.len();
        self.constants.push(value);
        self.code.push(Cell::Operand(index));
        index
    }

    /// Overwrite the pooled value at `index` in place.
    ///
    /// Returns `None` if `index` was never handed out; the caller decides
    /// how to report that.
    pub fn overwrite_constant(&mut self, index: usize, value: Value) -> Option<()> {
        let slot = self.constants.get_mut(index)?;
        *slot = value;
        Some(())
    }

    /// Current end of the instruction stream, in cells. The addressing unit
    /// for all jump arithmetic.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Number of opcode cells (operand cells excluded). Always equal to
    /// `lines.len()` for streams built through `emit_opcode`.
    pub fn opcode_count(&self) -> usize {
        self.code
            .iter()
            .filter(|cell| matches!(cell, Cell::Op(_)))
            .count()
    }
}

/// A compiled program: three independently addressed segments.
///
/// Cross-segment addresses do not occur. A function value is an entry
/// offset into `functions`, pooled in whichever segment the literal was
/// written in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Top-level code; terminated by `EXIT` on a successful compile.
    pub top_level: Segment,

    /// Code for every compiled function literal, addressed by entry offset.
    pub functions: Segment,

    /// Placeholder sibling for class bodies; no compilation path targets
    /// it yet.
    pub classes: Segment,
}

impl Program {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode for hand-off to the virtual machine.
    pub fn to_bytes(&self) -> postcard::Result<Vec<u8>> {
        postcard::to_allocvec(self)
    }

    /// Decode a program produced by [`to_bytes`](Program::to_bytes).
    pub fn from_bytes(bytes: &[u8]) -> postcard::Result<Self> {
        postcard::from_bytes(bytes)
    }
}
