use thiserror::Error;

use crate::bytecode::ir::{Cell, Segment};
use crate::bytecode::op::OpCode;
use crate::lang::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StackEffectError {
    #[error("stack underflow at offset {offset}: {opcode:?} needs {pops} values, found {have}")]
    Underflow {
        offset: usize,
        opcode: OpCode,
        pops: i64,
        have: i64,
    },

    #[error("malformed stream at offset {offset}: expected an operand cell")]
    MalformedStream { offset: usize },

    #[error("offset {offset}: {opcode:?} count operand is not a usable integer")]
    BadCount { offset: usize, opcode: OpCode },
}

/// Walk a cell range and return the net number of values it leaves on the
/// stack, starting from an empty stack.
///
/// NOTE: this is a straight-line scan that does not follow jump targets.
/// It validates instruction framing and catches underflow in sequential
/// code, which is what emitter tests need; it is not a control-flow
/// analysis.
pub fn net_effect(segment: &Segment, start: usize, end: usize) -> Result<i64, StackEffectError> {
    net_effect_with_initial(segment, start, end, 0)
}

/// Same walk with a given initial stack height.
///
/// Function bodies start with their arguments already on the stack, so a
/// walk over one needs `initial` set to the parameter count for the
/// `BIND_PARAMETER` prologue to clear.
pub fn net_effect_with_initial(
    segment: &Segment,
    start: usize,
    end: usize,
    initial: i64,
) -> Result<i64, StackEffectError> {
    let mut height = initial;
    let mut offset = start;

    while offset < end {
        let opcode = match segment.code.get(offset) {
            Some(Cell::Op(opcode)) => *opcode,
            _ => return Err(StackEffectError::MalformedStream { offset }),
        };

        for slot in 1..=opcode.arity() {
            match segment.code.get(offset + slot) {
                Some(Cell::Operand(_)) => {}
                _ => {
                    return Err(StackEffectError::MalformedStream {
                        offset: offset + slot,
                    });
                }
            }
        }

        let (pops, pushes) = effect(segment, offset, opcode)?;
        if height < pops {
            return Err(StackEffectError::Underflow {
                offset,
                opcode,
                pops,
                have: height,
            });
        }
        height = height - pops + pushes;

        offset += 1 + opcode.arity();
    }

    Ok(height - initial)
}

/// Returns (pops, pushes) for one instruction.
///
/// Container and call instructions take their pop count from the pool, so
/// the segment and the instruction's offset come along.
fn effect(
    segment: &Segment,
    offset: usize,
    opcode: OpCode,
) -> Result<(i64, i64), StackEffectError> {
    use OpCode::*;

    Ok(match opcode {
        Push | Load | Function => (0, 1),

        Pop | Print | Return | BranchFalse | BindParameter => (1, 0),

        Declare | JumpRelative | Exit => (0, 0),

        Store | Neg | Not | Access => (1, 1),
        StoreIndexed => (2, 1),

        Add | Sub | Mul | Div => (2, 1),
        Eq | Ne | Lt | Le | Gt | Ge => (2, 1),

        List => (count_operand(segment, offset, opcode, 1)?, 1),
        Dictionary => (2 * count_operand(segment, offset, opcode, 1)?, 1),
        Call => (count_operand(segment, offset, opcode, 2)?, 1),
    })
}

/// Resolve the `slot`-th operand (1-based) of the instruction at `offset`
/// to a non-negative element count.
fn count_operand(
    segment: &Segment,
    offset: usize,
    opcode: OpCode,
    slot: usize,
) -> Result<i64, StackEffectError> {
    let index = match segment.code.get(offset + slot) {
        Some(Cell::Operand(index)) => *index,
        _ => {
            return Err(StackEffectError::MalformedStream {
                offset: offset + slot,
            });
        }
    };

    match segment.constants.get(index) {
        Some(Value::Integer(count)) if *count >= 0 => Ok(*count),
        _ => Err(StackEffectError::BadCount { offset, opcode }),
    }
}
