use crate::bytecode::ir::{Cell, Program, Segment};
use crate::bytecode::op::OpCode;
use crate::lang::value::Value;

/// Print disassembly of a whole program.
pub fn print_program(program: &Program) {
    println!("=== BYTECODE PROGRAM ===\n");
    print!("{}", disassemble_program(program));
}

/// Return disassembly of a whole program as a String.
///
/// The top-level segment always prints; the functions and classes segments
/// print only when they hold code.
pub fn disassemble_program(program: &Program) -> String {
    let mut out = String::new();

    segment_block(&mut out, "top level", &program.top_level);
    if !program.functions.code.is_empty() {
        segment_block(&mut out, "functions", &program.functions);
    }
    if !program.classes.code.is_empty() {
        segment_block(&mut out, "classes", &program.classes);
    }

    out
}

fn segment_block(out: &mut String, name: &str, segment: &Segment) {
    out.push_str("════════════════════════════════════════\n");
    out.push_str(&format!(" {}\n", name));
    out.push_str(&format!(" {} instructions\n", segment.opcode_count()));
    out.push_str("════════════════════════════════════════\n");
    out.push_str(&disassemble_segment(segment));
    out.push('\n');
}

/// Return disassembly of one segment as a String.
///
/// One row per instruction: cell offset, jump-target marker, source line,
/// mnemonic, then each operand as `[pool index]=value`. Jump instructions
/// get their resolved target appended.
pub fn disassemble_segment(segment: &Segment) -> String {
    let targets = collect_jump_targets(segment);
    let mut out = String::new();

    let mut offset = 0;
    let mut ordinal = 0;
    while offset < segment.code.len() {
        let opcode = match segment.code[offset] {
            Cell::Op(opcode) => opcode,
            // A decoder resync point, not a real instruction. Compiled
            // output never contains one; hand-assembled segments might.
            Cell::Operand(index) => {
                out.push_str(&format!(
                    "{:04}        stray operand [{}]\n",
                    offset, index
                ));
                offset += 1;
                continue;
            }
        };

        if targets.contains(&offset) {
            out.push_str("      ┌──────────────────────────────────\n");
        }

        let marker = if targets.contains(&offset) { "► " } else { "  " };
        let line = segment.lines.get(ordinal).copied().unwrap_or(0);
        out.push_str(&format!(
            "{:04} {}{:>4}  {}\n",
            offset,
            marker,
            line,
            render_instruction(segment, offset, opcode)
        ));

        ordinal += 1;
        offset += 1 + opcode.arity();
    }

    out
}

fn render_instruction(segment: &Segment, offset: usize, opcode: OpCode) -> String {
    let mut text = format!("{:<15}", op_name(opcode));

    for slot in 1..=opcode.arity() {
        match segment.code.get(offset + slot) {
            Some(Cell::Operand(index)) => {
                text.push_str(&format!("[{}]={} ", index, format_operand(segment, *index)));
            }
            _ => text.push_str("<missing operand> "),
        }
    }

    if let Some((target, distance)) = jump_target(segment, offset, opcode) {
        let direction = if distance < 0 { "↑" } else { "↓" };
        text.push_str(&format!("(→ {:04} {})", target, direction));
    }

    text.trim_end().to_string()
}

/// Resolve a jump instruction's landing offset.
///
/// `BRANCH_FALSE` distances are resolved from the cell after the operand,
/// which is exact for conditional patches. Loop-guard patches measure from
/// the operand cell instead, and the stream does not record which shape
/// emitted a branch, so a loop exit annotation sits one cell past the true
/// landing offset. `JUMP_RELATIVE` distances are resolved from the operand
/// cell itself.
fn jump_target(segment: &Segment, offset: usize, opcode: OpCode) -> Option<(i64, i64)> {
    let base = match opcode {
        OpCode::BranchFalse => offset as i64 + 2,
        OpCode::JumpRelative => offset as i64 + 1,
        _ => return None,
    };

    let index = match segment.code.get(offset + 1) {
        Some(Cell::Operand(index)) => *index,
        _ => return None,
    };
    let distance = match segment.constants.get(index) {
        Some(Value::Integer(distance)) => *distance,
        _ => return None,
    };

    Some((base + distance, distance))
}

fn collect_jump_targets(segment: &Segment) -> Vec<usize> {
    let mut targets = Vec::new();

    let mut offset = 0;
    while offset < segment.code.len() {
        let opcode = match segment.code[offset] {
            Cell::Op(opcode) => opcode,
            Cell::Operand(_) => {
                offset += 1;
                continue;
            }
        };

        if let Some((target, _)) = jump_target(segment, offset, opcode) {
            if target >= 0 && (target as usize) < segment.code.len() {
                let target = target as usize;
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }

        offset += 1 + opcode.arity();
    }

    targets
}

fn format_operand(segment: &Segment, index: usize) -> String {
    match segment.constants.get(index) {
        Some(value) => format_value(value),
        None => "<out of range>".to_string(),
    }
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Integer(n) => format!("{}", n),
        Value::Float(f) => format!("{:?}", f),
        Value::String(s) => format!("{:?}", s),
        Value::Bool(b) => format!("{}", b),
        Value::None => "none".to_string(),
        Value::Type(t) => format!("<{}>", t.name()),
    }
}

fn op_name(opcode: OpCode) -> &'static str {
    match opcode {
        OpCode::Push => "PUSH",
        OpCode::Pop => "POP",
        OpCode::Declare => "DECLARE",
        OpCode::Store => "STORE",
        OpCode::StoreIndexed => "STORE_INDEXED",
        OpCode::Load => "LOAD",
        OpCode::Access => "ACCESS",
        OpCode::List => "LIST",
        OpCode::Dictionary => "DICTIONARY",
        OpCode::Add => "ADD",
        OpCode::Sub => "SUB",
        OpCode::Mul => "MUL",
        OpCode::Div => "DIV",
        OpCode::Neg => "NEG",
        OpCode::Eq => "EQ",
        OpCode::Ne => "NE",
        OpCode::Lt => "LT",
        OpCode::Le => "LE",
        OpCode::Gt => "GT",
        OpCode::Ge => "GE",
        OpCode::Not => "NOT",
        OpCode::BranchFalse => "BRANCH_FALSE",
        OpCode::JumpRelative => "JUMP_RELATIVE",
        OpCode::Function => "FUNCTION",
        OpCode::Call => "CALL",
        OpCode::BindParameter => "BIND_PARAMETER",
        OpCode::Return => "RETURN",
        OpCode::Print => "PRINT",
        OpCode::Exit => "EXIT",
    }
}
