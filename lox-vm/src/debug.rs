// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode disassembler.
//!
//! Renders chunks in the classic `OFFSET LINE NAME OPERANDS` listing and
//! decodes them into structured [`Instruction`]s that can be written back
//! byte for byte.

use std::fmt::Write;

use crate::chunk::Chunk;
use crate::opcode::OpCode;

/// A decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    /// Offset of the opcode byte within the chunk.
    pub offset: usize,

    pub op: OpCode,

    /// The operand, widened to u16. `None` for zero-width instructions.
    pub operand: Option<u16>,

    /// Source line of the opcode byte.
    pub line: u32,

    /// Encoded length in bytes, opcode included.
    pub len: usize,
}

impl Instruction {
    /// Offset of the instruction following this one.
    pub fn next_offset(&self) -> usize {
        self.offset + self.len
    }

    /// Target offset of a jump or loop instruction.
    pub fn jump_target(&self) -> Option<usize> {
        let distance = self.operand? as usize;
        match self.op {
            OpCode::Jump | OpCode::JumpIfFalse => Some(self.next_offset() + distance),
            OpCode::Loop => self.next_offset().checked_sub(distance),
            _ => None,
        }
    }

    /// Append this instruction's bytes to `chunk`, all tagged with its line.
    pub fn encode(&self, chunk: &mut Chunk) {
        chunk.write_op(self.op, self.line);
        match (self.op.operand_width(), self.operand) {
            (1, Some(operand)) => chunk.write(operand as u8, self.line),
            (2, Some(operand)) => {
                let [hi, lo] = operand.to_be_bytes();
                chunk.write(hi, self.line);
                chunk.write(lo, self.line);
            }
            _ => {}
        }
    }
}

/// Decode the instruction at `offset`.
///
/// Returns `None` past the end of the code, for an unknown opcode byte, or
/// when the operand bytes are truncated.
pub fn decode(chunk: &Chunk, offset: usize) -> Option<Instruction> {
    let op = OpCode::try_from(*chunk.code.get(offset)?).ok()?;
    let line = chunk.line_at(offset)?;
    let width = op.operand_width();
    let operand = match width {
        0 => None,
        1 => Some(*chunk.code.get(offset + 1)? as u16),
        _ => Some(chunk.read_u16(offset + 1)?),
    };
    Some(Instruction {
        offset,
        op,
        operand,
        line,
        len: 1 + width,
    })
}

/// Decode every instruction in the chunk, stopping at the first byte that
/// does not decode.
pub fn decode_all(chunk: &Chunk) -> Vec<Instruction> {
    let mut instructions = Vec::new();
    let mut offset = 0;
    while let Some(instruction) = decode(chunk, offset) {
        offset = instruction.next_offset();
        instructions.push(instruction);
    }
    instructions
}

/// Disassemble a whole chunk under a `== name ==` header.
pub fn disassemble_chunk(chunk: &Chunk, name: &str) -> String {
    let mut out = format!("== {} ==\n", name);
    let mut offset = 0;
    while offset < chunk.code.len() {
        let (text, next) = disassemble_instruction(chunk, offset);
        out.push_str(&text);
        out.push('\n');
        offset = next;
    }
    out
}

/// Disassemble the instruction at `offset`.
///
/// Returns the rendered line (without a trailing newline) and the offset of
/// the next instruction.
pub fn disassemble_instruction(chunk: &Chunk, offset: usize) -> (String, usize) {
    let mut out = format!("{:04} ", offset);
    let line = chunk.line_at(offset).unwrap_or(0);
    if offset > 0 && chunk.line_at(offset - 1) == Some(line) {
        out.push_str("   | ");
    } else {
        let _ = write!(out, "{:4} ", line);
    }

    let Some(instruction) = decode(chunk, offset) else {
        match chunk.code.get(offset) {
            Some(&byte) if OpCode::try_from(byte).is_err() => {
                let _ = write!(out, "Unknown opcode {}", byte);
            }
            _ => out.push_str("<truncated>"),
        }
        return (out, offset + 1);
    };

    let name = instruction.op.name();
    match (instruction.op, instruction.operand) {
        (
            OpCode::Constant | OpCode::GetGlobal | OpCode::DefineGlobal | OpCode::SetGlobal,
            Some(idx),
        ) => {
            let _ = write!(out, "{:<16} {:4} '", name, idx);
            match chunk.constants.get(idx as usize) {
                Some(value) => {
                    let _ = write!(out, "{}'", value);
                }
                None => out.push_str("<bad constant>'"),
            }
        }
        (OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop, Some(_)) => {
            let target = instruction
                .jump_target()
                .map_or_else(|| "?".to_string(), |t| t.to_string());
            let _ = write!(out, "{:<16} {:4} -> {}", name, offset, target);
        }
        (_, Some(slot)) => {
            let _ = write!(out, "{:<16} {:4}", name, slot);
        }
        (_, None) => out.push_str(name),
    }

    (out, instruction.next_offset())
}
