// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode chunks.

use crate::limits::MAX_CONSTANTS;
use crate::object::Obj;
use crate::opcode::OpCode;
use crate::value::Value;

/// A chunk of bytecode with its constant pool and line table.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// Instruction and operand bytes.
    pub code: Vec<u8>,

    /// Source line for each byte of `code`. Same length as `code`.
    pub lines: Vec<u32>,

    /// Constant pool: literals, global names and nested functions.
    pub constants: Vec<Value>,
}

impl Chunk {
    /// Create a new empty chunk.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one byte with its source line.
    pub fn write(&mut self, byte: u8, line: u32) {
        self.code.push(byte);
        self.lines.push(line);
    }

    /// Append an opcode with its source line.
    pub fn write_op(&mut self, op: OpCode, line: u32) {
        self.write(op.into(), line);
    }

    /// Add a constant to the pool and return its index.
    ///
    /// Returns `None` if the pool already holds [`MAX_CONSTANTS`] entries.
    pub fn add_constant(&mut self, value: Value) -> Option<u8> {
        // Check for existing constant to deduplicate
        if let Some(i) = self
            .constants
            .iter()
            .position(|existing| Self::constants_equal(existing, &value))
        {
            return Some(i as u8);
        }

        let idx = self.constants.len();
        if idx >= MAX_CONSTANTS {
            return None;
        }
        self.constants.push(value);
        Some(idx as u8)
    }

    /// Check if two constants are equal for deduplication purposes.
    /// Functions are never deduplicated.
    fn constants_equal(a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
            (Value::Obj(Obj::String(a)), Value::Obj(Obj::String(b))) => a == b,
            _ => false,
        }
    }

    /// Current length of the code, i.e. the offset of the next byte written.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Read a big-endian u16 operand at `offset`.
    pub fn read_u16(&self, offset: usize) -> Option<u16> {
        let hi = *self.code.get(offset)?;
        let lo = *self.code.get(offset + 1)?;
        Some(u16::from_be_bytes([hi, lo]))
    }

    /// Overwrite the two bytes at `offset` with a big-endian u16.
    pub fn patch_u16(&mut self, offset: usize, value: u16) {
        let [hi, lo] = value.to_be_bytes();
        self.code[offset] = hi;
        self.code[offset + 1] = lo;
    }

    /// Source line of the byte at `offset`.
    pub fn line_at(&self, offset: usize) -> Option<u32> {
        self.lines.get(offset).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_tracks_lines() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Constant, 1);
        chunk.write(0, 1);
        chunk.write_op(OpCode::Return, 2);
        assert_eq!(chunk.code, vec![OpCode::Constant as u8, 0, OpCode::Return as u8]);
        assert_eq!(chunk.lines, vec![1, 1, 2]);
        assert_eq!(chunk.line_at(2), Some(2));
    }

    #[test]
    fn test_constants_are_deduplicated() {
        let mut chunk = Chunk::new();
        assert_eq!(chunk.add_constant(Value::Number(1.0)), Some(0));
        assert_eq!(chunk.add_constant(Value::string("x")), Some(1));
        assert_eq!(chunk.add_constant(Value::Number(1.0)), Some(0));
        assert_eq!(chunk.add_constant(Value::string("x")), Some(1));
        assert_eq!(chunk.constants.len(), 2);
    }

    #[test]
    fn test_constant_pool_limit() {
        let mut chunk = Chunk::new();
        for i in 0..MAX_CONSTANTS {
            assert_eq!(chunk.add_constant(Value::Number(i as f64)), Some(i as u8));
        }
        assert_eq!(chunk.add_constant(Value::Number(-1.0)), None);
        // Existing constants are still found once the pool is full
        assert_eq!(chunk.add_constant(Value::Number(3.0)), Some(3));
    }

    #[test]
    fn test_u16_operands_are_big_endian() {
        let mut chunk = Chunk::new();
        chunk.write_op(OpCode::Jump, 1);
        chunk.write(0xff, 1);
        chunk.write(0xff, 1);
        chunk.patch_u16(1, 0x0102);
        assert_eq!(&chunk.code[1..], &[0x01, 0x02]);
        assert_eq!(chunk.read_u16(1), Some(0x0102));
        assert_eq!(chunk.read_u16(2), None);
    }
}
