// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode instruction definitions.

use std::fmt;

/// Bytecode instructions for the Lox VM.
///
/// Each instruction is a single opcode byte followed by zero, one or two
/// operand bytes. Two-byte operands (jump distances) are big-endian.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpCode {
    // =========================================================================
    // Constants & Stack
    // =========================================================================
    /// Push constants[operand].
    Constant,

    /// Push nil.
    Nil,

    /// Push true.
    True,

    /// Push false.
    False,

    /// Pop top value from stack.
    Pop,

    // =========================================================================
    // Variables
    // =========================================================================
    /// Push stack[frame_base + operand].
    GetLocal,

    /// stack[frame_base + operand] = peek(0). Does not pop.
    SetLocal,

    /// Look up the global named by constants[operand] and push it.
    GetGlobal,

    /// Bind the global named by constants[operand] to pop().
    DefineGlobal,

    /// Assign peek(0) to an existing global named by constants[operand].
    SetGlobal,

    // =========================================================================
    // Operators
    // =========================================================================
    /// Push a == b where b = pop(), a = pop().
    Equal,

    /// Push a > b where b = pop(), a = pop().
    Greater,

    /// Push a < b where b = pop(), a = pop().
    Less,

    /// Numeric addition or string concatenation.
    Add,

    Subtract,

    Multiply,

    Divide,

    /// Push the logical negation of pop().
    Not,

    /// Push the arithmetic negation of pop().
    Negate,

    // =========================================================================
    // Statements
    // =========================================================================
    /// Write pop() to the output followed by a newline.
    Print,

    // =========================================================================
    // Control Flow
    // =========================================================================
    /// ip += operand (u16).
    Jump,

    /// ip += operand (u16) if peek(0) is falsey. Does not pop.
    JumpIfFalse,

    /// ip -= operand (u16).
    Loop,

    /// Call the callee at stack[top - operand - 1] with operand arguments.
    Call,

    /// Pop the return value and the current frame.
    Return,
}

impl OpCode {
    /// Number of operand bytes following the opcode.
    pub fn operand_width(self) -> usize {
        match self {
            OpCode::Constant
            | OpCode::GetLocal
            | OpCode::SetLocal
            | OpCode::GetGlobal
            | OpCode::DefineGlobal
            | OpCode::SetGlobal
            | OpCode::Call => 1,

            OpCode::Jump | OpCode::JumpIfFalse | OpCode::Loop => 2,

            OpCode::Nil
            | OpCode::True
            | OpCode::False
            | OpCode::Pop
            | OpCode::Equal
            | OpCode::Greater
            | OpCode::Less
            | OpCode::Add
            | OpCode::Subtract
            | OpCode::Multiply
            | OpCode::Divide
            | OpCode::Not
            | OpCode::Negate
            | OpCode::Print
            | OpCode::Return => 0,
        }
    }

    /// Mnemonic used by the disassembler.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Constant => "OP_CONSTANT",
            OpCode::Nil => "OP_NIL",
            OpCode::True => "OP_TRUE",
            OpCode::False => "OP_FALSE",
            OpCode::Pop => "OP_POP",
            OpCode::GetLocal => "OP_GET_LOCAL",
            OpCode::SetLocal => "OP_SET_LOCAL",
            OpCode::GetGlobal => "OP_GET_GLOBAL",
            OpCode::DefineGlobal => "OP_DEFINE_GLOBAL",
            OpCode::SetGlobal => "OP_SET_GLOBAL",
            OpCode::Equal => "OP_EQUAL",
            OpCode::Greater => "OP_GREATER",
            OpCode::Less => "OP_LESS",
            OpCode::Add => "OP_ADD",
            OpCode::Subtract => "OP_SUBTRACT",
            OpCode::Multiply => "OP_MULTIPLY",
            OpCode::Divide => "OP_DIVIDE",
            OpCode::Not => "OP_NOT",
            OpCode::Negate => "OP_NEGATE",
            OpCode::Print => "OP_PRINT",
            OpCode::Jump => "OP_JUMP",
            OpCode::JumpIfFalse => "OP_JUMP_IF_FALSE",
            OpCode::Loop => "OP_LOOP",
            OpCode::Call => "OP_CALL",
            OpCode::Return => "OP_RETURN",
        }
    }
}

impl From<OpCode> for u8 {
    fn from(op: OpCode) -> u8 {
        op as u8
    }
}

/// A byte that does not encode any opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnknownOpCode(pub u8);

impl fmt::Display for UnknownOpCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown opcode {}", self.0)
    }
}

impl std::error::Error for UnknownOpCode {}

impl TryFrom<u8> for OpCode {
    type Error = UnknownOpCode;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        const OPCODES: [OpCode; 25] = [
            OpCode::Constant,
            OpCode::Nil,
            OpCode::True,
            OpCode::False,
            OpCode::Pop,
            OpCode::GetLocal,
            OpCode::SetLocal,
            OpCode::GetGlobal,
            OpCode::DefineGlobal,
            OpCode::SetGlobal,
            OpCode::Equal,
            OpCode::Greater,
            OpCode::Less,
            OpCode::Add,
            OpCode::Subtract,
            OpCode::Multiply,
            OpCode::Divide,
            OpCode::Not,
            OpCode::Negate,
            OpCode::Print,
            OpCode::Jump,
            OpCode::JumpIfFalse,
            OpCode::Loop,
            OpCode::Call,
            OpCode::Return,
        ];
        OPCODES
            .get(byte as usize)
            .copied()
            .ok_or(UnknownOpCode(byte))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_round_trip() {
        for byte in 0..=u8::MAX {
            if let Ok(op) = OpCode::try_from(byte) {
                assert_eq!(u8::from(op), byte, "{:?}", op);
            }
        }
    }

    #[test]
    fn test_unknown_byte() {
        assert_eq!(OpCode::try_from(200), Err(UnknownOpCode(200)));
    }

    #[test]
    fn test_operand_widths() {
        assert_eq!(OpCode::Return.operand_width(), 0);
        assert_eq!(OpCode::Constant.operand_width(), 1);
        assert_eq!(OpCode::Loop.operand_width(), 2);
    }
}
