// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Static capacity limits imposed by the bytecode format.

/// Number of distinct values a one-byte operand can address.
pub const UINT8_COUNT: usize = u8::MAX as usize + 1;

/// Maximum locals in one function, including the reserved callee slot.
pub const MAX_LOCALS: usize = UINT8_COUNT;

/// Maximum entries in one chunk's constant pool.
pub const MAX_CONSTANTS: usize = UINT8_COUNT;

/// Maximum parameters of a function and arguments of a call.
pub const MAX_ARGS: usize = 255;

/// Largest forward or backward jump distance.
pub const MAX_JUMP: usize = u16::MAX as usize;

/// Deepest nesting of declarations, statements and subexpressions the
/// compiler will descend into.
pub const MAX_NESTING: usize = 1024;
