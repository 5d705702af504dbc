// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode emission and jump back-patching.
//!
//! Every byte is tagged with the line of the most recently consumed token.

use crate::chunk::Chunk;
use crate::limits::MAX_JUMP;
use crate::opcode::OpCode;
use crate::value::Value;

use super::Compiler;

impl<'src> Compiler<'src> {
    pub(super) fn current_chunk(&mut self) -> &mut Chunk {
        &mut self.state.function.chunk
    }

    pub(super) fn emit_byte(&mut self, byte: u8) {
        let line = self.previous.line;
        self.current_chunk().write(byte, line);
    }

    pub(super) fn emit_op(&mut self, op: OpCode) {
        self.emit_byte(op.into());
    }

    pub(super) fn emit_bytes(&mut self, op: OpCode, operand: u8) {
        self.emit_op(op);
        self.emit_byte(operand);
    }

    /// Emit a backward jump to `loop_start`.
    pub(super) fn emit_loop(&mut self, loop_start: usize) {
        self.emit_op(OpCode::Loop);

        // +2 to also skip the operand bytes of this instruction
        let offset = self.current_chunk().current_offset() - loop_start + 2;
        let offset = if offset > MAX_JUMP {
            self.error("Loop body too large.");
            0
        } else {
            offset as u16
        };

        let [hi, lo] = offset.to_be_bytes();
        self.emit_byte(hi);
        self.emit_byte(lo);
    }

    /// Emit a forward jump with a placeholder operand.
    ///
    /// Returns the operand's offset for [`Compiler::patch_jump`].
    pub(super) fn emit_jump(&mut self, op: OpCode) -> usize {
        self.emit_op(op);
        self.emit_byte(0xff);
        self.emit_byte(0xff);
        self.current_chunk().current_offset() - 2
    }

    /// Point the jump whose operand is at `offset` to the next byte emitted.
    pub(super) fn patch_jump(&mut self, offset: usize) {
        // -2 to adjust for the jump operand itself
        let jump = self.current_chunk().current_offset() - offset - 2;
        if jump > MAX_JUMP {
            self.error("Too much code to jump over.");
            return;
        }
        self.current_chunk().patch_u16(offset, jump as u16);
    }

    pub(super) fn emit_return(&mut self) {
        self.emit_op(OpCode::Nil);
        self.emit_op(OpCode::Return);
    }

    /// Add a value to the constant pool, reporting an error when it is full.
    pub(super) fn make_constant(&mut self, value: Value) -> u8 {
        match self.current_chunk().add_constant(value) {
            Some(index) => index,
            None => {
                self.error("Too many constants in one chunk.");
                0
            }
        }
    }

    pub(super) fn emit_constant(&mut self, value: Value) {
        let index = self.make_constant(value);
        self.emit_bytes(OpCode::Constant, index);
    }
}
