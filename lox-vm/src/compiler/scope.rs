// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Variable declaration and resolution.
//!
//! Locals live in stack slots whose indices match their position in the
//! function's local list. Anything not found there is a global, addressed
//! by a name constant.

use lox_scanner::{Token, TokenKind};

use crate::limits::MAX_LOCALS;
use crate::opcode::OpCode;
use crate::value::Value;

use super::{Compiler, Local};

impl<'src> Compiler<'src> {
    pub(super) fn begin_scope(&mut self) {
        self.state.scope_depth += 1;
    }

    /// Leave a block, popping every local declared inside it.
    pub(super) fn end_scope(&mut self) {
        self.state.scope_depth -= 1;

        while let Some(local) = self.state.locals.last() {
            if !local.depth.is_none_or(|depth| depth > self.state.scope_depth) {
                break;
            }
            self.emit_op(OpCode::Pop);
            self.state.locals.pop();
        }
    }

    /// Admit a variable name to the constant pool.
    pub(super) fn identifier_constant(&mut self, name: Token<'src>) -> u8 {
        self.make_constant(Value::string(name.lexeme))
    }

    /// Find the stack slot of a local, innermost declaration first.
    ///
    /// A local whose initializer is still being compiled is skipped in
    /// favour of an enclosing local of the same name, so
    /// `var a = a + 1;` in an inner block reads the outer `a`. With no such
    /// local to fall back on, the read is an error.
    pub(super) fn resolve_local(&mut self, name: Token<'src>) -> Option<u8> {
        let mut uninitialized = None;
        for (slot, local) in self.state.locals.iter().enumerate().rev() {
            if local.name != name.lexeme {
                continue;
            }
            if local.depth.is_some() {
                return Some(slot as u8);
            }
            uninitialized.get_or_insert(slot);
        }

        let slot = uninitialized?;
        self.error("Can't read local variable in its own initializer.");
        Some(slot as u8)
    }

    fn add_local(&mut self, name: Token<'src>) {
        if self.state.locals.len() == MAX_LOCALS {
            self.error("Too many local variables in function.");
            return;
        }
        self.state.locals.push(Local {
            name: name.lexeme,
            depth: None,
        });
    }

    /// Record the variable just named by `previous` as a local of the
    /// current scope. Globals are late bound and need no declaration.
    pub(super) fn declare_variable(&mut self) {
        if self.state.scope_depth == 0 {
            return;
        }

        let name = self.previous;
        let scope_depth = self.state.scope_depth;
        let duplicate = self
            .state
            .locals
            .iter()
            .rev()
            .take_while(|local| local.depth.is_none_or(|depth| depth >= scope_depth))
            .any(|local| local.name == name.lexeme);

        if duplicate {
            self.error("Already a variable with this name in this scope.");
        }
        self.add_local(name);
    }

    /// Consume a variable name. Returns its name constant for globals, or
    /// 0 for locals which are addressed by slot instead.
    pub(super) fn parse_variable(&mut self, message: &str) -> u8 {
        self.consume(TokenKind::Identifier, message);

        self.declare_variable();
        if self.state.scope_depth > 0 {
            return 0;
        }

        self.identifier_constant(self.previous)
    }

    /// Make the most recent local readable.
    pub(super) fn mark_initialized(&mut self) {
        let scope_depth = self.state.scope_depth;
        if scope_depth == 0 {
            return;
        }
        if let Some(local) = self.state.locals.last_mut() {
            local.depth = Some(scope_depth);
        }
    }

    /// Bind the value on top of the stack to the variable just declared.
    pub(super) fn define_variable(&mut self, global: u8) {
        if self.state.scope_depth > 0 {
            self.mark_initialized();
            return;
        }
        self.emit_bytes(OpCode::DefineGlobal, global);
    }
}
