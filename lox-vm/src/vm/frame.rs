// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Call frames for the VM.

use std::rc::Rc;

use crate::object::Function;

/// A call frame on the VM's call stack.
#[derive(Debug, Clone)]
pub struct CallFrame {
    /// The function being executed.
    pub function: Rc<Function>,

    /// Instruction pointer (index into the function's chunk code).
    pub ip: usize,

    /// Stack base: slot 0 of the frame, which holds the callee.
    pub base: usize,
}

impl CallFrame {
    pub fn new(function: Rc<Function>, base: usize) -> Self {
        Self {
            function,
            ip: 0,
            base,
        }
    }

    /// Source line of the instruction most recently read.
    pub fn line(&self) -> u32 {
        self.function
            .chunk
            .line_at(self.ip.saturating_sub(1))
            .unwrap_or(0)
    }
}
