// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode compiler and stack-based virtual machine for Lox.
//!
//! Source is compiled in a single pass straight to bytecode, then executed
//! by a stack-based VM. Compilation completes (or fails) before execution
//! starts; a program with compile errors never reaches the VM.
//!
//! ```
//! use lox_vm::{InterpretResult, VM};
//!
//! let mut vm = VM::with_output(Vec::new(), Vec::new());
//! assert_eq!(vm.interpret("var x = 1 + 2 * 3;"), InterpretResult::Ok);
//! ```

pub mod chunk;
pub mod compiler;
pub mod debug;
pub mod limits;
pub mod object;
pub mod opcode;
pub mod table;
pub mod value;
pub mod vm;

pub use chunk::Chunk;
pub use compiler::{CompileError, CompileErrors, compile};
pub use object::{Function, NativeFunction, Obj};
pub use opcode::OpCode;
pub use table::Table;
pub use value::Value;
pub use vm::{RuntimeError, RuntimeFailure, VM, VmConfig};

/// Outcome of [`VM::interpret`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterpretResult {
    Ok,
    CompileError,
    RuntimeError,
}
