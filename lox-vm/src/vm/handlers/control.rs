// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Control flow opcode handlers: Jump, JumpIfFalse, Loop, Call, Return.

use std::rc::Rc;

use crate::object::{Function, NativeFunction, Obj};
use crate::opcode::OpCode;
use crate::value::Value;
use crate::vm::frame::CallFrame;
use crate::vm::{Result, RuntimeError, VM};

/// Outcome of a control flow opcode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlFlow {
    /// Keep executing.
    Continue,
    /// The top-level script returned.
    Halt,
}

impl VM {
    /// Execute a control flow opcode.
    pub(crate) fn execute_control(&mut self, op: OpCode) -> Result<ControlFlow> {
        match op {
            OpCode::Jump => {
                let offset = self.read_u16()? as usize;
                self.frame_mut()?.ip += offset;
            }
            OpCode::JumpIfFalse => {
                // The condition stays on the stack; the compiler pops it
                let offset = self.read_u16()? as usize;
                if self.stack.peek(0)?.is_falsey() {
                    self.frame_mut()?.ip += offset;
                }
            }
            OpCode::Loop => {
                let offset = self.read_u16()? as usize;
                let frame = self.frame_mut()?;
                frame.ip = frame.ip.checked_sub(offset).ok_or_else(|| {
                    RuntimeError::Internal("Loop jumped before start of chunk".into())
                })?;
            }
            OpCode::Call => {
                let argc = self.read_byte()? as usize;
                let callee = self.stack.peek(argc)?;
                self.call_value(callee, argc)?;
            }
            OpCode::Return => {
                let result = self.stack.pop()?;
                let frame = self
                    .frames
                    .pop()
                    .ok_or_else(|| RuntimeError::Internal("Return with no active frame".into()))?;

                // Returning from the script ends execution
                if self.frames.is_empty() {
                    self.stack.truncate(0);
                    return Ok(ControlFlow::Halt);
                }

                // Discard the callee and its arguments, then push the result
                self.stack.truncate(frame.base);
                self.stack.push(result)?;
            }
            _ => {
                return Err(RuntimeError::Internal(format!(
                    "execute_control: unexpected opcode {:?}",
                    op
                )));
            }
        }
        Ok(ControlFlow::Continue)
    }

    /// Call `callee`, which sits on the stack below its `argc` arguments.
    fn call_value(&mut self, callee: Value, argc: usize) -> Result<()> {
        match callee {
            Value::Obj(Obj::Function(function)) => self.call_function(function, argc),
            Value::Obj(Obj::Native(native)) => self.call_native(&native, argc),
            _ => Err(RuntimeError::NotCallable),
        }
    }

    /// Push a frame for a compiled function.
    pub(crate) fn call_function(&mut self, function: Rc<Function>, argc: usize) -> Result<()> {
        if argc != function.arity as usize {
            return Err(RuntimeError::ArityMismatch {
                expected: function.arity as usize,
                got: argc,
            });
        }
        if self.frames.len() >= self.config.frames_max {
            return Err(RuntimeError::StackOverflow);
        }

        let base = self
            .stack
            .len()
            .checked_sub(argc + 1)
            .ok_or_else(|| RuntimeError::Internal("Call with missing arguments".into()))?;
        self.frames.push(CallFrame::new(function, base));
        Ok(())
    }

    /// Run a native function in the caller's frame and replace the callee
    /// and its arguments with the result.
    fn call_native(&mut self, native: &NativeFunction, argc: usize) -> Result<()> {
        if let Some(arity) = native.arity
            && arity as usize != argc
        {
            return Err(RuntimeError::ArityMismatch {
                expected: arity as usize,
                got: argc,
            });
        }

        let callee_slot = self
            .stack
            .len()
            .checked_sub(argc + 1)
            .ok_or_else(|| RuntimeError::Internal("Call with missing arguments".into()))?;
        let args = self.stack.window(callee_slot + 1)?;
        let result = native.call(args).map_err(RuntimeError::Native)?;

        self.stack.truncate(callee_slot);
        self.stack.push(result)
    }
}
