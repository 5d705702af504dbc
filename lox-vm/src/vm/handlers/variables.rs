// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Variable opcode handlers: GetLocal, SetLocal, GetGlobal, DefineGlobal, SetGlobal.

use crate::opcode::OpCode;
use crate::vm::{Result, RuntimeError, VM};

impl VM {
    /// Execute a variable opcode.
    pub(crate) fn execute_variables(&mut self, op: OpCode) -> Result<()> {
        match op {
            OpCode::GetLocal => {
                let slot = self.read_byte()? as usize;
                let base = self.frame()?.base;
                let val = self.stack.get(base + slot)?;
                self.stack.push(val)?;
            }
            OpCode::SetLocal => {
                // Assignment is an expression: the value stays on the stack
                let slot = self.read_byte()? as usize;
                let val = self.stack.peek(0)?;
                let base = self.frame()?.base;
                self.stack.set(base + slot, val)?;
            }
            OpCode::GetGlobal => {
                let name = self.read_string()?;
                let val = self
                    .globals
                    .get(&name)
                    .cloned()
                    .ok_or_else(|| RuntimeError::UndefinedVariable(name.to_string()))?;
                self.stack.push(val)?;
            }
            OpCode::DefineGlobal => {
                let name = self.read_string()?;
                let val = self.stack.pop()?;
                self.globals.set(name, val);
            }
            OpCode::SetGlobal => {
                let name = self.read_string()?;
                let val = self.stack.peek(0)?;
                if self.globals.set(name.clone(), val) {
                    // Assignment never creates a global
                    self.globals.delete(&name);
                    return Err(RuntimeError::UndefinedVariable(name.to_string()));
                }
            }
            _ => {
                return Err(RuntimeError::Internal(format!(
                    "execute_variables: unexpected opcode {:?}",
                    op
                )));
            }
        }
        Ok(())
    }
}
