// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Arithmetic and comparison opcode handlers: Add, Subtract, Multiply,
//! Divide, Negate, Equal, Greater, Less.

use crate::object::Obj;
use crate::opcode::OpCode;
use crate::value::Value;
use crate::vm::{Result, RuntimeError, VM};

impl VM {
    /// Execute an arithmetic or comparison opcode.
    pub(crate) fn execute_arithmetic(&mut self, op: OpCode) -> Result<()> {
        match op {
            OpCode::Add => self.execute_add(),
            OpCode::Subtract => self.binary_num_op(|a, b| Value::Number(a - b)),
            OpCode::Multiply => self.binary_num_op(|a, b| Value::Number(a * b)),
            OpCode::Divide => self.binary_num_op(|a, b| Value::Number(a / b)),
            OpCode::Greater => self.binary_num_op(|a, b| Value::Bool(a > b)),
            OpCode::Less => self.binary_num_op(|a, b| Value::Bool(a < b)),
            OpCode::Negate => self.execute_negate(),
            OpCode::Equal => {
                let b = self.stack.pop()?;
                let a = self.stack.pop()?;
                self.stack.push(Value::Bool(a == b))
            }
            _ => Err(RuntimeError::Internal(format!(
                "execute_arithmetic: unexpected opcode {:?}",
                op
            ))),
        }
    }

    /// `+` adds two numbers or concatenates two strings.
    fn execute_add(&mut self) -> Result<()> {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        let result = match (&a, &b) {
            (Value::Number(x), Value::Number(y)) => Value::Number(x + y),
            (Value::Obj(Obj::String(x)), Value::Obj(Obj::String(y))) => {
                let mut joined = String::with_capacity(x.len() + y.len());
                joined.push_str(x);
                joined.push_str(y);
                Value::string(joined)
            }
            _ => return Err(RuntimeError::OperandsMustBeNumbersOrStrings),
        };
        self.stack.push(result)
    }

    fn execute_negate(&mut self) -> Result<()> {
        let val = self.stack.pop()?;
        match val {
            Value::Number(n) => self.stack.push(Value::Number(-n)),
            _ => Err(RuntimeError::OperandMustBeNumber),
        }
    }

    /// Perform a binary operation on two numbers.
    fn binary_num_op<F>(&mut self, op: F) -> Result<()>
    where
        F: Fn(f64, f64) -> Value,
    {
        let b = self.stack.pop()?;
        let a = self.stack.pop()?;
        match (a, b) {
            (Value::Number(x), Value::Number(y)) => self.stack.push(op(x, y)),
            _ => Err(RuntimeError::OperandsMustBeNumbers),
        }
    }
}
