// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Value stack for the VM.

use crate::value::Value;

use super::{Result, RuntimeError};

fn underflow() -> RuntimeError {
    RuntimeError::Internal("Stack underflow".into())
}

/// The VM's operand stack, shared by every call frame.
///
/// Capacity is fixed when the VM is created; pushing past it is a
/// [`RuntimeError::StackOverflow`].
#[derive(Debug)]
pub struct ValueStack {
    values: Vec<Value>,
    max: usize,
}

impl ValueStack {
    /// Create a new empty stack holding at most `max` values.
    pub fn new(max: usize) -> Self {
        Self {
            values: Vec::with_capacity(max.min(256)),
            max,
        }
    }

    /// Push a value onto the stack.
    #[inline]
    pub fn push(&mut self, value: Value) -> Result<()> {
        if self.values.len() >= self.max {
            return Err(RuntimeError::StackOverflow);
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop a value from the stack.
    #[inline]
    pub fn pop(&mut self) -> Result<Value> {
        self.values.pop().ok_or_else(underflow)
    }

    /// Peek at a value on the stack without removing it.
    /// `distance` is the offset from the top (0 = top).
    #[inline]
    pub fn peek(&self, distance: usize) -> Result<Value> {
        if distance >= self.values.len() {
            return Err(underflow());
        }
        Ok(self.values[self.values.len() - 1 - distance].clone())
    }

    /// Get a value at an absolute index.
    #[inline]
    pub fn get(&self, index: usize) -> Result<Value> {
        self.values.get(index).cloned().ok_or_else(underflow)
    }

    /// Set a value at an absolute index.
    #[inline]
    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        let slot = self.values.get_mut(index).ok_or_else(underflow)?;
        *slot = value;
        Ok(())
    }

    /// The values from absolute index `start` to the top.
    pub fn window(&self, start: usize) -> Result<&[Value]> {
        self.values.get(start..).ok_or_else(underflow)
    }

    /// Get the current stack size.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the stack is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Truncate the stack to the given size.
    #[inline]
    pub fn truncate(&mut self, size: usize) {
        self.values.truncate(size);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_peek() {
        let mut stack = ValueStack::new(8);
        assert!(stack.is_empty());
        stack.push(Value::Number(1.0)).unwrap();
        stack.push(Value::Number(2.0)).unwrap();
        assert_eq!(stack.peek(0).unwrap(), Value::Number(2.0));
        assert_eq!(stack.peek(1).unwrap(), Value::Number(1.0));
        assert!(stack.peek(2).is_err());
        assert_eq!(stack.pop().unwrap(), Value::Number(2.0));
        assert_eq!(stack.len(), 1);
        assert!(!stack.is_empty());
    }

    #[test]
    fn test_overflow() {
        let mut stack = ValueStack::new(2);
        stack.push(Value::Nil).unwrap();
        stack.push(Value::Nil).unwrap();
        assert_eq!(stack.push(Value::Nil), Err(RuntimeError::StackOverflow));
    }

    #[test]
    fn test_underflow_is_internal() {
        let mut stack = ValueStack::new(2);
        assert!(matches!(stack.pop(), Err(RuntimeError::Internal(_))));
        assert!(stack.set(0, Value::Nil).is_err());
    }

    #[test]
    fn test_window() {
        let mut stack = ValueStack::new(4);
        for i in 0..3 {
            stack.push(Value::Number(i as f64)).unwrap();
        }
        assert_eq!(
            stack.window(1).unwrap(),
            &[Value::Number(1.0), Value::Number(2.0)]
        );
        assert!(stack.window(3).unwrap().is_empty());
        assert!(stack.window(4).is_err());
    }
}
