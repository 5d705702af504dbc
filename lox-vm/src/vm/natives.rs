// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Built-in native functions installed in every VM.

use std::time::{SystemTime, UNIX_EPOCH};

use crate::value::Value;

use super::VM;

/// `clock()`: seconds since the Unix epoch.
pub fn clock(_args: &[Value]) -> Result<Value, String> {
    let elapsed = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| e.to_string())?;
    Ok(Value::Number(elapsed.as_secs_f64()))
}

impl VM {
    pub(crate) fn define_builtins(&mut self) {
        self.define_native("clock", Some(0), clock);
    }
}
