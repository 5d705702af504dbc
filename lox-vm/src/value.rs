// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Runtime values.

use std::fmt;
use std::rc::Rc;

use crate::object::{Function, NativeFunction, Obj};

/// A Lox runtime value.
///
/// Values are small and cloned freely; heap objects are shared through
/// `Rc` handles inside [`Obj`].
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Nil,
    Number(f64),
    Obj(Obj),
}

impl Value {
    /// Create a string value.
    pub fn string(s: impl Into<Rc<str>>) -> Self {
        Value::Obj(Obj::String(s.into()))
    }

    /// Wrap a compiled function.
    pub fn function(function: Rc<Function>) -> Self {
        Value::Obj(Obj::Function(function))
    }

    /// Wrap a native function.
    pub fn native(native: Rc<NativeFunction>) -> Self {
        Value::Obj(Obj::Native(native))
    }

    /// `nil` and `false` are falsey; every other value is truthy.
    pub fn is_falsey(&self) -> bool {
        matches!(self, Value::Nil | Value::Bool(false))
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Get the type name (for error messages).
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "boolean",
            Value::Nil => "nil",
            Value::Number(_) => "number",
            Value::Obj(obj) => obj.type_name(),
        }
    }
}

impl PartialEq for Value {
    /// Structural equality. Objects compare equal only when both are strings
    /// with the same content; functions are never equal, not even to
    /// themselves.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Obj(Obj::String(a)), Value::Obj(Obj::String(b))) => a == b,
            _ => false,
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{}", b),
            Value::Nil => write!(f, "nil"),
            Value::Number(n) => fmt_number(f, *n),
            Value::Obj(obj) => write!(f, "{}", obj),
        }
    }
}

/// Shortest round-trip digits in `%g` shape: plain decimal while the
/// decimal exponent is in `-4..6`, otherwise `d.ddde+XX`.
fn fmt_number(f: &mut fmt::Formatter<'_>, n: f64) -> fmt::Result {
    if n.is_nan() {
        return f.write_str("NaN");
    }
    if n.is_infinite() {
        return f.write_str(if n > 0.0 { "Inf" } else { "-Inf" });
    }

    let scientific = format!("{:e}", n);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return write!(f, "{}", n);
    };
    let exponent: i32 = exponent.parse().map_err(|_| fmt::Error)?;

    if (-4..6).contains(&exponent) {
        write!(f, "{}", n)
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        write!(f, "{}e{}{:02}", mantissa, sign, exponent.unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chunk::Chunk;

    #[test]
    fn test_number_display() {
        assert_eq!(Value::Number(7.0).to_string(), "7");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-0.5).to_string(), "-0.5");
        assert_eq!(Value::Number(0.1 + 0.2).to_string(), "0.30000000000000004");
        assert_eq!(Value::Number(0.0).to_string(), "0");
        assert_eq!(Value::Number(100000.0).to_string(), "100000");
        assert_eq!(Value::Number(123456.7).to_string(), "123456.7");
        assert_eq!(Value::Number(0.0001).to_string(), "0.0001");
    }

    #[test]
    fn test_number_display_exponent_form() {
        assert_eq!(Value::Number(1000000.0).to_string(), "1e+06");
        assert_eq!(Value::Number(1234567.0).to_string(), "1.234567e+06");
        assert_eq!(Value::Number(-2500000.0).to_string(), "-2.5e+06");
        assert_eq!(Value::Number(0.00001).to_string(), "1e-05");
        assert_eq!(Value::Number(1.5e-7).to_string(), "1.5e-07");
        assert_eq!(Value::Number(1e100).to_string(), "1e+100");
        assert_eq!(Value::Number(f64::INFINITY).to_string(), "Inf");
        assert_eq!(Value::Number(f64::NEG_INFINITY).to_string(), "-Inf");
        assert_eq!(Value::Number(f64::NAN).to_string(), "NaN");
    }

    #[test]
    fn test_truthiness() {
        assert!(Value::Nil.is_falsey());
        assert!(Value::Bool(false).is_falsey());
        assert!(!Value::Bool(true).is_falsey());
        assert!(!Value::Number(0.0).is_falsey());
        assert!(!Value::string("").is_falsey());
    }

    #[test]
    fn test_equality_by_tag() {
        assert_eq!(Value::Nil, Value::Nil);
        assert_eq!(Value::Number(1.0), Value::Number(1.0));
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_ne!(Value::Nil, Value::Bool(false));
        assert_ne!(Value::Number(f64::NAN), Value::Number(f64::NAN));
    }

    #[test]
    fn test_string_equality_is_by_content() {
        let a = Value::string(String::from("ab"));
        let b = Value::string("a".to_string() + "b");
        assert_eq!(a, b);
        assert_ne!(a, Value::string("abc"));
    }

    #[test]
    fn test_functions_never_equal() {
        let f = Rc::new(Function::new(Some("f".into()), 0, Chunk::new()));
        let v = Value::function(f);
        assert_ne!(v.clone(), v);
    }
}
