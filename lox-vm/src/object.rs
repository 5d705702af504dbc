// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Heap objects: strings, compiled functions and native functions.
//!
//! Objects are reference counted. A function's constant pool may hold the
//! functions nested inside it, but never the function itself, so ownership
//! forms a tree and `Rc` reclaims everything once the last VM reference is
//! dropped.

use std::fmt;
use std::rc::Rc;

use crate::chunk::Chunk;
use crate::value::Value;

/// A heap object referenced from a [`Value`].
#[derive(Debug, Clone)]
pub enum Obj {
    String(Rc<str>),
    Function(Rc<Function>),
    Native(Rc<NativeFunction>),
}

impl Obj {
    pub fn type_name(&self) -> &'static str {
        match self {
            Obj::String(_) => "string",
            Obj::Function(_) => "function",
            Obj::Native(_) => "native function",
        }
    }
}

impl fmt::Display for Obj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Obj::String(s) => write!(f, "{}", s),
            Obj::Function(function) => write!(f, "{}", function),
            Obj::Native(_) => write!(f, "<native fn>"),
        }
    }
}

/// A compiled function: arity, name and its own bytecode.
#[derive(Debug, Clone)]
pub struct Function {
    /// Number of declared parameters.
    pub arity: u8,

    /// Function name. `None` for the top-level script.
    pub name: Option<Rc<str>>,

    /// The compiled body.
    pub chunk: Chunk,
}

impl Function {
    pub fn new(name: Option<Rc<str>>, arity: u8, chunk: Chunk) -> Self {
        Self { arity, name, chunk }
    }

    /// A fresh, empty top-level script function.
    pub fn script() -> Self {
        Self::new(None, 0, Chunk::new())
    }

    /// Name used in stack traces: the function name, or `script`.
    pub fn trace_name(&self) -> String {
        match &self.name {
            Some(name) => format!("{}()", name),
            None => "script".to_string(),
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.name {
            Some(name) => write!(f, "<fn {}>", name),
            None => write!(f, "<script>"),
        }
    }
}

/// Signature of a host function callable from Lox.
///
/// The slice is the argument window on the VM stack; its length is the
/// argument count. An `Err` becomes a runtime error with that message.
pub type NativeFn = dyn Fn(&[Value]) -> Result<Value, String>;

/// A host function exposed to Lox code.
pub struct NativeFunction {
    pub name: Rc<str>,

    /// Expected argument count, or `None` to accept any number.
    pub arity: Option<u8>,

    pub function: Box<NativeFn>,
}

impl NativeFunction {
    pub fn new<F>(name: impl Into<Rc<str>>, arity: Option<u8>, function: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, String> + 'static,
    {
        Self {
            name: name.into(),
            arity,
            function: Box::new(function),
        }
    }

    /// Invoke the host function on an argument window.
    pub fn call(&self, args: &[Value]) -> Result<Value, String> {
        (self.function)(args)
    }
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
