// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Shared types for the bytecode compiler.

use std::fmt;
use std::rc::Rc;

use crate::chunk::Chunk;
use crate::object::Function;

/// Where in the source a compile error was detected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorLocation {
    /// At the end of input.
    AtEnd,
    /// At the token with this lexeme.
    At(String),
    /// Reported by the scanner; the message already describes the fault.
    None,
}

/// A single compile-time diagnostic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileError {
    pub line: u32,
    pub location: ErrorLocation,
    pub message: String,
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[line {}] Error", self.line)?;
        match &self.location {
            ErrorLocation::AtEnd => write!(f, " at end")?,
            ErrorLocation::At(lexeme) => write!(f, " at '{}'", lexeme)?,
            ErrorLocation::None => {}
        }
        write!(f, ": {}", self.message)
    }
}

impl std::error::Error for CompileError {}

/// Every diagnostic reported while compiling one source, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileErrors(pub Vec<CompileError>);

impl CompileErrors {
    pub fn iter(&self) -> std::slice::Iter<'_, CompileError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CompileErrors {
    type Item = &'a CompileError;
    type IntoIter = std::slice::Iter<'a, CompileError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for CompileErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompileErrors {}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileErrors>;

/// Local variable during compilation.
///
/// The index of a local in [`FunctionState::locals`] is its stack slot
/// relative to the frame base.
#[derive(Debug, Clone, Copy)]
pub struct Local<'src> {
    pub name: &'src str,
    /// Scope depth, or `None` while the initializer is being compiled.
    pub depth: Option<usize>,
}

/// What kind of function body is being compiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FunctionKind {
    Script,
    Function,
}

/// Per-function compilation context.
#[derive(Debug)]
pub struct FunctionState<'src> {
    /// The function being built.
    pub function: Function,

    pub kind: FunctionKind,

    /// Locals in declaration order. Slot 0 holds the callee.
    pub locals: Vec<Local<'src>>,

    /// Current block nesting depth. 0 is the function's top level.
    pub scope_depth: usize,
}

impl<'src> FunctionState<'src> {
    pub fn new(kind: FunctionKind, name: Option<Rc<str>>) -> Self {
        Self {
            function: Function::new(name, 0, Chunk::new()),
            kind,
            locals: vec![Local {
                name: "",
                depth: Some(0),
            }],
            scope_depth: 0,
        }
    }
}
