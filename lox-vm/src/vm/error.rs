// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Runtime errors for the VM.

use std::fmt;

/// Runtime error during VM execution.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A numeric operator got a non-number operand.
    OperandsMustBeNumbers,
    /// Negation of a non-number.
    OperandMustBeNumber,
    /// `+` on anything other than two numbers or two strings.
    OperandsMustBeNumbersOrStrings,
    /// Read or assignment of a global that was never defined.
    UndefinedVariable(String),
    /// Wrong number of arguments.
    ArityMismatch { expected: usize, got: usize },
    /// Call of a value that is not a function.
    NotCallable,
    /// Operand stack or call frame capacity exceeded.
    StackOverflow,
    /// Error raised by a native function.
    Native(String),
    /// Writing `print` output failed.
    Output(String),
    /// Malformed bytecode. Indicates a compiler or VM defect.
    Internal(String),
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuntimeError::OperandsMustBeNumbers => write!(f, "Operands must be numbers."),
            RuntimeError::OperandMustBeNumber => write!(f, "Operand must be a number."),
            RuntimeError::OperandsMustBeNumbersOrStrings => {
                write!(f, "Operands must be two numbers or two strings.")
            }
            RuntimeError::UndefinedVariable(name) => write!(f, "Undefined variable '{}'.", name),
            RuntimeError::ArityMismatch { expected, got } => {
                write!(f, "Expected {} arguments but got {}.", expected, got)
            }
            RuntimeError::NotCallable => write!(f, "Can only call functions."),
            RuntimeError::StackOverflow => write!(f, "Stack overflow."),
            RuntimeError::Native(msg) => write!(f, "{}", msg),
            RuntimeError::Output(msg) => write!(f, "Failed to write output: {}", msg),
            RuntimeError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for RuntimeError {}

/// A runtime error together with the call stack at the point of failure.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeFailure {
    pub error: RuntimeError,

    /// One `[line N] in NAME` entry per live frame, innermost first.
    pub trace: Vec<String>,
}

impl fmt::Display for RuntimeFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;
        for line in &self.trace {
            write!(f, "\n{}", line)?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Result type for VM operations.
pub type Result<T> = std::result::Result<T, RuntimeError>;
