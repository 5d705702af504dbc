// lox-vm - Common test utilities
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Shared test helpers for lox-vm integration tests.
//!
//! # Usage
//!
//! In your test file, add:
//! ```ignore
//! mod common;
//! use common::*;
//! ```
//!
//! # Available Helpers
//!
//! - [`run`] - Interpret source in a fresh VM, capturing both output sinks
//! - [`expect_output`] - Assert that source runs and prints the given lines
//! - [`expect_runtime_error`] - Assert a runtime error containing a pattern
//! - [`expect_compile_error`] - Assert a compile error containing a pattern

#![allow(dead_code)]

use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

pub use lox_vm::{InterpretResult, VM};

/// An in-memory sink that stays readable after it is moved into a VM.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Result of running a program with captured output.
pub struct Outcome {
    pub result: InterpretResult,
    pub stdout: String,
    pub stderr: String,
}

/// A VM wired to fresh buffers, for tests that interpret several snippets.
pub fn capturing_vm() -> (VM, SharedBuffer, SharedBuffer) {
    let out = SharedBuffer::default();
    let err = SharedBuffer::default();
    let vm = VM::with_output(out.clone(), err.clone());
    (vm, out, err)
}

/// Interpret source in a fresh VM.
#[must_use]
pub fn run(src: &str) -> Outcome {
    let (mut vm, out, err) = capturing_vm();
    let result = vm.interpret(src);
    Outcome {
        result,
        stdout: out.contents(),
        stderr: err.contents(),
    }
}

pub fn expect_output(src: &str, expected: &[&str]) {
    let outcome = run(src);
    assert_eq!(
        outcome.result,
        InterpretResult::Ok,
        "source failed: {}\nstderr: {}",
        src,
        outcome.stderr
    );
    let lines: Vec<&str> = outcome.stdout.lines().collect();
    assert_eq!(lines, expected, "output mismatch for source: {}", src);
}

fn expect_failure(src: &str, kind: InterpretResult, expected_pattern: &str) -> Outcome {
    let outcome = run(src);
    assert_eq!(
        outcome.result, kind,
        "unexpected result for source: {}\nstdout: {}\nstderr: {}",
        src, outcome.stdout, outcome.stderr
    );
    assert!(
        outcome
            .stderr
            .to_lowercase()
            .contains(&expected_pattern.to_lowercase()),
        "Error '{}' should contain '{}' for source: {}",
        outcome.stderr,
        expected_pattern,
        src
    );
    outcome
}

pub fn expect_runtime_error(src: &str, expected_pattern: &str) -> Outcome {
    expect_failure(src, InterpretResult::RuntimeError, expected_pattern)
}

pub fn expect_compile_error(src: &str, expected_pattern: &str) -> Outcome {
    expect_failure(src, InterpretResult::CompileError, expected_pattern)
}
