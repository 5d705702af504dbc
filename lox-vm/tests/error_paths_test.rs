// lox-vm - VM error path tests
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Tests for VM error paths:
//! - Type errors
//! - Undefined variables
//! - Arity errors
//! - Stack overflow
//! - Stack traces

mod common;

use common::*;
use lox_vm::{RuntimeError, VM, VmConfig, Value, compile};

// =============================================================================
// Type errors
// =============================================================================

#[test]
fn add_string_and_number() {
    expect_runtime_error("print \"a\" + 1;", "Operands must be two numbers or two strings.");
}

#[test]
fn subtract_strings() {
    expect_runtime_error("print \"a\" - \"b\";", "Operands must be numbers.");
}

#[test]
fn compare_mixed_types() {
    expect_runtime_error("print 1 < \"2\";", "Operands must be numbers.");
}

#[test]
fn negate_non_number() {
    expect_runtime_error("print -\"a\";", "Operand must be a number.");
}

#[test]
fn call_non_function() {
    expect_runtime_error("var x = 1; x();", "Can only call functions.");
    expect_runtime_error("\"str\"();", "Can only call functions.");
}

// =============================================================================
// Undefined variables
// =============================================================================

#[test]
fn read_undefined_global() {
    let outcome = expect_runtime_error("print undeclared;", "Undefined variable 'undeclared'.");
    assert!(outcome.stdout.is_empty());
}

#[test]
fn assign_undefined_global_leaves_no_binding() {
    let (mut vm, _out, _err) = capturing_vm();
    assert_eq!(vm.interpret("ghost = 1;"), InterpretResult::RuntimeError);
    assert!(!vm.globals().contains("ghost"));
    assert_eq!(vm.stack_len(), 0);
}

// =============================================================================
// Arity errors
// =============================================================================

#[test]
fn too_few_arguments() {
    expect_runtime_error("fun f(a, b) {} f(1);", "Expected 2 arguments but got 1.");
}

#[test]
fn too_many_arguments() {
    expect_runtime_error("fun f() {} f(1, 2);", "Expected 0 arguments but got 2.");
}

#[test]
fn native_arity() {
    expect_runtime_error("clock(1);", "Expected 0 arguments but got 1.");
}

#[test]
fn native_error_message() {
    let (mut vm, _out, err) = capturing_vm();
    vm.define_native("fail", Some(0), |_: &[Value]| Err("it broke".to_string()));
    assert_eq!(vm.interpret("fail();"), InterpretResult::RuntimeError);
    assert!(err.contents().starts_with("it broke\n"));
}

// =============================================================================
// Stack overflow
// =============================================================================

#[test]
fn unbounded_recursion() {
    expect_runtime_error("fun f() { f(); } f();", "Stack overflow.");
}

#[test]
fn frame_limit_is_configurable() {
    let config = VmConfig {
        frames_max: 4,
        slots_per_frame: 256,
    };
    let out = SharedBuffer::default();
    let mut vm = VM::with_config_and_output(config, out.clone(), std::io::sink());
    let src = "fun depth(n) { if (n == 0) return 0; return depth(n - 1); }";
    assert_eq!(vm.interpret(src), InterpretResult::Ok);
    // The script frame plus three calls fit, a fourth call does not
    assert_eq!(vm.interpret("print depth(2);"), InterpretResult::Ok);
    assert_eq!(vm.interpret("print depth(3);"), InterpretResult::RuntimeError);
    assert_eq!(out.contents(), "0\n");
}

#[test]
fn operand_stack_is_bounded() {
    let config = VmConfig {
        frames_max: 1,
        slots_per_frame: 4,
    };
    let mut vm = VM::with_config_and_output(config, std::io::sink(), std::io::sink());
    let function = compile("print 1 + (2 + (3 + (4 + 5)));").unwrap();
    let failure = vm.run(function).unwrap_err();
    assert_eq!(failure.error, RuntimeError::StackOverflow);
    assert_eq!(vm.stack_len(), 0);
}

// =============================================================================
// Stack traces
// =============================================================================

#[test]
fn trace_lists_frames_innermost_first() {
    let src = "fun inner() {\n  return 1 + nil;\n}\nfun outer() {\n  inner();\n}\nouter();";
    let outcome = expect_runtime_error(src, "Operands must be two numbers or two strings.");
    let lines: Vec<&str> = outcome.stderr.lines().collect();
    assert_eq!(
        lines,
        vec![
            "Operands must be two numbers or two strings.",
            "[line 2] in inner()",
            "[line 5] in outer()",
            "[line 7] in script",
        ]
    );
}

#[test]
fn run_reports_structured_failure() {
    let mut vm = VM::with_output(std::io::sink(), std::io::sink());
    let function = compile("var x = 1;\nprint y;").unwrap();
    let failure = vm.run(function).unwrap_err();
    assert_eq!(failure.error, RuntimeError::UndefinedVariable("y".into()));
    assert_eq!(failure.trace, vec!["[line 2] in script"]);
    assert_eq!(
        failure.to_string(),
        "Undefined variable 'y'.\n[line 2] in script"
    );
}
