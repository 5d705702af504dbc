// lox-vm - Compile error tests
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Tests for compile-time diagnostics and panic-mode recovery.

mod common;

use common::*;
use lox_vm::compile;
use lox_vm::compiler::ErrorLocation;

fn errors(src: &str) -> Vec<String> {
    compile(src)
        .unwrap_err()
        .iter()
        .map(|e| e.to_string())
        .collect()
}

#[test]
fn own_initializer() {
    expect_compile_error(
        "{ var a = a; }",
        "Can't read local variable in its own initializer.",
    );
    expect_compile_error(
        "fun f() { var x = x + 1; }",
        "Can't read local variable in its own initializer.",
    );
}

#[test]
fn compile_errors_never_run() {
    let outcome = expect_compile_error("print 1; print;", "Expect expression.");
    assert!(outcome.stdout.is_empty());
}

#[test]
fn multiple_errors_are_reported() {
    assert_eq!(
        errors("var = 1;\nprint 2\nvar b = ;"),
        vec![
            "[line 1] Error at '=': Expect variable name.",
            "[line 3] Error at 'var': Expect ';' after value.",
            "[line 3] Error at ';': Expect expression.",
        ]
    );
}

#[test]
fn error_locations() {
    let errs = compile("1 +").unwrap_err();
    assert_eq!(errs.len(), 1);
    assert_eq!(errs.0[0].location, ErrorLocation::AtEnd);
    assert_eq!(errs.0[0].message, "Expect expression.");

    let errs = compile("print @;").unwrap_err();
    assert_eq!(errs.0[0].location, ErrorLocation::None);
    assert_eq!(errs.0[0].to_string(), "[line 1] Error: Unexpected character.");
}

#[test]
fn statement_diagnostics() {
    expect_compile_error("if 1) print 1;", "Expect '(' after 'if'.");
    expect_compile_error("if (1 print 1;", "Expect ')' after condition.");
    expect_compile_error("while 1) {}", "Expect '(' after 'while'.");
    expect_compile_error("for var i = 0;;) {}", "Expect '(' after 'for'.");
    expect_compile_error("for (var i = 0; i < 1 i) {}", "Expect ';' after loop condition.");
    expect_compile_error("for (;; print) {}", "Expect expression.");
    expect_compile_error("{ print 1;", "Expect '}' after block.");
    expect_compile_error("(1 + 2;", "Expect ')' after expression.");
    expect_compile_error("1 + 2", "Expect ';' after expression.");
    expect_compile_error("var a = 1", "Expect ';' after variable declaration.");
}

#[test]
fn function_diagnostics() {
    expect_compile_error("fun () {}", "Expect function name.");
    expect_compile_error("fun f {}", "Expect '(' after function name.");
    expect_compile_error("fun f(1) {}", "Expect parameter name.");
    expect_compile_error("fun f(a {}", "Expect ')' after parameters.");
    expect_compile_error("fun f() print 1;", "Expect '{' before function body.");
    expect_compile_error("fun f() { return 1 }", "Expect ';' after return value.");
    expect_compile_error("fun f() {} f(1;", "Expect ')' after arguments.");
}

#[test]
fn return_outside_function() {
    expect_compile_error("return;", "Can't return from top-level code.");
}

#[test]
fn invalid_assignment_target() {
    expect_compile_error("1 = 2;", "Invalid assignment target.");
    expect_compile_error("var a; var b; a + b = 3;", "Invalid assignment target.");
}

#[test]
fn duplicate_local() {
    expect_compile_error(
        "{ var a; var a; }",
        "Already a variable with this name in this scope.",
    );
    // Shadowing in a nested scope is fine
    expect_output("{ var a = 1; { var a = 2; print a; } }", &["2"]);
}

// =============================================================================
// Capacity limits
// =============================================================================

#[test]
fn too_many_constants() {
    let src: String = (0..300).map(|i| format!("{};", i)).collect();
    expect_compile_error(&src, "Too many constants in one chunk.");
}

#[test]
fn too_many_locals() {
    let decls: String = (0..256).map(|i| format!("var v{};", i)).collect();
    expect_compile_error(
        &format!("{{ {} }}", decls),
        "Too many local variables in function.",
    );
}

#[test]
fn too_many_parameters() {
    let params: Vec<String> = (0..256).map(|i| format!("p{}", i)).collect();
    expect_compile_error(
        &format!("fun f({}) {{}}", params.join(", ")),
        "Can't have more than 255 parameters.",
    );
}

#[test]
fn too_many_arguments() {
    let args: Vec<String> = (0..256).map(|_| "nil".to_string()).collect();
    expect_compile_error(
        &format!("fun f() {{}} f({});", args.join(", ")),
        "Can't have more than 255 arguments.",
    );
}

#[test]
fn jump_too_large() {
    // Each statement is two bytes; enough of them overflow a 16-bit jump
    let body = "nil;".repeat(40_000);
    expect_compile_error(
        &format!("if (true) {{ {} }}", body),
        "Too much code to jump over.",
    );
}

#[test]
fn loop_too_large() {
    let body = "nil;".repeat(40_000);
    expect_compile_error(
        &format!("while (false) {{ {} }}", body),
        "Loop body too large.",
    );
}

// =============================================================================
// Nesting depth
// =============================================================================

fn single_error(src: &str) -> String {
    let errs = compile(src).unwrap_err();
    assert_eq!(errs.len(), 1, "{}", errs);
    errs.0[0].message.clone()
}

#[test]
fn deeply_nested_parentheses() {
    let src = format!("print {}1{};", "(".repeat(100_000), ")".repeat(100_000));
    assert_eq!(single_error(&src), "Nesting too deep.");
}

#[test]
fn deeply_nested_unary() {
    let src = format!("print {}1;", "-".repeat(100_000));
    assert_eq!(single_error(&src), "Nesting too deep.");
}

#[test]
fn deeply_nested_blocks() {
    let src = format!("{}{}", "{".repeat(100_000), "}".repeat(100_000));
    assert_eq!(single_error(&src), "Nesting too deep.");
}

#[test]
fn deeply_nested_statements() {
    let src = format!("{}print 1;", "if (true) ".repeat(100_000));
    assert_eq!(single_error(&src), "Nesting too deep.");
}

#[test]
fn deeply_nested_functions() {
    let src = format!("{}{}", "fun f() {".repeat(100_000), "}".repeat(100_000));
    assert_eq!(single_error(&src), "Nesting too deep.");
}

#[test]
fn moderate_nesting_compiles() {
    let src = format!("print {}1{};", "(".repeat(500), ")".repeat(500));
    expect_output(&src, &["1"]);
}
