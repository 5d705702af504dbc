// lox - Command-line front end for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

mod repl;

use std::env;
use std::fs;
use std::process;

use log::debug;
use lox_vm::{InterpretResult, VM};
use rustyline::error::ReadlineError;

use repl::Repl;

const EXIT_USAGE: i32 = 64;
const EXIT_COMPILE_ERROR: i32 = 65;
const EXIT_RUNTIME_ERROR: i32 = 70;
const EXIT_IO_ERROR: i32 = 74;

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    // Handle --version flag
    if args.len() == 2 && (args[1] == "--version" || args[1] == "-v") {
        println!("Lox v{}", env!("CARGO_PKG_VERSION"));
        return;
    }

    match args.len() {
        1 => run_repl(),
        2 => run_file(&args[1]),
        _ => {
            eprintln!("Usage: lox [path]");
            process::exit(EXIT_USAGE);
        }
    }
}

/// Process exit code for an interpreter outcome.
fn exit_code(result: InterpretResult) -> i32 {
    match result {
        InterpretResult::Ok => 0,
        InterpretResult::CompileError => EXIT_COMPILE_ERROR,
        InterpretResult::RuntimeError => EXIT_RUNTIME_ERROR,
    }
}

/// Compile and run a whole file
fn run_file(path: &str) {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Could not read file \"{}\": {}", path, e);
            process::exit(EXIT_IO_ERROR);
        }
    };

    debug!("running {}", path);
    let mut vm = VM::new();
    let code = exit_code(vm.interpret(&source));
    if code != 0 {
        process::exit(code);
    }
}

/// Run the interactive REPL
fn run_repl() {
    let mut repl = match Repl::new() {
        Ok(repl) => repl,
        Err(e) => {
            eprintln!("Failed to start line editor: {}", e);
            process::exit(EXIT_IO_ERROR);
        }
    };

    println!("Lox v{}", env!("CARGO_PKG_VERSION"));

    // One VM for the whole session so globals persist between lines
    let mut vm = VM::new();
    loop {
        match repl.read_line("> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                repl.add_history(&line);
                let result = vm.interpret(&line);
                debug!("repl: {:?}", result);
            }
            // Ctrl-C abandons the current line
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("Read error: {}", e);
                break;
            }
        }
    }

    repl.finalize();
}
