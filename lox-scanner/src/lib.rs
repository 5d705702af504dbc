// lox-scanner - Lexer for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! # lox-scanner
//!
//! Lexer for the Lox programming language.
//! Produces a lazy stream of [`Token`]s borrowing from the source string.

pub mod scanner;
pub mod token;

pub use scanner::Scanner;
pub use token::{Token, TokenKind};
