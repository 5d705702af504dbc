// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Bytecode compiler: transforms Lox source to bytecode in a single pass.
//!
//! There is no syntax tree. A recursive-descent statement parser and a
//! precedence-climbing expression parser pull tokens from the scanner and
//! emit bytecode as each production is recognised:
//! 1. `statements` handles declarations, statements and function bodies
//! 2. `expressions` handles prefix and infix expression handlers
//! 3. `scope` resolves locals to stack slots and globals to names
//! 4. `emit` writes bytes and back-patches jumps
//!
//! Syntax errors put the parser in panic mode. Further reports are
//! suppressed until it resynchronises at a statement boundary, so every
//! genuine fault is reported once and the rest of the input is still
//! checked.

pub mod emit;
pub mod expressions;
pub mod rules;
pub mod scope;
pub mod statements;
pub mod types;

use std::rc::Rc;

use log::{Level, debug, log_enabled, trace};
use lox_scanner::{Scanner, Token, TokenKind};

use crate::debug::disassemble_chunk;
use crate::limits::MAX_NESTING;
use crate::object::Function;

pub use rules::{ParseRule, Precedence};
pub use types::{
    CompileError, CompileErrors, ErrorLocation, FunctionKind, FunctionState, Local, Result,
};

/// Compile a whole program to its top-level script function.
///
/// Returns every diagnostic on failure; no bytecode is produced for a
/// program with errors.
pub fn compile(source: &str) -> Result<Function> {
    Compiler::new(source).compile()
}

/// Single-pass compiler state: parser position plus the stack of function
/// contexts mirroring the lexical nesting of function declarations.
pub struct Compiler<'src> {
    scanner: Scanner<'src>,
    current: Token<'src>,
    previous: Token<'src>,
    errors: Vec<CompileError>,
    panic_mode: bool,

    /// Current recursion depth of the parser.
    depth: usize,

    /// Set once nesting exceeds [`MAX_NESTING`]; the rest of the input is
    /// skipped and no further errors are reported.
    too_deep: bool,

    /// Context of the innermost function being compiled.
    state: FunctionState<'src>,

    /// Contexts of the enclosing functions, outermost first.
    enclosing: Vec<FunctionState<'src>>,
}

impl<'src> Compiler<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            scanner: Scanner::new(source),
            current: Token::synthetic(""),
            previous: Token::synthetic(""),
            errors: Vec::new(),
            panic_mode: false,
            depth: 0,
            too_deep: false,
            state: FunctionState::new(FunctionKind::Script, None),
            enclosing: Vec::new(),
        }
    }

    /// Compile the source to completion.
    pub fn compile(mut self) -> Result<Function> {
        trace!("compile: start");
        self.advance();
        while !self.matches(TokenKind::Eof) {
            self.declaration();
        }
        let function = self.end_function();

        if self.errors.is_empty() {
            Ok(function)
        } else {
            debug!("compile: {} error(s)", self.errors.len());
            Err(CompileErrors(self.errors))
        }
    }

    // =========================================================================
    // Function contexts
    // =========================================================================

    /// Start compiling a nested function body.
    fn begin_function(&mut self, kind: FunctionKind, name: Rc<str>) {
        let outer = std::mem::replace(&mut self.state, FunctionState::new(kind, Some(name)));
        self.enclosing.push(outer);
    }

    /// Finish the innermost function and resume its enclosing context.
    fn end_function(&mut self) -> Function {
        self.emit_return();

        let outer = self
            .enclosing
            .pop()
            .unwrap_or_else(|| FunctionState::new(FunctionKind::Script, None));
        let finished = std::mem::replace(&mut self.state, outer);
        let function = finished.function;

        if self.errors.is_empty() && log_enabled!(Level::Debug) {
            let name = function
                .name
                .as_deref()
                .map_or_else(|| "<script>".to_string(), str::to_string);
            debug!("\n{}", disassemble_chunk(&function.chunk, &name));
        }

        function
    }

    // =========================================================================
    // Token stream
    // =========================================================================

    fn advance(&mut self) {
        self.previous = self.current;
        loop {
            self.current = self.scanner.scan_token();
            if self.current.kind != TokenKind::Error {
                break;
            }
            let message = self.current.lexeme;
            self.error_at_current(message);
        }
    }

    fn consume(&mut self, kind: TokenKind, message: &str) {
        if self.current.kind == kind {
            self.advance();
        } else {
            self.error_at_current(message);
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        if !self.check(kind) {
            return false;
        }
        self.advance();
        true
    }

    // =========================================================================
    // Nesting
    // =========================================================================

    /// Descend one level. Past [`MAX_NESTING`] this reports an error, skips
    /// to the end of input and returns false.
    fn enter_nesting(&mut self) -> bool {
        if self.depth >= MAX_NESTING {
            self.error_at_current("Nesting too deep.");
            self.too_deep = true;
            while !self.check(TokenKind::Eof) {
                self.advance();
            }
            return false;
        }
        self.depth += 1;
        true
    }

    fn leave_nesting(&mut self) {
        self.depth -= 1;
    }

    // =========================================================================
    // Error reporting
    // =========================================================================

    fn error_at_current(&mut self, message: &str) {
        self.error_at(self.current, message);
    }

    fn error(&mut self, message: &str) {
        self.error_at(self.previous, message);
    }

    fn error_at(&mut self, token: Token<'src>, message: &str) {
        if self.panic_mode || self.too_deep {
            return;
        }
        self.panic_mode = true;

        let location = match token.kind {
            TokenKind::Eof => ErrorLocation::AtEnd,
            TokenKind::Error => ErrorLocation::None,
            _ => ErrorLocation::At(token.lexeme.to_string()),
        };
        self.errors.push(CompileError {
            line: token.line,
            location,
            message: message.to_string(),
        });
    }

    /// Skip tokens until a likely statement boundary.
    fn synchronize(&mut self) {
        self.panic_mode = false;

        while self.current.kind != TokenKind::Eof {
            if self.previous.kind == TokenKind::Semicolon {
                return;
            }
            match self.current.kind {
                TokenKind::Class
                | TokenKind::Fun
                | TokenKind::Var
                | TokenKind::For
                | TokenKind::If
                | TokenKind::While
                | TokenKind::Print
                | TokenKind::Return => return,
                _ => self.advance(),
            }
        }
    }
}
