// lox-scanner - Property-based tests for the scanner
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Property-based tests for the scanner.
//!
//! - Scanning arbitrary input never panics and ends in exactly one `Eof`
//! - Every non-error lexeme is the source slice at its offset
//! - Line numbers never decrease

use lox_scanner::{Scanner, TokenKind};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn ends_with_single_eof(src in ".{0,64}") {
        let tokens: Vec<_> = Scanner::new(&src).collect();
        let eofs = tokens.iter().filter(|t| t.kind == TokenKind::Eof).count();
        prop_assert_eq!(eofs, 1);
        prop_assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn lexemes_are_source_spans(src in "[a-z0-9 +*/(){};.=!<>\"\n-]{0,64}") {
        for token in Scanner::new(&src) {
            if token.kind == TokenKind::Error {
                continue;
            }
            prop_assert_eq!(&src[token.offset..token.offset + token.len()], token.lexeme);
        }
    }

    #[test]
    fn lines_are_monotonic(src in "[a-z \n\"]{0,64}") {
        let mut last = 1;
        for token in Scanner::new(&src) {
            prop_assert!(token.line >= last);
            last = token.line;
        }
    }
}

#[test]
fn scans_a_small_program() {
    let src = "fun add(a, b) { return a + b; }\nprint add(1, 2);";
    let kinds: Vec<_> = Scanner::new(src).map(|t| t.kind).collect();
    assert_eq!(kinds.first(), Some(&TokenKind::Fun));
    assert_eq!(kinds.iter().filter(|k| **k == TokenKind::Identifier).count(), 6);
    assert_eq!(kinds.last(), Some(&TokenKind::Eof));
}
