// lox-vm - Bytecode compiler and virtual machine for the Lox programming language
// Copyright (c) 2025 The lox contributors. MIT licensed.

//! Precedence table for the expression parser.

use lox_scanner::TokenKind;

use super::Compiler;

/// Binding power of an operator, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    None,
    Assignment, // =
    Or,         // or
    And,        // and
    Equality,   // == !=
    Comparison, // < > <= >=
    Term,       // + -
    Factor,     // * /
    Unary,      // ! -
    Call,       // ()
    Primary,
}

impl Precedence {
    /// The next-higher level. Used to make binary operators left-associative.
    pub fn next(self) -> Precedence {
        match self {
            Precedence::None => Precedence::Assignment,
            Precedence::Assignment => Precedence::Or,
            Precedence::Or => Precedence::And,
            Precedence::And => Precedence::Equality,
            Precedence::Equality => Precedence::Comparison,
            Precedence::Comparison => Precedence::Term,
            Precedence::Term => Precedence::Factor,
            Precedence::Factor => Precedence::Unary,
            Precedence::Unary => Precedence::Call,
            Precedence::Call | Precedence::Primary => Precedence::Primary,
        }
    }
}

/// A prefix or infix parse handler. The flag says whether an `=` may follow.
pub type ParseFn<'src> = fn(&mut Compiler<'src>, bool);

/// The parse rule for one token kind.
pub struct ParseRule<'src> {
    pub prefix: Option<ParseFn<'src>>,
    pub infix: Option<ParseFn<'src>>,
    pub precedence: Precedence,
}

impl<'src> ParseRule<'src> {
    fn new(
        prefix: Option<ParseFn<'src>>,
        infix: Option<ParseFn<'src>>,
        precedence: Precedence,
    ) -> Self {
        Self {
            prefix,
            infix,
            precedence,
        }
    }
}

pub fn get_rule<'src>(kind: TokenKind) -> ParseRule<'src> {
    use TokenKind as T;

    match kind {
        T::LeftParen => ParseRule::new(
            Some(Compiler::grouping),
            Some(Compiler::call),
            Precedence::Call,
        ),
        T::Minus => ParseRule::new(
            Some(Compiler::unary),
            Some(Compiler::binary),
            Precedence::Term,
        ),
        T::Plus => ParseRule::new(None, Some(Compiler::binary), Precedence::Term),
        T::Slash | T::Star => ParseRule::new(None, Some(Compiler::binary), Precedence::Factor),
        T::Bang => ParseRule::new(Some(Compiler::unary), None, Precedence::None),
        T::BangEqual | T::EqualEqual => {
            ParseRule::new(None, Some(Compiler::binary), Precedence::Equality)
        }
        T::Greater | T::GreaterEqual | T::Less | T::LessEqual => {
            ParseRule::new(None, Some(Compiler::binary), Precedence::Comparison)
        }
        T::Identifier => ParseRule::new(Some(Compiler::variable), None, Precedence::None),
        T::String => ParseRule::new(Some(Compiler::string), None, Precedence::None),
        T::Number => ParseRule::new(Some(Compiler::number), None, Precedence::None),
        T::And => ParseRule::new(None, Some(Compiler::and), Precedence::And),
        T::Or => ParseRule::new(None, Some(Compiler::or), Precedence::Or),
        T::False | T::Nil | T::True => {
            ParseRule::new(Some(Compiler::literal), None, Precedence::None)
        }
        _ => ParseRule::new(None, None, Precedence::None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        assert!(Precedence::Assignment < Precedence::Or);
        assert!(Precedence::Term < Precedence::Factor);
        assert_eq!(Precedence::Term.next(), Precedence::Factor);
        assert_eq!(Precedence::Primary.next(), Precedence::Primary);
    }

    #[test]
    fn test_rules() {
        assert_eq!(get_rule(TokenKind::Star).precedence, Precedence::Factor);
        assert!(get_rule(TokenKind::Minus).prefix.is_some());
        assert!(get_rule(TokenKind::Plus).prefix.is_none());
        assert!(get_rule(TokenKind::Semicolon).infix.is_none());
    }
}
