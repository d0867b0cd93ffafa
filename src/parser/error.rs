//! Parse and lex error type.

use core::fmt;

use crate::lexer::{Position, Token};

/// An error produced by the lexer or the parser.
///
/// Carries the offending token's literal and position so callers can
/// point at the failing spot in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub message: String,
    /// The literal text of the offending token.
    pub token: String,
    /// Where it happened.
    pub pos: Position,
}

impl ParseError {
    /// Creates a new error at the given position.
    #[must_use]
    pub fn new(message: impl Into<String>, token: impl Into<String>, pos: Position) -> Self {
        Self {
            message: message.into(),
            token: token.into(),
            pos,
        }
    }

    /// Creates an "unexpected token" error.
    #[must_use]
    pub fn unexpected(tok: &Token) -> Self {
        Self::new(
            format!("Unexpected '{}' ({})", tok.text, tok.kind),
            tok.text.clone(),
            tok.pos,
        )
    }

    /// Creates an "expecting X, got Y" error.
    #[must_use]
    pub fn expecting(expected: impl fmt::Display, tok: &Token) -> Self {
        Self::new(
            format!("Expecting {} got {} ({})", expected, tok.kind, tok.text),
            tok.text.clone(),
            tok.pos,
        )
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.pos)
    }
}

impl std::error::Error for ParseError {}
