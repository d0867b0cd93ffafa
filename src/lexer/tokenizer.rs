//! SQL tokenizer.

use crate::parser::ParseError;

use super::position::{is_ident_byte, EOF_LINE};
use super::{Keyword, Position, Token, TokenKind};

/// A lexer that turns SQL text into a token list.
///
/// Whitespace is skipped between tokens; newlines (including paired
/// `\r\n` / `\n\r`) advance the line counter and reset the column.
pub struct Lexer<'a> {
    input: &'a [u8],
    pos: usize,
    line: i32,
    column: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self {
            input: input.as_bytes(),
            pos: 0,
            line: 0,
            column: 0,
        }
    }

    /// Tokenizes the whole input.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] on an unterminated string or identifier,
    /// an invalid escape or number, or a byte with no token mapping.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();

        loop {
            self.skip_whitespace();

            let start = self.position();
            let Some(c) = self.advance() else {
                break;
            };

            let token = match c {
                c if is_ident_byte(c, 0) => self.scan_ident(c, start),
                c if c.is_ascii_digit() => self.scan_number(c, start)?,
                b'"' | b'\'' => self.scan_string(c, start)?,
                b'`' => self.scan_quoted_ident(start)?,
                b'-' if self.peek() == Some(b'-') => self.scan_comment(start),
                b'+' => self.op(TokenKind::Plus, "+", start),
                b'-' => self.op(TokenKind::Minus, "-", start),
                b'*' => self.op(TokenKind::Star, "*", start),
                b'/' => self.op(TokenKind::Slash, "/", start),
                b'%' => self.op(TokenKind::Percent, "%", start),
                b'&' => self.op(TokenKind::BitAnd, "&", start),
                b'=' => self.op(TokenKind::Eq, "=", start),
                b'<' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        self.op(TokenKind::LtEq, "<=", start)
                    } else {
                        self.op(TokenKind::Lt, "<", start)
                    }
                }
                b'>' => match self.peek() {
                    Some(b'=') => {
                        self.advance();
                        self.op(TokenKind::GtEq, ">=", start)
                    }
                    Some(b'>') => {
                        self.advance();
                        self.op(TokenKind::Shr, ">>", start)
                    }
                    _ => self.op(TokenKind::Gt, ">", start),
                },
                b'!' => {
                    if self.peek() == Some(b'=') {
                        self.advance();
                        self.op(TokenKind::NotEq, "!=", start)
                    } else {
                        self.op(TokenKind::Bang, "!", start)
                    }
                }
                b'(' => self.op(TokenKind::LeftParen, "(", start),
                b')' => self.op(TokenKind::RightParen, ")", start),
                b',' => self.op(TokenKind::Comma, ",", start),
                b'.' => self.op(TokenKind::Dot, ".", start),
                b':' => self.op(TokenKind::Colon, ":", start),
                b';' => self.op(TokenKind::Semicolon, ";", start),
                b'?' => self.op(TokenKind::Question, "?", start),
                _ => {
                    return Err(ParseError::new(
                        "Unexpected character",
                        (c as char).to_string(),
                        start,
                    ));
                }
            };

            tokens.push(token);
        }

        Ok(tokens)
    }

    fn position(&self) -> Position {
        if self.pos >= self.input.len() {
            return Position::new(EOF_LINE, 0, 0);
        }
        Position::new(self.line, self.column + 1, 0)
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Consumes one byte, folding `\r` into `\n` and tracking lines.
    fn advance(&mut self) -> Option<u8> {
        let ch = self.peek()?;
        self.pos += 1;

        if ch == b'\n' || ch == b'\r' {
            self.line += 1;
            self.column = 0;
            // a \r\n or \n\r pair counts as one newline
            if let Some(next) = self.peek() {
                if (ch == b'\n' && next == b'\r') || (ch == b'\r' && next == b'\n') {
                    self.pos += 1;
                }
            }
            return Some(b'\n');
        }

        self.column += 1;
        Some(ch)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(b'\t' | b'\r' | b' ' | b'\n')) {
            self.advance();
        }
    }

    fn token(&self, kind: TokenKind, text: String, mut start: Position) -> Token {
        start.length = text.len();
        Token::new(kind, text, start)
    }

    fn op(&self, kind: TokenKind, text: &str, start: Position) -> Token {
        self.token(kind, text.to_owned(), start)
    }

    fn scan_ident(&mut self, first: u8, start: Position) -> Token {
        let mut text = String::new();
        text.push(first as char);
        while self.peek().is_some_and(|c| is_ident_byte(c, 1)) {
            text.push(self.advance().unwrap_or_default() as char);
        }

        let kind = match Keyword::from_str(&text) {
            Some(kw) => TokenKind::Keyword(kw),
            None => TokenKind::Ident,
        };

        self.token(kind, text, start)
    }

    fn scan_quoted_ident(&mut self, start: Position) -> Result<Token, ParseError> {
        let mut text = String::new();
        while self.peek().is_some_and(|c| is_ident_byte(c, 1)) {
            text.push(self.advance().unwrap_or_default() as char);
        }

        if self.advance() != Some(b'`') {
            return Err(ParseError::new("unterminated identifier", text, start));
        }

        Ok(self.token(TokenKind::Ident, text, start))
    }

    fn scan_number(&mut self, first: u8, start: Position) -> Result<Token, ParseError> {
        let mut text = String::new();
        text.push(first as char);
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.advance().unwrap_or_default() as char);
        }

        if self.peek() != Some(b'.') {
            return Ok(self.token(TokenKind::Int, text, start));
        }

        self.advance();
        text.push('.');

        match self.advance() {
            Some(c) if c.is_ascii_digit() => text.push(c as char),
            _ => return Err(ParseError::new("Invalid number", text, start)),
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            text.push(self.advance().unwrap_or_default() as char);
        }

        Ok(self.token(TokenKind::Float, text, start))
    }

    fn scan_string(&mut self, quote: u8, start: Position) -> Result<Token, ParseError> {
        // collected as bytes so multibyte characters pass through intact
        let mut bytes = Vec::new();

        loop {
            let Some(c) = self.advance() else {
                return Err(ParseError::new(
                    "unterminated string",
                    String::from_utf8_lossy(&bytes),
                    self.position(),
                ));
            };

            if c == quote {
                let text = String::from_utf8_lossy(&bytes).into_owned();
                return Ok(self.token(TokenKind::Str, text, start));
            }

            if c == b'\\' {
                let Some(esc) = self.advance() else {
                    return Err(ParseError::new(
                        "unterminated string",
                        String::from_utf8_lossy(&bytes),
                        self.position(),
                    ));
                };
                match esc {
                    b'b' => bytes.push(0x08),
                    b't' => bytes.push(b'\t'),
                    b'n' => bytes.push(b'\n'),
                    b'f' => bytes.push(0x0c),
                    b'r' => bytes.push(b'\r'),
                    b'"' => bytes.push(b'"'),
                    b'\'' => bytes.push(b'\''),
                    b'\\' => bytes.push(b'\\'),
                    _ => {
                        return Err(ParseError::new(
                            "Invalid escape sequence",
                            String::from_utf8_lossy(&bytes),
                            start,
                        ));
                    }
                }
                continue;
            }

            // strings may span lines; advance() already folded \r to \n
            bytes.push(c);
        }
    }

    fn scan_comment(&mut self, start: Position) -> Token {
        let mut bytes = vec![b'-'];
        while let Some(c) = self.peek() {
            if c == b'\n' || c == b'\r' {
                break;
            }
            self.advance();
            bytes.push(c);
        }
        let text = String::from_utf8_lossy(&bytes).into_owned();
        self.token(TokenKind::Comment, text, start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<TokenKind> {
        Lexer::new(input)
            .tokenize()
            .expect("lex failed")
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_empty_input() {
        assert!(kinds("").is_empty());
        assert!(kinds("   \n\t  ").is_empty());
    }

    #[test]
    fn test_negative_number() {
        assert_eq!(kinds("-1"), vec![TokenKind::Minus, TokenKind::Int]);
    }

    #[test]
    fn test_keywords_and_idents() {
        assert_eq!(
            kinds("SELECT * FROM test"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Star,
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_backticked_ident() {
        assert_eq!(
            kinds("SELECT `name` FROM test"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Ident,
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident,
            ]
        );
        let tokens = Lexer::new("`name`").tokenize().unwrap();
        assert_eq!(tokens[0].text, "name");
    }

    #[test]
    fn test_unclosed_backtick() {
        assert!(Lexer::new("`name").tokenize().is_err());
    }

    #[test]
    fn test_comment_token() {
        assert_eq!(kinds("-- foo bar"), vec![TokenKind::Comment]);
        assert_eq!(kinds("8.99 -- foo"), vec![TokenKind::Float, TokenKind::Comment]);
        let tokens = Lexer::new("-- foo bar").tokenize().unwrap();
        assert_eq!(tokens[0].text, "-- foo bar");
    }

    #[test]
    fn test_multiline_string() {
        assert_eq!(
            kinds("SELECT 'asdf\n  asdf' FROM test"),
            vec![
                TokenKind::Keyword(Keyword::Select),
                TokenKind::Str,
                TokenKind::Keyword(Keyword::From),
                TokenKind::Ident,
            ]
        );
    }

    #[test]
    fn test_string_escapes() {
        let tokens = Lexer::new(r#""a\"b\n""#).tokenize().unwrap();
        assert_eq!(tokens[0].text, "a\"b\n");
    }

    #[test]
    fn test_multibyte_string_content() {
        let tokens = Lexer::new("'héllo wörld'").tokenize().unwrap();
        assert_eq!(tokens[0].text, "héllo wörld");
    }

    #[test]
    fn test_invalid_escape() {
        assert!(Lexer::new(r#""a\q""#).tokenize().is_err());
    }

    #[test]
    fn test_unterminated_string() {
        assert!(Lexer::new("'abc").tokenize().is_err());
    }

    #[test]
    fn test_number_with_dot_needs_digit() {
        assert!(Lexer::new("12.x").tokenize().is_err());
    }

    #[test]
    fn test_two_char_operators() {
        assert_eq!(
            kinds("<= >= != >> < > ! ="),
            vec![
                TokenKind::LtEq,
                TokenKind::GtEq,
                TokenKind::NotEq,
                TokenKind::Shr,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Bang,
                TokenKind::Eq,
            ]
        );
    }

    #[test]
    fn test_unknown_byte_is_error() {
        assert!(Lexer::new("select a#b").tokenize().is_err());
        assert!(Lexer::new(r"select asd\a from foo").tokenize().is_err());
    }

    #[test]
    fn test_position_tracking() {
        let tokens = Lexer::new("SELECT\n  id").tokenize().unwrap();
        assert_eq!(tokens[0].pos, Position::new(0, 1, 6));
        assert_eq!(tokens[1].pos, Position::new(1, 3, 2));
    }

    #[test]
    fn test_namespaced_ident_tokens() {
        assert_eq!(
            kinds("fiz:foo:client"),
            vec![
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
            ]
        );
    }
}
