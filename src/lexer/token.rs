//! Token types for the SQL lexer.

use core::fmt;

use super::Position;

/// SQL keywords recognized by the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // Data Definition Language (DDL)
    Create,
    Show,
    Drop,
    Alter,
    Table,
    Database,
    Not,
    Exists,
    Constraint,

    // Column types
    Int,
    Decimal,
    Char,
    Varchar,
    Text,
    MediumText,
    Bool,
    Blob,
    DateTime,
    Default,

    // Data Manipulation Language (DML)
    Select,
    Distinct,
    Insert,
    Into,
    Values,
    Update,
    Set,
    Delete,
    From,
    Where,
    Group,
    Having,

    // Joins
    Join,
    Left,
    Right,
    Inner,
    Outer,
    Cross,
    On,
    As,

    // Relations
    In,
    Between,
    Is,
    Like,

    // Ordering
    Order,
    By,
    Asc,
    Desc,
    Random,
    Limit,

    // Logical operators and constants
    And,
    Or,
    Null,
    True,
    False,

    For,
    Union,
}

impl Keyword {
    /// Looks up a reserved word (case-insensitive).
    #[must_use]
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Self::Create),
            "SHOW" => Some(Self::Show),
            "DROP" => Some(Self::Drop),
            "ALTER" => Some(Self::Alter),
            "TABLE" => Some(Self::Table),
            "DATABASE" => Some(Self::Database),
            "NOT" => Some(Self::Not),
            "EXISTS" => Some(Self::Exists),
            "CONSTRAINT" => Some(Self::Constraint),
            "INT" => Some(Self::Int),
            "DECIMAL" => Some(Self::Decimal),
            "CHAR" => Some(Self::Char),
            "VARCHAR" => Some(Self::Varchar),
            "TEXT" => Some(Self::Text),
            "MEDIUMTEXT" => Some(Self::MediumText),
            "BOOL" => Some(Self::Bool),
            "BLOB" => Some(Self::Blob),
            "DATETIME" => Some(Self::DateTime),
            "DEFAULT" => Some(Self::Default),
            "SELECT" => Some(Self::Select),
            "DISTINCT" => Some(Self::Distinct),
            "INSERT" => Some(Self::Insert),
            "INTO" => Some(Self::Into),
            "VALUES" => Some(Self::Values),
            "UPDATE" => Some(Self::Update),
            "SET" => Some(Self::Set),
            "DELETE" => Some(Self::Delete),
            "FROM" => Some(Self::From),
            "WHERE" => Some(Self::Where),
            "GROUP" => Some(Self::Group),
            "HAVING" => Some(Self::Having),
            "JOIN" => Some(Self::Join),
            "LEFT" => Some(Self::Left),
            "RIGHT" => Some(Self::Right),
            "INNER" => Some(Self::Inner),
            "OUTER" => Some(Self::Outer),
            "CROSS" => Some(Self::Cross),
            "ON" => Some(Self::On),
            "AS" => Some(Self::As),
            "IN" => Some(Self::In),
            "BETWEEN" => Some(Self::Between),
            "IS" => Some(Self::Is),
            "LIKE" => Some(Self::Like),
            "ORDER" => Some(Self::Order),
            "BY" => Some(Self::By),
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            "RANDOM" => Some(Self::Random),
            "LIMIT" => Some(Self::Limit),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            "NULL" => Some(Self::Null),
            "TRUE" => Some(Self::True),
            "FALSE" => Some(Self::False),
            "FOR" => Some(Self::For),
            "UNION" => Some(Self::Union),
            _ => None,
        }
    }

    /// Returns the keyword as its canonical upper-case word.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Show => "SHOW",
            Self::Drop => "DROP",
            Self::Alter => "ALTER",
            Self::Table => "TABLE",
            Self::Database => "DATABASE",
            Self::Not => "NOT",
            Self::Exists => "EXISTS",
            Self::Constraint => "CONSTRAINT",
            Self::Int => "INT",
            Self::Decimal => "DECIMAL",
            Self::Char => "CHAR",
            Self::Varchar => "VARCHAR",
            Self::Text => "TEXT",
            Self::MediumText => "MEDIUMTEXT",
            Self::Bool => "BOOL",
            Self::Blob => "BLOB",
            Self::DateTime => "DATETIME",
            Self::Default => "DEFAULT",
            Self::Select => "SELECT",
            Self::Distinct => "DISTINCT",
            Self::Insert => "INSERT",
            Self::Into => "INTO",
            Self::Values => "VALUES",
            Self::Update => "UPDATE",
            Self::Set => "SET",
            Self::Delete => "DELETE",
            Self::From => "FROM",
            Self::Where => "WHERE",
            Self::Group => "GROUP",
            Self::Having => "HAVING",
            Self::Join => "JOIN",
            Self::Left => "LEFT",
            Self::Right => "RIGHT",
            Self::Inner => "INNER",
            Self::Outer => "OUTER",
            Self::Cross => "CROSS",
            Self::On => "ON",
            Self::As => "AS",
            Self::In => "IN",
            Self::Between => "BETWEEN",
            Self::Is => "IS",
            Self::Like => "LIKE",
            Self::Order => "ORDER",
            Self::By => "BY",
            Self::Asc => "ASC",
            Self::Desc => "DESC",
            Self::Random => "RANDOM",
            Self::Limit => "LIMIT",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Null => "NULL",
            Self::True => "TRUE",
            Self::False => "FALSE",
            Self::For => "FOR",
            Self::Union => "UNION",
        }
    }
}

/// The kind of token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Lexing failure sentinel.
    Error,
    /// End of input.
    Eof,
    /// `--` comment, dropped by the parser.
    Comment,

    /// A reserved word.
    Keyword(Keyword),

    /// Identifier (columns, tables, functions...).
    Ident,
    /// Integer literal.
    Int,
    /// Float literal.
    Float,
    /// String literal.
    Str,

    /// +
    Plus,
    /// -
    Minus,
    /// *
    Star,
    /// /
    Slash,
    /// %
    Percent,
    /// &
    BitAnd,
    /// >>
    Shr,
    /// =
    Eq,
    /// <
    Lt,
    /// >
    Gt,
    /// !
    Bang,
    /// !=
    NotEq,
    /// <=
    LtEq,
    /// >=
    GtEq,
    /// (
    LeftParen,
    /// )
    RightParen,
    /// ,
    Comma,
    /// .
    Dot,
    /// :
    Colon,
    /// ;
    Semicolon,
    /// ?
    Question,
}

impl TokenKind {
    /// Canonical display name, used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Eof => "EOF",
            Self::Comment => "COMMENT",
            Self::Keyword(kw) => kw.as_str(),
            Self::Ident => "IDENT",
            Self::Int => "INT",
            Self::Float => "FLOAT",
            Self::Str => "STRING",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Percent => "%",
            Self::BitAnd => "&",
            Self::Shr => ">>",
            Self::Eq => "=",
            Self::Lt => "<",
            Self::Gt => ">",
            Self::Bang => "!",
            Self::NotEq => "!=",
            Self::LtEq => "<=",
            Self::GtEq => ">=",
            Self::LeftParen => "(",
            Self::RightParen => ")",
            Self::Comma => ",",
            Self::Dot => ".",
            Self::Colon => ":",
            Self::Semicolon => ";",
            Self::Question => "?",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A token with its literal text and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// The literal text as it appeared in the source.
    pub text: String,
    /// The location in the source.
    pub pos: Position,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, text: String, pos: Position) -> Self {
        Self { kind, text, pos }
    }

    /// A position-less token, used when the builder splices synthetic
    /// tokens in front of a fragment.
    #[must_use]
    pub fn synthetic(kind: TokenKind) -> Self {
        Self {
            kind,
            text: String::new(),
            pos: Position::default(),
        }
    }

    /// Returns true if this is an EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }

    /// Returns the keyword if this token is one.
    #[must_use]
    pub const fn as_keyword(&self) -> Option<Keyword> {
        match self.kind {
            TokenKind::Keyword(kw) => Some(kw),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_from_str() {
        assert_eq!(Keyword::from_str("SELECT"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("select"), Some(Keyword::Select));
        assert_eq!(Keyword::from_str("MeDiUmTeXt"), Some(Keyword::MediumText));
        assert_eq!(Keyword::from_str("not_a_keyword"), None);
    }

    #[test]
    fn test_keyword_as_str() {
        assert_eq!(Keyword::Select.as_str(), "SELECT");
        assert_eq!(Keyword::MediumText.as_str(), "MEDIUMTEXT");
        assert_eq!(Keyword::For.as_str(), "FOR");
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(TokenKind::Keyword(Keyword::From).name(), "FROM");
        assert_eq!(TokenKind::Shr.name(), ">>");
        assert_eq!(TokenKind::Ident.name(), "IDENT");
    }

    #[test]
    fn test_token_as_keyword() {
        let tok = Token::synthetic(TokenKind::Keyword(Keyword::Join));
        assert_eq!(tok.as_keyword(), Some(Keyword::Join));
        assert_eq!(Token::synthetic(TokenKind::Plus).as_keyword(), None);
    }
}
