//! Crate error types.

use crate::lexer::Position;
use crate::parser::ParseError;

/// Errors produced while writing a statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WriteError {
    /// An emitted identifier failed validation.
    #[error("Invalid identifier {0}")]
    InvalidIdentifier(String),

    /// A table referenced a database other than the writer's.
    #[error("Invalid database {0}")]
    InvalidDatabase(String),

    /// A write statement targeted a table outside the writer's
    /// namespace.
    #[error("Invalid table prefix for a write query: {0}")]
    InvalidTablePrefix(String),

    /// A called function is not on the whitelist.
    #[error("The function {0} is not allowed")]
    FunctionNotAllowed(String),

    /// An inlined IN value was not an integer-like or timestamp value.
    #[error("Invalid IN value {0}")]
    InvalidInValue(String),

    /// The statement cannot be expressed under the selected driver.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The statement is not supported by the selected driver at all.
    #[error("Not supported at {0}")]
    Unsupported(Position),

    /// A rewrite needed a parameter the caller did not supply.
    #[error("Too few parameters. Error processing IN parameter")]
    TooFewParameters,

    /// A GROUP_CONCAT separator contained a disallowed character.
    #[error("Invalid identifier {0}")]
    InvalidSeparator(String),

    /// An ORDER BY entry carried an ordering the driver cannot emit.
    #[error("Invalid order type {0}")]
    InvalidOrderType(String),

    /// A function received arguments it does not take.
    #[error("Expected 0 args")]
    UnexpectedArgs,
}

/// Any error this crate produces.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A lex or parse failure.
    #[error("SQL Parser: {0}")]
    Parse(#[from] ParseError),

    /// A write-time policy or dialect failure.
    #[error(transparent)]
    Write(#[from] WriteError),

    /// The input held a different number of statements than expected.
    #[error("Expected one query, got {0}")]
    StatementCount(usize),

    /// A select entry point parsed something other than a select.
    #[error("The query is not a Select")]
    NotASelect,

    /// A builder operation cannot be applied to the target query.
    #[error("{0}")]
    Builder(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
