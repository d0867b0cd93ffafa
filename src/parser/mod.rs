//! SQL parser.
//!
//! A hand-written recursive descent parser producing [`crate::ast`]
//! nodes from a lexed token buffer.
//!
//! # Parsing approach
//!
//! Statements (`SELECT`, `INSERT`, `UPDATE`, `DELETE`, the DDL forms
//! and `SHOW`) are parsed by dedicated methods dispatched on the
//! leading keyword. Expressions use a layered grammar,
//! left-associative at every level:
//!
//! 1. boolean expression (`OR`)
//! 2. boolean term (`AND`)
//! 3. NOT-factor (`!`)
//! 4. relation (`=`, `!=`, `<`, `<=`, `>`, `>=`, `[NOT] LIKE`,
//!    `[NOT] IN`, `IS [NOT]`, `BETWEEN`)
//! 5. additive (`+`, `-`)
//! 6. multiplicative (`*`, `/`, `%`, `>>`, `&`)
//! 7. signed factor (unary `+`/`-`)
//! 8. factor (literals, `?`, `*`, calls, `GROUP_CONCAT`, columns,
//!    parenthesized expressions and subqueries)
//!
//! Each production is a method on [`Parser`], so the builder can run a
//! single production over a fragment and splice the result into an
//! existing query.

mod core;
mod error;

pub use core::{parse_query, parse_script, Parser};
pub use error::ParseError;
