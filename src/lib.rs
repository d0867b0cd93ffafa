//! # sqlgate
//!
//! A SQL parser, AST builder and dialect-aware writer for embedding in
//! an application tier that constructs, restricts and rewrites SQL on
//! behalf of user code.
//!
//! The pipeline is lexer → parser → AST → writer:
//!
//! - [`parse_query`] / [`parse_script`] turn text into typed
//!   [`ast::Statement`] trees,
//! - the builder methods on [`ast::SelectQuery`], [`ast::UpdateQuery`]
//!   and [`ast::DeleteQuery`] splice parsed fragments into an existing
//!   tree,
//! - [`Writer`] (or the [`to_sql`] shortcut) emits MySQL- or
//!   SQLite-flavoured SQL, enforcing database scoping, tenant
//!   namespaces and a function whitelist, and applying a small set of
//!   semantic rewrites.
//!
//! ## Parsing and writing
//!
//! ```rust
//! use sqlgate::{parse_query, to_sql, Driver};
//!
//! let q = parse_query("select * from users where id = ?")?;
//! let (sql, params) = to_sql(&q, vec![1_i64.into()], None, Driver::MySql)?;
//! assert_eq!(sql, "SELECT * FROM `users` WHERE `id` = ?");
//! assert_eq!(params.len(), 1);
//! # Ok::<(), sqlgate::Error>(())
//! ```
//!
//! ## Building on a parsed query
//!
//! ```rust
//! use sqlgate::{parse_select, Driver, Writer};
//!
//! let mut q = parse_select("select * from users", [])?;
//! q.and_where("status = ?", [2_i64.into()])?;
//! q.limit(10);
//!
//! let stmt = sqlgate::ast::Statement::Select(q.clone());
//! let mut w = Writer::new(&stmt, q.params.clone(), None, Driver::MySql);
//! w.escape_idents = false;
//! let (sql, _params) = w.write()?;
//! assert_eq!(sql, "SELECT * FROM users WHERE status = ? LIMIT 10");
//! # Ok::<(), sqlgate::Error>(())
//! ```
//!
//! ## Scoping and namespaces
//!
//! With [`Writer::database`] set, every table must belong to that
//! database and unqualified references are prefixed with it. With
//! [`Writer::namespace`] set, table names gain a tenant prefix
//! (`ns_table`); write statements may only target the writer's own
//! namespace unless [`Writer::namespace_write_all`] is set. Namespaces
//! use `:` in the input (`fiz:foo:client`) and `_` in the output.

pub mod ast;
pub mod builder;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod writer;

pub use builder::{
    column_names, parse_order_by, parse_select, parse_where, select_column_names, Value,
};
pub use error::{Error, Result, WriteError};
pub use lexer::{Lexer, Position, Token, TokenKind};
pub use parser::{parse_query, parse_script, ParseError, Parser};
pub use writer::{set_default_whitelist, to_sql, validate_namespace, Driver, Writer};
