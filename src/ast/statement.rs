//! Statement AST types.

use crate::builder::Value;
use crate::lexer::Position;

use super::ddl::{CreateColumn, TableConstraint};
use super::expression::{ColumnRef, Expr, OrderColumn};

/// A join kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinKind {
    /// Bare `JOIN`.
    Join,
    Left,
    Right,
    Inner,
    Outer,
    Cross,
}

impl JoinKind {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Join => "JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Inner => "INNER JOIN",
            Self::Outer => "OUTER JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

/// A join attached to a FROM table.
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub pos: Position,
    pub kind: JoinKind,
    pub database: Option<String>,
    pub table: String,
    pub alias: Option<String>,
    pub on: Option<Expr>,
}

/// A table in a FROM clause (or the target of UPDATE/DELETE), with its
/// attached joins.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub pos: Position,
    pub name: String,
    pub database: Option<String>,
    pub alias: Option<String>,
    pub joins: Vec<Join>,
}

impl Table {
    /// Creates a plain table reference.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            pos: Position::default(),
            name: name.into(),
            database: None,
            alias: None,
            joins: Vec::new(),
        }
    }

    /// The name the table is referenced by: the alias if present,
    /// otherwise the name.
    #[must_use]
    pub fn ref_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }
}

/// One entry of a FROM list.
#[derive(Debug, Clone, PartialEq)]
pub enum FromItem {
    /// A table, possibly joined.
    Table(Table),
    /// A parenthesized subquery, optionally aliased. The expression is
    /// the parenthesized form itself.
    Subquery { expr: Expr, alias: Option<String> },
}

/// A LIMIT clause. When both values are given the offset comes first
/// in source order.
#[derive(Debug, Clone, PartialEq)]
pub struct Limit {
    pub pos: Position,
    pub row_count: Expr,
    pub offset: Option<Expr>,
}

/// The bare `database.table` target of an INSERT.
#[derive(Debug, Clone, PartialEq)]
pub struct TableName {
    pub pos: Position,
    pub database: Option<String>,
    pub name: String,
}

/// One `col = expr` assignment in an UPDATE SET list.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnValue {
    pub pos: Position,
    pub table: Option<String>,
    pub name: String,
    pub expr: Expr,
}

/// A SELECT query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectQuery {
    pub pos: Position,
    pub distinct: bool,
    pub for_update: bool,
    pub columns: Vec<Expr>,
    pub from: Vec<FromItem>,
    pub where_part: Option<Expr>,
    pub group_by: Vec<Expr>,
    pub having: Option<Expr>,
    pub order_by: Vec<OrderColumn>,
    pub limit: Option<Limit>,
    /// Trailing UNION selects.
    pub union: Vec<SelectQuery>,
    pub params: Vec<Value>,
}

/// An INSERT query. Carries either a VALUES row or a source select.
#[derive(Debug, Clone, PartialEq)]
pub struct InsertQuery {
    pub pos: Position,
    pub table: TableName,
    pub columns: Vec<ColumnRef>,
    pub values: Vec<Expr>,
    pub select: Option<SelectQuery>,
    pub params: Vec<Value>,
}

/// An UPDATE query.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateQuery {
    pub pos: Position,
    pub table: Table,
    pub columns: Vec<ColumnValue>,
    pub where_part: Option<Expr>,
    pub limit: Option<Limit>,
    pub params: Vec<Value>,
}

/// A DELETE query. `aliases` is the multi-table delete list.
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteQuery {
    pub pos: Position,
    pub aliases: Vec<String>,
    pub table: Table,
    pub where_part: Option<Expr>,
    pub limit: Option<Limit>,
    pub params: Vec<Value>,
}

/// What a SHOW statement lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowKind {
    Databases,
    Tables,
    Columns,
    Index,
}

/// A SHOW query.
#[derive(Debug, Clone, PartialEq)]
pub struct ShowQuery {
    pub pos: Position,
    pub kind: ShowKind,
    pub database: Option<String>,
    pub table: Option<String>,
}

/// CREATE DATABASE.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateDatabaseQuery {
    pub pos: Position,
    pub name: String,
    pub if_not_exists: bool,
}

/// CREATE TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTableQuery {
    pub pos: Position,
    pub name: String,
    pub columns: Vec<CreateColumn>,
    pub constraints: Vec<TableConstraint>,
    pub if_not_exists: bool,
}

/// DROP DATABASE.
#[derive(Debug, Clone, PartialEq)]
pub struct DropDatabaseQuery {
    pub pos: Position,
    pub database: String,
    pub if_exists: bool,
}

/// DROP TABLE.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTableQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub if_exists: bool,
}

/// What an `ALTER TABLE ... DROP` removes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlterDropKind {
    Column,
    Index,
}

impl AlterDropKind {
    /// Returns the SQL spelling.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Column => "COLUMN",
            Self::Index => "INDEX",
        }
    }
}

/// `ALTER TABLE t DROP {COLUMN|INDEX} item`.
#[derive(Debug, Clone, PartialEq)]
pub struct AlterDropQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub kind: AlterDropKind,
    pub item: String,
}

/// `ALTER TABLE t ADD [COLUMN] col`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddColumnQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub column: CreateColumn,
}

/// `ALTER TABLE t CHANGE old col`.
#[derive(Debug, Clone, PartialEq)]
pub struct RenameColumnQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub name: String,
    pub column: CreateColumn,
}

/// `ALTER TABLE t MODIFY col`.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifyColumnQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub column: CreateColumn,
}

/// `ALTER TABLE t ADD CONSTRAINT name UNIQUE (cols)`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddConstraintQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub name: String,
    pub columns: Vec<ColumnRef>,
}

/// `ALTER TABLE t ADD CONSTRAINT name FOREIGN KEY ...`.
#[derive(Debug, Clone, PartialEq)]
pub struct AddForeignKeyQuery {
    pub pos: Position,
    pub database: Option<String>,
    pub table: String,
    pub name: String,
    pub column: String,
    pub ref_database: Option<String>,
    pub ref_table: String,
    pub ref_column: String,
    pub delete_cascade: bool,
}

/// A parsed SQL statement.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectQuery),
    Insert(InsertQuery),
    Update(UpdateQuery),
    Delete(DeleteQuery),
    CreateDatabase(CreateDatabaseQuery),
    CreateTable(CreateTableQuery),
    DropDatabase(DropDatabaseQuery),
    DropTable(DropTableQuery),
    AddColumn(AddColumnQuery),
    RenameColumn(RenameColumnQuery),
    ModifyColumn(ModifyColumnQuery),
    AlterDrop(AlterDropQuery),
    AddConstraint(AddConstraintQuery),
    AddForeignKey(AddForeignKeyQuery),
    Show(ShowQuery),
}

impl Statement {
    /// Returns the statement's source position.
    #[must_use]
    pub fn pos(&self) -> Position {
        match self {
            Self::Select(q) => q.pos,
            Self::Insert(q) => q.pos,
            Self::Update(q) => q.pos,
            Self::Delete(q) => q.pos,
            Self::CreateDatabase(q) => q.pos,
            Self::CreateTable(q) => q.pos,
            Self::DropDatabase(q) => q.pos,
            Self::DropTable(q) => q.pos,
            Self::AddColumn(q) => q.pos,
            Self::RenameColumn(q) => q.pos,
            Self::ModifyColumn(q) => q.pos,
            Self::AlterDrop(q) => q.pos,
            Self::AddConstraint(q) => q.pos,
            Self::AddForeignKey(q) => q.pos,
            Self::Show(q) => q.pos,
        }
    }

    /// Returns the statement's parameter list, if it carries one.
    #[must_use]
    pub fn params(&self) -> &[Value] {
        match self {
            Self::Select(q) => &q.params,
            Self::Insert(q) => &q.params,
            Self::Update(q) => &q.params,
            Self::Delete(q) => &q.params,
            _ => &[],
        }
    }
}
