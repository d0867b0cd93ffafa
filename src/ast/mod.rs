//! Abstract syntax tree for the SQL dialect.
//!
//! Three closed node families: [`Statement`], [`FromItem`] and
//! [`Expr`]. Nodes are created by the parser, spliced by the builder,
//! and consumed read-only by the writer.

mod ddl;
mod expression;
mod statement;

pub use ddl::{ColumnType, CreateColumn, TableConstraint};
pub use expression::{
    BinaryOp, Call, ColumnRef, Constant, ConstantKind, Expr, GroupConcat, OrderColumn, OrderKind,
    UnaryOp,
};
pub use statement::{
    AddColumnQuery, AddConstraintQuery, AddForeignKeyQuery, AlterDropKind, AlterDropQuery,
    ColumnValue, CreateDatabaseQuery, CreateTableQuery, DeleteQuery, DropDatabaseQuery,
    DropTableQuery, FromItem, InsertQuery, Join, JoinKind, Limit, ModifyColumnQuery,
    RenameColumnQuery, SelectQuery, ShowKind, ShowQuery, Statement, Table, TableName, UpdateQuery,
};
