//! Dialect-aware SQL writer.
//!
//! Walks a parsed [`Statement`] and emits SQL for one of the two
//! supported drivers while enforcing the writer's policies: database
//! scoping, tenant namespaces, identifier syntax and the function
//! whitelist. Along the way it applies the semantic rewrites (null
//! equality, empty-IN collapse, IN-list inlining and the sqlite3
//! substitutions) and maintains the effective parameter list.

mod ddl;
mod expr;

use std::sync::OnceLock;

use tracing::debug;

use crate::ast::{
    ColumnRef, ColumnValue, DeleteQuery, FromItem, InsertQuery, Join, Limit, SelectQuery,
    Statement, Table, UpdateQuery,
};
use crate::builder::Value;
use crate::error::WriteError;
use crate::lexer::is_ident_byte;

static DEFAULT_WHITELIST: OnceLock<Vec<String>> = OnceLock::new();

/// Sets the process-wide default function whitelist. Returns false if
/// it was already set. Configure once, before queries run; writers
/// with their own [`Writer::whitelist_funcs`] take precedence.
pub fn set_default_whitelist(funcs: Vec<String>) -> bool {
    DEFAULT_WHITELIST.set(funcs).is_ok()
}

pub(crate) fn default_whitelist() -> Option<&'static [String]> {
    DEFAULT_WHITELIST.get().map(Vec::as_slice)
}

/// The SQL dialect to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Driver {
    /// MySQL-flavoured output (the default).
    #[default]
    MySql,
    /// SQLite-flavoured output.
    Sqlite3,
}

impl Driver {
    /// Returns the driver's canonical name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::MySql => "mysql",
            Self::Sqlite3 => "sqlite3",
        }
    }

    pub(crate) const fn is_sqlite(self) -> bool {
        matches!(self, Self::Sqlite3)
    }
}

impl std::str::FromStr for Driver {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "mysql" => Ok(Self::MySql),
            "sqlite3" => Ok(Self::Sqlite3),
            other => Err(format!("Unknown driver {other}")),
        }
    }
}

/// Validates a namespace: `:`-separated identifier segments, no
/// leading `:`.
pub fn validate_namespace(s: &str) -> Result<(), WriteError> {
    for (i, c) in s.bytes().enumerate() {
        if i > 0 && c == b':' {
            continue;
        }
        if !is_ident_byte(c, i) {
            return Err(WriteError::InvalidIdentifier(s.to_owned()));
        }
    }
    Ok(())
}

/// Validates a GROUP_CONCAT separator. Only a small punctuation set is
/// allowed because the separator is emitted inside a quoted literal.
pub(crate) fn validate_separator(s: &str) -> Result<(), String> {
    for c in s.chars() {
        match c {
            ';' | ' ' | ',' | '-' | '_' | '|' => {}
            _ => return Err(format!("Invalid identifier {s}")),
        }
    }
    Ok(())
}

/// Which statement family is currently being emitted. Nested selects
/// save and restore the frame so they never override the outer
/// classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum QueryKind {
    Select,
    Insert,
    Update,
    Delete,
    CreateDatabase,
    CreateTable,
    DropDatabase,
    DropTable,
    AddColumn,
    RenameColumn,
    ModifyColumn,
    AlterDrop,
    AddConstraint,
    AddForeignKey,
    Show,
}

impl From<&Statement> for QueryKind {
    fn from(s: &Statement) -> Self {
        match s {
            Statement::Select(_) => Self::Select,
            Statement::Insert(_) => Self::Insert,
            Statement::Update(_) => Self::Update,
            Statement::Delete(_) => Self::Delete,
            Statement::CreateDatabase(_) => Self::CreateDatabase,
            Statement::CreateTable(_) => Self::CreateTable,
            Statement::DropDatabase(_) => Self::DropDatabase,
            Statement::DropTable(_) => Self::DropTable,
            Statement::AddColumn(_) => Self::AddColumn,
            Statement::RenameColumn(_) => Self::RenameColumn,
            Statement::ModifyColumn(_) => Self::ModifyColumn,
            Statement::AlterDrop(_) => Self::AlterDrop,
            Statement::AddConstraint(_) => Self::AddConstraint,
            Statement::AddForeignKey(_) => Self::AddForeignKey,
            Statement::Show(_) => Self::Show,
        }
    }
}

/// Serializes one statement and returns the SQL text and the effective
/// parameter list.
pub fn to_sql(
    query: &Statement,
    params: Vec<Value>,
    database: Option<&str>,
    driver: Driver,
) -> crate::Result<(String, Vec<Value>)> {
    Writer::new(query, params, database, driver).write()
}

/// Emits a single statement as dialect SQL.
pub struct Writer<'a> {
    /// When set, every table must belong to this database; unqualified
    /// references are prefixed with it.
    pub database: Option<String>,
    /// Tenant namespace prefix applied to table names.
    pub namespace: Option<String>,
    /// Allow write statements to target tables of other namespaces.
    pub namespace_write_all: bool,
    /// Pass `:` namespaces through verbatim without any rewriting.
    pub ignore_namespaces: bool,
    /// Start clauses and joins on fresh lines.
    pub format: bool,
    /// Wrap every emitted identifier in backticks.
    pub escape_idents: bool,
    /// Allowed function names; `None` falls back to the process-wide
    /// default, and no list at all allows everything.
    pub whitelist_funcs: Option<Vec<String>>,

    driver: Driver,
    query: &'a Statement,
    buf: String,
    params: Vec<Value>,
    current: QueryKind,
    /// Number of `?` written so far; indexes the effective parameter
    /// list after any splices.
    param_cursor: usize,
}

impl<'a> Writer<'a> {
    /// Creates a writer over a parsed statement.
    #[must_use]
    pub fn new(
        query: &'a Statement,
        params: Vec<Value>,
        database: Option<&str>,
        driver: Driver,
    ) -> Self {
        Self {
            database: database.map(str::to_owned),
            namespace: None,
            namespace_write_all: false,
            ignore_namespaces: false,
            format: false,
            escape_idents: true,
            whitelist_funcs: None,
            driver,
            query,
            buf: String::new(),
            params,
            current: QueryKind::from(query),
            param_cursor: 0,
        }
    }

    /// Emits the statement, returning the SQL text and the parameters
    /// that survived the rewrites, in source order.
    ///
    /// # Errors
    ///
    /// Returns a [`WriteError`] for any policy or dialect failure. The
    /// buffer contents after a failure are undefined.
    pub fn write(mut self) -> crate::Result<(String, Vec<Value>)> {
        if !self.ignore_namespaces {
            if let Some(ns) = self.namespace.clone() {
                validate_namespace(&ns)?;
            }
        }

        self.current = QueryKind::from(self.query);
        match self.query {
            Statement::Select(s) => self.write_select(s)?,
            Statement::Insert(s) => self.write_insert(s)?,
            Statement::Update(s) => self.write_update(s)?,
            Statement::Delete(s) => self.write_delete(s)?,
            Statement::CreateDatabase(s) => self.write_create_database(s)?,
            Statement::CreateTable(s) => self.write_create_table(s)?,
            Statement::DropDatabase(s) => self.write_drop_database(s)?,
            Statement::DropTable(s) => self.write_drop_table(s)?,
            Statement::AddColumn(s) => self.write_add_column(s)?,
            Statement::RenameColumn(s) => self.write_rename_column(s)?,
            Statement::ModifyColumn(s) => self.write_modify_column(s)?,
            Statement::AlterDrop(s) => self.write_alter_drop(s)?,
            Statement::AddConstraint(s) => self.write_add_constraint(s)?,
            Statement::AddForeignKey(s) => self.write_add_foreign_key(s)?,
            Statement::Show(s) => self.write_show(s)?,
        }

        Ok((self.buf, self.params))
    }

    // --- SELECT ---

    pub(crate) fn write_select(&mut self, s: &SelectQuery) -> Result<(), WriteError> {
        let saved = self.current;
        self.current = QueryKind::Select;
        let result = self.write_select_inner(s);
        self.current = saved;
        result
    }

    fn write_select_inner(&mut self, s: &SelectQuery) -> Result<(), WriteError> {
        self.buf.push_str("SELECT ");

        if s.distinct {
            self.buf.push_str("DISTINCT ");
        }

        for (i, col) in s.columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if self.format {
                self.buf.push_str("\n   ");
            }
            self.write_expr(col)?;
        }

        if !s.from.is_empty() {
            self.clause_break();
            self.buf.push_str("FROM ");

            for (i, from) in s.from.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_from(from)?;
            }
        }

        if let Some(where_part) = &s.where_part {
            self.clause_break();
            self.buf.push_str("WHERE ");
            self.write_expr(where_part)?;
        }

        if !s.group_by.is_empty() {
            self.clause_break();
            self.buf.push_str("GROUP BY ");

            for (i, group) in s.group_by.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_expr(group)?;
            }
        }

        if let Some(having) = &s.having {
            self.clause_break();
            self.buf.push_str("HAVING ");
            self.write_expr(having)?;
        }

        if !s.order_by.is_empty() {
            self.clause_break();
            self.write_order_by(&s.order_by)?;
        }

        if let Some(limit) = &s.limit {
            self.write_limit(limit)?;
        }

        for union in &s.union {
            self.clause_break();
            self.buf.push_str("UNION ");
            self.write_select(union)?;
        }

        if s.for_update {
            self.buf.push_str(" FOR UPDATE");
        }

        Ok(())
    }

    fn clause_break(&mut self) {
        if self.format {
            self.buf.push('\n');
        } else {
            self.buf.push(' ');
        }
    }

    pub(crate) fn write_limit(&mut self, limit: &Limit) -> Result<(), WriteError> {
        self.clause_break();
        self.buf.push_str("LIMIT ");

        if let Some(offset) = &limit.offset {
            self.write_expr(offset)?;
            self.buf.push_str(", ");
        }

        self.write_expr(&limit.row_count)
    }

    fn write_from(&mut self, from: &FromItem) -> Result<(), WriteError> {
        match from {
            FromItem::Table(t) => self.write_from_table(t, false),
            FromItem::Subquery { expr, alias } => {
                self.write_expr(expr)?;
                if let Some(alias) = alias {
                    self.buf.push_str(" AS ");
                    self.write_identifier(alias)?;
                }
                Ok(())
            }
        }
    }

    // --- INSERT / UPDATE / DELETE ---

    fn write_insert(&mut self, s: &InsertQuery) -> Result<(), WriteError> {
        self.buf.push_str("INSERT INTO ");

        self.write_table(s.table.database.as_deref(), &s.table.name, true)?;

        if !s.columns.is_empty() {
            self.buf.push_str(" (");
            for (i, col) in s.columns.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_column_ref(col)?;
            }
            self.buf.push(')');
        }

        if self.format {
            self.buf.push('\n');
        } else {
            self.buf.push(' ');
        }

        if let Some(select) = &s.select {
            return self.write_select(select);
        }

        self.buf.push_str("VALUES (");
        for (i, value) in s.values.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_expr(value)?;
        }
        self.buf.push(')');

        Ok(())
    }

    fn write_update(&mut self, s: &UpdateQuery) -> Result<(), WriteError> {
        if self.driver.is_sqlite() {
            if !s.table.joins.is_empty() {
                return Err(WriteError::InvalidOperation(String::from(
                    "UPDATE JOIN not supported in sqlite3",
                )));
            }
            if s.table.alias.is_some() {
                return Err(WriteError::InvalidOperation(String::from(
                    "UPDATE with Alias not supported in sqlite3",
                )));
            }
        }

        self.buf.push_str("UPDATE ");
        self.write_from_table(&s.table, true)?;

        self.buf.push_str(" SET ");
        for (i, col) in s.columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if self.format {
                self.buf.push_str("\n ");
            }
            self.write_column_value(col)?;
        }

        if let Some(where_part) = &s.where_part {
            if self.format {
                self.buf.push('\n');
            }
            self.buf.push_str(" WHERE ");
            self.write_expr(where_part)?;
        }

        if let Some(limit) = &s.limit {
            self.write_limit(limit)?;
        }

        Ok(())
    }

    fn write_delete(&mut self, s: &DeleteQuery) -> Result<(), WriteError> {
        if self.driver.is_sqlite() {
            if !s.table.joins.is_empty() {
                return Err(WriteError::InvalidOperation(String::from(
                    "UPDATE JOIN not supported in sqlite3",
                )));
            }
            if s.table.alias.is_some() {
                return Err(WriteError::InvalidOperation(String::from(
                    "UPDATE with Alias not supported in sqlite3",
                )));
            }
        }

        self.buf.push_str("DELETE");

        // a zero- or one-entry alias list is omitted
        if s.aliases.len() > 1 {
            self.buf.push(' ');
            for (i, alias) in s.aliases.iter().enumerate() {
                if i > 0 {
                    self.buf.push_str(", ");
                }
                self.write_identifier(alias)?;
            }
        }

        self.buf.push_str(" FROM ");
        self.write_from_table(&s.table, true)?;

        if let Some(where_part) = &s.where_part {
            if self.format {
                self.buf.push('\n');
            }
            self.buf.push_str(" WHERE ");
            self.write_expr(where_part)?;
        }

        if let Some(limit) = &s.limit {
            self.write_limit(limit)?;
        }

        Ok(())
    }

    fn write_column_value(&mut self, col: &ColumnValue) -> Result<(), WriteError> {
        if let Some(table) = &col.table {
            self.write_identifier(table)?;
            self.buf.push('.');
        }
        self.write_identifier(&col.name)?;
        self.buf.push_str(" = ");
        self.write_expr(&col.expr)
    }

    pub(crate) fn write_column_ref(&mut self, col: &ColumnRef) -> Result<(), WriteError> {
        if let Some(table) = &col.table {
            self.write_identifier(table)?;
            self.buf.push('.');
        }
        self.write_identifier(&col.name)?;
        if let Some(alias) = &col.alias {
            self.buf.push_str(" AS ");
            self.write_identifier(alias)?;
        }
        Ok(())
    }

    // --- tables, namespaces and identifiers ---

    fn validate_database(&self, name: Option<&str>) -> bool {
        if let (Some(database), Some(name)) = (self.database.as_deref(), name) {
            if !name.is_empty() && name != database {
                return false;
            }
        }
        true
    }

    /// Emits a table reference. `is_write` marks statements that
    /// modify data, which the namespace policy restricts to the
    /// writer's own namespace.
    pub(crate) fn write_table(
        &mut self,
        database: Option<&str>,
        table: &str,
        is_write: bool,
    ) -> Result<(), WriteError> {
        if !self.validate_database(database) {
            return Err(WriteError::InvalidDatabase(
                database.unwrap_or_default().to_owned(),
            ));
        }

        let table = self.prefix_table_name(table, is_write)?;

        let database = database
            .map(str::to_owned)
            .or_else(|| self.database.clone());

        if let Some(database) = database {
            if self.driver.is_sqlite() {
                // sqlite has no database namespace: fuse into a single
                // identifier to avoid emitting `db`_`table`
                return self.write_identifier(&format!("{database}_{table}"));
            }

            self.write_identifier(&database)?;
            self.buf.push('.');
        }

        self.write_identifier(&table)
    }

    pub(crate) fn write_from_table(
        &mut self,
        table: &Table,
        is_write: bool,
    ) -> Result<(), WriteError> {
        self.write_table(table.database.as_deref(), &table.name, is_write)?;

        if let Some(alias) = &table.alias {
            self.buf.push_str(" AS ");
            self.write_identifier(alias)?;
        }

        self.write_joins(&table.joins)
    }

    fn prefix_table_name(&mut self, table: &str, is_write: bool) -> Result<String, WriteError> {
        if self.ignore_namespaces {
            return Ok(table.to_owned());
        }

        let Some(namespace) = self.namespace.clone().filter(|n| !n.is_empty()) else {
            // no namespace configured: still rewrite foreign separators
            if table.contains(':') {
                return Ok(table.replace(':', "_"));
            }
            return Ok(table.to_owned());
        };

        validate_namespace(&namespace)?;
        self.add_namespace(table, &namespace, is_write)
    }

    fn add_namespace(
        &self,
        table: &str,
        namespace: &str,
        is_write: bool,
    ) -> Result<String, WriteError> {
        if !table.contains(':') {
            return Ok(format!("{}_{table}", namespace.replace(':', "_")));
        }

        if is_write && !self.namespace_write_all && !table.starts_with(&format!("{namespace}:")) {
            debug!(table, namespace, kind = ?self.current, "rejected cross-namespace write");
            return Err(WriteError::InvalidTablePrefix(table.to_owned()));
        }

        Ok(table.replace(':', "_"))
    }

    pub(crate) fn write_joins(&mut self, joins: &[Join]) -> Result<(), WriteError> {
        for join in joins {
            self.write_join(join)?;
        }
        Ok(())
    }

    fn write_join(&mut self, join: &Join) -> Result<(), WriteError> {
        self.clause_break();

        self.buf.push_str(join.kind.as_str());
        self.buf.push(' ');

        self.write_table(join.database.as_deref(), &join.table, false)?;

        if let Some(alias) = &join.alias {
            self.buf.push_str(" AS ");
            self.write_identifier(alias)?;
        }

        if let Some(on) = &join.on {
            self.buf.push_str(" ON ");
            self.write_expr(on)?;
        }

        Ok(())
    }

    pub(crate) fn write_identifier(&mut self, s: &str) -> Result<(), WriteError> {
        let valid = if self.ignore_namespaces {
            expr::namespaced_ident_re().is_match(s)
        } else {
            expr::ident_re().is_match(s)
        };
        if !valid {
            return Err(WriteError::InvalidIdentifier(s.to_owned()));
        }

        if self.escape_idents {
            self.buf.push('`');
        }
        self.buf.push_str(s);
        if self.escape_idents {
            self.buf.push('`');
        }

        Ok(())
    }

    /// Emits a bare alphanumeric chunk (sizes, constraint words)
    /// without escaping.
    pub(crate) fn write_unescaped_alphanumeric(&mut self, s: &str) -> Result<(), WriteError> {
        if !expr::alnum_re().is_match(s) {
            return Err(WriteError::InvalidIdentifier(s.to_owned()));
        }
        self.buf.push_str(s);
        Ok(())
    }

    /// Emits a DEFAULT literal: alphanumeric, optionally wrapped in
    /// quotes.
    pub(crate) fn write_quoted_alphanumeric(&mut self, s: &str) -> Result<(), WriteError> {
        let bytes = s.as_bytes();
        let last = bytes.len().saturating_sub(1);
        for (i, &c) in bytes.iter().enumerate() {
            if (i == 0 || i == last) && (c == b'\'' || c == b'"') {
                continue;
            }
            if !is_ident_byte(c, 1) {
                return Err(WriteError::InvalidIdentifier(s.to_owned()));
            }
        }
        self.buf.push_str(s);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_namespace() {
        assert!(validate_namespace("foo").is_ok());
        assert!(validate_namespace("fiz:foo").is_ok());
        assert!(validate_namespace("").is_ok());
        assert!(validate_namespace(":foo").is_err());
        assert!(validate_namespace("fiz;foo").is_err());
    }

    #[test]
    fn test_validate_separator() {
        assert!(validate_separator(";").is_ok());
        assert!(validate_separator(" - ").is_ok());
        assert!(validate_separator("';").is_err());
        assert!(validate_separator("a").is_err());
    }

    #[test]
    fn test_driver_parsing() {
        assert_eq!("mysql".parse::<Driver>(), Ok(Driver::MySql));
        assert_eq!("".parse::<Driver>(), Ok(Driver::MySql));
        assert_eq!("sqlite3".parse::<Driver>(), Ok(Driver::Sqlite3));
        assert!("postgres".parse::<Driver>().is_err());
    }
}
