//! DDL and SHOW statement emission.

use crate::ast::{
    AddColumnQuery, AddConstraintQuery, AddForeignKeyQuery, AlterDropQuery, ColumnType,
    CreateColumn, CreateDatabaseQuery, CreateTableQuery, DropDatabaseQuery, DropTableQuery,
    ModifyColumnQuery, RenameColumnQuery, ShowKind, ShowQuery, TableConstraint,
};
use crate::error::WriteError;

use super::Writer;

impl Writer<'_> {
    pub(crate) fn write_create_database(
        &mut self,
        s: &CreateDatabaseQuery,
    ) -> Result<(), WriteError> {
        if self.driver.is_sqlite() {
            return Err(WriteError::Unsupported(s.pos));
        }

        self.buf.push_str("CREATE DATABASE ");
        if s.if_not_exists {
            self.buf.push_str("IF NOT EXISTS ");
        }
        self.write_identifier(&s.name)
    }

    pub(crate) fn write_create_table(&mut self, s: &CreateTableQuery) -> Result<(), WriteError> {
        self.buf.push_str("CREATE TABLE ");

        if s.if_not_exists {
            self.buf.push_str("IF NOT EXISTS ");
        }

        let database = self.database.clone();
        self.write_table(database.as_deref(), &s.name, true)?;

        self.buf.push_str(" (");

        let mut key: Option<&CreateColumn> = None;

        for (i, col) in s.columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            if self.format {
                self.buf.push_str("\n\t");
            }

            self.write_create_column(col)?;

            if key.is_none() && col.key {
                key = Some(col);
            }
        }

        if !self.driver.is_sqlite() {
            if let Some(key) = key {
                self.buf.push_str(", ");
                if self.format {
                    self.buf.push_str("\n\t");
                }
                self.buf.push_str("PRIMARY KEY(");
                self.write_identifier(&key.name)?;
                self.buf.push(')');
            }
        }

        for constraint in &s.constraints {
            if self.format {
                self.buf.push('\n');
            }
            match constraint {
                TableConstraint::Unique { name, columns } => {
                    self.write_unique_constraint(name, columns)?;
                }
                TableConstraint::ForeignKey {
                    name,
                    column,
                    ref_table,
                    ref_column,
                    delete_cascade,
                } => {
                    self.write_fk_constraint(name, column, ref_table, ref_column, *delete_cascade)?;
                }
            }
        }

        if self.format {
            self.buf.push('\n');
        }
        self.buf.push(')');

        if !self.driver.is_sqlite() {
            self.buf.push_str(" ENGINE=InnoDb");
            self.buf.push_str(" DEFAULT CHARACTER SET = utf8");
            self.buf.push_str(" DEFAULT COLLATE = utf8_general_ci");
        }

        Ok(())
    }

    fn write_unique_constraint(
        &mut self,
        name: &str,
        columns: &[String],
    ) -> Result<(), WriteError> {
        self.buf.push_str(", CONSTRAINT ");
        self.write_identifier(name)?;

        self.buf.push(' ');
        self.write_unescaped_alphanumeric("UNIQUE")?;

        self.buf.push_str(" (");
        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_identifier(col)?;
        }
        self.buf.push(')');

        Ok(())
    }

    fn write_fk_constraint(
        &mut self,
        name: &str,
        column: &str,
        ref_table: &str,
        ref_column: &str,
        delete_cascade: bool,
    ) -> Result<(), WriteError> {
        self.buf.push_str(", CONSTRAINT ");
        self.write_identifier(name)?;

        self.buf.push_str(" FOREIGN KEY (");
        self.write_identifier(column)?;
        self.buf.push_str(") REFERENCES ");

        let database = self.database.clone();
        self.write_table(database.as_deref(), ref_table, false)?;

        self.buf.push('(');
        self.write_identifier(ref_column)?;
        self.buf.push(')');

        if delete_cascade {
            self.buf.push_str(" ON DELETE CASCADE");
        }

        Ok(())
    }

    pub(crate) fn write_create_column(&mut self, c: &CreateColumn) -> Result<(), WriteError> {
        if self.driver.is_sqlite() {
            self.write_create_column_sqlite(c)
        } else {
            self.write_create_column_mysql(c)
        }
    }

    fn write_create_column_mysql(&mut self, c: &CreateColumn) -> Result<(), WriteError> {
        self.write_identifier(&c.name)?;

        self.buf.push_str(match c.ty {
            ColumnType::Int => " int",
            ColumnType::Decimal => " decimal",
            ColumnType::Char => " char",
            ColumnType::Varchar => " varchar",
            ColumnType::Text => " text",
            ColumnType::MediumText => " mediumtext",
            ColumnType::Bool => " bool",
            ColumnType::Blob => " blob",
            ColumnType::DateTime => " datetime",
        });

        self.write_column_size(c)?;

        if c.key {
            self.buf.push_str(" AUTO_INCREMENT");
        }

        if !c.nullable {
            self.buf.push_str(" NOT");
        }
        self.buf.push_str(" NULL");

        if let Some(default) = &c.default {
            self.buf.push_str(" DEFAULT ");
            self.write_quoted_alphanumeric(default)?;
        }

        Ok(())
    }

    fn write_create_column_sqlite(&mut self, c: &CreateColumn) -> Result<(), WriteError> {
        self.write_identifier(&c.name)?;

        self.buf.push_str(match c.ty {
            ColumnType::Int => " INTEGER",
            ColumnType::Decimal => " REAL",
            ColumnType::Char | ColumnType::Varchar => " VARCHAR",
            ColumnType::Text | ColumnType::MediumText => " TEXT",
            ColumnType::Bool => " BOOLEAN",
            ColumnType::DateTime => " DATETIME",
            // sqlite columns may be typeless; blobs are stored as-is
            ColumnType::Blob => "",
        });

        self.write_column_size(c)?;

        if c.key {
            self.buf.push_str(" PRIMARY KEY");
        }

        if !c.nullable {
            self.buf.push_str(" NOT");
        }
        self.buf.push_str(" NULL");

        if let Some(default) = &c.default {
            self.buf.push_str(" DEFAULT ");
            self.write_quoted_alphanumeric(default)?;
        }

        if c.ty.is_textual() {
            self.buf.push_str(" COLLATE NOCASE");
        }

        Ok(())
    }

    fn write_column_size(&mut self, c: &CreateColumn) -> Result<(), WriteError> {
        let Some(size) = &c.size else {
            return Ok(());
        };

        self.buf.push('(');
        self.write_unescaped_alphanumeric(size)?;

        if let Some(decimals) = &c.decimals {
            self.buf.push(',');
            self.write_unescaped_alphanumeric(decimals)?;
        }

        self.buf.push(')');
        Ok(())
    }

    // --- ALTER TABLE ---

    pub(crate) fn write_add_column(&mut self, s: &AddColumnQuery) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;
        self.buf.push_str(" ADD COLUMN ");
        self.write_create_column(&s.column)
    }

    pub(crate) fn write_rename_column(&mut self, s: &RenameColumnQuery) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;
        self.buf.push_str(" CHANGE ");
        self.write_identifier(&s.name)?;
        self.buf.push(' ');
        self.write_create_column(&s.column)
    }

    pub(crate) fn write_modify_column(&mut self, s: &ModifyColumnQuery) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;
        self.buf.push_str(" MODIFY ");
        self.write_create_column(&s.column)
    }

    pub(crate) fn write_alter_drop(&mut self, s: &AlterDropQuery) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;
        self.buf.push_str(" DROP ");
        self.buf.push_str(s.kind.as_str());
        self.buf.push(' ');
        self.write_identifier(&s.item)
    }

    pub(crate) fn write_add_constraint(
        &mut self,
        s: &AddConstraintQuery,
    ) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;

        self.buf.push_str(" ADD CONSTRAINT ");
        self.write_identifier(&s.name)?;

        self.buf.push_str(" UNIQUE (");
        for (i, col) in s.columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_column_ref(col)?;
        }
        self.buf.push(')');

        Ok(())
    }

    pub(crate) fn write_add_foreign_key(
        &mut self,
        s: &AddForeignKeyQuery,
    ) -> Result<(), WriteError> {
        self.buf.push_str("ALTER TABLE ");
        self.write_table(s.database.as_deref(), &s.table, true)?;

        self.buf.push_str(" ADD CONSTRAINT ");
        self.write_identifier(&s.name)?;

        self.buf.push_str(" FOREIGN KEY(");
        self.write_identifier(&s.column)?;
        self.buf.push_str(") REFERENCES ");

        self.write_table(s.ref_database.as_deref(), &s.ref_table, false)?;

        self.buf.push('(');
        self.write_identifier(&s.ref_column)?;
        self.buf.push(')');

        if s.delete_cascade {
            self.buf.push_str(" ON DELETE CASCADE");
        }

        Ok(())
    }

    // --- DROP ---

    pub(crate) fn write_drop_database(&mut self, s: &DropDatabaseQuery) -> Result<(), WriteError> {
        self.buf.push_str("DROP DATABASE ");
        if s.if_exists {
            self.buf.push_str("IF EXISTS ");
        }
        self.write_identifier(&s.database)
    }

    pub(crate) fn write_drop_table(&mut self, s: &DropTableQuery) -> Result<(), WriteError> {
        self.buf.push_str("DROP TABLE ");
        if s.if_exists {
            self.buf.push_str("IF EXISTS ");
        }
        self.write_table(s.database.as_deref(), &s.table, true)
    }

    // --- SHOW ---

    pub(crate) fn write_show(&mut self, s: &ShowQuery) -> Result<(), WriteError> {
        match s.kind {
            ShowKind::Databases => self.write_show_databases(s),
            ShowKind::Tables => self.write_show_tables(s),
            ShowKind::Columns => self.write_show_columns(s),
            ShowKind::Index => self.write_show_index(s),
        }
    }

    fn write_show_databases(&mut self, s: &ShowQuery) -> Result<(), WriteError> {
        if self.database.is_some() {
            return Err(WriteError::InvalidDatabase(format!(
                "in SHOW DATABASES at {}",
                s.pos
            )));
        }

        if self.driver.is_sqlite() {
            return Err(WriteError::InvalidOperation(String::from(
                "SHOW DATABASES not supported in sqlite3",
            )));
        }

        self.buf.push_str("SHOW DATABASES");
        Ok(())
    }

    fn write_show_tables(&mut self, s: &ShowQuery) -> Result<(), WriteError> {
        if let Some(database) = &s.database {
            if self.database.as_deref().is_some_and(|d| d != database.as_str()) {
                return Err(WriteError::InvalidDatabase(database.clone()));
            }
        }

        let database = s.database.clone().or_else(|| self.database.clone());

        if self.driver.is_sqlite() {
            self.buf
                .push_str(r#"SELECT name FROM sqlite_master WHERE type = "table""#);
            if let Some(database) = database {
                self.buf.push_str(r#" AND name like ""#);
                self.write_unescaped_alphanumeric(&database)?;
                self.buf.push_str("%\"");
            }
            return Ok(());
        }

        self.buf.push_str("SHOW TABLES");
        if let Some(database) = database {
            self.buf.push_str(" FROM ");
            self.write_identifier(&database)?;
        }
        Ok(())
    }

    fn write_show_columns(&mut self, s: &ShowQuery) -> Result<(), WriteError> {
        let table = s.table.clone().unwrap_or_default();

        if self.driver.is_sqlite() {
            self.buf.push_str("PRAGMA table_info(");
            self.write_table(s.database.as_deref(), &table, false)?;
            self.buf.push(')');
            return Ok(());
        }

        self.buf.push_str("SHOW COLUMNS FROM ");
        self.write_table(s.database.as_deref(), &table, false)
    }

    fn write_show_index(&mut self, s: &ShowQuery) -> Result<(), WriteError> {
        let table = s.table.clone().unwrap_or_default();

        if self.driver.is_sqlite() {
            self.buf.push_str("PRAGMA index_list(");
            self.write_table(s.database.as_deref(), &table, false)?;
            self.buf.push(')');
            return Ok(());
        }

        self.buf.push_str("SHOW INDEX FROM ");
        self.write_table(s.database.as_deref(), &table, false)
    }
}
