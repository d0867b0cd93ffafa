//! DDL and SHOW emission under both drivers.

mod common;
use common::*;

use sqlgate::Driver;

fn mysql(input: &str, expected: &str) {
    let q = parse(input);
    let (sql, _) = to_sql_plain(&q, Vec::new(), None, Driver::MySql);
    assert_eq!(sql, expected, "input: {input}");
}

fn sqlite(input: &str, expected: &str) {
    let q = parse(input);
    let (sql, _) = to_sql_plain(&q, Vec::new(), None, Driver::Sqlite3);
    assert_eq!(sql, expected, "input: {input}");
}

#[test]
fn add_column() {
    mysql(
        "alter table foo add bar varchar(6) null",
        "ALTER TABLE foo ADD COLUMN bar varchar(6) NULL",
    );
}

#[test]
fn add_column_explicit() {
    mysql(
        "alter table foo add column bar varchar(6) null",
        "ALTER TABLE foo ADD COLUMN bar varchar(6) NULL",
    );
}

#[test]
fn drop_column() {
    mysql(
        "alter table foo drop column bar",
        "ALTER TABLE foo DROP COLUMN bar",
    );
}

#[test]
fn drop_index() {
    mysql(
        "alter table foo drop index bar",
        "ALTER TABLE foo DROP INDEX bar",
    );
}

#[test]
fn rename_column() {
    mysql(
        "alter table foo change fizz bar varchar(6) null",
        "ALTER TABLE foo CHANGE fizz bar varchar(6) NULL",
    );
}

#[test]
fn modify_column() {
    mysql(
        "alter table foo modify bar varchar(6) null",
        "ALTER TABLE foo MODIFY bar varchar(6) NULL",
    );
}

#[test]
fn add_unique_constraint() {
    mysql(
        "alter table foo add constraint c unique (col1, col2)",
        "ALTER TABLE foo ADD CONSTRAINT c UNIQUE (col1, col2)",
    );
}

#[test]
fn add_foreign_key_constraint() {
    mysql(
        "alter table foo add constraint c foreign key (jj) references bar(id) on delete cascade",
        "ALTER TABLE foo ADD CONSTRAINT c FOREIGN KEY(jj) REFERENCES bar(id) ON DELETE CASCADE",
    );
}

#[test]
fn drop_database() {
    mysql("drop database foo", "DROP DATABASE foo");
}

#[test]
fn drop_table() {
    mysql("drop table foo", "DROP TABLE foo");
}

#[test]
fn drop_table_qualified() {
    mysql("drop table foo.bar", "DROP TABLE foo.bar");
}

#[test]
fn drop_table_if_exists() {
    mysql("drop table if exists foo", "DROP TABLE IF EXISTS foo");
}

#[test]
fn show_tables() {
    mysql("show tables", "SHOW TABLES");
}

#[test]
fn show_tables_from_database() {
    mysql("show tables from foo", "SHOW TABLES FROM foo");
}

#[test]
fn show_tables_sqlite() {
    sqlite(
        "show tables",
        r#"SELECT name FROM sqlite_master WHERE type = "table""#,
    );
}

#[test]
fn show_tables_sqlite_with_database() {
    let q = parse("show tables");
    let (sql, _) = to_sql_plain(&q, Vec::new(), Some("db"), Driver::Sqlite3);
    assert_eq!(
        sql,
        r#"SELECT name FROM sqlite_master WHERE type = "table" AND name like "db%""#
    );
}

#[test]
fn show_columns() {
    mysql("show columns from foo", "SHOW COLUMNS FROM foo");
}

#[test]
fn show_columns_sqlite() {
    sqlite("show columns from foo", "PRAGMA table_info(foo)");
}

#[test]
fn show_index() {
    mysql("show index from foo", "SHOW INDEX FROM foo");
}

#[test]
fn show_index_sqlite() {
    sqlite("show index from foo", "PRAGMA index_list(foo)");
}

#[test]
fn show_index_rewrites_namespace() {
    mysql("show index from foo:bar:bill", "SHOW INDEX FROM foo_bar_bill");
}

#[test]
fn show_databases() {
    mysql("show databases", "SHOW DATABASES");
}

#[test]
fn show_databases_sqlite_fails() {
    let q = parse("show databases");
    assert!(try_to_sql_plain(&q, Vec::new(), None, Driver::Sqlite3).is_err());
}

#[test]
fn create_database_sqlite_fails() {
    let q = parse("create database if not exists foo");
    let err = try_to_sql_plain(&q, Vec::new(), None, Driver::Sqlite3).unwrap_err();
    assert!(err.to_string().contains("Not supported"));
}

#[test]
fn create_database_mysql() {
    mysql(
        "create database if not exists foo",
        "CREATE DATABASE IF NOT EXISTS foo",
    );
}

#[test]
fn create_table_sqlite() {
    sqlite(
        "create table cars (id key, name varchar(10))",
        "CREATE TABLE cars (\
         id INTEGER PRIMARY KEY NOT NULL, \
         name VARCHAR(10) NOT NULL COLLATE NOCASE)",
    );
}

#[test]
fn create_table_sqlite_if_not_exists() {
    sqlite(
        "create table if not exists cars (id key, name varchar(10))",
        "CREATE TABLE IF NOT EXISTS cars (\
         id INTEGER PRIMARY KEY NOT NULL, \
         name VARCHAR(10) NOT NULL COLLATE NOCASE)",
    );
}

#[test]
fn create_table_mysql() {
    mysql(
        "create table if not exists cars (id key, name varchar(10))",
        "CREATE TABLE IF NOT EXISTS cars (\
         id int AUTO_INCREMENT NOT NULL, \
         name varchar(10) NOT NULL, \
         PRIMARY KEY(id)) \
         ENGINE=InnoDb \
         DEFAULT CHARACTER SET = utf8 \
         DEFAULT COLLATE = utf8_general_ci",
    );
}

#[test]
fn create_table_sqlite_with_database() {
    let q = parse("create table if not exists cars (id key, name varchar(10))");
    let (sql, _) = to_sql_plain(&q, Vec::new(), Some("foo"), Driver::Sqlite3);
    assert_eq!(
        sql,
        "CREATE TABLE IF NOT EXISTS foo_cars (\
         id INTEGER PRIMARY KEY NOT NULL, \
         name VARCHAR(10) NOT NULL COLLATE NOCASE)"
    );
}

#[test]
fn create_table_decimal_column() {
    sqlite(
        "create table cars (name text, price decimal(12,2) not null)",
        "CREATE TABLE cars (name TEXT NOT NULL COLLATE NOCASE, price REAL(12,2) NOT NULL)",
    );
}

#[test]
fn create_table_unique_constraint() {
    sqlite(
        "create table cars (code int, price int, constraint code_price unique (code, price))",
        "CREATE TABLE cars (code INTEGER NOT NULL, price INTEGER NOT NULL, \
         CONSTRAINT code_price UNIQUE (code, price))",
    );
}

#[test]
fn create_table_string_default() {
    sqlite(
        "create table cars (name text default 'a')",
        "CREATE TABLE cars (name TEXT NOT NULL DEFAULT 'a' COLLATE NOCASE)",
    );
}

#[test]
fn create_table_bool_default() {
    sqlite(
        "create table users (active bool default true)",
        "CREATE TABLE users (active BOOLEAN NOT NULL DEFAULT true)",
    );
}

#[test]
fn create_table_keyword_column_name() {
    sqlite(
        "create table users (order int)",
        "CREATE TABLE users (order INTEGER NOT NULL)",
    );
}

#[test]
fn create_table_with_keys_and_constraints() {
    sqlite(
        "CREATE TABLE bankaccount (
             id int(11) NOT NULL AUTO_INCREMENT,
             idClient int(11) NOT NULL,
             PRIMARY KEY (id),
             UNIQUE KEY u_name (name),
             CONSTRAINT fk_bankaccountIdClient FOREIGN KEY (idClient) \
              REFERENCES foo_crm_client (id) ON DELETE CASCADE
         )",
        "CREATE TABLE bankaccount (\
         id INTEGER(11) NOT NULL, idClient INTEGER(11) NOT NULL\
         , CONSTRAINT u_name UNIQUE (name)\
         , CONSTRAINT fk_bankaccountIdClient FOREIGN KEY (idClient) REFERENCES foo_crm_client(id))",
    );
}
