#![allow(dead_code)]

use sqlgate::ast::{DeleteQuery, SelectQuery, Statement, UpdateQuery};
use sqlgate::{parse_query, Driver, Error, Value, Writer};

pub fn parse(sql: &str) -> Statement {
    parse_query(sql).unwrap_or_else(|e| panic!("Failed to parse: {sql}\nError: {e}"))
}

pub fn parse_select(sql: &str) -> SelectQuery {
    match parse(sql) {
        Statement::Select(s) => s,
        other => panic!("Expected SELECT, got {other:?}"),
    }
}

pub fn parse_update(sql: &str) -> UpdateQuery {
    match parse(sql) {
        Statement::Update(u) => u,
        other => panic!("Expected UPDATE, got {other:?}"),
    }
}

pub fn parse_delete(sql: &str) -> DeleteQuery {
    match parse(sql) {
        Statement::Delete(d) => d,
        other => panic!("Expected DELETE, got {other:?}"),
    }
}

/// Writes with identifier escaping and formatting off, the way most
/// expectations are phrased.
pub fn to_sql_plain(
    query: &Statement,
    params: Vec<Value>,
    database: Option<&str>,
    driver: Driver,
) -> (String, Vec<Value>) {
    try_to_sql_plain(query, params, database, driver)
        .unwrap_or_else(|e| panic!("Failed to write: {e}"))
}

pub fn try_to_sql_plain(
    query: &Statement,
    params: Vec<Value>,
    database: Option<&str>,
    driver: Driver,
) -> Result<(String, Vec<Value>), Error> {
    let mut w = Writer::new(query, params, database, driver);
    w.escape_idents = false;
    w.write()
}

/// Parses and writes in one go, asserting the expected SQL.
pub fn assert_sql(input: &str, expected: &str) {
    let q = parse(input);
    let (sql, _) = to_sql_plain(&q, Vec::new(), None, Driver::MySql);
    assert_eq!(sql, expected, "input: {input}");
}
