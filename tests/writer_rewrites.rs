//! The writer-time semantic rewrites: null equality, empty-IN
//! collapse and IN-list parameter inlining, together with their
//! effect on the returned parameter list.

mod common;
use common::*;

use sqlgate::{Driver, Value, WriteError};

#[test]
fn null_constant_equality() {
    assert_sql(
        "select * from foo where a != null",
        "SELECT * FROM foo WHERE a IS NOT NULL",
    );
}

#[test]
fn null_equality_without_params() {
    // with no bound value at the cursor the parameter is treated as
    // null but nothing is consumed
    assert_sql(
        "select * from foo where a != ?",
        "SELECT * FROM foo WHERE a IS NOT NULL",
    );
}

#[test]
fn null_equality_mixed_params() {
    let q = parse("select * from foo where a != ? and b = ? and c = ?");
    let params = vec![Value::Int(1), Value::Str(String::new()), Value::Null];

    let (sql, rest) = to_sql_plain(&q, params, None, Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo WHERE a != ? AND b = ? AND c IS NULL");
    assert_eq!(rest, vec![Value::Int(1), Value::Str(String::new())]);
}

#[test]
fn empty_in_collapses() {
    let q = parse("select * from foo where id in ?");
    let (sql, rest) = to_sql_plain(&q, Vec::new(), Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE 1=0");
    assert!(rest.is_empty());
}

#[test]
fn empty_list_in_collapses_and_consumes() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(Vec::new())];
    let (sql, rest) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE 1=0");
    assert!(rest.is_empty());
}

#[test]
fn null_in_collapses_and_consumes() {
    let q = parse("select * from foo where id in ?");
    let (sql, rest) = to_sql_plain(&q, vec![Value::Null], Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE 1=0");
    assert!(rest.is_empty());
}

#[test]
fn in_list_inlined() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)])];

    let (sql, rest) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE id IN (1, 2, 3)");
    assert!(rest.is_empty());
}

#[test]
fn in_scalar_inlined() {
    let q = parse("select 1 from foo where id in ?");
    let (sql, rest) = to_sql_plain(&q, vec![Value::Int(9)], None, Driver::MySql);
    assert_eq!(sql, "SELECT 1 FROM foo WHERE id IN (9)");
    assert!(rest.is_empty());
}

#[test]
fn in_integer_strings_inlined() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![
        Value::Str(String::from("1")),
        Value::Str(String::from("2")),
        Value::Str(String::from("3")),
    ])];

    let (sql, _) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE id IN (1, 2, 3)");
}

#[test]
fn in_rejects_bool_values() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![
        Value::Int(1),
        Value::Bool(true),
        Value::Int(3),
    ])];

    let err = try_to_sql_plain(&q, params, Some("foo"), Driver::MySql).unwrap_err();
    assert!(matches!(
        err,
        sqlgate::Error::Write(WriteError::InvalidInValue(_))
    ));
}

#[test]
fn in_rejects_non_numeric_strings() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![Value::Str(String::from("www"))])];
    assert!(try_to_sql_plain(&q, params, Some("foo"), Driver::MySql).is_err());
}

#[test]
fn in_rejects_fractional_floats() {
    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![Value::Float(1.5)])];
    assert!(try_to_sql_plain(&q, params, Some("foo"), Driver::MySql).is_err());

    let q = parse("select * from foo where id in ?");
    let params = vec![Value::List(vec![Value::Float(2.0)])];
    let (sql, _) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE id IN (2)");
}

#[test]
fn in_formats_timestamps_utc() {
    use chrono::{TimeZone, Utc};

    let q = parse("select * from foo where created in ?");
    let ts = Utc.with_ymd_and_hms(2023, 7, 14, 9, 30, 5).unwrap();
    let params = vec![Value::List(vec![Value::DateTime(ts)])];

    let (sql, _) = to_sql_plain(&q, params, None, Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo WHERE created IN ('2023-07-14 09:30:05')");
}

#[test]
fn in_after_scalar_param() {
    let q = parse("select * from foo where id > ? AND id in ?");
    let params = vec![
        Value::Int(10),
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
    ];

    let (sql, rest) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE id > ? AND id IN (1, 2, 3)");
    assert_eq!(rest, vec![Value::Int(10)]);
}

#[test]
fn in_before_scalar_param() {
    let q = parse("select * from foo where id in ? AND id > ?");
    let params = vec![
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Value::Int(10),
    ];

    let (sql, rest) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(sql, "SELECT * FROM foo.foo WHERE id IN (1, 2, 3) AND id > ?");
    assert_eq!(rest, vec![Value::Int(10)]);
}

#[test]
fn in_between_scalar_params() {
    let q = parse("select * from foo where id < ? and id in ? AND id > ?");
    let params = vec![
        Value::Int(20),
        Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]),
        Value::Int(10),
    ];

    let (sql, rest) = to_sql_plain(&q, params, Some("foo"), Driver::MySql);
    assert_eq!(
        sql,
        "SELECT * FROM foo.foo WHERE id < ? AND id IN (1, 2, 3) AND id > ?"
    );
    assert_eq!(rest, vec![Value::Int(20), Value::Int(10)]);
}

#[test]
fn function_whitelist_per_writer() {
    let q = parse("select now(), month(d) from t");

    let mut w = sqlgate::Writer::new(&q, Vec::new(), None, Driver::MySql);
    w.escape_idents = false;
    w.whitelist_funcs = Some(vec![String::from("now"), String::from("month")]);
    let (sql, _) = w.write().unwrap();
    assert_eq!(sql, "SELECT NOW(), MONTH(d) FROM t");

    let mut w = sqlgate::Writer::new(&q, Vec::new(), None, Driver::MySql);
    w.whitelist_funcs = Some(vec![String::from("now")]);
    let err = w.write().unwrap_err();
    assert_eq!(
        err.to_string(),
        "The function MONTH is not allowed"
    );
}
