//! Builder operations: fragment splicing into parsed queries.

mod common;
use common::*;

use sqlgate::ast::Statement;
use sqlgate::{parse_select, parse_where, select_column_names, Driver, Value};

fn select_sql(q: &sqlgate::ast::SelectQuery) -> String {
    let stmt = Statement::Select(q.clone());
    let (sql, _) = to_sql_plain(&stmt, q.params.clone(), None, Driver::MySql);
    sql
}

fn update_sql(q: &sqlgate::ast::UpdateQuery) -> String {
    let stmt = Statement::Update(q.clone());
    let (sql, _) = to_sql_plain(&stmt, q.params.clone(), None, Driver::MySql);
    sql
}

#[test]
fn add_columns() {
    let mut q = parse_select("select id from users", []).unwrap();
    q.add_columns("name, age").unwrap();
    assert_eq!(select_sql(&q), "SELECT id, name, age FROM users");
}

#[test]
fn set_columns() {
    let mut q = parse_select("select id from users", []).unwrap();
    q.set_columns("count(*)").unwrap();
    assert_eq!(select_sql(&q), "SELECT COUNT(*) FROM users");
}

#[test]
fn set_columns_rejects_stray_ident() {
    let mut q = parse_select("select id from users", []).unwrap();
    let err = q.set_columns("id test1").expect_err("expected failure");
    assert!(err.to_string().contains("Unexpected IDENT 'test1'"));
}

#[test]
fn set_from_on_empty_query() {
    let mut q = sqlgate::ast::SelectQuery::default();
    q.set_columns("1").unwrap();
    q.set_from("from foo AS x").unwrap();
    assert_eq!(select_sql(&q), "SELECT 1 FROM foo AS x");
}

#[test]
fn remove_left_joins() {
    let mut q = parse_select("select id from users left join foo on id = id", []).unwrap();
    q.remove_left_joins();
    assert_eq!(select_sql(&q), "SELECT id FROM users");
}

#[test]
fn limit_and_order() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.limit(20);
    assert_eq!(select_sql(&q), "SELECT * FROM users LIMIT 20");

    let mut q = parse_select("select * from users", []).unwrap();
    q.order_by("id asc, name desc").unwrap();
    assert_eq!(select_sql(&q), "SELECT * FROM users ORDER BY id ASC, name DESC");

    let mut q = parse_select("select * from users", []).unwrap();
    q.limit_offset(20, 10);
    assert_eq!(select_sql(&q), "SELECT * FROM users LIMIT 20, 10");
}

#[test]
fn where_and_or_chain() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.and_where("id=2", []).unwrap();
    q.and_where("status=?", []).unwrap();
    q.or_where("name=?", []).unwrap();

    assert_eq!(
        select_sql(&q),
        "SELECT * FROM users WHERE id = 2 AND status IS NULL OR name IS NULL"
    );
}

#[test]
fn where_keeps_fragment_grouping() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.and_where("id=2 and (id > 0 and id > 1)", []).unwrap();
    q.and_where("status=?", []).unwrap();
    q.or_where("name=?", []).unwrap();

    assert_eq!(
        select_sql(&q),
        "SELECT * FROM users WHERE id = 2 AND (id > 0 AND id > 1) \
         AND status IS NULL OR name IS NULL"
    );
}

#[test]
fn where_fragment_with_trailing_order_by() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.and_where("id > 1 order by name desc", []).unwrap();

    assert_eq!(
        select_sql(&q),
        "SELECT * FROM users WHERE id > 1 ORDER BY name DESC"
    );
}

#[test]
fn order_by_only_fragment() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.and_where("ORDER BY name desc", []).unwrap();

    assert_eq!(select_sql(&q), "SELECT * FROM users ORDER BY name DESC");
}

#[test]
fn join_with_implicit_keyword() {
    let mut q = parse_select("select * from users", []).unwrap();
    q.join("invoices on user.id = invoice.iduser").unwrap();

    assert_eq!(
        select_sql(&q),
        "SELECT * FROM users JOIN invoices ON user.id = invoice.iduser"
    );
}

#[test]
fn nested_query_filters() {
    let mut q = parse_select("select * from users where id = 1", []).unwrap();

    let mut filter = parse_where("status=2", []).unwrap();
    filter.or_where("status=3", []).unwrap();

    q.and_query(&filter);

    assert_eq!(
        select_sql(&q),
        "SELECT * FROM users WHERE id = 1 AND (status = 2 OR status = 3)"
    );
}

#[test]
fn query_filter_adopts_params() {
    let mut q = parse_select("select * from users where id = ?", [Value::Int(1)]).unwrap();

    let filter = parse_where("status=?", [Value::Int(2)]).unwrap();
    q.and_query(&filter);

    assert_eq!(q.params, vec![Value::Int(1), Value::Int(2)]);
}

#[test]
fn having_merges_under_and() {
    let mut q = parse_select("select a, count(*) from t group by a", []).unwrap();
    q.having("count(*) > 2", []).unwrap();
    q.having("count(*) < 10", []).unwrap();

    assert_eq!(
        select_sql(&q),
        "SELECT a, COUNT(*) FROM t GROUP BY a HAVING COUNT(*) > 2 AND COUNT(*) < 10"
    );
}

#[test]
fn group_by_fragment() {
    let mut q = parse_select("select a, count(*) from t", []).unwrap();
    q.group_by("a").unwrap();
    assert_eq!(select_sql(&q), "SELECT a, COUNT(*) FROM t GROUP BY a");
}

#[test]
fn collects_column_names() {
    let q = parse_select(
        "select id,name,true from users where id > 3 and name != null",
        [],
    )
    .unwrap();

    let names = select_column_names(&q);
    let names: Vec<&str> = names.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["id", "name", "id", "name"]);
}

#[test]
fn update_add_columns() {
    let mut u = parse_update("update users set a = 1");
    u.add_columns("b = 2").unwrap();
    u.add_columns("c = 3").unwrap();

    assert_eq!(update_sql(&u), "UPDATE users SET a = 1, b = 2, c = 3");
}

#[test]
fn update_set_columns_replaces() {
    let mut u = parse_update("update users set a = 1, b = 2, c = 3");
    u.add_columns("d = 4").unwrap();
    u.set_columns("all = 11").unwrap();

    assert_eq!(update_sql(&u), "UPDATE users SET all = 11");
}

#[test]
fn update_where() {
    let mut u = parse_update("update users set a = 1");
    u.and_where("b > 10", []).unwrap();

    assert_eq!(update_sql(&u), "UPDATE users SET a = 1 WHERE b > 10");
}

#[test]
fn update_where_and() {
    let mut u = parse_update("update users set a = 1 where b > 10");
    u.and_where("c < 0", []).unwrap();

    assert_eq!(update_sql(&u), "UPDATE users SET a = 1 WHERE b > 10 AND c < 0");
}

#[test]
fn update_where_or() {
    let mut u = parse_update("update users set a = 1");
    u.and_where("b > 10", []).unwrap();
    u.or_where("c < 10", []).unwrap();

    assert_eq!(update_sql(&u), "UPDATE users SET a = 1 WHERE b > 10 OR c < 10");
}

#[test]
fn update_join() {
    let mut u = parse_update("update a set a = 1");
    u.join("b on a.id = b.idb").unwrap();

    assert_eq!(update_sql(&u), "UPDATE a JOIN b ON a.id = b.idb SET a = 1");
}

#[test]
fn update_join_appends() {
    let mut u = parse_update("update a left join b on a.id = b.idb set a = 1");
    u.join("right join c on a.id = c.idc").unwrap();

    assert_eq!(
        update_sql(&u),
        "UPDATE a LEFT JOIN b ON a.id = b.idb RIGHT JOIN c ON a.id = c.idc SET a = 1"
    );
}

#[test]
fn update_compound() {
    let mut u = parse_update("update users u inner join b on u.id = b.idb set a = 1");
    u.join("c on u.id = c.idc").unwrap();
    u.join("right join d on c.id = d.id").unwrap();
    u.and_where("u.status = 'a'", []).unwrap();
    u.or_where("c.status = 'c'", []).unwrap();
    u.and_where("d.id < 100", []).unwrap();
    u.add_columns("z = 4").unwrap();

    assert_eq!(
        update_sql(&u),
        "UPDATE users AS u INNER JOIN b ON u.id = b.idb \
         JOIN c ON u.id = c.idc RIGHT JOIN d ON c.id = d.id \
         SET a = 1, z = 4 WHERE u.status = \"a\" \
         OR c.status = \"c\" AND d.id < 100"
    );
}

#[test]
fn delete_builder() {
    let mut d = parse_delete("delete from logs");
    d.and_where("age > ?", [Value::Int(30)]).unwrap();
    d.limit(100);

    let stmt = Statement::Delete(d.clone());
    let (sql, _) = to_sql_plain(&stmt, d.params.clone(), None, Driver::MySql);
    assert_eq!(sql, "DELETE FROM logs WHERE age > ? LIMIT 100");
}

#[test]
fn join_requires_table_from() {
    let mut q = parse_select("select 1 from (select 1) x", []).unwrap();
    assert!(q.join("b on a.id = b.id").is_err());

    let mut q = sqlgate::ast::SelectQuery::default();
    assert!(q.join("b on a.id = b.id").is_err());
}

#[test]
fn caller_timestamps_are_utc() {
    use chrono::DateTime;

    let fixed = DateTime::parse_from_rfc3339("2024-03-01T12:00:00+02:00").unwrap();
    let mut q = parse_select("select * from t", []).unwrap();
    q.and_where("created > ?", [Value::from(fixed)]).unwrap();

    let Some(Value::DateTime(dt)) = q.params.first() else {
        panic!("expected a datetime param");
    };
    assert_eq!(dt.to_rfc3339(), "2024-03-01T10:00:00+00:00");
}
