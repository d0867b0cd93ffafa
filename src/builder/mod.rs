//! Post-parse query mutation.
//!
//! Every operation takes a textual fragment, runs the lexer, invokes
//! the matching parser production and splices the result into the
//! target query, so the grammar lives in exactly one place.

mod value;

pub use value::Value;

use crate::ast::{
    ColumnRef, Constant, ConstantKind, DeleteQuery, Expr, FromItem, JoinKind, Limit, SelectQuery,
    Statement, UpdateQuery,
};
use crate::error::Error;
use crate::lexer::{Keyword, TokenKind};
use crate::parser::Parser;

/// Parses a select query; the leading `SELECT ` may be omitted.
pub fn parse_select(
    code: &str,
    params: impl IntoIterator<Item = Value>,
) -> Result<SelectQuery, Error> {
    let code = if code.len() < 7 || !code.as_bytes()[..7].eq_ignore_ascii_case(b"SELECT ") {
        format!("SELECT {code}")
    } else {
        code.to_owned()
    };

    let query = Parser::new(&code)?.parse_single()?;
    let Statement::Select(mut select) = query else {
        return Err(Error::NotASelect);
    };

    select.params.extend(params);
    Ok(select)
}

/// Parses a select filter; the leading `WHERE ` may be omitted.
pub fn parse_where(
    code: &str,
    params: impl IntoIterator<Item = Value>,
) -> Result<SelectQuery, Error> {
    let code = if code.len() >= 6 && code.as_bytes()[..6].eq_ignore_ascii_case(b"WHERE ") {
        &code[6..]
    } else {
        code
    };

    let mut query = SelectQuery::default();
    query.and_where(code, params)?;
    Ok(query)
}

/// Parses a bare order-by fragment into an otherwise empty select.
pub fn parse_order_by(code: &str) -> Result<SelectQuery, Error> {
    let mut query = SelectQuery::default();
    query.order_by(code)?;
    Ok(query)
}

/// Collects every column reference in an expression, in source order.
#[must_use]
pub fn column_names(expr: &Expr) -> Vec<&ColumnRef> {
    let mut cols = Vec::new();
    collect_columns(expr, &mut cols);
    cols
}

/// Collects every column reference in a select query, in source order.
#[must_use]
pub fn select_column_names(query: &SelectQuery) -> Vec<&ColumnRef> {
    let mut cols = Vec::new();
    collect_select_columns(query, &mut cols);
    cols
}

fn collect_columns<'a>(expr: &'a Expr, out: &mut Vec<&'a ColumnRef>) {
    match expr {
        Expr::Column(col) => out.push(col),
        Expr::Subquery(query) => collect_select_columns(query, out),
        Expr::Binary { left, right, .. } => {
            collect_columns(left, out);
            collect_columns(right, out);
        }
        Expr::Unary { operand, .. } => collect_columns(operand, out),
        Expr::Paren(inner) | Expr::SelectColumn { expr: inner, .. } => {
            collect_columns(inner, out);
        }
        Expr::Call(call) => {
            for arg in &call.args {
                collect_columns(arg, out);
            }
        }
        Expr::InList { values, .. } => {
            for value in values {
                collect_columns(value, out);
            }
        }
        _ => {}
    }
}

fn collect_select_columns<'a>(query: &'a SelectQuery, out: &mut Vec<&'a ColumnRef>) {
    for col in &query.columns {
        collect_columns(col, out);
    }

    for from in &query.from {
        match from {
            FromItem::Table(table) => {
                for join in &table.joins {
                    if let Some(on) = &join.on {
                        collect_columns(on, out);
                    }
                }
            }
            FromItem::Subquery { expr, .. } => collect_columns(expr, out),
        }
    }

    if let Some(where_part) = &query.where_part {
        collect_columns(where_part, out);
    }
    for group in &query.group_by {
        collect_columns(group, out);
    }
    if let Some(having) = &query.having {
        collect_columns(having, out);
    }
    for order in &query.order_by {
        collect_columns(&order.expr, out);
    }
    for union in &query.union {
        collect_select_columns(union, out);
    }
}

fn int_constant(value: i64) -> Expr {
    Expr::Constant(Constant {
        pos: crate::lexer::Position::default(),
        kind: ConstantKind::Int,
        value: value.to_string(),
    })
}

fn combine_and(target: &mut Option<Expr>, expr: Expr) {
    *target = Some(match target.take() {
        Some(existing) => existing.and(expr),
        None => expr,
    });
}

fn combine_or(target: &mut Option<Expr>, expr: Expr) {
    *target = Some(match target.take() {
        Some(existing) => existing.or(expr),
        None => expr,
    });
}

/// Merges the trailing `ORDER BY` / `GROUP BY` / `HAVING` clauses a
/// filter fragment may carry after the boolean expression.
fn parse_after_filter(query: &mut SelectQuery, p: &mut Parser) -> Result<(), Error> {
    let order = p.parse_order_by().map_err(Error::Parse)?;
    query.order_by.extend(order);

    let group = p.parse_group_by().map_err(Error::Parse)?;
    query.group_by.extend(group);

    if let Some(having) = p.parse_having().map_err(Error::Parse)? {
        combine_and(&mut query.having, having);
    }

    Ok(())
}

impl SelectQuery {
    /// Replaces the select column list with the parsed fragment.
    pub fn set_columns(&mut self, code: &str) -> Result<(), Error> {
        self.columns.clear();
        self.add_columns(code)
    }

    /// Appends the parsed fragment to the select column list.
    pub fn add_columns(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let exprs = p.parse_select_columns().map_err(Error::Parse)?;
        self.columns.extend(exprs);
        Ok(())
    }

    /// Replaces the FROM list with the parsed fragment.
    pub fn set_from(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        self.from = p.parse_from().map_err(Error::Parse)?;
        Ok(())
    }

    /// Appends the parsed fragment to the FROM list.
    pub fn add_from(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let froms = p.parse_from().map_err(Error::Parse)?;
        self.from.extend(froms);
        Ok(())
    }

    /// Appends joins to the first FROM table. A fragment without a
    /// leading join keyword gets an implicit `JOIN`.
    pub fn join(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;

        let Some(first) = self.from.first_mut() else {
            return Err(Error::Builder(String::from(
                "Can't add a join to this query (empty FROM)",
            )));
        };
        let FromItem::Table(table) = first else {
            return Err(Error::Builder(String::from(
                "Can't add a join to this query. From must be a table",
            )));
        };

        if !p.at_join_keyword() {
            p.prepend(TokenKind::Keyword(Keyword::Join));
        }

        let joins = p.parse_joins().map_err(Error::Parse)?;
        table.joins.extend(joins);
        Ok(())
    }

    /// Appends the parsed fragment to the GROUP BY list; the leading
    /// `GROUP BY` may be omitted.
    pub fn group_by(&mut self, code: &str) -> Result<(), Error> {
        let code = if code.to_ascii_uppercase().starts_with("GROUP BY ") {
            code.to_owned()
        } else {
            format!("GROUP BY {code}")
        };

        let mut p = Parser::new(&code)?;
        let group = p.parse_group_by().map_err(Error::Parse)?;
        self.group_by.extend(group);
        Ok(())
    }

    /// Appends the parsed fragment to the ORDER BY list; the leading
    /// `ORDER BY` may be omitted.
    pub fn order_by(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        p.prepend(TokenKind::Keyword(Keyword::By));
        p.prepend(TokenKind::Keyword(Keyword::Order));

        let order = p.parse_order_by().map_err(Error::Parse)?;
        self.order_by.extend(order);
        Ok(())
    }

    /// Combines a filter fragment with the existing WHERE under `AND`.
    pub fn and_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;

        // the fragment can skip the filter and carry only trailing
        // clauses
        let is_filter = !code.to_ascii_uppercase().starts_with("ORDER BY");
        if is_filter {
            let expr = p.parse_boolean_expr().map_err(Error::Parse)?;

            self.params.append(&mut p.params);
            self.params.extend(params);

            combine_and(&mut self.where_part, expr);
        }

        parse_after_filter(self, &mut p)
    }

    /// Combines a filter fragment with the existing WHERE under `OR`.
    /// The fragment is parsed as a boolean *term* so an `OR` merged
    /// into an existing `AND` chain keeps its precedence.
    pub fn or_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;

        let is_filter = !code.to_ascii_uppercase().starts_with("ORDER BY");
        if is_filter {
            let expr = p.parse_boolean_term().map_err(Error::Parse)?;

            self.params.extend(params);

            combine_or(&mut self.where_part, expr);
        }

        parse_after_filter(self, &mut p)
    }

    /// Splices another query's WHERE into this one under `AND`,
    /// wrapped in parentheses, adopting its parameters in order.
    pub fn and_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());

        let expr = Expr::Paren(Box::new(where_part.clone()));
        combine_and(&mut self.where_part, expr);
    }

    /// Splices another query's WHERE into this one under `OR`,
    /// adopting its parameters in order.
    pub fn or_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());
        combine_or(&mut self.where_part, where_part.clone());
    }

    /// Combines a fragment with the existing HAVING under `AND`.
    pub fn having(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let expr = p.parse_having_part().map_err(Error::Parse)?;

        self.params.extend(params);
        combine_and(&mut self.having, expr);
        Ok(())
    }

    /// Replaces the LIMIT; 0 clears it.
    pub fn limit(&mut self, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: None,
        });
    }

    /// Replaces the LIMIT with an offset and row count; a zero row
    /// count clears it.
    pub fn limit_offset(&mut self, offset: i64, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: Some(int_constant(offset)),
        });
    }

    /// Drops every LEFT JOIN from a single-table FROM.
    pub fn remove_left_joins(&mut self) {
        if self.from.len() != 1 {
            return;
        }
        if let Some(FromItem::Table(table)) = self.from.first_mut() {
            table.joins.retain(|j| j.kind != JoinKind::Left);
        }
    }
}

impl UpdateQuery {
    /// Replaces the SET assignment list with the parsed fragment.
    pub fn set_columns(&mut self, code: &str) -> Result<(), Error> {
        self.columns.clear();
        self.add_columns(code)
    }

    /// Appends the parsed fragment to the SET assignment list.
    pub fn add_columns(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let cols = p.parse_column_values().map_err(Error::Parse)?;
        self.columns.extend(cols);
        Ok(())
    }

    /// Appends joins to the target table. A fragment without a leading
    /// join keyword gets an implicit `JOIN`.
    pub fn join(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;

        if !p.at_join_keyword() {
            p.prepend(TokenKind::Keyword(Keyword::Join));
        }

        let joins = p.parse_joins().map_err(Error::Parse)?;
        self.table.joins.extend(joins);
        Ok(())
    }

    /// Combines a filter fragment with the existing WHERE under `AND`.
    pub fn and_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let expr = p.parse_boolean_expr().map_err(Error::Parse)?;

        self.params.append(&mut p.params);
        self.params.extend(params);

        combine_and(&mut self.where_part, expr);
        Ok(())
    }

    /// Combines a filter fragment with the existing WHERE under `OR`.
    pub fn or_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let expr = p.parse_boolean_term().map_err(Error::Parse)?;

        self.params.extend(params);

        combine_or(&mut self.where_part, expr);
        Ok(())
    }

    /// Splices another query's WHERE into this one under `AND`.
    pub fn and_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());

        let expr = Expr::Paren(Box::new(where_part.clone()));
        combine_and(&mut self.where_part, expr);
    }

    /// Splices another query's WHERE into this one under `OR`.
    pub fn or_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());
        combine_or(&mut self.where_part, where_part.clone());
    }

    /// Replaces the LIMIT; 0 clears it.
    pub fn limit(&mut self, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: None,
        });
    }

    /// Replaces the LIMIT with an offset and row count; a zero row
    /// count clears it.
    pub fn limit_offset(&mut self, offset: i64, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: Some(int_constant(offset)),
        });
    }
}

impl DeleteQuery {
    /// Appends joins to the target table. A fragment without a leading
    /// join keyword gets an implicit `JOIN`.
    pub fn join(&mut self, code: &str) -> Result<(), Error> {
        let mut p = Parser::new(code)?;

        if !p.at_join_keyword() {
            p.prepend(TokenKind::Keyword(Keyword::Join));
        }

        let joins = p.parse_joins().map_err(Error::Parse)?;
        self.table.joins.extend(joins);
        Ok(())
    }

    /// Combines a filter fragment with the existing WHERE under `AND`.
    pub fn and_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let expr = p.parse_boolean_expr().map_err(Error::Parse)?;

        self.params.append(&mut p.params);
        self.params.extend(params);

        combine_and(&mut self.where_part, expr);
        Ok(())
    }

    /// Combines a filter fragment with the existing WHERE under `OR`.
    pub fn or_where(
        &mut self,
        code: &str,
        params: impl IntoIterator<Item = Value>,
    ) -> Result<(), Error> {
        let mut p = Parser::new(code)?;
        let expr = p.parse_boolean_term().map_err(Error::Parse)?;

        self.params.extend(params);

        combine_or(&mut self.where_part, expr);
        Ok(())
    }

    /// Splices another query's WHERE into this one under `AND`.
    pub fn and_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());

        let expr = Expr::Paren(Box::new(where_part.clone()));
        combine_and(&mut self.where_part, expr);
    }

    /// Splices another query's WHERE into this one under `OR`.
    pub fn or_query(&mut self, filter: &SelectQuery) {
        let Some(where_part) = &filter.where_part else {
            return;
        };

        self.params.extend(filter.params.iter().cloned());
        combine_or(&mut self.where_part, where_part.clone());
    }

    /// Replaces the LIMIT; 0 clears it.
    pub fn limit(&mut self, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: None,
        });
    }

    /// Replaces the LIMIT with an offset and row count; a zero row
    /// count clears it.
    pub fn limit_offset(&mut self, offset: i64, row_count: i64) {
        if row_count == 0 {
            self.limit = None;
            return;
        }

        self.limit = Some(Limit {
            pos: crate::lexer::Position::default(),
            row_count: int_constant(row_count),
            offset: Some(int_constant(offset)),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_select_prepends_keyword() {
        let q = parse_select("id from users", std::iter::empty()).unwrap();
        assert_eq!(q.columns.len(), 1);
        assert_eq!(q.from.len(), 1);
    }

    #[test]
    fn test_parse_where_strips_keyword() {
        let q = parse_where("WHERE status=2", std::iter::empty()).unwrap();
        assert!(q.where_part.is_some());
    }

    #[test]
    fn test_limit_zero_clears() {
        let mut q = parse_select("* from users", std::iter::empty()).unwrap();
        q.limit(20);
        assert!(q.limit.is_some());
        q.limit(0);
        assert!(q.limit.is_none());
    }

    #[test]
    fn test_and_query_without_where_is_noop() {
        let mut q = parse_select("* from users", std::iter::empty()).unwrap();
        let filter = SelectQuery::default();
        q.and_query(&filter);
        assert!(q.where_part.is_none());
        assert!(q.params.is_empty());
    }
}
