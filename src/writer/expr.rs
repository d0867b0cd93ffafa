//! Expression emission and the writer-time rewrites.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::ast::{
    BinaryOp, Call, Constant, ConstantKind, Expr, GroupConcat, OrderColumn, OrderKind,
};
use crate::builder::Value;
use crate::error::WriteError;

use super::{default_whitelist, validate_separator, Writer};

static IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z_0-9]*$").expect("identifier pattern"));
static NAMESPACED_IDENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z_0-9:]*$").expect("namespaced pattern"));
static ALNUM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_0-9]+$").expect("alphanumeric pattern"));

pub(crate) fn ident_re() -> &'static Regex {
    &IDENT_RE
}

pub(crate) fn namespaced_ident_re() -> &'static Regex {
    &NAMESPACED_IDENT_RE
}

pub(crate) fn alnum_re() -> &'static Regex {
    &ALNUM_RE
}

fn value_text(v: &Value) -> String {
    match v {
        Value::Null => String::from("null"),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => s.clone(),
        Value::DateTime(dt) => dt.to_rfc3339(),
        Value::List(l) => format!("[{} values]", l.len()),
    }
}

impl Writer<'_> {
    pub(crate) fn write_expr(&mut self, expr: &Expr) -> Result<(), WriteError> {
        match expr {
            Expr::Parameter { .. } => {
                self.buf.push('?');
                self.param_cursor += 1;
                Ok(())
            }
            Expr::AllColumns { table, .. } => {
                if let Some(table) = table {
                    self.write_identifier(table)?;
                    self.buf.push('.');
                }
                self.buf.push('*');
                Ok(())
            }
            Expr::Constant(c) => self.write_constant(c),
            Expr::Paren(inner) => {
                self.buf.push('(');
                self.write_expr(inner)?;
                self.buf.push(')');
                Ok(())
            }
            Expr::Unary { op, operand, .. } => {
                self.buf.push_str(op.as_str());
                self.write_expr(operand)
            }
            Expr::Binary { op, left, right } => self.write_binary(*op, left, right),
            Expr::SelectColumn { expr, alias } => {
                self.write_expr(expr)?;
                self.buf.push_str(" AS ");
                self.write_identifier(alias)
            }
            Expr::Column(col) => self.write_column_ref(col),
            Expr::Subquery(query) => self.write_select(query),
            Expr::Call(call) => self.write_call(call),
            Expr::Between { low, high } => {
                self.write_expr(low)?;
                self.buf.push_str(" AND ");
                self.write_expr(high)
            }
            Expr::InList { values, .. } => self.write_in_list(values),
            Expr::GroupConcat(gc) => self.write_group_concat(gc),
        }
    }

    fn write_constant(&mut self, c: &Constant) -> Result<(), WriteError> {
        match c.kind {
            ConstantKind::Int | ConstantKind::Float => self.buf.push_str(&c.value),
            ConstantKind::Str => {
                self.buf.push('"');
                self.buf.push_str(&c.value.replace('"', "\\\""));
                self.buf.push('"');
            }
            ConstantKind::Null => self.buf.push_str("null"),
            ConstantKind::True => {
                self.buf
                    .push_str(if self.driver.is_sqlite() { "1" } else { "true" });
            }
            ConstantKind::False => {
                self.buf
                    .push_str(if self.driver.is_sqlite() { "0" } else { "false" });
            }
            ConstantKind::Default => self.buf.push_str("default"),
        }
        Ok(())
    }

    fn write_binary(&mut self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<(), WriteError> {
        match op {
            BinaryOp::In => {
                if self.collapse_empty_in(right)? {
                    return Ok(());
                }
            }
            BinaryOp::Eq => {
                if self.rewrite_null_equality(left, right, true)? {
                    return Ok(());
                }
            }
            BinaryOp::NotEq => {
                if self.rewrite_null_equality(left, right, false)? {
                    return Ok(());
                }
            }
            _ => {}
        }

        self.write_expr(left)?;
        self.buf.push(' ');

        if matches!(op, BinaryOp::And | BinaryOp::Or) && self.format {
            self.buf.push_str("\n ");
        }
        self.buf.push_str(op.as_str());

        self.buf.push(' ');
        self.write_expr(right)
    }

    /// `left = NULL` and `left = ?` bound to null become `left IS
    /// NULL` (`IS NOT NULL` for `!=`). A parameter with no bound value
    /// at the cursor is treated as null but not consumed; a bound null
    /// is spliced out of the effective list.
    fn rewrite_null_equality(
        &mut self,
        left: &Expr,
        right: &Expr,
        equals: bool,
    ) -> Result<bool, WriteError> {
        let is_null = match right {
            Expr::Parameter { .. } => {
                if self.params.len() <= self.param_cursor {
                    true
                } else if self.params[self.param_cursor].is_null() {
                    self.params.remove(self.param_cursor);
                    true
                } else {
                    false
                }
            }
            Expr::Constant(c) => c.kind == ConstantKind::Null,
            _ => false,
        };

        if !is_null {
            return Ok(false);
        }

        debug!(kind = ?self.current, equals, "rewrote null equality");

        self.write_expr(left)?;
        self.buf
            .push_str(if equals { " IS NULL" } else { " IS NOT NULL" });
        Ok(true)
    }

    /// `left IN ?` bound to null or an empty list becomes the
    /// impossible condition `1=0`, consuming the parameter.
    fn collapse_empty_in(&mut self, right: &Expr) -> Result<bool, WriteError> {
        let Expr::InList { values, .. } = right else {
            return Ok(false);
        };

        if values.len() != 1 || !matches!(values[0], Expr::Parameter { .. }) {
            return Ok(false);
        }

        let is_empty = if self.params.is_empty() {
            true
        } else {
            if self.params.len() <= self.param_cursor {
                return Err(WriteError::TooFewParameters);
            }
            match &self.params[self.param_cursor] {
                Value::Null => true,
                Value::List(list) => list.is_empty(),
                _ => false,
            }
        };

        if !is_empty {
            return Ok(false);
        }

        debug!(kind = ?self.current, "collapsed empty IN");

        self.buf.push_str("1=0");
        if !self.params.is_empty() {
            self.params.remove(self.param_cursor);
        }
        Ok(true)
    }

    fn write_in_list(&mut self, values: &[Expr]) -> Result<(), WriteError> {
        if self.inline_in_parameter(values)? {
            return Ok(());
        }

        self.buf.push('(');
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_expr(value)?;
        }
        self.buf.push(')');
        Ok(())
    }

    /// Replaces `IN ?` with the bound values inlined, because the
    /// drivers do not accept a parametrized IN list. The parameter is
    /// consumed.
    fn inline_in_parameter(&mut self, values: &[Expr]) -> Result<bool, WriteError> {
        if values.len() != 1
            || self.params.is_empty()
            || !matches!(values[0], Expr::Parameter { .. })
        {
            return Ok(false);
        }

        if self.params.len() <= self.param_cursor {
            return Err(WriteError::TooFewParameters);
        }

        let value = self.params[self.param_cursor].clone();

        debug!(kind = ?self.current, "inlined IN parameter");

        self.buf.push('(');
        match &value {
            Value::List(list) => {
                for (i, v) in list.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_str(", ");
                    }
                    self.write_in_constant(v)?;
                }
            }
            scalar => self.write_in_constant(scalar)?,
        }
        self.buf.push(')');

        // the parameter is now written into the query text
        self.params.remove(self.param_cursor);

        Ok(true)
    }

    fn write_in_constant(&mut self, v: &Value) -> Result<(), WriteError> {
        match v {
            Value::Int(i) => {
                self.buf.push_str(&i.to_string());
                Ok(())
            }
            Value::Float(f) => {
                #[allow(clippy::cast_possible_truncation)]
                let i = *f as i64;
                #[allow(clippy::cast_precision_loss)]
                if *f != i as f64 {
                    return Err(WriteError::InvalidInValue(value_text(v)));
                }
                self.buf.push_str(&i.to_string());
                Ok(())
            }
            Value::Str(s) => {
                // only integer-shaped strings may be inlined
                if s.parse::<i64>().is_err() {
                    return Err(WriteError::InvalidInValue(value_text(v)));
                }
                self.buf.push_str(s);
                Ok(())
            }
            Value::DateTime(dt) => {
                self.buf
                    .push_str(&dt.format("'%Y-%m-%d %H:%M:%S'").to_string());
                Ok(())
            }
            _ => Err(WriteError::InvalidInValue(value_text(v))),
        }
    }

    fn is_whitelisted(&self, name: &str) -> bool {
        let list = match &self.whitelist_funcs {
            Some(list) => list.as_slice(),
            None => match default_whitelist() {
                Some(list) => list,
                None => return true,
            },
        };

        list.iter().any(|v| v.eq_ignore_ascii_case(name))
    }

    fn write_call(&mut self, call: &Call) -> Result<(), WriteError> {
        let name = call.name.to_ascii_uppercase();

        if !self.is_whitelisted(&name) {
            return Err(WriteError::FunctionNotAllowed(name));
        }

        match name.as_str() {
            // CONCAT_WS is not the same, but use what's available
            "CONCAT" | "CONCAT_WS" if self.driver.is_sqlite() => {
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        self.buf.push_str(" || ");
                    }
                    self.write_expr(arg)?;
                }
                return Ok(());
            }
            "UTC_TIMESTAMP" if self.driver.is_sqlite() => {
                if !call.args.is_empty() {
                    return Err(WriteError::UnexpectedArgs);
                }
                self.buf.push_str("datetime('now')");
                return Ok(());
            }
            _ => {}
        }

        self.buf.push_str(&name);
        self.buf.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_expr(arg)?;
        }
        self.buf.push(')');

        Ok(())
    }

    fn write_group_concat(&mut self, gc: &GroupConcat) -> Result<(), WriteError> {
        if self.driver.is_sqlite() {
            // sqlite's GROUP_CONCAT supports neither DISTINCT, ORDER BY
            // nor SEPARATOR
            self.buf.push_str("GROUP_CONCAT(");
            for (i, expr) in gc.exprs.iter().enumerate() {
                if i > 0 {
                    self.buf.push(',');
                }
                self.write_expr(expr)?;
            }
            self.buf.push(')');
            return Ok(());
        }

        self.buf.push_str("GROUP_CONCAT(");

        if gc.distinct {
            self.buf.push_str("DISTINCT ");
        }

        for (i, expr) in gc.exprs.iter().enumerate() {
            if i > 0 {
                self.buf.push(',');
            }
            self.write_expr(expr)?;
        }

        if !gc.order_by.is_empty() {
            self.buf.push(' ');
            self.write_order_by(&gc.order_by)?;
        }

        if let Some(separator) = &gc.separator {
            self.buf.push_str(" SEPARATOR '");
            if validate_separator(separator).is_err() {
                return Err(WriteError::InvalidSeparator(separator.clone()));
            }
            self.buf.push_str(separator);
            self.buf.push('\'');
        }

        self.buf.push(')');
        Ok(())
    }

    pub(crate) fn write_order_by(&mut self, columns: &[OrderColumn]) -> Result<(), WriteError> {
        self.buf.push_str("ORDER BY ");

        for (i, col) in columns.iter().enumerate() {
            if i > 0 {
                self.buf.push_str(", ");
            }
            self.write_order_column(col)?;
        }

        Ok(())
    }

    fn write_order_column(&mut self, col: &OrderColumn) -> Result<(), WriteError> {
        self.write_expr(&col.expr)?;

        match col.order {
            OrderKind::None => Ok(()),
            OrderKind::Asc => {
                self.buf.push_str(" ASC");
                Ok(())
            }
            OrderKind::Desc => {
                self.buf.push_str(" DESC");
                Ok(())
            }
            OrderKind::Random => Err(WriteError::InvalidOrderType(String::from("RANDOM"))),
        }
    }
}
