//! Recursive-descent SQL parser.
//!
//! Statements are parsed by dedicated methods dispatched on the leading
//! keyword; expressions use a layered grammar (boolean expression →
//! boolean term → NOT-factor → relation → expr → term → signed factor →
//! factor), left-associative at every binary level. Each production is
//! a method so the builder can re-run a single production over a
//! fragment and splice the result.

use crate::ast::{
    AddColumnQuery, AddConstraintQuery, AddForeignKeyQuery, AlterDropKind, AlterDropQuery,
    BinaryOp, Call, ColumnRef, ColumnType, ColumnValue, Constant, ConstantKind, CreateColumn,
    CreateDatabaseQuery, CreateTableQuery, DeleteQuery, DropDatabaseQuery, DropTableQuery, Expr,
    FromItem, GroupConcat, InsertQuery, Join, JoinKind, Limit, ModifyColumnQuery, OrderColumn,
    OrderKind, RenameColumnQuery, SelectQuery, ShowKind, ShowQuery, Statement, Table,
    TableConstraint, TableName, UnaryOp, UpdateQuery,
};
use crate::builder::Value;
use crate::error::Error;
use crate::lexer::{Keyword, Lexer, Position, Token, TokenKind};
use crate::writer::validate_separator;

use super::error::ParseError;

/// Parses a single statement.
pub fn parse_query(sql: &str) -> Result<Statement, Error> {
    Parser::new(sql)?.parse_single()
}

/// Parses a script of one or more `;`-separated statements.
pub fn parse_script(sql: &str) -> Result<Vec<Statement>, Error> {
    Parser::new(sql)?.parse()
}

/// SQL parser over a lexed token buffer.
pub struct Parser {
    /// When set, every literal factor is promoted to a `?` placeholder
    /// and its typed value appended to [`Parser::params`].
    pub replace_params: bool,
    pub(crate) params: Vec<Value>,

    tokens: Vec<Token>,
    index: usize,
    eof: Token,
}

impl Parser {
    /// Lexes the input and prepares a parser over the token buffer.
    ///
    /// # Errors
    ///
    /// Returns the lex error for malformed input.
    pub fn new(input: &str) -> Result<Self, ParseError> {
        let tokens = Lexer::new(input).tokenize()?;
        Ok(Self {
            replace_params: false,
            params: Vec::new(),
            tokens,
            index: 0,
            eof: Token::synthetic(TokenKind::Eof),
        })
    }

    /// Parses the whole buffer as `;`-separated statements.
    pub fn parse(&mut self) -> Result<Vec<Statement>, Error> {
        self.parse_statements().map_err(Error::Parse)
    }

    /// Parses the buffer expecting exactly one statement.
    pub fn parse_single(&mut self) -> Result<Statement, Error> {
        let mut statements = self.parse()?;
        if statements.len() != 1 {
            return Err(Error::StatementCount(statements.len()));
        }
        Ok(statements.remove(0))
    }

    fn parse_statements(&mut self) -> Result<Vec<Statement>, ParseError> {
        let mut statements = Vec::new();

        'outer: loop {
            // params are collected per statement
            self.params.clear();

            let statement = match self.peek().kind {
                TokenKind::Comment => {
                    self.next();
                    continue;
                }
                TokenKind::Keyword(Keyword::Select) => {
                    let mut n = self.parse_select()?;
                    n.params = std::mem::take(&mut self.params);
                    Statement::Select(n)
                }
                TokenKind::Keyword(Keyword::Insert) => {
                    let mut n = self.parse_insert()?;
                    n.params = std::mem::take(&mut self.params);
                    Statement::Insert(n)
                }
                TokenKind::Keyword(Keyword::Update) => {
                    let mut n = self.parse_update()?;
                    n.params = std::mem::take(&mut self.params);
                    Statement::Update(n)
                }
                TokenKind::Keyword(Keyword::Delete) => {
                    let mut n = self.parse_delete()?;
                    n.params = std::mem::take(&mut self.params);
                    Statement::Delete(n)
                }
                TokenKind::Keyword(Keyword::Create) => self.parse_create()?,
                TokenKind::Keyword(Keyword::Show) => Statement::Show(self.parse_show()?),
                TokenKind::Keyword(Keyword::Drop) => self.parse_drop()?,
                TokenKind::Keyword(Keyword::Alter) => self.parse_alter()?,
                TokenKind::Eof => break 'outer,
                _ => return Err(ParseError::unexpected(self.peek())),
            };

            statements.push(statement);

            // a `;` is mandatory between statements
            loop {
                match self.peek().kind {
                    TokenKind::Comment => {
                        self.next();
                    }
                    TokenKind::Semicolon => {
                        self.next();
                        break;
                    }
                    TokenKind::Eof => break 'outer,
                    _ => return Err(ParseError::unexpected(self.peek())),
                }
            }
        }

        Ok(statements)
    }

    // --- DML statements ---

    pub(crate) fn parse_select(&mut self) -> Result<SelectQuery, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Select))?;

        let mut query = SelectQuery {
            pos: t.pos,
            ..SelectQuery::default()
        };

        if self.check_keyword(Keyword::Distinct) {
            query.distinct = true;
            self.next();
        }

        query.columns = self.parse_select_columns()?;

        // a simple select without a FROM part
        if matches!(self.peek().kind, TokenKind::Eof | TokenKind::RightParen) {
            return Ok(query);
        }

        if self.check_keyword(Keyword::From) {
            query.from = self.parse_from()?;
            query.where_part = self.parse_where()?;
            query.group_by = self.parse_group_by()?;
            query.having = self.parse_having()?;
        }

        query.order_by = self.parse_order_by()?;
        query.limit = self.parse_limit()?;
        query.union = self.parse_union()?;
        query.for_update = self.parse_for_update()?;

        Ok(query)
    }

    fn parse_union(&mut self) -> Result<Vec<SelectQuery>, ParseError> {
        if !self.check_keyword(Keyword::Union) {
            return Ok(Vec::new());
        }
        self.next();

        let mut queries = Vec::new();
        loop {
            queries.push(self.parse_select()?);
            if self.check_keyword(Keyword::Union) {
                self.next();
            } else {
                break;
            }
        }
        Ok(queries)
    }

    fn parse_for_update(&mut self) -> Result<bool, ParseError> {
        if !self.check_keyword(Keyword::For) {
            return Ok(false);
        }
        self.next();
        self.accept(TokenKind::Keyword(Keyword::Update))?;
        Ok(true)
    }

    pub(crate) fn parse_insert(&mut self) -> Result<InsertQuery, ParseError> {
        self.accept(TokenKind::Keyword(Keyword::Insert))?;
        self.accept(TokenKind::Keyword(Keyword::Into))?;

        let pos = self.peek().pos;
        let (database, name) = self.parse_selector_ident()?;

        let mut insert = InsertQuery {
            pos,
            table: TableName {
                pos,
                database,
                name,
            },
            columns: Vec::new(),
            values: Vec::new(),
            select: None,
            params: Vec::new(),
        };

        if self.check(TokenKind::LeftParen) {
            self.next();
            insert.columns = self.parse_column_names()?;
            self.accept(TokenKind::RightParen)?;
        }

        if self.check_keyword(Keyword::Select) {
            insert.select = Some(self.parse_select()?);
            return Ok(insert);
        }

        self.accept(TokenKind::Keyword(Keyword::Values))?;
        self.accept(TokenKind::LeftParen)?;
        insert.values = self.parse_expression_list()?;
        self.accept(TokenKind::RightParen)?;

        Ok(insert)
    }

    pub(crate) fn parse_update(&mut self) -> Result<UpdateQuery, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Update))?;

        if !self.check(TokenKind::Ident) {
            return Err(ParseError::expecting("IDENT", self.peek()));
        }
        let table = self.parse_from_table()?;

        let mut update = UpdateQuery {
            pos: t.pos,
            table,
            columns: Vec::new(),
            where_part: None,
            limit: None,
            params: Vec::new(),
        };

        match self.peek().kind {
            TokenKind::Keyword(Keyword::Set) => {
                self.next();
            }
            TokenKind::Eof => return Ok(update),
            _ => return Err(ParseError::unexpected(self.peek())),
        }

        let paren = self.check(TokenKind::LeftParen);
        if paren {
            self.next();
        }

        update.columns = self.parse_column_values()?;

        if paren {
            self.accept(TokenKind::RightParen)?;
        }

        update.where_part = self.parse_where()?;
        update.limit = self.parse_limit()?;

        Ok(update)
    }

    pub(crate) fn parse_delete(&mut self) -> Result<DeleteQuery, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Delete))?;

        let mut aliases = Vec::new();
        if !self.check_keyword(Keyword::From) {
            loop {
                let a = self.accept(TokenKind::Ident)?;
                aliases.push(a.text);
                if !self.check(TokenKind::Comma) {
                    break;
                }
                self.next();
            }
        }

        self.accept(TokenKind::Keyword(Keyword::From))?;

        if !self.check(TokenKind::Ident) {
            return Err(ParseError::expecting("IDENT", self.peek()));
        }
        let table = self.parse_from_table()?;

        Ok(DeleteQuery {
            pos: t.pos,
            aliases,
            table,
            where_part: self.parse_where()?,
            limit: self.parse_limit()?,
            params: Vec::new(),
        })
    }

    // --- SELECT clauses ---

    pub(crate) fn parse_select_columns(&mut self) -> Result<Vec<Expr>, ParseError> {
        let t = self.peek();
        if t.kind == TokenKind::Star {
            let pos = t.pos;
            self.next();
            return Ok(vec![Expr::AllColumns { pos, table: None }]);
        }

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_select_column_expr()?);

            let t = self.peek();
            if t.kind != TokenKind::Comma {
                if t.kind == TokenKind::Ident {
                    return Err(ParseError::new(
                        format!("ParseColumns: Unexpected IDENT '{}' at {}", t.text, t.pos),
                        t.text.clone(),
                        t.pos,
                    ));
                }
                break;
            }
            self.next();

            // allow a trailing comma before FROM
            if self.check_keyword(Keyword::From) {
                break;
            }
        }

        Ok(columns)
    }

    fn parse_select_column_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_boolean_expr()?;

        if !self.check_keyword(Keyword::As) {
            return Ok(expr);
        }
        self.next();

        let t = self.next();
        let alias = match t.kind {
            TokenKind::Ident | TokenKind::Str | TokenKind::Keyword(Keyword::Text) => t.text,
            _ => {
                return Err(ParseError::new(
                    format!("Expecting alias, got {}", t.text),
                    t.text.clone(),
                    t.pos,
                ));
            }
        };

        // a plain column reference keeps its alias inline
        if let Expr::Column(mut col) = expr {
            col.alias = Some(alias);
            return Ok(Expr::Column(col));
        }

        Ok(Expr::SelectColumn {
            expr: Box::new(expr),
            alias,
        })
    }

    pub(crate) fn parse_from(&mut self) -> Result<Vec<FromItem>, ParseError> {
        self.accept(TokenKind::Keyword(Keyword::From))?;

        let mut froms = Vec::new();
        loop {
            if self.check(TokenKind::LeftParen) {
                let expr = self.parse_paren_expr()?;

                let alias = if self.check_keyword(Keyword::As) {
                    self.next();
                    let t = self.next();
                    match t.kind {
                        TokenKind::Ident | TokenKind::Str | TokenKind::Keyword(Keyword::Text) => {
                            Some(t.text)
                        }
                        _ => {
                            return Err(ParseError::new(
                                format!("Expecting alias, got {}", t.text),
                                t.text.clone(),
                                t.pos,
                            ));
                        }
                    }
                } else if self.check(TokenKind::Ident) {
                    Some(self.accept(TokenKind::Ident)?.text)
                } else {
                    None
                };

                froms.push(FromItem::Subquery { expr, alias });
            } else {
                froms.push(FromItem::Table(self.parse_from_table()?));
            }

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        Ok(froms)
    }

    pub(crate) fn parse_from_table(&mut self) -> Result<Table, ParseError> {
        let pos = self.peek().pos;
        let (database, name) = self.parse_selector_ident()?;

        let mut table = Table {
            pos,
            name,
            database,
            alias: None,
            joins: Vec::new(),
        };

        match self.peek().kind {
            TokenKind::Keyword(Keyword::As) => {
                self.next();
                let t = self.next();
                match t.kind {
                    TokenKind::Ident | TokenKind::Str | TokenKind::Keyword(Keyword::Text) => {
                        table.alias = Some(t.text);
                    }
                    _ => {
                        return Err(ParseError::new(
                            format!("Expecting alias, got {}", t.text),
                            t.text.clone(),
                            t.pos,
                        ));
                    }
                }
            }
            TokenKind::Ident => {
                table.alias = Some(self.accept(TokenKind::Ident)?.text);
            }
            _ => {}
        }

        if matches!(
            self.peek().kind,
            TokenKind::Keyword(
                Keyword::Left
                    | Keyword::Right
                    | Keyword::Inner
                    | Keyword::Outer
                    | Keyword::Cross
                    | Keyword::Join
            )
        ) {
            table.joins = self.parse_joins()?;
        }

        Ok(table)
    }

    pub(crate) fn parse_joins(&mut self) -> Result<Vec<Join>, ParseError> {
        let mut joins = Vec::new();

        loop {
            let t = self.peek().clone();
            let kind = match t.kind {
                TokenKind::Keyword(kw @ (Keyword::Left
                | Keyword::Right
                | Keyword::Inner
                | Keyword::Outer
                | Keyword::Cross)) => {
                    self.next();
                    self.accept(TokenKind::Keyword(Keyword::Join))?;
                    match kw {
                        Keyword::Left => JoinKind::Left,
                        Keyword::Right => JoinKind::Right,
                        Keyword::Inner => JoinKind::Inner,
                        Keyword::Outer => JoinKind::Outer,
                        _ => JoinKind::Cross,
                    }
                }
                TokenKind::Keyword(Keyword::Join) => {
                    self.next();
                    JoinKind::Join
                }
                _ => break,
            };

            let (database, table) = self.parse_selector_ident()?;
            let mut join = Join {
                pos: t.pos,
                kind,
                database,
                table,
                alias: None,
                on: None,
            };

            match self.peek().kind {
                TokenKind::Keyword(Keyword::As) => {
                    self.next();
                    let t = self.next();
                    match t.kind {
                        TokenKind::Ident | TokenKind::Str | TokenKind::Keyword(Keyword::Text) => {
                            join.alias = Some(t.text);
                        }
                        _ => {
                            return Err(ParseError::new(
                                format!("Expecting alias, got {}", t.text),
                                t.text.clone(),
                                t.pos,
                            ));
                        }
                    }
                }
                TokenKind::Ident => {
                    join.alias = Some(self.accept(TokenKind::Ident)?.text);
                }
                _ => {}
            }

            if self.check_keyword(Keyword::On) {
                self.next();
                join.on = Some(self.parse_boolean_expr()?);
            }

            joins.push(join);
        }

        Ok(joins)
    }

    pub(crate) fn parse_where(&mut self) -> Result<Option<Expr>, ParseError> {
        if !self.check_keyword(Keyword::Where) {
            return Ok(None);
        }
        self.next();
        Ok(Some(self.parse_boolean_expr()?))
    }

    pub(crate) fn parse_group_by(&mut self) -> Result<Vec<Expr>, ParseError> {
        if !self.check_keyword(Keyword::Group) {
            return Ok(Vec::new());
        }
        self.next();
        self.accept(TokenKind::Keyword(Keyword::By))?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_select_column_expr()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }
        Ok(columns)
    }

    pub(crate) fn parse_having(&mut self) -> Result<Option<Expr>, ParseError> {
        if !self.check_keyword(Keyword::Having) {
            return Ok(None);
        }
        self.next();
        Ok(Some(self.parse_having_part()?))
    }

    pub(crate) fn parse_having_part(&mut self) -> Result<Expr, ParseError> {
        self.parse_boolean_expr()
    }

    pub(crate) fn parse_order_by(&mut self) -> Result<Vec<OrderColumn>, ParseError> {
        if !self.check_keyword(Keyword::Order) {
            return Ok(Vec::new());
        }
        self.next();
        self.accept(TokenKind::Keyword(Keyword::By))?;

        let mut columns = Vec::new();
        loop {
            let col = self.parse_column_name_expr()?;
            let mut order_col = OrderColumn {
                expr: Expr::Column(col),
                order: OrderKind::None,
            };

            match self.peek().kind {
                TokenKind::Keyword(Keyword::Asc) => {
                    self.next();
                    order_col.order = OrderKind::Asc;
                }
                TokenKind::Keyword(Keyword::Desc) => {
                    self.next();
                    order_col.order = OrderKind::Desc;
                }
                TokenKind::Keyword(Keyword::Random) => {
                    self.next();
                    order_col.order = OrderKind::Random;
                }
                _ => {}
            }

            columns.push(order_col);

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        Ok(columns)
    }

    pub(crate) fn parse_limit(&mut self) -> Result<Option<Limit>, ParseError> {
        if !self.check_keyword(Keyword::Limit) {
            return Ok(None);
        }
        let t = self.next();

        let rows = self.peek().clone();
        match rows.kind {
            TokenKind::Int | TokenKind::Question => {
                self.next();
            }
            _ => {
                return Err(ParseError::new(
                    format!("Unexpected {} after LIMIT", rows.text),
                    rows.text.clone(),
                    rows.pos,
                ));
            }
        }

        // a `?` slot is kept as an INT constant with the literal text so
        // it re-emits verbatim without touching the parameter cursor
        let first = Expr::Constant(Constant {
            pos: rows.pos,
            kind: ConstantKind::Int,
            value: rows.text,
        });

        let mut limit = Limit {
            pos: t.pos,
            row_count: first,
            offset: None,
        };

        if self.check(TokenKind::Comma) {
            self.next();

            let off = self.peek().clone();
            match off.kind {
                TokenKind::Int | TokenKind::Question => {
                    self.next();
                }
                _ => {
                    return Err(ParseError::new(
                        format!("Unexpected {} after LIMIT", off.text),
                        off.text.clone(),
                        off.pos,
                    ));
                }
            }

            // with two values the first is the offset and the second
            // the row count
            limit.offset = Some(limit.row_count);
            limit.row_count = Expr::Constant(Constant {
                pos: off.pos,
                kind: ConstantKind::Int,
                value: off.text,
            });
        }

        Ok(Some(limit))
    }

    // --- identifiers ---

    /// Parses `name` or `qualifier.name`.
    pub(crate) fn parse_selector_ident(
        &mut self,
    ) -> Result<(Option<String>, String), ParseError> {
        let a = self.parse_prefixed_ident()?;

        if self.check(TokenKind::Dot) {
            self.next();
            let b = self.parse_prefixed_ident()?;
            return Ok((Some(a), b));
        }

        Ok((None, a))
    }

    /// Parses an identifier that may carry `:`-separated namespace
    /// prefixes, e.g. `crm:client`. Stored verbatim.
    pub(crate) fn parse_prefixed_ident(&mut self) -> Result<String, ParseError> {
        let mut ident = self.accept(TokenKind::Ident)?.text;

        while self.check(TokenKind::Colon) {
            self.next();
            let part = self.accept(TokenKind::Ident)?;
            ident.push(':');
            ident.push_str(&part.text);
        }

        Ok(ident)
    }

    pub(crate) fn parse_column_name_expr(&mut self) -> Result<ColumnRef, ParseError> {
        let pos = self.peek().pos;
        let (table, name) = self.parse_selector_ident()?;
        Ok(ColumnRef {
            pos,
            table,
            name,
            alias: None,
        })
    }

    /// Parses `name`, `a.name` or `a.*`.
    fn parse_column_expr(&mut self) -> Result<Expr, ParseError> {
        let pos = self.peek().pos;
        let (table, name) = self.parse_select_column_ident()?;

        if name == "*" {
            return Ok(Expr::AllColumns { pos, table });
        }

        Ok(Expr::Column(ColumnRef {
            pos,
            table,
            name,
            alias: None,
        }))
    }

    fn parse_select_column_ident(&mut self) -> Result<(Option<String>, String), ParseError> {
        let a = self.accept(TokenKind::Ident)?;

        if self.check(TokenKind::Dot) {
            self.next();
            if self.check(TokenKind::Star) {
                self.next();
                return Ok((Some(a.text), String::from("*")));
            }
            let b = self.accept(TokenKind::Ident)?;
            return Ok((Some(a.text), b.text));
        }

        Ok((None, a.text))
    }

    fn parse_column_names(&mut self) -> Result<Vec<ColumnRef>, ParseError> {
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_name_expr()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }
        Ok(columns)
    }

    pub(crate) fn parse_column_values(&mut self) -> Result<Vec<ColumnValue>, ParseError> {
        let mut columns = Vec::new();

        loop {
            let pos = self.peek().pos;
            let (table, name) = self.parse_selector_ident()?;
            self.accept(TokenKind::Eq)?;
            let expr = self.parse_boolean_expr()?;

            columns.push(ColumnValue {
                pos,
                table,
                name,
                expr,
            });

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        Ok(columns)
    }

    // --- expressions ---

    pub(crate) fn parse_boolean_expr(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_boolean_term()?;

        while self.check_keyword(Keyword::Or) {
            self.next();
            let rh = self.parse_boolean_term()?;
            e = e.or(rh);
        }

        Ok(e)
    }

    pub(crate) fn parse_boolean_term(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_not_factor()?;

        while self.check_keyword(Keyword::And) {
            self.next();
            let rh = self.parse_not_factor()?;
            e = e.and(rh);
        }

        Ok(e)
    }

    fn parse_not_factor(&mut self) -> Result<Expr, ParseError> {
        if self.check(TokenKind::Bang) {
            let t = self.next();
            let operand = self.parse_relation()?;
            return Ok(Expr::Unary {
                pos: t.pos,
                op: UnaryOp::Not,
                operand: Box::new(operand),
            });
        }

        self.parse_relation()
    }

    fn parse_relation(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_expr()?;

        loop {
            let t = self.peek().clone();
            match t.kind {
                TokenKind::Keyword(Keyword::Not) => {
                    self.next();
                    let t = self.peek().clone();
                    match t.kind {
                        TokenKind::Keyword(Keyword::Like) => {
                            self.next();
                            let rh = self.parse_expr()?;
                            e = Expr::Binary {
                                op: BinaryOp::NotLike,
                                left: Box::new(e),
                                right: Box::new(rh),
                            };
                        }
                        TokenKind::Keyword(Keyword::In) => {
                            let rh = self.parse_in_expr()?;
                            e = Expr::Binary {
                                op: BinaryOp::NotIn,
                                left: Box::new(e),
                                right: Box::new(rh),
                            };
                        }
                        _ => {
                            return Err(ParseError::new(
                                format!("Unexpected {} after NOT", t.text),
                                t.text.clone(),
                                t.pos,
                            ));
                        }
                    }
                }
                TokenKind::Eq
                | TokenKind::NotEq
                | TokenKind::Lt
                | TokenKind::LtEq
                | TokenKind::Gt
                | TokenKind::GtEq
                | TokenKind::Keyword(Keyword::Like) => {
                    self.next();
                    let rh = self.parse_expr()?;
                    let op = match t.kind {
                        TokenKind::Eq => BinaryOp::Eq,
                        TokenKind::NotEq => BinaryOp::NotEq,
                        TokenKind::Lt => BinaryOp::Lt,
                        TokenKind::LtEq => BinaryOp::LtEq,
                        TokenKind::Gt => BinaryOp::Gt,
                        TokenKind::GtEq => BinaryOp::GtEq,
                        _ => BinaryOp::Like,
                    };
                    e = Expr::Binary {
                        op,
                        left: Box::new(e),
                        right: Box::new(rh),
                    };
                }
                TokenKind::Keyword(Keyword::Is) => {
                    self.next();
                    let op = if self.check_keyword(Keyword::Not) {
                        self.next();
                        BinaryOp::IsNot
                    } else {
                        BinaryOp::Is
                    };
                    let rh = self.parse_expr()?;
                    e = Expr::Binary {
                        op,
                        left: Box::new(e),
                        right: Box::new(rh),
                    };
                }
                TokenKind::Keyword(Keyword::In) => {
                    let rh = self.parse_in_expr()?;
                    e = Expr::Binary {
                        op: BinaryOp::In,
                        left: Box::new(e),
                        right: Box::new(rh),
                    };
                }
                TokenKind::Keyword(Keyword::Between) => {
                    let rh = self.parse_between_expr()?;
                    e = Expr::Binary {
                        op: BinaryOp::Between,
                        left: Box::new(e),
                        right: Box::new(rh),
                    };
                }
                _ => break,
            }
        }

        Ok(e)
    }

    fn parse_between_expr(&mut self) -> Result<Expr, ParseError> {
        self.next(); // BETWEEN

        let low = self.parse_expr()?;
        self.accept(TokenKind::Keyword(Keyword::And))?;
        let high = self.parse_expr()?;

        Ok(Expr::Between {
            low: Box::new(low),
            high: Box::new(high),
        })
    }

    fn parse_in_expr(&mut self) -> Result<Expr, ParseError> {
        self.next(); // IN

        if !self.check(TokenKind::LeftParen) {
            let expr = self.parse_expr()?;
            return Ok(Expr::InList {
                pos: expr.pos(),
                values: vec![expr],
            });
        }

        let lp = self.accept(TokenKind::LeftParen)?;

        let values = if self.check_keyword(Keyword::Select) {
            vec![Expr::Subquery(Box::new(self.parse_select()?))]
        } else {
            self.parse_expression_list()?
        };

        self.accept(TokenKind::RightParen)?;

        Ok(Expr::InList {
            pos: lp.pos,
            values,
        })
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_term()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            self.next();
            let rh = self.parse_term()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(rh),
            };
        }

        Ok(e)
    }

    fn parse_term(&mut self) -> Result<Expr, ParseError> {
        let mut e = self.parse_signed_factor()?;

        loop {
            let op = match self.peek().kind {
                TokenKind::Star => BinaryOp::Mul,
                TokenKind::Slash => BinaryOp::Div,
                TokenKind::Percent => BinaryOp::Mod,
                TokenKind::Shr => BinaryOp::Shr,
                TokenKind::BitAnd => BinaryOp::BitAnd,
                _ => break,
            };
            self.next();
            let rh = self.parse_signed_factor()?;
            e = Expr::Binary {
                op,
                left: Box::new(e),
                right: Box::new(rh),
            };
        }

        Ok(e)
    }

    fn parse_signed_factor(&mut self) -> Result<Expr, ParseError> {
        let op = match self.peek().kind {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Minus,
            _ => return self.parse_factor(),
        };

        let t = self.next();
        let operand = self.parse_factor()?;
        Ok(Expr::Unary {
            pos: t.pos,
            op,
            operand: Box::new(operand),
        })
    }

    fn parse_factor(&mut self) -> Result<Expr, ParseError> {
        let t = self.peek().clone();
        match t.kind {
            TokenKind::Int
            | TokenKind::Float
            | TokenKind::Str
            | TokenKind::Keyword(Keyword::Null | Keyword::True | Keyword::False) => {
                self.next();

                if self.replace_params {
                    let value = literal_value(&t)?;
                    self.params.push(value);
                    return Ok(Expr::Parameter { pos: t.pos });
                }

                let kind = match t.kind {
                    TokenKind::Int => ConstantKind::Int,
                    TokenKind::Float => ConstantKind::Float,
                    TokenKind::Str => ConstantKind::Str,
                    TokenKind::Keyword(Keyword::Null) => ConstantKind::Null,
                    TokenKind::Keyword(Keyword::True) => ConstantKind::True,
                    _ => ConstantKind::False,
                };
                Ok(Expr::Constant(Constant {
                    pos: t.pos,
                    kind,
                    value: t.text,
                }))
            }

            TokenKind::Keyword(Keyword::Default) => {
                self.next();
                Ok(Expr::Constant(Constant {
                    pos: t.pos,
                    kind: ConstantKind::Default,
                    value: t.text,
                }))
            }

            TokenKind::Star => {
                self.next();
                Ok(Expr::AllColumns {
                    pos: t.pos,
                    table: None,
                })
            }

            TokenKind::Question => {
                self.next();
                Ok(Expr::Parameter { pos: t.pos })
            }

            TokenKind::Ident | TokenKind::Keyword(Keyword::Distinct) => {
                if self.peek_two().kind == TokenKind::LeftParen {
                    if t.text.eq_ignore_ascii_case("GROUP_CONCAT") {
                        return self.parse_group_concat();
                    }
                    return self.parse_call_expr();
                }
                self.parse_column_expr()
            }

            TokenKind::LeftParen => self.parse_paren_expr(),

            _ => Err(ParseError::new(
                format!("Expecting expression, got {}", t.kind),
                t.text.clone(),
                t.pos,
            )),
        }
    }

    fn parse_paren_expr(&mut self) -> Result<Expr, ParseError> {
        self.accept(TokenKind::LeftParen)?;

        let inner = if self.check_keyword(Keyword::Select) {
            Expr::Subquery(Box::new(self.parse_select()?))
        } else {
            self.parse_boolean_expr()?
        };

        self.accept(TokenKind::RightParen)?;

        Ok(Expr::Paren(Box::new(inner)))
    }

    fn parse_group_concat(&mut self) -> Result<Expr, ParseError> {
        let t = self.next();
        if t.kind != TokenKind::Ident {
            return Err(ParseError::new(
                format!("Expecting expression, got {}", t.kind),
                t.text.clone(),
                t.pos,
            ));
        }

        self.accept(TokenKind::LeftParen)?;

        let mut gc = GroupConcat {
            pos: t.pos,
            distinct: false,
            exprs: Vec::new(),
            order_by: Vec::new(),
            separator: None,
        };

        if self.check_keyword(Keyword::Distinct) {
            self.next();
            gc.distinct = true;
        }

        loop {
            gc.exprs.push(self.parse_expr()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        gc.order_by = self.parse_order_by()?;

        if self.peek().text.eq_ignore_ascii_case("SEPARATOR") {
            self.next();
            let t = self.accept(TokenKind::Str)?;
            if let Err(msg) = validate_separator(&t.text) {
                return Err(ParseError::new(msg, t.text.clone(), t.pos));
            }
            gc.separator = Some(t.text);
        }

        self.accept(TokenKind::RightParen)?;

        Ok(Expr::GroupConcat(gc))
    }

    fn parse_call_expr(&mut self) -> Result<Expr, ParseError> {
        let t = self.next();
        if !matches!(
            t.kind,
            TokenKind::Ident | TokenKind::Keyword(Keyword::Distinct)
        ) {
            return Err(ParseError::new(
                format!("Expecting expression, got {}", t.kind),
                t.text.clone(),
                t.pos,
            ));
        }

        self.accept(TokenKind::LeftParen)?;

        let args = if self.check(TokenKind::RightParen) {
            Vec::new()
        } else {
            self.parse_expression_list()?
        };

        self.accept(TokenKind::RightParen)?;

        Ok(Expr::Call(Call {
            pos: t.pos,
            name: t.text,
            args,
        }))
    }

    fn parse_expression_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();
        loop {
            args.push(self.parse_boolean_expr()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }
        Ok(args)
    }

    // --- DDL statements ---

    fn parse_create(&mut self) -> Result<Statement, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Create))?;

        match self.peek().kind {
            TokenKind::Keyword(Keyword::Database) => {
                Ok(Statement::CreateDatabase(self.parse_create_database(t.pos)?))
            }
            TokenKind::Keyword(Keyword::Table) => {
                Ok(Statement::CreateTable(self.parse_create_table(t.pos)?))
            }
            _ => Err(ParseError::unexpected(self.peek())),
        }
    }

    fn parse_create_database(&mut self, pos: Position) -> Result<CreateDatabaseQuery, ParseError> {
        self.accept(TokenKind::Keyword(Keyword::Database))?;

        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.accept(TokenKind::Ident)?.text;

        Ok(CreateDatabaseQuery {
            pos,
            name,
            if_not_exists,
        })
    }

    fn parse_create_table(&mut self, pos: Position) -> Result<CreateTableQuery, ParseError> {
        self.accept(TokenKind::Keyword(Keyword::Table))?;

        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_prefixed_ident()?;

        self.accept(TokenKind::LeftParen)?;

        let mut query = CreateTableQuery {
            pos,
            name,
            columns: self.parse_create_columns()?,
            constraints: Vec::new(),
            if_not_exists,
        };

        // a trailing PRIMARY KEY(id) clause is accepted and discarded
        if self.peek().text.eq_ignore_ascii_case("PRIMARY") {
            self.next();
            self.accept_text("KEY")?;
            self.accept(TokenKind::LeftParen)?;
            self.accept_text("id")?;
            self.accept(TokenKind::RightParen)?;
            self.accept(TokenKind::Comma)?;
        }

        loop {
            match self.peek().kind {
                TokenKind::Ident => {
                    if self.peek().text.eq_ignore_ascii_case("UNIQUE") {
                        query.constraints.push(self.parse_unique_key()?);
                    } else {
                        return Err(ParseError::unexpected(self.peek()));
                    }
                }
                TokenKind::Keyword(Keyword::Constraint) => {
                    query.constraints.push(self.parse_constraint()?);
                }
                _ => break,
            }

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        self.accept(TokenKind::RightParen)?;

        Ok(query)
    }

    fn parse_if_not_exists(&mut self) -> Result<bool, ParseError> {
        if !self.peek().text.eq_ignore_ascii_case("IF") {
            return Ok(false);
        }
        self.next();
        self.accept(TokenKind::Keyword(Keyword::Not))?;
        self.accept(TokenKind::Keyword(Keyword::Exists))?;
        Ok(true)
    }

    fn parse_create_columns(&mut self) -> Result<Vec<CreateColumn>, ParseError> {
        let mut columns = Vec::new();

        loop {
            let t = self.peek();
            match t.kind {
                TokenKind::Keyword(Keyword::Constraint) => break,
                TokenKind::Ident
                    if t.text.eq_ignore_ascii_case("PRIMARY")
                        || t.text.eq_ignore_ascii_case("UNIQUE") =>
                {
                    break;
                }
                _ => {}
            }

            columns.push(self.parse_create_column()?);

            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        Ok(columns)
    }

    fn parse_column_name(&mut self) -> Result<String, ParseError> {
        let t = self.next();
        match t.kind {
            TokenKind::Ident
            | TokenKind::Str
            | TokenKind::Keyword(Keyword::Text | Keyword::Order) => Ok(t.text),
            _ => Err(ParseError::new(
                format!("Invalid column name, got {}", t.kind),
                t.text.clone(),
                t.pos,
            )),
        }
    }

    pub(crate) fn parse_create_column(&mut self) -> Result<CreateColumn, ParseError> {
        let name = self.parse_column_name()?;
        let mut col = CreateColumn::new(name, ColumnType::Int);

        // KEY is a shortcut for an auto-incrementing integer primary key
        let k = self.peek();
        if k.kind == TokenKind::Ident && k.text.eq_ignore_ascii_case("KEY") {
            self.next();
            col.key = true;
            return Ok(col);
        }

        col.ty = self.parse_column_type()?;
        self.parse_column_size(&mut col)?;

        let mut nullable = true;
        if self.check_keyword(Keyword::Not) {
            self.next();
            nullable = false;
        }
        if self.check_keyword(Keyword::Null) {
            self.next();
            col.nullable = nullable;
        }

        let t = self.peek().clone();
        if t.text.eq_ignore_ascii_case("AUTO_INCREMENT") {
            if !col.name.eq_ignore_ascii_case("id") {
                return Err(ParseError::new(
                    format!(
                        "AUTO_INCREMENT is only supported on ID columns: {}",
                        col.name
                    ),
                    t.text.clone(),
                    t.pos,
                ));
            }
            self.next();
        }

        if self.check_keyword(Keyword::Default) {
            self.next();
            let t = self.next();
            col.default = match t.kind {
                TokenKind::Str => Some(format!("'{}'", t.text)),
                TokenKind::Int
                | TokenKind::Float
                | TokenKind::Keyword(Keyword::True | Keyword::False) => Some(t.text),
                _ => {
                    return Err(ParseError::new(
                        format!("Invalid default value type {}", t.text),
                        t.text.clone(),
                        t.pos,
                    ));
                }
            };
        }

        Ok(col)
    }

    fn parse_column_type(&mut self) -> Result<ColumnType, ParseError> {
        let t = self.next();
        match t.kind {
            TokenKind::Keyword(Keyword::Int) => Ok(ColumnType::Int),
            TokenKind::Keyword(Keyword::Decimal) => Ok(ColumnType::Decimal),
            TokenKind::Keyword(Keyword::Char) => Ok(ColumnType::Char),
            TokenKind::Keyword(Keyword::Varchar) => Ok(ColumnType::Varchar),
            TokenKind::Keyword(Keyword::Text) => Ok(ColumnType::Text),
            TokenKind::Keyword(Keyword::MediumText) => Ok(ColumnType::MediumText),
            TokenKind::Keyword(Keyword::Bool) => Ok(ColumnType::Bool),
            TokenKind::Keyword(Keyword::Blob) => Ok(ColumnType::Blob),
            TokenKind::Keyword(Keyword::DateTime) => Ok(ColumnType::DateTime),
            _ => Err(ParseError::new(
                format!("Invalid column type {}", t.text),
                t.text.clone(),
                t.pos,
            )),
        }
    }

    fn parse_column_size(&mut self, col: &mut CreateColumn) -> Result<(), ParseError> {
        if !self.check(TokenKind::LeftParen) {
            return Ok(());
        }
        self.next();

        col.size = Some(self.accept(TokenKind::Int)?.text);

        if self.check(TokenKind::Comma) {
            self.next();
            col.decimals = Some(self.accept(TokenKind::Int)?.text);
        }

        self.accept(TokenKind::RightParen)?;
        Ok(())
    }

    fn parse_unique_key(&mut self) -> Result<TableConstraint, ParseError> {
        self.accept_text("UNIQUE")?;
        self.accept_text("KEY")?;

        let name = self.accept(TokenKind::Ident)?.text;

        self.accept(TokenKind::LeftParen)?;
        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_name()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }
        self.accept(TokenKind::RightParen)?;

        Ok(TableConstraint::Unique { name, columns })
    }

    fn parse_constraint(&mut self) -> Result<TableConstraint, ParseError> {
        self.accept(TokenKind::Keyword(Keyword::Constraint))?;

        let name = self.accept(TokenKind::Ident)?.text;
        let t = self.accept(TokenKind::Ident)?;

        if t.text.eq_ignore_ascii_case("FOREIGN") {
            return self.parse_fk_constraint(name);
        }
        if t.text.eq_ignore_ascii_case("UNIQUE") {
            return self.parse_unique_constraint(name);
        }

        Err(ParseError::unexpected(&t))
    }

    fn parse_fk_constraint(&mut self, name: String) -> Result<TableConstraint, ParseError> {
        self.accept_text("KEY")?;

        self.accept(TokenKind::LeftParen)?;
        let column = self.parse_column_name()?;
        self.accept(TokenKind::RightParen)?;

        self.accept_text("REFERENCES")?;
        let ref_table = self.parse_prefixed_ident()?;

        self.accept(TokenKind::LeftParen)?;
        let ref_column = self.parse_column_name()?;
        self.accept(TokenKind::RightParen)?;

        // ON DELETE CASCADE is accepted here but not carried over
        if self.check_keyword(Keyword::On) {
            self.next();
            self.accept_text("DELETE")?;
            self.accept_text("CASCADE")?;
        }

        Ok(TableConstraint::ForeignKey {
            name,
            column,
            ref_table,
            ref_column,
            delete_cascade: false,
        })
    }

    fn parse_unique_constraint(&mut self, name: String) -> Result<TableConstraint, ParseError> {
        self.accept(TokenKind::LeftParen)?;

        let mut columns = Vec::new();
        loop {
            columns.push(self.parse_column_name()?);
            if !self.check(TokenKind::Comma) {
                break;
            }
            self.next();
        }

        self.accept(TokenKind::RightParen)?;

        Ok(TableConstraint::Unique { name, columns })
    }

    fn parse_show(&mut self) -> Result<ShowQuery, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Show))?;

        let mut query = ShowQuery {
            pos: t.pos,
            kind: ShowKind::Databases,
            database: None,
            table: None,
        };

        let kind = self.accept(TokenKind::Ident)?;
        match kind.text.to_ascii_lowercase().as_str() {
            "databases" => {
                query.kind = ShowKind::Databases;
            }
            "tables" => {
                query.kind = ShowKind::Tables;
                // the source database is optional
                if self.check_keyword(Keyword::From) {
                    self.next();
                    query.database = Some(self.accept(TokenKind::Ident)?.text);
                }
            }
            "columns" | "index" => {
                query.kind = if kind.text.eq_ignore_ascii_case("columns") {
                    ShowKind::Columns
                } else {
                    ShowKind::Index
                };
                // the source table is required
                self.accept(TokenKind::Keyword(Keyword::From))?;
                let (database, table) = self.parse_selector_ident()?;
                query.database = database;
                query.table = Some(table);
            }
            _ => return Err(ParseError::unexpected(&kind)),
        }

        Ok(query)
    }

    fn parse_drop(&mut self) -> Result<Statement, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Drop))?;

        let next = self.next();
        match next.kind {
            TokenKind::Keyword(Keyword::Database) => {
                let if_exists = self.parse_if_exists()?;
                let database = self.accept(TokenKind::Ident)?.text;
                Ok(Statement::DropDatabase(DropDatabaseQuery {
                    pos: t.pos,
                    database,
                    if_exists,
                }))
            }
            TokenKind::Keyword(Keyword::Table) => {
                let if_exists = self.parse_if_exists()?;
                let (database, table) = self.parse_selector_ident()?;
                Ok(Statement::DropTable(DropTableQuery {
                    pos: t.pos,
                    database,
                    table,
                    if_exists,
                }))
            }
            _ => Err(ParseError::unexpected(&next)),
        }
    }

    fn parse_if_exists(&mut self) -> Result<bool, ParseError> {
        if !self.peek().text.eq_ignore_ascii_case("IF") {
            return Ok(false);
        }
        self.next();
        self.accept(TokenKind::Keyword(Keyword::Exists))?;
        Ok(true)
    }

    fn parse_alter(&mut self) -> Result<Statement, ParseError> {
        let t = self.accept(TokenKind::Keyword(Keyword::Alter))?;
        self.accept(TokenKind::Keyword(Keyword::Table))?;

        let (database, table) = self.parse_selector_ident()?;

        let tt = self.peek().clone();
        match tt.text.to_ascii_uppercase().as_str() {
            "MODIFY" => {
                self.next();
                Ok(Statement::ModifyColumn(ModifyColumnQuery {
                    pos: t.pos,
                    database,
                    table,
                    column: self.parse_create_column()?,
                }))
            }
            "CHANGE" => {
                self.next();
                let name = self.parse_column_name()?;
                Ok(Statement::RenameColumn(RenameColumnQuery {
                    pos: t.pos,
                    database,
                    table,
                    name,
                    column: self.parse_create_column()?,
                }))
            }
            "ADD" => {
                self.next();
                self.parse_alter_table_add(t.pos, database, table)
            }
            "DROP" => {
                self.next();
                self.parse_alter_drop(t.pos, database, table)
            }
            _ => Err(ParseError::new(
                format!("Invalid alter type {}", tt.text),
                tt.text.clone(),
                tt.pos,
            )),
        }
    }

    fn parse_alter_table_add(
        &mut self,
        pos: Position,
        database: Option<String>,
        table: String,
    ) -> Result<Statement, ParseError> {
        let tt = self.peek();
        match tt.text.to_ascii_uppercase().as_str() {
            "CONSTRAINT" => {
                self.next();
                self.parse_add_constraint(pos, database, table)
            }
            "COLUMN" => {
                self.next();
                Ok(Statement::AddColumn(AddColumnQuery {
                    pos,
                    database,
                    table,
                    column: self.parse_create_column()?,
                }))
            }
            _ => Ok(Statement::AddColumn(AddColumnQuery {
                pos,
                database,
                table,
                column: self.parse_create_column()?,
            })),
        }
    }

    fn parse_add_constraint(
        &mut self,
        pos: Position,
        database: Option<String>,
        table: String,
    ) -> Result<Statement, ParseError> {
        let name = self.accept(TokenKind::Ident)?.text;
        let tp = self.accept(TokenKind::Ident)?;

        if tp.text.eq_ignore_ascii_case("UNIQUE") {
            self.accept(TokenKind::LeftParen)?;
            let columns = self.parse_column_names()?;
            self.accept(TokenKind::RightParen)?;

            return Ok(Statement::AddConstraint(AddConstraintQuery {
                pos,
                database,
                table,
                name,
                columns,
            }));
        }

        if tp.text.eq_ignore_ascii_case("FOREIGN") {
            self.accept_text("KEY")?;

            self.accept(TokenKind::LeftParen)?;
            let column = self.accept(TokenKind::Ident)?.text;
            self.accept(TokenKind::RightParen)?;

            self.accept_text("REFERENCES")?;
            let (ref_database, ref_table) = self.parse_selector_ident()?;

            self.accept(TokenKind::LeftParen)?;
            let ref_column = self.accept(TokenKind::Ident)?.text;
            self.accept(TokenKind::RightParen)?;

            let mut delete_cascade = false;
            if self.check_keyword(Keyword::On) {
                self.next();
                self.accept(TokenKind::Keyword(Keyword::Delete))?;
                self.accept_text("CASCADE")?;
                delete_cascade = true;
            }

            return Ok(Statement::AddForeignKey(AddForeignKeyQuery {
                pos,
                database,
                table,
                name,
                column,
                ref_database,
                ref_table,
                ref_column,
                delete_cascade,
            }));
        }

        Err(ParseError::unexpected(&tp))
    }

    fn parse_alter_drop(
        &mut self,
        pos: Position,
        database: Option<String>,
        table: String,
    ) -> Result<Statement, ParseError> {
        let t = self.next();
        let kind = match t.text.to_ascii_uppercase().as_str() {
            "COLUMN" => AlterDropKind::Column,
            "INDEX" => AlterDropKind::Index,
            _ => return Err(ParseError::unexpected(&t)),
        };

        let item = self.accept(TokenKind::Ident)?.text;

        Ok(Statement::AlterDrop(AlterDropQuery {
            pos,
            database,
            table,
            kind,
            item,
        }))
    }

    // --- token plumbing ---

    pub(crate) fn peek(&self) -> &Token {
        self.tokens.get(self.index).unwrap_or(&self.eof)
    }

    /// Peeks two tokens ahead, for `ident (` call disambiguation.
    fn peek_two(&self) -> &Token {
        self.tokens.get(self.index + 1).unwrap_or(&self.eof)
    }

    fn next(&mut self) -> Token {
        match self.tokens.get(self.index) {
            Some(t) => {
                self.index += 1;
                t.clone()
            }
            None => self.eof.clone(),
        }
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    fn check_keyword(&self, kw: Keyword) -> bool {
        self.peek().kind == TokenKind::Keyword(kw)
    }

    fn accept(&mut self, kind: TokenKind) -> Result<Token, ParseError> {
        let t = self.next();
        if t.kind != kind {
            return Err(ParseError::expecting(kind.name(), &t));
        }
        Ok(t)
    }

    /// Accepts the next token by its literal text, case-insensitive.
    /// Kind is not checked: `ADD` lexes as an identifier while `DELETE`
    /// is a keyword, and both are matched here by spelling.
    fn accept_text(&mut self, expected: &str) -> Result<Token, ParseError> {
        let t = self.next();
        if !t.text.eq_ignore_ascii_case(expected) {
            return Err(ParseError::new(
                format!("Expecting {expected}, got {}", t.text),
                t.text.clone(),
                t.pos,
            ));
        }
        Ok(t)
    }

    /// Splices a synthetic token in front of the unparsed buffer. The
    /// builder uses this to prepend an implicit `JOIN` or `ORDER BY`
    /// to a fragment.
    pub(crate) fn prepend(&mut self, kind: TokenKind) {
        self.tokens.insert(self.index, Token::synthetic(kind));
    }

    /// True if the next token starts a join production.
    pub(crate) fn at_join_keyword(&self) -> bool {
        matches!(
            self.peek().kind,
            TokenKind::Keyword(
                Keyword::Left
                    | Keyword::Right
                    | Keyword::Inner
                    | Keyword::Outer
                    | Keyword::Cross
                    | Keyword::Join
            )
        )
    }
}

fn literal_value(t: &Token) -> Result<Value, ParseError> {
    match t.kind {
        TokenKind::Int => t
            .text
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|e| ParseError::new(e.to_string(), t.text.clone(), t.pos)),
        TokenKind::Float => t
            .text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|e| ParseError::new(e.to_string(), t.text.clone(), t.pos)),
        TokenKind::Str => Ok(Value::Str(t.text.clone())),
        TokenKind::Keyword(Keyword::Null) => Ok(Value::Null),
        TokenKind::Keyword(Keyword::True) => Ok(Value::Bool(true)),
        TokenKind::Keyword(Keyword::False) => Ok(Value::Bool(false)),
        _ => Err(ParseError::new(
            format!("Invalid value type: {}", t.kind),
            t.text.clone(),
            t.pos,
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(sql: &str) -> Statement {
        parse_query(sql).expect("parse failed")
    }

    #[test]
    fn test_simple_select() {
        let Statement::Select(s) = parse("select id, name from users") else {
            panic!("expected SELECT");
        };
        assert_eq!(s.columns.len(), 2);
        assert_eq!(s.from.len(), 1);
    }

    #[test]
    fn test_statement_separator_required() {
        assert!(parse_script("select 1;select 2").is_ok());
        assert!(parse_script("select 1 select 2").is_err());
        assert!(parse_script("show tables;select * from foo").is_ok());
    }

    #[test]
    fn test_single_statement_expected() {
        assert!(matches!(
            parse_query("select 1;select * from foo"),
            Err(Error::StatementCount(2))
        ));
        assert!(matches!(
            parse_query("show tables;select * from foo"),
            Err(Error::StatementCount(2))
        ));
    }

    #[test]
    fn test_invalid_queries() {
        for sql in [
            "show columns from db2;foo",
            "show columns from db2%foo",
            "select * from db2%foo",
            "select n'm from foo",
            "select asdf= from foo",
            "select asdf?0 from foo",
            r"select asd\a from foo",
            "select asd//a from foo",
        ] {
            assert!(parse_query(sql).is_err(), "expected failure: {sql}");
        }
    }

    #[test]
    fn test_relation_chain_left_assoc() {
        // a = b = c parses as (a = b) = c
        let Statement::Select(s) = parse("select a = b = c") else {
            panic!("expected SELECT");
        };
        let Expr::Binary { op, left, .. } = &s.columns[0] else {
            panic!("expected binary");
        };
        assert_eq!(*op, BinaryOp::Eq);
        assert!(matches!(
            left.as_ref(),
            Expr::Binary {
                op: BinaryOp::Eq,
                ..
            }
        ));
    }

    #[test]
    fn test_namespaced_table() {
        let Statement::Select(s) = parse("select * from fiz:foo:client") else {
            panic!("expected SELECT");
        };
        let FromItem::Table(t) = &s.from[0] else {
            panic!("expected table");
        };
        assert_eq!(t.name, "fiz:foo:client");
    }

    #[test]
    fn test_union_collects_trailing_selects() {
        let Statement::Select(s) = parse("select 1 union select 2 union select 3") else {
            panic!("expected SELECT");
        };
        assert_eq!(s.union.len(), 2);
    }

    #[test]
    fn test_for_update_flag() {
        let Statement::Select(s) = parse("select * from foo for update") else {
            panic!("expected SELECT");
        };
        assert!(s.for_update);
        // FOR must be followed by UPDATE
        assert!(parse_query("select * from foo for").is_err());
    }

    #[test]
    fn test_limit_offset_order() {
        let Statement::Select(s) = parse("select id from c limit 3,4") else {
            panic!("expected SELECT");
        };
        let limit = s.limit.expect("limit");
        let Expr::Constant(off) = limit.offset.expect("offset") else {
            panic!("expected constant");
        };
        let Expr::Constant(rows) = limit.row_count else {
            panic!("expected constant");
        };
        assert_eq!(off.value, "3");
        assert_eq!(rows.value, "4");
    }

    #[test]
    fn test_limit_rejects_bad_offset_slot() {
        assert!(parse_query("select id from c limit 3,foo").is_err());
    }

    #[test]
    fn test_auto_increment_only_on_id() {
        assert!(parse_query("create table t (id int AUTO_INCREMENT)").is_ok());
        assert!(parse_query("create table t (nr int AUTO_INCREMENT)").is_err());
    }

    #[test]
    fn test_replace_params_promotes_literals() {
        let mut p = Parser::new("select * from foo where name like 'bar'").unwrap();
        p.replace_params = true;
        let Statement::Select(s) = p.parse_single().unwrap() else {
            panic!("expected SELECT");
        };
        assert_eq!(s.params, vec![Value::Str(String::from("bar"))]);
    }

    #[test]
    fn test_delete_alias_list() {
        let Statement::Delete(d) = parse("DELETE a, b FROM a JOIN b ON a.id = b.id") else {
            panic!("expected DELETE");
        };
        assert_eq!(d.aliases, vec!["a", "b"]);
    }

    #[test]
    fn test_in_subquery_preserved() {
        let Statement::Select(s) = parse("select 1 from foo where id in (select 1)") else {
            panic!("expected SELECT");
        };
        let Some(Expr::Binary { right, .. }) = s.where_part else {
            panic!("expected binary where");
        };
        let Expr::InList { values, .. } = *right else {
            panic!("expected in-list");
        };
        assert!(matches!(values[0], Expr::Subquery(_)));
    }
}
