//! Expression AST types.

use crate::lexer::Position;

use super::SelectQuery;

/// The type of a literal constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstantKind {
    /// Integer literal.
    Int,
    /// Float literal.
    Float,
    /// String literal.
    Str,
    /// NULL.
    Null,
    /// TRUE.
    True,
    /// FALSE.
    False,
    /// DEFAULT, valid in INSERT value lists.
    Default,
}

/// Binary operators, including the compound relational forms the
/// relation loop produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Shr,
    BitAnd,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    And,
    Or,
    Like,
    NotLike,
    In,
    NotIn,
    Is,
    IsNot,
    Between,
}

impl BinaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::Mod => "%",
            Self::Shr => ">>",
            Self::BitAnd => "&",
            Self::Eq => "=",
            Self::NotEq => "!=",
            Self::Lt => "<",
            Self::LtEq => "<=",
            Self::Gt => ">",
            Self::GtEq => ">=",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::In => "IN",
            Self::NotIn => "NOT IN",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
            Self::Between => "BETWEEN",
        }
    }
}

/// Unary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// +
    Plus,
    /// -
    Minus,
    /// ! (boolean NOT-factor)
    Not,
}

impl UnaryOp {
    /// Returns the SQL spelling of the operator.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Not => "!",
        }
    }
}

/// Ordering attached to an ORDER BY entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderKind {
    /// No explicit ordering.
    #[default]
    None,
    /// ASC
    Asc,
    /// DESC
    Desc,
    /// RANDOM
    Random,
}

/// An ORDER BY entry.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderColumn {
    /// The ordered expression.
    pub expr: Expr,
    /// The requested ordering.
    pub order: OrderKind,
}

/// A column reference, optionally table-qualified and aliased.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRef {
    pub pos: Position,
    /// Table or alias qualifier.
    pub table: Option<String>,
    pub name: String,
    pub alias: Option<String>,
}

/// A typed literal constant carrying its source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Constant {
    pub pos: Position,
    pub kind: ConstantKind,
    /// The literal text; numeric constants re-emit this verbatim.
    pub value: String,
}

/// A function call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub pos: Position,
    pub name: String,
    pub args: Vec<Expr>,
}

/// The dedicated `GROUP_CONCAT(...)` form.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupConcat {
    pub pos: Position,
    pub distinct: bool,
    pub exprs: Vec<Expr>,
    pub order_by: Vec<OrderColumn>,
    pub separator: Option<String>,
}

/// An SQL expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A column reference.
    Column(ColumnRef),

    /// `*` or `table.*`.
    AllColumns {
        pos: Position,
        table: Option<String>,
    },

    /// A literal constant.
    Constant(Constant),

    /// A `?` placeholder (or a literal promoted by `replace_params`).
    Parameter { pos: Position },

    /// A unary expression.
    Unary {
        pos: Position,
        op: UnaryOp,
        operand: Box<Expr>,
    },

    /// A binary expression.
    Binary {
        op: BinaryOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },

    /// A parenthesized expression or subquery.
    Paren(Box<Expr>),

    /// A function call.
    Call(Call),

    /// `GROUP_CONCAT(...)`.
    GroupConcat(GroupConcat),

    /// The bounds pair of a BETWEEN; appears only as the right side of
    /// a [`BinaryOp::Between`] node.
    Between { low: Box<Expr>, high: Box<Expr> },

    /// The value list of an IN; appears only as the right side of an
    /// [`BinaryOp::In`] / [`BinaryOp::NotIn`] node. May hold a single
    /// nested select.
    InList { pos: Position, values: Vec<Expr> },

    /// An aliased select column whose expression is not a plain column
    /// reference.
    SelectColumn { expr: Box<Expr>, alias: String },

    /// A nested SELECT used as an expression.
    Subquery(Box<SelectQuery>),
}

impl Expr {
    /// Returns the source position of the expression.
    #[must_use]
    pub fn pos(&self) -> Position {
        match self {
            Self::Column(c) => c.pos,
            Self::AllColumns { pos, .. }
            | Self::Parameter { pos }
            | Self::Unary { pos, .. }
            | Self::InList { pos, .. } => *pos,
            Self::Constant(c) => c.pos,
            Self::Binary { left, .. } => left.pos(),
            Self::Paren(inner) => inner.pos(),
            Self::Call(c) => c.pos,
            Self::GroupConcat(g) => g.pos,
            Self::Between { low, .. } => low.pos(),
            Self::SelectColumn { expr, .. } => expr.pos(),
            Self::Subquery(q) => q.pos,
        }
    }

    /// Builds `self AND right`.
    #[must_use]
    pub fn and(self, right: Self) -> Self {
        Self::Binary {
            op: BinaryOp::And,
            left: Box::new(self),
            right: Box::new(right),
        }
    }

    /// Builds `self OR right`.
    #[must_use]
    pub fn or(self, right: Self) -> Self {
        Self::Binary {
            op: BinaryOp::Or,
            left: Box::new(self),
            right: Box::new(right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binary_op_spelling() {
        assert_eq!(BinaryOp::NotLike.as_str(), "NOT LIKE");
        assert_eq!(BinaryOp::IsNot.as_str(), "IS NOT");
        assert_eq!(BinaryOp::Shr.as_str(), ">>");
    }

    #[test]
    fn test_expr_chaining() {
        let a = Expr::Parameter {
            pos: Position::default(),
        };
        let b = Expr::Parameter {
            pos: Position::default(),
        };
        assert!(matches!(
            a.and(b),
            Expr::Binary {
                op: BinaryOp::And,
                ..
            }
        ));
    }
}
