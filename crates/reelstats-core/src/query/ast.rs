//! Abstract Syntax Tree (AST) node types for aggregate queries
//!
//! Covers the subset the dashboard emits: a single CTE, an inner join,
//! GROUP BY, a post-aggregation filter, ORDER BY and a bound LIMIT.
//! Rendering to text is dialect-specific and lives in `render`.

use std::fmt;

/// A complete aggregate query
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub with: Option<CommonTableExpression>,
    pub select: SelectClause,
    pub from: FromClause,
    pub where_clause: Option<WhereClause>,
    pub group_by: Vec<ColumnRef>,
    pub order_by: Option<OrderByClause>,
    pub limit: Option<Expression>,
}

/// WITH name AS (query)
#[derive(Debug, Clone, PartialEq)]
pub struct CommonTableExpression {
    pub name: String,
    pub query: Box<Query>,
}

/// SELECT clause specifying columns to retrieve
#[derive(Debug, Clone, PartialEq)]
pub struct SelectClause {
    pub columns: Vec<SelectColumn>,
}

/// One projected expression, optionally aliased
#[derive(Debug, Clone, PartialEq)]
pub struct SelectColumn {
    pub expr: Expression,
    pub alias: Option<String>,
}

impl SelectColumn {
    pub fn new(expr: Expression) -> Self {
        Self { expr, alias: None }
    }

    pub fn aliased(expr: Expression, alias: &str) -> Self {
        Self {
            expr,
            alias: Some(alias.to_string()),
        }
    }
}

/// FROM clause with its joins
#[derive(Debug, Clone, PartialEq)]
pub struct FromClause {
    pub table: TableRef,
    pub joins: Vec<Join>,
}

/// Table name with optional alias
#[derive(Debug, Clone, PartialEq)]
pub struct TableRef {
    pub name: String,
    pub alias: Option<String>,
}

impl TableRef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: None,
        }
    }

    pub fn aliased(name: &str, alias: &str) -> Self {
        Self {
            name: name.to_string(),
            alias: Some(alias.to_string()),
        }
    }
}

/// JOIN clause
#[derive(Debug, Clone, PartialEq)]
pub struct Join {
    pub join_type: JoinType,
    pub table: TableRef,
    pub condition: Expression,
}

/// Types of joins
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinType {
    Inner,
}

/// WHERE clause for filtering
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub condition: Expression,
}

/// Possibly qualified column reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnRef {
    pub qualifier: Option<String>,
    pub name: String,
}

impl ColumnRef {
    pub fn new(name: &str) -> Self {
        Self {
            qualifier: None,
            name: name.to_string(),
        }
    }

    pub fn qualified(qualifier: &str, name: &str) -> Self {
        Self {
            qualifier: Some(qualifier.to_string()),
            name: name.to_string(),
        }
    }
}

/// Scalar and boolean expressions
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Column reference
    Column(ColumnRef),
    /// Bound parameter, 1-based
    Param(usize),
    /// Binary comparison
    BinaryOp {
        left: Box<Expression>,
        op: BinaryOperator,
        right: Box<Expression>,
    },
    /// Logical AND/OR
    LogicalOp {
        left: Box<Expression>,
        op: LogicalOperator,
        right: Box<Expression>,
    },
    /// expr IS NOT NULL
    IsNotNull(Box<Expression>),
    /// COUNT(*), AVG(expr), ...; `arg` of `None` means `*`
    Aggregate {
        function: AggregateFunction,
        arg: Option<Box<Expression>>,
    },
    /// ROUND(expr, digits)
    Round { expr: Box<Expression>, digits: u32 },
    /// Case-insensitive, literal substring test
    Contains {
        haystack: Box<Expression>,
        needle: Box<Expression>,
    },
    /// Four-digit year from a trailing "(YYYY)", NULL otherwise
    TitleYear(Box<Expression>),
}

impl Expression {
    pub fn column(qualifier: &str, name: &str) -> Self {
        Expression::Column(ColumnRef::qualified(qualifier, name))
    }

    pub fn bare(name: &str) -> Self {
        Expression::Column(ColumnRef::new(name))
    }

    pub fn compare(left: Expression, op: BinaryOperator, right: Expression) -> Self {
        Expression::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// AND together a list of conditions; `None` when the list is empty.
    pub fn conjunction(conditions: Vec<Expression>) -> Option<Expression> {
        conditions
            .into_iter()
            .reduce(|left, right| Expression::LogicalOp {
                left: Box::new(left),
                op: LogicalOperator::And,
                right: Box::new(right),
            })
    }
}

/// Binary comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq, // =
    Gt, // >
    Ge, // >=
}

/// Logical operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalOperator {
    And,
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateFunction {
    Count,
    Avg,
}

/// ORDER BY clause for sorting
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByClause {
    pub columns: Vec<OrderByColumn>,
}

/// A column in ORDER BY
#[derive(Debug, Clone, PartialEq)]
pub struct OrderByColumn {
    pub column: ColumnRef,
    pub direction: OrderDirection,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    Desc,
}

// Display implementations for the dialect-independent tokens

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinType::Inner => write!(f, "INNER"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BinaryOperator::Eq => write!(f, "="),
            BinaryOperator::Gt => write!(f, ">"),
            BinaryOperator::Ge => write!(f, ">="),
        }
    }
}

impl fmt::Display for LogicalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalOperator::And => write!(f, "AND"),
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregateFunction::Count => write!(f, "COUNT"),
            AggregateFunction::Avg => write!(f, "AVG"),
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderDirection::Desc => write!(f, "DESC"),
        }
    }
}
