//! SQL rendering
//!
//! Turns an AST into dialect-specific text. Every user-controlled value is
//! a bound parameter; the renderer only ever writes identifiers, keywords
//! and the fixed title-year pattern.

use super::ast::*;
use crate::filter::SortKey;
use crate::title::TITLE_YEAR_PATTERN;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Name of the scalar function SQLite adapters register for year extraction.
pub const TITLE_YEAR_FUNCTION: &str = "title_year";

/// Target SQL dialect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// `?N` placeholders, year extraction through a registered function
    #[default]
    Sqlite,
    /// `$N` placeholders, year extraction through POSIX regex SUBSTRING
    Postgres,
}

/// A bound parameter value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Param {
    Integer(i64),
    Text(String),
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Param::Integer(i) => write!(f, "{}", i),
            Param::Text(s) => write!(f, "{:?}", s),
        }
    }
}

/// Query text plus its bound parameters, ready for an execution adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    pub sql: String,
    pub params: Vec<Param>,
    pub dialect: Dialect,
    /// Sort key the query orders by, for labelling charts
    pub sort_key: SortKey,
}

impl QuerySpec {
    /// Output column the query orders by.
    pub fn sort_column(&self) -> &'static str {
        self.sort_key.column()
    }
}

impl fmt::Display for QuerySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sql)?;
        for (i, param) in self.params.iter().enumerate() {
            write!(f, "\n  -- {} = {}", placeholder(self.dialect, i + 1), param)?;
        }
        Ok(())
    }
}

/// Nodes that can be written as SQL text in a given dialect.
pub trait RenderSql {
    fn render(&self, dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result;
}

/// Display adapter: `Sql(&node, dialect).to_string()`.
pub struct Sql<'a, T: RenderSql + ?Sized>(pub &'a T, pub Dialect);

impl<T: RenderSql + ?Sized> fmt::Display for Sql<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.render(self.1, f)
    }
}

fn placeholder(dialect: Dialect, index: usize) -> String {
    match dialect {
        Dialect::Sqlite => format!("?{}", index),
        Dialect::Postgres => format!("${}", index),
    }
}

/// Write an identifier, quoting it unless it is plain lower-case.
fn write_ident(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    let plain = !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if plain {
        write!(f, "{}", name)
    } else {
        write!(f, "\"{}\"", name.replace('"', "\"\""))
    }
}

impl RenderSql for Query {
    fn render(&self, dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref cte) = self.with {
            write!(f, "WITH ")?;
            write_ident(f, &cte.name)?;
            write!(f, " AS ({}) ", Sql(cte.query.as_ref(), dialect))?;
        }

        write!(f, "SELECT ")?;
        for (i, col) in self.select.columns.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", Sql(col, dialect))?;
        }

        write!(f, " FROM {}", Sql(&self.from.table, dialect))?;
        for join in &self.from.joins {
            write!(f, " {}", Sql(join, dialect))?;
        }

        if let Some(ref where_clause) = self.where_clause {
            write!(f, " WHERE {}", Sql(&where_clause.condition, dialect))?;
        }

        if !self.group_by.is_empty() {
            write!(f, " GROUP BY ")?;
            for (i, col) in self.group_by.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}", Sql(col, dialect))?;
            }
        }

        if let Some(ref order_by) = self.order_by {
            write!(f, " ORDER BY ")?;
            for (i, col) in order_by.columns.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{} {}", Sql(&col.column, dialect), col.direction)?;
            }
        }

        if let Some(ref limit) = self.limit {
            write!(f, " LIMIT {}", Sql(limit, dialect))?;
        }
        Ok(())
    }
}

impl RenderSql for SelectColumn {
    fn render(&self, dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", Sql(&self.expr, dialect))?;
        if let Some(ref alias) = self.alias {
            write!(f, " AS ")?;
            write_ident(f, alias)?;
        }
        Ok(())
    }
}

impl RenderSql for TableRef {
    fn render(&self, _dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_ident(f, &self.name)?;
        if let Some(ref alias) = self.alias {
            write!(f, " AS ")?;
            write_ident(f, alias)?;
        }
        Ok(())
    }
}

impl RenderSql for Join {
    fn render(&self, dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} JOIN {} ON {}",
            self.join_type,
            Sql(&self.table, dialect),
            Sql(&self.condition, dialect)
        )
    }
}

impl RenderSql for ColumnRef {
    fn render(&self, _dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(ref qualifier) = self.qualifier {
            write_ident(f, qualifier)?;
            write!(f, ".")?;
        }
        write_ident(f, &self.name)
    }
}

impl RenderSql for Expression {
    fn render(&self, dialect: Dialect, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Column(col) => col.render(dialect, f),
            Expression::Param(index) => write!(f, "{}", placeholder(dialect, *index)),
            Expression::BinaryOp { left, op, right } => write!(
                f,
                "{} {} {}",
                Sql(left.as_ref(), dialect),
                op,
                Sql(right.as_ref(), dialect)
            ),
            Expression::LogicalOp { left, op, right } => write!(
                f,
                "({} {} {})",
                Sql(left.as_ref(), dialect),
                op,
                Sql(right.as_ref(), dialect)
            ),
            Expression::IsNotNull(expr) => write!(f, "{} IS NOT NULL", Sql(expr.as_ref(), dialect)),
            Expression::Aggregate { function, arg } => match arg {
                Some(arg) => write!(f, "{}({})", function, Sql(arg.as_ref(), dialect)),
                None => write!(f, "{}(*)", function),
            },
            Expression::Round { expr, digits } => match dialect {
                Dialect::Sqlite => write!(f, "ROUND({}, {})", Sql(expr.as_ref(), dialect), digits),
                // ROUND(double precision, int) does not exist in PostgreSQL
                Dialect::Postgres => write!(
                    f,
                    "ROUND(CAST({} AS NUMERIC), {})",
                    Sql(expr.as_ref(), dialect),
                    digits
                ),
            },
            Expression::Contains { haystack, needle } => {
                let position = match dialect {
                    Dialect::Sqlite => "instr",
                    Dialect::Postgres => "strpos",
                };
                write!(
                    f,
                    "{}(lower({}), lower({})) > 0",
                    position,
                    Sql(haystack.as_ref(), dialect),
                    Sql(needle.as_ref(), dialect)
                )
            }
            Expression::TitleYear(expr) => match dialect {
                Dialect::Sqlite => {
                    write!(f, "{}({})", TITLE_YEAR_FUNCTION, Sql(expr.as_ref(), dialect))
                }
                Dialect::Postgres => write!(
                    f,
                    "CAST(SUBSTRING({} FROM '{}') AS INTEGER)",
                    Sql(expr.as_ref(), dialect),
                    TITLE_YEAR_PATTERN.replace('\'', "''")
                ),
            },
        }
    }
}
