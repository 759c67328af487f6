//! # ReelStats Store
//!
//! SQLite query-execution adapter for ReelStats: opens the ratings
//! database described by a [`ConnectionDescriptor`], registers the
//! `title_year` SQL function and runs rendered query plans with bound
//! parameters.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should depend on the main `reelstats` crate instead.

#![warn(clippy::all)]

pub mod import;
pub mod schema;

pub use import::{import_movielens, import_readers, ImportStats};
pub use schema::create_schema;

use reelstats_core::query::TITLE_YEAR_FUNCTION;
use reelstats_core::{
    extract_year, Dialect, Error, MovieAggregateRow, Param, QueryExecutor, QueryPlan, QuerySpec,
    Result, Schema,
};
use rusqlite::functions::FunctionFlags;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, OpenFlags};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Where the ratings database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionDescriptor {
    /// Private in-memory database, dropped with the executor
    Memory,
    /// SQLite database file
    File(PathBuf),
}

impl FromStr for ConnectionDescriptor {
    type Err = Error;

    /// Accepts `sqlite::memory:`, `:memory:`, `sqlite://<path>`,
    /// `sqlite:<path>` or a bare path.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        match s {
            "" => Err(Error::InvalidInput(
                "Database URL cannot be empty".to_string(),
            )),
            ":memory:" | "sqlite::memory:" | "sqlite://:memory:" => Ok(ConnectionDescriptor::Memory),
            _ => {
                let path = s
                    .strip_prefix("sqlite://")
                    .or_else(|| s.strip_prefix("sqlite:"))
                    .unwrap_or(s);
                if path.is_empty() {
                    return Err(Error::InvalidInput(format!(
                        "Database URL '{}' has no path",
                        s
                    )));
                }
                Ok(ConnectionDescriptor::File(PathBuf::from(path)))
            }
        }
    }
}

impl fmt::Display for ConnectionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionDescriptor::Memory => write!(f, "sqlite::memory:"),
            ConnectionDescriptor::File(path) => write!(f, "sqlite://{}", path.display()),
        }
    }
}

impl Default for ConnectionDescriptor {
    fn default() -> Self {
        ConnectionDescriptor::File(PathBuf::from("movielens.db"))
    }
}

pub(crate) fn query_failed(err: rusqlite::Error) -> Error {
    Error::QueryFailed(err.to_string())
}

/// Query-execution adapter backed by one SQLite connection.
///
/// The connection is held for the executor's lifetime, which is the
/// dashboard session.
pub struct SqliteExecutor {
    conn: Connection,
    descriptor: ConnectionDescriptor,
}

impl SqliteExecutor {
    /// Opens (creating if needed) the database for reading and writing.
    pub fn open(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let conn = match descriptor {
            ConnectionDescriptor::Memory => Connection::open_in_memory(),
            ConnectionDescriptor::File(path) => Connection::open(path),
        }
        .map_err(query_failed)?;
        Self::with_connection(conn, descriptor.clone())
    }

    /// Opens an existing database file read-only. In-memory descriptors
    /// open a fresh writable database.
    pub fn open_read_only(descriptor: &ConnectionDescriptor) -> Result<Self> {
        let conn = match descriptor {
            ConnectionDescriptor::Memory => Connection::open_in_memory(),
            ConnectionDescriptor::File(path) => Connection::open_with_flags(
                path,
                OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            ),
        }
        .map_err(query_failed)?;
        Self::with_connection(conn, descriptor.clone())
    }

    fn with_connection(conn: Connection, descriptor: ConnectionDescriptor) -> Result<Self> {
        tracing::info!(database = %descriptor, "Opening ReelStats store");
        conn.create_scalar_function(
            TITLE_YEAR_FUNCTION,
            1,
            FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
            |ctx| {
                let title: Option<String> = ctx.get(0)?;
                Ok(title.as_deref().and_then(extract_year))
            },
        )
        .map_err(query_failed)?;
        Ok(Self { conn, descriptor })
    }

    pub fn descriptor(&self) -> &ConnectionDescriptor {
        &self.descriptor
    }

    /// Underlying connection, for schema setup and bulk loading.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Create the `movies` and `ratings` tables if they do not exist.
    pub fn create_schema(&self, schema: &Schema) -> Result<()> {
        create_schema(&self.conn, schema)
    }

    pub fn insert_movie(&self, schema: &Schema, movie_id: i64, title: &str, genres: &str) -> Result<()> {
        let sql = schema::insert_movie_sql(schema);
        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params![movie_id, title, genres]))
            .map_err(query_failed)?;
        Ok(())
    }

    pub fn insert_rating(&self, schema: &Schema, user_id: i64, movie_id: i64, rating: f64) -> Result<()> {
        let sql = schema::insert_rating_sql(schema);
        self.conn
            .prepare_cached(&sql)
            .and_then(|mut stmt| stmt.execute(params![user_id, movie_id, rating, Option::<i64>::None]))
            .map_err(query_failed)?;
        Ok(())
    }

    /// Execute pre-rendered SQLite text with its bound parameters.
    pub fn run_spec(&self, spec: &QuerySpec) -> Result<Vec<MovieAggregateRow>> {
        if spec.dialect != Dialect::Sqlite {
            return Err(Error::InvalidInput(format!(
                "SQLite adapter cannot run {:?} SQL",
                spec.dialect
            )));
        }
        tracing::debug!(sql = %spec.sql, params = spec.params.len(), "Executing query");

        let values: Vec<Value> = spec
            .params
            .iter()
            .map(|param| match param {
                Param::Integer(i) => Value::Integer(*i),
                Param::Text(s) => Value::Text(s.clone()),
            })
            .collect();

        let mut stmt = self.conn.prepare(&spec.sql).map_err(query_failed)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| {
                Ok(MovieAggregateRow {
                    title: row.get(0)?,
                    genres: row.get(1)?,
                    avg_rating: row.get(2)?,
                    num_ratings: row.get(3)?,
                    year: row.get(4)?,
                })
            })
            .map_err(query_failed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(query_failed)?;

        tracing::debug!(rows = rows.len(), "Query returned");
        Ok(rows)
    }
}

impl QueryExecutor for SqliteExecutor {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<MovieAggregateRow>> {
        self.run_spec(&plan.to_sql(Dialect::Sqlite))
    }
}

impl fmt::Debug for SqliteExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SqliteExecutor")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}
