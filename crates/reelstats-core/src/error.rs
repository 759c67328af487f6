//! Error types for ReelStats.

use thiserror::Error;

/// The main error type for ReelStats operations.
#[derive(Debug, Error)]
pub enum Error {
    /// A filter value or configuration entry was rejected
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The query-execution adapter could not run the query
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Loading source data into the store failed
    #[error("Import error: {0}")]
    Import(String),

    /// Writing or reading an exported result set failed
    #[error("Export error: {0}")]
    Export(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns true if this error came from executing a query.
    pub fn is_query_failure(&self) -> bool {
        matches!(self, Error::QueryFailed(_))
    }
}

/// A specialized `Result` type for ReelStats operations.
pub type Result<T> = std::result::Result<T, Error>;
