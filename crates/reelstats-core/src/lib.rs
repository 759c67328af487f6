//! # ReelStats Core
//!
//! Core types for the ReelStats movie-rating dashboard: filter options,
//! title-year parsing, query planning and SQL rendering, the in-memory
//! executor and result summaries.
//!
//! ## ⚠️ Internal Implementation Detail
//!
//! Users should depend on the main `reelstats` crate, which re-exports
//! everything needed here.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod query;
/// Aggregate result rows
#[allow(missing_docs)]
pub mod row;
#[allow(missing_docs)]
pub mod summary;
pub mod title;

pub use error::{Error, Result};
pub use filter::{FilterOptions, GenreFilter, SortKey, ALL_GENRES, GENRE_CHOICES};
pub use query::{
    Dialect, MemoryExecutor, PageSize, Param, QueryBuilder, QueryExecutor, QueryPlan, QuerySpec,
    Schema,
};
pub use row::{round2, MovieAggregateRow, ROW_COLUMNS};
pub use summary::{chart_points, GenreCount, ResultSummary};
pub use title::extract_year;
