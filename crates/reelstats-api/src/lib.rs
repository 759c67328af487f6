//! # ReelStats
//!
//! A filterable dashboard over MovieLens ratings. Filter options (rating
//! count floor, sort key, genre substring, release-year floor) become one
//! parameterized aggregate query; the rows come back with summary metrics
//! and can be exported to CSV.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use reelstats::{Dashboard, DashboardConfig, FilterOptions, QueryOutcome, SortKey};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DashboardConfig::from_env()?;
//!     let dashboard = Dashboard::open(config)?;
//!
//!     let options = FilterOptions::new(100, SortKey::AverageRating, 1950).with_genre("Comedy");
//!     let view = dashboard.refresh(&options);
//!
//!     match &view.outcome {
//!         QueryOutcome::Rows(rows) => {
//!             for row in rows {
//!                 println!("{} {:.2} ({} ratings)", row.title, row.avg_rating, row.num_ratings);
//!             }
//!         }
//!         QueryOutcome::Empty => println!("No results match your filters."),
//!         QueryOutcome::Failed { reason } => eprintln!("Query failed: {}", reason),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Executors
//!
//! [`SqliteExecutor`] renders the plan to SQL with bound parameters and runs
//! it against a SQLite database. [`MemoryExecutor`] evaluates the same plan
//! in-process and is handy for tests and demos.

#![warn(clippy::all)]

pub mod config;
pub mod export;
pub mod logging;
pub mod validation;

use std::io::Write;

// Re-export core types
pub use reelstats_core::{
    chart_points, extract_year, round2, Dialect, Error, FilterOptions, GenreCount, GenreFilter,
    MemoryExecutor, MovieAggregateRow, PageSize, Param, QueryBuilder, QueryExecutor, QueryPlan,
    QuerySpec, Result, ResultSummary, Schema, SortKey, ALL_GENRES, GENRE_CHOICES, ROW_COLUMNS,
};

// Store components
pub use reelstats_store::{
    import_movielens, import_readers, ConnectionDescriptor, ImportStats, SqliteExecutor,
};

pub use config::DashboardConfig;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// What one refresh produced.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// At least one row matched
    Rows(Vec<MovieAggregateRow>),
    /// The query ran and nothing matched
    Empty,
    /// The query could not run; the dashboard keeps going
    Failed {
        /// Human-readable cause
        reason: String,
    },
}

impl QueryOutcome {
    /// Rows to display, empty unless the query returned some.
    pub fn rows(&self) -> &[MovieAggregateRow] {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Empty | QueryOutcome::Failed { .. } => &[],
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, QueryOutcome::Failed { .. })
    }
}

/// The table, metrics and chart data for one set of filter options.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    /// Options the view was computed for
    pub options: FilterOptions,
    /// Result column the rows are ordered by
    pub sort_column: &'static str,
    pub outcome: QueryOutcome,
    /// Present when rows came back
    pub summary: Option<ResultSummary>,
}

impl DashboardView {
    /// A view for options whose query could not run, e.g. because the
    /// database was unreachable.
    pub fn failed(options: &FilterOptions, error: &Error) -> Self {
        tracing::warn!(error = %error, ?options, "Dashboard refresh failed");
        Self {
            options: options.clone(),
            sort_column: options.sort_key.column(),
            outcome: QueryOutcome::Failed {
                reason: error.to_string(),
            },
            summary: None,
        }
    }

    pub fn rows(&self) -> &[MovieAggregateRow] {
        self.outcome.rows()
    }

    /// Bar chart points of the sort column per title.
    pub fn chart_points(&self) -> Vec<(String, f64)> {
        chart_points(self.rows(), self.options.sort_key)
    }

    /// Write the current rows as CSV.
    pub fn export_csv<W: Write>(&self, writer: W) -> Result<()> {
        export::write_csv(writer, self.rows())
    }
}

/// A dashboard session: one executor, one query builder.
///
/// Every [`refresh`](Dashboard::refresh) is a single blocking round trip.
/// Failures are reported in the view and never retried.
#[derive(Debug)]
pub struct Dashboard<E: QueryExecutor> {
    executor: E,
    builder: QueryBuilder,
    config: DashboardConfig,
}

impl Dashboard<SqliteExecutor> {
    /// Open the configured SQLite database.
    pub fn open(config: DashboardConfig) -> Result<Self> {
        let executor = SqliteExecutor::open(&config.connection)?;
        Ok(Self::new(executor, config))
    }
}

impl<E: QueryExecutor> Dashboard<E> {
    pub fn new(executor: E, config: DashboardConfig) -> Self {
        let builder = QueryBuilder::new(config.page_size);
        Self {
            executor,
            builder,
            config,
        }
    }

    /// Use a non-default table layout.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.builder = self.builder.with_schema(schema);
        self
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The SQL and bound parameters a refresh with `options` would run.
    pub fn preview_sql(&self, options: &FilterOptions, dialect: Dialect) -> QuerySpec {
        self.builder.build(options).to_sql(dialect)
    }

    /// Run the query for `options` and assemble the view.
    pub fn refresh(&self, options: &FilterOptions) -> DashboardView {
        let plan = self.builder.build(options);
        let sort_column = plan.sort_column();

        let result = validation::validate_filter(options).and_then(|()| self.executor.execute(&plan));
        let (outcome, summary) = match result {
            Ok(rows) if rows.is_empty() => {
                tracing::info!(?options, "No rows matched");
                (QueryOutcome::Empty, None)
            }
            Ok(rows) => {
                tracing::info!(rows = rows.len(), sort = sort_column, "Refreshed dashboard");
                let summary = ResultSummary::from_rows(&rows);
                (QueryOutcome::Rows(rows), Some(summary))
            }
            Err(e) => return DashboardView::failed(options, &e),
        };

        DashboardView {
            options: options.clone(),
            sort_column,
            outcome,
            summary,
        }
    }
}
