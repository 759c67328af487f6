//! Dashboard configuration
//!
//! The connection descriptor is explicit configuration handed to the
//! query-execution adapter; nothing is looked up from ambient globals once
//! a [`DashboardConfig`] is built.

use crate::logging::LogConfig;
use crate::validation::validate_page_size;
use crate::{ConnectionDescriptor, Error, PageSize, Result};

/// Database URL, e.g. `sqlite://movielens.db` or `sqlite::memory:`
pub const DATABASE_URL_ENV: &str = "REELSTATS_DATABASE_URL";
/// Rows per result page
pub const PAGE_SIZE_ENV: &str = "REELSTATS_PAGE_SIZE";
/// Log level filter
pub const LOG_ENV: &str = "REELSTATS_LOG";

/// Configuration for one dashboard session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Where the ratings database lives
    pub connection: ConnectionDescriptor,
    /// Rows per result page
    pub page_size: PageSize,
    /// Logging setup
    pub log: LogConfig,
}

impl DashboardConfig {
    /// Set the database connection
    pub fn with_connection(mut self, connection: ConnectionDescriptor) -> Self {
        self.connection = connection;
        self
    }

    /// Set the page size
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the logging configuration
    pub fn with_log(mut self, log: LogConfig) -> Self {
        self.log = log;
        self
    }

    /// Build a config from `REELSTATS_*` environment variables, falling
    /// back to defaults for unset ones.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(DATABASE_URL_ENV) {
            config.connection = url.parse()?;
        }

        if let Some(rows) = lookup(PAGE_SIZE_ENV) {
            let rows: u32 = rows.trim().parse().map_err(|_| {
                Error::InvalidInput(format!("{} must be a number, got '{}'", PAGE_SIZE_ENV, rows))
            })?;
            config.page_size = validate_page_size(rows)?;
        }

        if let Some(level) = lookup(LOG_ENV) {
            config.log = config.log.with_level(level);
        }

        tracing::debug!(
            database = %config.connection,
            page_size = config.page_size.get(),
            "Loaded dashboard configuration"
        );
        Ok(config)
    }
}
