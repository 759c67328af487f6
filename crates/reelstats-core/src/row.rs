//! Aggregate result rows.

use serde::{Deserialize, Serialize};

/// Column names of an aggregate row, in output order.
pub const ROW_COLUMNS: [&str; 5] = ["title", "genres", "avg_rating", "num_ratings", "year"];

/// One grouped result: a movie's title and genres with its rating aggregates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieAggregateRow {
    pub title: String,
    pub genres: String,
    /// Mean rating, rounded to 2 decimal places
    pub avg_rating: f64,
    pub num_ratings: i64,
    pub year: Option<i32>,
}

impl MovieAggregateRow {
    /// Build a row, rounding the average the way the store does.
    pub fn new<T: Into<String>, G: Into<String>>(
        title: T,
        genres: G,
        avg_rating: f64,
        num_ratings: i64,
        year: Option<i32>,
    ) -> Self {
        Self {
            title: title.into(),
            genres: genres.into(),
            avg_rating: round2(avg_rating),
            num_ratings,
            year,
        }
    }
}

/// Round to 2 decimal places, half away from zero.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
