//! Result formatting: the metrics and breakdowns shown next to the table.

use crate::filter::SortKey;
use crate::row::{round2, MovieAggregateRow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Number of result rows sharing one `genres` string
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenreCount {
    pub genres: String,
    pub count: usize,
}

/// Summary metrics of a result set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    /// Movies shown
    pub row_count: usize,
    /// Mean of `avg_rating` over the rows, rounded to 2 places
    pub mean_avg_rating: Option<f64>,
    /// Rows per distinct genres string, most frequent first
    pub genre_counts: Vec<GenreCount>,
}

impl ResultSummary {
    pub fn from_rows(rows: &[MovieAggregateRow]) -> Self {
        let mean_avg_rating = if rows.is_empty() {
            None
        } else {
            let total: f64 = rows.iter().map(|r| r.avg_rating).sum();
            Some(round2(total / rows.len() as f64))
        };

        let mut genre_counts: Vec<GenreCount> = Vec::new();
        let mut index: HashMap<&str, usize> = HashMap::new();
        for row in rows {
            match index.get(row.genres.as_str()) {
                Some(&i) => genre_counts[i].count += 1,
                None => {
                    index.insert(row.genres.as_str(), genre_counts.len());
                    genre_counts.push(GenreCount {
                        genres: row.genres.clone(),
                        count: 1,
                    });
                }
            }
        }
        // Stable: equal counts keep first-appearance order
        genre_counts.sort_by(|a, b| b.count.cmp(&a.count));

        Self {
            row_count: rows.len(),
            mean_avg_rating,
            genre_counts,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }
}

/// (title, value) pairs for a bar chart of the sort column.
pub fn chart_points(rows: &[MovieAggregateRow], sort_key: SortKey) -> Vec<(String, f64)> {
    rows.iter()
        .map(|row| {
            let value = match sort_key {
                SortKey::AverageRating => row.avg_rating,
                SortKey::RatingCount => row.num_ratings as f64,
            };
            (row.title.clone(), value)
        })
        .collect()
}
