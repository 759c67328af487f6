//! Filter options resolved from the dashboard controls.
//!
//! A [`FilterOptions`] value is built fresh for every interaction and handed
//! to the [`QueryBuilder`](crate::query::QueryBuilder). It carries no
//! behaviour beyond normalising the genre choice.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Sentinel genre choice meaning "no genre restriction".
pub const ALL_GENRES: &str = "All";

/// Genre choices offered by the dashboard controls.
pub const GENRE_CHOICES: [&str; 7] = [
    ALL_GENRES, "Action", "Comedy", "Drama", "Horror", "Romance", "Thriller",
];

/// Column the result set is ordered by, descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    /// Order by `avg_rating`
    #[default]
    AverageRating,
    /// Order by `num_ratings`
    RatingCount,
}

impl SortKey {
    /// Output column the key orders by.
    pub fn column(&self) -> &'static str {
        match self {
            SortKey::AverageRating => "avg_rating",
            SortKey::RatingCount => "num_ratings",
        }
    }

    /// Human-readable label used for chart axes.
    pub fn label(&self) -> &'static str {
        match self {
            SortKey::AverageRating => "Average Rating",
            SortKey::RatingCount => "Number of Ratings",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for SortKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "avg" | "avg_rating" | "average" | "average rating" => Ok(SortKey::AverageRating),
            "count" | "num_ratings" | "ratings" | "number of ratings" => Ok(SortKey::RatingCount),
            other => Err(Error::InvalidInput(format!("Unknown sort key '{}'", other))),
        }
    }
}

/// Genre restriction applied before grouping.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GenreFilter {
    /// No restriction
    #[default]
    All,
    /// Genres must contain this text, compared case-insensitively
    Contains(String),
}

impl GenreFilter {
    /// Resolve a control value. Blank input and the "All" sentinel both
    /// mean no restriction.
    pub fn from_choice(choice: Option<&str>) -> Self {
        match choice.map(str::trim) {
            None | Some("") => GenreFilter::All,
            Some(c) if c.eq_ignore_ascii_case(ALL_GENRES) => GenreFilter::All,
            Some(c) => GenreFilter::Contains(c.to_string()),
        }
    }

    /// The substring to match, if any.
    pub fn needle(&self) -> Option<&str> {
        match self {
            GenreFilter::All => None,
            GenreFilter::Contains(s) => Some(s.as_str()),
        }
    }
}

impl fmt::Display for GenreFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenreFilter::All => write!(f, "{}", ALL_GENRES),
            GenreFilter::Contains(s) => write!(f, "{}", s),
        }
    }
}

/// User-selected constraints that parameterize one aggregate query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    /// Minimum number of ratings a movie needs
    pub min_ratings: u32,
    /// Ordering of the result set
    pub sort_key: SortKey,
    /// Genre restriction
    pub genre: GenreFilter,
    /// Earliest release year
    pub min_year: i32,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            min_ratings: 100,
            sort_key: SortKey::AverageRating,
            genre: GenreFilter::All,
            min_year: 2000,
        }
    }
}

impl FilterOptions {
    /// Create options with no genre restriction.
    pub fn new(min_ratings: u32, sort_key: SortKey, min_year: i32) -> Self {
        Self {
            min_ratings,
            sort_key,
            genre: GenreFilter::All,
            min_year,
        }
    }

    /// Set the genre from a control value ("All" or blank clears it).
    pub fn with_genre<S: AsRef<str>>(mut self, genre: S) -> Self {
        self.genre = GenreFilter::from_choice(Some(genre.as_ref()));
        self
    }

    /// Set the minimum rating count.
    pub fn with_min_ratings(mut self, min_ratings: u32) -> Self {
        self.min_ratings = min_ratings;
        self
    }

    /// Set the sort key.
    pub fn with_sort_key(mut self, sort_key: SortKey) -> Self {
        self.sort_key = sort_key;
        self
    }

    /// Set the minimum release year.
    pub fn with_min_year(mut self, min_year: i32) -> Self {
        self.min_year = min_year;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_controls() {
        let options = FilterOptions::default();
        assert_eq!(options.min_ratings, 100);
        assert_eq!(options.sort_key, SortKey::AverageRating);
        assert_eq!(options.genre, GenreFilter::All);
        assert_eq!(options.min_year, 2000);
    }

    #[test]
    fn test_all_sentinel_clears_genre() {
        assert_eq!(GenreFilter::from_choice(Some("All")), GenreFilter::All);
        assert_eq!(GenreFilter::from_choice(Some(" all ")), GenreFilter::All);
        assert_eq!(GenreFilter::from_choice(Some("")), GenreFilter::All);
        assert_eq!(GenreFilter::from_choice(None), GenreFilter::All);
        assert_eq!(
            GenreFilter::from_choice(Some("Comedy")),
            GenreFilter::Contains("Comedy".to_string())
        );
    }

    #[test]
    fn test_builders() {
        let options = FilterOptions::new(50, SortKey::RatingCount, 1990).with_genre("Drama");
        assert_eq!(options.genre.needle(), Some("Drama"));
        let options = options.with_genre("All").with_min_ratings(10).with_min_year(1950);
        assert_eq!(options.genre.needle(), None);
        assert_eq!(options.min_ratings, 10);
        assert_eq!(options.min_year, 1950);
    }

    #[test]
    fn test_sort_key_parsing() {
        assert_eq!("avg".parse::<SortKey>().unwrap(), SortKey::AverageRating);
        assert_eq!("COUNT".parse::<SortKey>().unwrap(), SortKey::RatingCount);
        assert_eq!(
            "Number of Ratings".parse::<SortKey>().unwrap(),
            SortKey::RatingCount
        );
        assert!("title".parse::<SortKey>().is_err());
    }

    #[test]
    fn test_sort_key_labels() {
        assert_eq!(SortKey::AverageRating.to_string(), "Average Rating");
        assert_eq!(SortKey::RatingCount.label(), "Number of Ratings");
    }
}
