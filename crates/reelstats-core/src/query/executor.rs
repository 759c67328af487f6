//! Query executors
//!
//! The [`QueryExecutor`] trait is the seam between planning and a data
//! store. [`MemoryExecutor`] evaluates plans over in-process tables with
//! the same operator pipeline a SQL engine would use: join, filter, group,
//! aggregate, filter, sort, limit.

use super::plan::QueryPlan;
use crate::error::Result;
use crate::filter::SortKey;
use crate::row::MovieAggregateRow;
use crate::title::extract_year;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Runs a query plan against a data store.
pub trait QueryExecutor {
    /// Execute the plan and return its rows in result order.
    ///
    /// Failures surface as [`Error::QueryFailed`](crate::Error::QueryFailed).
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<MovieAggregateRow>>;
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for &E {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<MovieAggregateRow>> {
        (**self).execute(plan)
    }
}

impl<E: QueryExecutor + ?Sized> QueryExecutor for Box<E> {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<MovieAggregateRow>> {
        (**self).execute(plan)
    }
}

/// A row of the `movies` table
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub movie_id: i64,
    pub title: String,
    pub genres: String,
}

/// A row of the `ratings` table
#[derive(Debug, Clone, PartialEq)]
pub struct RatingRecord {
    pub movie_id: i64,
    pub rating: f64,
}

/// Accumulator for one (title, genres) group
struct GroupState {
    title: String,
    genres: String,
    sum: f64,
    count: i64,
    year: Option<i32>,
}

/// In-process executor over owned tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryExecutor {
    movies: Vec<MovieRecord>,
    ratings: Vec<RatingRecord>,
}

impl MemoryExecutor {
    /// Creates an empty executor
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_movie<T: Into<String>, G: Into<String>>(&mut self, movie_id: i64, title: T, genres: G) {
        self.movies.push(MovieRecord {
            movie_id,
            title: title.into(),
            genres: genres.into(),
        });
    }

    pub fn add_rating(&mut self, movie_id: i64, rating: f64) {
        self.ratings.push(RatingRecord { movie_id, rating });
    }

    pub fn movies(&self) -> &[MovieRecord] {
        &self.movies
    }

    pub fn ratings(&self) -> &[RatingRecord] {
        &self.ratings
    }

    /// Hash join ratings to movies on movie id, dropping unmatched ratings.
    fn join(&self) -> Vec<(&MovieRecord, f64)> {
        let mut by_id: HashMap<i64, Vec<&MovieRecord>> = HashMap::new();
        for movie in &self.movies {
            by_id.entry(movie.movie_id).or_default().push(movie);
        }

        let mut joined = Vec::new();
        for rating in &self.ratings {
            if let Some(movies) = by_id.get(&rating.movie_id) {
                for movie in movies {
                    joined.push((*movie, rating.rating));
                }
            }
        }
        joined
    }

    /// Group joined rows by (title, genres), keeping first-seen order.
    fn group(&self, plan: &QueryPlan, joined: Vec<(&MovieRecord, f64)>) -> Vec<GroupState> {
        let mut groups: Vec<GroupState> = Vec::new();
        let mut index: HashMap<(&str, &str), usize> = HashMap::new();

        for (movie, rating) in joined {
            let year = extract_year(&movie.title);
            if year.is_none() || !plan.matches_genre(&movie.genres) {
                continue;
            }

            let key = (movie.title.as_str(), movie.genres.as_str());
            let slot = *index.entry(key).or_insert_with(|| {
                groups.push(GroupState {
                    title: movie.title.clone(),
                    genres: movie.genres.clone(),
                    sum: 0.0,
                    count: 0,
                    year,
                });
                groups.len() - 1
            });
            groups[slot].sum += rating;
            groups[slot].count += 1;
        }
        groups
    }
}

impl QueryExecutor for MemoryExecutor {
    fn execute(&self, plan: &QueryPlan) -> Result<Vec<MovieAggregateRow>> {
        let joined = self.join();
        let joined_rows = joined.len();
        let groups = self.group(plan, joined);

        let mut rows: Vec<MovieAggregateRow> = groups
            .into_iter()
            .map(|g| MovieAggregateRow::new(g.title, g.genres, g.sum / g.count as f64, g.count, g.year))
            .filter(|row| plan.admits(row))
            .collect();

        // Stable sort: ties keep group order
        match plan.sort_key {
            SortKey::AverageRating => rows.sort_by(|a, b| {
                b.avg_rating
                    .partial_cmp(&a.avg_rating)
                    .unwrap_or(Ordering::Equal)
            }),
            SortKey::RatingCount => {
                rows.sort_by(|a, b| b.num_ratings.cmp(&a.num_ratings))
            }
        }
        rows.truncate(plan.page_size.get() as usize);

        tracing::debug!(joined_rows, returned = rows.len(), "Evaluated plan in memory");
        Ok(rows)
    }
}
