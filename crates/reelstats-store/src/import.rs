//! MovieLens CSV import.
//!
//! Loads `movies.csv` (`movieId,title,genres`) and `ratings.csv`
//! (`userId,movieId,rating,timestamp`) into the store in one transaction.

use crate::schema::{create_schema, insert_movie_sql, insert_rating_sql};
use crate::SqliteExecutor;
use reelstats_core::{Error, Result, Schema};
use rusqlite::params;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct MovieCsvRow {
    #[serde(rename = "movieId")]
    movie_id: i64,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
struct RatingCsvRow {
    #[serde(rename = "userId")]
    user_id: i64,
    #[serde(rename = "movieId")]
    movie_id: i64,
    rating: f64,
    timestamp: Option<i64>,
}

/// Row counts loaded by an import
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    pub movies: usize,
    pub ratings: usize,
}

fn import_error(err: impl std::fmt::Display) -> Error {
    Error::Import(err.to_string())
}

/// Import the MovieLens files at `movies` and `ratings`.
pub fn import_movielens<P: AsRef<Path>, Q: AsRef<Path>>(
    executor: &SqliteExecutor,
    schema: &Schema,
    movies: P,
    ratings: Q,
) -> Result<ImportStats> {
    let movies_file = File::open(movies.as_ref())?;
    let ratings_file = File::open(ratings.as_ref())?;
    tracing::info!(
        movies = %movies.as_ref().display(),
        ratings = %ratings.as_ref().display(),
        "Importing MovieLens data"
    );
    import_readers(executor, schema, movies_file, ratings_file)
}

/// Import MovieLens-formatted CSV from any readers. Creates the schema if
/// needed; nothing is written unless both files load cleanly.
pub fn import_readers<M: Read, R: Read>(
    executor: &SqliteExecutor,
    schema: &Schema,
    movies: M,
    ratings: R,
) -> Result<ImportStats> {
    create_schema(executor.connection(), schema)?;

    let tx = executor
        .connection()
        .unchecked_transaction()
        .map_err(import_error)?;
    let mut stats = ImportStats::default();

    {
        let mut insert = tx.prepare(&insert_movie_sql(schema)).map_err(import_error)?;
        let mut reader = csv::Reader::from_reader(movies);
        for (line, record) in reader.deserialize::<MovieCsvRow>().enumerate() {
            let row = record.map_err(|e| Error::Import(format!("movies row {}: {}", line + 1, e)))?;
            insert
                .execute(params![row.movie_id, row.title, row.genres])
                .map_err(import_error)?;
            stats.movies += 1;
        }
    }

    {
        let mut insert = tx.prepare(&insert_rating_sql(schema)).map_err(import_error)?;
        let mut reader = csv::Reader::from_reader(ratings);
        for (line, record) in reader.deserialize::<RatingCsvRow>().enumerate() {
            let row =
                record.map_err(|e| Error::Import(format!("ratings row {}: {}", line + 1, e)))?;
            insert
                .execute(params![row.user_id, row.movie_id, row.rating, row.timestamp])
                .map_err(import_error)?;
            stats.ratings += 1;
        }
    }

    tx.commit().map_err(import_error)?;
    tracing::info!(movies = stats.movies, ratings = stats.ratings, "Import complete");
    Ok(stats)
}
