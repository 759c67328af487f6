// Common test utilities for store integration tests

use reelstats_core::{MemoryExecutor, Schema};
use reelstats_store::{ConnectionDescriptor, SqliteExecutor};
use std::path::PathBuf;
use tempfile::TempDir;

/// (movie id, title, genres)
pub const MOVIES: &[(i64, &str, &str)] = &[
    (1, "Toy Story (1995)", "Adventure|Animation|Children|Comedy|Fantasy"),
    (2, "Heat (1995)", "Action|Crime|Thriller"),
    (3, "Movie Title (Director's Cut)", "Comedy"),
    (4, "Clerks (1994)", "Comedy"),
    (5, "Casablanca (1942)", "Drama|Romance"),
    (6, "Matrix, The (1999)", "Action|Sci-Fi|Thriller"),
    (7, "Amelie (Fabuleux destin d'Amélie Poulain, Le) (2001)", "Comedy|Romance"),
    (8, "Old Boy (2003)", "Mystery|Thriller"),
    (9, "100% Wolf (2020)", "Animation|Comedy"),
];

/// (movie id, ratings)
pub const RATINGS: &[(i64, &[f64])] = &[
    (1, &[4.0, 5.0, 4.5, 3.5]),
    (2, &[3.0, 4.0, 4.0]),
    (3, &[5.0, 5.0, 5.0, 5.0, 5.0]),
    (4, &[2.0, 3.0]),
    (5, &[5.0, 4.5, 4.5, 5.0]),
    (6, &[4.5, 4.0, 5.0, 4.0, 4.5, 4.0]),
    (7, &[4.0]),
    (8, &[3.5, 4.5]),
    (9, &[1.0, 2.0, 1.5]),
    (42, &[5.0, 5.0]),
];

/// Test fixture that creates a file-backed store in a temporary directory
pub struct StoreFixture {
    #[allow(dead_code)]
    pub temp_dir: TempDir,
    pub db_path: PathBuf,
    pub executor: SqliteExecutor,
}

impl StoreFixture {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("movielens.db");
        let executor = SqliteExecutor::open(&ConnectionDescriptor::File(db_path.clone()))
            .expect("Failed to open store");
        seed(&executor);
        Self {
            temp_dir,
            db_path,
            executor,
        }
    }
}

impl Default for StoreFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Load the shared catalog into a SQLite store.
pub fn seed(executor: &SqliteExecutor) {
    let schema = Schema::default();
    executor.create_schema(&schema).expect("Failed to create schema");
    for (id, title, genres) in MOVIES {
        executor
            .insert_movie(&schema, *id, title, genres)
            .expect("Failed to insert movie");
    }
    for (user, (movie, ratings)) in RATINGS.iter().enumerate() {
        for rating in ratings.iter() {
            executor
                .insert_rating(&schema, user as i64, *movie, *rating)
                .expect("Failed to insert rating");
        }
    }
}

/// The same catalog as an in-memory executor.
#[allow(dead_code)]
pub fn memory_catalog() -> MemoryExecutor {
    let mut exec = MemoryExecutor::new();
    for (id, title, genres) in MOVIES {
        exec.add_movie(*id, *title, *genres);
    }
    for (movie, ratings) in RATINGS {
        for rating in ratings.iter() {
            exec.add_rating(*movie, *rating);
        }
    }
    exec
}
