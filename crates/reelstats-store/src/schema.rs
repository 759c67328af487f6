//! Table definitions for the two-table ratings schema.

use crate::query_failed;
use reelstats_core::{Result, Schema};
use rusqlite::Connection;

/// MovieLens columns outside the query's [`Schema`]
const USER_ID: &str = "userId";
const TIMESTAMP: &str = "timestamp";

fn quote(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Create `movies` and `ratings` (and the join index) if missing.
pub fn create_schema(conn: &Connection, schema: &Schema) -> Result<()> {
    let movies = quote(&schema.movies_table);
    let ratings = quote(&schema.ratings_table);
    let movie_id = quote(&schema.movie_id);
    let index = quote(&format!("idx_{}_{}", schema.ratings_table, schema.movie_id));

    let ddl = format!(
        "CREATE TABLE IF NOT EXISTS {movies} (
            {movie_id} INTEGER PRIMARY KEY,
            {title} TEXT NOT NULL,
            {genres} TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS {ratings} (
            {user_id} INTEGER,
            {movie_id} INTEGER NOT NULL,
            {rating} REAL NOT NULL,
            {timestamp} INTEGER
        );
        CREATE INDEX IF NOT EXISTS {index} ON {ratings} ({movie_id});",
        title = quote(&schema.title),
        genres = quote(&schema.genres),
        rating = quote(&schema.rating),
        user_id = quote(USER_ID),
        timestamp = quote(TIMESTAMP),
    );

    conn.execute_batch(&ddl).map_err(query_failed)?;
    tracing::debug!(movies = %schema.movies_table, ratings = %schema.ratings_table, "Schema ready");
    Ok(())
}

pub(crate) fn insert_movie_sql(schema: &Schema) -> String {
    format!(
        "INSERT OR REPLACE INTO {} ({}, {}, {}) VALUES (?1, ?2, ?3)",
        quote(&schema.movies_table),
        quote(&schema.movie_id),
        quote(&schema.title),
        quote(&schema.genres)
    )
}

pub(crate) fn insert_rating_sql(schema: &Schema) -> String {
    format!(
        "INSERT INTO {} ({}, {}, {}, {}) VALUES (?1, ?2, ?3, ?4)",
        quote(&schema.ratings_table),
        quote(USER_ID),
        quote(&schema.movie_id),
        quote(&schema.rating),
        quote(TIMESTAMP)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn, &Schema::default()).unwrap();
        create_schema(&conn, &Schema::default()).unwrap();

        let tables: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('movies', 'ratings')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 2);
    }

    #[test]
    fn test_insert_statements_quote_identifiers() {
        let sql = insert_movie_sql(&Schema::default());
        assert_eq!(
            sql,
            "INSERT OR REPLACE INTO \"movies\" (\"movieId\", \"title\", \"genres\") VALUES (?1, ?2, ?3)"
        );
        assert!(insert_rating_sql(&Schema::default()).contains("\"userId\""));
    }
}
