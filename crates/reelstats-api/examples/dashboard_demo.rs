//! Dashboard Demo
//!
//! Loads a tiny MovieLens sample into an in-memory SQLite database and
//! walks through a few filter combinations.

use reelstats::logging::LogConfig;
use reelstats::{
    import_readers, ConnectionDescriptor, Dashboard, DashboardConfig, DashboardView, Dialect,
    FilterOptions, QueryOutcome, Schema, SortKey, SqliteExecutor,
};

const MOVIES: &str = "movieId,title,genres
1,Toy Story (1995),Adventure|Animation|Children|Comedy|Fantasy
2,Heat (1995),Action|Crime|Thriller
3,Clerks (1994),Comedy
4,Casablanca (1942),Drama|Romance
5,\"Matrix, The (1999)\",Action|Sci-Fi|Thriller
6,Movie Title (Director's Cut),Comedy
";

const RATINGS: &str = "userId,movieId,rating,timestamp
1,1,4.0,964982703
2,1,5.0,964981247
3,1,4.5,964982224
1,2,3.5,964983815
2,2,4.0,964982931
1,3,3.0,964982400
2,3,2.5,964980868
1,4,5.0,964982176
2,4,4.5,964984041
3,4,5.0,964984100
1,5,4.5,964983650
2,5,5.0,964981208
3,5,4.0,964980985
4,5,4.5,964982046
1,6,5.0,964982653
";

fn show(label: &str, view: &DashboardView) {
    println!("--- {} ---", label);
    match &view.outcome {
        QueryOutcome::Rows(rows) => {
            for row in rows {
                println!(
                    "  {:<22} {:>5.2} {:>3} ratings  {}",
                    row.title, row.avg_rating, row.num_ratings, row.genres
                );
            }
        }
        QueryOutcome::Empty => println!("  No results match your filters."),
        QueryOutcome::Failed { reason } => println!("  Query failed: {}", reason),
    }
    if let Some(summary) = &view.summary {
        println!(
            "  Movies Shown: {}  Avg Rating: {:.2}",
            summary.row_count,
            summary.mean_avg_rating.unwrap_or_default()
        );
    }
    println!();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _guard = LogConfig::info().init()?;

    println!("=== ReelStats Dashboard Demo ===\n");

    let executor = SqliteExecutor::open(&ConnectionDescriptor::Memory)?;
    let stats = import_readers(&executor, &Schema::default(), MOVIES.as_bytes(), RATINGS.as_bytes())?;
    println!("Imported {} movies and {} ratings\n", stats.movies, stats.ratings);

    let dashboard = Dashboard::new(executor, DashboardConfig::default());

    let best = FilterOptions::new(2, SortKey::AverageRating, 1950);
    println!("{}\n", dashboard.preview_sql(&best, Dialect::Sqlite));
    show("Best rated since 1950", &dashboard.refresh(&best));

    let comedies = FilterOptions::new(1, SortKey::RatingCount, 1900).with_genre("Comedy");
    show("Most rated comedies", &dashboard.refresh(&comedies));

    show("Default filters", &dashboard.refresh(&FilterOptions::default()));

    println!("PostgreSQL rendering of the comedy query:\n");
    println!("{}", dashboard.preview_sql(&comedies, Dialect::Postgres));

    println!("\n=== Demo Complete ===");
    Ok(())
}
