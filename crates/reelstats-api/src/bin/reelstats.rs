use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use reelstats::export::{export_to_path, DEFAULT_EXPORT_FILE};
use reelstats::{
    import_movielens, ConnectionDescriptor, Dashboard, DashboardConfig, DashboardView, Dialect,
    FilterOptions, GenreFilter, QueryBuilder, QueryOutcome, Schema, SortKey, SqliteExecutor,
    GENRE_CHOICES,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "reelstats", version)]
#[command(about = "Explore MovieLens ratings: top movies by average or count", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Ratings database, e.g. sqlite://movielens.db or sqlite::memory:
    #[arg(long, global = true, env = "REELSTATS_DATABASE_URL")]
    database: Option<String>,

    /// Log level filter (RUST_LOG takes precedence)
    #[arg(long, global = true, env = "REELSTATS_LOG")]
    log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load MovieLens movies.csv and ratings.csv into the database
    Import {
        /// Path to movies.csv (movieId,title,genres)
        #[arg(long)]
        movies: PathBuf,

        /// Path to ratings.csv (userId,movieId,rating,timestamp)
        #[arg(long)]
        ratings: PathBuf,
    },

    /// Show the top movies for a set of filters
    Query {
        /// Minimum number of ratings per movie
        #[arg(long, default_value_t = 100)]
        min_ratings: u32,

        /// Sort by average rating or number of ratings (avg, count)
        #[arg(long, default_value = "avg")]
        sort: SortKey,

        /// Genre substring, or "All"
        #[arg(long)]
        genre: Option<String>,

        /// Earliest release year
        #[arg(long, default_value_t = 2000)]
        min_year: i32,

        /// Rows to show (1-50)
        #[arg(long)]
        page_size: Option<u32>,

        /// Write the rows to a CSV file
        #[arg(long, num_args = 0..=1, default_missing_value = DEFAULT_EXPORT_FILE)]
        export: Option<PathBuf>,

        /// Print the SQL and bound parameters before running it
        #[arg(long, default_value_t = false)]
        show_sql: bool,

        /// Dialect used by --show-sql
        #[arg(long, value_enum, default_value_t = SqlDialect::Sqlite)]
        dialect: SqlDialect,
    },

    /// List the genre choices
    Genres,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SqlDialect {
    Sqlite,
    Postgres,
}

impl From<SqlDialect> for Dialect {
    fn from(dialect: SqlDialect) -> Self {
        match dialect {
            SqlDialect::Sqlite => Dialect::Sqlite,
            SqlDialect::Postgres => Dialect::Postgres,
        }
    }
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    let mut config = DashboardConfig::from_env().context("Invalid REELSTATS_* configuration")?;
    if let Some(url) = &args.database {
        config.connection = url
            .parse::<ConnectionDescriptor>()
            .with_context(|| format!("Invalid database URL '{}'", url))?;
    }
    if let Some(level) = &args.log_level {
        config.log = config.log.with_level(level.as_str());
    }
    let _guard = config.log.clone().init().context("Failed to initialize logging")?;

    match args.command {
        Commands::Import { movies, ratings } => {
            let executor = SqliteExecutor::open(&config.connection)
                .with_context(|| format!("Failed to open {}", config.connection))?;
            let stats = import_movielens(&executor, &Schema::default(), &movies, &ratings)
                .with_context(|| {
                    format!(
                        "Failed to import {} and {}",
                        movies.display(),
                        ratings.display()
                    )
                })?;
            println!(
                "Imported {} movies and {} ratings into {}",
                stats.movies, stats.ratings, config.connection
            );
            Ok(ExitCode::SUCCESS)
        }
        Commands::Query {
            min_ratings,
            sort,
            genre,
            min_year,
            page_size,
            export,
            show_sql,
            dialect,
        } => {
            if let Some(rows) = page_size {
                config.page_size = reelstats::validation::validate_page_size(rows)?;
            }
            let options = FilterOptions {
                min_ratings,
                sort_key: sort,
                genre: GenreFilter::from_choice(genre.as_deref()),
                min_year,
            };

            if show_sql {
                let builder = QueryBuilder::new(config.page_size);
                println!("{}\n", builder.build(&options).to_sql(dialect.into()));
            }

            // An unreachable database is reported like any other failed query
            let view = match SqliteExecutor::open_read_only(&config.connection) {
                Ok(executor) => Dashboard::new(executor, config).refresh(&options),
                Err(e) => DashboardView::failed(&options, &e),
            };
            print_view(&view);

            match (&view.outcome, export) {
                (QueryOutcome::Rows(rows), Some(path)) => {
                    export_to_path(&path, rows)
                        .with_context(|| format!("Failed to export to {}", path.display()))?;
                    println!("\nExported {} rows to {}", rows.len(), path.display());
                }
                (_, Some(_)) => println!("\nNothing to export."),
                (_, None) => {}
            }

            Ok(if view.outcome.is_failed() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::Genres => {
            for genre in GENRE_CHOICES {
                println!("{}", genre);
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn print_view(view: &DashboardView) {
    let rows = match &view.outcome {
        QueryOutcome::Rows(rows) => rows,
        QueryOutcome::Empty => {
            println!("No results match your filters.");
            return;
        }
        QueryOutcome::Failed { reason } => {
            eprintln!("Warning: could not load results: {}", reason);
            return;
        }
    };

    println!("Top movies by {}\n", view.options.sort_key.label());
    let width = rows.iter().map(|r| r.title.chars().count()).max().unwrap_or(5).max(5);
    println!(
        "{:<width$}  {:>10}  {:>11}  {:>4}  genres",
        "title",
        "avg_rating",
        "num_ratings",
        "year",
        width = width
    );
    for row in rows {
        let year = row.year.map(|y| y.to_string()).unwrap_or_default();
        println!(
            "{:<width$}  {:>10.2}  {:>11}  {:>4}  {}",
            row.title,
            row.avg_rating,
            row.num_ratings,
            year,
            row.genres,
            width = width
        );
    }

    if let Some(summary) = &view.summary {
        println!("\nMovies Shown: {}", summary.row_count);
        if let Some(mean) = summary.mean_avg_rating {
            println!("Avg Rating: {:.2}", mean);
        }
        println!("\nGenre distribution:");
        for entry in &summary.genre_counts {
            let share = entry.count as f64 * 100.0 / summary.row_count as f64;
            println!("  {:>3}  {:>5.1}%  {}", entry.count, share, entry.genres);
        }
    }
}
