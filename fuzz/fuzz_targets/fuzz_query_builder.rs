#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use reelstats_core::{
    Dialect, FilterOptions, GenreFilter, MemoryExecutor, PageSize, Param, QueryBuilder,
    QueryExecutor, SortKey,
};

#[derive(Arbitrary, Debug)]
struct Input {
    min_ratings: u16,
    by_count: bool,
    genre: Option<String>,
    min_year: i16,
    page_size: u8,
    movies: Vec<(String, String, Vec<u8>)>,
}

fuzz_target!(|input: Input| {
    let options = FilterOptions {
        min_ratings: u32::from(input.min_ratings),
        sort_key: if input.by_count {
            SortKey::RatingCount
        } else {
            SortKey::AverageRating
        },
        genre: GenreFilter::from_choice(input.genre.as_deref()),
        min_year: i32::from(input.min_year),
    };
    let page_size = PageSize::new(u32::from(input.page_size)).unwrap_or_default();
    let plan = QueryBuilder::new(page_size).build(&options);

    // The genre is always bound, never spliced
    for dialect in [Dialect::Sqlite, Dialect::Postgres] {
        let spec = plan.to_sql(dialect);
        if let Some(needle) = options.genre.needle() {
            assert_eq!(spec.params.first(), Some(&Param::Text(needle.to_string())));
        }
        assert_eq!(
            spec.params.last(),
            Some(&Param::Integer(i64::from(page_size.get())))
        );
    }

    let mut exec = MemoryExecutor::new();
    for (id, (title, genres, ratings)) in input.movies.iter().take(64).enumerate() {
        exec.add_movie(id as i64, title.as_str(), genres.as_str());
        for rating in ratings.iter().take(64) {
            exec.add_rating(id as i64, f64::from(*rating % 11) * 0.5);
        }
    }

    if let Ok(rows) = exec.execute(&plan) {
        assert!(rows.len() <= page_size.get() as usize);
        for row in &rows {
            assert!(row.num_ratings >= i64::from(options.min_ratings));
            assert!(row.year.is_some_and(|year| year >= options.min_year));
        }
    }
});
