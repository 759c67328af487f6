//! Query planner
//!
//! Converts [`FilterOptions`] into a [`QueryPlan`], and a plan into the
//! aggregate AST every SQL adapter renders. The same plan drives the
//! in-memory executor, so both paths share one set of filter semantics.

use super::ast::*;
use super::render::{Dialect, Param, QuerySpec, Sql};
use crate::error::{Error, Result};
use crate::filter::{FilterOptions, GenreFilter, SortKey};
use crate::row::{MovieAggregateRow, ROW_COLUMNS};
use serde::{Deserialize, Serialize};

const RATINGS_ALIAS: &str = "r";
const MOVIES_ALIAS: &str = "m";
const GROUPED_CTE: &str = "filtered";

/// Number of rows returned per query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageSize(u32);

impl PageSize {
    /// Top-10 view
    pub const DEFAULT: PageSize = PageSize(10);
    /// Wide table view
    pub const WIDE: PageSize = PageSize(50);
    /// Largest accepted page
    pub const MAX: u32 = 50;

    /// Validate a page size in `1..=PageSize::MAX`.
    pub fn new(rows: u32) -> Result<Self> {
        if rows == 0 || rows > Self::MAX {
            return Err(Error::InvalidInput(format!(
                "Page size {} outside 1..={}",
                rows,
                Self::MAX
            )));
        }
        Ok(PageSize(rows))
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for PageSize {
    type Error = Error;

    fn try_from(rows: u32) -> Result<Self> {
        PageSize::new(rows)
    }
}

impl From<PageSize> for u32 {
    fn from(size: PageSize) -> u32 {
        size.0
    }
}

/// Table and column names of the two-table ratings schema.
///
/// Defaults follow the MovieLens layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub ratings_table: String,
    pub movies_table: String,
    pub movie_id: String,
    pub rating: String,
    pub title: String,
    pub genres: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            ratings_table: "ratings".to_string(),
            movies_table: "movies".to_string(),
            movie_id: "movieId".to_string(),
            rating: "rating".to_string(),
            title: "title".to_string(),
            genres: "genres".to_string(),
        }
    }
}

/// Builds query plans from filter options.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    page_size: PageSize,
    schema: Schema,
}

impl QueryBuilder {
    /// Create a builder returning `page_size` rows per query.
    pub fn new(page_size: PageSize) -> Self {
        Self {
            page_size,
            schema: Schema::default(),
        }
    }

    /// Use non-default table or column names.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schema = schema;
        self
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Translate filter options into a plan. Pure and deterministic.
    pub fn build(&self, options: &FilterOptions) -> QueryPlan {
        let plan = QueryPlan {
            genre: options.genre.clone(),
            min_ratings: options.min_ratings,
            min_year: options.min_year,
            sort_key: options.sort_key,
            page_size: self.page_size,
            schema: self.schema.clone(),
        };
        tracing::debug!(
            min_ratings = plan.min_ratings,
            min_year = plan.min_year,
            genre = %plan.genre,
            sort = plan.sort_key.column(),
            limit = plan.page_size.get(),
            "Built query plan"
        );
        plan
    }
}

/// Structured form of one dashboard query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub genre: GenreFilter,
    pub min_ratings: u32,
    pub min_year: i32,
    pub sort_key: SortKey,
    pub page_size: PageSize,
    pub schema: Schema,
}

impl QueryPlan {
    /// Output column the plan orders by.
    pub fn sort_column(&self) -> &'static str {
        self.sort_key.column()
    }

    /// Display label of the sort column.
    pub fn sort_label(&self) -> &'static str {
        self.sort_key.label()
    }

    /// Pre-aggregation genre predicate, case-insensitive and literal.
    pub fn matches_genre(&self, genres: &str) -> bool {
        match self.genre.needle() {
            None => true,
            Some(needle) => genres.to_lowercase().contains(&needle.to_lowercase()),
        }
    }

    /// Post-aggregation predicate: count floor and a defined year at or
    /// after the year floor.
    pub fn admits(&self, row: &MovieAggregateRow) -> bool {
        row.num_ratings >= i64::from(self.min_ratings)
            && row.year.is_some_and(|year| year >= self.min_year)
    }

    /// Lower the plan to an aggregate AST and its parameter list.
    pub fn to_query(&self) -> (Query, Vec<Param>) {
        let mut params = Vec::new();
        let mut bind = |param: Param| {
            params.push(param);
            Expression::Param(params.len())
        };

        let title = Expression::column(MOVIES_ALIAS, &self.schema.title);
        let genres = Expression::column(MOVIES_ALIAS, &self.schema.genres);
        let title_year = Expression::TitleYear(Box::new(title.clone()));

        let mut row_filters = vec![Expression::IsNotNull(Box::new(title_year.clone()))];
        if let Some(needle) = self.genre.needle() {
            row_filters.push(Expression::Contains {
                haystack: Box::new(genres.clone()),
                needle: Box::new(bind(Param::Text(needle.to_string()))),
            });
        }

        let grouped = Query {
            with: None,
            select: SelectClause {
                columns: vec![
                    SelectColumn::aliased(title, ROW_COLUMNS[0]),
                    SelectColumn::aliased(genres, ROW_COLUMNS[1]),
                    SelectColumn::aliased(
                        Expression::Round {
                            expr: Box::new(Expression::Aggregate {
                                function: AggregateFunction::Avg,
                                arg: Some(Box::new(Expression::column(
                                    RATINGS_ALIAS,
                                    &self.schema.rating,
                                ))),
                            }),
                            digits: 2,
                        },
                        ROW_COLUMNS[2],
                    ),
                    SelectColumn::aliased(
                        Expression::Aggregate {
                            function: AggregateFunction::Count,
                            arg: None,
                        },
                        ROW_COLUMNS[3],
                    ),
                    SelectColumn::aliased(title_year, ROW_COLUMNS[4]),
                ],
            },
            from: FromClause {
                table: TableRef::aliased(&self.schema.ratings_table, RATINGS_ALIAS),
                joins: vec![Join {
                    join_type: JoinType::Inner,
                    table: TableRef::aliased(&self.schema.movies_table, MOVIES_ALIAS),
                    condition: Expression::compare(
                        Expression::column(RATINGS_ALIAS, &self.schema.movie_id),
                        BinaryOperator::Eq,
                        Expression::column(MOVIES_ALIAS, &self.schema.movie_id),
                    ),
                }],
            },
            where_clause: Expression::conjunction(row_filters)
                .map(|condition| WhereClause { condition }),
            group_by: vec![
                ColumnRef::qualified(MOVIES_ALIAS, &self.schema.title),
                ColumnRef::qualified(MOVIES_ALIAS, &self.schema.genres),
            ],
            order_by: None,
            limit: None,
        };

        let group_filters = vec![
            Expression::compare(
                Expression::bare(ROW_COLUMNS[3]),
                BinaryOperator::Ge,
                bind(Param::Integer(i64::from(self.min_ratings))),
            ),
            Expression::compare(
                Expression::bare(ROW_COLUMNS[4]),
                BinaryOperator::Ge,
                bind(Param::Integer(i64::from(self.min_year))),
            ),
        ];
        let limit = bind(Param::Integer(i64::from(self.page_size.get())));

        let query = Query {
            with: Some(CommonTableExpression {
                name: GROUPED_CTE.to_string(),
                query: Box::new(grouped),
            }),
            select: SelectClause {
                columns: ROW_COLUMNS
                    .iter()
                    .map(|name| SelectColumn::new(Expression::bare(name)))
                    .collect(),
            },
            from: FromClause {
                table: TableRef::new(GROUPED_CTE),
                joins: Vec::new(),
            },
            where_clause: Expression::conjunction(group_filters)
                .map(|condition| WhereClause { condition }),
            group_by: Vec::new(),
            order_by: Some(OrderByClause {
                columns: vec![OrderByColumn {
                    column: ColumnRef::new(self.sort_column()),
                    direction: OrderDirection::Desc,
                }],
            }),
            limit: Some(limit),
        };

        (query, params)
    }

    /// Render the plan for a SQL adapter.
    pub fn to_sql(&self, dialect: Dialect) -> QuerySpec {
        let (query, params) = self.to_query();
        QuerySpec {
            sql: Sql(&query, dialect).to_string(),
            params,
            dialect,
            sort_key: self.sort_key,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan(options: FilterOptions) -> QueryPlan {
        QueryBuilder::default().build(&options)
    }

    #[test]
    fn test_page_size_bounds() {
        assert!(PageSize::new(0).is_err());
        assert!(PageSize::new(51).is_err());
        assert_eq!(PageSize::new(50).unwrap(), PageSize::WIDE);
        assert_eq!(PageSize::default().get(), 10);
    }

    #[test]
    fn test_sqlite_text_without_genre() {
        let spec = plan(FilterOptions::new(100, SortKey::AverageRating, 1950)).to_sql(Dialect::Sqlite);
        assert_eq!(
            spec.sql,
            "WITH filtered AS (SELECT m.title AS title, m.genres AS genres, \
             ROUND(AVG(r.rating), 2) AS avg_rating, COUNT(*) AS num_ratings, \
             title_year(m.title) AS year \
             FROM ratings AS r INNER JOIN movies AS m ON r.\"movieId\" = m.\"movieId\" \
             WHERE title_year(m.title) IS NOT NULL \
             GROUP BY m.title, m.genres) \
             SELECT title, genres, avg_rating, num_ratings, year FROM filtered \
             WHERE (num_ratings >= ?1 AND year >= ?2) \
             ORDER BY avg_rating DESC LIMIT ?3"
        );
        assert_eq!(
            spec.params,
            vec![Param::Integer(100), Param::Integer(1950), Param::Integer(10)]
        );
        assert_eq!(spec.sort_column(), "avg_rating");
    }

    #[test]
    fn test_genre_is_bound_not_interpolated() {
        let options = FilterOptions::default()
            .with_genre("Sci-Fi'; DROP TABLE movies; --")
            .with_sort_key(SortKey::RatingCount);
        let spec = plan(options).to_sql(Dialect::Sqlite);
        assert!(!spec.sql.contains("DROP"));
        assert!(spec
            .sql
            .contains("WHERE (title_year(m.title) IS NOT NULL AND instr(lower(m.genres), lower(?1)) > 0)"));
        assert!(spec.sql.ends_with("ORDER BY num_ratings DESC LIMIT ?4"));
        assert_eq!(
            spec.params[0],
            Param::Text("Sci-Fi'; DROP TABLE movies; --".to_string())
        );
        assert_eq!(spec.params.len(), 4);
    }

    #[test]
    fn test_all_genre_adds_no_predicate() {
        let with_all = plan(FilterOptions::default().with_genre("All")).to_sql(Dialect::Sqlite);
        let without = plan(FilterOptions::default()).to_sql(Dialect::Sqlite);
        assert_eq!(with_all, without);
        assert!(!with_all.sql.contains("instr"));
    }

    #[test]
    fn test_postgres_text() {
        let spec = plan(FilterOptions::default().with_genre("Comedy")).to_sql(Dialect::Postgres);
        assert!(spec.sql.contains("strpos(lower(m.genres), lower($1)) > 0"));
        assert!(spec.sql.contains("WHERE (num_ratings >= $2 AND year >= $3)"));
        assert!(spec.sql.ends_with("LIMIT $4"));
        assert!(spec.sql.contains("ROUND(CAST(AVG(r.rating) AS NUMERIC), 2)"));
        assert!(spec.sql.contains("r.\"movieId\" = m.\"movieId\""));
    }

    #[test]
    fn test_custom_schema_and_page_size() {
        let schema = Schema {
            ratings_table: "user_ratings".to_string(),
            movie_id: "movie_id".to_string(),
            ..Schema::default()
        };
        let builder = QueryBuilder::new(PageSize::WIDE).with_schema(schema);
        let spec = builder.build(&FilterOptions::default()).to_sql(Dialect::Sqlite);
        assert!(spec
            .sql
            .contains("FROM user_ratings AS r INNER JOIN movies AS m ON r.movie_id = m.movie_id"));
        assert_eq!(spec.params.last(), Some(&Param::Integer(50)));
    }

    #[test]
    fn test_build_is_deterministic() {
        let options = FilterOptions::default().with_genre("Drama");
        let builder = QueryBuilder::default();
        assert_eq!(builder.build(&options), builder.build(&options));
        assert_eq!(
            builder.build(&options).to_sql(Dialect::Sqlite),
            builder.build(&options).to_sql(Dialect::Sqlite)
        );
    }

    #[test]
    fn test_row_predicates() {
        let plan = plan(
            FilterOptions::new(10, SortKey::AverageRating, 1990).with_genre("comedy"),
        );
        assert!(plan.matches_genre("Action|COMEDY"));
        assert!(!plan.matches_genre("Action|Drama"));

        let row = MovieAggregateRow::new("Clerks (1994)", "Comedy", 4.0, 12, Some(1994));
        assert!(plan.admits(&row));
        let row = MovieAggregateRow::new("Clerks (1994)", "Comedy", 4.0, 9, Some(1994));
        assert!(!plan.admits(&row));
        let row = MovieAggregateRow::new("Clerks", "Comedy", 4.0, 12, None);
        assert!(!plan.admits(&row));
        let row = MovieAggregateRow::new("Big (1988)", "Comedy", 4.0, 12, Some(1988));
        assert!(!plan.admits(&row));
    }
}
