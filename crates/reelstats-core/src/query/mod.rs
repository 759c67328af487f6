//! Query engine module
//!
//! Filter-to-query planning, SQL rendering and in-memory execution.

/// Abstract Syntax Tree types
#[allow(missing_docs)]
pub mod ast;
/// Query executors
#[allow(missing_docs)]
pub mod executor;
/// Query planner
#[allow(missing_docs)]
pub mod plan;
/// SQL rendering
#[allow(missing_docs)]
pub mod render;

// Re-export main types
pub use executor::{MemoryExecutor, MovieRecord, QueryExecutor, RatingRecord};
pub use plan::{PageSize, QueryBuilder, QueryPlan, Schema};
pub use render::{Dialect, Param, QuerySpec, RenderSql, Sql, TITLE_YEAR_FUNCTION};
