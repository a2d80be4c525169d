//! SQL database abstraction trait.

use sea_query::{ColumnRef, SimpleExpr};

/// Trait for SQL database backends.
///
/// This trait abstracts over different SQL databases (PostgreSQL, SQLite)
/// by providing the pool type, the DDL to run, query rendering, and the
/// few expressions whose SQL differs between dialects.
pub trait SqlDatabase: Send + Sync + 'static {
    /// The connection pool type for this database.
    type Pool: Clone + Send + Sync;

    /// DDL statements executed in order by `init_schema`.
    const SCHEMA: &'static [&'static str];

    /// Build a SQL query string from a sea-query SELECT statement.
    fn build_select(stmt: sea_query::SelectStatement) -> String;

    /// Build a SQL query string from a sea-query INSERT statement.
    fn build_insert(stmt: sea_query::InsertStatement) -> String;

    /// Case-insensitive `col LIKE pattern`.
    ///
    /// `pattern` is ASCII-lowercased and escaped with `LIKE_ESCAPE`.
    fn contains_insensitive(col: ColumnRef, pattern: &str) -> SimpleExpr;

    /// Chronological sort key for a stored date column.
    ///
    /// Dates are text in more than one accepted format, so the raw column
    /// does not sort by instant.
    fn date_sort_key(col: ColumnRef) -> SimpleExpr;
}
