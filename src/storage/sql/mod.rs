//! Unified SQL storage implementation.
//!
//! Statements are built once with sea-query (see [`statements`]) and rendered
//! per backend through the `SqlDatabase` trait. The store itself is generic
//! over the backend marker type.

mod dashboard_store;
mod query;
pub mod statements;

pub use dashboard_store::SqlDashboardStore;
pub use query::SqlDatabase;

#[cfg(feature = "postgres")]
pub use postgres::PostgresDashboardStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDashboardStore;

#[cfg(feature = "postgres")]
pub mod postgres {
    //! PostgreSQL database backend.

    use sea_query::extension::postgres::PgExpr;
    use sea_query::{Alias, ColumnRef, Expr, Func, LikeExpr, PostgresQueryBuilder, SimpleExpr};
    use sqlx::PgPool;

    use crate::query::LIKE_ESCAPE;
    use crate::storage::schema::POSTGRES_SCHEMA;

    /// PostgreSQL database marker type.
    pub struct Postgres;

    impl super::SqlDatabase for Postgres {
        type Pool = PgPool;

        const SCHEMA: &'static [&'static str] = POSTGRES_SCHEMA;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(PostgresQueryBuilder)
        }

        // ILIKE folds Unicode case on both sides
        fn contains_insensitive(col: ColumnRef, pattern: &str) -> SimpleExpr {
            Expr::col(col).ilike(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
        }

        // Offset-less text is read in the session time zone, pinned to UTC
        // by `init_storage`
        fn date_sort_key(col: ColumnRef) -> SimpleExpr {
            Func::cast_as(Expr::col(col), Alias::new("TIMESTAMPTZ")).into()
        }
    }

    /// PostgreSQL dashboard store.
    pub type PostgresDashboardStore = super::SqlDashboardStore<Postgres>;
}

#[cfg(feature = "sqlite")]
pub mod sqlite {
    //! SQLite database backend.

    use sea_query::{Alias, ColumnRef, Expr, Func, LikeExpr, SimpleExpr, SqliteQueryBuilder};
    use sqlx::SqlitePool;

    use crate::query::LIKE_ESCAPE;
    use crate::storage::schema::SQLITE_SCHEMA;

    /// SQLite database marker type.
    pub struct Sqlite;

    impl super::SqlDatabase for Sqlite {
        type Pool = SqlitePool;

        const SCHEMA: &'static [&'static str] = SQLITE_SCHEMA;

        fn build_select(stmt: sea_query::SelectStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        fn build_insert(stmt: sea_query::InsertStatement) -> String {
            stmt.to_string(SqliteQueryBuilder)
        }

        // LOWER() and LIKE fold ASCII only; non-ASCII must match exactly
        fn contains_insensitive(col: ColumnRef, pattern: &str) -> SimpleExpr {
            Expr::expr(Func::lower(Expr::col(col)))
                .like(LikeExpr::new(pattern).escape(LIKE_ESCAPE))
        }

        // julianday() reads every accepted date format; offset-less text is UTC
        fn date_sort_key(col: ColumnRef) -> SimpleExpr {
            Func::cust(Alias::new("julianday")).arg(Expr::col(col)).into()
        }
    }

    /// SQLite dashboard store.
    pub type SqliteDashboardStore = super::SqlDashboardStore<Sqlite>;
}
