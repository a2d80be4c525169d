//! Store access facade.
//!
//! [`DashboardStore`] is the only point of contact with the persistence
//! engine. It exposes relational read primitives (filtered, sorted,
//! paginated reads and COUNT/SUM aggregates) and returns raw records; all
//! reshaping happens in the query layer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::config::{StorageConfig, StorageType};
use crate::model::{
    CustomerField, CustomerTableRow, CustomerWithInvoices, InvoiceRecord, InvoiceStatus,
    InvoiceWithCustomer, Revenue, TotalOverflow, UnknownStatus,
};
use crate::query::{CustomerFilter, InvoiceFilter, PageWindow};

pub mod helpers;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod schema;
#[cfg(any(feature = "sqlite", feature = "postgres"))]
pub mod sql;

#[cfg(any(test, feature = "test-utils"))]
pub mod mock;

#[cfg(feature = "postgres")]
pub use sql::PostgresDashboardStore;
#[cfg(feature = "sqlite")]
pub use sql::SqliteDashboardStore;

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(any(feature = "sqlite", feature = "postgres"))]
impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

impl From<UnknownStatus> for StoreError {
    fn from(err: UnknownStatus) -> Self {
        StoreError::Decode(err.to_string())
    }
}

impl From<TotalOverflow> for StoreError {
    fn from(err: TotalOverflow) -> Self {
        StoreError::Decode(err.to_string())
    }
}

/// Relational read primitives over customers, invoices and revenue.
///
/// Implementations:
/// - `SqlDashboardStore<Sqlite>` / `SqlDashboardStore<Postgres>`: sea-query + sqlx
/// - `MockDashboardStore`: in-memory, for tests
#[async_trait]
pub trait DashboardStore: Send + Sync + 'static {
    /// Create tables and indexes if they don't exist.
    async fn init_schema(&self) -> Result<()>;

    /// All revenue rows in store-native order.
    async fn revenue(&self) -> Result<Vec<Revenue>>;

    /// The `limit` most recently dated invoices, newest first.
    async fn latest_invoices(&self, limit: u64) -> Result<Vec<InvoiceWithCustomer>>;

    /// `COUNT(*)` over invoices.
    async fn count_invoices(&self) -> Result<u64>;

    /// `COUNT(*)` over customers.
    async fn count_customers(&self) -> Result<u64>;

    /// `SUM(amount)` over invoices with the given status.
    ///
    /// `None` when no invoice has that status.
    async fn sum_amount_by_status(&self, status: InvoiceStatus) -> Result<Option<i64>>;

    /// One window of the invoices matching `filter`, newest first.
    async fn find_invoices(
        &self,
        filter: &InvoiceFilter,
        window: PageWindow,
    ) -> Result<Vec<InvoiceWithCustomer>>;

    /// Number of invoices matching `filter`.
    async fn count_invoices_matching(&self, filter: &InvoiceFilter) -> Result<u64>;

    /// Single invoice by id.
    async fn invoice_by_id(&self, id: &str) -> Result<Option<InvoiceRecord>>;

    /// Every customer's id and name, ascending by name.
    async fn customers_by_name(&self) -> Result<Vec<CustomerField>>;

    /// Customers matching `filter` with their full invoice sets, ascending by name.
    async fn customers_with_invoices(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<CustomerWithInvoices>>;

    /// Customers matching `filter` with rollups computed by the store,
    /// ascending by name.
    async fn customer_rollups(&self, filter: &CustomerFilter) -> Result<Vec<CustomerTableRow>>;
}

/// Initialize storage based on configuration.
///
/// Connects a pool for the configured backend and returns the store. Schema
/// creation is left to the caller via [`DashboardStore::init_schema`].
pub async fn init_storage(
    config: &StorageConfig,
) -> std::result::Result<Arc<dyn DashboardStore>, Box<dyn std::error::Error>> {
    info!(storage = ?config.storage_type, "initializing storage");

    match config.storage_type {
        #[cfg(feature = "sqlite")]
        StorageType::Sqlite => {
            use std::time::Duration;

            use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};

            let path = &config.sqlite.path;
            let in_memory = path == ":memory:";

            if !in_memory {
                if let Some(parent) = std::path::Path::new(path).parent() {
                    if !parent.as_os_str().is_empty() {
                        std::fs::create_dir_all(parent)?;
                    }
                }
            }

            let mut opts = SqliteConnectOptions::new()
                .filename(path)
                .busy_timeout(Duration::from_secs(30))
                .create_if_missing(true);
            if !in_memory {
                opts = opts.journal_mode(SqliteJournalMode::Wal);
            }

            // Each connection to :memory: is a separate database
            let max_connections = if in_memory {
                1
            } else {
                config.max_connections
            };

            let mut pool_opts = SqlitePoolOptions::new().max_connections(max_connections);
            if in_memory {
                // Dropping the only connection drops the database
                pool_opts = pool_opts.idle_timeout(None).max_lifetime(None);
            }
            let pool = pool_opts.connect_with(opts).await?;

            Ok(Arc::new(SqliteDashboardStore::new(pool)))
        }
        #[cfg(feature = "postgres")]
        StorageType::Postgres => {
            use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

            // Offset-less stored dates are UTC
            let opts = config
                .postgres
                .uri
                .parse::<PgConnectOptions>()?
                .options([("TimeZone", "UTC")]);
            let pool = PgPoolOptions::new()
                .max_connections(config.max_connections)
                .connect_with(opts)
                .await?;

            Ok(Arc::new(PostgresDashboardStore::new(pool)))
        }
        #[allow(unreachable_patterns)]
        ref other => {
            error!(storage = ?other, "storage backend requested but its feature is not enabled");
            Err(format!("storage backend not enabled: {:?}", other).into())
        }
    }
}
