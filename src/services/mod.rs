//! Query layer services.

pub mod dashboard;

pub use dashboard::{
    DashboardConfig, DashboardService, Operation, QueryError, RollupStrategy,
    LATEST_INVOICES_LIMIT,
};
