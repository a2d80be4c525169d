//! Dashboard query service.
//!
//! Each operation is a stateless read: it builds the request-scoped filter or
//! page window, calls the store, and reshapes raw records into view types.
//! Store failures are logged with their cause and surfaced to callers only as
//! the operation that failed.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, error};

use crate::model::{
    CardData, CustomerField, CustomerTableRow, InvoiceForm, InvoiceStatus, InvoiceTableRow,
    LatestInvoice, Revenue,
};
use crate::query::{page_count, CustomerFilter, InvoiceFilter, PageWindow};
use crate::storage::{DashboardStore, StoreError};
use crate::utils::format::{cents_to_major, format_currency, to_iso8601};

/// Rows returned by [`DashboardService::fetch_latest_invoices`].
pub const LATEST_INVOICES_LIMIT: u64 = 5;

/// How per-customer rollups are computed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RollupStrategy {
    /// Load each customer's invoice set and fold it in process.
    #[default]
    Fold,
    /// Let the store compute COUNT/SUM per customer in one grouped read.
    Aggregate,
}

/// Query layer configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub rollup: RollupStrategy,
}

/// Dashboard operation, used to scope failure messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Revenue,
    LatestInvoices,
    CardData,
    FilteredInvoices,
    InvoicePages,
    InvoiceById,
    Customers,
    CustomerTable,
}

impl Operation {
    /// Stable identifier for log fields.
    pub const fn name(&self) -> &'static str {
        match self {
            Operation::Revenue => "fetch_revenue",
            Operation::LatestInvoices => "fetch_latest_invoices",
            Operation::CardData => "fetch_card_data",
            Operation::FilteredInvoices => "fetch_filtered_invoices",
            Operation::InvoicePages => "fetch_invoices_pages",
            Operation::InvoiceById => "fetch_invoice_by_id",
            Operation::Customers => "fetch_customers",
            Operation::CustomerTable => "fetch_filtered_customers",
        }
    }

    /// Message shown to callers when the operation fails.
    pub const fn message(&self) -> &'static str {
        match self {
            Operation::Revenue => "Failed to fetch revenue data.",
            Operation::LatestInvoices => "Failed to fetch the latest invoices.",
            Operation::CardData => "Failed to fetch card data.",
            Operation::FilteredInvoices => "Failed to fetch invoices.",
            Operation::InvoicePages => "Failed to fetch total number of invoices.",
            Operation::InvoiceById => "Failed to fetch invoice.",
            Operation::Customers => "Failed to fetch all customers.",
            Operation::CustomerTable => "Failed to fetch customer table.",
        }
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

/// Errors surfaced by dashboard operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Invoice not found: {id}")]
    InvoiceNotFound { id: String },

    #[error("{0}")]
    Failed(Operation),
}

/// Log a store failure and collapse it to the operation-scoped error.
fn store_failure(op: Operation) -> impl FnOnce(StoreError) -> QueryError {
    move |e| {
        error!(operation = op.name(), error = %e, "Database Error");
        QueryError::Failed(op)
    }
}

/// Read-only query layer over a [`DashboardStore`].
pub struct DashboardService {
    store: Arc<dyn DashboardStore>,
    rollup: RollupStrategy,
}

impl DashboardService {
    /// Create a service that folds customer rollups in process.
    pub fn new(store: Arc<dyn DashboardStore>) -> Self {
        Self::with_rollup(store, RollupStrategy::default())
    }

    /// Create a service with an explicit rollup strategy.
    pub fn with_rollup(store: Arc<dyn DashboardStore>, rollup: RollupStrategy) -> Self {
        Self { store, rollup }
    }

    pub fn from_config(store: Arc<dyn DashboardStore>, config: &DashboardConfig) -> Self {
        Self::with_rollup(store, config.rollup)
    }

    /// Full revenue series in store order.
    pub async fn fetch_revenue(&self) -> Result<Vec<Revenue>, QueryError> {
        self.store
            .revenue()
            .await
            .map_err(store_failure(Operation::Revenue))
    }

    /// Most recent invoices with their customer, amounts formatted.
    pub async fn fetch_latest_invoices(&self) -> Result<Vec<LatestInvoice>, QueryError> {
        let rows = self
            .store
            .latest_invoices(LATEST_INVOICES_LIMIT)
            .await
            .map_err(store_failure(Operation::LatestInvoices))?;

        Ok(rows
            .into_iter()
            .map(|row| LatestInvoice {
                amount: format_currency(row.amount),
                id: row.id,
                name: row.name,
                image_url: row.image_url,
                email: row.email,
            })
            .collect())
    }

    /// Summary cards. The four aggregates are read concurrently and any
    /// failure fails the whole summary.
    pub async fn fetch_card_data(&self) -> Result<CardData, QueryError> {
        let (number_of_invoices, number_of_customers, total_paid, total_pending) = tokio::try_join!(
            self.store.count_invoices(),
            self.store.count_customers(),
            self.store.sum_amount_by_status(InvoiceStatus::Paid),
            self.store.sum_amount_by_status(InvoiceStatus::Pending),
        )
        .map_err(store_failure(Operation::CardData))?;

        Ok(CardData {
            number_of_customers,
            number_of_invoices,
            total_paid_invoices: format_currency(total_paid.unwrap_or(0)),
            total_pending_invoices: format_currency(total_pending.unwrap_or(0)),
        })
    }

    /// One page of invoices matching `query`, newest first.
    pub async fn fetch_filtered_invoices(
        &self,
        query: &str,
        page: i64,
    ) -> Result<Vec<InvoiceTableRow>, QueryError> {
        let filter = InvoiceFilter::from_query(query);
        let window = PageWindow::for_page(page);
        debug!(query, page, offset = window.offset, "fetching invoice page");

        let rows = self
            .store
            .find_invoices(&filter, window)
            .await
            .map_err(store_failure(Operation::FilteredInvoices))?;

        Ok(rows
            .into_iter()
            .map(|row| InvoiceTableRow {
                date: to_iso8601(&row.date),
                id: row.id,
                customer_id: row.customer_id,
                name: row.name,
                email: row.email,
                image_url: row.image_url,
                amount: row.amount,
                status: row.status,
            })
            .collect())
    }

    /// Number of pages [`fetch_filtered_invoices`](Self::fetch_filtered_invoices)
    /// spans for `query`.
    pub async fn fetch_invoices_pages(&self, query: &str) -> Result<u64, QueryError> {
        let filter = InvoiceFilter::from_query(query);
        let total = self
            .store
            .count_invoices_matching(&filter)
            .await
            .map_err(store_failure(Operation::InvoicePages))?;

        Ok(page_count(total))
    }

    /// Invoice prepared for the edit form, amount in major units.
    pub async fn fetch_invoice_by_id(&self, id: &str) -> Result<InvoiceForm, QueryError> {
        let record = self
            .store
            .invoice_by_id(id)
            .await
            .map_err(store_failure(Operation::InvoiceById))?
            .ok_or_else(|| QueryError::InvoiceNotFound { id: id.to_string() })?;

        Ok(InvoiceForm {
            id: record.id,
            customer_id: record.customer_id,
            amount: cents_to_major(record.amount),
            status: record.status,
        })
    }

    /// Every customer's id and name, ascending by name.
    pub async fn fetch_customers(&self) -> Result<Vec<CustomerField>, QueryError> {
        self.store
            .customers_by_name()
            .await
            .map_err(store_failure(Operation::Customers))
    }

    /// Customers matching `query` with invoice count and per-status totals.
    pub async fn fetch_filtered_customers(
        &self,
        query: &str,
    ) -> Result<Vec<CustomerTableRow>, QueryError> {
        let filter = CustomerFilter::from_query(query);

        match self.rollup {
            RollupStrategy::Fold => {
                let customers = self
                    .store
                    .customers_with_invoices(&filter)
                    .await
                    .map_err(store_failure(Operation::CustomerTable))?;
                customers
                    .into_iter()
                    .map(|c| CustomerTableRow::fold(c).map_err(StoreError::from))
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(store_failure(Operation::CustomerTable))
            }
            RollupStrategy::Aggregate => self
                .store
                .customer_rollups(&filter)
                .await
                .map_err(store_failure(Operation::CustomerTable)),
        }
    }
}
