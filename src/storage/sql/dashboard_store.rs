//! Unified SQL DashboardStore implementation.
//!
//! Uses a macro to generate implementations for each SQL backend,
//! eliminating code duplication while maintaining type safety.

use std::marker::PhantomData;

use super::SqlDatabase;

/// SQL-based implementation of DashboardStore.
///
/// This generic implementation works with any SQL database that implements
/// the `SqlDatabase` trait (PostgreSQL, SQLite).
pub struct SqlDashboardStore<DB: SqlDatabase> {
    pool: DB::Pool,
    _marker: PhantomData<DB>,
}

impl<DB: SqlDatabase> SqlDashboardStore<DB> {
    /// Create a new SQL dashboard store with the given pool.
    pub fn new(pool: DB::Pool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    /// Get the underlying pool.
    pub fn pool(&self) -> &DB::Pool {
        &self.pool
    }
}

/// Macro to implement DashboardStore (plus row inserts used for seeding) for
/// a specific SQL backend.
macro_rules! impl_dashboard_store {
    ($db_type:ty, $row_type:ty, $feature:literal) => {
        #[cfg(feature = $feature)]
        impl SqlDashboardStore<$db_type> {
            fn decode_count(row: &$row_type) -> crate::storage::Result<u64> {
                use sqlx::Row;

                let count: i64 = row.try_get("count")?;
                crate::storage::helpers::to_count(count)
            }

            fn decode_invoice_with_customer(
                row: &$row_type,
            ) -> crate::storage::Result<crate::model::InvoiceWithCustomer> {
                use sqlx::Row;

                let date: String = row.try_get("date")?;
                let status: String = row.try_get("status")?;

                Ok(crate::model::InvoiceWithCustomer {
                    id: row.try_get("id")?,
                    customer_id: row.try_get("customer_id")?,
                    amount: row.try_get("amount")?,
                    date: crate::storage::helpers::parse_store_date(&date)?,
                    status: status.parse()?,
                    name: row.try_get("name")?,
                    email: row.try_get("email")?,
                    image_url: row.try_get("image_url")?,
                })
            }

            /// Insert a customer row.
            pub async fn insert_customer(
                &self,
                customer: &crate::model::Customer,
            ) -> crate::storage::Result<()> {
                let sql = <$db_type>::build_insert(super::statements::insert_customer(customer));
                sqlx::query(&sql).execute(&self.pool).await?;
                Ok(())
            }

            /// Insert an invoice row. The owning customer must exist.
            pub async fn insert_invoice(
                &self,
                invoice: &crate::model::Invoice,
            ) -> crate::storage::Result<()> {
                let sql = <$db_type>::build_insert(super::statements::insert_invoice(invoice));
                sqlx::query(&sql).execute(&self.pool).await?;
                Ok(())
            }

            /// Append a point to the revenue series.
            pub async fn insert_revenue(
                &self,
                point: &crate::model::Revenue,
            ) -> crate::storage::Result<()> {
                let sql = <$db_type>::build_insert(super::statements::insert_revenue(point));
                sqlx::query(&sql).execute(&self.pool).await?;
                Ok(())
            }
        }

        #[cfg(feature = $feature)]
        #[async_trait::async_trait]
        impl crate::storage::DashboardStore for SqlDashboardStore<$db_type> {
            async fn init_schema(&self) -> crate::storage::Result<()> {
                for ddl in <$db_type as SqlDatabase>::SCHEMA {
                    sqlx::query(ddl).execute(&self.pool).await?;
                }
                Ok(())
            }

            async fn revenue(&self) -> crate::storage::Result<Vec<crate::model::Revenue>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::revenue());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter()
                    .map(|row| -> crate::storage::Result<crate::model::Revenue> {
                        Ok(crate::model::Revenue {
                            month: row.try_get("month")?,
                            revenue: row.try_get("revenue")?,
                        })
                    })
                    .collect()
            }

            async fn latest_invoices(
                &self,
                limit: u64,
            ) -> crate::storage::Result<Vec<crate::model::InvoiceWithCustomer>> {
                let stmt = super::statements::latest_invoices::<$db_type>(limit);
                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter().map(Self::decode_invoice_with_customer).collect()
            }

            async fn count_invoices(&self) -> crate::storage::Result<u64> {
                let sql = <$db_type>::build_select(super::statements::count_invoices());
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                Self::decode_count(&row)
            }

            async fn count_customers(&self) -> crate::storage::Result<u64> {
                let sql = <$db_type>::build_select(super::statements::count_customers());
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                Self::decode_count(&row)
            }

            async fn sum_amount_by_status(
                &self,
                status: crate::model::InvoiceStatus,
            ) -> crate::storage::Result<Option<i64>> {
                use sqlx::Row;

                let sql =
                    <$db_type>::build_select(super::statements::sum_amount_by_status(status));
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                Ok(row.try_get("total")?)
            }

            async fn find_invoices(
                &self,
                filter: &crate::query::InvoiceFilter,
                window: crate::query::PageWindow,
            ) -> crate::storage::Result<Vec<crate::model::InvoiceWithCustomer>> {
                let stmt = super::statements::find_invoices::<$db_type>(filter, window);
                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter().map(Self::decode_invoice_with_customer).collect()
            }

            async fn count_invoices_matching(
                &self,
                filter: &crate::query::InvoiceFilter,
            ) -> crate::storage::Result<u64> {
                let stmt = super::statements::count_invoices_matching::<$db_type>(filter);
                let sql = <$db_type>::build_select(stmt);
                let row = sqlx::query(&sql).fetch_one(&self.pool).await?;
                Self::decode_count(&row)
            }

            async fn invoice_by_id(
                &self,
                id: &str,
            ) -> crate::storage::Result<Option<crate::model::InvoiceRecord>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::invoice_by_id(id));
                let row = sqlx::query(&sql).fetch_optional(&self.pool).await?;

                match row {
                    Some(row) => {
                        let status: String = row.try_get("status")?;
                        Ok(Some(crate::model::InvoiceRecord {
                            id: row.try_get("id")?,
                            customer_id: row.try_get("customer_id")?,
                            amount: row.try_get("amount")?,
                            status: status.parse()?,
                        }))
                    }
                    None => Ok(None),
                }
            }

            async fn customers_by_name(
                &self,
            ) -> crate::storage::Result<Vec<crate::model::CustomerField>> {
                use sqlx::Row;

                let sql = <$db_type>::build_select(super::statements::customers_by_name());
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter()
                    .map(|row| -> crate::storage::Result<crate::model::CustomerField> {
                        Ok(crate::model::CustomerField {
                            id: row.try_get("id")?,
                            name: row.try_get("name")?,
                        })
                    })
                    .collect()
            }

            async fn customers_with_invoices(
                &self,
                filter: &crate::query::CustomerFilter,
            ) -> crate::storage::Result<Vec<crate::model::CustomerWithInvoices>> {
                use std::collections::HashMap;

                use sqlx::Row;

                use crate::model::{CustomerWithInvoices, InvoiceSummary};

                let stmt = super::statements::matching_customers::<$db_type>(filter);
                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut customers = rows
                    .iter()
                    .map(|row| -> crate::storage::Result<CustomerWithInvoices> {
                        Ok(CustomerWithInvoices {
                            id: row.try_get("id")?,
                            name: row.try_get("name")?,
                            email: row.try_get("email")?,
                            image_url: row.try_get("image_url")?,
                            invoices: Vec::new(),
                        })
                    })
                    .collect::<crate::storage::Result<Vec<_>>>()?;

                if customers.is_empty() {
                    return Ok(customers);
                }

                let ids: Vec<String> = customers.iter().map(|c| c.id.clone()).collect();
                let sql =
                    <$db_type>::build_select(super::statements::invoices_for_customers(&ids));
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                let mut by_customer: HashMap<String, Vec<InvoiceSummary>> = HashMap::new();
                for row in &rows {
                    let customer_id: String = row.try_get("customer_id")?;
                    let status: String = row.try_get("status")?;
                    by_customer.entry(customer_id).or_default().push(InvoiceSummary {
                        id: row.try_get("id")?,
                        amount: row.try_get("amount")?,
                        status: status.parse()?,
                    });
                }

                for customer in &mut customers {
                    customer.invoices = by_customer.remove(&customer.id).unwrap_or_default();
                }

                Ok(customers)
            }

            async fn customer_rollups(
                &self,
                filter: &crate::query::CustomerFilter,
            ) -> crate::storage::Result<Vec<crate::model::CustomerTableRow>> {
                use sqlx::Row;

                let stmt = super::statements::customer_rollups::<$db_type>(filter);
                let sql = <$db_type>::build_select(stmt);
                let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;

                rows.iter()
                    .map(|row| -> crate::storage::Result<crate::model::CustomerTableRow> {
                        let total_invoices: i64 = row.try_get("total_invoices")?;
                        Ok(crate::model::CustomerTableRow {
                            id: row.try_get("id")?,
                            name: row.try_get("name")?,
                            email: row.try_get("email")?,
                            image_url: row.try_get("image_url")?,
                            total_invoices: crate::storage::helpers::to_count(total_invoices)?,
                            total_pending: row.try_get("total_pending")?,
                            total_paid: row.try_get("total_paid")?,
                        })
                    })
                    .collect()
            }
        }
    };
}

// Generate implementations for each SQL backend
impl_dashboard_store!(super::postgres::Postgres, sqlx::postgres::PgRow, "postgres");
impl_dashboard_store!(super::sqlite::Sqlite, sqlx::sqlite::SqliteRow, "sqlite");
