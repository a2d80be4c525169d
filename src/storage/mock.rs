//! Mock DashboardStore implementation for testing.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::model::{
    Customer, CustomerField, CustomerTableRow, CustomerWithInvoices, Invoice, InvoiceRecord,
    InvoiceStatus, InvoiceSummary, InvoiceWithCustomer, Revenue,
};
use crate::query::{CustomerFilter, InvoiceFilter, PageWindow};
use crate::storage::{DashboardStore, Result, StoreError};

/// Mock dashboard store that keeps every table in memory.
///
/// Reads evaluate the same predicates and orderings as the SQL backends, so
/// services can be tested without a database.
#[derive(Default)]
pub struct MockDashboardStore {
    customers: RwLock<Vec<Customer>>,
    invoices: RwLock<Vec<Invoice>>,
    revenue: RwLock<Vec<Revenue>>,
    fail: RwLock<bool>,
}

impl MockDashboardStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_customer(&self, customer: Customer) {
        self.customers.write().await.push(customer);
    }

    pub async fn add_invoice(&self, invoice: Invoice) {
        self.invoices.write().await.push(invoice);
    }

    pub async fn add_revenue(&self, point: Revenue) {
        self.revenue.write().await.push(point);
    }

    /// Make every subsequent read fail with [`StoreError::Unavailable`].
    pub async fn set_fail(&self, fail: bool) {
        *self.fail.write().await = fail;
    }

    async fn check(&self) -> Result<()> {
        if *self.fail.read().await {
            return Err(StoreError::Unavailable("mock store failure".to_string()));
        }
        Ok(())
    }

    /// Inner join of invoices with customers, newest first.
    async fn joined(&self) -> Vec<InvoiceWithCustomer> {
        let customers = self.customers.read().await;
        let invoices = self.invoices.read().await;

        let mut rows: Vec<InvoiceWithCustomer> = invoices
            .iter()
            .filter_map(|invoice| {
                let customer = customers.iter().find(|c| c.id == invoice.customer_id)?;
                Some(InvoiceWithCustomer {
                    id: invoice.id.clone(),
                    customer_id: invoice.customer_id.clone(),
                    amount: invoice.amount,
                    date: invoice.date,
                    status: invoice.status,
                    name: customer.name.clone(),
                    email: customer.email.clone(),
                    image_url: customer.image_url.clone(),
                })
            })
            .collect();

        rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        rows
    }

    async fn matching_customers(&self, filter: &CustomerFilter) -> Vec<Customer> {
        let mut customers: Vec<Customer> = self
            .customers
            .read()
            .await
            .iter()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect();
        customers.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        customers
    }
}

#[async_trait]
impl DashboardStore for MockDashboardStore {
    async fn init_schema(&self) -> Result<()> {
        self.check().await
    }

    async fn revenue(&self) -> Result<Vec<Revenue>> {
        self.check().await?;
        Ok(self.revenue.read().await.clone())
    }

    async fn latest_invoices(&self, limit: u64) -> Result<Vec<InvoiceWithCustomer>> {
        self.check().await?;
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(self.joined().await.into_iter().take(limit).collect())
    }

    async fn count_invoices(&self) -> Result<u64> {
        self.check().await?;
        Ok(self.invoices.read().await.len() as u64)
    }

    async fn count_customers(&self) -> Result<u64> {
        self.check().await?;
        Ok(self.customers.read().await.len() as u64)
    }

    async fn sum_amount_by_status(&self, status: InvoiceStatus) -> Result<Option<i64>> {
        self.check().await?;
        let invoices = self.invoices.read().await;
        let mut amounts = invoices
            .iter()
            .filter(|i| i.status == status)
            .map(|i| i.amount);

        let Some(first) = amounts.next() else {
            return Ok(None);
        };
        amounts
            .try_fold(first, i64::checked_add)
            .map(Some)
            .ok_or_else(|| StoreError::Decode(format!("{status} total overflows i64")))
    }

    async fn find_invoices(
        &self,
        filter: &InvoiceFilter,
        window: PageWindow,
    ) -> Result<Vec<InvoiceWithCustomer>> {
        self.check().await?;
        let matching: Vec<InvoiceWithCustomer> = self
            .joined()
            .await
            .into_iter()
            .filter(|row| filter.matches(row))
            .collect();
        let range = window.range(matching.len());
        Ok(matching[range].to_vec())
    }

    async fn count_invoices_matching(&self, filter: &InvoiceFilter) -> Result<u64> {
        self.check().await?;
        Ok(self
            .joined()
            .await
            .iter()
            .filter(|row| filter.matches(row))
            .count() as u64)
    }

    async fn invoice_by_id(&self, id: &str) -> Result<Option<InvoiceRecord>> {
        self.check().await?;
        Ok(self
            .invoices
            .read()
            .await
            .iter()
            .find(|i| i.id == id)
            .map(|i| InvoiceRecord {
                id: i.id.clone(),
                customer_id: i.customer_id.clone(),
                amount: i.amount,
                status: i.status,
            }))
    }

    async fn customers_by_name(&self) -> Result<Vec<CustomerField>> {
        self.check().await?;
        Ok(self
            .matching_customers(&CustomerFilter::from_query(""))
            .await
            .into_iter()
            .map(|c| CustomerField {
                id: c.id,
                name: c.name,
            })
            .collect())
    }

    async fn customers_with_invoices(
        &self,
        filter: &CustomerFilter,
    ) -> Result<Vec<CustomerWithInvoices>> {
        self.check().await?;
        let customers = self.matching_customers(filter).await;
        let invoices = self.invoices.read().await;

        Ok(customers
            .into_iter()
            .map(|c| {
                let mut owned: Vec<InvoiceSummary> = invoices
                    .iter()
                    .filter(|i| i.customer_id == c.id)
                    .map(|i| InvoiceSummary {
                        id: i.id.clone(),
                        amount: i.amount,
                        status: i.status,
                    })
                    .collect();
                owned.sort_by(|a, b| a.id.cmp(&b.id));

                CustomerWithInvoices {
                    id: c.id,
                    name: c.name,
                    email: c.email,
                    image_url: c.image_url,
                    invoices: owned,
                }
            })
            .collect())
    }

    async fn customer_rollups(&self, filter: &CustomerFilter) -> Result<Vec<CustomerTableRow>> {
        self.customers_with_invoices(filter)
            .await?
            .into_iter()
            .map(|c| CustomerTableRow::fold(c).map_err(StoreError::from))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn customer(id: &str, name: &str) -> Customer {
        Customer {
            id: id.to_string(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
            image_url: format!("/customers/{id}.png"),
        }
    }

    fn invoice(id: &str, customer_id: &str, day: u32, status: InvoiceStatus) -> Invoice {
        Invoice {
            id: id.to_string(),
            customer_id: customer_id.to_string(),
            amount: 100,
            date: Utc.with_ymd_and_hms(2023, 1, day, 0, 0, 0).unwrap(),
            status,
        }
    }

    #[tokio::test]
    async fn test_latest_breaks_date_ties_by_id() {
        let store = MockDashboardStore::new();
        store.add_customer(customer("c1", "Lee Robinson")).await;
        store.add_invoice(invoice("a", "c1", 5, InvoiceStatus::Paid)).await;
        store.add_invoice(invoice("b", "c1", 5, InvoiceStatus::Paid)).await;
        store.add_invoice(invoice("c", "c1", 9, InvoiceStatus::Paid)).await;

        let ids: Vec<String> = store
            .latest_invoices(3)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec!["c", "b", "a"]);
    }

    #[tokio::test]
    async fn test_sum_is_none_without_matching_status() {
        let store = MockDashboardStore::new();
        store.add_customer(customer("c1", "Lee Robinson")).await;
        store.add_invoice(invoice("a", "c1", 1, InvoiceStatus::Paid)).await;

        assert_eq!(
            store
                .sum_amount_by_status(InvoiceStatus::Pending)
                .await
                .unwrap(),
            None
        );
        assert_eq!(
            store.sum_amount_by_status(InvoiceStatus::Paid).await.unwrap(),
            Some(100)
        );
    }

    #[tokio::test]
    async fn test_fail_flag_fails_reads() {
        let store = MockDashboardStore::new();
        store.set_fail(true).await;

        let err = store.count_customers().await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[tokio::test]
    async fn test_overflowing_totals_are_store_errors() {
        let store = MockDashboardStore::new();
        store.add_customer(customer("c1", "Lee Robinson")).await;
        let mut big = invoice("a", "c1", 1, InvoiceStatus::Paid);
        big.amount = i64::MAX;
        store.add_invoice(big).await;
        store.add_invoice(invoice("b", "c1", 2, InvoiceStatus::Paid)).await;

        let err = store
            .sum_amount_by_status(InvoiceStatus::Paid)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));

        let filter = CustomerFilter::from_query("");
        let err = store.customer_rollups(&filter).await.unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }
}
