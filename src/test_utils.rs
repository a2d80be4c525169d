//! Test utilities and fixture data.
//!
//! A small, fixed dataset of customers, invoices and revenue shared by the
//! service and handler tests, plus a helper that loads it into the in-memory
//! store.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};

use crate::model::{Customer, Invoice, InvoiceStatus, Revenue};

pub use crate::storage::mock::MockDashboardStore;

/// Midnight UTC on the given day.
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .expect("valid fixture date")
}

pub fn customer(id: &str, name: &str, email: &str) -> Customer {
    Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        image_url: format!("/customers/{id}.png"),
    }
}

pub fn invoice(
    id: &str,
    customer_id: &str,
    amount: i64,
    date: DateTime<Utc>,
    status: InvoiceStatus,
) -> Invoice {
    Invoice {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        amount,
        date,
        status,
    }
}

/// Six customers; `evil-rabbit` has no invoices.
pub fn customers() -> Vec<Customer> {
    vec![
        customer("delba", "Delba de Oliveira", "delba@oliveira.com"),
        customer("lee", "Lee Robinson", "lee@robinson.com"),
        customer("hector", "Hector Simpson", "hector@simpson.com"),
        customer("steven", "Steven Tey", "steven@tey.com"),
        customer("abc", "Abc Corp", "billing@abc.example"),
        customer("evil-rabbit", "Evil Rabbit", "evil@rabbit.com"),
    ]
}

/// Fourteen invoices spanning three pages.
///
/// Two invoices share the amount 666, two share the date 2023-06-05 and one
/// has a zero amount.
pub fn invoices() -> Vec<Invoice> {
    use InvoiceStatus::{Paid, Pending};

    vec![
        invoice("inv-01", "delba", 15795, day(2022, 12, 6), Pending),
        invoice("inv-02", "delba", 20348, day(2022, 11, 14), Pending),
        invoice("inv-03", "delba", 666, day(2023, 6, 5), Paid),
        invoice("inv-04", "lee", 44800, day(2023, 6, 5), Paid),
        invoice("inv-05", "lee", 34577, day(2023, 8, 19), Pending),
        invoice("inv-06", "lee", 54246, day(2023, 6, 27), Pending),
        invoice("inv-07", "hector", 666, day(2023, 7, 16), Pending),
        invoice("inv-08", "hector", 32545, day(2023, 6, 9), Paid),
        invoice("inv-09", "hector", 1250, day(2023, 6, 17), Paid),
        invoice("inv-10", "steven", 8945, day(2023, 6, 3), Paid),
        invoice("inv-11", "steven", 500, day(2023, 8, 18), Paid),
        invoice("inv-12", "steven", 8546, day(2023, 6, 7), Pending),
        invoice("inv-13", "steven", 0, day(2023, 10, 4), Paid),
        invoice("inv-14", "abc", 1000, day(2022, 10, 29), Paid),
    ]
}

pub fn revenue() -> Vec<Revenue> {
    [
        ("Jan", 2000),
        ("Feb", 1800),
        ("Mar", 2200),
        ("Apr", 2500),
        ("May", 2300),
        ("Jun", 3200),
        ("Jul", 3500),
        ("Aug", 3700),
        ("Sep", 2500),
        ("Oct", 2800),
        ("Nov", 3000),
        ("Dec", 4800),
    ]
    .into_iter()
    .map(|(month, revenue)| Revenue {
        month: month.to_string(),
        revenue,
    })
    .collect()
}

/// In-memory store loaded with the fixture dataset.
pub async fn seeded_mock_store() -> Arc<MockDashboardStore> {
    let store = Arc::new(MockDashboardStore::new());
    for c in customers() {
        store.add_customer(c).await;
    }
    for i in invoices() {
        store.add_invoice(i).await;
    }
    for r in revenue() {
        store.add_revenue(r).await;
    }
    store
}
