//! Shared fixtures for the SQL store integration tests.
//!
//! The dataset is generated deterministically: pairs of invoices share an
//! issue date, two invoices carry the amount 666, one carries 0, and customer
//! names contain LIKE metacharacters (`%`, `_`) and mixed case.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use invoice_dashboard::model::{Customer, Invoice, InvoiceStatus, InvoiceWithCustomer, Revenue};
use invoice_dashboard::query::InvoiceFilter;
use invoice_dashboard::storage::{DashboardStore, SqliteDashboardStore};

pub const INVOICE_COUNT: usize = 23;

pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .expect("valid fixture date")
}

pub fn customers() -> Vec<Customer> {
    [
        ("acme", "Acme Industries", "ap@acme.example"),
        ("abc", "ABC Holdings", "finance@abcholdings.example"),
        ("pct", "Percent 100% Co", "billing@percent.example"),
        ("under", "Under_score Ltd", "under_score@ledger.example"),
        ("zed", "Zed Zimmerman", "zed@zimmerman.example"),
        ("bob", "bob lowercase", "bob@lower.example"),
        ("quiet", "Quiet Quail", "quail@quiet.example"),
    ]
    .into_iter()
    .map(|(id, name, email)| Customer {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        image_url: format!("/customers/{id}.png"),
    })
    .collect()
}

/// Customer with a non-ASCII name, kept out of the generated dataset.
pub fn accented_customer() -> Customer {
    Customer {
        id: "emile".to_string(),
        name: "Émile Zola".to_string(),
        email: "emile@zola.example".to_string(),
        image_url: "/customers/emile.png".to_string(),
    }
}

/// Invoices cycle over every customer except `quiet`, which has none.
pub fn invoices() -> Vec<Invoice> {
    let owners = ["acme", "abc", "pct", "under", "zed", "bob"];

    (0..INVOICE_COUNT)
        .map(|n| {
            let amount = match n {
                4 | 17 => 666,
                9 => 0,
                _ => (n as i64 + 1) * 1234,
            };
            let status = if n % 3 == 0 {
                InvoiceStatus::Pending
            } else {
                InvoiceStatus::Paid
            };
            Invoice {
                id: format!("inv-{n:02}"),
                customer_id: owners[n % owners.len()].to_string(),
                amount,
                date: day(2023, 1 + (n as u32 / 2) % 12, 15),
                status,
            }
        })
        .collect()
}

/// Deliberately not in calendar order; the store must keep insertion order.
pub fn revenue() -> Vec<Revenue> {
    [("Mar", 2200), ("Jan", 2000), ("Feb", 1800), ("Apr", 2500)]
        .into_iter()
        .map(|(month, revenue)| Revenue {
            month: month.to_string(),
            revenue,
        })
        .collect()
}

/// Fresh in-memory SQLite store with the schema applied.
pub async fn empty_store() -> Arc<SqliteDashboardStore> {
    let opts = SqliteConnectOptions::new().filename(":memory:");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(opts)
        .await
        .expect("Failed to open in-memory SQLite");

    let store = SqliteDashboardStore::new(pool);
    store.init_schema().await.expect("Failed to create schema");
    Arc::new(store)
}

/// In-memory SQLite store loaded with the fixture dataset.
pub async fn seeded_store() -> Arc<SqliteDashboardStore> {
    let store = empty_store().await;
    for c in customers() {
        store.insert_customer(&c).await.expect("insert customer");
    }
    for i in invoices() {
        store.insert_invoice(&i).await.expect("insert invoice");
    }
    for r in revenue() {
        store.insert_revenue(&r).await.expect("insert revenue");
    }
    store
}

/// Fixture invoices joined with their customers, newest first, id
/// descending on equal dates.
pub fn joined_newest_first() -> Vec<InvoiceWithCustomer> {
    let customers: HashMap<String, Customer> =
        customers().into_iter().map(|c| (c.id.clone(), c)).collect();

    let mut rows: Vec<InvoiceWithCustomer> = invoices()
        .into_iter()
        .map(|i| {
            let c = &customers[&i.customer_id];
            InvoiceWithCustomer {
                id: i.id,
                customer_id: i.customer_id,
                amount: i.amount,
                date: i.date,
                status: i.status,
                name: c.name.clone(),
                email: c.email.clone(),
                image_url: c.image_url.clone(),
            }
        })
        .collect();
    rows.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
    rows
}

/// Ids of every fixture invoice matching `query`, in listing order.
pub fn expected_invoice_ids(query: &str) -> Vec<String> {
    let filter = InvoiceFilter::from_query(query);
    joined_newest_first()
        .into_iter()
        .filter(|row| filter.matches(row))
        .map(|row| row.id)
        .collect()
}

pub fn fixture_sum(status: InvoiceStatus) -> i64 {
    invoices()
        .iter()
        .filter(|i| i.status == status)
        .map(|i| i.amount)
        .sum()
}
