//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building,
//! plus the DDL each backend runs on `init_schema`.

use sea_query::Iden;

/// Customers table schema.
#[derive(Iden)]
pub enum Customers {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "email"]
    Email,
    #[iden = "image_url"]
    ImageUrl,
}

/// Invoices table schema.
#[derive(Iden)]
pub enum Invoices {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "customer_id"]
    CustomerId,
    /// Minor currency units.
    #[iden = "amount"]
    Amount,
    /// ISO-8601 text in any format `parse_store_date` accepts; order by
    /// `SqlDatabase::date_sort_key`, not the raw text.
    #[iden = "date"]
    Date,
    #[iden = "status"]
    Status,
}

/// Pre-aggregated revenue table schema.
#[derive(Iden)]
pub enum Revenue {
    Table,
    #[iden = "month"]
    Month,
    #[iden = "revenue"]
    Revenue,
}

/// Result column aliases for aggregate expressions.
#[derive(Iden)]
pub enum Aggregates {
    #[iden = "count"]
    Count,
    #[iden = "total"]
    Total,
    #[iden = "total_invoices"]
    TotalInvoices,
    #[iden = "total_pending"]
    TotalPending,
    #[iden = "total_paid"]
    TotalPaid,
}

/// SQLite DDL, executed in order.
pub const SQLITE_SCHEMA: &[&str] = &[
    "PRAGMA foreign_keys = ON",
    "CREATE TABLE IF NOT EXISTS customers (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        image_url TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY,
        customer_id TEXT NOT NULL REFERENCES customers(id),
        amount INTEGER NOT NULL CHECK (amount >= 0),
        date TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pending', 'paid'))
    )",
    "CREATE INDEX IF NOT EXISTS idx_invoices_customer ON invoices(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices(date)",
    "CREATE TABLE IF NOT EXISTS revenue (
        month TEXT NOT NULL,
        revenue INTEGER NOT NULL
    )",
];

/// PostgreSQL DDL, executed in order.
pub const POSTGRES_SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS customers (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT NOT NULL,
        image_url TEXT NOT NULL
    )",
    "CREATE TABLE IF NOT EXISTS invoices (
        id TEXT PRIMARY KEY,
        customer_id TEXT NOT NULL REFERENCES customers(id),
        amount BIGINT NOT NULL CHECK (amount >= 0),
        date TEXT NOT NULL,
        status TEXT NOT NULL CHECK (status IN ('pending', 'paid'))
    )",
    "CREATE INDEX IF NOT EXISTS idx_invoices_customer ON invoices(customer_id)",
    "CREATE INDEX IF NOT EXISTS idx_invoices_date ON invoices(date)",
    "CREATE TABLE IF NOT EXISTS revenue (
        month TEXT NOT NULL,
        revenue BIGINT NOT NULL
    )",
];
