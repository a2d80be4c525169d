//! Invoice dashboard query layer.
//!
//! Answers dashboard reads over a relational store of customers and invoices:
//! revenue series, latest invoices, summary cards, filtered/paginated invoice
//! search, customer rollups and single-invoice lookup.

pub mod config;
pub mod handlers;
pub mod model;
pub mod query;
pub mod services;
pub mod storage;
pub mod utils;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
