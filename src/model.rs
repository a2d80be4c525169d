//! Domain entities and the view shapes returned by the query layer.
//!
//! Amounts are integer minor currency units (cents) unless a field says
//! otherwise. Entities mirror the persisted tables; view types are computed
//! per read and never stored.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Every status, in display order.
    pub const ALL: [InvoiceStatus; 2] = [InvoiceStatus::Pending, InvoiceStatus::Paid];

    /// Value as persisted in the `status` column.
    pub const fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A status string outside the two-value enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for InvoiceStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(InvoiceStatus::Pending),
            "paid" => Ok(InvoiceStatus::Paid),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

// ============================================================================
// Persisted entities
// ============================================================================

/// A customer row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// An invoice row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub customer_id: String,
    /// Minor currency units.
    pub amount: i64,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
}

/// A point of the pre-aggregated revenue series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Revenue {
    pub month: String,
    pub revenue: i64,
}

// ============================================================================
// Store records (raw rows handed back by the store facade)
// ============================================================================

/// Invoice joined with its owning customer's display fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceWithCustomer {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub date: DateTime<Utc>,
    pub status: InvoiceStatus,
    pub name: String,
    pub email: String,
    pub image_url: String,
}

/// Invoice fields needed by the edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceRecord {
    pub id: String,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// The slice of an invoice a customer rollup folds over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceSummary {
    pub id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// A customer with its complete invoice set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerWithInvoices {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub invoices: Vec<InvoiceSummary>,
}

// ============================================================================
// View types
// ============================================================================

/// Latest-invoices widget row, amount already formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub image_url: String,
    pub email: String,
    pub amount: String,
}

/// Dashboard summary cards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardData {
    pub number_of_customers: u64,
    pub number_of_invoices: u64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

/// Row of the filtered invoice table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceTableRow {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// ISO-8601, millisecond precision, UTC.
    pub date: String,
    /// Minor currency units.
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// Invoice as loaded into the edit form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    /// Major currency units.
    pub amount: f64,
    pub status: InvoiceStatus,
}

/// Customer id/name pair for select inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

/// Row of the customer table with per-customer rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerTableRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: u64,
    /// Minor currency units.
    pub total_pending: i64,
    /// Minor currency units.
    pub total_paid: i64,
}

/// A per-customer total that does not fit in `i64`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invoice totals overflow for customer {0}")]
pub struct TotalOverflow(pub String);

impl CustomerTableRow {
    /// Fold a customer's invoice set into count and per-status totals.
    pub fn fold(customer: CustomerWithInvoices) -> Result<Self, TotalOverflow> {
        let mut total_pending: i64 = 0;
        let mut total_paid: i64 = 0;
        for invoice in &customer.invoices {
            let total = match invoice.status {
                InvoiceStatus::Pending => &mut total_pending,
                InvoiceStatus::Paid => &mut total_paid,
            };
            *total = total
                .checked_add(invoice.amount)
                .ok_or_else(|| TotalOverflow(customer.id.clone()))?;
        }

        Ok(Self {
            total_invoices: customer.invoices.len() as u64,
            id: customer.id,
            name: customer.name,
            email: customer.email,
            image_url: customer.image_url,
            total_pending,
            total_paid,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: &str, amount: i64, status: InvoiceStatus) -> InvoiceSummary {
        InvoiceSummary {
            id: id.to_string(),
            amount,
            status,
        }
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in InvoiceStatus::ALL {
            assert_eq!(status.as_str().parse::<InvoiceStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_rejects_unknown_value() {
        let err = "overdue".parse::<InvoiceStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("overdue".to_string()));
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let json = serde_json::to_string(&InvoiceStatus::Pending).unwrap();
        assert_eq!(json, "\"pending\"");
    }

    #[test]
    fn test_fold_splits_totals_by_status() {
        let row = CustomerTableRow::fold(CustomerWithInvoices {
            id: "c1".to_string(),
            name: "Lee Robinson".to_string(),
            email: "lee@robinson.com".to_string(),
            image_url: "/customers/lee-robinson.png".to_string(),
            invoices: vec![
                summary("i1", 1500, InvoiceStatus::Pending),
                summary("i2", 2000, InvoiceStatus::Paid),
                summary("i3", 250, InvoiceStatus::Pending),
            ],
        })
        .unwrap();

        assert_eq!(row.total_invoices, 3);
        assert_eq!(row.total_pending, 1750);
        assert_eq!(row.total_paid, 2000);
    }

    #[test]
    fn test_fold_customer_without_invoices() {
        let row = CustomerTableRow::fold(CustomerWithInvoices {
            id: "c2".to_string(),
            name: "Amy Burns".to_string(),
            email: "amy@burns.com".to_string(),
            image_url: "/customers/amy-burns.png".to_string(),
            invoices: vec![],
        })
        .unwrap();

        assert_eq!(row.total_invoices, 0);
        assert_eq!(row.total_pending, 0);
        assert_eq!(row.total_paid, 0);
    }

    #[test]
    fn test_fold_overflow_is_an_error() {
        let err = CustomerTableRow::fold(CustomerWithInvoices {
            id: "c3".to_string(),
            name: "Steven Tey".to_string(),
            email: "steven@tey.com".to_string(),
            image_url: "/customers/steven-tey.png".to_string(),
            invoices: vec![
                summary("i1", i64::MAX, InvoiceStatus::Paid),
                summary("i2", 1, InvoiceStatus::Paid),
            ],
        })
        .unwrap_err();

        assert_eq!(err, TotalOverflow("c3".to_string()));
    }

    #[test]
    fn test_revenue_serializes_month_and_amount() {
        let json = serde_json::to_value(Revenue {
            month: "Jan".to_string(),
            revenue: 2000,
        })
        .unwrap();

        assert_eq!(json, serde_json::json!({ "month": "Jan", "revenue": 2000 }));
    }
}
