//! Free-text search predicates.
//!
//! An invoice search term matches when ANY clause holds:
//! - customer name contains the term (case-insensitive)
//! - customer email contains the term (case-insensitive)
//! - invoice status contains the term (case-insensitive)
//! - invoice amount equals the term parsed as a number
//!
//! A term that is not a number only loses the amount clause; it is never
//! treated as zero.
//!
//! Case folding is ASCII-only, as SQLite's `LOWER()` is. Exact case always
//! matches and ASCII letters match in any case. PostgreSQL also folds
//! non-ASCII letters through `ILIKE`.

use crate::model::{Customer, InvoiceWithCustomer};

/// Escape character used in generated LIKE patterns.
pub const LIKE_ESCAPE: char = '!';

/// Search predicate over invoices joined with their customers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceFilter {
    term: String,
    amount: Option<i64>,
}

impl InvoiceFilter {
    /// Build the predicate for a raw search string.
    pub fn from_query(query: &str) -> Self {
        Self {
            term: query.to_ascii_lowercase(),
            amount: parse_amount(query),
        }
    }

    /// ASCII-lowercased search term used by the substring clauses.
    pub fn term(&self) -> &str {
        &self.term
    }

    /// Amount for the equality clause, if the term is numeric.
    pub fn amount(&self) -> Option<i64> {
        self.amount
    }

    /// `%term%` with LIKE metacharacters escaped by [`LIKE_ESCAPE`].
    pub fn like_pattern(&self) -> String {
        contains_pattern(&self.term)
    }

    /// Evaluate the predicate against an already-joined row.
    pub fn matches(&self, row: &InvoiceWithCustomer) -> bool {
        row.name.to_ascii_lowercase().contains(&self.term)
            || row.email.to_ascii_lowercase().contains(&self.term)
            || row.status.as_str().contains(&self.term)
            || self.amount == Some(row.amount)
    }
}

/// Search predicate over customers: name or email substring, case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerFilter {
    term: String,
}

impl CustomerFilter {
    pub fn from_query(query: &str) -> Self {
        Self {
            term: query.to_ascii_lowercase(),
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn like_pattern(&self) -> String {
        contains_pattern(&self.term)
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        customer.name.to_ascii_lowercase().contains(&self.term)
            || customer.email.to_ascii_lowercase().contains(&self.term)
    }
}

/// Parse a search term as an exact integer amount.
///
/// Accepts anything that reads as a finite, integral number within `i64`
/// range (`"666"`, `" 42 "`, `"1e3"`). Empty input, fractional values and
/// non-numbers yield `None`.
pub fn parse_amount(query: &str) -> Option<i64> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }

    let value = trimmed.parse::<f64>().ok()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for ch in term.chars() {
        if ch == '%' || ch == '_' || ch == LIKE_ESCAPE {
            pattern.push(LIKE_ESCAPE);
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::model::InvoiceStatus;

    fn row(name: &str, email: &str, amount: i64, status: InvoiceStatus) -> InvoiceWithCustomer {
        InvoiceWithCustomer {
            id: "inv-1".to_string(),
            customer_id: "cust-1".to_string(),
            amount,
            date: Utc.with_ymd_and_hms(2023, 6, 5, 0, 0, 0).unwrap(),
            status,
            name: name.to_string(),
            email: email.to_string(),
            image_url: "/customers/avatar.png".to_string(),
        }
    }

    #[test]
    fn test_parse_amount_integers() {
        assert_eq!(parse_amount("666"), Some(666));
        assert_eq!(parse_amount(" 42 "), Some(42));
        assert_eq!(parse_amount("-5"), Some(-5));
        assert_eq!(parse_amount("1e3"), Some(1000));
        assert_eq!(parse_amount("12.0"), Some(12));
    }

    #[test]
    fn test_parse_amount_rejects_non_numbers() {
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
        assert_eq!(parse_amount("   "), None);
        assert_eq!(parse_amount("12.5"), None);
        assert_eq!(parse_amount("inf"), None);
        assert_eq!(parse_amount("NaN"), None);
        assert_eq!(parse_amount("1e30"), None);
    }

    #[test]
    fn test_non_numeric_term_never_matches_by_amount() {
        let filter = InvoiceFilter::from_query("abc");
        assert_eq!(filter.amount(), None);
        // Zero amount must not match a non-numeric term
        assert!(!filter.matches(&row("Delba", "delba@oliveira.com", 0, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_non_numeric_term_still_matches_by_name() {
        let filter = InvoiceFilter::from_query("ABC");
        assert!(filter.matches(&row("Abc Corp", "x@y.com", 100, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_numeric_term_matches_exact_amount_only() {
        let filter = InvoiceFilter::from_query("666");
        assert!(filter.matches(&row("Lee", "lee@robinson.com", 666, InvoiceStatus::Paid)));
        assert!(!filter.matches(&row("Lee", "lee@robinson.com", 6660, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_status_clause_is_substring() {
        let filter = InvoiceFilter::from_query("PEND");
        assert!(filter.matches(&row("Lee", "lee@robinson.com", 1, InvoiceStatus::Pending)));
        assert!(!filter.matches(&row("Lee", "lee@robinson.com", 1, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_email_clause_case_insensitive() {
        let filter = InvoiceFilter::from_query("ROBINSON.COM");
        assert!(filter.matches(&row("Lee", "lee@robinson.com", 1, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_empty_term_matches_everything() {
        let filter = InvoiceFilter::from_query("");
        assert!(filter.matches(&row("Lee", "lee@robinson.com", 1, InvoiceStatus::Paid)));
    }

    #[test]
    fn test_like_pattern_escapes_metacharacters() {
        let filter = InvoiceFilter::from_query("50%_off!");
        assert_eq!(filter.like_pattern(), "%50!%!_off!!%");
    }

    #[test]
    fn test_customer_filter_name_or_email() {
        let customer = Customer {
            id: "c1".to_string(),
            name: "Evil Rabbit".to_string(),
            email: "evil@rabbit.com".to_string(),
            image_url: "/customers/evil-rabbit.png".to_string(),
        };
        assert!(CustomerFilter::from_query("evil").matches(&customer));
        assert!(CustomerFilter::from_query("RABBIT.COM").matches(&customer));
        assert!(!CustomerFilter::from_query("pending").matches(&customer));
    }

    #[test]
    fn test_non_ascii_name_matches_exact_case_and_ascii_case() {
        let emile = row("Émile Zola", "emile@zola.example", 1, InvoiceStatus::Paid);

        assert!(InvoiceFilter::from_query("Émile").matches(&emile));
        assert!(InvoiceFilter::from_query("ÉMILE ZOLA").matches(&emile));
        assert_eq!(InvoiceFilter::from_query("ÉMILE").term(), "Émile");
    }
}
