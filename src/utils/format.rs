//! Display formatting for money and dates.
//!
//! Pure functions, total over their input domain.

use chrono::{DateTime, SecondsFormat, Utc};

/// Minor units per major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Format minor currency units as an en-US dollar string, e.g. `$1,234.56`.
///
/// Negative amounts render as `-$1.00`. Every `i64` is accepted, including
/// `i64::MIN`.
pub fn format_currency(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    let per_major = MINOR_UNITS_PER_MAJOR as u64;

    format!(
        "{}${}.{:02}",
        sign,
        group_thousands(abs / per_major),
        abs % per_major
    )
}

/// Convert minor currency units to major units (cents to dollars).
pub fn cents_to_major(cents: i64) -> f64 {
    cents as f64 / MINOR_UNITS_PER_MAJOR as f64
}

/// Canonical ISO-8601 rendering: UTC, millisecond precision, `Z` suffix.
pub fn to_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
