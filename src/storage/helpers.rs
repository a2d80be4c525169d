//! Shared storage helper functions.
//!
//! Decoding of stored values used across storage backend implementations.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::{Result, StoreError};

/// Parse a stored invoice date.
///
/// Accepts RFC 3339 timestamps, `YYYY-MM-DD HH:MM:SS` (SQLite `datetime()`
/// output, read as UTC) and bare `YYYY-MM-DD` dates (midnight UTC).
pub fn parse_store_date(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| StoreError::Decode(format!("invalid invoice date: {raw}")))
}

/// Convert a SQL `COUNT` result to an unsigned count.
pub fn to_count(raw: i64) -> Result<u64> {
    u64::try_from(raw).map_err(|_| StoreError::Decode(format!("negative count: {raw}")))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_parse_bare_date_is_midnight_utc() {
        let parsed = parse_store_date("2022-12-06").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2022, 12, 6, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rfc3339_normalizes_offset() {
        let parsed = parse_store_date("2023-08-19T10:30:00+02:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 8, 19, 8, 30, 0).unwrap());
    }

    #[test]
    fn test_parse_sqlite_datetime() {
        let parsed = parse_store_date("2023-06-05 14:00:00").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2023, 6, 5, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_garbage_is_decode_error() {
        let err = parse_store_date("yesterday").unwrap_err();
        assert!(matches!(err, StoreError::Decode(_)));
    }

    #[test]
    fn test_to_count_rejects_negative() {
        assert_eq!(to_count(13).unwrap(), 13);
        assert!(matches!(to_count(-1), Err(StoreError::Decode(_))));
    }
}
