//! Timestamp helpers for audit entries and on-disk file names.

use chrono::{DateTime, Utc};

/// Represents a timestamp that can be serialized/deserialized.
pub type Timestamp = DateTime<Utc>;

/// Returns the current UTC timestamp.
#[must_use]
pub fn now_utc() -> Timestamp {
    Utc::now()
}

/// Formats a timestamp as ISO 8601 with microsecond precision.
///
/// # Examples
///
/// ```
/// use chrono::TimeZone;
/// use evidenceflow::utils::iso_format;
///
/// let ts = chrono::Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 0).unwrap();
/// assert_eq!(iso_format(&ts), "2026-03-01T12:30:00.000000+00:00");
/// ```
#[must_use]
pub fn iso_format(ts: &Timestamp) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.6f+00:00").to_string()
}

/// Returns the current UTC time as an ISO 8601 formatted string.
#[must_use]
pub fn iso_timestamp() -> String {
    iso_format(&now_utc())
}

/// Day key used to partition the audit log (`YYYYMMDD`).
#[must_use]
pub fn day_stamp(ts: &Timestamp) -> String {
    ts.format("%Y%m%d").to_string()
}

/// Second-resolution stamp used in evidence and report file names
/// (`YYYYMMDD_HHMMSS`).
#[must_use]
pub fn file_stamp(ts: &Timestamp) -> String {
    ts.format("%Y%m%d_%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed() -> Timestamp {
        Utc.with_ymd_and_hms(2026, 10, 16, 8, 5, 9).unwrap()
    }

    #[test]
    fn test_day_stamp() {
        assert_eq!(day_stamp(&fixed()), "20261016");
    }

    #[test]
    fn test_file_stamp() {
        assert_eq!(file_stamp(&fixed()), "20261016_080509");
    }

    #[test]
    fn test_iso_timestamp_format() {
        let ts = iso_timestamp();
        assert!(ts.contains('T'));
        assert!(ts.ends_with("+00:00"));
    }
}
