//! Time and timestamp utilities

use chrono::{DateTime, SecondsFormat, Utc};

/// Current Unix timestamp in seconds
pub fn current_timestamp() -> i64 {
    Utc::now().timestamp()
}

/// Current time as an RFC 3339 string with millisecond precision
pub fn current_iso8601() -> String {
    to_iso8601(Utc::now())
}

/// Format a timestamp the way webhook and status payloads carry it
pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_to_iso8601_uses_z_suffix() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 5).unwrap();
        assert_eq!(to_iso8601(at), "2024-03-01T12:30:05.000Z");
    }

    #[test]
    fn test_current_timestamp_is_recent() {
        // 2023-11-14
        assert!(current_timestamp() > 1_700_000_000);
    }
}
