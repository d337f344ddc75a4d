//! ISO timestamp parsing.
//!
//! Backend rows carry RFC 3339 timestamps, but clients also send
//! offset-less values typed into time pickers. Both are accepted here and
//! normalised to UTC.

use chrono::{DateTime, NaiveDateTime, Utc};

use crate::error::{EngineError, EngineResult};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO 8601 timestamp into UTC.
///
/// RFC 3339 values keep their offset and are converted to UTC. Values
/// without an offset are taken to already be UTC.
///
/// # Examples
///
/// ```
/// use workforce_engine::calculation::parse_timestamp;
/// use chrono::{TimeZone, Utc};
///
/// let expected = Utc.with_ymd_and_hms(2026, 3, 2, 6, 30, 0).unwrap();
/// assert_eq!(parse_timestamp("2026-03-02T12:00:00+05:30").unwrap(), expected);
/// assert_eq!(parse_timestamp("2026-03-02T06:30").unwrap(), expected);
/// assert!(parse_timestamp("noon").is_err());
/// ```
pub fn parse_timestamp(value: &str) -> EngineResult<DateTime<Utc>> {
    let trimmed = value.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(parsed.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| EngineError::InvalidTimestamp {
            value: value.to_string(),
            message: "expected an ISO 8601 date-time such as 2026-03-02T09:00:00Z".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_zulu() {
        assert_eq!(
            parse_timestamp("2026-03-02T09:00:00Z").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_parse_fractional_seconds() {
        let ts = parse_timestamp("2026-03-02T09:00:00.250Z").unwrap();
        assert_eq!(ts.timestamp_subsec_millis(), 250);
    }

    #[test]
    fn test_parse_naive_with_space_separator() {
        assert_eq!(
            parse_timestamp(" 2026-03-02 17:45:10 ").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 2, 17, 45, 10).unwrap()
        );
    }

    #[test]
    fn test_negative_offset_normalised() {
        assert_eq!(
            parse_timestamp("2026-03-02T20:00:00-05:00").unwrap(),
            Utc.with_ymd_and_hms(2026, 3, 3, 1, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_date_only_rejected() {
        match parse_timestamp("2026-03-02") {
            Err(EngineError::InvalidTimestamp { value, .. }) => assert_eq!(value, "2026-03-02"),
            other => panic!("Expected InvalidTimestamp, got {:?}", other),
        }
    }
}
