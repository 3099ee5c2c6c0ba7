//! Serde helpers for API timestamps
//!
//! The API emits naive ISO-8601 timestamps (`2024-03-01T12:30:00.123456`)
//! that are UTC by convention. Offsets are accepted when present.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&value.naive_utc().format("%Y-%m-%dT%H:%M:%S%.f").to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(serde::de::Error::custom)
}

/// Parses either an RFC 3339 timestamp or a naive one read as UTC.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(value) = DateTime::parse_from_rfc3339(raw) {
        return Ok(value.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|e| format!("invalid timestamp {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn parses_naive_and_offset_timestamps() {
        let naive = parse("2024-03-01T12:30:00.123456").unwrap();
        assert_eq!((naive.year(), naive.month(), naive.day()), (2024, 3, 1));
        assert_eq!(naive.hour(), 12);

        let offset = parse("2024-03-01T14:30:00+02:00").unwrap();
        assert_eq!(offset.hour(), 12);

        assert!(parse("yesterday").is_err());
    }
}
