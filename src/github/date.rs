//! GitHub timestamp handling.
//!
//! The API emits UTC timestamps with second precision (`2021-01-19T17:02:11Z`).
//! Decoding is strict: anything else is a decoding error rather than a default.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Timestamp format used by the API and by search qualifiers.
pub const FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Format a timestamp the way the API expects it in search queries.
pub fn format(date: &DateTime<Utc>) -> String {
    date.format(FORMAT).to_string()
}

/// Parse a timestamp in the API format.
pub fn parse(s: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    NaiveDateTime::parse_from_str(s, FORMAT).map(|naive| naive.and_utc())
}

/// Deserialize a required timestamp.
pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", s, e)))
}

/// Deserialize an optional timestamp. `null` and a missing field both map to `None`.
pub fn deserialize_option<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse(&s)
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid date '{}': {}", s, e))),
        None => Ok(None),
    }
}
