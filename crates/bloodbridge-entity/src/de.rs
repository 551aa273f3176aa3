//! Lenient field decoders for backend payloads.
//!
//! The backend is not strict about scalar types: counts sometimes arrive as
//! strings, free-text measurements sometimes as numbers, and dates either as
//! `YYYY-MM-DD` or as full timestamps.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Decode an unsigned count from a number or a numeric string.
pub fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = Value::deserialize(deserializer)?;
    to_u32(&value).ok_or_else(|| serde::de::Error::custom(format!("expected a count, got {value}")))
}

/// Decode an optional unsigned count; blanks and `null` become `None`.
pub fn opt_lenient_u32<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<u32>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(to_u32))
}

/// Decode optional free text that may arrive as a number.
pub fn opt_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Decode an optional calendar date from `YYYY-MM-DD` or an RFC 3339 timestamp.
pub fn opt_date<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<NaiveDate>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(parse_date))
}

/// Decode an optional timestamp; a bare date is taken as midnight UTC.
pub fn opt_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.as_deref().and_then(|s| {
        DateTime::parse_from_rfc3339(s)
            .map(|dt| dt.with_timezone(&Utc))
            .ok()
            .or_else(|| parse_date(s)?.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc()))
    }))
}

fn to_u32(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s.get(..10).unwrap_or(s), "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Probe {
        #[serde(deserialize_with = "lenient_u32")]
        units: u32,
        #[serde(default, deserialize_with = "opt_text")]
        weight: Option<String>,
        #[serde(default, deserialize_with = "opt_date")]
        day: Option<NaiveDate>,
    }

    #[test]
    fn test_string_count_and_numeric_text() {
        let p: Probe =
            serde_json::from_str(r#"{"units":"2","weight":70,"day":"2024-05-10T08:00:00Z"}"#)
                .unwrap();
        assert_eq!(p.units, 2);
        assert_eq!(p.weight.as_deref(), Some("70"));
        assert_eq!(p.day, NaiveDate::from_ymd_opt(2024, 5, 10));
    }

    #[test]
    fn test_negative_count_rejected() {
        assert!(serde_json::from_str::<Probe>(r#"{"units":-1}"#).is_err());
    }

    #[test]
    fn test_missing_optionals() {
        let p: Probe = serde_json::from_str(r#"{"units":1,"day":null}"#).unwrap();
        assert_eq!(p.weight, None);
        assert_eq!(p.day, None);
    }
}
