//! Strict ISO-8601 timestamp decoding.
//!
//! Replicate timestamps always carry fractional seconds
//! (e.g. `2022-04-26T19:29:04.418669Z`). Decoding is strict: a string that
//! is not ISO-8601 or lacks fractional seconds is a hard decode failure,
//! never substituted with a default.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, de};

fn parse(s: &str) -> Result<DateTime<Utc>, String> {
    let (_, time) = s
        .split_once('T')
        .ok_or_else(|| format!("invalid date: {s}"))?;
    if !time.contains('.') {
        return Err(format!("invalid date (missing fractional seconds): {s}"));
    }

    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid date '{s}': {e}"))
}

/// Deserializes a required timestamp field.
pub(crate) fn required<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse(&s).map_err(de::Error::custom)
}

/// Deserializes an optional timestamp field. `null` and absent both decode
/// to `None`; a present-but-malformed string still fails.
pub(crate) fn optional<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(s) => parse(&s).map(Some).map_err(de::Error::custom),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_fractional_utc() {
        let dt = parse("2022-04-26T19:29:04.418669Z").unwrap();
        assert_eq!(dt.hour(), 19);
        assert_eq!(dt.nanosecond(), 418_669_000);
    }

    #[test]
    fn parses_fractional_with_offset() {
        let dt = parse("2022-01-21T23:18:24.530357+00:00").unwrap();
        assert_eq!(dt.minute(), 18);
    }

    #[test]
    fn rejects_missing_fraction() {
        assert!(parse("2022-04-26T19:29:04Z").is_err());
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("not-a-date").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn rejects_date_only() {
        assert!(parse("2022-04-26").is_err());
    }
}
