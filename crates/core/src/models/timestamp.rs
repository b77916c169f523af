use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Deserializer, Serializer};

/// Formats the backend emits: SQLite `CURRENT_TIMESTAMP` style, with or
/// without fractional seconds, and the ISO `T` separator variant.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
];

/// Parse a backend timestamp.
///
/// Naive strings carry no zone; they are read as UTC. Strings with an
/// explicit offset (RFC 3339) are honoured as given.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Render an instant in the display timezone, e.g. `2024-05-01 16:30:00`.
pub fn format_in_zone(ts: &DateTime<Utc>, zone: Tz) -> String {
    ts.with_timezone(&zone).format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Short `HH:MM` form used for chart time-axis labels.
pub fn format_time_label(ts: &DateTime<Utc>, zone: Tz) -> String {
    ts.with_timezone(&zone).format("%H:%M").to_string()
}

/// Serde adapter for backend timestamp strings.
pub mod naive_utc {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        parse_timestamp(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognised timestamp: {raw}")))
    }

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.format("%Y-%m-%d %H:%M:%S").to_string())
    }
}
