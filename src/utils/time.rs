//! Time and timestamp utilities
//!
//! Timestamps are stored the way browsers print them: RFC 3339 in UTC with
//! millisecond precision and a `Z` suffix (`2024-01-01T00:00:00.000Z`).
//! Calendar-day comparisons are done in UTC.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

use crate::types::Event;

/// Format a timestamp as ISO 8601 with milliseconds
pub fn to_iso8601(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current server time as ISO 8601
pub fn now_iso8601() -> String {
    to_iso8601(&Utc::now())
}

/// Today's calendar date in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Count events whose timestamp falls on `day` (UTC)
pub fn count_on_day(events: &[Event], day: NaiveDate) -> usize {
    events
        .iter()
        .filter(|event| event.timestamp.date_naive() == day)
        .count()
}

/// Serde adapter for millisecond-precision ISO 8601 timestamps
pub mod iso8601 {
    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(timestamp: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&super::to_iso8601(timestamp))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|ts| ts.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
