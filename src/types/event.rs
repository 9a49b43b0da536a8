//! Login attempt events
//!
//! One `Event` is recorded per submission to `/login`. Events are
//! immutable once built; the store only ever appends or drops them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::utils::time::iso8601;

/// Referrer recorded when the request carries no `Referer` header
pub const DEFAULT_REFERRER: &str = "Direct";

/// Language recorded when the request carries no `Accept-Language` header
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "N/A";

/// A single recorded login attempt
///
/// The JSON keys are the ones already present in existing attempt files,
/// which is why the Rust names differ from the wire names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Server time at ingestion
    #[serde(with = "iso8601")]
    pub timestamp: DateTime<Utc>,

    /// Submitted username
    #[serde(rename = "username", default, skip_serializing_if = "Option::is_none")]
    pub identity: Option<String>,

    /// Submitted password
    #[serde(rename = "password", default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,

    /// Best available client address
    #[serde(rename = "ip", default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,

    #[serde(rename = "userAgent", default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    #[serde(rename = "referer", default = "default_referrer")]
    pub referrer: String,

    #[serde(rename = "acceptLanguage", default = "default_accept_language")]
    pub accept_language: String,
}

fn default_referrer() -> String {
    DEFAULT_REFERRER.to_string()
}

fn default_accept_language() -> String {
    DEFAULT_ACCEPT_LANGUAGE.to_string()
}

impl Event {
    /// Start building an event stamped with the current time
    pub fn builder() -> EventBuilder {
        EventBuilder::new()
    }

    /// One-line human readable summary for the operational log
    pub fn summary(&self) -> String {
        format!(
            "[{}] user={} password={} ip={} agent={} referrer={} language={}",
            crate::utils::time::to_iso8601(&self.timestamp),
            self.identity.as_deref().unwrap_or("-"),
            self.secret.as_deref().unwrap_or("-"),
            self.source_address.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
            self.referrer,
            self.accept_language,
        )
    }
}

/// Builder for [`Event`]
///
/// Empty strings are treated the same as missing values so a blank
/// header never overrides the defaults.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    timestamp: DateTime<Utc>,
    identity: Option<String>,
    secret: Option<String>,
    source_address: Option<String>,
    user_agent: Option<String>,
    referrer: Option<String>,
    accept_language: Option<String>,
}

impl EventBuilder {
    pub fn new() -> Self {
        Self {
            timestamp: Utc::now(),
            identity: None,
            secret: None,
            source_address: None,
            user_agent: None,
            referrer: None,
            accept_language: None,
        }
    }

    pub fn timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn identity(mut self, identity: Option<String>) -> Self {
        self.identity = identity;
        self
    }

    pub fn secret(mut self, secret: Option<String>) -> Self {
        self.secret = secret;
        self
    }

    pub fn source_address(mut self, address: Option<String>) -> Self {
        self.source_address = non_empty(address);
        self
    }

    pub fn user_agent(mut self, user_agent: Option<String>) -> Self {
        self.user_agent = non_empty(user_agent);
        self
    }

    pub fn referrer(mut self, referrer: Option<String>) -> Self {
        self.referrer = non_empty(referrer);
        self
    }

    pub fn accept_language(mut self, accept_language: Option<String>) -> Self {
        self.accept_language = non_empty(accept_language);
        self
    }

    pub fn build(self) -> Event {
        Event {
            timestamp: self.timestamp,
            identity: self.identity,
            secret: self.secret,
            source_address: self.source_address,
            user_agent: self.user_agent,
            referrer: self.referrer.unwrap_or_else(default_referrer),
            accept_language: self.accept_language.unwrap_or_else(default_accept_language),
        }
    }
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_for_missing_headers() {
        let event = Event::builder().build();

        assert_eq!(event.referrer, "Direct");
        assert_eq!(event.accept_language, "N/A");
        assert!(event.user_agent.is_none());
        assert!(event.source_address.is_none());
    }

    #[test]
    fn test_blank_header_falls_back_to_default() {
        let event = Event::builder()
            .referrer(Some("   ".to_string()))
            .accept_language(Some(String::new()))
            .build();

        assert_eq!(event.referrer, "Direct");
        assert_eq!(event.accept_language, "N/A");
    }

    #[test]
    fn test_serializes_with_file_keys() {
        let timestamp = DateTime::parse_from_rfc3339("2024-01-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let event = Event::builder()
            .timestamp(timestamp)
            .identity(Some("alice".to_string()))
            .secret(Some("hunter2".to_string()))
            .source_address(Some("203.0.113.7".to_string()))
            .user_agent(Some("curl/8.0".to_string()))
            .build();

        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(
            value,
            json!({
                "timestamp": "2024-01-01T10:00:00.000Z",
                "username": "alice",
                "password": "hunter2",
                "ip": "203.0.113.7",
                "userAgent": "curl/8.0",
                "referer": "Direct",
                "acceptLanguage": "N/A"
            })
        );
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let event = Event::builder().build();
        let value = serde_json::to_value(&event).unwrap();

        assert!(value.get("username").is_none());
        assert!(value.get("password").is_none());
        assert!(value.get("ip").is_none());
        assert!(value.get("userAgent").is_none());
    }

    #[test]
    fn test_reads_legacy_record_without_optional_keys() {
        let event: Event = serde_json::from_value(json!({
            "timestamp": "2024-05-01T12:34:56.789Z",
            "username": "bob"
        }))
        .unwrap();

        assert_eq!(event.identity.as_deref(), Some("bob"));
        assert_eq!(event.referrer, "Direct");
        assert_eq!(event.accept_language, "N/A");
    }

    #[test]
    fn test_summary_marks_missing_values() {
        let summary = Event::builder().build().summary();
        assert!(summary.contains("user=-"));
        assert!(summary.contains("referrer=Direct"));
    }
}
