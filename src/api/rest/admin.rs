//! Admin endpoint - recent attempts and daily count

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use super::ApiError;
use crate::api::state::AppState;
use crate::event_store::EventStoreError;
use crate::types::Event;
use crate::utils::time::{count_on_day, today_utc};

/// Number of events returned in `recent`
pub const RECENT_LIMIT: usize = 50;

/// Query parameters for GET /admin/logs
#[derive(Debug, Deserialize)]
pub struct LogsParams {
    /// Shared secret
    pub key: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogStats {
    /// Attempts recorded on the current UTC day
    pub today: usize,
}

/// Response for GET /admin/logs
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogsResponse {
    pub total: usize,
    /// Last `RECENT_LIMIT` events, oldest first
    pub recent: Vec<Event>,
    pub stats: LogStats,
}

impl LogsResponse {
    /// Summarize a full collection as of `today`
    pub fn from_events(mut events: Vec<Event>, today: NaiveDate) -> Self {
        let total = events.len();
        let stats = LogStats {
            today: count_on_day(&events, today),
        };
        let recent = events.split_off(total.saturating_sub(RECENT_LIMIT));

        Self {
            total,
            recent,
            stats,
        }
    }

    pub fn empty() -> Self {
        Self {
            total: 0,
            recent: Vec::new(),
            stats: LogStats { today: 0 },
        }
    }
}

/// GET /admin/logs - Recent attempts, gated by the `key` query parameter
///
/// An unreadable log yields an empty result; a log that cannot be decoded
/// is reported as a server error.
pub async fn get_logs(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LogsParams>,
) -> Response {
    if params.key.as_deref() != Some(state.config.admin_key.as_str()) {
        warn!("Rejected admin log request with invalid key");
        return (StatusCode::FORBIDDEN, Json(ApiError::access_denied())).into_response();
    }

    match state.store.read_events().await {
        Ok(events) => Json(LogsResponse::from_events(events, today_utc())).into_response(),
        Err(EventStoreError::Io(e)) => {
            warn!(error = %e, "Attempt log unreadable, returning empty result");
            Json(LogsResponse::empty()).into_response()
        }
        Err(EventStoreError::Json(e)) => {
            error!(error = %e, "Attempt log could not be decoded");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Failed to parse logs")),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};

    fn events_on(raw: &str, count: usize) -> Vec<Event> {
        let timestamp = DateTime::parse_from_rfc3339(raw).unwrap().with_timezone(&Utc);
        (0..count)
            .map(|i| {
                Event::builder()
                    .timestamp(timestamp)
                    .identity(Some(format!("u{}", i)))
                    .build()
            })
            .collect()
    }

    #[test]
    fn test_recent_is_last_fifty_oldest_first() {
        let events = events_on("2024-01-01T12:00:00Z", 75);
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let response = LogsResponse::from_events(events, day);

        assert_eq!(response.total, 75);
        assert_eq!(response.recent.len(), 50);
        assert_eq!(response.recent[0].identity.as_deref(), Some("u25"));
        assert_eq!(response.recent[49].identity.as_deref(), Some("u74"));
        assert_eq!(response.stats.today, 75);
    }

    #[test]
    fn test_short_collection_returned_whole() {
        let events = events_on("2024-01-01T12:00:00Z", 3);
        let other_day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let response = LogsResponse::from_events(events, other_day);

        assert_eq!(response.total, 3);
        assert_eq!(response.recent.len(), 3);
        assert_eq!(response.stats.today, 0);
    }

    #[test]
    fn test_empty_response_shape() {
        let value = serde_json::to_value(LogsResponse::empty()).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"total": 0, "recent": [], "stats": {"today": 0}})
        );
    }
}
