//! REST API module for HTTP endpoints
//!
//! - `POST /login` - Record a login attempt
//! - `GET /admin/logs` - Recent attempts and daily count (shared key)

pub mod admin;
pub mod login;

use serde::Serialize;

use crate::utils::time::now_iso8601;

/// API error response
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            timestamp: None,
        }
    }

    pub fn access_denied() -> Self {
        Self::new("Access denied")
    }

    /// Generic server error, stamped with the current time
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            timestamp: Some(now_iso8601()),
        }
    }
}
