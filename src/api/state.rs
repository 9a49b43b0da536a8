//! Shared application state for HTTP handlers

use std::sync::Arc;
use std::time::Instant;

use crate::config::Config;
use crate::event_store::{AppendHandle, EventStore};

/// State shared by every request handler
pub struct AppState {
    /// Read access for the admin endpoint
    pub store: Arc<EventStore>,

    /// Write path: events are handed to the background writer
    pub appender: AppendHandle,

    pub config: Config,

    /// Process start, for the health endpoint
    pub started_at: Instant,
}

impl AppState {
    pub fn new(store: Arc<EventStore>, appender: AppendHandle, config: Config) -> Self {
        Self {
            store,
            appender,
            config,
            started_at: Instant::now(),
        }
    }

    /// Seconds since the state was created
    pub fn uptime_secs(&self) -> f64 {
        self.started_at.elapsed().as_secs_f64()
    }
}
