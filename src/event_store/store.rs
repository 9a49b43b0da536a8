//! Event Store - bounded, file-backed attempt log
//!
//! The whole collection lives in one JSON array that is rewritten on
//! every append. An append is a read-modify-write cycle, so all appends
//! against a store go through a single async mutex; without it two
//! overlapping appends read the same base array and the later write
//! silently drops the earlier event.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::types::Event;
use crate::utils::atomic::{atomic_write, cleanup_temp_file};

/// Maximum number of events kept in the log
pub const DEFAULT_RETENTION_CAP: usize = 1000;

/// Default location of the attempt log
pub const DEFAULT_FILE_NAME: &str = "login_attempts.json";

/// Configuration for the EventStore
#[derive(Debug, Clone)]
pub struct EventStoreConfig {
    /// Path to the JSON array file
    pub file_path: PathBuf,
    /// Oldest events beyond this count are discarded on append
    pub retention_cap: usize,
}

impl Default for EventStoreConfig {
    fn default() -> Self {
        Self {
            file_path: PathBuf::from(DEFAULT_FILE_NAME),
            retention_cap: DEFAULT_RETENTION_CAP,
        }
    }
}

impl EventStoreConfig {
    /// Create config for a custom file path
    pub fn new<P: AsRef<Path>>(file_path: P) -> Self {
        Self {
            file_path: file_path.as_ref().to_path_buf(),
            ..Default::default()
        }
    }

    /// Override the retention cap
    pub fn with_retention_cap(mut self, retention_cap: usize) -> Self {
        self.retention_cap = retention_cap;
        self
    }

    /// Get the log file path
    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

/// Result type for EventStore operations
pub type EventStoreResult<T> = Result<T, EventStoreError>;

/// Errors that can occur in EventStore operations
#[derive(Debug, Error)]
pub enum EventStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Size-bounded, append-only log of login attempts
///
/// Handlers never touch the file directly; everything goes through a
/// shared `Arc<EventStore>` created once at startup.
pub struct EventStore {
    config: EventStoreConfig,
    /// Serializes the read-modify-write cycle of `append_event`
    write_lock: Mutex<()>,
}

impl EventStore {
    /// Create a new EventStore with default config
    pub fn new() -> Self {
        Self::with_config(EventStoreConfig::default())
    }

    /// Create a new EventStore with custom config
    pub fn with_config(config: EventStoreConfig) -> Self {
        Self {
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Open a store, removing any temp file left by an interrupted write
    pub async fn open(config: EventStoreConfig) -> EventStoreResult<Self> {
        if cleanup_temp_file(&config.file_path).await? {
            warn!(
                path = %config.file_path.display(),
                "Removed leftover temp file from an interrupted write"
            );
        }

        let store = Self::with_config(config);
        let existing = store.load_events().await.len();
        info!(
            path = %store.config.file_path.display(),
            events = existing,
            retention_cap = store.config.retention_cap,
            "Event store opened"
        );

        Ok(store)
    }

    /// Get the configuration
    pub fn config(&self) -> &EventStoreConfig {
        &self.config
    }

    /// Append an event, enforcing the retention cap
    ///
    /// Loads the persisted collection (starting fresh if it is missing or
    /// corrupt), pushes `event`, drops the oldest entries beyond the cap
    /// and rewrites the whole file. Returns the resulting length.
    pub async fn append_event(&self, event: Event) -> EventStoreResult<usize> {
        let _guard = self.write_lock.lock().await;

        let mut events = self.load_events().await;
        events.push(event);
        let dropped = truncate_to_cap(&mut events, self.config.retention_cap);

        let content = serde_json::to_vec_pretty(&events)?;
        atomic_write(&self.config.file_path, &content).await?;

        debug!(total = events.len(), dropped, "Appended event");

        Ok(events.len())
    }

    /// Load all events, oldest first
    ///
    /// A missing, unreadable or corrupt file yields an empty collection.
    pub async fn load_events(&self) -> Vec<Event> {
        match self.read_events().await {
            Ok(events) => events,
            Err(EventStoreError::Json(e)) => {
                warn!(
                    path = %self.config.file_path.display(),
                    error = %e,
                    "Attempt log is corrupt, starting from an empty collection"
                );
                Vec::new()
            }
            Err(EventStoreError::Io(e)) => {
                warn!(
                    path = %self.config.file_path.display(),
                    error = %e,
                    "Attempt log is unreadable, starting from an empty collection"
                );
                Vec::new()
            }
        }
    }

    /// Read all events, reporting failures
    ///
    /// A missing or blank file is an empty collection. Any other I/O
    /// failure is `EventStoreError::Io`; undecodable content is
    /// `EventStoreError::Json`.
    pub async fn read_events(&self) -> EventStoreResult<Vec<Event>> {
        let content = match fs::read(&self.config.file_path).await {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        Ok(serde_json::from_slice(&content)?)
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Drop the oldest events so at most `cap` remain; returns how many were dropped
fn truncate_to_cap(events: &mut Vec<Event>, cap: usize) -> usize {
    if events.len() <= cap {
        return 0;
    }
    let excess = events.len() - cap;
    events.drain(..excess);
    excess
}
