//! Login Recorder
//!
//! An HTTP service that records every login-form submission as an event in
//! a bounded, file-backed log and exposes the recent events behind a shared
//! key.
//!
//! # Features
//!
//! - **Bounded log**: a single JSON array capped at 1000 events, oldest dropped first
//! - **No lost updates**: appends are serialized through one writer
//! - **Non-blocking ingestion**: responses never wait for the file write
//! - **Crash-safe writes**: temp file + rename on every rewrite
//!
//! # Modules
//!
//! - `types`: The `Event` record
//! - `event_store`: Persisted log and its background writer
//! - `api`: Axum router and handlers
//! - `config`: Environment-driven settings
//! - `telemetry`: Tracing subscriber setup
//! - `utils`: Timestamps and atomic file writes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use login_recorder::{create_router, AppState, AppendQueue, Config, EventStore};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::from_env()?;
//! let store = Arc::new(EventStore::open(config.store_config()).await?);
//! let queue = AppendQueue::spawn(Arc::clone(&store));
//! let app = create_router(Arc::new(AppState::new(store, queue.handle(), config)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! queue.shutdown().await;
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod event_store;
pub mod telemetry;
pub mod types;
pub mod utils;

// Re-export commonly used items at crate root
pub use api::{create_router, AppState};
pub use config::{Config, ConfigError, LoginDelay};
pub use event_store::{
    AppendHandle, AppendQueue, EventStore, EventStoreConfig, EventStoreError, EventStoreResult,
};
pub use types::{Event, EventBuilder};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
