//! Event Store Module
//!
//! This module owns the persisted attempt log:
//! - `EventStore`: bounded, file-backed collection with serialized appends
//! - `AppendQueue`: background writer that persists events handed off by handlers
//!
//! # Architecture
//!
//! ```text
//! Write Path:
//! ┌──────────┐    ┌──────────────┐    ┌────────────────────┐    ┌──────────────┐
//! │ /login   │───►│ AppendHandle │───►│ writer task        │───►│ append_event │
//! │ handler  │    │ submit()     │    │ (one per process)  │    │ under lock   │
//! └──────────┘    └──────────────┘    └────────────────────┘    └──────────────┘
//!
//! append_event:
//!   read file ─► decode (corrupt ⇒ []) ─► push ─► keep last N ─► write .tmp ─► rename
//!
//! Read Path:
//! ┌──────────────┐    ┌─────────────┐
//! │ /admin/logs  │───►│ read_events │
//! └──────────────┘    └─────────────┘
//! ```

mod queue;
mod store;

pub use queue::{AppendHandle, AppendQueue};
pub use store::{
    EventStore, EventStoreConfig, EventStoreError, EventStoreResult, DEFAULT_FILE_NAME,
    DEFAULT_RETENTION_CAP,
};
