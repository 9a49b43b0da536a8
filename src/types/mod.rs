//! Data types for the login recorder
//!
//! This module contains the records persisted by the event store.

mod event;

pub use event::{Event, EventBuilder, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_REFERRER};
