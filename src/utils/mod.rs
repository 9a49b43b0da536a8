//! Utility functions and helpers
//!
//! This module contains timestamp utilities and atomic file writes.

pub mod atomic;
pub mod time;

pub use atomic::{atomic_write, cleanup_temp_file};
pub use time::{count_on_day, now_iso8601, to_iso8601, today_utc};
