//! API module for HTTP endpoints
//!
//! This module wires the login, admin, page and health endpoints onto an
//! Axum router backed by the shared event store.

pub mod http;
pub mod pages;
pub mod rest;
pub mod state;

pub use http::create_router;
pub use state::AppState;
