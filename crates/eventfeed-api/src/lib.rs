//! Events API server for eventfeed.
//!
//! This crate provides an Axum HTTP server with a single resource:
//!
//! - **`POST /Events`** appends the JSON object in the request body and
//!   returns the whole updated document
//! - **`GET /Events?user=<name>`** returns the first record for that user,
//!   or `{"Error": "UserNotFound"}`
//!
//! # Architecture
//!
//! Handlers are thin: they validate the request, call the shared
//! [`EventStore`](eventfeed_store::EventStore) held in [`AppState`], and
//! map store failures to `500` responses through [`ApiError`]. Malformed
//! requests are rejected with `400` before the store is touched.
//!
//! The router is generic over the storage backend so tests can run it
//! against an in-memory document.

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, shutdown_signal, start_server};
pub use state::AppState;
