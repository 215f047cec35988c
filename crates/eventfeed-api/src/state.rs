//! Shared application state for the Events API server.

use eventfeed_store::{DocumentBackend, EventStore, JsonFileBackend};

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`](std::sync::Arc) and injected via Axum's `State`
/// extractor. The store owns the write lock, so every handler sharing
/// this state appends through the same serialization point.
#[derive(Debug)]
pub struct AppState<B = JsonFileBackend> {
    /// The event store all handlers operate on.
    pub store: EventStore<B>,
}

impl<B: DocumentBackend> AppState<B> {
    /// Create application state over `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            store: EventStore::new(backend),
        }
    }
}
