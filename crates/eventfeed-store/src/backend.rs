//! Storage seam for the event document.
//!
//! A [`DocumentBackend`] moves the whole [`EventDocument`] in and out of
//! durable (or not so durable) storage. It does no locking of its own:
//! [`EventStore`](crate::EventStore) serializes writers. Implementations
//! must publish a new document atomically so that a concurrent `load`
//! sees either the old or the new content, never a mix.

use std::future::Future;

use crate::error::StoreError;
use crate::record::EventDocument;

/// Loads and saves the complete event document.
pub trait DocumentBackend: Send + Sync + 'static {
    /// Read and parse the current document.
    ///
    /// Fails with [`StoreError::NotFound`] when no document exists and
    /// [`StoreError::Corrupt`] when its content cannot be parsed.
    fn load(&self) -> impl Future<Output = Result<EventDocument, StoreError>> + Send;

    /// Replace the stored document with `document`.
    ///
    /// On failure the previously stored document must be left intact.
    fn save(&self, document: &EventDocument)
    -> impl Future<Output = Result<(), StoreError>> + Send;

    /// Human-readable location of the document, for logs and errors.
    fn location(&self) -> String;
}
