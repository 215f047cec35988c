//! Append and lookup over the event document.
//!
//! Appending is a read-modify-write of the whole document. Every append
//! runs under one exclusive lock owned by the store, so two concurrent
//! appends can never both load the same snapshot and drop each other's
//! record. Lookups do not take the lock; the backend's atomic publish
//! guarantees they see a complete document.
//!
//! Each append runs on its own spawned task. A caller that stops waiting
//! (a dropped request, a timeout) does not interrupt it: the lock stays
//! held until the save has finished and the record is kept.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::backend::DocumentBackend;
use crate::error::StoreError;
use crate::record::{EventDocument, EventRecord, Lookup, NotFoundMarker};

/// Event record operations over a [`DocumentBackend`].
#[derive(Debug)]
pub struct EventStore<B> {
    shared: Arc<Shared<B>>,
}

#[derive(Debug)]
struct Shared<B> {
    backend: B,
    write_lock: Mutex<()>,
}

impl<B: DocumentBackend> EventStore<B> {
    /// Create a store over `backend`.
    pub fn new(backend: B) -> Self {
        Self {
            shared: Arc::new(Shared {
                backend,
                write_lock: Mutex::new(()),
            }),
        }
    }

    /// The underlying backend.
    pub fn backend(&self) -> &B {
        &self.shared.backend
    }

    /// Tag `record` with `"Manipulated": "Yes"` and append it to `feeds`.
    ///
    /// Returns the full document as saved. If loading or saving fails the
    /// stored document is unchanged.
    pub async fn append_event(&self, mut record: EventRecord) -> Result<EventDocument, StoreError> {
        record.mark_manipulated();

        let shared = Arc::clone(&self.shared);
        let task = tokio::spawn(async move { shared.append(record).await });

        task.await
            .unwrap_or_else(|e| {
                Err(StoreError::Interrupted {
                    message: e.to_string(),
                })
            })
            .inspect_err(|e| self.shared.log_failure("append", e))
    }

    /// First record whose `user` field equals `user`, compared exactly.
    ///
    /// A miss is returned as [`Lookup::UserNotFound`], not as an error.
    pub async fn find_event_by_user(&self, user: &str) -> Result<Lookup, StoreError> {
        let document = self
            .shared
            .backend
            .load()
            .await
            .inspect_err(|e| self.shared.log_failure("find", e))?;

        let lookup = document
            .find_by_user(user)
            .cloned()
            .map_or(Lookup::UserNotFound(NotFoundMarker), Lookup::Found);

        debug!(user, found = lookup.is_found(), "Event lookup");
        Ok(lookup)
    }
}

impl<B: DocumentBackend> Shared<B> {
    async fn append(&self, record: EventRecord) -> Result<EventDocument, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut document = self.backend.load().await?;
        document.feeds.push(record);
        self.backend.save(&document).await?;

        debug!(
            location = %self.backend.location(),
            feeds = document.feeds.len(),
            "Event appended"
        );
        Ok(document)
    }

    fn log_failure(&self, operation: &str, e: &StoreError) {
        error!(
            operation,
            location = %self.backend.location(),
            kind = e.kind(),
            error = %e,
            "Event store operation failed"
        );
    }
}
