//! In-process backend.
//!
//! Holds the document as raw JSON text so that a missing or corrupt
//! document behaves exactly like it does on disk. Useful for tests and
//! for ephemeral runs where nothing needs to survive a restart.

use tokio::sync::RwLock;

use crate::backend::DocumentBackend;
use crate::error::StoreError;
use crate::record::EventDocument;

const LOCATION: &str = "memory";

/// Keeps the serialized event document in memory.
#[derive(Debug)]
pub struct MemoryBackend {
    raw: RwLock<Option<String>>,
}

impl MemoryBackend {
    /// Start with an empty `{"feeds": []}` document.
    pub fn new() -> Self {
        Self::from_raw(r#"{"feeds":[]}"#)
    }

    /// Start with no document at all; every load fails with `NotFound`.
    pub fn missing() -> Self {
        Self {
            raw: RwLock::new(None),
        }
    }

    /// Start with arbitrary content, which need not be valid.
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: RwLock::new(Some(raw.into())),
        }
    }

    /// Current raw content, if any.
    pub async fn raw(&self) -> Option<String> {
        self.raw.read().await.clone()
    }
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentBackend for MemoryBackend {
    async fn load(&self) -> Result<EventDocument, StoreError> {
        let guard = self.raw.read().await;
        let raw = guard.as_deref().ok_or_else(|| StoreError::NotFound {
            location: LOCATION.to_owned(),
        })?;
        serde_json::from_str(raw).map_err(|source| StoreError::Corrupt {
            location: LOCATION.to_owned(),
            source,
        })
    }

    async fn save(&self, document: &EventDocument) -> Result<(), StoreError> {
        let encoded = serde_json::to_string(document).map_err(StoreError::Encode)?;
        *self.raw.write().await = Some(encoded);
        Ok(())
    }

    fn location(&self) -> String {
        LOCATION.to_owned()
    }
}
