//! JSON file backend.
//!
//! The document lives in a single file. Saves never truncate that file in
//! place: the new content goes to a uniquely named sibling, is flushed to
//! disk, and is then renamed over the target. A reader therefore sees
//! either the previous document or the new one. A failed save removes its
//! temporary file and leaves the target untouched.
//!
//! The write, flush and rename run as one job on the blocking pool. Once
//! started, that job finishes even if the caller stops waiting, so a
//! temporary file is always either published or removed.

use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use uuid::Uuid;

use crate::backend::DocumentBackend;
use crate::error::StoreError;
use crate::record::EventDocument;

/// Stores the event document as JSON at a fixed path.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    /// Create a backend for the document at `path`.
    ///
    /// Nothing is read or created until the first operation.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write an empty `{"feeds": []}` document if none exists yet.
    ///
    /// Returns `true` when a document was created. Intended for process
    /// startup; the store operations themselves never create the file.
    pub async fn create_if_missing(&self) -> Result<bool, StoreError> {
        let exists = tokio::fs::try_exists(&self.path)
            .await
            .map_err(|source| self.io_error(source))?;
        if exists {
            return Ok(false);
        }

        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        self.save(&EventDocument::default()).await?;
        info!(path = %self.path.display(), "Created empty event document");
        Ok(true)
    }

    /// Sibling path for an in-flight write, unique per call.
    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map_or_else(|| "events".into(), |n| n.to_string_lossy().into_owned());
        self.path
            .with_file_name(format!(".{name}.{}.tmp", Uuid::new_v4().simple()))
    }

    fn io_error(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            location: self.location(),
            source,
        }
    }
}

impl DocumentBackend for JsonFileBackend {
    async fn load(&self) -> Result<EventDocument, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound {
                    location: self.location(),
                });
            }
            Err(source) => return Err(self.io_error(source)),
        };

        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            location: self.location(),
            source,
        })
    }

    async fn save(&self, document: &EventDocument) -> Result<(), StoreError> {
        let payload = serde_json::to_vec(document).map_err(StoreError::Encode)?;
        let temp_path = self.temp_path();
        let target = self.path.clone();

        tokio::task::spawn_blocking(move || publish(&temp_path, &target, &payload))
            .await
            .map_err(|e| StoreError::Interrupted {
                message: e.to_string(),
            })?
            .map_err(|source| self.io_error(source))
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

/// Write `payload` next to `target` and rename it into place.
fn publish(temp_path: &Path, target: &Path, payload: &[u8]) -> std::io::Result<()> {
    let published =
        write_synced(temp_path, payload).and_then(|()| std::fs::rename(temp_path, target));
    if let Err(e) = published {
        discard(temp_path);
        return Err(e);
    }
    sync_parent(target);
    Ok(())
}

/// Create `path`, write `payload`, and flush it to disk.
fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

/// Best-effort removal of a temporary file after a failed save.
fn discard(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "Failed to remove temporary document");
    }
}

/// Flush the directory entry created by the rename.
///
/// The document is already in place when this runs, so a failure is
/// logged rather than reported as a failed save.
#[cfg(unix)]
fn sync_parent(target: &Path) {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if let Err(e) = std::fs::File::open(dir).and_then(|handle| handle.sync_all()) {
        warn!(path = %dir.display(), error = %e, "Failed to sync document directory");
    }
}

#[cfg(not(unix))]
const fn sync_parent(_target: &Path) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temp_path_is_hidden_sibling() {
        let backend = JsonFileBackend::new("/var/lib/eventfeed/data.json");
        let temp = backend.temp_path();
        assert_eq!(temp.parent(), Some(Path::new("/var/lib/eventfeed")));
        let name = temp
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        assert!(name.starts_with(".data.json."));
        assert!(name.ends_with(".tmp"));
    }

    #[test]
    fn temp_paths_are_unique() {
        let backend = JsonFileBackend::new("data.json");
        assert_ne!(backend.temp_path(), backend.temp_path());
    }

    #[test]
    fn failed_rename_removes_temp_file() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let temp = dir.path().join(".data.json.pending.tmp");
        // The target is a non-empty directory, so the rename fails.
        let target = dir.path().join("occupied");
        assert!(std::fs::create_dir_all(target.join("child")).is_ok());

        assert!(publish(&temp, &target, b"{\"feeds\":[]}").is_err());
        assert!(!temp.exists());
        assert!(target.is_dir());
    }

    #[test]
    fn publish_replaces_target() {
        let Ok(dir) = tempfile::TempDir::new() else {
            return;
        };
        let target = dir.path().join("data.json");
        assert!(std::fs::write(&target, "old").is_ok());
        let temp = JsonFileBackend::new(&target).temp_path();

        assert!(publish(&temp, &target, b"new").is_ok());
        assert_eq!(std::fs::read_to_string(&target).ok().as_deref(), Some("new"));
        assert!(!temp.exists());
    }
}
