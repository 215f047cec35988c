//! Error types for the event store.
//!
//! A lookup miss is not an error; it is the [`Lookup::UserNotFound`]
//! value. Everything here is a storage failure that aborts the current
//! operation and leaves the backing document untouched.
//!
//! [`Lookup::UserNotFound`]: crate::record::Lookup::UserNotFound

/// Errors that can occur while loading or saving the event document.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing document does not exist.
    #[error("event document not found at {location}")]
    NotFound {
        /// Where the document was expected.
        location: String,
    },

    /// The backing document exists but is not valid JSON, or lacks a
    /// `feeds` array of objects.
    #[error("event document at {location} is corrupt: {source}")]
    Corrupt {
        /// Where the document was read from.
        location: String,
        /// The underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Reading or writing the backing document failed.
    #[error("I/O error on {location}: {source}")]
    Io {
        /// The path being accessed.
        location: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The updated document could not be serialized.
    #[error("failed to encode event document: {0}")]
    Encode(#[source] serde_json::Error),

    /// A detached storage task panicked or was cancelled by runtime
    /// shutdown before reporting back.
    #[error("storage task did not complete: {message}")]
    Interrupted {
        /// The join failure.
        message: String,
    },
}

impl StoreError {
    /// Short, stable name of the failure kind, used as a log field.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "storage_not_found",
            Self::Corrupt { .. } => "storage_corrupt",
            Self::Io { .. } => "storage_io",
            Self::Encode(_) => "storage_encode",
            Self::Interrupted { .. } => "storage_interrupted",
        }
    }
}
