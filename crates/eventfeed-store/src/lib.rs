//! Event record store for the eventfeed service.
//!
//! Events are open-ended JSON objects submitted by clients. Each one is
//! tagged with `"Manipulated": "Yes"` and appended to the `feeds` array of a
//! single JSON document:
//!
//! ```json
//! {"feeds": [{"user": "alice", "msg": "hi", "Manipulated": "Yes"}]}
//! ```
//!
//! # Architecture
//!
//! - [`EventRecord`] / [`EventDocument`] -- the data model. Records are a
//!   transparent, key-order-preserving JSON map; no schema is imposed.
//! - [`DocumentBackend`] -- the storage seam. It loads and saves a whole
//!   [`EventDocument`]. [`JsonFileBackend`] persists to disk with an atomic
//!   write-then-rename; [`MemoryBackend`] keeps the document in process.
//! - [`EventStore`] -- the two operations, append and lookup by user.
//!   Appends are serialized behind a single async lock so concurrent
//!   writers never lose records.
//!
//! The backing document is expected to exist before first use (usually
//! as `{"feeds": []}`). The store never creates it on its own; a missing
//! document is reported as [`StoreError::NotFound`].

pub mod backend;
pub mod error;
pub mod event_store;
pub mod file;
pub mod memory;
pub mod record;

// Re-export primary types for convenience.
pub use backend::DocumentBackend;
pub use error::StoreError;
pub use event_store::EventStore;
pub use file::JsonFileBackend;
pub use memory::MemoryBackend;
pub use record::{EventDocument, EventRecord, Lookup, NotFoundMarker};
