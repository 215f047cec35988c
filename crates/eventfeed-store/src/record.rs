//! Data model: event records, the persisted document, and lookup results.

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

/// Key set on every stored record.
pub const MANIPULATED_KEY: &str = "Manipulated";

/// Value forced into [`MANIPULATED_KEY`] on insert.
pub const MANIPULATED_VALUE: &str = "Yes";

/// Key records are looked up by.
pub const USER_KEY: &str = "user";

/// One submitted event: an arbitrary JSON object.
///
/// Serializes transparently as the underlying object. Key order is kept
/// as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventRecord(Map<String, Value>);

impl EventRecord {
    /// Wrap an existing JSON object.
    pub const fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// The record's `user` field, if present and a string.
    pub fn user(&self) -> Option<&str> {
        self.0.get(USER_KEY).and_then(Value::as_str)
    }

    /// Set `"Manipulated": "Yes"`, replacing any value the caller sent.
    ///
    /// An existing key keeps its position; a new one is added last.
    pub fn mark_manipulated(&mut self) {
        self.0.insert(
            MANIPULATED_KEY.to_owned(),
            Value::String(MANIPULATED_VALUE.to_owned()),
        );
    }

    /// Look up a single field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Borrow all fields.
    pub const fn fields(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Unwrap into the underlying JSON object.
    pub fn into_fields(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for EventRecord {
    fn from(fields: Map<String, Value>) -> Self {
        Self(fields)
    }
}

impl TryFrom<Value> for EventRecord {
    type Error = Value;

    /// Accepts only JSON objects; any other value is handed back.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(fields) => Ok(Self(fields)),
            other => Err(other),
        }
    }
}

/// The persisted root object.
///
/// `feeds` is required; a document without it is corrupt. Any other
/// top-level keys are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDocument {
    /// Stored records in insertion order.
    pub feeds: Vec<EventRecord>,
    /// Top-level keys other than `feeds`.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EventDocument {
    /// First record whose `user` equals `user` exactly.
    pub fn find_by_user(&self, user: &str) -> Option<&EventRecord> {
        self.feeds.iter().find(|record| record.user() == Some(user))
    }
}

/// Result of looking a record up by user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Lookup {
    /// The first record with a matching `user`.
    Found(EventRecord),
    /// No record matched.
    UserNotFound(NotFoundMarker),
}

impl Lookup {
    /// Whether a record matched.
    pub const fn is_found(&self) -> bool {
        matches!(self, Self::Found(_))
    }

    /// The matched record, if any.
    pub fn into_record(self) -> Option<EventRecord> {
        match self {
            Self::Found(record) => Some(record),
            Self::UserNotFound(_) => None,
        }
    }
}

/// Lookup miss. Serializes as `{"Error": "UserNotFound"}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotFoundMarker;

impl Serialize for NotFoundMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("Error", "UserNotFound")?;
        map.end()
    }
}
