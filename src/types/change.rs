use serde::{Deserialize, Serialize};

/// The kind of mutation a change notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChangeKind {
    Insert,
    Update,
    Delete,
}

/// A notification that a row in a watched collection changed.
///
/// The payload is whatever the feed chose to attach. Consumers must not rely
/// on its shape, ordering, or completeness — the sync core treats every event
/// as a bare "something changed" signal and refetches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeEvent {
    pub collection: String,
    pub kind: ChangeKind,
    pub payload: Option<serde_json::Value>,
}

impl ChangeEvent {
    pub fn new(collection: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            collection: collection.into(),
            kind,
            payload: None,
        }
    }

    pub fn with_payload(
        collection: impl Into<String>,
        kind: ChangeKind,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            collection: collection.into(),
            kind,
            payload: Some(payload),
        }
    }
}
