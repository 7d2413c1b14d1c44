//! Notes store event types

use serde::{Deserialize, Serialize};

/// What happened to the notes directory
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteEventKind {
    /// The set of notes may have changed; listeners should re-list
    DirectoryChanged,
    /// A note was handed to the editor for presentation
    Opened,
}

/// A notification emitted by the notes store
///
/// Must be Clone for `tokio::sync::broadcast`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteEvent {
    pub kind: NoteEventKind,
    /// Filename of the note involved, when there is a single one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// ISO 8601 timestamp
    pub timestamp: String,
}

impl NoteEvent {
    fn new(kind: NoteEventKind, filename: Option<String>) -> Self {
        Self {
            kind,
            filename,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn directory_changed() -> Self {
        Self::new(NoteEventKind::DirectoryChanged, None)
    }

    pub fn opened(filename: impl Into<String>) -> Self {
        Self::new(NoteEventKind::Opened, Some(filename.into()))
    }
}

/// Sink for store notifications.
///
/// Emitting must never block or fail: it is called from watch callbacks on
/// foreign threads as well as from store operations.
pub trait EventEmitter: Send + Sync {
    fn emit(&self, event: NoteEvent);
}
