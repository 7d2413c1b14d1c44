//! Data models for scratchpad notes

use serde::{Deserialize, Serialize};

/// File extension every note carries
pub const NOTE_EXTENSION: &str = ".md";

/// Body written into a freshly created note: a bare top-level heading marker
pub const PLACEHOLDER_CONTENT: &str = "# ";

/// Where the cursor lands when a note is opened (just after the heading marker)
pub const INITIAL_CURSOR: CursorPosition = CursorPosition { row: 2, column: 2 };

/// A markdown note living directly inside the notes directory.
///
/// The filename is the identity; two notes with the same name are the same note.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Note {
    /// Filename including the `.md` extension
    pub name: String,
}

impl Note {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Build the note for an already-slugified title
    pub fn from_slug(slug: &str) -> Self {
        Self {
            name: format!("{}{}", slug, NOTE_EXTENSION),
        }
    }

    /// Filename without the `.md` extension
    pub fn slug(&self) -> &str {
        self.name
            .strip_suffix(NOTE_EXTENSION)
            .unwrap_or(&self.name)
    }
}

/// Check whether a directory entry name looks like a note
pub fn is_note_file(name: &str) -> bool {
    name.ends_with(NOTE_EXTENSION)
}

/// Editor cursor address, in the host editor's own row/column scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CursorPosition {
    pub row: u32,
    pub column: u32,
}
