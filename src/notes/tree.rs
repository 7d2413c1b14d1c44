//! Sidebar tree rendering for notes
//!
//! The tree is one level deep: the root lists every note, notes have no
//! children. Each row opens its note when activated.

use super::models::Note;
use super::store::NotesStore;
use crate::commands::OPEN_COMMAND;
use anyhow::Result;
use serde::Serialize;

/// Context value attached to note rows, for context-menu bindings
pub const NOTE_CONTEXT: &str = "scratchpad.note";

/// Built-in icon shown next to each note
pub const NOTE_IMAGE: &str = "__builtin.path";

/// A row of the notes tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeItem {
    pub label: String,
    pub identifier: String,
    pub context_value: String,
    pub image: String,
    pub command: String,
}

impl From<&Note> for TreeItem {
    fn from(note: &Note) -> Self {
        Self {
            label: note.name.clone(),
            identifier: note.name.clone(),
            context_value: NOTE_CONTEXT.to_string(),
            image: NOTE_IMAGE.to_string(),
            command: OPEN_COMMAND.to_string(),
        }
    }
}

/// Children of a tree element: all notes for the root, nothing for a note
pub async fn children(store: &NotesStore, element: Option<&Note>) -> Result<Vec<Note>> {
    if element.is_some() {
        return Ok(Vec::new());
    }
    store.list().await
}
