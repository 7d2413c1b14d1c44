//! Test helper factories and mock store builders
//!
//! Provides a `NotesStore` wired to in-memory ports and an event bus, plus
//! small helpers for inspecting the results.
#![allow(dead_code)]

use crate::events::{EventBus, NoteEvent};
use crate::host::mock::{MockEditor, MockFileSystem};
use crate::notes::{Note, NotesStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notes directory used by every mock store
pub const NOTES_DIR: &str = "/workspace/.scratchpad";

/// A store plus handles on the fakes behind it
pub struct TestStore {
    pub store: NotesStore,
    pub fs: Arc<MockFileSystem>,
    pub editor: Arc<MockEditor>,
    pub bus: EventBus,
}

/// Create a store over an empty in-memory workspace
pub fn mock_store() -> TestStore {
    mock_store_with(MockFileSystem::new().with_dir("/workspace"), MockEditor::new())
}

/// Create a store over pre-seeded fakes
pub fn mock_store_with(fs: MockFileSystem, editor: MockEditor) -> TestStore {
    let fs = Arc::new(fs);
    let editor = Arc::new(editor);
    let bus = EventBus::default();
    let store = NotesStore::new(fs.clone(), editor.clone(), NOTES_DIR)
        .with_event_emitter(Arc::new(bus.clone()));
    TestStore {
        store,
        fs,
        editor,
        bus,
    }
}

/// Full path of a note inside the mock notes directory
pub fn note_path(name: &str) -> PathBuf {
    PathBuf::from(NOTES_DIR).join(name)
}

pub fn note_names(notes: &[Note]) -> Vec<String> {
    notes.iter().map(|n| n.name.clone()).collect()
}

/// Everything received so far, without waiting
pub fn drain(rx: &mut broadcast::Receiver<NoteEvent>) -> Vec<NoteEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}
