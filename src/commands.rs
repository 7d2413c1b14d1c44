//! User-invocable scratchpad actions
//!
//! Binds the shell's commands to the notes store: prompting for a title,
//! picking a note from a palette, and passing the current selection through
//! to remove/open.

use crate::events::EventEmitter;
use crate::host::{EditorPort, LocalFileSystem, MessageLevel, TerminalEditor};
use crate::notes::{Note, NotesStore, PendingOpen, RemoveOutcome};
use crate::Config;
use anyhow::Result;
use std::sync::Arc;

pub const ADD_COMMAND: &str = "scratchpad.add";
pub const REMOVE_COMMAND: &str = "scratchpad.remove";
pub const OPEN_COMMAND: &str = "scratchpad.open";
pub const SEARCH_COMMAND: &str = "scratchpad.search";

/// Prompt shown by the input palette when adding a note
pub const ADD_PROMPT: &str = "Enter note name";

/// Placeholder of the search palette
pub const SEARCH_PLACEHOLDER: &str = "Notes Search";

/// Message shown when searching an empty notes directory
pub const NO_NOTES_MESSAGE: &str = "Notes not found.";

/// The scratchpad's command surface over a [`NotesStore`]
pub struct Scratchpad {
    store: NotesStore,
    editor: Arc<dyn EditorPort>,
}

impl Scratchpad {
    pub fn new(store: NotesStore) -> Self {
        let editor = store.editor();
        Self { store, editor }
    }

    /// Wire a scratchpad to the local disk and the terminal
    pub fn local(config: &Config, emitter: Arc<dyn EventEmitter>) -> Self {
        let store = NotesStore::new(
            Arc::new(LocalFileSystem::new()),
            Arc::new(TerminalEditor::new(config.editor_command.clone())),
            config.notes_path(),
        )
        .with_event_emitter(emitter);
        Self::new(store)
    }

    pub fn store(&self) -> &NotesStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut NotesStore {
        &mut self.store
    }

    /// `scratchpad.add`: create a note, asking for its title when none is given.
    ///
    /// A dismissed or empty prompt creates nothing.
    pub async fn add(&self, title: Option<String>) -> Result<Option<PendingOpen>> {
        let title = match title {
            Some(title) => Some(title),
            None => self.editor.show_input(ADD_PROMPT).await,
        };

        match title.filter(|t| !t.is_empty()) {
            Some(title) => self.store.create(&title).await,
            None => {
                tracing::debug!(command = ADD_COMMAND, "Note creation cancelled");
                Ok(None)
            }
        }
    }

    /// `scratchpad.remove`: delete the selected note
    pub async fn remove(&self, selection: Option<&Note>) -> RemoveOutcome {
        tracing::debug!(
            command = REMOVE_COMMAND,
            selection = ?selection.map(|n| &n.name),
            "Remove requested"
        );
        self.store.remove(selection.map(|n| n.name.as_str())).await
    }

    /// `scratchpad.open`: open the selected note
    pub async fn open(&self, selection: Option<&Note>) -> Result<Option<PendingOpen>> {
        self.store.open(selection.map(|n| n.name.as_str())).await
    }

    /// `scratchpad.search`: pick a note from a palette and open it
    pub async fn search(&self) -> Result<Option<PendingOpen>> {
        let notes = self.store.list().await?;
        if notes.is_empty() {
            self.editor
                .show_message(MessageLevel::Info, NO_NOTES_MESSAGE)
                .await;
            return Ok(None);
        }

        let names: Vec<String> = notes.iter().map(|n| n.name.clone()).collect();
        let choice = self.editor.show_choice(&names, SEARCH_PLACEHOLDER).await;

        match choice.and_then(|i| notes.get(i)) {
            Some(note) => self.open(Some(note)).await,
            None => {
                tracing::debug!(command = SEARCH_COMMAND, "Search dismissed");
                Ok(None)
            }
        }
    }
}
