//! Port traits for the host collaborators
//!
//! The notes store never touches the disk or the UI directly: it talks to a
//! [`FileSystemPort`] and an [`EditorPort`] handed to it at construction.
//! Production wiring uses [`super::LocalFileSystem`] and
//! [`super::TerminalEditor`]; tests use the in-memory fakes in
//! [`super::mock`].

use super::error::{EditorError, FsError};
use crate::notes::CursorPosition;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Callback fired for every directory-level change event
pub type ChangeCallback = Arc<dyn Fn() + Send + Sync>;

/// One entry of a directory listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

impl DirEntry {
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: false,
        }
    }

    pub fn dir(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_dir: true,
        }
    }
}

/// A standing directory watch. Closing it stops further callbacks.
pub trait WatchSubscription: Send {
    /// Release the subscription; calling it again has no effect
    fn close(&mut self);
}

/// File-system primitives the notes store consumes.
#[async_trait]
pub trait FileSystemPort: Send + Sync {
    /// Whether anything exists at `path`
    async fn exists(&self, path: &Path) -> bool;

    /// Create a single directory (parents included).
    ///
    /// Returns [`FsError::AlreadyExists`] when the directory is already there.
    async fn mkdir(&self, path: &Path) -> Result<(), FsError>;

    /// Entries directly inside `path`, in listing order
    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError>;

    /// Read a whole file as UTF-8
    async fn read(&self, path: &Path) -> Result<String, FsError>;

    /// Write a whole file, creating or truncating it
    async fn write(&self, path: &Path, contents: &str) -> Result<(), FsError>;

    /// Delete a file
    async fn remove(&self, path: &Path) -> Result<(), FsError>;

    /// Subscribe to create/delete/rename events for entries of `path`.
    ///
    /// The callback may run on a foreign thread and must not block.
    fn watch(
        &self,
        path: &Path,
        on_change: ChangeCallback,
    ) -> Result<Box<dyn WatchSubscription>, FsError>;
}

/// A document the editor has finished opening
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorHandle {
    pub path: PathBuf,
}

impl EditorHandle {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Severity of a user-visible message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Error,
}

/// Editor and palette primitives the notes store and the command layer consume.
#[async_trait]
pub trait EditorPort: Send + Sync {
    /// Open `path`; resolves once the editor is ready for the document
    async fn open_file(&self, path: &Path) -> Result<EditorHandle, EditorError>;

    /// Place the cursor in an opened document
    async fn set_cursor(
        &self,
        handle: &EditorHandle,
        position: CursorPosition,
    ) -> Result<(), EditorError>;

    /// Free-text input palette. `None` means the user dismissed it.
    async fn show_input(&self, prompt: &str) -> Option<String>;

    /// Choice palette over `items`. `None` means the user dismissed it.
    async fn show_choice(&self, items: &[String], placeholder: &str) -> Option<usize>;

    /// One-line message to the user
    async fn show_message(&self, level: MessageLevel, message: &str);
}
