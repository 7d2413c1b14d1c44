//! Notes Store - directory-backed CRUD for scratchpad notes
//!
//! Owns the notes directory path and talks to the disk and the editor only
//! through the injected [`FileSystemPort`] and [`EditorPort`]. Every mutation
//! publishes a [`NoteEvent`] so views can re-list.

use super::models::*;
use super::slug::slugify;
use crate::events::{EventEmitter, NoteEvent};
use crate::host::{EditorPort, FileSystemPort, MessageLevel, WatchSubscription};
use anyhow::{anyhow, Context, Result};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Outcome of [`NotesStore::remove`]. Removal never returns an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// Nothing was selected
    Skipped,
    /// The note file was deleted
    Removed(String),
    /// Deletion failed; carries the message shown to the user
    Failed(String),
}

/// An open request handed to the editor.
///
/// The editor opens the note in a background task and the cursor is placed
/// once the document is ready. Dropping the handle detaches the task; it is
/// never cancelled.
#[derive(Debug)]
pub struct PendingOpen {
    filename: String,
    path: PathBuf,
    task: JoinHandle<Result<()>>,
}

impl PendingOpen {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the open (and cursor placement) has finished, successfully or not
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Wait for the editor to open the note and place the cursor
    pub async fn wait(self) -> Result<()> {
        self.task.await.context("Open task panicked")?
    }
}

/// CRUD façade over a single flat directory of markdown notes
pub struct NotesStore {
    fs: Arc<dyn FileSystemPort>,
    editor: Arc<dyn EditorPort>,
    notes_dir: PathBuf,
    event_emitter: Option<Arc<dyn EventEmitter>>,
    watch: Option<Box<dyn WatchSubscription>>,
}

impl NotesStore {
    /// Create a new NotesStore over `notes_dir`
    pub fn new(
        fs: Arc<dyn FileSystemPort>,
        editor: Arc<dyn EditorPort>,
        notes_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            fs,
            editor,
            notes_dir: notes_dir.into(),
            event_emitter: None,
            watch: None,
        }
    }

    /// Publish store events to `emitter` (builder pattern)
    pub fn with_event_emitter(mut self, emitter: Arc<dyn EventEmitter>) -> Self {
        self.event_emitter = Some(emitter);
        self
    }

    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    pub fn editor(&self) -> Arc<dyn EditorPort> {
        self.editor.clone()
    }

    /// Full path of a note, or `None` if `filename` is not a plain file name
    /// directly inside the notes directory.
    pub fn note_path(&self, filename: &str) -> Option<PathBuf> {
        let mut components = Path::new(filename).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(_)), None) => Some(self.notes_dir.join(filename)),
            _ => None,
        }
    }

    /// Emit an event (no-op if event_emitter is None)
    fn emit(&self, event: NoteEvent) {
        if let Some(emitter) = &self.event_emitter {
            emitter.emit(event);
        }
    }

    /// Create the notes directory if it is missing and return its path.
    ///
    /// A directory that already exists (or appears concurrently) is success.
    pub async fn ensure_directory(&self) -> Result<PathBuf> {
        if !self.fs.exists(&self.notes_dir).await {
            match self.fs.mkdir(&self.notes_dir).await {
                Ok(()) => {
                    tracing::info!(dir = %self.notes_dir.display(), "Created notes directory");
                }
                Err(e) if e.is_already_exists() => {}
                Err(e) => {
                    return Err(e).with_context(|| {
                        format!(
                            "Failed to create notes directory {}",
                            self.notes_dir.display()
                        )
                    })
                }
            }
        }
        Ok(self.notes_dir.clone())
    }

    /// Snapshot of the notes currently in the directory, in listing order.
    ///
    /// Subdirectories and non-markdown entries are skipped.
    pub async fn list(&self) -> Result<Vec<Note>> {
        let dir = self.ensure_directory().await?;
        let entries = self
            .fs
            .list_dir(&dir)
            .await
            .with_context(|| format!("Failed to list notes in {}", dir.display()))?;

        Ok(entries
            .into_iter()
            .filter(|entry| !entry.is_dir && is_note_file(&entry.name))
            .map(|entry| Note::new(entry.name))
            .collect())
    }

    /// Read a note's markdown content
    pub async fn read(&self, filename: &str) -> Result<String> {
        let path = self
            .note_path(filename)
            .ok_or_else(|| anyhow!("Invalid note name: {}", filename))?;
        self.fs
            .read(&path)
            .await
            .with_context(|| format!("Failed to read note {}", filename))
    }

    /// Create a note from a free-text title and open it.
    ///
    /// An empty title is a cancellation: nothing is written and nothing is
    /// emitted. An existing note with the same slug is overwritten.
    pub async fn create(&self, title: &str) -> Result<Option<PendingOpen>> {
        if title.is_empty() {
            tracing::debug!("Empty note title, nothing to create");
            return Ok(None);
        }

        let note = Note::from_slug(&slugify(title));
        let dir = self.ensure_directory().await?;
        let path = dir.join(&note.name);

        self.fs
            .write(&path, PLACEHOLDER_CONTENT)
            .await
            .with_context(|| format!("Failed to write note {}", path.display()))?;

        tracing::info!(note = %note.name, title = %title, "Created note");
        self.emit(NoteEvent::directory_changed());

        self.open(Some(&note.name)).await
    }

    /// Ask the editor to open a note, placing the cursor once it is ready.
    ///
    /// Returns immediately with a [`PendingOpen`]; `None` when no filename was given.
    pub async fn open(&self, filename: Option<&str>) -> Result<Option<PendingOpen>> {
        let Some(filename) = filename.filter(|f| !f.is_empty()) else {
            tracing::debug!("No note selected, nothing to open");
            return Ok(None);
        };

        self.ensure_directory().await?;
        let path = self
            .note_path(filename)
            .ok_or_else(|| anyhow!("Invalid note name: {}", filename))?;

        self.emit(NoteEvent::opened(filename));

        let editor = self.editor.clone();
        let task_path = path.clone();
        let task = tokio::spawn(async move {
            let result = open_at_initial_cursor(editor.as_ref(), &task_path).await;
            if let Err(e) = &result {
                tracing::warn!(path = %task_path.display(), error = %e, "Failed to open note");
            }
            result
        });

        Ok(Some(PendingOpen {
            filename: filename.to_string(),
            path,
            task,
        }))
    }

    /// Delete a note.
    ///
    /// Failures are reported to the user through the editor and returned as
    /// [`RemoveOutcome::Failed`]; they never propagate.
    pub async fn remove(&self, filename: Option<&str>) -> RemoveOutcome {
        let Some(filename) = filename.filter(|f| !f.is_empty()) else {
            tracing::debug!("No note selected, nothing to remove");
            return RemoveOutcome::Skipped;
        };

        let result = match self.note_path(filename) {
            Some(path) => self.fs.remove(&path).await.map_err(|e| e.to_string()),
            None => Err(format!("invalid note name: {}", filename)),
        };

        match result {
            Ok(()) => {
                tracing::info!(note = %filename, "Removed note");
                self.emit(NoteEvent::directory_changed());
                RemoveOutcome::Removed(filename.to_string())
            }
            Err(e) => {
                tracing::warn!(note = %filename, error = %e, "Failed to remove note");
                let message = format!("Unable to remove note: {}", e);
                self.editor
                    .show_message(MessageLevel::Error, &message)
                    .await;
                RemoveOutcome::Failed(message)
            }
        }
    }

    /// Start watching the notes directory.
    ///
    /// Every entry-level change re-emits "directory changed", undebounced.
    /// Calling this while already watching does nothing.
    pub async fn watch(&mut self) -> Result<()> {
        if self.watch.is_some() {
            return Ok(()); // Already watching
        }

        let dir = self.ensure_directory().await?;
        let emitter = self.event_emitter.clone();
        let subscription = self
            .fs
            .watch(
                &dir,
                Arc::new(move || {
                    if let Some(emitter) = &emitter {
                        emitter.emit(NoteEvent::directory_changed());
                    }
                }),
            )
            .with_context(|| format!("Failed to watch {}", dir.display()))?;

        self.watch = Some(subscription);
        tracing::info!(dir = %dir.display(), "Watching notes directory");
        Ok(())
    }

    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }

    /// Release the directory watch, if any. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(mut subscription) = self.watch.take() {
            subscription.close();
            tracing::debug!(dir = %self.notes_dir.display(), "Released notes directory watch");
        }
    }
}

impl Drop for NotesStore {
    fn drop(&mut self) {
        self.dispose();
    }
}

async fn open_at_initial_cursor(editor: &dyn EditorPort, path: &Path) -> Result<()> {
    let handle = editor
        .open_file(path)
        .await
        .with_context(|| format!("Failed to open {}", path.display()))?;
    editor
        .set_cursor(&handle, INITIAL_CURSOR)
        .await
        .with_context(|| format!("Failed to place cursor in {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::NoteEventKind;
    use crate::host::mock::{MockEditor, MockFileSystem};
    use crate::test_helpers::*;

    // ====================================================================
    // Directory & listing
    // ====================================================================

    #[tokio::test]
    async fn test_ensure_directory_is_idempotent() {
        let t = mock_store();

        let first = t.store.ensure_directory().await.unwrap();
        let second = t.store.ensure_directory().await.unwrap();

        assert_eq!(first, Path::new(NOTES_DIR));
        assert_eq!(second, first);
        assert!(t.fs.exists(Path::new(NOTES_DIR)).await);
    }

    #[tokio::test]
    async fn test_list_only_markdown_files() {
        let fs = MockFileSystem::new()
            .with_file(note_path("a.md"), "# a")
            .with_file(note_path("b.md"), "# b")
            .with_file(note_path("c.txt"), "plain")
            .with_dir(note_path("archive.md"))
            .with_file(note_path("archive.md/old.md"), "# old");
        let t = mock_store_with(fs, MockEditor::new());

        let names = note_names(&t.store.list().await.unwrap());

        assert_eq!(names, vec!["a.md", "b.md"]);
    }

    #[tokio::test]
    async fn test_list_creates_missing_directory() {
        let t = mock_store();

        let notes = t.store.list().await.unwrap();

        assert!(notes.is_empty());
        assert!(t.fs.exists(Path::new(NOTES_DIR)).await);
    }

    #[tokio::test]
    async fn test_read_note() {
        let fs = MockFileSystem::new().with_file(note_path("a.md"), "# hello");
        let t = mock_store_with(fs, MockEditor::new());

        assert_eq!(t.store.read("a.md").await.unwrap(), "# hello");
        assert!(t.store.read("missing.md").await.is_err());
        assert!(t.store.read("../a.md").await.is_err());
    }

    // ====================================================================
    // Create
    // ====================================================================

    #[tokio::test]
    async fn test_create_empty_title_is_noop() {
        let t = mock_store();
        let mut rx = t.bus.subscribe();

        let pending = t.store.create("").await.unwrap();

        assert!(pending.is_none());
        assert_eq!(t.fs.file_count(NOTES_DIR), 0);
        assert!(drain(&mut rx).is_empty());
        assert!(t.editor.opened().is_empty());
    }

    #[tokio::test]
    async fn test_create_writes_placeholder_and_opens() {
        let t = mock_store();
        let mut rx = t.bus.subscribe();

        let pending = t.store.create("Todo List").await.unwrap().unwrap();
        assert_eq!(pending.filename(), "todo-list.md");
        assert_eq!(pending.path(), note_path("todo-list.md"));
        pending.wait().await.unwrap();

        assert_eq!(t.fs.file(note_path("todo-list.md")).as_deref(), Some("# "));
        assert_eq!(t.fs.file_count(NOTES_DIR), 1);

        let events = drain(&mut rx);
        let kinds: Vec<_> = events.iter().map(|e| e.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![NoteEventKind::DirectoryChanged, NoteEventKind::Opened]
        );
        assert_eq!(events[1].filename.as_deref(), Some("todo-list.md"));

        assert_eq!(t.editor.opened(), vec![note_path("todo-list.md")]);
        assert_eq!(
            t.editor.cursors(),
            vec![(note_path("todo-list.md"), INITIAL_CURSOR)]
        );
    }

    #[tokio::test]
    async fn test_create_same_title_twice_overwrites() {
        let t = mock_store();

        t.store.create("Same Title").await.unwrap();
        t.fs.write(&note_path("same-title.md"), "# edited by hand")
            .await
            .unwrap();
        t.store.create("Same Title").await.unwrap();

        assert_eq!(note_names(&t.store.list().await.unwrap()), vec!["same-title.md"]);
        assert_eq!(t.fs.file(note_path("same-title.md")).as_deref(), Some("# "));
    }

    #[tokio::test]
    async fn test_create_colliding_slugs_share_a_file() {
        let t = mock_store();

        t.store.create("My Note").await.unwrap();
        t.store.create("  my   NOTE!! ").await.unwrap();

        assert_eq!(note_names(&t.store.list().await.unwrap()), vec!["my-note.md"]);
    }

    // ====================================================================
    // Open
    // ====================================================================

    #[tokio::test]
    async fn test_open_without_filename_is_noop() {
        let t = mock_store();
        let mut rx = t.bus.subscribe();

        assert!(t.store.open(None).await.unwrap().is_none());
        assert!(t.store.open(Some("")).await.unwrap().is_none());

        assert!(t.editor.opened().is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_open_places_cursor_once() {
        let fs = MockFileSystem::new().with_file(note_path("a.md"), "# a");
        let t = mock_store_with(fs, MockEditor::new());

        let pending = t.store.open(Some("a.md")).await.unwrap().unwrap();
        pending.wait().await.unwrap();

        assert_eq!(t.editor.cursors(), vec![(note_path("a.md"), INITIAL_CURSOR)]);
    }

    #[tokio::test]
    async fn test_open_does_not_block_on_editor() {
        let fs = MockFileSystem::new().with_file(note_path("a.md"), "# a");
        let t = mock_store_with(fs, MockEditor::holding_opens());

        let pending = t.store.open(Some("a.md")).await.unwrap().unwrap();
        tokio::task::yield_now().await;

        assert!(!pending.is_finished());
        let mut wait = tokio_test::task::spawn(pending.wait());
        tokio_test::assert_pending!(wait.poll());
        assert!(t.editor.cursors().is_empty());
    }

    #[tokio::test]
    async fn test_open_failure_skips_cursor() {
        let fs = MockFileSystem::new().with_file(note_path("a.md"), "# a");
        let t = mock_store_with(fs, MockEditor::failing_opens());

        let pending = t.store.open(Some("a.md")).await.unwrap().unwrap();

        assert!(pending.wait().await.is_err());
        assert!(t.editor.cursors().is_empty());
    }

    #[tokio::test]
    async fn test_open_rejects_paths_outside_notes_dir() {
        let t = mock_store();

        assert!(t.store.open(Some("../secret.md")).await.is_err());
        assert!(t.store.open(Some("/etc/passwd")).await.is_err());
        assert!(t.editor.opened().is_empty());
    }

    // ====================================================================
    // Remove
    // ====================================================================

    #[tokio::test]
    async fn test_remove_without_selection_is_noop() {
        let t = mock_store();

        assert_eq!(t.store.remove(None).await, RemoveOutcome::Skipped);
        assert!(t.editor.messages().is_empty());
    }

    #[tokio::test]
    async fn test_remove_existing_note() {
        let fs = MockFileSystem::new()
            .with_file(note_path("a.md"), "# a")
            .with_file(note_path("b.md"), "# b");
        let t = mock_store_with(fs, MockEditor::new());
        let mut rx = t.bus.subscribe();

        let outcome = t.store.remove(Some("a.md")).await;

        assert_eq!(outcome, RemoveOutcome::Removed("a.md".into()));
        assert_eq!(note_names(&t.store.list().await.unwrap()), vec!["b.md"]);
        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].kind, NoteEventKind::DirectoryChanged);
    }

    #[tokio::test]
    async fn test_remove_missing_note_reports_error() {
        let fs = MockFileSystem::new().with_file(note_path("a.md"), "# a");
        let t = mock_store_with(fs, MockEditor::new());
        let mut rx = t.bus.subscribe();

        let outcome = t.store.remove(Some("missing.md")).await;

        let RemoveOutcome::Failed(message) = outcome else {
            panic!("expected failure, got {:?}", outcome);
        };
        assert!(message.starts_with("Unable to remove note: "));
        assert!(message.contains("missing.md"));
        assert_eq!(t.editor.messages(), vec![(MessageLevel::Error, message)]);
        assert!(drain(&mut rx).is_empty());
        assert_eq!(note_names(&t.store.list().await.unwrap()), vec!["a.md"]);
    }

    #[tokio::test]
    async fn test_remove_permission_denied_keeps_file() {
        let fs = MockFileSystem::new().with_file(note_path("locked.md"), "# x");
        fs.deny_remove(note_path("locked.md"));
        let t = mock_store_with(fs, MockEditor::new());

        let outcome = t.store.remove(Some("locked.md")).await;

        assert!(matches!(&outcome, RemoveOutcome::Failed(m) if m.contains("permission denied")));
        assert!(t.fs.file(note_path("locked.md")).is_some());
    }

    #[tokio::test]
    async fn test_remove_rejects_traversal() {
        let fs = MockFileSystem::new().with_file("/workspace/keep.md", "# keep");
        let t = mock_store_with(fs, MockEditor::new());

        let outcome = t.store.remove(Some("../keep.md")).await;

        assert!(matches!(outcome, RemoveOutcome::Failed(_)));
        assert!(t.fs.file("/workspace/keep.md").is_some());
    }

    // ====================================================================
    // Watch & dispose
    // ====================================================================

    #[tokio::test]
    async fn test_watch_emits_on_every_change() {
        let mut t = mock_store();
        let mut rx = t.bus.subscribe();

        t.store.watch().await.unwrap();
        t.fs.emit_change(NOTES_DIR);
        t.fs.emit_change(NOTES_DIR);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| e.kind == NoteEventKind::DirectoryChanged));
    }

    #[tokio::test]
    async fn test_watch_twice_keeps_one_subscription() {
        let mut t = mock_store();

        t.store.watch().await.unwrap();
        t.store.watch().await.unwrap();

        assert!(t.store.is_watching());
        assert_eq!(t.fs.active_watches(), 1);
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let mut t = mock_store();
        let mut rx = t.bus.subscribe();

        t.store.dispose();
        t.store.watch().await.unwrap();
        t.store.dispose();
        t.store.dispose();

        assert!(!t.store.is_watching());
        assert_eq!(t.fs.active_watches(), 0);
        t.fs.emit_change(NOTES_DIR);
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_drop_releases_watch() {
        let mut t = mock_store();
        t.store.watch().await.unwrap();
        let fs = t.fs.clone();

        drop(t);

        assert_eq!(fs.active_watches(), 0);
    }

    #[tokio::test]
    async fn test_watch_refresh_racing_create_keeps_listing_consistent() {
        let mut t = mock_store();
        let mut rx = t.bus.subscribe();
        t.store.watch().await.unwrap();

        let pending = t.store.create("Race").await.unwrap().unwrap();
        t.fs.emit_change(NOTES_DIR);
        pending.wait().await.unwrap();

        let events = drain(&mut rx);
        let refreshes = events
            .iter()
            .filter(|e| e.kind == NoteEventKind::DirectoryChanged)
            .count();
        // Watcher fires for the new file, the store fires once, plus the external event
        assert_eq!(refreshes, 3);
        assert_eq!(note_names(&t.store.list().await.unwrap()), vec!["race.md"]);
    }
}
