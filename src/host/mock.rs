//! In-memory implementations of the host ports for testing without a real
//! disk or editor.

use super::error::{EditorError, FsError};
use super::traits::{
    ChangeCallback, DirEntry, EditorHandle, EditorPort, FileSystemPort, MessageLevel,
    WatchSubscription,
};
use crate::notes::CursorPosition;
use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

type WatcherList = Arc<Mutex<Vec<(u64, PathBuf, ChangeCallback)>>>;

#[derive(Default)]
struct FsState {
    dirs: BTreeSet<PathBuf>,
    files: BTreeMap<PathBuf, String>,
    deny_remove: HashSet<PathBuf>,
}

/// In-memory file system.
///
/// Listing order is lexical. Like a real watcher, subscriptions fire when an
/// entry appears or disappears, but not when an existing file is rewritten.
#[derive(Default)]
pub struct MockFileSystem {
    state: Mutex<FsState>,
    watchers: WatcherList,
    next_watch_id: AtomicU64,
}

impl MockFileSystem {
    /// Create a new empty mock file system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a directory (and its ancestors)
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert_dir(path.as_ref());
        self
    }

    /// Seed a file; its parent directories are created as needed
    pub fn with_file(self, path: impl AsRef<Path>, contents: &str) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.insert_dir(parent);
        }
        self.lock()
            .files
            .insert(path.to_path_buf(), contents.to_string());
        self
    }

    /// Make every removal of `path` fail with a permission error
    pub fn deny_remove(&self, path: impl AsRef<Path>) {
        self.lock().deny_remove.insert(path.as_ref().to_path_buf());
    }

    /// Contents of a file, if present
    pub fn file(&self, path: impl AsRef<Path>) -> Option<String> {
        self.lock().files.get(path.as_ref()).cloned()
    }

    /// Number of files directly inside `dir`
    pub fn file_count(&self, dir: impl AsRef<Path>) -> usize {
        let dir = dir.as_ref();
        self.lock()
            .files
            .keys()
            .filter(|p| p.parent() == Some(dir))
            .count()
    }

    /// Number of watch subscriptions still open
    pub fn active_watches(&self) -> usize {
        self.watchers.lock().map(|w| w.len()).unwrap_or(0)
    }

    /// Simulate an out-of-band change inside `dir`
    pub fn emit_change(&self, dir: impl AsRef<Path>) {
        self.fire(dir.as_ref());
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FsState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn insert_dir(&self, path: &Path) {
        let mut state = self.lock();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                break;
            }
            state.dirs.insert(ancestor.to_path_buf());
        }
    }

    fn fire(&self, dir: &Path) {
        // Callbacks run outside the lock so they may call back into the mock
        let callbacks: Vec<ChangeCallback> = match self.watchers.lock() {
            Ok(watchers) => watchers
                .iter()
                .filter(|(_, path, _)| path == dir)
                .map(|(_, _, cb)| cb.clone())
                .collect(),
            Err(_) => return,
        };
        for callback in callbacks {
            callback();
        }
    }
}

#[async_trait]
impl FileSystemPort for MockFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        let state = self.lock();
        state.dirs.contains(path) || state.files.contains_key(path)
    }

    async fn mkdir(&self, path: &Path) -> Result<(), FsError> {
        if self.exists(path).await {
            return Err(FsError::AlreadyExists(path.to_path_buf()));
        }
        self.insert_dir(path);
        Ok(())
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let state = self.lock();
        if !state.dirs.contains(path) {
            return Err(FsError::NotFound(path.to_path_buf()));
        }

        let child_name = |p: &PathBuf| {
            p.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default()
        };

        let dirs = state
            .dirs
            .iter()
            .filter(|p| p.parent() == Some(path))
            .map(|p| DirEntry::dir(child_name(p)));
        let files = state
            .files
            .keys()
            .filter(|p| p.parent() == Some(path))
            .map(|p| DirEntry::file(child_name(p)));

        Ok(dirs.chain(files).collect())
    }

    async fn read(&self, path: &Path) -> Result<String, FsError> {
        self.lock()
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| FsError::NotFound(path.to_path_buf()))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), FsError> {
        let parent = path.parent().unwrap_or(Path::new("")).to_path_buf();
        let created = {
            let mut state = self.lock();
            if state.dirs.contains(path) {
                return Err(FsError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::Other, "is a directory"),
                });
            }
            if !state.dirs.contains(&parent) {
                return Err(FsError::NotFound(path.to_path_buf()));
            }
            state
                .files
                .insert(path.to_path_buf(), contents.to_string())
                .is_none()
        };

        if created {
            self.fire(&parent);
        }
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<(), FsError> {
        {
            let mut state = self.lock();
            if state.deny_remove.contains(path) {
                return Err(FsError::Io {
                    path: path.to_path_buf(),
                    source: io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"),
                });
            }
            if state.files.remove(path).is_none() {
                return Err(FsError::NotFound(path.to_path_buf()));
            }
        }

        if let Some(parent) = path.parent() {
            self.fire(parent);
        }
        Ok(())
    }

    fn watch(
        &self,
        path: &Path,
        on_change: ChangeCallback,
    ) -> Result<Box<dyn WatchSubscription>, FsError> {
        if !self.lock().dirs.contains(path) {
            return Err(FsError::Watch {
                path: path.to_path_buf(),
                source: notify::Error::path_not_found().add_path(path.to_path_buf()),
            });
        }

        let id = self.next_watch_id.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut watchers) = self.watchers.lock() {
            watchers.push((id, path.to_path_buf(), on_change));
        }
        Ok(Box::new(MockSubscription {
            id,
            watchers: Some(self.watchers.clone()),
        }))
    }
}

struct MockSubscription {
    id: u64,
    watchers: Option<WatcherList>,
}

impl WatchSubscription for MockSubscription {
    fn close(&mut self) {
        if let Some(watchers) = self.watchers.take() {
            if let Ok(mut list) = watchers.lock() {
                list.retain(|(id, _, _)| *id != self.id);
            }
        }
    }
}

#[derive(Default)]
struct EditorState {
    opened: Vec<PathBuf>,
    cursors: Vec<(PathBuf, CursorPosition)>,
    inputs: VecDeque<Option<String>>,
    choices: VecDeque<Option<usize>>,
    prompts: Vec<String>,
    choice_requests: Vec<(Vec<String>, String)>,
    messages: Vec<(MessageLevel, String)>,
}

/// Scripted editor: palettes answer from queues, every call is recorded.
///
/// An empty input or choice queue behaves like the user dismissing the palette.
#[derive(Default)]
pub struct MockEditor {
    state: Mutex<EditorState>,
    hold_opens: bool,
    fail_opens: bool,
}

impl MockEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens never become ready
    pub fn holding_opens() -> Self {
        Self {
            hold_opens: true,
            ..Self::default()
        }
    }

    /// Opens fail as if the document was closed before it was ready
    pub fn failing_opens() -> Self {
        Self {
            fail_opens: true,
            ..Self::default()
        }
    }

    /// Queue the answer to the next input palette
    pub fn push_input(&self, answer: Option<&str>) {
        self.lock().inputs.push_back(answer.map(str::to_string));
    }

    /// Queue the answer to the next choice palette
    pub fn push_choice(&self, answer: Option<usize>) {
        self.lock().choices.push_back(answer);
    }

    pub fn opened(&self) -> Vec<PathBuf> {
        self.lock().opened.clone()
    }

    pub fn cursors(&self) -> Vec<(PathBuf, CursorPosition)> {
        self.lock().cursors.clone()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.lock().prompts.clone()
    }

    pub fn choice_requests(&self) -> Vec<(Vec<String>, String)> {
        self.lock().choice_requests.clone()
    }

    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.lock().messages.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, EditorState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl EditorPort for MockEditor {
    async fn open_file(&self, path: &Path) -> Result<EditorHandle, EditorError> {
        self.lock().opened.push(path.to_path_buf());
        if self.hold_opens {
            std::future::pending::<()>().await;
        }
        if self.fail_opens {
            return Err(EditorError::Closed(path.to_path_buf()));
        }
        Ok(EditorHandle::new(path))
    }

    async fn set_cursor(
        &self,
        handle: &EditorHandle,
        position: CursorPosition,
    ) -> Result<(), EditorError> {
        self.lock().cursors.push((handle.path.clone(), position));
        Ok(())
    }

    async fn show_input(&self, prompt: &str) -> Option<String> {
        let mut state = self.lock();
        state.prompts.push(prompt.to_string());
        state.inputs.pop_front().flatten()
    }

    async fn show_choice(&self, items: &[String], placeholder: &str) -> Option<usize> {
        let mut state = self.lock();
        state
            .choice_requests
            .push((items.to_vec(), placeholder.to_string()));
        state.choices.pop_front().flatten()
    }

    async fn show_message(&self, level: MessageLevel, message: &str) {
        self.lock().messages.push((level, message.to_string()));
    }
}
