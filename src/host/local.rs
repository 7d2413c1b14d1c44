//! Local disk implementation of [`FileSystemPort`]
//!
//! File operations go through `tokio::fs`; directory watching uses `notify`
//! with a non-recursive watch, since notes never live in subdirectories.

use super::error::FsError;
use super::traits::{ChangeCallback, DirEntry, FileSystemPort, WatchSubscription};
use async_trait::async_trait;
use notify::event::ModifyKind;
use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};

/// File-system port backed by the real disk
#[derive(Debug, Clone, Default)]
pub struct LocalFileSystem;

impl LocalFileSystem {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl FileSystemPort for LocalFileSystem {
    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::metadata(path).await.is_ok()
    }

    async fn mkdir(&self, path: &Path) -> Result<(), FsError> {
        if self.exists(path).await {
            return Err(FsError::AlreadyExists(path.to_path_buf()));
        }
        tokio::fs::create_dir_all(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn list_dir(&self, path: &Path) -> Result<Vec<DirEntry>, FsError> {
        let mut reader = tokio::fs::read_dir(path)
            .await
            .map_err(|e| FsError::from_io(path, e))?;

        let mut entries = Vec::new();
        while let Some(entry) = reader
            .next_entry()
            .await
            .map_err(|e| FsError::from_io(path, e))?
        {
            let is_dir = entry
                .file_type()
                .await
                .map(|t| t.is_dir())
                .unwrap_or(false);
            entries.push(DirEntry {
                name: entry.file_name().to_string_lossy().into_owned(),
                is_dir,
            });
        }
        Ok(entries)
    }

    async fn read(&self, path: &Path) -> Result<String, FsError> {
        tokio::fs::read_to_string(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn write(&self, path: &Path, contents: &str) -> Result<(), FsError> {
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    async fn remove(&self, path: &Path) -> Result<(), FsError> {
        tokio::fs::remove_file(path)
            .await
            .map_err(|e| FsError::from_io(path, e))
    }

    fn watch(
        &self,
        path: &Path,
        on_change: ChangeCallback,
    ) -> Result<Box<dyn WatchSubscription>, FsError> {
        let watched = path.to_path_buf();
        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) if is_entry_change(&event.kind) => {
                    tracing::trace!(kind = ?event.kind, "Notes directory changed");
                    on_change();
                }
                Ok(_) => {}
                Err(e) => tracing::warn!(error = %e, "Directory watch error"),
            },
            Config::default(),
        )
        .map_err(|e| FsError::Watch {
            path: watched.clone(),
            source: e,
        })?;

        watcher
            .watch(path, RecursiveMode::NonRecursive)
            .map_err(|e| FsError::Watch {
                path: watched.clone(),
                source: e,
            })?;

        tracing::debug!(path = %watched.display(), "Watching notes directory");
        Ok(Box::new(NotifySubscription {
            watcher: Some(watcher),
            path: watched,
        }))
    }
}

/// Keeps the `notify` watcher alive until closed
struct NotifySubscription {
    watcher: Option<RecommendedWatcher>,
    path: PathBuf,
}

impl WatchSubscription for NotifySubscription {
    fn close(&mut self) {
        if let Some(mut watcher) = self.watcher.take() {
            let _ = watcher.unwatch(&self.path);
            tracing::debug!(path = %self.path.display(), "Stopped watching notes directory");
        }
    }
}

/// Only entry-level changes matter: something appeared, vanished, or was renamed
fn is_entry_change(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}
