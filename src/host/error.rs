//! Error types surfaced by the host ports

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Failure of a file-system port operation
#[derive(Debug, Error)]
pub enum FsError {
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),

    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to watch {}: {source}", .path.display())]
    Watch {
        path: PathBuf,
        #[source]
        source: notify::Error,
    },
}

impl FsError {
    /// Classify an `io::Error` raised while touching `path`
    pub fn from_io(path: &Path, err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => FsError::NotFound(path.to_path_buf()),
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists(path.to_path_buf()),
            _ => FsError::Io {
                path: path.to_path_buf(),
                source: err,
            },
        }
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, FsError::AlreadyExists(_))
    }
}

/// Failure of an editor port operation
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("failed to launch editor `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("editor `{command}` exited with {status}")]
    Exited { command: String, status: String },

    #[error("cannot open {}: no such file", .0.display())]
    NotFound(PathBuf),

    #[error("editor session closed before it was ready: {}", .0.display())]
    Closed(PathBuf),
}
