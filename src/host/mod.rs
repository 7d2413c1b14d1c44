//! Host collaborators behind explicit ports
//!
//! This module provides:
//! - `FileSystemPort` / `EditorPort`: what the notes store consumes
//! - `LocalFileSystem`: `tokio::fs` + `notify` implementation
//! - `TerminalEditor`: stdin/stdout palettes and an external editor command
//! - `mock`: in-memory fakes for tests

mod error;
mod local;
pub mod mock;
mod terminal;
mod traits;

pub use error::{EditorError, FsError};
pub use local::LocalFileSystem;
pub use terminal::TerminalEditor;
pub use traits::{
    ChangeCallback, DirEntry, EditorHandle, EditorPort, FileSystemPort, MessageLevel,
    WatchSubscription,
};
