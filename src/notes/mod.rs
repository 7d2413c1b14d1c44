//! Scratchpad notes
//!
//! Markdown notes kept flat in a single workspace-local directory:
//! - `slugify` turns free-text titles into filenames
//! - `NotesStore` lists, creates, opens, removes and watches them
//! - `TreeItem` describes how each note is shown in the sidebar

pub mod models;
pub mod slug;
pub mod store;
pub mod tree;

pub use models::*;
pub use slug::slugify;
pub use store::{NotesStore, PendingOpen, RemoveOutcome};
pub use tree::TreeItem;
