//! Store notification system
//!
//! This module provides:
//! - `NoteEvent`: typed events emitted when the notes directory changes or a note is opened
//! - `EventEmitter`: the sink the notes store publishes to
//! - `EventBus`: broadcast channel for distributing events to listeners

mod bus;
mod types;

pub use bus::EventBus;
pub use types::{EventEmitter, NoteEvent, NoteEventKind};
