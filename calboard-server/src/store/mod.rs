//! Event persistence.
//!
//! The store is the single source of truth for events. Every operation
//! touches at most one record and is atomic on its own; there are no
//! multi-record transactions.

mod document;
mod memory;

pub use document::DocumentStore;
pub use memory::MemoryStore;

use calboard_core::{Event, EventFields, EventResult};
use std::sync::Arc;

/// Keyed storage of `Event` records.
pub trait EventStore: Send + Sync {
    /// All events. No ordering guarantee.
    fn list(&self) -> EventResult<Vec<Event>>;

    /// Store a new event under a freshly assigned id.
    fn insert(&self, fields: EventFields) -> EventResult<Event>;

    /// Overwrite every mutable field of the event with this id.
    ///
    /// Fails with `EventError::NotFound` for an unknown id; nothing is created.
    fn replace(&self, id: &str, fields: EventFields) -> EventResult<Event>;
}

pub type SharedStore = Arc<dyn EventStore>;
