//! Core types for calboard.
//!
//! This crate provides the types shared by the server and the client:
//! - `Event`, `EventFields` and `EventDraft` (with validation)
//! - `Category`, the fixed set of event categories
//! - `time`, the wire timestamp codec
//! - `config`, settings shared by both binaries

pub mod category;
pub mod config;
pub mod error;
pub mod event;
pub mod time;

pub use category::Category;
pub use error::{EventError, EventResult};
pub use event::{Event, EventDraft, EventFields};
