//! Client side of calboard: the events API client, the event state store,
//! and the calendar view model with its terminal renderer.

pub mod client;
pub mod dialog;
pub mod palette;
pub mod render;
pub mod state;
pub mod view;

pub use client::{ClientError, ClientResult, EventApi, EventClient};
pub use state::{EventStateStore, Snapshot, UpdateOutcome};
pub use view::{CalendarView, Granularity, Slot, Viewport};
