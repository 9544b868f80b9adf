//! The create-event dialog.
//!
//! Holds form state locally until submit. Start and end are kept as the text
//! a `datetime-local` input would show (`YYYY-MM-DDTHH:MM`).

use calboard_core::{Category, Event, EventFields, time};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::client::{ClientResult, EventApi};
use crate::state::EventStateStore;
use crate::view::Slot;

#[derive(Error, Debug, PartialEq)]
pub enum DialogError {
    #[error("The dialog is not open")]
    NotOpen,

    #[error("{0} is required")]
    Required(&'static str),

    #[error("Invalid {field} time: {value}")]
    InvalidTime { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CreateDialog {
    open: bool,
    pub title: String,
    pub category: Category,
    pub start: String,
    pub end: String,
}

impl CreateDialog {
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Open seeded with a selected slot; everything else starts from defaults.
    pub fn open_with(&mut self, slot: Slot) {
        *self = CreateDialog {
            open: true,
            start: time::to_local_input(&slot.start),
            end: time::to_local_input(&slot.end),
            ..Default::default()
        };
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }

    pub fn set_start(&mut self, start: impl Into<String>) {
        self.start = start.into();
    }

    pub fn set_end(&mut self, end: impl Into<String>) {
        self.end = end.into();
    }

    /// The form converted to wire-ready fields.
    pub fn fields(&self) -> Result<EventFields, DialogError> {
        if self.title.trim().is_empty() {
            return Err(DialogError::Required("title"));
        }

        Ok(EventFields {
            title: self.title.clone(),
            category: self.category,
            start: parse_input("start", &self.start)?,
            end: parse_input("end", &self.end)?,
        })
    }

    /// Dispatch `add_one`, then close and reset without waiting for it.
    ///
    /// The returned handle resolves when the round-trip does; callers that
    /// only care about closing the dialog can drop it.
    pub fn submit<A: EventApi>(
        &mut self,
        store: &EventStateStore<A>,
    ) -> Result<JoinHandle<ClientResult<Event>>, DialogError> {
        if !self.open {
            return Err(DialogError::NotOpen);
        }

        let fields = self.fields()?;
        let handle = store.dispatch_add_one(fields);
        *self = CreateDialog::default();
        Ok(handle)
    }

    /// Close without dispatching anything.
    pub fn cancel(&mut self) {
        *self = CreateDialog::default();
    }
}

fn parse_input(field: &'static str, value: &str) -> Result<chrono::DateTime<chrono::Utc>, DialogError> {
    if value.trim().is_empty() {
        return Err(DialogError::Required(field));
    }
    time::parse(value).map_err(|_| DialogError::InvalidTime {
        field,
        value: value.to_string(),
    })
}
