//! Event types.
//!
//! `Event` is the only entity. The store owns its `id`; the four remaining
//! fields are replaced wholesale on every update, so they travel together as
//! `EventFields`. Request bodies arrive as an `EventDraft` and only become
//! `EventFields` after validation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::category::Category;
use crate::error::{EventError, EventResult};
use crate::time;

/// A titled, categorized time interval.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub category: Category,
    #[serde(with = "time::wire")]
    pub start: DateTime<Utc>,
    #[serde(with = "time::wire")]
    pub end: DateTime<Utc>,
}

/// The mutable fields of an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventFields {
    pub title: String,
    pub category: Category,
    #[serde(with = "time::wire")]
    pub start: DateTime<Utc>,
    #[serde(with = "time::wire")]
    pub end: DateTime<Utc>,
}

/// An unvalidated `{title, category, start, end}` body.
///
/// Every field is optional text so that a missing or malformed field is
/// reported as a validation failure with a readable message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventDraft {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, fields: EventFields) -> Self {
        Event {
            id: id.into(),
            title: fields.title,
            category: fields.category,
            start: fields.start,
            end: fields.end,
        }
    }

    /// A fresh opaque identifier for a new event.
    pub fn generate_id() -> String {
        uuid::Uuid::new_v4().to_string()
    }

    pub fn fields(&self) -> EventFields {
        EventFields {
            title: self.title.clone(),
            category: self.category,
            start: self.start,
            end: self.end,
        }
    }

    /// Same event, new time range. Used by drag and resize.
    pub fn with_times(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Event {
            start,
            end,
            ..self.clone()
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl EventFields {
    /// Check the invariants that hold for every stored event.
    pub fn validate(&self) -> EventResult<()> {
        if self.title.trim().is_empty() {
            return Err(EventError::validation("title is required"));
        }
        if self.category == Category::Unknown {
            return Err(EventError::validation("category is not one of the known categories"));
        }
        if self.start >= self.end {
            return Err(EventError::validation(format!(
                "start ({}) must be before end ({})",
                time::to_wire(&self.start),
                time::to_wire(&self.end)
            )));
        }
        Ok(())
    }
}

impl EventDraft {
    /// Validate the draft into typed fields.
    ///
    /// Fails with `EventError::Validation` naming the first offending field.
    pub fn validate(&self) -> EventResult<EventFields> {
        let title = required(&self.title, "title")?;
        let category = required(&self.category, "category")?.parse::<Category>()?;
        let start = parse_time(&self.start, "start")?;
        let end = parse_time(&self.end, "end")?;

        let fields = EventFields {
            title: title.to_string(),
            category,
            start,
            end,
        };
        fields.validate()?;
        Ok(fields)
    }
}

impl From<&EventFields> for EventDraft {
    fn from(fields: &EventFields) -> Self {
        EventDraft {
            title: Some(fields.title.clone()),
            category: Some(fields.category.to_string()),
            start: Some(time::to_wire(&fields.start)),
            end: Some(time::to_wire(&fields.end)),
        }
    }
}

fn required<'a>(value: &'a Option<String>, field: &str) -> EventResult<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EventError::validation(format!("{} is required", field))),
    }
}

fn parse_time(value: &Option<String>, field: &str) -> EventResult<DateTime<Utc>> {
    let raw = required(value, field)?;
    time::parse(raw).map_err(|e| EventError::validation(format!("{}: {}", field, e)))
}
