//! In-memory event store.

use std::sync::RwLock;

use calboard_core::{Event, EventError, EventFields, EventResult};

use super::EventStore;

/// Events held in process memory; lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: T) -> EventError {
    EventError::Store("event table lock poisoned".to_string())
}

impl EventStore for MemoryStore {
    fn list(&self) -> EventResult<Vec<Event>> {
        Ok(self.events.read().map_err(poisoned)?.clone())
    }

    fn insert(&self, fields: EventFields) -> EventResult<Event> {
        fields.validate()?;

        let event = Event::new(Event::generate_id(), fields);
        self.events.write().map_err(poisoned)?.push(event.clone());
        Ok(event)
    }

    fn replace(&self, id: &str, fields: EventFields) -> EventResult<Event> {
        fields.validate()?;

        let mut events = self.events.write().map_err(poisoned)?;
        let slot = events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        *slot = Event::new(id, fields);
        Ok(slot.clone())
    }
}
