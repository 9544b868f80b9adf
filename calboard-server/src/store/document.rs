//! Document store: one JSON file per event.
//!
//! Layout: `<data_dir>/events/<id>.json`. A write lands in a temporary file
//! next to its target and is renamed into place, so readers never observe a
//! half-written document.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use calboard_core::{Event, EventError, EventFields, EventResult};
use tracing::{debug, info, warn};

use super::EventStore;

pub struct DocumentStore {
    dir: PathBuf,
    // Serializes writers; reads go straight to the filesystem.
    write_lock: Mutex<()>,
}

impl DocumentStore {
    /// Open (creating if needed) the event documents under `data_dir`.
    pub fn open(data_dir: &Path) -> EventResult<Self> {
        let dir = data_dir.join("events");
        std::fs::create_dir_all(&dir).map_err(|e| {
            EventError::Store(format!("Could not create {}: {}", dir.display(), e))
        })?;

        info!(dir = %dir.display(), "opened document store");

        Ok(DocumentStore {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the document for `id`, or None if the id could not have been
    /// issued by this store (guards against path traversal).
    fn path_for(&self, id: &str) -> Option<PathBuf> {
        let valid = !id.is_empty() && id.chars().all(|c| c.is_ascii_alphanumeric() || c == '-');
        valid.then(|| self.dir.join(format!("{}.json", id)))
    }

    fn write_document(&self, path: &Path, event: &Event) -> EventResult<()> {
        let content = serde_json::to_vec_pretty(event)?;
        let tmp = path.with_extension("json.tmp");

        std::fs::write(&tmp, content)
            .and_then(|_| std::fs::rename(&tmp, path))
            .map_err(|e| EventError::Store(format!("Failed to write {}: {}", path.display(), e)))
    }

    fn read_document(path: &Path) -> EventResult<Event> {
        let content = std::fs::read(path)?;
        Ok(serde_json::from_slice(&content)?)
    }
}

fn poisoned<T>(_: T) -> EventError {
    EventError::Store("document store lock poisoned".to_string())
}

impl EventStore for DocumentStore {
    fn list(&self) -> EventResult<Vec<Event>> {
        let entries = std::fs::read_dir(&self.dir)
            .map_err(|e| EventError::Store(format!("Failed to read {}: {}", self.dir.display(), e)))?;

        let mut events: Vec<Event> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|e| e == "json"))
            .filter_map(|path| match Self::read_document(&path) {
                Ok(event) => Some(event),
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping unreadable event document");
                    None
                }
            })
            .collect();

        events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
        Ok(events)
    }

    fn insert(&self, fields: EventFields) -> EventResult<Event> {
        fields.validate()?;

        let _guard = self.write_lock.lock().map_err(poisoned)?;

        let event = Event::new(Event::generate_id(), fields);
        let path = self
            .path_for(&event.id)
            .ok_or_else(|| EventError::Store(format!("Generated an unusable id: {}", event.id)))?;
        self.write_document(&path, &event)?;

        debug!(id = %event.id, "inserted event");
        Ok(event)
    }

    fn replace(&self, id: &str, fields: EventFields) -> EventResult<Event> {
        fields.validate()?;

        let _guard = self.write_lock.lock().map_err(poisoned)?;

        let path = self
            .path_for(id)
            .filter(|p| p.exists())
            .ok_or_else(|| EventError::NotFound(id.to_string()))?;

        let event = Event::new(id, fields);
        self.write_document(&path, &event)?;

        debug!(id = %event.id, "replaced event");
        Ok(event)
    }
}
