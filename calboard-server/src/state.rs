use std::sync::Arc;

use crate::store::{EventStore, SharedStore};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    store: SharedStore,
}

impl AppState {
    pub fn new(store: impl EventStore + 'static) -> Self {
        AppState {
            store: Arc::new(store),
        }
    }

    pub fn store(&self) -> &dyn EventStore {
        self.store.as_ref()
    }
}
