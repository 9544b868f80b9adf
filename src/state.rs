//! Client-side event state.
//!
//! `EventStateStore` is the UI session's cache of the server's event table.
//! It changes only when a round-trip completes: there is no optimistic update.
//! Actions apply in completion order, and a later dispatch never cancels an
//! earlier one, so the last response to arrive wins.
//!
//! Create one store per session and hand clones of it to presentation code;
//! clones share the same table.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use calboard_core::{Event, EventFields};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::client::{ClientError, ClientResult, EventApi};

/// The three actions that may change the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Fetch,
    Add,
    Update,
}

/// Lifecycle of an action, for loading and error indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Status {
    #[default]
    Idle,
    Pending,
    Fulfilled,
    Rejected(String),
}

/// What happened to a successful `update_one` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The matching table entry was replaced.
    Applied,
    /// No entry had the returned id; the response was dropped.
    Stale,
}

#[derive(Debug, Clone, Default)]
struct ActionState {
    in_flight: usize,
    last: Status,
}

impl ActionState {
    fn status(&self) -> Status {
        if self.in_flight > 0 {
            Status::Pending
        } else {
            self.last.clone()
        }
    }
}

#[derive(Debug, Default)]
struct Table {
    items: Vec<Event>,
    fetch: ActionState,
    add: ActionState,
    update: ActionState,
    last_error: Option<(Action, String)>,
}

impl Table {
    fn action(&mut self, action: Action) -> &mut ActionState {
        match action {
            Action::Fetch => &mut self.fetch,
            Action::Add => &mut self.add,
            Action::Update => &mut self.update,
        }
    }

    fn begin(&mut self, action: Action) {
        self.action(action).in_flight += 1;
    }

    fn finish<T>(&mut self, action: Action, result: &ClientResult<T>) {
        let state = self.action(action);
        state.in_flight = state.in_flight.saturating_sub(1);

        match result {
            Ok(_) => {
                state.last = Status::Fulfilled;
                if self.last_error.as_ref().is_some_and(|(a, _)| *a == action) {
                    self.last_error = None;
                }
            }
            Err(e) => {
                state.last = Status::Rejected(e.to_string());
                self.last_error = Some((action, e.to_string()));
            }
        }
    }
}

/// A point-in-time copy of the store for rendering.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub items: Vec<Event>,
    pub fetch: Status,
    pub add: Status,
    pub update: Status,
    /// Message of the most recent rejection still in effect.
    pub last_error: Option<String>,
}

impl Snapshot {
    pub fn is_loading(&self) -> bool {
        [&self.fetch, &self.add, &self.update]
            .into_iter()
            .any(|s| *s == Status::Pending)
    }
}

pub struct EventStateStore<A> {
    api: Arc<A>,
    table: Arc<Mutex<Table>>,
    revision: Arc<watch::Sender<u64>>,
}

impl<A> Clone for EventStateStore<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            table: Arc::clone(&self.table),
            revision: Arc::clone(&self.revision),
        }
    }
}

impl<A: EventApi> EventStateStore<A> {
    pub fn new(api: A) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            api: Arc::new(api),
            table: Arc::new(Mutex::new(Table::default())),
            revision: Arc::new(revision),
        }
    }

    fn table(&self) -> MutexGuard<'_, Table> {
        self.table.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn notify(&self) {
        self.revision.send_modify(|rev| *rev += 1);
    }

    /// Receiver whose value changes every time the store does.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn snapshot(&self) -> Snapshot {
        let table = self.table();
        Snapshot {
            items: table.items.clone(),
            fetch: table.fetch.status(),
            add: table.add.status(),
            update: table.update.status(),
            last_error: table.last_error.as_ref().map(|(_, msg)| msg.clone()),
        }
    }

    pub fn events(&self) -> Vec<Event> {
        self.table().items.clone()
    }

    pub fn status(&self, action: Action) -> Status {
        self.table().action(action).status()
    }

    pub fn last_error(&self) -> Option<String> {
        self.table().last_error.as_ref().map(|(_, msg)| msg.clone())
    }

    fn begin(&self, action: Action) {
        self.table().begin(action);
        self.notify();
    }

    /// Replace the whole table with the server's list.
    pub async fn fetch_all(&self) -> ClientResult<usize> {
        self.begin(Action::Fetch);
        let result = self.api.fetch_all().await;

        let outcome = {
            let mut table = self.table();
            table.finish(Action::Fetch, &result);
            result.map(|events| {
                table.items = events;
                table.items.len()
            })
        };

        self.notify();
        outcome
    }

    /// Create an event and append the server's copy to the table.
    pub async fn add_one(&self, fields: EventFields) -> ClientResult<Event> {
        self.begin(Action::Add);
        let result = self.api.create(&fields).await;

        {
            let mut table = self.table();
            table.finish(Action::Add, &result);
            if let Ok(event) = &result {
                table.items.push(event.clone());
            }
        }

        self.notify();
        result
    }

    /// Send a full replacement of `event` and apply the server's copy.
    pub async fn update_one(&self, event: Event) -> ClientResult<UpdateOutcome> {
        self.begin(Action::Update);
        let result = self.api.update(&event).await;

        let outcome = {
            let mut table = self.table();
            table.finish(Action::Update, &result);
            result.map(|updated| match table.items.iter_mut().find(|e| e.id == updated.id) {
                Some(slot) => {
                    *slot = updated;
                    UpdateOutcome::Applied
                }
                None => {
                    debug!(id = %updated.id, "dropping update for an event no longer in the table");
                    UpdateOutcome::Stale
                }
            })
        };

        self.notify();
        outcome
    }

    pub fn dispatch_fetch_all(&self) -> JoinHandle<ClientResult<usize>> {
        let store = self.clone();
        tokio::spawn(async move { store.fetch_all().await })
    }

    pub fn dispatch_add_one(&self, fields: EventFields) -> JoinHandle<ClientResult<Event>> {
        let store = self.clone();
        tokio::spawn(async move { store.add_one(fields).await })
    }

    pub fn dispatch_update_one(&self, event: Event) -> JoinHandle<ClientResult<UpdateOutcome>> {
        let store = self.clone();
        tokio::spawn(async move { store.update_one(event).await })
    }
}

/// Flatten a dispatched action's join result.
pub async fn settle<T>(handle: JoinHandle<ClientResult<T>>) -> ClientResult<T> {
    handle.await.unwrap_or_else(|e| {
        Err(ClientError::Network {
            status: None,
            message: format!("action did not complete: {}", e),
        })
    })
}
