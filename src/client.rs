//! HTTP client for the calboard events API.
//!
//! Timestamps are converted from wire text to `DateTime<Utc>` here, right
//! after each round-trip, and nowhere else.

use std::future::Future;

use calboard_core::{Category, Event, EventFields, time};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by the events API client.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClientError {
    /// Transport failure or a non-2xx response.
    #[error("{message}")]
    Network { status: Option<u16>, message: String },

    /// A 2xx response whose body was not what the API promises.
    #[error("Unexpected response from server: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ClientError::Decode(err.to_string());
        }
        ClientError::Network {
            status: err.status().map(|s| s.as_u16()),
            message: format!("Failed to connect to server: {}", err),
        }
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// The three round-trips the UI state depends on.
pub trait EventApi: Send + Sync + 'static {
    fn fetch_all(&self) -> impl Future<Output = ClientResult<Vec<Event>>> + Send;

    fn create(&self, fields: &EventFields) -> impl Future<Output = ClientResult<Event>> + Send;

    fn update(&self, event: &Event) -> impl Future<Output = ClientResult<Event>> + Send;
}

/// Error body returned by the server
#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// An event as it appears on the wire, before conversion.
#[derive(Deserialize)]
struct WireEvent {
    #[serde(alias = "_id")]
    id: Option<String>,
    title: Option<String>,
    category: Option<String>,
    start: Option<String>,
    end: Option<String>,
}

impl WireEvent {
    fn into_event(self) -> Option<Event> {
        // Unrecognized or missing names are kept and drawn in the fallback color.
        let category = self
            .category
            .and_then(|name| name.parse::<Category>().ok())
            .unwrap_or(Category::Unknown);
        let start = time::parse(&self.start?).ok()?;
        let end = time::parse(&self.end?).ok()?;

        Some(Event {
            id: self.id?,
            title: self.title.unwrap_or_default(),
            category,
            start,
            end,
        })
    }
}

/// Convert a listing record by record.
///
/// A malformed record, including one whose fields have the wrong JSON type,
/// is dropped rather than failing the whole fetch.
fn decode_listing(records: Vec<serde_json::Value>) -> Vec<Event> {
    let total = records.len();
    let events: Vec<Event> = records
        .into_iter()
        .filter_map(|record| serde_json::from_value::<WireEvent>(record).ok())
        .filter_map(WireEvent::into_event)
        .collect();

    if events.len() < total {
        warn!(dropped = total - events.len(), "dropped malformed event records");
    }
    events
}

/// HTTP client for the events API
#[derive(Clone)]
pub struct EventClient {
    http: reqwest::Client,
    base_url: String,
}

impl EventClient {
    /// `base_url` is the events collection, e.g. `http://localhost:5000/api/events`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn event_url(&self, id: &str) -> String {
        format!("{}/{}", self.base_url, id)
    }

    /// Turn a non-2xx response into `ClientError::Network`, keeping the
    /// server's message when it sent one.
    async fn check(resp: reqwest::Response) -> ClientResult<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or_else(|_| {
                format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("error"))
            });

        Err(ClientError::Network {
            status: Some(status.as_u16()),
            message,
        })
    }

    fn decode_one(wire: WireEvent) -> ClientResult<Event> {
        wire.into_event()
            .ok_or_else(|| ClientError::Decode("event is missing required fields".to_string()))
    }
}

impl EventApi for EventClient {
    /// GET /api/events
    async fn fetch_all(&self) -> ClientResult<Vec<Event>> {
        let resp = self.http.get(&self.base_url).send().await?;
        let records: Vec<serde_json::Value> = Self::check(resp).await?.json().await?;
        let events = decode_listing(records);

        debug!(count = events.len(), "fetched events");
        Ok(events)
    }

    /// POST /api/events
    async fn create(&self, fields: &EventFields) -> ClientResult<Event> {
        let resp = self.http.post(&self.base_url).json(fields).send().await?;
        let wire: WireEvent = Self::check(resp).await?.json().await?;
        Self::decode_one(wire)
    }

    /// PUT /api/events/:id
    async fn update(&self, event: &Event) -> ClientResult<Event> {
        let resp = self
            .http
            .put(self.event_url(&event.id))
            .json(&event.fields())
            .send()
            .await?;
        let wire: WireEvent = Self::check(resp).await?.json().await?;
        Self::decode_one(wire)
    }
}
