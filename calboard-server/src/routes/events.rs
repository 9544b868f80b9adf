//! Event endpoints

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};
use tracing::debug;

use calboard_core::{Event, EventDraft, EventError};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/{id}", put(update_event))
}

/// Unwrap a JSON body, turning framework rejections into validation errors.
fn draft_from(payload: Result<Json<EventDraft>, JsonRejection>) -> Result<EventDraft, EventError> {
    payload
        .map(|Json(draft)| draft)
        .map_err(|rejection| EventError::validation(rejection.body_text()))
}

/// GET /api/events - List all events
async fn list_events(State(state): State<AppState>) -> Result<Json<Vec<Event>>, AppError> {
    let events = state.store().list()?;
    debug!(count = events.len(), "listed events");
    Ok(Json(events))
}

/// POST /api/events - Create a new event
async fn create_event(
    State(state): State<AppState>,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>), AppError> {
    let fields = draft_from(payload)?.validate()?;
    let event = state.store().insert(fields)?;

    Ok((StatusCode::CREATED, Json(event)))
}

/// PUT /api/events/:id - Replace an event's fields
async fn update_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<EventDraft>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let fields = draft_from(payload)?.validate()?;
    let event = state.store().replace(&id, fields)?;

    Ok(Json(event))
}
