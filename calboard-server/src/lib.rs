//! calboard HTTP server.
//!
//! Serves the events API over a pluggable `EventStore`:
//!
//! - `GET  /api/events`       list all events
//! - `POST /api/events`       create an event (201)
//! - `PUT  /api/events/{id}`  replace an event's fields (404 for unknown ids)
//!
//! Errors are always JSON `{"message": "..."}`.

pub mod routes;
pub mod singleton;
pub mod state;
pub mod store;

use axum::Router;
use axum::http::{Method, header};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use crate::state::AppState;

/// Build the application router with CORS and request tracing.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    Router::new()
        .merge(routes::events::router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}

/// Serve the app on an already-bound listener until the task is dropped.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, app(state)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::ErrorResponse;
    use crate::store::MemoryStore;
    use calboard_core::Event;
    use reqwest::StatusCode;
    use reqwest::header::ACCESS_CONTROL_ALLOW_ORIGIN;
    use serde_json::json;
    use tokio::task;

    async fn spawn_app() -> (String, task::JoinHandle<()>) {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = task::spawn(async move {
            serve(listener, AppState::new(MemoryStore::new())).await.unwrap();
        });
        (format!("http://{}/api/events", addr), handle)
    }

    fn run_body() -> serde_json::Value {
        json!({
            "title": "Run",
            "category": "exercise",
            "start": "2024-01-01T06:00:00.000Z",
            "end": "2024-01-01T07:00:00.000Z",
        })
    }

    async fn list(http: &reqwest::Client, url: &str) -> Vec<Event> {
        http.get(url).send().await.unwrap().json().await.unwrap()
    }

    #[tokio::test]
    async fn list_empty_store() {
        let (url, handle) = spawn_app().await;

        let resp = reqwest::get(&url).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, json!([]));

        handle.abort();
    }

    #[tokio::test]
    async fn create_returns_201_with_id() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let resp = http.post(&url).json(&run_body()).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: serde_json::Value = resp.json().await.unwrap();

        let id = body["id"].as_str().unwrap();
        assert!(!id.is_empty());
        for field in ["title", "category", "start", "end"] {
            assert_eq!(body[field], run_body()[field], "field {field}");
        }

        let events = list(&http, &url).await;
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, id);

        handle.abort();
    }

    #[tokio::test]
    async fn create_missing_title_is_400() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let mut body = run_body();
        body.as_object_mut().unwrap().remove("title");

        let resp = http.post(&url).json(&body).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert!(err.message.contains("title"));

        assert!(list(&http, &url).await.is_empty());
        handle.abort();
    }

    #[tokio::test]
    async fn create_unknown_category_is_400() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let mut body = run_body();
        body["category"] = json!("meeting");

        let resp = http.post(&url).json(&body).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(list(&http, &url).await.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn malformed_json_is_400_with_message() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let resp = http
            .post(&url)
            .header("content-type", "application/json")
            .body("{\"title\": ")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert!(!err.message.is_empty());

        handle.abort();
    }

    #[tokio::test]
    async fn update_shifts_times() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let created: Event = http
            .post(&url)
            .json(&run_body())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let moved = json!({
            "title": "Run",
            "category": "exercise",
            "start": "2024-01-01T07:00:00.000Z",
            "end": "2024-01-01T08:00:00.000Z",
        });
        let resp = http
            .put(format!("{}/{}", url, created.id))
            .json(&moved)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body["id"], json!(created.id));
        assert_eq!(body["title"], "Run");
        assert_eq!(body["category"], "exercise");
        assert_eq!(body["start"], "2024-01-01T07:00:00.000Z");
        assert_eq!(body["end"], "2024-01-01T08:00:00.000Z");

        handle.abort();
    }

    #[tokio::test]
    async fn update_unknown_category_is_400() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let created: Event = http
            .post(&url)
            .json(&run_body())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let mut body = run_body();
        body["category"] = json!("meeting");
        let resp = http
            .put(format!("{}/{}", url, created.id))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert!(err.message.contains("meeting"));

        assert_eq!(list(&http, &url).await, vec![created]);
        handle.abort();
    }

    #[tokio::test]
    async fn update_missing_field_is_400() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let created: Event = http
            .post(&url)
            .json(&run_body())
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();

        let mut body = run_body();
        body.as_object_mut().unwrap().remove("end");
        let resp = http
            .put(format!("{}/{}", url, created.id))
            .json(&body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert!(err.message.contains("end"));

        assert_eq!(list(&http, &url).await, vec![created]);
        handle.abort();
    }

    #[tokio::test]
    async fn update_unknown_id_is_404() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        http.post(&url).json(&run_body()).send().await.unwrap();

        let resp = http
            .put(format!("{}/missing", url))
            .json(&run_body())
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let err: ErrorResponse = resp.json().await.unwrap();
        assert!(err.message.contains("missing"));
        assert_eq!(list(&http, &url).await.len(), 1);

        handle.abort();
    }

    #[tokio::test]
    async fn cors_allows_any_origin() {
        let (url, handle) = spawn_app().await;
        let http = reqwest::Client::new();

        let resp = http
            .get(&url)
            .header("origin", "http://example.com")
            .send()
            .await
            .unwrap();
        assert_eq!(resp.headers().get(ACCESS_CONTROL_ALLOW_ORIGIN).unwrap(), "*");

        handle.abort();
    }
}
