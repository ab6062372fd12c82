use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::logger::{self, LogTag};
use crate::relay::{ConnectionId, HubMetricsSnapshot};
use crate::webserver::state::AppState;

// =============================================================================
// RESPONSE TYPES
// =============================================================================

pub const SHUTDOWN_REPLY: &str = "Server shutting down...";

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub timestamp: String,
    pub uptime_seconds: i64,
    pub active_connections: usize,
    pub connection_ids: Vec<ConnectionId>,
    pub metrics: HubMetricsSnapshot,
}

// =============================================================================
// ROUTES
// =============================================================================

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/shutdown", post(shutdown_handler))
        .route("/status", get(status_handler))
}

/// Acknowledge, then stop the server after the configured delay
async fn shutdown_handler(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    logger::info(LogTag::Webserver, "Shutdown requested over HTTP");

    let notify = state.shutdown.clone();
    let delay = state.shutdown_delay;
    tokio::spawn(async move {
        tokio::time::sleep(delay).await;
        notify.notify_one();
    });

    (StatusCode::OK, SHUTDOWN_REPLY)
}

/// Live membership and counters, read through the hub's event loop
async fn status_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.hub.snapshot().await {
        Ok(snapshot) => Json(StatusResponse {
            timestamp: Utc::now().to_rfc3339(),
            uptime_seconds: state.uptime_seconds(),
            active_connections: snapshot.active_connections,
            connection_ids: snapshot.connection_ids,
            metrics: state.hub.metrics(),
        })
        .into_response(),
        Err(e) => {
            logger::error(LogTag::Webserver, &format!("Status unavailable: {}", e));
            (StatusCode::SERVICE_UNAVAILABLE, e.to_string()).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HubConfig;
    use crate::relay::{Hub, Message};
    use crate::webserver::routes::create_router;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use std::time::Duration;
    use tokio::sync::Notify;
    use tower::ServiceExt;

    fn test_state(delay: Duration) -> Arc<AppState> {
        let hub = Hub::spawn(&HubConfig::default());
        Arc::new(AppState::new(hub, Arc::new(Notify::new()), delay))
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_shutdown_replies_then_notifies() {
        let state = test_state(Duration::from_millis(20));
        let app = create_router(state.clone());

        let response = app.oneshot(request(Method::POST, "/shutdown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&body[..], SHUTDOWN_REPLY.as_bytes());

        tokio::time::timeout(Duration::from_secs(2), state.shutdown.notified())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_shutdown_rejects_get() {
        let app = create_router(test_state(Duration::ZERO));
        let response = app.oneshot(request(Method::GET, "/shutdown")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_status_reports_hub_state() {
        let state = test_state(Duration::ZERO);
        let id = state.hub.next_connection_id();
        let (sender, _queue) = state.hub.peer_queue();
        state.hub.register(id, sender).await.unwrap();
        state.hub.broadcast(Message::update("x")).await.unwrap();

        let app = create_router(state);
        let response = app.oneshot(request(Method::GET, "/status")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["active_connections"], 1);
        assert_eq!(json["connection_ids"][0], id);
        assert_eq!(json["metrics"]["broadcasts"], 1);
        assert_eq!(json["metrics"]["messages_delivered"], 1);
    }
}
