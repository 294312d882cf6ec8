//! The HTTP boundary: one action endpoint, screenshot retrieval, liveness.
//!
//! Deliberately thin. Every recovered failure is an HTTP 200 with
//! `success: false`; callers branch on the result body, not the status.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::debug;

use webstage_browser::{Dispatcher, ScreenshotStore, SessionManager};
use webstage_protocols::{ActionRequest, ActionResult};

/// Shared server state.
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub session: Arc<SessionManager>,
    pub store: Arc<ScreenshotStore>,
}

/// Build the router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/action", post(submit_action))
        .route("/screenshots/{name}", get(get_screenshot))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Execute one action and return its result envelope.
async fn submit_action(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ActionRequest>,
) -> Json<ActionResult> {
    debug!(action = %request.action, "action received");
    Json(state.dispatcher.dispatch(request).await)
}

/// Serve a previously captured screenshot by name.
async fn get_screenshot(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    let Some(path) = state.store.resolve(&name) else {
        return (StatusCode::NOT_FOUND, "screenshot not found").into_response();
    };
    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "image/png")], bytes).into_response(),
        Err(_) => (StatusCode::NOT_FOUND, "screenshot not found").into_response(),
    }
}

/// Liveness probe: whether a browser session with an open page exists.
async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(json!({
        "ok": true,
        "session_active": state.session.is_available().await,
    }))
}
