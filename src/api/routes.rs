use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use super::handlers::{health, ui};
use super::state::AppState;

/// Origins allowed to call the sidecar; it is only ever reached locally
const ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:1420",
    "http://localhost:5173",
    "http://127.0.0.1:1420",
    "http://127.0.0.1:5173",
];

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(ALLOWED_ORIGINS.map(HeaderValue::from_static))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any);

    Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Snapshot and lookup
        .route("/snapshot", get(ui::get_snapshot))
        .route("/find", post(ui::find_elements))
        .route("/nodes/:id", get(ui::get_node))
        // Actions
        .route("/actions", post(ui::perform_action))
        .route("/wait-for-idle", post(ui::wait_for_idle))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
