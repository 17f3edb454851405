use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::state::AppState;

/// Create the HTTP router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Capture control
        .route("/capture/start", post(handlers::start_capture))
        .route("/capture/stop", post(handlers::stop_capture))
        .route("/capture/status", get(handlers::capture_status))
        // Chat persistence proxy (CORS-open so a browser client can skip
        // talking to the upstream directly)
        .route("/chats", get(handlers::get_chats).post(handlers::save_chats))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
