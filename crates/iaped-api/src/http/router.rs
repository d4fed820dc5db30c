//! Axum router configuration with middleware.
//!
//! Middleware: CORS, request tracing. `/chat/history` is registered as a
//! literal route so it wins over `/chat/{id}`.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete API router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/chat",
            post(handlers::chat::open_session).get(handlers::chat::list_sessions),
        )
        .route(
            "/chat/history",
            get(handlers::history::list_session_summaries),
        )
        .route("/chat/{id}", get(handlers::chat::get_session))
        .route("/chat/{id}/send", post(handlers::chat::send_message))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no identity required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
