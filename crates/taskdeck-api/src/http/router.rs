//! Axum router configuration with middleware.
//!
//! All routes are under `/api/`.
//! Middleware: CORS, request tracing.

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

    let api_routes = Router::new()
        // Acting user
        .route("/users/me", get(handlers::user::me))
        // Tasks and categories
        .route(
            "/tasks",
            post(handlers::task::create_task).get(handlers::task::list_tasks),
        )
        .route(
            "/categories",
            post(handlers::task::create_category).get(handlers::task::list_categories),
        )
        // Conversations
        .route(
            "/conversations",
            post(handlers::conversation::create_conversation)
                .get(handlers::conversation::list_conversations),
        )
        .route(
            "/conversations/{id}",
            get(handlers::conversation::get_conversation),
        )
        // Messages (orchestration on POST with role "user")
        .route(
            "/messages",
            post(handlers::message::create_message).get(handlers::message::list_messages),
        )
        .route("/messages/{id}", get(handlers::message::get_message))
        // Streaming chat passthrough
        .route("/chat", post(handlers::chat::stream_chat));

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint (no auth required).
async fn health_check() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
