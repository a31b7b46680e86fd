//! HTTP surface for hosting file input controls.

pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use handlers::AppState;

/// Build the service router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Stateless validation
        .route("/validate", post(handlers::validate_files))
        // Hosted controls
        .route("/controls", post(handlers::create_control))
        .route(
            "/controls/:control_id",
            get(handlers::get_control)
                .patch(handlers::update_control)
                .delete(handlers::delete_control),
        )
        .route("/controls/:control_id/selection", post(handlers::select_files))
        .route("/controls/:control_id/reset", post(handlers::reset_control))
        // State
        .with_state(state)
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
