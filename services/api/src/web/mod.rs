pub mod chat;
pub mod dashboards;
pub mod documents;
pub mod feedback;
pub mod middleware;
pub mod protocol;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub use middleware::{require_session, SESSION_HEADER};
pub use state::AppState;

/// Builds the API router. Everything except health, session creation and the
/// feedback category list requires a live session.
pub fn router(app_state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    // Public routes (no session required)
    let public_routes = Router::new()
        .route("/health", get(rest::health_handler))
        .route("/sessions", post(rest::create_session_handler))
        .route("/feedback/categories", get(feedback::categories_handler));

    // Protected routes (session required)
    let protected_routes = Router::new()
        .route(
            "/sessions/current",
            get(rest::get_session_handler).delete(rest::end_session_handler),
        )
        .route("/documents/summaries", post(documents::summarize_handler))
        .route("/chat/messages", post(chat::send_message_handler))
        .route("/chat/transcript", get(chat::transcript_handler))
        .route("/chat/reset", post(chat::reset_handler))
        .route(
            "/feedback",
            post(feedback::submit_feedback_handler).get(feedback::list_feedback_handler),
        )
        .route("/dashboards/traffic", get(dashboards::traffic_handler))
        .route("/dashboards/waste", get(dashboards::waste_handler))
        .route("/dashboards/energy", get(dashboards::energy_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(app_state)
}
