//! services/api/src/web/middleware.rs
//!
//! Session middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
};
use smart_city_core::View;
use std::sync::Arc;
use tracing::warn;
use uuid::Uuid;

use crate::web::state::{AppState, SessionContext};

pub const SESSION_HEADER: &str = "x-session-id";

/// Middleware that resolves the `x-session-id` header to a live session.
///
/// If valid, inserts a `SessionContext` into request extensions for handlers to use.
/// If invalid or missing, returns 401 Unauthorized.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    // 1. Extract and parse the session header
    let session_id = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| Uuid::parse_str(v.trim()).ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    // 2. Look the session up; the chat lock is never taken here
    let context = state.sessions.context(session_id).await.ok_or_else(|| {
        warn!(%session_id, "request for unknown session");
        StatusCode::UNAUTHORIZED
    })?;

    // 3. Hand the context to the handler
    req.extensions_mut().insert(context);
    Ok(next.run(req).await)
}

/// Fails with 403 unless the session's role may open `view`.
pub fn require_view(ctx: &SessionContext, view: View) -> Result<(), (StatusCode, String)> {
    if ctx.role.can(view) {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            format!("The {} role cannot access {}", ctx.role, view.slug()),
        ))
    }
}
