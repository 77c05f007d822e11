//! services/api/src/web/chat.rs
//!
//! Handlers for the city assistant chat. The transcript lives in the caller's session.

use axum::{extract::State, http::StatusCode, response::Json, Extension};
use smart_city_core::View;
use std::sync::Arc;

use crate::web::{
    middleware::require_view,
    protocol::{ChatMessageRequest, ChatReplyResponse, ChatTurnDto, TranscriptResponse},
    rest::{error_response, session_gone},
    state::{AppState, SessionContext},
};

/// Send a message to the assistant and get its reply.
///
/// If the generation endpoint fails the message stays in the transcript without a
/// reply, and the error is returned so the user can try again.
#[utoipa::path(
    post,
    path = "/chat/messages",
    request_body = ChatMessageRequest,
    responses(
        (status = 200, description = "The assistant's reply", body = ChatReplyResponse),
        (status = 422, description = "Empty message"),
        (status = 502, description = "The generation endpoint failed")
    ),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn send_message_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Json(req): Json<ChatMessageRequest>,
) -> Result<Json<ChatReplyResponse>, (StatusCode, String)> {
    require_view(&ctx, View::ChatAssistant)?;

    let session = app_state
        .sessions
        .get(ctx.session_id)
        .await
        .ok_or_else(session_gone)?;
    let mut session = session.lock().await;

    let reply = session
        .append_and_respond(app_state.generator.as_ref(), &req.message)
        .await
        .map_err(error_response)?;

    Ok(Json(ChatReplyResponse {
        reply: ChatTurnDto::from(&reply),
        turn_count: session.transcript().len(),
    }))
}

#[utoipa::path(
    get,
    path = "/chat/transcript",
    responses((status = 200, description = "All turns, oldest first", body = TranscriptResponse)),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn transcript_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<Json<TranscriptResponse>, (StatusCode, String)> {
    require_view(&ctx, View::ChatAssistant)?;

    let session = app_state
        .sessions
        .get(ctx.session_id)
        .await
        .ok_or_else(session_gone)?;
    let session = session.lock().await;

    Ok(Json(TranscriptResponse {
        session_id: session.id,
        turns: session.transcript().iter().map(ChatTurnDto::from).collect(),
    }))
}

/// Clear the chat history while keeping the session.
#[utoipa::path(
    post,
    path = "/chat/reset",
    responses((status = 204, description = "Transcript cleared")),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn reset_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<StatusCode, (StatusCode, String)> {
    require_view(&ctx, View::ChatAssistant)?;

    if app_state.sessions.reset(ctx.session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_gone())
    }
}
