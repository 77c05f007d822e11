//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for sessions and health, the mapping from core errors
//! to HTTP responses, and the master definition for the OpenAPI specification.

use crate::web::{
    chat, dashboards, documents, feedback,
    protocol::{
        CategoriesResponse, ChatMessageRequest, ChatReplyResponse, ChatTurnDto, CreateSessionRequest,
        DocumentSummary, EnergyResponse, FeedbackDto, FeedbackListResponse, FeedbackRequest,
        HealthResponse, HourlyEnergyDto, HourlyTrafficDto, LatLon, MetricDto, SessionResponse,
        SummarizeResponse, TrafficResponse, TranscriptResponse, WasteResponse,
    },
    state::{AppState, SessionContext},
};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use smart_city_core::{CoreError, Role};
use std::sync::Arc;
use tracing::warn;
use utoipa::OpenApi;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        create_session_handler,
        get_session_handler,
        end_session_handler,
        documents::summarize_handler,
        chat::send_message_handler,
        chat::transcript_handler,
        chat::reset_handler,
        feedback::submit_feedback_handler,
        feedback::list_feedback_handler,
        feedback::categories_handler,
        dashboards::traffic_handler,
        dashboards::waste_handler,
        dashboards::energy_handler,
    ),
    components(
        schemas(
            HealthResponse, CreateSessionRequest, SessionResponse, DocumentSummary,
            SummarizeResponse, ChatMessageRequest, ChatTurnDto, ChatReplyResponse,
            TranscriptResponse, FeedbackRequest, FeedbackDto, FeedbackListResponse,
            CategoriesResponse, LatLon, HourlyTrafficDto, TrafficResponse, MetricDto,
            WasteResponse, HourlyEnergyDto, EnergyResponse
        )
    ),
    tags(
        (name = "Smart City Assistant API", description = "Policy summaries, city assistant chat, dashboards and citizen feedback.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Mapping
//=========================================================================================

/// Turns a core failure into the status and message shown to the user.
pub fn error_response(err: CoreError) -> (StatusCode, String) {
    let status = match &err {
        CoreError::UnsupportedFormat(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        CoreError::ExtractionFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::DecodeError(_) => StatusCode::BAD_REQUEST,
        CoreError::EmptyInput(_) => StatusCode::UNPROCESSABLE_ENTITY,
        CoreError::Upstream(_) => StatusCode::BAD_GATEWAY,
        CoreError::Validation(_) => StatusCode::BAD_REQUEST,
        CoreError::Persistence(_) => StatusCode::SERVICE_UNAVAILABLE,
    };
    if status.is_server_error() {
        warn!("request failed upstream: {}", err);
    }
    (status, err.to_string())
}

pub(crate) fn session_gone() -> (StatusCode, String) {
    (StatusCode::UNAUTHORIZED, "The session has ended".to_string())
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

/// Start a dashboard session for a role.
///
/// The role is resolved once here and decides which views the session may use.
#[utoipa::path(
    post,
    path = "/sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 201, description = "Session created successfully", body = SessionResponse),
        (status = 400, description = "Unknown role")
    )
)]
pub async fn create_session_handler(
    State(app_state): State<Arc<AppState>>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let role = req
        .role
        .parse::<Role>()
        .map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let context = app_state.sessions.create(role).await;
    Ok((StatusCode::CREATED, Json(SessionResponse::from(context))))
}

#[utoipa::path(
    get,
    path = "/sessions/current",
    responses(
        (status = 200, description = "The current session", body = SessionResponse),
        (status = 401, description = "Missing or unknown session")
    ),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn get_session_handler(Extension(ctx): Extension<SessionContext>) -> Json<SessionResponse> {
    Json(SessionResponse::from(ctx))
}

/// End the session and discard its chat transcript.
#[utoipa::path(
    delete,
    path = "/sessions/current",
    responses(
        (status = 204, description = "Session ended"),
        (status = 401, description = "Missing or unknown session")
    ),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn end_session_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
) -> Result<StatusCode, (StatusCode, String)> {
    if app_state.sessions.destroy(ctx.session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(session_gone())
    }
}
