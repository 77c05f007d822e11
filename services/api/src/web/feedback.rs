//! services/api/src/web/feedback.rs
//!
//! Citizen feedback submission and the administrator's review list.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use smart_city_core::{feedback::FEEDBACK_CATEGORIES, View};
use std::sync::Arc;

use crate::web::{
    middleware::require_view,
    protocol::{CategoriesResponse, FeedbackDto, FeedbackListResponse, FeedbackRequest, ListFeedbackQuery},
    rest::error_response,
    state::{AppState, SessionContext},
};

const DEFAULT_LIST_LIMIT: usize = 20;

/// Report an issue or leave feedback.
#[utoipa::path(
    post,
    path = "/feedback",
    request_body = FeedbackRequest,
    responses(
        (status = 201, description = "Feedback recorded", body = FeedbackDto),
        (status = 400, description = "Missing category or description"),
        (status = 503, description = "The feedback store is unavailable")
    ),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn submit_feedback_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Json(req): Json<FeedbackRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    require_view(&ctx, View::CitizenFeedback)?;

    let record = app_state
        .feedback
        .submit(req.into())
        .await
        .map_err(error_response)?;

    Ok((StatusCode::CREATED, Json(FeedbackDto::from(record))))
}

/// The most recent feedback records, newest first. Administrators only.
#[utoipa::path(
    get,
    path = "/feedback",
    responses(
        (status = 200, description = "Recent feedback", body = FeedbackListResponse),
        (status = 403, description = "Role cannot review feedback")
    ),
    params(
        ListFeedbackQuery,
        ("x-session-id" = String, Header, description = "The session ID returned by POST /sessions.")
    )
)]
pub async fn list_feedback_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    Query(query): Query<ListFeedbackQuery>,
) -> Result<Json<FeedbackListResponse>, (StatusCode, String)> {
    require_view(&ctx, View::FeedbackReview)?;

    let records = app_state
        .feedback
        .list_recent(query.limit.unwrap_or(DEFAULT_LIST_LIMIT))
        .await
        .map_err(error_response)?;

    Ok(Json(FeedbackListResponse {
        count: records.len(),
        records: records.into_iter().map(FeedbackDto::from).collect(),
    }))
}

#[utoipa::path(
    get,
    path = "/feedback/categories",
    responses((status = 200, description = "Categories accepted by the form", body = CategoriesResponse))
)]
pub async fn categories_handler() -> Json<CategoriesResponse> {
    Json(CategoriesResponse {
        categories: FEEDBACK_CATEGORIES.iter().map(|c| c.to_string()).collect(),
    })
}
