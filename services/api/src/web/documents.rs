//! services/api/src/web/documents.rs
//!
//! Upload-and-summarize. Each uploaded file is extracted and summarized on its own;
//! one file failing does not affect the others.

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::Json,
    Extension,
};
use bytes::Bytes;
use smart_city_core::{extractor::has_content, UploadedDocument, View};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::{error, info};

use crate::web::{
    middleware::require_view,
    protocol::{DocumentSummary, SummarizeResponse},
    state::{AppState, SessionContext},
};

const GENERIC_BINARY: &str = "application/octet-stream";

/// Summarize one or more policy documents (TXT or PDF).
///
/// Accepts a multipart/form-data request with one or more `file` parts, an
/// optional `max_length` part capping the summary length in tokens and an
/// optional `include_text` part (`true`/`false`) that echoes the extracted text.
#[utoipa::path(
    post,
    path = "/documents/summaries",
    request_body(content_type = "multipart/form-data", description = "The documents to summarize."),
    responses(
        (status = 200, description = "One entry per uploaded document", body = SummarizeResponse),
        (status = 400, description = "Bad request (e.g., no file, invalid max_length or include_text)"),
        (status = 401, description = "Missing or unknown session"),
        (status = 403, description = "Role cannot use the summarizer")
    ),
    params(("x-session-id" = String, Header, description = "The session ID returned by POST /sessions."))
)]
pub async fn summarize_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(ctx): Extension<SessionContext>,
    mut multipart: Multipart,
) -> Result<Json<SummarizeResponse>, (StatusCode, String)> {
    require_view(&ctx, View::PolicySummarizer)?;

    let mut uploads = Vec::new();
    let mut max_length = None;
    let mut include_text = false;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            format!("Failed to read multipart data: {}", e),
        )
    })? {
        match field.name() {
            Some("max_length") => {
                let raw = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read max_length: {}", e))
                })?;
                max_length = Some(parse_max_length(&raw)?);
                continue;
            }
            Some("include_text") => {
                let raw = field.text().await.map_err(|e| {
                    (StatusCode::BAD_REQUEST, format!("Failed to read include_text: {}", e))
                })?;
                include_text = parse_flag(&raw)?;
                continue;
            }
            _ => {}
        }

        let Some(file_name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let declared_type = declared_type(field.content_type(), &file_name);
        let data: Bytes = field.bytes().await.map_err(|e| {
            (
                StatusCode::BAD_REQUEST,
                format!("Failed to read file bytes: {}", e),
            )
        })?;
        uploads.push(UploadedDocument::new(file_name, data.to_vec(), declared_type));
    }

    if uploads.is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            "Multipart form must include a file".to_string(),
        ));
    }

    let mut documents = Vec::with_capacity(uploads.len());
    for upload in uploads {
        let mut summary = summarize_one(&app_state, upload, max_length).await;
        if !include_text {
            summary.text = None;
        }
        documents.push(summary);
    }

    info!(session_id = %ctx.session_id, documents = documents.len(), "summary request handled");
    Ok(Json(SummarizeResponse { documents }))
}

async fn summarize_one(
    app_state: &AppState,
    upload: UploadedDocument,
    max_length: Option<NonZeroU32>,
) -> DocumentSummary {
    let file_name = upload.file_name.clone();
    let extractor = app_state.extractor.clone();

    // PDF parsing is CPU-bound; keep it off the async workers.
    let extracted = tokio::task::spawn_blocking(move || extractor.extract(&upload)).await;

    let text = match extracted {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            return DocumentSummary {
                file_name,
                error: Some(e.to_string()),
                ..DocumentSummary::default()
            }
        }
        Err(e) => {
            error!("extraction task for '{}' failed: {}", file_name, e);
            return DocumentSummary {
                file_name,
                error: Some("Internal error while reading the document".to_string()),
                ..DocumentSummary::default()
            };
        }
    };

    let extracted_chars = text.chars().count();
    if !has_content(&text) {
        return DocumentSummary {
            notice: Some(format!(
                "No extractable text was found in '{}', so there is nothing to summarize.",
                file_name
            )),
            file_name,
            extracted_chars,
            text: Some(text),
            ..DocumentSummary::default()
        };
    }

    let outcome = app_state
        .summarizer
        .summarize(&text, max_length.map(NonZeroU32::get))
        .await;
    match outcome {
        Ok(summary) => DocumentSummary {
            file_name,
            extracted_chars,
            summary: Some(summary),
            text: Some(text),
            ..DocumentSummary::default()
        },
        Err(e) => DocumentSummary {
            file_name,
            extracted_chars,
            error: Some(e.to_string()),
            text: Some(text),
            ..DocumentSummary::default()
        },
    }
}

fn parse_max_length(raw: &str) -> Result<NonZeroU32, (StatusCode, String)> {
    raw.trim().parse::<NonZeroU32>().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            format!("max_length must be a positive integer, got '{}'", raw.trim()),
        )
    })
}

fn parse_flag(raw: &str) -> Result<bool, (StatusCode, String)> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" | "" => Ok(false),
        other => Err((
            StatusCode::BAD_REQUEST,
            format!("include_text must be true or false, got '{}'", other),
        )),
    }
}

/// Prefers the part's content type; falls back to the file extension when the
/// client sent none or a generic binary type.
fn declared_type(content_type: Option<&str>, file_name: &str) -> String {
    match content_type {
        Some(ct) if !ct.eq_ignore_ascii_case(GENERIC_BINARY) => ct.to_string(),
        _ => file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_string())
            .unwrap_or_default(),
    }
}
