//! crates/smart_city_core/src/feedback.rs
//!
//! Validates citizen feedback and appends it to the durable store.

use chrono::Utc;
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::{FeedbackRecord, FeedbackStatus, NewFeedback};
use crate::error::{CoreError, CoreResult};
use crate::ports::FeedbackRepository;

pub const FEEDBACK_CATEGORIES: [&str; 8] = [
    "General Feedback",
    "Water & Sanitation",
    "Roads & Infrastructure",
    "Environment & Green Spaces",
    "Public Safety",
    "Waste Management",
    "Energy",
    "Other",
];

pub const MIN_DESCRIPTION_CHARS: usize = 10;
pub const MAX_LIST_LIMIT: usize = 100;

const ANONYMOUS: &str = "Anonymous";
const NOT_PROVIDED: &str = "N/A";

#[derive(Clone)]
pub struct FeedbackStore {
    repository: Arc<dyn FeedbackRepository>,
}

impl FeedbackStore {
    pub fn new(repository: Arc<dyn FeedbackRepository>) -> Self {
        Self { repository }
    }

    /// Validates the form and inserts it as a new record.
    /// Nothing is written when validation fails.
    pub async fn submit(&self, feedback: NewFeedback) -> CoreResult<FeedbackRecord> {
        let record = validate(feedback)?;

        self.repository.insert(&record).await.map_err(|e| {
            error!("failed to store feedback {}: {}", record.id, e);
            CoreError::persistence(e)
        })?;

        info!(id = %record.id, category = %record.category, "feedback recorded");
        Ok(record)
    }

    /// The newest records first, at most `limit` of them.
    pub async fn list_recent(&self, limit: usize) -> CoreResult<Vec<FeedbackRecord>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        self.repository
            .list_recent(limit.min(MAX_LIST_LIMIT))
            .await
            .map_err(CoreError::persistence)
    }
}

fn validate(feedback: NewFeedback) -> CoreResult<FeedbackRecord> {
    let category = feedback.category.trim();
    if category.is_empty() {
        return Err(CoreError::Validation("a category is required".to_string()));
    }
    let category = FEEDBACK_CATEGORIES
        .iter()
        .find(|known| known.eq_ignore_ascii_case(category))
        .ok_or_else(|| CoreError::Validation(format!("unknown category '{}'", category)))?;

    let description = feedback.description.trim();
    if description.is_empty() {
        return Err(CoreError::Validation("a description is required".to_string()));
    }
    if description.chars().count() < MIN_DESCRIPTION_CHARS {
        return Err(CoreError::Validation(format!(
            "please provide a detailed description (at least {} characters)",
            MIN_DESCRIPTION_CHARS
        )));
    }

    Ok(FeedbackRecord {
        id: Uuid::new_v4(),
        citizen: or_default(feedback.name, ANONYMOUS),
        contact: or_default(feedback.contact, NOT_PROVIDED),
        category: category.to_string(),
        location: or_default(feedback.location, NOT_PROVIDED),
        description: description.to_string(),
        status: FeedbackStatus::Open,
        created_at: Utc::now(),
    })
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}
