//! services/api/src/web/protocol.rs
//!
//! Defines the JSON payloads exchanged between the dashboard client and the API server.
//! The core crate stays serialization-free; these types are the wire view of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use smart_city_core::{
    chat::EXAMPLE_PROMPTS,
    metrics::{City, HourlyEnergy, HourlyTraffic, MetricValue, TrafficSnapshot, WasteSnapshot},
    ChatTurn, FeedbackRecord, NewFeedback,
};
use utoipa::{IntoParams, ToSchema};

use crate::web::state::SessionContext;
use uuid::Uuid;

//=========================================================================================
// Sessions
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct CreateSessionRequest {
    /// One of `Citizen`, `City Planner` or `Administrator`.
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub role: String,
    /// The views this role may open, in navigation order.
    pub views: Vec<String>,
    pub example_prompts: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<SessionContext> for SessionResponse {
    fn from(ctx: SessionContext) -> Self {
        Self {
            session_id: ctx.session_id,
            role: ctx.role.label().to_string(),
            views: ctx.role.views().iter().map(|v| v.slug().to_string()).collect(),
            example_prompts: EXAMPLE_PROMPTS.iter().map(|p| p.to_string()).collect(),
            created_at: ctx.created_at,
        }
    }
}

//=========================================================================================
// Documents
//=========================================================================================

/// The outcome for one uploaded file. Exactly one of `summary`, `notice` or `error` is set.
#[derive(Serialize, Deserialize, Debug, Default, ToSchema)]
pub struct DocumentSummary {
    pub file_name: String,
    pub extracted_chars: usize,
    pub summary: Option<String>,
    /// Shown when the document had no text to summarize.
    pub notice: Option<String>,
    pub error: Option<String>,
    /// The extracted text, present only when the upload asked for `include_text`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SummarizeResponse {
    pub documents: Vec<DocumentSummary>,
}

//=========================================================================================
// Chat
//=========================================================================================

#[derive(Deserialize, Debug, ToSchema)]
pub struct ChatMessageRequest {
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ChatTurnDto {
    pub role: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl From<&ChatTurn> for ChatTurnDto {
    fn from(turn: &ChatTurn) -> Self {
        Self {
            role: turn.role.as_str().to_string(),
            content: turn.content.clone(),
            timestamp: turn.timestamp,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ChatReplyResponse {
    pub reply: ChatTurnDto,
    pub turn_count: usize,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TranscriptResponse {
    pub session_id: Uuid,
    pub turns: Vec<ChatTurnDto>,
}

//=========================================================================================
// Feedback
//=========================================================================================

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct FeedbackRequest {
    pub name: Option<String>,
    pub contact: Option<String>,
    #[serde(default)]
    pub category: String,
    pub location: Option<String>,
    #[serde(default)]
    pub description: String,
}

impl From<FeedbackRequest> for NewFeedback {
    fn from(req: FeedbackRequest) -> Self {
        NewFeedback {
            name: req.name,
            contact: req.contact,
            category: req.category,
            location: req.location,
            description: req.description,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct FeedbackDto {
    pub id: Uuid,
    pub citizen: String,
    pub contact: String,
    pub category: String,
    pub location: String,
    pub description: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<FeedbackRecord> for FeedbackDto {
    fn from(record: FeedbackRecord) -> Self {
        Self {
            id: record.id,
            citizen: record.citizen,
            contact: record.contact,
            category: record.category,
            location: record.location,
            description: record.description,
            status: record.status.to_string(),
            created_at: record.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct FeedbackListResponse {
    pub count: usize,
    pub records: Vec<FeedbackDto>,
}

#[derive(Deserialize, Debug, IntoParams)]
pub struct ListFeedbackQuery {
    /// Maximum number of records to return (default 20, at most 100).
    pub limit: Option<usize>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CategoriesResponse {
    pub categories: Vec<String>,
}

//=========================================================================================
// Dashboards
//=========================================================================================

#[derive(Deserialize, Debug, IntoParams)]
pub struct CityQuery {
    /// City name; defaults to New Delhi.
    pub city: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HourlyTrafficDto {
    pub hour: u8,
    pub congestion_pct: f64,
    pub average_speed_kmh: f64,
}

impl From<&HourlyTraffic> for HourlyTrafficDto {
    fn from(h: &HourlyTraffic) -> Self {
        Self {
            hour: h.hour,
            congestion_pct: h.congestion_pct,
            average_speed_kmh: h.average_speed_kmh,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, ToSchema)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct TrafficResponse {
    pub city: String,
    pub center: LatLon,
    pub vehicle_positions: Vec<LatLon>,
    pub hourly: Vec<HourlyTrafficDto>,
    pub simulated: bool,
}

impl TrafficResponse {
    pub fn new(city: City, snapshot: &TrafficSnapshot) -> Self {
        let (lat, lon) = city.coordinates();
        Self {
            city: city.name().to_string(),
            center: LatLon { lat, lon },
            vehicle_positions: snapshot
                .vehicle_positions
                .iter()
                .map(|&(lat, lon)| LatLon { lat, lon })
                .collect(),
            hourly: snapshot.hourly.iter().map(HourlyTrafficDto::from).collect(),
            simulated: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct MetricDto {
    pub value: f64,
    pub delta_pct: f64,
}

impl From<&MetricValue> for MetricDto {
    fn from(m: &MetricValue) -> Self {
        Self {
            value: m.value,
            delta_pct: m.delta_pct,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct WasteResponse {
    pub city: String,
    pub recycling_rate_pct: MetricDto,
    pub landfill_diversion_pct: MetricDto,
    pub tonnes_per_day: MetricDto,
    pub simulated: bool,
}

impl WasteResponse {
    pub fn new(city: City, snapshot: &WasteSnapshot) -> Self {
        Self {
            city: city.name().to_string(),
            recycling_rate_pct: (&snapshot.recycling_rate_pct).into(),
            landfill_diversion_pct: (&snapshot.landfill_diversion_pct).into(),
            tonnes_per_day: (&snapshot.tonnes_per_day).into(),
            simulated: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HourlyEnergyDto {
    pub hour: u8,
    pub consumption_mwh: f64,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct EnergyResponse {
    pub city: String,
    pub hourly: Vec<HourlyEnergyDto>,
    pub simulated: bool,
}

impl EnergyResponse {
    pub fn new(city: City, hourly: &[HourlyEnergy]) -> Self {
        Self {
            city: city.name().to_string(),
            hourly: hourly
                .iter()
                .map(|h| HourlyEnergyDto {
                    hour: h.hour,
                    consumption_mwh: h.consumption_mwh,
                })
                .collect(),
            simulated: true,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}
