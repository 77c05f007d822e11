//! Router-level tests for the Smart City Assistant API.
//!
//! Each test builds its own router on top of fake generation and PDF adapters and
//! the in-memory feedback store, then drives it with `tower::ServiceExt::oneshot`.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use api_lib::adapters::InMemoryFeedbackAdapter;
use api_lib::web::protocol::{
    ChatReplyResponse, FeedbackDto, FeedbackListResponse, SessionResponse, SummarizeResponse,
    TrafficResponse, TranscriptResponse,
};
use api_lib::web::{router, AppState, SESSION_HEADER};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde::de::DeserializeOwned;
use smart_city_core::domain::GenerationParams;
use smart_city_core::ports::{PageExtractor, PortError, PortResult, TextGenerationService};
use tokio::sync::Notify;
use tower::ServiceExt;
use uuid::Uuid;

// =============================================================================
// Fakes
// =============================================================================

#[derive(Default)]
struct ScriptedGenerator {
    replies: Mutex<VecDeque<PortResult<String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedGenerator {
    fn new(replies: Vec<PortResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl TextGenerationService for ScriptedGenerator {
    async fn generate(&self, prompt: &str, _params: &GenerationParams) -> PortResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unavailable("no reply scripted".to_string())))
    }
}

/// Never answers; signals once a request has reached it.
#[derive(Default)]
struct StalledGenerator {
    reached: Notify,
}

#[async_trait]
impl TextGenerationService for StalledGenerator {
    async fn generate(&self, _prompt: &str, _params: &GenerationParams) -> PortResult<String> {
        self.reached.notify_one();
        std::future::pending().await
    }
}

struct StaticPages(Vec<&'static str>);

impl PageExtractor for StaticPages {
    fn extract_pages(&self, _bytes: &[u8]) -> PortResult<Vec<String>> {
        Ok(self.0.iter().map(|p| p.to_string()).collect())
    }
}

// =============================================================================
// Helpers
// =============================================================================

struct TestApp {
    router: Router,
    generator: Arc<ScriptedGenerator>,
    feedback: Arc<InMemoryFeedbackAdapter>,
}

fn make_app(replies: Vec<PortResult<String>>, pages: Vec<&'static str>) -> TestApp {
    let generator = Arc::new(ScriptedGenerator::new(replies));
    let feedback = Arc::new(InMemoryFeedbackAdapter::new());
    let state = Arc::new(AppState::new(
        generator.clone(),
        Arc::new(StaticPages(pages)),
        feedback.clone(),
    ));
    TestApp {
        router: router(state, 1024 * 1024),
        generator,
        feedback,
    }
}

fn ok(text: &str) -> PortResult<String> {
    Ok(text.to_string())
}

async fn send(app: &TestApp, request: Request<Body>) -> axum::response::Response {
    app.router.clone().oneshot(request).await.unwrap()
}

async fn json_body<T: DeserializeOwned>(resp: axum::response::Response) -> T {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn text_body(resp: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn post_json(uri: &str, session: Option<Uuid>, json: &str) -> Request<Body> {
    let mut builder = Request::post(uri).header("content-type", "application/json");
    if let Some(id) = session {
        builder = builder.header(SESSION_HEADER, id.to_string());
    }
    builder.body(Body::from(json.to_string())).unwrap()
}

fn get(uri: &str, session: Uuid) -> Request<Body> {
    Request::get(uri)
        .header(SESSION_HEADER, session.to_string())
        .body(Body::empty())
        .unwrap()
}

const BOUNDARY: &str = "smart-city-test-boundary";

fn upload(session: Uuid, files: &[(&str, &str, &[u8])], max_length: Option<&str>) -> Request<Body> {
    match max_length {
        Some(max) => upload_form(session, files, &[("max_length", max)]),
        None => upload_form(session, files, &[]),
    }
}

/// Builds a multipart upload from (file name, content type, bytes) parts plus
/// plain (name, value) fields.
fn upload_form(session: Uuid, files: &[(&str, &str, &[u8])], fields: &[(&str, &str)]) -> Request<Body> {
    let mut body = Vec::new();
    for (name, content_type, bytes) in files {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n").as_bytes(),
        );
        body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    for (name, value) in fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        body.extend_from_slice(format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes());
        body.extend_from_slice(value.as_bytes());
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::post("/documents/summaries")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .header(SESSION_HEADER, session.to_string())
        .body(Body::from(body))
        .unwrap()
}

async fn start_session(app: &TestApp, role: &str) -> SessionResponse {
    let resp = send(app, post_json("/sessions", None, &format!(r#"{{"role":"{role}"}}"#))).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    json_body(resp).await
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_health_is_public() {
    let app = make_app(vec![], vec![]);
    let resp = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_session_lists_role_views() {
    let app = make_app(vec![], vec![]);

    let citizen = start_session(&app, "Citizen").await;
    assert_eq!(citizen.role, "Citizen");
    assert!(citizen.views.contains(&"citizen_feedback".to_string()));
    assert!(!citizen.views.contains(&"feedback_review".to_string()));
    assert_eq!(citizen.example_prompts.len(), 3);

    let admin = start_session(&app, "administrator").await;
    assert!(admin.views.contains(&"feedback_review".to_string()));
}

#[tokio::test]
async fn test_unknown_role_is_rejected() {
    let app = make_app(vec![], vec![]);
    let resp = send(&app, post_json("/sessions", None, r#"{"role":"mayor"}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_need_a_live_session() {
    let app = make_app(vec![], vec![]);

    let resp = send(&app, Request::get("/chat/transcript").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = send(&app, get("/chat/transcript", Uuid::new_v4())).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_ended_session_is_gone() {
    let app = make_app(vec![], vec![]);
    let session = start_session(&app, "Citizen").await;

    let delete = Request::delete("/sessions/current")
        .header(SESSION_HEADER, session.session_id.to_string())
        .body(Body::empty())
        .unwrap();
    assert_eq!(send(&app, delete).await.status(), StatusCode::NO_CONTENT);

    let resp = send(&app, get("/sessions/current", session.session_id)).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Chat
// =============================================================================

#[tokio::test]
async fn test_chat_keeps_ordered_transcript() {
    let app = make_app(vec![ok("reply1"), ok("reply2")], vec![]);
    let session = start_session(&app, "City Planner").await.session_id;

    let resp = send(&app, post_json("/chat/messages", Some(session), r#"{"message":"A"}"#)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let first: ChatReplyResponse = json_body(resp).await;
    assert_eq!(first.reply.content, "reply1");
    assert_eq!(first.turn_count, 2);

    let resp = send(&app, post_json("/chat/messages", Some(session), r#"{"message":"B"}"#)).await;
    let second: ChatReplyResponse = json_body(resp).await;
    assert_eq!(second.turn_count, 4);

    let transcript: TranscriptResponse = json_body(send(&app, get("/chat/transcript", session)).await).await;
    let turns: Vec<(&str, &str)> = transcript
        .turns
        .iter()
        .map(|t| (t.role.as_str(), t.content.as_str()))
        .collect();
    assert_eq!(
        turns,
        [("user", "A"), ("assistant", "reply1"), ("user", "B"), ("assistant", "reply2")]
    );
}

#[tokio::test]
async fn test_chat_failure_keeps_user_turn() {
    let app = make_app(
        vec![ok("reply1"), Err(PortError::Rejected("quota exceeded".to_string()))],
        vec![],
    );
    let session = start_session(&app, "Citizen").await.session_id;

    send(&app, post_json("/chat/messages", Some(session), r#"{"message":"A"}"#)).await;
    let resp = send(&app, post_json("/chat/messages", Some(session), r#"{"message":"B"}"#)).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(text_body(resp).await.contains("quota exceeded"));

    let transcript: TranscriptResponse = json_body(send(&app, get("/chat/transcript", session)).await).await;
    assert_eq!(transcript.turns.len(), 3);
    assert_eq!(transcript.turns[2].role, "user");
    assert_eq!(transcript.turns[2].content, "B");
}

#[tokio::test]
async fn test_pending_chat_reply_does_not_block_other_routes() {
    let generator = Arc::new(StalledGenerator::default());
    let state = Arc::new(AppState::new(
        generator.clone(),
        Arc::new(StaticPages(vec![])),
        Arc::new(InMemoryFeedbackAdapter::new()),
    ));
    let app = router(state, 1024 * 1024);

    let resp = app
        .clone()
        .oneshot(post_json("/sessions", None, r#"{"role":"Citizen"}"#))
        .await
        .unwrap();
    let session: SessionResponse = json_body(resp).await;
    let id = session.session_id;

    let chat = tokio::spawn(
        app.clone()
            .oneshot(post_json("/chat/messages", Some(id), r#"{"message":"Is the metro running?"}"#)),
    );
    generator.reached.notified().await;

    let dashboard = tokio::time::timeout(
        Duration::from_secs(2),
        app.clone().oneshot(get("/dashboards/energy", id)),
    )
    .await
    .expect("dashboard waited on the pending chat reply")
    .unwrap();
    assert_eq!(dashboard.status(), StatusCode::OK);

    let current = tokio::time::timeout(
        Duration::from_secs(2),
        app.clone().oneshot(get("/sessions/current", id)),
    )
    .await
    .expect("session lookup waited on the pending chat reply")
    .unwrap();
    assert_eq!(current.status(), StatusCode::OK);

    let delete = Request::delete("/sessions/current")
        .header(SESSION_HEADER, id.to_string())
        .body(Body::empty())
        .unwrap();
    let ended = tokio::time::timeout(Duration::from_secs(2), app.clone().oneshot(delete))
        .await
        .expect("ending the session waited on the pending chat reply")
        .unwrap();
    assert_eq!(ended.status(), StatusCode::NO_CONTENT);

    let after = app.clone().oneshot(get("/dashboards/energy", id)).await.unwrap();
    assert_eq!(after.status(), StatusCode::UNAUTHORIZED);
    chat.abort();
}

#[tokio::test]
async fn test_chat_transcript_keeps_message_as_sent() {
    let app = make_app(vec![ok("Yes, until midnight.")], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;

    send(
        &app,
        post_json("/chat/messages", Some(session), r#"{"message":"  Is the metro running?\n"}"#),
    )
    .await;

    let transcript: TranscriptResponse = json_body(send(&app, get("/chat/transcript", session)).await).await;
    assert_eq!(transcript.turns[0].content, "  Is the metro running?\n");
}

#[tokio::test]
async fn test_chat_reset_and_session_isolation() {
    let app = make_app(vec![ok("hello"), ok("hi there")], vec![]);
    let first = start_session(&app, "Citizen").await.session_id;
    let second = start_session(&app, "Citizen").await.session_id;

    send(&app, post_json("/chat/messages", Some(first), r#"{"message":"hey"}"#)).await;
    send(&app, post_json("/chat/messages", Some(second), r#"{"message":"yo"}"#)).await;

    let reset = send(&app, post_json("/chat/reset", Some(first), "{}")).await;
    assert_eq!(reset.status(), StatusCode::NO_CONTENT);

    let cleared: TranscriptResponse = json_body(send(&app, get("/chat/transcript", first)).await).await;
    let untouched: TranscriptResponse = json_body(send(&app, get("/chat/transcript", second)).await).await;
    assert!(cleared.turns.is_empty());
    assert_eq!(untouched.turns.len(), 2);
}

// =============================================================================
// Documents
// =============================================================================

#[tokio::test]
async fn test_text_document_is_summarized() {
    let app = make_app(vec![ok("- Bike lanes on every arterial road")], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;

    let resp = send(
        &app,
        upload(session, &[("policy.txt", "text/plain", b"The city will add bike lanes.")], Some("120")),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: SummarizeResponse = json_body(resp).await;

    assert_eq!(body.documents.len(), 1);
    let doc = &body.documents[0];
    assert_eq!(doc.file_name, "policy.txt");
    assert_eq!(doc.summary.as_deref(), Some("- Bike lanes on every arterial road"));
    assert_eq!(doc.extracted_chars, 29);
    assert!(app.generator.prompts.lock().unwrap()[0].contains("The city will add bike lanes."));
}

#[tokio::test]
async fn test_empty_document_gets_a_notice_without_a_call() {
    let app = make_app(vec![], vec!["", ""]);
    let session = start_session(&app, "Citizen").await.session_id;

    let resp = send(
        &app,
        upload(
            session,
            &[("blank.txt", "text/plain", b"   \n"), ("scan.pdf", "application/pdf", b"%PDF-1.4")],
            None,
        ),
    )
    .await;
    let body: SummarizeResponse = json_body(resp).await;

    assert_eq!(body.documents.len(), 2);
    for doc in &body.documents {
        assert!(doc.notice.is_some(), "{} should carry a notice", doc.file_name);
        assert!(doc.summary.is_none() && doc.error.is_none());
    }
    assert_eq!(app.generator.call_count(), 0);
}

#[tokio::test]
async fn test_pdf_pages_reach_the_prompt_in_order() {
    let app = make_app(vec![ok("summary")], vec!["Section 1: Water", "Section 2: Energy"]);
    let session = start_session(&app, "Administrator").await.session_id;

    let resp = send(&app, upload(session, &[("plan.pdf", "application/octet-stream", b"%PDF")], None)).await;
    let body: SummarizeResponse = json_body(resp).await;

    assert_eq!(body.documents[0].summary.as_deref(), Some("summary"));
    let prompt = app.generator.prompts.lock().unwrap()[0].clone();
    assert!(prompt.contains("Section 1: Water\n\nSection 2: Energy"));
}

#[tokio::test]
async fn test_bad_documents_are_reported_per_file() {
    let app = make_app(vec![ok("fine")], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;

    let resp = send(
        &app,
        upload(
            session,
            &[
                ("slides.pptx", "application/vnd.ms-powerpoint", b"PK"),
                ("broken.txt", "text/plain", &[0xff, 0xfe, 0x00]),
                ("good.txt", "text/plain", b"Green roofs are mandatory."),
            ],
            None,
        ),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: SummarizeResponse = json_body(resp).await;

    assert!(body.documents[0].error.as_deref().unwrap().contains("Unsupported"));
    assert!(body.documents[1].error.as_deref().unwrap().contains("UTF-8"));
    assert_eq!(body.documents[2].summary.as_deref(), Some("fine"));
    assert_eq!(app.generator.call_count(), 1);
}

#[tokio::test]
async fn test_zero_max_length_is_rejected() {
    let app = make_app(vec![ok("unused")], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;

    let resp = send(
        &app,
        upload(session, &[("policy.txt", "text/plain", b"Parking fees rise in May.")], Some("0")),
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(text_body(resp).await.contains("positive integer"));
    assert_eq!(app.generator.call_count(), 0);
}

#[tokio::test]
async fn test_extracted_text_is_returned_only_on_request() {
    let app = make_app(vec![ok("first"), ok("second")], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;
    let files: &[(&str, &str, &[u8])] = &[("policy.txt", "text/plain", b"Parking fees rise in May.")];

    let plain: SummarizeResponse = json_body(send(&app, upload(session, files, None)).await).await;
    assert!(plain.documents[0].text.is_none());

    let request = upload_form(session, files, &[("include_text", "true")]);
    let echoed: SummarizeResponse = json_body(send(&app, request).await).await;
    assert_eq!(echoed.documents[0].summary.as_deref(), Some("second"));
    assert_eq!(echoed.documents[0].text.as_deref(), Some("Parking fees rise in May."));
}

#[tokio::test]
async fn test_upload_without_file_is_bad_request() {
    let app = make_app(vec![], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;
    let resp = send(&app, upload(session, &[], Some("100"))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Feedback
// =============================================================================

fn feedback_json(description: &str) -> String {
    serde_json::json!({
        "name": "Asha",
        "category": "Water & Sanitation",
        "location": "Sector 9",
        "description": description,
    })
    .to_string()
}

#[tokio::test]
async fn test_feedback_without_description_is_not_stored() {
    let app = make_app(vec![], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;

    let resp = send(&app, post_json("/feedback", Some(session), &feedback_json(""))).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(app.feedback.is_empty().await);
}

#[tokio::test]
async fn test_feedback_review_lists_newest_first() {
    let app = make_app(vec![], vec![]);
    let citizen = start_session(&app, "Citizen").await.session_id;
    let admin = start_session(&app, "Administrator").await.session_id;

    let mut ids = Vec::new();
    for description in ["Leaking main on 3rd street", "No water since Monday", "Sewage overflow near school"] {
        let resp = send(&app, post_json("/feedback", Some(citizen), &feedback_json(description))).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let record: FeedbackDto = json_body(resp).await;
        assert_eq!(record.status, "open");
        assert_eq!(record.contact, "N/A");
        ids.push(record.id);
    }

    let resp = send(&app, get("/feedback?limit=2", admin)).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let list: FeedbackListResponse = json_body(resp).await;
    assert_eq!(list.count, 2);
    assert_eq!(list.records[0].id, ids[2]);
    assert_eq!(list.records[1].id, ids[1]);
}

#[tokio::test]
async fn test_citizens_cannot_review_feedback() {
    let app = make_app(vec![], vec![]);
    let citizen = start_session(&app, "Citizen").await.session_id;
    let resp = send(&app, get("/feedback", citizen)).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_feedback_categories_are_public() {
    let app = make_app(vec![], vec![]);
    let resp = send(&app, Request::get("/feedback/categories").body(Body::empty()).unwrap()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = json_body(resp).await;
    assert_eq!(body["categories"].as_array().unwrap().len(), 8);
}

// =============================================================================
// Dashboards
// =============================================================================

#[tokio::test]
async fn test_traffic_dashboard_is_stable_per_city() {
    let app = make_app(vec![], vec![]);
    let session = start_session(&app, "City Planner").await.session_id;

    let first: TrafficResponse = json_body(send(&app, get("/dashboards/traffic?city=Mumbai", session)).await).await;
    let again: TrafficResponse = json_body(send(&app, get("/dashboards/traffic?city=Mumbai", session)).await).await;

    assert_eq!(first.city, "Mumbai");
    assert_eq!(first.hourly.len(), 24);
    assert_eq!(first.vehicle_positions.len(), 100);
    assert!(first.simulated);
    assert_eq!(first.hourly[5].congestion_pct, again.hourly[5].congestion_pct);
}

#[tokio::test]
async fn test_dashboards_reject_unknown_cities() {
    let app = make_app(vec![], vec![]);
    let session = start_session(&app, "Citizen").await.session_id;
    for path in ["/dashboards/traffic", "/dashboards/waste", "/dashboards/energy"] {
        let resp = send(&app, get(&format!("{path}?city=Gotham"), session)).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{path}");
        let resp = send(&app, get(path, session)).await;
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
    }
}
