//! services/api/src/web/state.rs
//!
//! Defines the application's shared state and the per-user session registry.

use chrono::{DateTime, Utc};
use smart_city_core::{
    ports::{FeedbackRepository, PageExtractor, TextGenerationService},
    ChatSession, DocumentExtractor, FeedbackStore, Role, SummarizationClient,
};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<dyn TextGenerationService>,
    pub extractor: DocumentExtractor,
    pub summarizer: SummarizationClient,
    pub feedback: FeedbackStore,
    pub sessions: SessionRegistry,
}

impl AppState {
    /// Wires the core services on top of the given adapters.
    pub fn new(
        generator: Arc<dyn TextGenerationService>,
        pages: Arc<dyn PageExtractor>,
        feedback_repository: Arc<dyn FeedbackRepository>,
    ) -> Self {
        Self {
            extractor: DocumentExtractor::new(pages),
            summarizer: SummarizationClient::new(generator.clone()),
            feedback: FeedbackStore::new(feedback_repository),
            generator,
            sessions: SessionRegistry::default(),
        }
    }
}

//=========================================================================================
// SessionRegistry (One Entry per UI Session)
//=========================================================================================

/// What the session middleware hands to handlers. Immutable for the session's
/// lifetime, so it is read without touching the chat lock.
#[derive(Debug, Clone, Copy)]
pub struct SessionContext {
    pub session_id: Uuid,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl From<&ChatSession> for SessionContext {
    fn from(session: &ChatSession) -> Self {
        Self {
            session_id: session.id,
            role: session.role,
            created_at: session.created_at,
        }
    }
}

struct SessionEntry {
    context: SessionContext,
    chat: Arc<Mutex<ChatSession>>,
}

/// Holds the live sessions. Only the transcript sits behind a per-session lock;
/// a pending generation call blocks other chat requests on that session and
/// nothing else.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, SessionEntry>>>,
}

impl SessionRegistry {
    /// Starts a session for `role`. The role is fixed for the session's lifetime.
    pub async fn create(&self, role: Role) -> SessionContext {
        let session = ChatSession::new(role);
        let context = SessionContext::from(&session);
        self.sessions.write().await.insert(
            context.session_id,
            SessionEntry {
                context,
                chat: Arc::new(Mutex::new(session)),
            },
        );
        info!(session_id = %context.session_id, role = %role, "session created");
        context
    }

    pub async fn context(&self, session_id: Uuid) -> Option<SessionContext> {
        self.sessions.read().await.get(&session_id).map(|e| e.context)
    }

    /// The session's chat state. Hold the lock only for transcript work.
    pub async fn get(&self, session_id: Uuid) -> Option<Arc<Mutex<ChatSession>>> {
        self.sessions
            .read()
            .await
            .get(&session_id)
            .map(|e| e.chat.clone())
    }

    /// Clears the session's transcript. Returns false if the session does not exist.
    pub async fn reset(&self, session_id: Uuid) -> bool {
        match self.get(session_id).await {
            Some(session) => {
                session.lock().await.reset();
                info!(%session_id, "session transcript cleared");
                true
            }
            None => false,
        }
    }

    /// Ends the session and drops its transcript. Does not wait for a pending chat
    /// reply; that request finishes against the detached transcript.
    pub async fn destroy(&self, session_id: Uuid) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            info!(%session_id, "session destroyed");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
