//! Fake adapters shared by the unit tests of this crate.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::domain::{FeedbackRecord, GenerationParams};
use crate::ports::{FeedbackRepository, PortError, PortResult, TextGenerationService};

/// Replays scripted replies and records every prompt it receives.
#[derive(Default)]
pub struct ScriptedGenerator {
    replies: Mutex<VecDeque<PortResult<String>>>,
    pub calls: Mutex<Vec<(String, GenerationParams)>>,
}

impl ScriptedGenerator {
    pub fn new(replies: Vec<PortResult<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.calls.lock().unwrap().last().map(|(p, _)| p.clone())
    }
}

#[async_trait]
impl TextGenerationService for ScriptedGenerator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> PortResult<String> {
        self.calls.lock().unwrap().push((prompt.to_string(), *params));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(PortError::Unexpected("no scripted reply left".to_string())))
    }
}

/// An in-memory repository that can be switched into a failing mode.
#[derive(Default)]
pub struct RecordingRepository {
    pub records: Mutex<Vec<FeedbackRecord>>,
    pub fail_writes: bool,
    pub list_calls: Mutex<usize>,
}

impl RecordingRepository {
    pub fn failing() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.records.lock().unwrap().len()
    }
}

#[async_trait]
impl FeedbackRepository for RecordingRepository {
    async fn insert(&self, record: &FeedbackRecord) -> PortResult<()> {
        if self.fail_writes {
            return Err(PortError::Unavailable("connection refused".to_string()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> PortResult<Vec<FeedbackRecord>> {
        *self.list_calls.lock().unwrap() += 1;
        let records = self.records.lock().unwrap();
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
