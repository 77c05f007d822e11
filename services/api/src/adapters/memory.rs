//! services/api/src/adapters/memory.rs
//!
//! A process-local `FeedbackRepository`. Records vanish on restart; used for local
//! runs without a database and as the store behind the router tests.

use async_trait::async_trait;
use smart_city_core::domain::FeedbackRecord;
use smart_city_core::ports::{FeedbackRepository, PortError, PortResult};
use tokio::sync::RwLock;

#[derive(Default)]
pub struct InMemoryFeedbackAdapter {
    // Insertion order is creation order.
    records: RwLock<Vec<FeedbackRecord>>,
}

impl InMemoryFeedbackAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl FeedbackRepository for InMemoryFeedbackAdapter {
    async fn insert(&self, record: &FeedbackRecord) -> PortResult<()> {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id == record.id) {
            return Err(PortError::Rejected(format!("duplicate feedback id {}", record.id)));
        }
        records.push(record.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> PortResult<Vec<FeedbackRecord>> {
        let records = self.records.read().await;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }
}
