use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::{AnalysisRecord, FeedbackRecord};

/// Process-local store. Records are lost on restart.
#[derive(Default)]
pub struct MemoryRecordStore {
    feedback: Mutex<Vec<FeedbackRecord>>,
    analyses: Mutex<Vec<AnalysisRecord>>,
    unavailable: AtomicBool,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store disabled".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
impl MemoryRecordStore {
    /// Makes every subsequent write fail, simulating a lost database.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub async fn feedback(&self) -> Vec<FeedbackRecord> {
        self.feedback.lock().await.clone()
    }

    pub async fn analyses(&self) -> Vec<AnalysisRecord> {
        self.analyses.lock().await.clone()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn insert_feedback(&self, record: &FeedbackRecord) -> Result<Uuid, StoreError> {
        self.check()?;
        self.feedback.lock().await.push(record.clone());
        Ok(record.id)
    }

    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<Uuid, StoreError> {
        self.check()?;
        self.analyses.lock().await.push(record.clone());
        Ok(record.id)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
