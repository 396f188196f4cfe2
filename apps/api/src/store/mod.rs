//! Record store. Write-only persistence for feedback and analysis records.
//!
//! `AppState` carries an `Arc<dyn RecordStore>`: `PgRecordStore` when
//! `DATABASE_URL` is set, `MemoryRecordStore` otherwise.

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{AnalysisRecord, FeedbackRecord};

pub mod memory;
pub mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::PgRecordStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Persists one feedback record and returns its id.
    async fn insert_feedback(&self, record: &FeedbackRecord) -> Result<Uuid, StoreError>;

    /// Persists one successful analysis and returns its id.
    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<Uuid, StoreError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}
