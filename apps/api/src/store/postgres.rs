use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::{RecordStore, StoreError};
use crate::models::{AnalysisRecord, FeedbackRecord};

pub struct PgRecordStore {
    pool: PgPool,
}

impl PgRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for PgRecordStore {
    async fn insert_feedback(&self, record: &FeedbackRecord) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO feedback
                (id, name, email, message, status, user_agent, ip_address, submitted_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(record.id)
        .bind(&record.name)
        .bind(&record.email)
        .bind(&record.message)
        .bind(&record.status)
        .bind(&record.user_agent)
        .bind(&record.ip_address)
        .bind(record.submitted_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<Uuid, StoreError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO analysis_records
                (id, session_id, compute_profile, job_title, match_percentage, analysis, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(record.id)
        .bind(record.session_id)
        .bind(&record.compute_profile)
        .bind(&record.job_title)
        .bind(record.match_percentage)
        .bind(&record.analysis)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
