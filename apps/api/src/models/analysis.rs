use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use crate::gateway::ComputeProfile;
use crate::normalize::CanonicalAnalysis;

/// Record of one successful analysis. The service writes it and never reads it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRecord {
    pub id: Uuid,
    pub session_id: Uuid,
    pub compute_profile: String,
    pub job_title: String,
    pub match_percentage: f64,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn new(session_id: Uuid, profile: ComputeProfile, analysis: &CanonicalAnalysis) -> Self {
        Self {
            id: Uuid::new_v4(),
            session_id,
            compute_profile: profile.wire_name().to_string(),
            job_title: analysis.job.job_title.clone(),
            match_percentage: analysis.metrics.match_percentage,
            analysis: serde_json::to_value(analysis).unwrap_or(Value::Null),
            created_at: Utc::now(),
        }
    }
}
