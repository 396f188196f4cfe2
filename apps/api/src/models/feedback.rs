use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

pub const FEEDBACK_STATUS_NEW: &str = "new";

/// A piece of user feedback. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub message: String,
    pub status: String,
    pub user_agent: String,
    pub ip_address: String,
    pub submitted_at: DateTime<Utc>,
}
