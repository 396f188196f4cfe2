//! User feedback: validated in full before anything touches the record store.

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::feedback::{FeedbackRecord, FEEDBACK_STATUS_NEW};
use crate::store::RecordStore;

pub mod handlers;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

const UNKNOWN: &str = "unknown";

/// Raw feedback body. Every field is optional so a missing one is a 400, not a rejection.
#[derive(Debug, Default, Deserialize)]
pub struct FeedbackSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub feedback: Option<String>,
}

/// Where a submission came from, taken from request headers.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientInfo {
    pub user_agent: String,
    pub ip_address: String,
}

impl ClientInfo {
    pub fn new(user_agent: Option<&str>, ip_address: Option<&str>) -> Self {
        let clean = |v: Option<&str>| {
            v.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNKNOWN)
                .to_string()
        };
        Self {
            user_agent: clean(user_agent),
            ip_address: clean(ip_address),
        }
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Checks a submission and builds the record to store. Email is trimmed and lowercased.
pub fn validate(
    submission: &FeedbackSubmission,
    client: ClientInfo,
) -> Result<FeedbackRecord, AppError> {
    let (Some(name), Some(email), Some(message)) = (
        required(&submission.name),
        required(&submission.email),
        required(&submission.feedback),
    ) else {
        return Err(AppError::Validation(
            "Missing required fields: name, email, and feedback are required".to_string(),
        ));
    };

    if !is_valid_email(email) {
        return Err(AppError::Validation("Invalid email format".to_string()));
    }

    Ok(FeedbackRecord {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_lowercase(),
        message: message.to_string(),
        status: FEEDBACK_STATUS_NEW.to_string(),
        user_agent: client.user_agent,
        ip_address: client.ip_address,
        submitted_at: Utc::now(),
    })
}

/// Validates then stores one submission, returning the stored record id.
pub async fn submit(
    store: &dyn RecordStore,
    submission: &FeedbackSubmission,
    client: ClientInfo,
) -> Result<Uuid, AppError> {
    let record = validate(submission, client)?;
    let id = store.insert_feedback(&record).await?;
    tracing::info!("Feedback {id} saved ({})", store.backend());
    Ok(id)
}
