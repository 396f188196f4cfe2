//! Classification of upstream `/api/process-resume` responses.
//!
//! The upstream never returns a trustworthy structured code for provider quota
//! exhaustion, so detection is a case-insensitive substring scan of the failure
//! body. Structured hints (`error_type`, `quotaExceeded`) are honored too, but
//! are never the only signal.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use super::models::UpstreamPayload;

/// Fragments that identify an LLM provider quota / rate-limit failure.
pub const QUOTA_INDICATORS: &[&str] = &[
    "Quota exceeded",
    "You exceeded your current quota",
    "generativelanguage.googleapis.com/generate_content_free_tier_requests",
    "quota_metric",
    "ResourceExhausted: 429",
    "rate limit",
    "too many requests",
];

const VALIDATION_ERROR_TYPE: &str = "validation_error";
const QUOTA_ERROR_TYPE: &str = "quota_exceeded";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmitError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Quota exceeded: {message}")]
    QuotaExceeded { message: String },

    /// The upstream answered but reported a non-quota failure.
    #[error("Upstream analysis failed: {0}")]
    Upstream(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Returns true when `text` contains any quota indicator, ignoring case.
pub fn is_quota_exceeded(text: &str) -> bool {
    let haystack = text.to_lowercase();
    QUOTA_INDICATORS
        .iter()
        .any(|indicator| haystack.contains(&indicator.to_lowercase()))
}

/// Maps an upstream status and raw body to a payload or a classified failure.
pub fn classify_response(status: StatusCode, body: &str) -> Result<UpstreamPayload, SubmitError> {
    let json = serde_json::from_str::<Value>(body).ok();

    if status.is_success() {
        let Some(json) = json else {
            return Err(SubmitError::Transport(
                "Upstream returned a non-JSON response".to_string(),
            ));
        };
        if json.get("success").and_then(Value::as_bool) == Some(true) {
            return UpstreamPayload::from_value(json).ok_or_else(|| {
                SubmitError::Transport("Upstream returned a non-object response".to_string())
            });
        }
        return Err(classify_failure_body(body, Some(&json), false));
    }

    Err(classify_failure_body(body, json.as_ref(), true))
}

fn classify_failure_body(body: &str, json: Option<&Value>, transport_level: bool) -> SubmitError {
    let message = json
        .and_then(error_message)
        .unwrap_or_else(|| body.trim().to_string());

    let flagged_quota = json.is_some_and(|j| {
        j.get("quotaExceeded").and_then(Value::as_bool) == Some(true)
            || error_type(j) == Some(QUOTA_ERROR_TYPE)
    });
    if flagged_quota || is_quota_exceeded(body) {
        return SubmitError::QuotaExceeded { message };
    }

    if json.and_then(error_type) == Some(VALIDATION_ERROR_TYPE) {
        return SubmitError::Validation(message);
    }

    if transport_level {
        SubmitError::Transport(message)
    } else if message.is_empty() {
        SubmitError::Upstream("Analysis failed".to_string())
    } else {
        SubmitError::Upstream(message)
    }
}

fn error_type(json: &Value) -> Option<&str> {
    json.get("error_type").and_then(Value::as_str)
}

fn error_message(json: &Value) -> Option<String> {
    ["error", "message", "detail", "details"]
        .iter()
        .find_map(|key| json.get(*key).and_then(Value::as_str))
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
