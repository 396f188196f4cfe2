use axum::{extract::State, http::HeaderMap, Json};
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::errors::AppError;
use crate::feedback::{self, ClientInfo, FeedbackSubmission};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub feedback_id: Uuid,
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// POST /api/feedback
pub async fn handle_submit_feedback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<FeedbackSubmission>,
) -> Result<Json<FeedbackResponse>, AppError> {
    let ip = header(&headers, "x-forwarded-for").or_else(|| header(&headers, "x-real-ip"));
    let client = ClientInfo::new(header(&headers, "user-agent"), ip);

    let feedback_id = feedback::submit(state.store.as_ref(), &body, client).await?;
    Ok(Json(FeedbackResponse {
        success: true,
        message: "Feedback submitted successfully".to_string(),
        feedback_id,
    }))
}

/// GET /api/feedback
pub async fn handle_feedback_info() -> Json<Value> {
    Json(json!({
        "message": "Feedback API endpoint is working",
        "endpoint": "/api/feedback",
        "methods": ["POST"],
        "requiredFields": ["name", "email", "feedback"]
    }))
}
