use axum::{
    extract::{Multipart, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::analysis::run_analysis;
use crate::errors::AppError;
use crate::gateway::{AnalysisRequest, ResumeUpload};
use crate::normalize::CanonicalAnalysis;
use crate::state::AppState;

pub const SESSION_HEADER: &str = "x-session-id";

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub success: bool,
    pub session_id: Uuid,
    pub analysis: CanonicalAnalysis,
}

/// Raw form fields, before any validation.
#[derive(Debug, Default)]
struct ResumeForm {
    resume: Option<ResumeUpload>,
    job_description: Option<String>,
    job_url: Option<String>,
    selected_server: Option<String>,
}

async fn read_form(mut multipart: Multipart) -> Result<ResumeForm, AppError> {
    let mut form = ResumeForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Invalid form data: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "resume" => {
                let file_name = field.file_name().unwrap_or("resume").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read resume: {e}")))?;
                form.resume = Some(ResumeUpload::new(file_name, content_type, bytes));
            }
            "jobDescription" | "jobUrl" | "selectedServer" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Invalid {name} field: {e}")))?;
                match name.as_str() {
                    "jobDescription" => form.job_description = Some(text),
                    "jobUrl" => form.job_url = Some(text),
                    _ => form.selected_server = Some(text),
                }
            }
            other => tracing::debug!("Ignoring unknown form field '{other}'"),
        }
    }
    Ok(form)
}

/// Session id from the `x-session-id` header, or a fresh one.
fn session_id(headers: &HeaderMap) -> Result<Uuid, AppError> {
    match headers.get(SESSION_HEADER).and_then(|v| v.to_str().ok()) {
        Some(raw) if !raw.trim().is_empty() => Uuid::parse_str(raw.trim())
            .map_err(|_| AppError::Validation(format!("Invalid {SESSION_HEADER} header"))),
        _ => Ok(Uuid::new_v4()),
    }
}

/// POST /api/process-resume
pub async fn handle_process_resume(
    State(state): State<AppState>,
    headers: HeaderMap,
    multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let session_id = session_id(&headers)?;
    let form = read_form(multipart).await?;
    let request = AnalysisRequest::from_parts(
        form.resume,
        form.job_description,
        form.job_url,
        form.selected_server.as_deref(),
    )?;

    let analysis = run_analysis(&state, session_id, request).await?;
    Ok(Json(AnalysisResponse {
        success: true,
        session_id,
        analysis,
    }))
}

/// POST /api/generate-resume
///
/// Passes the body through unchanged. Failures keep the flat error shape the
/// frontend already reads.
pub async fn handle_generate_resume(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    match state.gateway.generate_resume(&body).await {
        Ok(result) => Json(result).into_response(),
        Err(e) => {
            tracing::error!("Resume generation failed: {e:#}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({
                    "success": false,
                    "error": e.to_string(),
                    "details": "Failed to connect to the analysis backend. Please check if the backend is running.",
                })),
            )
                .into_response()
        }
    }
}
