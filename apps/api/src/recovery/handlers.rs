use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::gateway::ComputeProfile;
use crate::recovery::{RestartAck, MANUAL_REASON};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RestartRequest {
    pub server: Option<String>,
    pub reason: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RestartResponse {
    pub success: bool,
    pub message: String,
    pub server: ComputeProfile,
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub ack: RestartAck,
}

/// POST /api/restart-server
///
/// Soft-fails: any downstream failure still yields 200 with `succeeded: false`.
pub async fn handle_restart_server(
    State(state): State<AppState>,
    Json(req): Json<RestartRequest>,
) -> Result<Json<RestartResponse>, AppError> {
    let server = req
        .server
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::Validation("Server parameter is required".to_string()))?;
    let profile: ComputeProfile = server.parse()?;
    let reason = req
        .reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| MANUAL_REASON.to_string());

    tracing::info!("Restart signal received for {profile}, reason: {reason}");
    let ack = state.recovery.signal_restart(profile, &reason).await;

    let message = if ack.succeeded {
        format!("Restart signal sent to {profile}")
    } else {
        format!("Restart signal attempted for {profile}")
    };

    Ok(Json(RestartResponse {
        success: true,
        message,
        server: profile,
        reason,
        timestamp: Utc::now(),
        ack,
    }))
}

/// GET /api/restart-server
pub async fn handle_restart_info() -> Json<Value> {
    Json(json!({
        "message": "Server restart API endpoint",
        "endpoint": "/api/restart-server",
        "methods": ["POST"],
        "requiredFields": ["server"],
        "optionalFields": ["reason"],
        "usage": "Send POST request with server name to restart specific AI server"
    }))
}
