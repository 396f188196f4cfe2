use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::errors::AppError;
use crate::session::AnalysisSession;
use crate::state::AppState;

/// GET /api/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisSession>, AppError> {
    state
        .sessions
        .snapshot(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

/// POST /api/sessions/:id/reset
pub async fn handle_reset_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AnalysisSession>, AppError> {
    let session = state.sessions.reset(id).await?;
    Ok(Json(session))
}
