use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Liveness of this service only; never touches the upstream.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "insight-api"
    }))
}

/// GET /api/health
/// Reports whether the upstream analysis backend answers its health check.
pub async fn backend_health_handler(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.gateway.health().await {
        Ok(backend) => (
            StatusCode::OK,
            Json(json!({
                "status": "healthy",
                "backend_url": state.config.backend_url,
                "backend": backend,
            })),
        ),
        Err(e) => {
            tracing::warn!("Backend health check failed: {e:#}");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unhealthy",
                    "backend_url": state.config.backend_url,
                    "error": e.to_string(),
                })),
            )
        }
    }
}
