pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::feedback::handlers as feedback;
use crate::gateway::models::MAX_RESUME_BYTES;
use crate::recovery::handlers as recovery;
use crate::session::handlers as session;
use crate::state::AppState;

/// Room for multipart framing and the text fields next to a maximum-size resume.
const FORM_OVERHEAD_BYTES: usize = 2 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/health", get(health::backend_health_handler))
        .route(
            "/api/process-resume",
            post(analysis::handle_process_resume)
                .layer(DefaultBodyLimit::max(MAX_RESUME_BYTES + FORM_OVERHEAD_BYTES)),
        )
        .route("/api/generate-resume", post(analysis::handle_generate_resume))
        .route(
            "/api/feedback",
            get(feedback::handle_feedback_info).post(feedback::handle_submit_feedback),
        )
        .route(
            "/api/restart-server",
            get(recovery::handle_restart_info).post(recovery::handle_restart_server),
        )
        .route("/api/sessions/:id", get(session::handle_get_session))
        .route("/api/sessions/:id/reset", post(session::handle_reset_session))
        .with_state(state)
}
