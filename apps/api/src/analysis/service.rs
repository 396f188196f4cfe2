use uuid::Uuid;

use crate::errors::{AppError, SERVICE_UNAVAILABLE_MESSAGE};
use crate::gateway::{AnalysisRequest, SubmitError};
use crate::models::AnalysisRecord;
use crate::normalize::{normalize, CanonicalAnalysis};
use crate::session::{SessionState, SubmittedInputs};
use crate::state::AppState;

/// Runs one analysis for `session_id`.
///
/// The session is marked Submitting before the upstream call and always left
/// in a settled state afterwards, including when this future is dropped
/// mid-flight. No automatic retry happens after a quota failure: the restart
/// signal is sent and the user picks another profile.
pub async fn run_analysis(
    state: &AppState,
    session_id: Uuid,
    request: AnalysisRequest,
) -> Result<CanonicalAnalysis, AppError> {
    let submission = state
        .sessions
        .begin(session_id, SubmittedInputs::from(&request))
        .await?;

    let profile = request.compute_profile;
    let (next, result) = match state.gateway.submit(&request).await {
        Ok(payload) => {
            let analysis = normalize(&payload);
            tracing::info!(
                "Session {session_id}: analysis complete on {profile} ({}%, {})",
                analysis.metrics.match_percentage,
                analysis.metrics.match_band.label()
            );
            persist_in_background(state, session_id, &request, &analysis);
            (
                SessionState::Success {
                    analysis: Box::new(analysis.clone()),
                },
                Ok(analysis),
            )
        }
        Err(SubmitError::QuotaExceeded { message }) => {
            tracing::warn!("Session {session_id}: quota exceeded on {profile}: {message}");
            let outcome = state.recovery.recover(profile).await;
            (
                SessionState::QuotaExceeded {
                    recovery: outcome.clone(),
                },
                Err(AppError::QuotaExceeded(Box::new(outcome))),
            )
        }
        Err(SubmitError::Validation(message)) => (
            SessionState::ValidationError {
                message: message.clone(),
            },
            Err(AppError::Validation(message)),
        ),
        Err(SubmitError::Upstream(message)) => (
            SessionState::TransportError {
                message: message.clone(),
            },
            Err(AppError::Upstream(message)),
        ),
        Err(SubmitError::Transport(detail)) => (
            SessionState::TransportError {
                message: SERVICE_UNAVAILABLE_MESSAGE.to_string(),
            },
            Err(AppError::ServiceUnavailable(detail)),
        ),
    };

    submission.complete(next).await;
    result
}

/// Stores the analysis without holding up the response. Failures are only logged.
fn persist_in_background(
    state: &AppState,
    session_id: Uuid,
    request: &AnalysisRequest,
    analysis: &CanonicalAnalysis,
) {
    let record = AnalysisRecord::new(session_id, request.compute_profile, analysis);
    let store = state.store.clone();
    tokio::spawn(async move {
        match store.insert_analysis(&record).await {
            Ok(id) => tracing::debug!("Analysis record {id} stored ({})", store.backend()),
            Err(e) => tracing::error!("Failed to store analysis for session {session_id}: {e}"),
        }
    });
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use bytes::Bytes;
    use serde_json::json;

    use super::*;
    use crate::gateway::testing::{spawn_upstream, unreachable_upstream};
    use crate::gateway::{ComputeProfile, ResumeUpload};

    fn request() -> AnalysisRequest {
        AnalysisRequest {
            resume: ResumeUpload::new("cv.pdf", None, Bytes::from_static(b"%PDF-1.4")),
            job_description: Some("Backend engineer, 3+ years of experience".to_string()),
            job_url: None,
            compute_profile: ComputeProfile::Profile1,
        }
    }

    fn success_upstream() -> Router {
        Router::new().route(
            "/api/process-resume",
            post(|| async {
                Json(json!({
                    "success": true,
                    "resume_data": {"Name": "Jane Doe", "Skills": "Rust, SQL"},
                    "job_data": {"Job Title": "Backend Engineer", "Required Skills": "Rust, Kafka"},
                    "comparison_result": {"Match Percentage": "72%"}
                }))
            }),
        )
    }

    #[tokio::test]
    async fn test_success_normalizes_and_persists() {
        let url = spawn_upstream(success_upstream()).await;
        let (state, store) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let analysis = run_analysis(&state, session, request()).await.unwrap();
        assert_eq!(analysis.resume.name, "Jane Doe");
        assert_eq!(analysis.metrics.match_percentage, 72.0);

        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(snapshot.state.name(), "success");

        // The record write is spawned; give it a moment.
        for _ in 0..50 {
            if !store.analyses().await.is_empty() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        let records = store.analyses().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, session);
        assert_eq!(records[0].compute_profile, "server1");
        assert_eq!(records[0].job_title, "Backend Engineer");
    }

    #[tokio::test]
    async fn test_store_failure_does_not_fail_analysis() {
        let url = spawn_upstream(success_upstream()).await;
        let (state, store) = AppState::for_backend(&url);
        store.set_unavailable(true);

        let result = run_analysis(&state, Uuid::new_v4(), request()).await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_quota_triggers_single_restart_without_resubmit() {
        let submits = Arc::new(AtomicUsize::new(0));
        let restarts = Arc::new(AtomicUsize::new(0));
        let (s, r) = (submits.clone(), restarts.clone());
        let upstream = Router::new()
            .route(
                "/api/process-resume",
                post(move || {
                    let s = s.clone();
                    async move {
                        s.fetch_add(1, Ordering::SeqCst);
                        (
                            StatusCode::TOO_MANY_REQUESTS,
                            "Quota exceeded for metric: generativelanguage.googleapis.com/generate_content_free_tier_requests",
                        )
                    }
                }),
            )
            .route(
                "/api/restart-server",
                post(move || {
                    let r = r.clone();
                    async move {
                        r.fetch_add(1, Ordering::SeqCst);
                        Json(json!({"ok": true}))
                    }
                }),
            );
        let url = spawn_upstream(upstream).await;
        let (state, _) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let err = run_analysis(&state, session, request()).await.unwrap_err();
        let outcome = match err {
            AppError::QuotaExceeded(outcome) => outcome,
            other => panic!("expected quota error, got {other:?}"),
        };
        assert!(outcome.attempted);
        assert!(outcome.restarted);
        assert_eq!(outcome.compute_profile, ComputeProfile::Profile1);
        assert_eq!(submits.load(Ordering::SeqCst), 1);
        assert_eq!(restarts.load(Ordering::SeqCst), 1);

        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(snapshot.state.name(), "quota_exceeded");
        assert!(snapshot.inputs.is_some());
    }

    #[tokio::test]
    async fn test_unreachable_upstream_is_service_unavailable() {
        let url = unreachable_upstream().await;
        let (state, _) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let err = run_analysis(&state, session, request()).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));

        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(
            snapshot.state,
            SessionState::TransportError {
                message: SERVICE_UNAVAILABLE_MESSAGE.to_string()
            }
        );

        // Error states accept a corrected resubmission.
        let err = run_analysis(&state, session, request()).await.unwrap_err();
        assert!(matches!(err, AppError::ServiceUnavailable(_)));
    }

    #[tokio::test]
    async fn test_upstream_validation_error_sets_session_state() {
        let upstream = Router::new().route(
            "/api/process-resume",
            post(|| async {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({"error_type": "validation_error", "error": "Could not read resume"})),
                )
            }),
        );
        let url = spawn_upstream(upstream).await;
        let (state, _) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let err = run_analysis(&state, session, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(ref m) if m == "Could not read resume"));
        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(snapshot.state.name(), "validation_error");
    }

    #[tokio::test]
    async fn test_success_blocks_resubmit_until_reset() {
        let url = spawn_upstream(success_upstream()).await;
        let (state, _) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        run_analysis(&state, session, request()).await.unwrap();
        let err = run_analysis(&state, session, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        state.sessions.reset(session).await.unwrap();
        run_analysis(&state, session, request()).await.unwrap();
    }

    #[tokio::test]
    async fn test_cancelled_analysis_leaves_session_recoverable() {
        let upstream = Router::new().route(
            "/api/process-resume",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(2)).await;
                Json(json!({"success": true}))
            }),
        );
        let url = spawn_upstream(upstream).await;
        let (state, _) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let cancelled = tokio::time::timeout(
            Duration::from_millis(200),
            run_analysis(&state, session, request()),
        )
        .await;
        assert!(cancelled.is_err());

        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(snapshot.state.name(), "transport_error");
        assert!(snapshot.inputs.is_some());

        let reset = state.sessions.reset(session).await.unwrap();
        assert_eq!(reset.state, SessionState::Idle);
    }

    #[tokio::test]
    async fn test_upstream_reported_failure_is_bad_gateway() {
        let upstream = Router::new().route(
            "/api/process-resume",
            post(|| async { Json(json!({"success": false, "error": "Model crashed"})) }),
        );
        let url = spawn_upstream(upstream).await;
        let (state, store) = AppState::for_backend(&url);
        let session = Uuid::new_v4();

        let err = run_analysis(&state, session, request()).await.unwrap_err();
        assert!(matches!(err, AppError::Upstream(ref m) if m == "Model crashed"));

        let snapshot = state.sessions.snapshot(session).await.unwrap();
        assert_eq!(
            snapshot.state,
            SessionState::TransportError {
                message: "Model crashed".to_string()
            }
        );
        assert!(store.analyses().await.is_empty());
    }
}
