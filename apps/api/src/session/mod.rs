//! Analysis sessions, one state machine per browser session.
//!
//! ```text
//! Idle ──begin──▶ Submitting ──complete──▶ Success | ValidationError | QuotaExceeded | TransportError
//!   ▲                                          │ (reset)        │ (begin again, inputs kept)
//!   └──────────────────────────────────────────┴────────────────┘
//! ```
//!
//! Only one request may be in flight per session. Success is left only through
//! an explicit reset.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::AppError;
use crate::gateway::{AnalysisRequest, ComputeProfile};
use crate::normalize::CanonicalAnalysis;
use crate::recovery::RecoveryOutcome;

pub mod handlers;

/// Inputs of the last submission, kept so a failed attempt can be corrected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmittedInputs {
    pub file_name: String,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub compute_profile: ComputeProfile,
}

impl From<&AnalysisRequest> for SubmittedInputs {
    fn from(request: &AnalysisRequest) -> Self {
        Self {
            file_name: request.resume.file_name.clone(),
            job_description: request.job_description.clone(),
            job_url: request.job_url.clone(),
            compute_profile: request.compute_profile,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Submitting,
    Success { analysis: Box<CanonicalAnalysis> },
    ValidationError { message: String },
    QuotaExceeded { recovery: RecoveryOutcome },
    TransportError { message: String },
}

impl SessionState {
    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Submitting => "submitting",
            SessionState::Success { .. } => "success",
            SessionState::ValidationError { .. } => "validation_error",
            SessionState::QuotaExceeded { .. } => "quota_exceeded",
            SessionState::TransportError { .. } => "transport_error",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSession {
    pub id: Uuid,
    #[serde(flatten)]
    pub state: SessionState,
    pub inputs: Option<SubmittedInputs>,
    pub updated_at: DateTime<Utc>,
}

impl AnalysisSession {
    fn new(id: Uuid) -> Self {
        Self {
            id,
            state: SessionState::Idle,
            inputs: None,
            updated_at: Utc::now(),
        }
    }

    /// Idle / error states → Submitting. Rejects concurrent and post-success submissions.
    pub fn begin_submit(&mut self, inputs: SubmittedInputs) -> Result<(), AppError> {
        match self.state {
            SessionState::Submitting => Err(AppError::Conflict(
                "An analysis is already in progress for this session".to_string(),
            )),
            SessionState::Success { .. } => Err(AppError::Conflict(
                "Reset the session before starting a new analysis".to_string(),
            )),
            _ => {
                self.inputs = Some(inputs);
                self.transition(SessionState::Submitting);
                Ok(())
            }
        }
    }

    /// Submitting → terminal state. Ignored when no submission is in flight.
    pub fn complete(&mut self, outcome: SessionState) -> bool {
        if self.state != SessionState::Submitting || outcome == SessionState::Submitting {
            return false;
        }
        self.transition(outcome);
        true
    }

    /// Any settled state → Idle, dropping inputs and results.
    pub fn reset(&mut self) -> Result<(), AppError> {
        if self.state == SessionState::Submitting {
            return Err(AppError::Conflict(
                "Cannot reset while an analysis is in progress".to_string(),
            ));
        }
        self.inputs = None;
        self.transition(SessionState::Idle);
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        tracing::debug!("Session {}: {} -> {}", self.id, self.state.name(), next.name());
        self.state = next;
        self.updated_at = Utc::now();
    }
}

/// Settled sessions untouched for this long are evicted.
pub const SESSION_TTL_SECS: i64 = 60 * 60;

/// Message recorded when a submission is dropped before it settles.
pub const INTERRUPTED_MESSAGE: &str = "The analysis was interrupted before it completed. Please try again.";

/// In-memory session store. Sessions never share state with each other.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, AnalysisSession>>>,
    ttl: Duration,
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::with_ttl(Duration::seconds(SESSION_TTL_SECS))
    }
}

impl SessionRegistry {
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: Arc::default(),
            ttl,
        }
    }

    /// Marks the session (created on first use) as submitting. The returned
    /// guard settles it as a transport error if dropped before `complete`.
    pub async fn begin(&self, id: Uuid, inputs: SubmittedInputs) -> Result<Submission, AppError> {
        let mut sessions = self.sessions.lock().await;
        evict_expired(&mut sessions, Utc::now() - self.ttl);
        sessions
            .entry(id)
            .or_insert_with(|| AnalysisSession::new(id))
            .begin_submit(inputs)?;
        Ok(Submission {
            registry: self.clone(),
            id,
            settled: false,
        })
    }

    async fn complete(&self, id: Uuid, outcome: SessionState) {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get_mut(&id) {
            if !session.complete(outcome) {
                tracing::warn!("Session {id} completed while not submitting");
            }
        }
    }

    pub async fn reset(&self, id: Uuid) -> Result<AnalysisSession, AppError> {
        let mut sessions = self.sessions.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))?;
        session.reset()?;
        Ok(session.clone())
    }

    pub async fn snapshot(&self, id: Uuid) -> Option<AnalysisSession> {
        self.sessions.lock().await.get(&id).cloned()
    }
}

/// Drops settled sessions last touched before `cutoff`. In-flight ones stay.
fn evict_expired(sessions: &mut HashMap<Uuid, AnalysisSession>, cutoff: DateTime<Utc>) {
    let before = sessions.len();
    sessions.retain(|_, s| s.state == SessionState::Submitting || s.updated_at >= cutoff);
    let evicted = before - sessions.len();
    if evicted > 0 {
        tracing::debug!("Evicted {evicted} expired sessions");
    }
}

/// An in-flight submission. Must be settled with `complete`.
pub struct Submission {
    registry: SessionRegistry,
    id: Uuid,
    settled: bool,
}

impl Submission {
    pub async fn complete(mut self, outcome: SessionState) {
        self.settled = true;
        self.registry.complete(self.id, outcome).await;
    }
}

impl Drop for Submission {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        tracing::warn!("Session {}: submission dropped before completing", self.id);
        let registry = self.registry.clone();
        let id = self.id;
        let outcome = SessionState::TransportError {
            message: INTERRUPTED_MESSAGE.to_string(),
        };
        // Lock synchronously when free so the session is settled right away.
        if let Ok(mut sessions) = registry.sessions.try_lock() {
            if let Some(session) = sessions.get_mut(&id) {
                session.complete(outcome);
            }
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move { registry.complete(id, outcome).await });
            }
            Err(_) => tracing::error!("Session {id} left submitting: no runtime to settle it"),
        }
    }
}
