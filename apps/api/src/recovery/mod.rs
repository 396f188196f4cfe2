//! Quota recovery: restart signals for an upstream compute profile.
//!
//! Recovery is fail-open: the caller always gets an outcome, never an error.
//! `attempted` and `restarted` are reported separately so "we tried" and
//! "it worked" stay distinguishable.

use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

pub mod handlers;

use crate::config::Config;
use crate::gateway::ComputeProfile;

const RESTART_ENDPOINT: &str = "/api/restart-server";
/// Hard bound on the restart signal round trip.
pub const RESTART_TIMEOUT: Duration = Duration::from_secs(10);
/// Pause after an acknowledged restart before reporting success.
pub const RESTART_SETTLE_DELAY: Duration = Duration::from_secs(2);

pub const QUOTA_REASON: &str = "quota_exceeded";
pub const MANUAL_REASON: &str = "manual_restart";

const RESTARTED_MESSAGE: &str =
    "Server has been restarted. Please try switching to a different server.";
const NOT_RESTARTED_MESSAGE: &str =
    "Server quota exceeded. Please try switching to a different server.";

/// Result of a quota recovery attempt, surfaced to the user once and never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecoveryOutcome {
    pub quota_exceeded: bool,
    pub attempted: bool,
    pub restarted: bool,
    pub compute_profile: ComputeProfile,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Acknowledgement of a single restart signal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestartAck {
    pub attempted: bool,
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backend_response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

/// Timing for the restart round trip. Defaults are the production bounds.
#[derive(Debug, Clone, Copy)]
pub struct RecoveryPolicy {
    pub timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for RecoveryPolicy {
    fn default() -> Self {
        Self {
            timeout: RESTART_TIMEOUT,
            settle_delay: RESTART_SETTLE_DELAY,
        }
    }
}

#[derive(Clone)]
pub struct RecoveryController {
    client: Client,
    config: Config,
    policy: RecoveryPolicy,
}

impl RecoveryController {
    pub fn new(config: Config, policy: RecoveryPolicy) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build recovery HTTP client")?;
        Ok(Self {
            client,
            config,
            policy,
        })
    }

    /// Signals a restart for `profile` after a quota failure. Does not resubmit anything.
    pub async fn recover(&self, profile: ComputeProfile) -> RecoveryOutcome {
        info!("Quota exceeded on {profile}, attempting restart");

        let ack = self.signal_restart(profile, QUOTA_REASON).await;
        if ack.succeeded {
            tokio::time::sleep(self.policy.settle_delay).await;
        }

        RecoveryOutcome {
            quota_exceeded: true,
            attempted: ack.attempted,
            restarted: ack.succeeded,
            compute_profile: profile,
            message: if ack.succeeded {
                RESTARTED_MESSAGE.to_string()
            } else {
                NOT_RESTARTED_MESSAGE.to_string()
            },
            warning: ack.warning,
        }
    }

    /// Sends one restart signal, bounded by the policy timeout. Never fails.
    pub async fn signal_restart(&self, profile: ComputeProfile, reason: &str) -> RestartAck {
        let url = self.config.backend_endpoint(RESTART_ENDPOINT);
        let body = json!({
            "server": profile.wire_name(),
            "reason": reason,
            "timestamp": Utc::now().to_rfc3339(),
        });

        let call = async {
            let response = self.client.post(&url).json(&body).send().await?;
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Ok::<_, reqwest::Error>((status, text))
        };

        match tokio::time::timeout(self.policy.timeout, call).await {
            Ok(Ok((status, text))) if status.is_success() => {
                info!("Restart signal for {profile} acknowledged");
                RestartAck {
                    attempted: true,
                    succeeded: true,
                    backend_response: serde_json::from_str(&text).ok(),
                    warning: None,
                }
            }
            Ok(Ok((status, _))) => {
                warn!("Restart signal for {profile} rejected: {status}");
                failed_ack(format!("Backend responded with status {}", status.as_u16()))
            }
            Ok(Err(e)) => {
                warn!("Restart signal for {profile} failed: {e}");
                failed_ack("Backend restart endpoint may not be available".to_string())
            }
            Err(_) => {
                warn!(
                    "Restart signal for {profile} timed out after {:?}",
                    self.policy.timeout
                );
                failed_ack(format!(
                    "Restart signal timed out after {}s",
                    self.policy.timeout.as_secs_f64()
                ))
            }
        }
    }
}

fn failed_ack(warning: String) -> RestartAck {
    RestartAck {
        attempted: true,
        succeeded: false,
        backend_response: None,
        warning: Some(warning),
    }
}
