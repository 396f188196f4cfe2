//! Backend gateway: the single HTTP client for the upstream analysis service.
//!
//! Every call to the upstream's `/api/*` surface goes through `GatewayClient`,
//! except the restart signal, which the recovery controller owns.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

pub mod classify;
pub mod models;

pub use classify::SubmitError;
pub use models::{AnalysisRequest, ComputeProfile, ResumeUpload, UpstreamPayload};

use crate::config::Config;

const PROCESS_RESUME_ENDPOINT: &str = "/api/process-resume";
const GENERATE_RESUME_ENDPOINT: &str = "/api/generate-resume";
const HEALTH_ENDPOINT: &str = "/health";
const HEALTH_TIMEOUT_SECS: u64 = 10;

#[derive(Clone)]
pub struct GatewayClient {
    client: Client,
    config: Config,
}

impl GatewayClient {
    pub fn new(config: Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .context("Failed to build upstream HTTP client")?;
        Ok(Self { client, config })
    }

    /// Forwards one analysis request as multipart form data and classifies the answer.
    pub async fn submit(&self, request: &AnalysisRequest) -> Result<UpstreamPayload, SubmitError> {
        let url = self.config.backend_endpoint(PROCESS_RESUME_ENDPOINT);
        let form = build_form(request)?;

        info!(
            "Forwarding resume '{}' ({} bytes) to {} on {}",
            request.resume.file_name,
            request.resume.bytes.len(),
            url,
            request.compute_profile
        );

        let response = self
            .client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                warn!("Upstream request failed: {e}");
                SubmitError::Transport(e.to_string())
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!("Failed to read upstream body: {e}");
            SubmitError::Transport(e.to_string())
        })?;

        let outcome = classify::classify_response(status, &body);
        match &outcome {
            Ok(payload) => debug!(
                "Upstream payload keys: {:?}",
                payload.keys().collect::<Vec<_>>()
            ),
            Err(e) => warn!("Upstream returned {status}: {e}"),
        }
        outcome
    }

    /// Proxies the upstream health path. `Ok` carries the upstream body when it answered 2xx.
    pub async fn health(&self) -> Result<Value> {
        let url = self.config.backend_endpoint(HEALTH_ENDPOINT);
        let response = self
            .client
            .get(&url)
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS))
            .send()
            .await
            .with_context(|| format!("Failed to GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Backend health check failed: {status}");
        }
        // Some deployments answer with plain text; keep it rather than failing.
        let text = response.text().await.context("Failed to read health body")?;
        Ok(serde_json::from_str(&text).unwrap_or(Value::String(text)))
    }

    /// Forwards a resume generation request body unchanged.
    pub async fn generate_resume(&self, body: &Value) -> Result<Value> {
        let url = self.config.backend_endpoint(GENERATE_RESUME_ENDPOINT);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("Failed to POST to {url}"))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            anyhow::bail!("Backend error: {} - {}", status.as_u16(), error_text);
        }
        response
            .json::<Value>()
            .await
            .context("Failed to parse generate-resume response")
    }
}

fn build_form(request: &AnalysisRequest) -> Result<Form, SubmitError> {
    let resume = Part::bytes(request.resume.bytes.to_vec())
        .file_name(request.resume.file_name.clone())
        .mime_str(&request.resume.content_type)
        .map_err(|e| SubmitError::Validation(format!("Invalid resume content type: {e}")))?;

    let mut form = Form::new()
        .part("resume", resume)
        .text(
            "jobDescription",
            request.job_description.clone().unwrap_or_default(),
        )
        .text("selectedServer", request.compute_profile.wire_name());
    if let Some(url) = &request.job_url {
        form = form.text("jobUrl", url.clone());
    }
    Ok(form)
}
