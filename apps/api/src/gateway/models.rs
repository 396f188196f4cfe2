use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::AppError;

/// Largest resume accepted for analysis.
pub const MAX_RESUME_BYTES: usize = 10 * 1024 * 1024;

const PDF_MIME: &str = "application/pdf";
const DOCX_MIME: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Upstream model tier. The upstream still calls these `server1..3`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComputeProfile {
    /// Highest accuracy, slowest.
    #[serde(rename = "server1", alias = "profile1")]
    Profile1,
    #[default]
    #[serde(rename = "server2", alias = "profile2")]
    Profile2,
    /// Fastest tier.
    #[serde(rename = "server3", alias = "profile3")]
    Profile3,
}

impl ComputeProfile {
    /// Name the upstream service expects in `selectedServer` / `server`.
    pub fn wire_name(self) -> &'static str {
        match self {
            ComputeProfile::Profile1 => "server1",
            ComputeProfile::Profile2 => "server2",
            ComputeProfile::Profile3 => "server3",
        }
    }
}

impl fmt::Display for ComputeProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

impl FromStr for ComputeProfile {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "server1" | "profile1" => Ok(ComputeProfile::Profile1),
            "server2" | "profile2" => Ok(ComputeProfile::Profile2),
            "server3" | "profile3" => Ok(ComputeProfile::Profile3),
            other => Err(AppError::Validation(format!(
                "Unknown server '{other}'. Use server1, server2 or server3"
            ))),
        }
    }
}

/// The uploaded resume file as received from the browser.
#[derive(Debug, Clone)]
pub struct ResumeUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl ResumeUpload {
    pub fn new(file_name: impl Into<String>, content_type: Option<String>, bytes: Bytes) -> Self {
        let file_name = file_name.into();
        let content_type = content_type
            .filter(|c| !c.is_empty() && c != "application/octet-stream")
            .or_else(|| mime_for(&file_name).map(str::to_string))
            .unwrap_or_else(|| "application/octet-stream".to_string());
        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.bytes.is_empty() {
            return Err(AppError::Validation("Resume file is empty".to_string()));
        }
        if self.bytes.len() > MAX_RESUME_BYTES {
            return Err(AppError::Validation(format!(
                "Resume file exceeds the {} MB limit",
                MAX_RESUME_BYTES / (1024 * 1024)
            )));
        }
        if mime_for(&self.file_name).is_none() {
            return Err(AppError::Validation(format!(
                "Unsupported file format: {}. Upload a PDF or DOCX resume",
                self.file_name
            )));
        }
        Ok(())
    }
}

fn mime_for(file_name: &str) -> Option<&'static str> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".pdf") {
        Some(PDF_MIME)
    } else if lower.ends_with(".docx") {
        Some(DOCX_MIME)
    } else {
        None
    }
}

/// A validated analysis submission.
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub resume: ResumeUpload,
    pub job_description: Option<String>,
    pub job_url: Option<String>,
    pub compute_profile: ComputeProfile,
}

impl AnalysisRequest {
    /// Builds a request from raw form parts, enforcing the submission rules:
    /// a non-empty PDF/DOCX resume within the size limit, and a job description
    /// or a job URL. Blank strings count as absent; an unset profile is `server2`.
    pub fn from_parts(
        resume: Option<ResumeUpload>,
        job_description: Option<String>,
        job_url: Option<String>,
        compute_profile: Option<&str>,
    ) -> Result<Self, AppError> {
        let job_description = non_blank(job_description);
        let job_url = non_blank(job_url);

        let resume = resume.ok_or_else(|| {
            AppError::Validation("Please upload a resume file".to_string())
        })?;
        resume.validate()?;

        if job_description.is_none() && job_url.is_none() {
            return Err(AppError::Validation(
                "Please provide a job description or a job URL".to_string(),
            ));
        }

        let compute_profile = match compute_profile.map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => name.parse()?,
            None => ComputeProfile::default(),
        };

        Ok(Self {
            resume,
            job_description,
            job_url,
            compute_profile,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// Raw successful upstream response. The key layout differs between backend
/// releases, so it stays an untyped JSON object until normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UpstreamPayload(Map<String, Value>);

impl UpstreamPayload {
    /// Wraps a JSON value; only objects are valid payloads.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }
}
