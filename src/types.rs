use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::url::normalize_image_url;

/// Requested gender of the generated baby.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BabyGender {
    #[default]
    #[serde(rename = "babyBoy")]
    Boy,
    #[serde(rename = "babyGirl")]
    Girl,
}

impl BabyGender {
    /// Wire value expected by the `gender` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            BabyGender::Boy => "babyBoy",
            BabyGender::Girl => "babyGirl",
        }
    }
}

impl fmt::Display for BabyGender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inputs for one baby generation.
///
/// Both image references are validated as absolute HTTP(S) URLs and have
/// their query and fragment removed on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    father_image: String,
    mother_image: String,
    gender: BabyGender,
}

impl GenerationRequest {
    pub fn new(
        father_image: impl AsRef<str>,
        mother_image: impl AsRef<str>,
        gender: BabyGender,
    ) -> Result<Self> {
        Ok(Self {
            father_image: normalize_image_url(father_image.as_ref())?,
            mother_image: normalize_image_url(mother_image.as_ref())?,
            gender,
        })
    }

    pub fn father_image(&self) -> &str {
        &self.father_image
    }

    pub fn mother_image(&self) -> &str {
        &self.mother_image
    }

    pub fn gender(&self) -> BabyGender {
        self.gender
    }
}

/// JSON body of `POST /baby-generator`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BabyGenerationPayload<'a> {
    pub father_image: &'a str,
    pub mother_image: &'a str,
    pub gender: BabyGender,
}

/// Opaque identifier of a server-side generation job.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    job_id: String,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }
}

impl fmt::Display for JobHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.job_id)
    }
}

/// Job status lifecycle: Creating -> Pending -> Running -> Completed/Failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Creating,
    Pending,
    Running,
    Completed,
    Failed,
    NotFound,
    Unknown,
}

impl JobStatus {
    /// Map a server status string, case-insensitively. Unrecognized values
    /// become [`JobStatus::Unknown`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "creating" => JobStatus::Creating,
            "pending" => JobStatus::Pending,
            "running" => JobStatus::Running,
            "completed" => JobStatus::Completed,
            "failed" => JobStatus::Failed,
            "not-found" | "not_found" | "notfound" => JobStatus::NotFound,
            _ => JobStatus::Unknown,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Creating => "creating",
            JobStatus::Pending => "pending",
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::NotFound => "not-found",
            JobStatus::Unknown => "unknown",
        }
    }

    /// Whether the orchestrator keeps polling on this status.
    pub fn is_in_progress(&self) -> bool {
        matches!(
            self,
            JobStatus::Creating | JobStatus::Pending | JobStatus::Running | JobStatus::Unknown
        )
    }
}

/// One decoded status poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusSnapshot {
    pub status: JobStatus,
    /// Status string as sent by the server, for diagnostics.
    pub raw_status: Option<String>,
    /// Result image URLs; only meaningful when `status` is `Completed`.
    pub result_urls: Vec<String>,
    pub error: Option<String>,
    pub error_message: Option<String>,
}

impl JobStatusSnapshot {
    /// Server-supplied failure text: `error`, then `errorMessage`.
    pub fn error_detail(&self) -> Option<&str> {
        let non_blank = |s: &&str| !s.trim().is_empty();
        self.error
            .as_deref()
            .filter(non_blank)
            .or_else(|| self.error_message.as_deref().filter(non_blank))
    }
}

impl From<JobStatusResponse> for JobStatusSnapshot {
    fn from(resp: JobStatusResponse) -> Self {
        let status = resp
            .status
            .as_deref()
            .map(JobStatus::parse)
            .unwrap_or(JobStatus::Unknown);
        let result_urls = if status == JobStatus::Completed {
            resp.result.unwrap_or_default()
        } else {
            Vec::new()
        };
        Self {
            status,
            raw_status: resp.status,
            result_urls,
            error: resp.error,
            error_message: resp.error_message,
        }
    }
}

/// Body of a successful `POST /baby-generator`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobCreatedResponse {
    pub job_id: Option<String>,
    pub error_message: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl JobCreatedResponse {
    /// Best available server message explaining a missing `jobId`.
    pub fn server_message(&self) -> Option<String> {
        if let Some(msg) = self.error_message.as_ref().filter(|m| !m.trim().is_empty()) {
            return Some(msg.clone());
        }
        match &self.details {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            Some(serde_json::Value::Null) | None => None,
            Some(serde_json::Value::String(_)) => None,
            Some(other) => Some(other.to_string()),
        }
    }
}

/// Body of a successful `GET /baby-generator/{jobId}`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct JobStatusResponse {
    pub status: Option<String>,
    pub result: Option<Vec<String>>,
    pub error: Option<String>,
    pub error_message: Option<String>,
}
