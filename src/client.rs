use reqwest::Method;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{MaxStudioError, Result};
use crate::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
use crate::types::*;
use crate::url::clean_url_params;

const API_KEY_HEADER: &str = "x-api-key";

pub(crate) fn require_credential(credential: &str) -> Result<&str> {
    let trimmed = credential.trim();
    if trimmed.is_empty() {
        return Err(MaxStudioError::CredentialMissing);
    }
    Ok(trimmed)
}

/// Async client for the MaxStudio baby generator endpoints.
///
/// Translates typed requests into HTTP calls and typed responses. It never
/// retries and knows nothing about polling policy; see
/// [`PollOrchestrator`](crate::PollOrchestrator) for that.
///
/// # Example
/// ```no_run
/// use maxstudio_rs::{BabyGender, GenerationRequest, JobClient};
///
/// # async fn example() -> maxstudio_rs::Result<()> {
/// let client = JobClient::default();
/// let request = GenerationRequest::new(
///     "https://cdn.example.com/dad.png",
///     "https://cdn.example.com/mom.png",
///     BabyGender::Girl,
/// )?;
/// let handle = client.submit(&request, "my-api-key").await?;
/// let snapshot = client.get_status(&handle, "my-api-key").await?;
/// println!("{} is {:?}", handle, snapshot.status);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct JobClient<T = ReqwestTransport> {
    transport: T,
    config: ClientConfig,
}

impl Default for JobClient<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl JobClient<ReqwestTransport> {
    /// Create a client using `reqwest` for transport.
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, ReqwestTransport::new())
    }
}

impl<T: HttpTransport> JobClient<T> {
    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    // ── Submit ──────────────────────────────────────────────────────

    /// Create a generation job. Returns the handle used for polling.
    pub async fn submit(&self, request: &GenerationRequest, credential: &str) -> Result<JobHandle> {
        let credential = require_credential(credential)?;

        let father = clean_url_params(request.father_image());
        let mother = clean_url_params(request.mother_image());
        let body = serde_json::to_vec(&BabyGenerationPayload {
            father_image: &father,
            mother_image: &mother,
            gender: request.gender(),
        })?;

        let url = format!("{}/baby-generator", self.config.base_url);
        debug!(%url, gender = %request.gender(), "submitting baby generation job");

        let http_request = HttpRequest::new(Method::POST, &url, self.config.submit_timeout)
            .header(API_KEY_HEADER, credential)
            .json_body(body);

        let resp = self.transport.send(http_request).await.map_err(|e| {
            MaxStudioError::transport(
                format!("Cannot connect to MaxStudio at {}", self.config.base_url),
                e,
            )
        })?;

        if !resp.is_success() {
            let body = resp.text();
            warn!(status = resp.status, %body, "job submission rejected");
            return Err(MaxStudioError::Http {
                status: resp.status,
                body,
            });
        }

        let created: JobCreatedResponse =
            serde_json::from_slice(&resp.body).map_err(MaxStudioError::Decode)?;

        match created.job_id.as_deref().map(str::trim) {
            Some(job_id) if !job_id.is_empty() => {
                info!(job_id, "baby generation job created");
                Ok(JobHandle::new(job_id))
            }
            _ => {
                let message = created.server_message();
                warn!(?message, "job submission response missing jobId");
                Err(MaxStudioError::JobCreationFailed(message))
            }
        }
    }

    // ── Status ──────────────────────────────────────────────────────

    /// Fetch the current status of a job.
    pub async fn get_status(&self, handle: &JobHandle, credential: &str) -> Result<JobStatusSnapshot> {
        let credential = require_credential(credential)?;

        let url = format!("{}/baby-generator/{}", self.config.base_url, handle.job_id());
        debug!(%url, "fetching job status");

        let http_request = HttpRequest::new(Method::GET, &url, self.config.status_timeout)
            .header(API_KEY_HEADER, credential);

        let resp = self.transport.send(http_request).await.map_err(|e| {
            MaxStudioError::transport(format!("Failed to fetch status of job {}", handle), e)
        })?;

        classify_status_response(resp)
    }
}

/// Map a raw status response onto a snapshot or a typed error.
fn classify_status_response(resp: HttpResponse) -> Result<JobStatusSnapshot> {
    if resp.status == 404 {
        let body = resp.text();
        // 404 is also used for unrelated routing errors; only a body that
        // names the job counts as "not found".
        if body.to_lowercase().contains("job not found") {
            return Err(MaxStudioError::JobNotFound);
        }
        return Err(MaxStudioError::Http { status: 404, body });
    }

    if !resp.is_success() {
        return Err(MaxStudioError::Http {
            status: resp.status,
            body: resp.text(),
        });
    }

    let parsed: JobStatusResponse =
        serde_json::from_slice(&resp.body).map_err(MaxStudioError::Decode)?;
    Ok(JobStatusSnapshot::from(parsed))
}
