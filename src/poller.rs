//! Submission and status polling state machine.
//!
//! One invocation moves through `Submitting -> Polling -> {Succeeded | Failed}`
//! and yields exactly one terminal value: the first result URL, or a typed
//! [`MaxStudioError`].

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::client::{require_credential, JobClient};
use crate::config::{ClientConfig, PollConfig};
use crate::error::{MaxStudioError, Result};
use crate::store::CredentialStore;
use crate::transport::{HttpTransport, ReqwestTransport};
use crate::types::{GenerationRequest, JobHandle, JobStatus, JobStatusSnapshot};

/// Progress report emitted after every poll attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollProgress {
    pub job_id: String,
    /// 1-based attempt number.
    pub attempt: u32,
    pub max_attempts: u32,
    /// Status seen on this attempt; `None` when the poll itself failed.
    pub status: Option<JobStatus>,
}

/// What a single snapshot means for the state machine.
#[derive(Debug)]
pub(crate) enum PollStep {
    Continue,
    Succeeded(String),
    Failed(MaxStudioError),
}

pub(crate) fn next_step(job_id: &str, snapshot: JobStatusSnapshot) -> PollStep {
    if snapshot.status.is_in_progress() {
        if snapshot.status == JobStatus::Unknown {
            // Unrecognized vocabulary keeps polling; the attempt budget still bounds it.
            warn!(
                job_id,
                raw_status = ?snapshot.raw_status,
                "unexpected job status, continuing to poll"
            );
        } else {
            debug!(job_id, status = snapshot.status.as_str(), "job still in progress");
        }
        return PollStep::Continue;
    }

    match snapshot.status {
        JobStatus::Completed => match snapshot.result_urls.into_iter().next() {
            Some(url) => PollStep::Succeeded(url),
            None => PollStep::Failed(MaxStudioError::UnexpectedResponse(format!(
                "job {} completed without result URLs",
                job_id
            ))),
        },
        JobStatus::Failed => {
            let detail = snapshot.error_detail().unwrap_or("Unknown error").to_string();
            PollStep::Failed(MaxStudioError::JobFailed(detail))
        }
        JobStatus::NotFound => PollStep::Failed(MaxStudioError::JobNotFound),
        JobStatus::Creating | JobStatus::Pending | JobStatus::Running | JobStatus::Unknown => {
            PollStep::Continue
        }
    }
}

/// Drives a [`JobClient`] from submission to a single terminal outcome.
///
/// Each call to [`run`](Self::run) owns its own job handle and attempt
/// counter, so one orchestrator can serve many concurrent generations.
/// Dropping the returned future cancels it: the pending wait or request is
/// abandoned and no further calls are issued.
///
/// # Example
/// ```no_run
/// use maxstudio_rs::{BabyGender, GenerationRequest, PollOrchestrator};
///
/// # async fn example() -> maxstudio_rs::Result<()> {
/// let orchestrator = PollOrchestrator::default();
/// let request = GenerationRequest::new(
///     "https://cdn.example.com/dad.png",
///     "https://cdn.example.com/mom.png",
///     BabyGender::Boy,
/// )?;
/// let image_url = orchestrator.run(&request, "my-api-key").await?;
/// println!("Baby: {}", image_url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PollOrchestrator<T = ReqwestTransport> {
    client: JobClient<T>,
    config: PollConfig,
}

impl Default for PollOrchestrator<ReqwestTransport> {
    fn default() -> Self {
        Self::new(ClientConfig::default())
    }
}

impl PollOrchestrator<ReqwestTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(JobClient::new(config))
    }
}

impl<T: HttpTransport> PollOrchestrator<T> {
    /// Wrap an existing client with the default 3s x 30 polling policy.
    pub fn with_client(client: JobClient<T>) -> Self {
        Self {
            client,
            config: PollConfig::default(),
        }
    }

    pub fn with_poll_config(mut self, config: PollConfig) -> Self {
        self.config = config;
        self
    }

    pub fn client(&self) -> &JobClient<T> {
        &self.client
    }

    pub fn poll_config(&self) -> &PollConfig {
        &self.config
    }

    /// Submit `request` and poll until it succeeds, fails or times out.
    ///
    /// Submission errors are never retried.
    pub async fn run(&self, request: &GenerationRequest, credential: &str) -> Result<String> {
        self.run_with_progress(request, credential, |_| {}).await
    }

    /// Like [`run`](Self::run), calling `on_progress` after every poll attempt.
    pub async fn run_with_progress<F>(
        &self,
        request: &GenerationRequest,
        credential: &str,
        on_progress: F,
    ) -> Result<String>
    where
        F: FnMut(PollProgress),
    {
        let handle = self.client.submit(request, credential).await?;
        self.poll_with_progress(&handle, credential, on_progress).await
    }

    /// Like [`run`](Self::run), but gives up with [`MaxStudioError::Cancelled`]
    /// as soon as `cancel` fires, abandoning any in-flight wait or request.
    pub async fn run_until_cancelled(
        &self,
        request: &GenerationRequest,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<String> {
        if cancel.is_cancelled() {
            return Err(MaxStudioError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                info!("baby generation cancelled");
                Err(MaxStudioError::Cancelled)
            }
            outcome = self.run(request, credential) => outcome,
        }
    }

    /// Like [`run`](Self::run), reading the API key from a host store.
    pub async fn run_with_store<S>(&self, request: &GenerationRequest, store: &S) -> Result<String>
    where
        S: CredentialStore + ?Sized,
    {
        let credential = store
            .load_credential()
            .ok_or(MaxStudioError::CredentialMissing)?;
        self.run(request, &credential).await
    }

    /// Poll an already-submitted job to a terminal outcome.
    pub async fn poll(&self, handle: &JobHandle, credential: &str) -> Result<String> {
        self.poll_with_progress(handle, credential, |_| {}).await
    }

    async fn poll_with_progress<F>(
        &self,
        handle: &JobHandle,
        credential: &str,
        mut on_progress: F,
    ) -> Result<String>
    where
        F: FnMut(PollProgress),
    {
        let credential = require_credential(credential)?;

        let job_id = handle.job_id();
        let max_attempts = self.config.max_attempts;
        info!(
            job_id,
            max_attempts,
            interval = ?self.config.interval,
            budget = ?self.config.budget(),
            "polling job status"
        );

        for attempt in 1..=max_attempts {
            tokio::time::sleep(self.config.interval).await;
            debug!(job_id, attempt, max_attempts, "poll attempt");

            let snapshot = match self.client.get_status(handle, credential).await {
                Ok(snapshot) => snapshot,
                Err(e) if e.is_retriable() => {
                    on_progress(PollProgress {
                        job_id: job_id.to_string(),
                        attempt,
                        max_attempts,
                        status: None,
                    });
                    if attempt == max_attempts {
                        warn!(job_id, attempt, error = %e, "final poll attempt failed");
                        return Err(e);
                    }
                    warn!(job_id, attempt, error = %e, "poll attempt failed, retrying");
                    continue;
                }
                Err(e) => {
                    warn!(job_id, attempt, error = %e, "polling stopped");
                    return Err(e);
                }
            };

            on_progress(PollProgress {
                job_id: job_id.to_string(),
                attempt,
                max_attempts,
                status: Some(snapshot.status),
            });

            match next_step(job_id, snapshot) {
                PollStep::Continue => continue,
                PollStep::Succeeded(url) => {
                    info!(job_id, attempt, %url, "baby generation completed");
                    return Ok(url);
                }
                PollStep::Failed(e) => {
                    warn!(job_id, attempt, error = %e, "baby generation failed");
                    return Err(e);
                }
            }
        }

        warn!(job_id, max_attempts, "job did not finish within the polling budget");
        Err(MaxStudioError::PollingTimeout {
            attempts: max_attempts,
        })
    }
}
