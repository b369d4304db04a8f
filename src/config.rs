use std::time::Duration;

/// Production MaxStudio API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.maxstudio.ai";

/// Delay before every status poll.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Status polls issued before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 30;

fn normalize(endpoint: String) -> String {
    endpoint.trim_end_matches('/').to_string()
}

/// Endpoint and per-request timeouts for [`JobClient`](crate::JobClient).
///
/// Use [`ClientConfig::builder()`] for ergonomic construction, or
/// [`ClientConfig::default()`] for the production endpoint.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL, without trailing slash.
    pub base_url: String,

    /// Timeout for `POST /baby-generator` (default: 15s).
    pub submit_timeout: Duration,

    /// Timeout for `GET /baby-generator/{jobId}` (default: 10s).
    pub status_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            submit_timeout: Duration::from_secs(15),
            status_timeout: Duration::from_secs(10),
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }
}

/// Builder for [`ClientConfig`].
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Point the client at another deployment (staging, a local mock).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = normalize(base_url.into());
        self
    }

    pub fn with_submit_timeout(mut self, timeout: Duration) -> Self {
        self.config.submit_timeout = timeout;
        self
    }

    pub fn with_status_timeout(mut self, timeout: Duration) -> Self {
        self.config.status_timeout = timeout;
        self
    }

    pub fn build(self) -> ClientConfig {
        self.config
    }
}

/// Polling policy for [`PollOrchestrator`](crate::PollOrchestrator).
///
/// The hard wall-clock budget is `interval * max_attempts`, 90 seconds with
/// the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Wait before each status poll.
    pub interval: Duration,

    /// Maximum number of status polls.
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollConfig {
    pub fn builder() -> PollConfigBuilder {
        PollConfigBuilder::default()
    }

    /// Total time spent waiting between polls when every attempt is used.
    pub fn budget(&self) -> Duration {
        self.interval * self.max_attempts
    }
}

/// Builder for [`PollConfig`].
#[derive(Default)]
pub struct PollConfigBuilder {
    config: PollConfig,
}

impl PollConfigBuilder {
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.config.interval = interval;
        self
    }

    /// Values below 1 are clamped to a single attempt.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts.max(1);
        self
    }

    pub fn build(self) -> PollConfig {
        self.config
    }
}
