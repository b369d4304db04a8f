use thiserror::Error;

/// Boxed cause carried by [`MaxStudioError::Transport`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by MaxStudio operations.
#[derive(Error, Debug)]
pub enum MaxStudioError {
    /// No API key was supplied, or it was blank.
    #[error("API key is not configured")]
    CredentialMissing,

    /// An image reference is not an absolute HTTP(S) URL.
    #[error("Invalid image URL '{url}': {reason}")]
    InvalidImageUrl { url: String, reason: String },

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Transport {
        context: String,
        #[source]
        source: BoxError,
    },

    /// MaxStudio returned a non-success HTTP status.
    #[error("MaxStudio returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// A 2xx response body could not be decoded.
    #[error("Failed to decode MaxStudio response: {0}")]
    Decode(#[source] serde_json::Error),

    /// The submit call succeeded but no job identifier came back.
    #[error("{}", .0.as_deref().unwrap_or("Failed to create baby generation job"))]
    JobCreationFailed(Option<String>),

    /// The API does not know the job (404 "job not found" or a `not-found` status).
    #[error("Job not found by API")]
    JobNotFound,

    /// The server reported the job as failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The server broke its response contract.
    #[error("Unexpected response from MaxStudio: {0}")]
    UnexpectedResponse(String),

    /// The job did not reach a terminal status within the poll budget.
    #[error("Polling for job status timed out after {attempts} attempts")]
    PollingTimeout { attempts: u32 },

    /// The orchestrator was cancelled before reaching a terminal state.
    #[error("Generation was cancelled")]
    Cancelled,

    /// JSON serialization error for an outgoing body.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl MaxStudioError {
    pub(crate) fn transport(context: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Transport {
            context: context.into(),
            source: source.into(),
        }
    }

    /// Whether the orchestrator treats this error as a transient poll failure.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            Self::Transport { .. } | Self::Http { .. } | Self::Decode(_)
        )
    }

    /// HTTP status code, when the error came from a non-success response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::JobNotFound => Some(404),
            _ => None,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, MaxStudioError>;
