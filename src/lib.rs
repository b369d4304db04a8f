//! # maxstudio-rs
//!
//! Async Rust client for the [MaxStudio](https://maxstudio.ai) baby generator
//! API.
//!
//! Generation is asynchronous on the server: a job is created from two
//! parent photos, then its status is polled until it completes or fails.
//! [`JobClient`] speaks the two endpoints; [`PollOrchestrator`] runs the
//! submit-then-poll state machine with a fixed 3 second interval and a
//! 30 attempt budget.
//!
//! ## Quick Start
//!
//! ```no_run
//! use maxstudio_rs::{BabyGender, GenerationRequest, MaxStudioError, PollOrchestrator};
//!
//! # async fn example() -> maxstudio_rs::Result<()> {
//! let orchestrator = PollOrchestrator::default();
//!
//! // Query strings (signed URLs) are stripped before transmission
//! let request = GenerationRequest::new(
//!     "https://cdn.example.com/dad.png?token=abc",
//!     "https://cdn.example.com/mom.png",
//!     BabyGender::Girl,
//! )?;
//!
//! match orchestrator.run(&request, "my-api-key").await {
//!     Ok(url) => println!("Baby image: {}", url),
//!     Err(MaxStudioError::PollingTimeout { .. }) => eprintln!("Took too long"),
//!     Err(e) => eprintln!("Generation failed: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Requests, poll attempts and swallowed transient errors are reported
//! through [`tracing`]. Install a subscriber in the host to see them.

pub mod client;
pub mod config;
pub mod error;
pub mod poller;
pub mod store;
pub mod transport;
pub mod types;
pub mod url;

pub use client::JobClient;
pub use config::{ClientConfig, PollConfig};
pub use error::{MaxStudioError, Result};
pub use poller::{PollOrchestrator, PollProgress};
pub use store::{CredentialStore, MemoryCredentialStore};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use types::{BabyGender, GenerationRequest, JobHandle, JobStatus, JobStatusSnapshot};
pub use url::clean_url_params;

pub use tokio_util::sync::CancellationToken;
