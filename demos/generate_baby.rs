//! Generate a baby image from two parent photos.
//!
//! Requires a MaxStudio API key and two publicly reachable image URLs.
//!
//! ```sh
//! RUST_LOG=maxstudio_rs=debug cargo run --example generate_baby -- \
//!     <API_KEY> <FATHER_IMAGE_URL> <MOTHER_IMAGE_URL> [boy|girl]
//! ```
//!
//! Press Ctrl-C to cancel while the job is being polled.

use maxstudio_rs::{
    BabyGender, CancellationToken, GenerationRequest, MaxStudioError, PollOrchestrator,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    if args.len() < 3 {
        eprintln!("usage: generate_baby <API_KEY> <FATHER_URL> <MOTHER_URL> [boy|girl]");
        return Ok(());
    }

    let api_key = &args[0];

    let gender = match args.get(3).map(|s| s.to_lowercase()).as_deref() {
        Some("girl") => BabyGender::Girl,
        _ => BabyGender::Boy,
    };
    let request = GenerationRequest::new(&args[1], &args[2], gender)?;

    let orchestrator = PollOrchestrator::default();
    println!(
        "Generating a {} (up to {:?})...",
        gender,
        orchestrator.poll_config().budget()
    );

    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_ctrl_c.cancel();
        }
    });

    match orchestrator
        .run_until_cancelled(&request, api_key, &cancel)
        .await
    {
        Ok(url) => println!("Baby image: {}", url),
        Err(MaxStudioError::Cancelled) => eprintln!("Cancelled"),
        Err(e) => eprintln!("Generation failed: {}", e),
    }

    Ok(())
}
