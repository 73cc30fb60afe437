//! Transcript command implementation.

use super::run_preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{TranscriptFetcher, TranscriptOutcome, YtTranscriptSource};
use anyhow::Result;
use std::sync::Arc;

/// Run the transcript command.
pub async fn run_transcript(video: &str, settings: Settings) -> Result<()> {
    run_preflight(Operation::FetchTranscript, &settings)?;

    let fetcher = TranscriptFetcher::new(
        Arc::new(YtTranscriptSource::new()?),
        settings.youtube.languages.clone(),
    );

    let spinner = Output::spinner("Fetching transcript...");
    let outcome = fetcher.fetch(video).await;
    spinner.finish_and_clear();

    match outcome {
        TranscriptOutcome::Available(text) => println!("{}", text),
        TranscriptOutcome::Absent(reason) => {
            Output::warning(&format!("No transcript for {}: {}", video, reason));
        }
    }

    Ok(())
}
