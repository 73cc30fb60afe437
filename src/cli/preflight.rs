//! Pre-flight checks before expensive operations.
//!
//! Validates that required credentials are available before starting
//! operations that would otherwise fail midway.

use crate::config::{Settings, YOUTUBE_API_KEY_ENV};
use crate::error::{PitstopError, Result};

/// Requirements for different operations.
#[derive(Debug, Clone, Copy)]
pub enum Operation {
    /// Listing channels needs a YouTube Data API key.
    ListVideos,
    /// Fetching transcripts needs nothing.
    FetchTranscript,
    /// Building the index lists channels and embeds titles.
    BuildIndex,
    /// Answering embeds the message and calls the chat model.
    Ask,
    /// Search embeds the query.
    Search,
}

/// Run pre-flight checks for the given operation.
///
/// `needs_build` says whether the index still has to be built, in which case
/// the build requirements apply as well.
pub fn check(operation: Operation, settings: &Settings, needs_build: bool) -> Result<()> {
    match operation {
        Operation::ListVideos => {
            check_youtube_key(settings)?;
        }
        Operation::FetchTranscript => {}
        Operation::BuildIndex => {
            check_openai_key()?;
            check_youtube_key(settings)?;
        }
        Operation::Ask | Operation::Search => {
            check_openai_key()?;
            if needs_build {
                check_youtube_key(settings)?;
            }
        }
    }
    Ok(())
}

/// Check if OpenAI API key is configured.
fn check_openai_key() -> Result<()> {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if !key.is_empty() => Ok(()),
        Ok(_) => Err(PitstopError::Config(
            "OPENAI_API_KEY is empty. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
        Err(_) => Err(PitstopError::Config(
            "OPENAI_API_KEY not set. Set it with: export OPENAI_API_KEY='sk-...'".to_string(),
        )),
    }
}

/// Check if a YouTube Data API key is configured.
fn check_youtube_key(settings: &Settings) -> Result<()> {
    if settings.youtube_api_key().is_some() {
        Ok(())
    } else {
        Err(PitstopError::Config(format!(
            "No YouTube Data API key. Set youtube.api_key in the config file or export {}='...'",
            YOUTUBE_API_KEY_ENV
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_transcript_no_requirements() {
        assert!(check(Operation::FetchTranscript, &Settings::default(), true).is_ok());
    }

    #[test]
    fn test_configured_youtube_key_passes() {
        let mut settings = Settings::default();
        settings.youtube.api_key = Some("key".to_string());
        assert!(check(Operation::ListVideos, &settings, false).is_ok());
    }
}
