//! Transcript retrieval.
//!
//! [`TranscriptFetcher`] never fails: every way a transcript can be missing is
//! reported as [`TranscriptOutcome::Absent`] with a reason, so callers can
//! skip the video and still tell "no captions" apart from a network error.

use crate::error::{PitstopError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use yt_transcript_rs::api::YouTubeTranscriptApi;
use yt_transcript_rs::errors::{CouldNotRetrieveTranscript, CouldNotRetrieveTranscriptReason};

/// Why a video yielded no transcript.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AbsentReason {
    /// The uploader disabled captions.
    Disabled,
    /// Captions exist, but none in the requested languages.
    NotInLanguages,
    /// The video is private, removed, or otherwise unplayable.
    VideoUnavailable,
    /// The platform refused the request (IP or bot blocking).
    Blocked,
    /// The transcript was returned but contained no text.
    Empty,
    /// The request did not complete.
    Transport(String),
    /// Anything else reported by the transcript backend.
    Other(String),
}

impl AbsentReason {
    /// Short stable label, used when counting skips.
    pub fn label(&self) -> &'static str {
        match self {
            AbsentReason::Disabled => "transcripts disabled",
            AbsentReason::NotInLanguages => "no transcript in requested languages",
            AbsentReason::VideoUnavailable => "video unavailable",
            AbsentReason::Blocked => "request blocked",
            AbsentReason::Empty => "empty transcript",
            AbsentReason::Transport(_) => "transport error",
            AbsentReason::Other(_) => "other error",
        }
    }

    /// Whether the absence is a property of the video rather than of this run.
    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            AbsentReason::Disabled
                | AbsentReason::NotInLanguages
                | AbsentReason::VideoUnavailable
                | AbsentReason::Empty
        )
    }
}

impl std::fmt::Display for AbsentReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsentReason::Transport(msg) | AbsentReason::Other(msg) => {
                write!(f, "{}: {}", self.label(), msg)
            }
            _ => write!(f, "{}", self.label()),
        }
    }
}

/// Result of fetching one video's transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptOutcome {
    /// Utterances joined by single spaces, in transcript order.
    Available(String),
    /// No usable transcript.
    Absent(AbsentReason),
}

impl TranscriptOutcome {
    /// The transcript text, if present.
    pub fn into_text(self) -> Option<String> {
        match self {
            TranscriptOutcome::Available(text) => Some(text),
            TranscriptOutcome::Absent(_) => None,
        }
    }
}

/// Backend that returns the raw utterances of a video's transcript.
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch utterance texts in order, trying `languages` by preference.
    async fn utterances(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> std::result::Result<Vec<String>, AbsentReason>;
}

/// Fetches transcripts and flattens them into a single string.
pub struct TranscriptFetcher {
    source: Arc<dyn TranscriptSource>,
    languages: Vec<String>,
}

impl TranscriptFetcher {
    /// Create a fetcher with a language preference list (most preferred first).
    pub fn new(source: Arc<dyn TranscriptSource>, languages: Vec<String>) -> Self {
        Self { source, languages }
    }

    /// Fetch the transcript of `video_id`.
    #[instrument(skip(self))]
    pub async fn fetch(&self, video_id: &str) -> TranscriptOutcome {
        match self.source.utterances(video_id, &self.languages).await {
            Ok(utterances) => {
                let text = utterances.join(" ");
                if text.trim().is_empty() {
                    debug!("Transcript for {} is empty", video_id);
                    TranscriptOutcome::Absent(AbsentReason::Empty)
                } else {
                    debug!("Transcript for {}: {} utterances", video_id, utterances.len());
                    TranscriptOutcome::Available(text)
                }
            }
            Err(reason) => {
                if reason.is_permanent() {
                    debug!("No transcript for {}: {}", video_id, reason);
                } else {
                    warn!("Transcript fetch for {} failed: {}", video_id, reason);
                }
                TranscriptOutcome::Absent(reason)
            }
        }
    }
}

/// Transcript source backed by the `yt-transcript-rs` client.
pub struct YtTranscriptSource {
    api: YouTubeTranscriptApi,
}

impl YtTranscriptSource {
    /// Create a client without cookies or proxy configuration.
    pub fn new() -> Result<Self> {
        let api = YouTubeTranscriptApi::new(None, None, None)
            .map_err(|e| PitstopError::Transcript(format!("Failed to create client: {}", e)))?;
        Ok(Self { api })
    }

    fn classify(error: &CouldNotRetrieveTranscript) -> AbsentReason {
        match &error.reason {
            Some(CouldNotRetrieveTranscriptReason::TranscriptsDisabled { .. }) => AbsentReason::Disabled,
            Some(CouldNotRetrieveTranscriptReason::NoTranscriptFound { .. }) => {
                AbsentReason::NotInLanguages
            }
            Some(CouldNotRetrieveTranscriptReason::VideoUnavailable { .. }) => {
                AbsentReason::VideoUnavailable
            }
            Some(CouldNotRetrieveTranscriptReason::IpBlocked { .. })
            | Some(CouldNotRetrieveTranscriptReason::RequestBlocked { .. }) => AbsentReason::Blocked,
            Some(CouldNotRetrieveTranscriptReason::YouTubeRequestFailed { .. }) => {
                AbsentReason::Transport(error.to_string())
            }
            _ => AbsentReason::Other(error.to_string()),
        }
    }
}

#[async_trait]
impl TranscriptSource for YtTranscriptSource {
    async fn utterances(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> std::result::Result<Vec<String>, AbsentReason> {
        let languages: Vec<&str> = languages.iter().map(String::as_str).collect();

        let transcript = self
            .api
            .fetch_transcript(video_id, &languages, false)
            .await
            .map_err(|e| Self::classify(&e))?;

        Ok(transcript.snippets.into_iter().map(|s| s.text).collect())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Canned transcript backend shared by tests.

    use super::*;
    use std::collections::HashMap;

    /// Returns fixed utterances per video; unknown videos have captions disabled.
    #[derive(Default)]
    pub struct FakeTranscripts {
        transcripts: HashMap<String, std::result::Result<Vec<String>, AbsentReason>>,
    }

    impl FakeTranscripts {
        pub fn with(mut self, video_id: &str, utterances: &[&str]) -> Self {
            self.transcripts.insert(
                video_id.to_string(),
                Ok(utterances.iter().map(|u| u.to_string()).collect()),
            );
            self
        }

        pub fn failing(mut self, video_id: &str, reason: AbsentReason) -> Self {
            self.transcripts.insert(video_id.to_string(), Err(reason));
            self
        }
    }

    #[async_trait]
    impl TranscriptSource for FakeTranscripts {
        async fn utterances(
            &self,
            video_id: &str,
            _languages: &[String],
        ) -> std::result::Result<Vec<String>, AbsentReason> {
            self.transcripts
                .get(video_id)
                .cloned()
                .unwrap_or(Err(AbsentReason::Disabled))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::FakeTranscripts;
    use super::*;
    use std::sync::Mutex;

    fn fetcher(source: FakeTranscripts) -> TranscriptFetcher {
        TranscriptFetcher::new(
            Arc::new(source),
            vec!["en-US".to_string(), "en".to_string()],
        )
    }

    #[tokio::test]
    async fn test_joins_utterances_with_single_spaces() {
        let fetcher = fetcher(FakeTranscripts::default().with(
            "v1",
            &["so today we're", "replacing the", "Front  brake pads."],
        ));

        assert_eq!(
            fetcher.fetch("v1").await,
            TranscriptOutcome::Available(
                "so today we're replacing the Front  brake pads.".to_string()
            )
        );
    }

    #[tokio::test]
    async fn test_failures_become_tagged_absence() {
        let fetcher = fetcher(
            FakeTranscripts::default()
                .failing("v2", AbsentReason::NotInLanguages)
                .failing("v3", AbsentReason::Transport("timed out".to_string())),
        );

        assert_eq!(
            fetcher.fetch("v2").await,
            TranscriptOutcome::Absent(AbsentReason::NotInLanguages)
        );
        assert_eq!(
            fetcher.fetch("v3").await,
            TranscriptOutcome::Absent(AbsentReason::Transport("timed out".to_string()))
        );
        assert_eq!(
            fetcher.fetch("unknown").await,
            TranscriptOutcome::Absent(AbsentReason::Disabled)
        );
    }

    #[tokio::test]
    async fn test_empty_transcript_is_absent_not_empty_string() {
        let fetcher = fetcher(FakeTranscripts::default().with("v4", &[]));
        let outcome = fetcher.fetch("v4").await;
        assert_eq!(outcome, TranscriptOutcome::Absent(AbsentReason::Empty));
        assert_eq!(outcome.into_text(), None);
    }

    struct RecordingSource {
        seen: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl TranscriptSource for RecordingSource {
        async fn utterances(
            &self,
            _video_id: &str,
            languages: &[String],
        ) -> std::result::Result<Vec<String>, AbsentReason> {
            self.seen.lock().unwrap().push(languages.to_vec());
            Ok(vec!["hi".to_string()])
        }
    }

    #[tokio::test]
    async fn test_passes_language_preference_in_order() {
        let source = Arc::new(RecordingSource {
            seen: Mutex::new(Vec::new()),
        });
        let fetcher = TranscriptFetcher::new(
            source.clone(),
            vec!["en-US".to_string(), "en".to_string()],
        );

        fetcher.fetch("v").await;
        assert_eq!(*source.seen.lock().unwrap(), vec![vec!["en-US", "en"]]);
    }

    #[test]
    fn test_reason_permanence() {
        assert!(AbsentReason::Disabled.is_permanent());
        assert!(!AbsentReason::Blocked.is_permanent());
        assert!(!AbsentReason::Transport("x".to_string()).is_permanent());
        assert_eq!(
            AbsentReason::Other("boom".to_string()).to_string(),
            "other error: boom"
        );
    }
}
