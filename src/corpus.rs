//! Corpus assembly: channel listings plus transcripts, flattened into
//! parallel title and citation-metadata sequences ready for indexing.

use crate::error::Result;
use crate::youtube::{AbsentReason, ChannelVideoLister, TranscriptFetcher, TranscriptOutcome, VideoRecord};
use indicatif::ProgressBar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, instrument};

/// Citation data stored alongside each indexed title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMetadata {
    /// Watch URL of the video.
    pub link: String,
    /// Channel display name.
    pub channel: String,
    /// Absolute channel URL.
    pub channel_link: String,
    /// Flattened transcript text.
    pub transcript: String,
}

/// One indexable video.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusEntry {
    pub title: String,
    pub metadata: CitationMetadata,
}

/// Parallel title and metadata sequences. Entry `i` of one belongs to entry
/// `i` of the other; the only way in is [`Corpus::push`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Corpus {
    titles: Vec<String>,
    metadata: Vec<CitationMetadata>,
}

impl Corpus {
    /// Create an empty corpus.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one entry to both sequences.
    pub fn push(&mut self, entry: CorpusEntry) {
        self.titles.push(entry.title);
        self.metadata.push(entry.metadata);
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn metadata(&self) -> &[CitationMetadata] {
        &self.metadata
    }

    pub fn len(&self) -> usize {
        self.titles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.titles.is_empty()
    }

    /// Iterate over entries as (title, metadata) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &CitationMetadata)> {
        self.titles.iter().zip(self.metadata.iter())
    }

    /// Split into the two sequences.
    pub fn into_parts(self) -> (Vec<String>, Vec<CitationMetadata>) {
        (self.titles, self.metadata)
    }
}

impl FromIterator<CorpusEntry> for Corpus {
    fn from_iter<I: IntoIterator<Item = CorpusEntry>>(iter: I) -> Self {
        let mut corpus = Corpus::new();
        for entry in iter {
            corpus.push(entry);
        }
        corpus
    }
}

/// Counts gathered while building a corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Channels that were listed.
    pub channels: usize,
    /// Videos returned by all listings.
    pub videos_listed: usize,
    /// Videos that made it into the corpus.
    pub entries: usize,
    /// Skipped videos per absence reason label.
    pub skipped: BTreeMap<&'static str, usize>,
}

impl BuildReport {
    /// Total number of skipped videos.
    pub fn skipped_total(&self) -> usize {
        self.skipped.values().sum()
    }

    fn record_skip(&mut self, reason: &AbsentReason) {
        *self.skipped.entry(reason.label()).or_insert(0) += 1;
    }
}

/// Builds a [`Corpus`] from one or more channels.
pub struct CorpusBuilder {
    lister: ChannelVideoLister,
    fetcher: TranscriptFetcher,
    origin: String,
    default_channels: Vec<String>,
    progress: ProgressBar,
}

impl CorpusBuilder {
    /// Create a builder.
    ///
    /// `origin` is prefixed to each video's relative channel path, and
    /// `default_channels` is used when [`CorpusBuilder::build`] gets `None`.
    pub fn new(
        lister: ChannelVideoLister,
        fetcher: TranscriptFetcher,
        origin: &str,
        default_channels: Vec<String>,
    ) -> Self {
        Self {
            lister,
            fetcher,
            origin: origin.trim_end_matches('/').to_string(),
            default_channels,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report per-video progress on a progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// List every channel, fetch each video's transcript, and keep the
    /// videos that have one, in listing order.
    ///
    /// All channels are processed. A listing failure aborts the build;
    /// transcript failures only skip the video.
    #[instrument(skip(self))]
    pub async fn build(&self, channels: Option<&[String]>) -> Result<(Corpus, BuildReport)> {
        let channels = channels.unwrap_or(&self.default_channels);
        let mut report = BuildReport {
            channels: channels.len(),
            ..Default::default()
        };

        let mut videos: Vec<VideoRecord> = Vec::new();
        for channel in channels {
            info!("Listing channel {}", channel);
            videos.extend(self.lister.list(channel).await?);
        }
        report.videos_listed = videos.len();

        let total = videos.len();
        self.progress.set_length(total as u64);

        let mut corpus = Corpus::new();
        for (i, video) in videos.into_iter().enumerate() {
            debug!("Retrieving video ({}/{})", i + 1, total);
            self.progress.set_message(video.title.clone());

            match self.fetcher.fetch(&video.id).await {
                TranscriptOutcome::Available(transcript) => {
                    corpus.push(self.entry(video, transcript));
                }
                TranscriptOutcome::Absent(reason) => {
                    report.record_skip(&reason);
                }
            }

            self.progress.inc(1);
        }

        report.entries = corpus.len();
        info!(
            "Corpus built: {} entries from {} videos ({} skipped)",
            report.entries,
            report.videos_listed,
            report.skipped_total()
        );

        Ok((corpus, report))
    }

    fn entry(&self, video: VideoRecord, transcript: String) -> CorpusEntry {
        CorpusEntry {
            title: video.title,
            metadata: CitationMetadata {
                link: video.link,
                channel: video.channel_name,
                channel_link: format!("{}{}", self.origin, video.channel_link),
                transcript,
            },
        }
    }
}
