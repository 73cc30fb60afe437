//! Index bootstrap.
//!
//! Loads the persisted index when its directory exists, otherwise scrapes
//! the configured channels, embeds the corpus and saves the result.

use crate::config::{Settings, YOUTUBE_API_KEY_ENV};
use crate::corpus::{BuildReport, CorpusBuilder};
use crate::embedding::Embedder;
use crate::error::{PitstopError, Result};
use crate::index::VideoIndex;
use crate::youtube::{ChannelVideoLister, DataApiListing, TranscriptFetcher, YtTranscriptSource};
use indicatif::ProgressBar;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

/// A ready index and, when it was freshly built, the build report.
pub struct Bootstrapped {
    pub index: VideoIndex,
    pub report: Option<BuildReport>,
}

impl Bootstrapped {
    /// Whether the index was built during this run.
    pub fn was_built(&self) -> bool {
        self.report.is_some()
    }
}

/// Create a corpus builder wired to the YouTube Data API and the transcript
/// client, reporting progress on `progress`.
pub fn corpus_builder(settings: &Settings, progress: ProgressBar) -> Result<CorpusBuilder> {
    let api_key = settings
        .youtube_api_key()
        .ok_or_else(|| {
            PitstopError::Config(format!(
                "No YouTube Data API key. Set youtube.api_key or {}",
                YOUTUBE_API_KEY_ENV
            ))
        })?;

    let listing = DataApiListing::new(&settings.youtube, &api_key)?;
    let lister = ChannelVideoLister::new(Arc::new(listing)).with_progress(progress.clone());
    let fetcher = TranscriptFetcher::new(
        Arc::new(YtTranscriptSource::new()?),
        settings.youtube.languages.clone(),
    );

    Ok(CorpusBuilder::new(
        lister,
        fetcher,
        &settings.youtube.origin,
        settings.youtube.channels.clone(),
    )
    .with_progress(progress))
}

/// Load the index at `dir`, or build and save it when the directory is absent.
///
/// `make_builder` is only called when a build is needed, so loading works
/// without YouTube credentials. With `force`, an existing directory is
/// removed first.
#[instrument(skip(embedder, make_builder))]
pub async fn load_or_build<F>(
    dir: &Path,
    embedder: Arc<dyn Embedder>,
    channels: Option<&[String]>,
    force: bool,
    make_builder: F,
) -> Result<Bootstrapped>
where
    F: FnOnce() -> Result<CorpusBuilder>,
{
    if force && dir.exists() {
        info!("Removing existing index at {:?}", dir);
        std::fs::remove_dir_all(dir)?;
    }

    if VideoIndex::exists(dir) {
        let index = VideoIndex::load(dir, embedder)?;
        return Ok(Bootstrapped {
            index,
            report: None,
        });
    }

    info!("No index at {:?}, building one", dir);
    let builder = make_builder()?;
    let (corpus, report) = builder.build(channels).await?;

    let index = VideoIndex::from_corpus(corpus, embedder).await?;
    index.save(dir)?;

    Ok(Bootstrapped {
        index,
        report: Some(report),
    })
}

/// [`load_or_build`] against the configured index directory and channels.
pub async fn load_or_build_from_settings(
    settings: &Settings,
    embedder: Arc<dyn Embedder>,
    channels: Option<&[String]>,
    force: bool,
    progress: ProgressBar,
) -> Result<Bootstrapped> {
    load_or_build(&settings.index_dir(), embedder, channels, force, || {
        corpus_builder(settings, progress)
    })
    .await
}
