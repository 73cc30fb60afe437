//! Videos command implementation.

use super::run_preflight;
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use crate::youtube::{ChannelVideoLister, DataApiListing};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Run the videos command.
pub async fn run_videos(channel: &str, settings: Settings) -> Result<()> {
    run_preflight(Operation::ListVideos, &settings)?;

    let api_key = settings
        .youtube_api_key()
        .context("YouTube Data API key missing")?;
    let listing = DataApiListing::new(&settings.youtube, &api_key)?;

    let spinner = Output::spinner(&format!("Listing {}...", channel));
    let lister = ChannelVideoLister::new(Arc::new(listing)).with_progress(spinner.clone());
    let result = lister.list(channel).await;
    spinner.finish_and_clear();

    let videos = match result {
        Ok(videos) => videos,
        Err(e) => {
            Output::error(&format!("Listing failed: {}", e));
            return Err(e.into());
        }
    };

    if videos.is_empty() {
        Output::warning("The channel has no videos.");
        return Ok(());
    }

    Output::header(&format!("{} videos", videos.len()));
    for video in &videos {
        Output::video(&video.title, &video.id, &video.channel_name);
    }

    Ok(())
}
