//! YouTube video listing and transcript retrieval.
//!
//! The listing side is split into a [`VideoListing`] backend that knows how to
//! fetch one page, and [`ChannelVideoLister`] which follows the page cursors
//! until the channel is exhausted.

mod data_api;
pub mod transcript;

pub use data_api::DataApiListing;
pub use transcript::{
    AbsentReason, TranscriptFetcher, TranscriptOutcome, TranscriptSource, YtTranscriptSource,
};

use crate::error::Result;
use async_trait::async_trait;
use indicatif::ProgressBar;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use tracing::{debug, info, instrument, warn};

/// A video as reported by the channel listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoRecord {
    /// Platform video ID.
    pub id: String,
    /// Video title.
    pub title: String,
    /// Absolute watch URL.
    pub link: String,
    /// Display name of the owning channel.
    pub channel_name: String,
    /// Channel path relative to the platform origin (e.g. `/channel/UC...`).
    pub channel_link: String,
}

/// Opaque position in a paginated listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageCursor {
    /// Backend-specific listing the token belongs to (e.g. an uploads playlist).
    pub listing_id: String,
    /// Token for the next page.
    pub token: String,
}

/// One page of a channel listing.
#[derive(Debug, Clone, Default)]
pub struct ListingPage {
    /// Videos on this page, in platform order.
    pub videos: Vec<VideoRecord>,
    /// Cursor for the following page, `None` once the listing is exhausted.
    pub next: Option<PageCursor>,
}

impl ListingPage {
    /// Whether the backend reports more pages after this one.
    pub fn has_more(&self) -> bool {
        self.next.is_some()
    }
}

/// Backend that fetches channel listings one page at a time.
#[async_trait]
pub trait VideoListing: Send + Sync {
    /// Fetch the first page of a channel's videos.
    async fn first_page(&self, channel: &str) -> Result<ListingPage>;

    /// Fetch the page a cursor points at.
    async fn next_page(&self, cursor: &PageCursor) -> Result<ListingPage>;
}

/// Lists every video of a channel by following listing pages to the end.
pub struct ChannelVideoLister {
    listing: Arc<dyn VideoListing>,
    progress: ProgressBar,
}

impl ChannelVideoLister {
    /// Create a lister over the given listing backend.
    pub fn new(listing: Arc<dyn VideoListing>) -> Self {
        Self {
            listing,
            progress: ProgressBar::hidden(),
        }
    }

    /// Report the running video count on a progress bar.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// List all videos of `channel` in the order the platform returns them.
    ///
    /// Listing errors are returned as-is; nothing is retried.
    #[instrument(skip(self))]
    pub async fn list(&self, channel: &str) -> Result<Vec<VideoRecord>> {
        let mut page = self.listing.first_page(channel).await?;
        let mut videos = std::mem::take(&mut page.videos);
        self.report(channel, videos.len());

        while let Some(cursor) = page.next.take() {
            page = self.listing.next_page(&cursor).await?;
            videos.append(&mut page.videos);
            self.report(channel, videos.len());

            if page.next.as_ref() == Some(&cursor) {
                warn!(
                    "Listing for {} returned the same page token twice, stopping at {} videos",
                    channel,
                    videos.len()
                );
                break;
            }
        }

        debug!("Listing for {} complete", channel);
        Ok(videos)
    }

    fn report(&self, channel: &str, count: usize) {
        info!("Videos retrieved: {}", count);
        self.progress
            .set_message(format!("{}: {} videos retrieved", channel, count));
    }
}

/// A channel reference as accepted on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelRef {
    /// Channel ID (`UC...`), or any other string passed through unchanged.
    Id(String),
    /// Channel handle including the leading `@`.
    Handle(String),
}

fn channel_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r"(?x)
            ^(?:
                # Channel URLs
                (?:https?://)?
                (?:www\.|m\.)?
                youtube\.com/
                (?:
                    channel/(?P<url_id>UC[a-zA-Z0-9_-]{22})
                    |
                    (?P<url_handle>@[a-zA-Z0-9._-]+)
                )
                # Channel tab (videos, featured, shorts, ...)
                (?:/[a-zA-Z]+)?
                |
                # Bare handle
                (?P<handle>@[a-zA-Z0-9._-]+)
            )
            /?$
            ",
        )
        .expect("Invalid regex")
    })
}

impl ChannelRef {
    /// Parse a channel ID, handle, or channel URL.
    ///
    /// Anything unrecognised is treated as a raw channel ID and left for the
    /// platform to accept or reject.
    pub fn parse(input: &str) -> Self {
        let input = input.trim();
        if let Some(caps) = channel_regex().captures(input) {
            if let Some(id) = caps.name("url_id") {
                return ChannelRef::Id(id.as_str().to_string());
            }
            if let Some(handle) = caps.name("url_handle").or_else(|| caps.name("handle")) {
                return ChannelRef::Handle(handle.as_str().to_string());
            }
        }
        ChannelRef::Id(input.to_string())
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelRef::Id(id) => write!(f, "{}", id),
            ChannelRef::Handle(handle) => write!(f, "{}", handle),
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory listing backend shared by tests.

    use super::*;
    use crate::error::PitstopError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Serves pre-built channels split into fixed-size pages.
    pub struct FakeListing {
        channels: HashMap<String, Vec<VideoRecord>>,
        page_size: usize,
        pub requests: Mutex<Vec<String>>,
    }

    impl FakeListing {
        pub fn new(page_size: usize) -> Self {
            Self {
                channels: HashMap::new(),
                page_size,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn with_channel(mut self, channel: &str, count: usize) -> Self {
            let videos = (0..count)
                .map(|i| video(channel, &format!("{}-v{}", channel, i)))
                .collect();
            self.channels.insert(channel.to_string(), videos);
            self
        }

        fn page(&self, channel: &str, offset: usize) -> Result<ListingPage> {
            let videos = self
                .channels
                .get(channel)
                .ok_or_else(|| PitstopError::ChannelNotFound(channel.to_string()))?;
            let end = (offset + self.page_size).min(videos.len());
            let next = (end < videos.len()).then(|| PageCursor {
                listing_id: channel.to_string(),
                token: end.to_string(),
            });
            Ok(ListingPage {
                videos: videos[offset..end].to_vec(),
                next,
            })
        }
    }

    #[async_trait]
    impl VideoListing for FakeListing {
        async fn first_page(&self, channel: &str) -> Result<ListingPage> {
            self.requests.lock().unwrap().push(format!("{}@0", channel));
            self.page(channel, 0)
        }

        async fn next_page(&self, cursor: &PageCursor) -> Result<ListingPage> {
            self.requests
                .lock()
                .unwrap()
                .push(format!("{}@{}", cursor.listing_id, cursor.token));
            let offset: usize = cursor.token.parse().unwrap();
            self.page(&cursor.listing_id, offset)
        }
    }

    pub fn video(channel: &str, id: &str) -> VideoRecord {
        VideoRecord {
            id: id.to_string(),
            title: format!("Title {}", id),
            link: format!("https://www.youtube.com/watch?v={}", id),
            channel_name: format!("Channel {}", channel),
            channel_link: format!("/channel/{}", channel),
        }
    }
}
