//! YouTube Data API v3 listing backend.
//!
//! A channel's videos are read from its uploads playlist, which the API
//! returns newest first, `page_size` items at a time.

use super::{ChannelRef, ListingPage, PageCursor, VideoListing, VideoRecord};
use crate::config::YoutubeSettings;
use crate::error::{PitstopError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument};

/// Channel listing backed by the YouTube Data API.
pub struct DataApiListing {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    origin: String,
    page_size: u32,
}

impl DataApiListing {
    /// Create a listing client from settings and an API key.
    pub fn new(settings: &YoutubeSettings, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: settings.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            origin: settings.origin.trim_end_matches('/').to_string(),
            page_size: settings.page_size.clamp(1, 50),
        })
    }

    /// Resolve a channel to the ID of its uploads playlist.
    #[instrument(skip(self))]
    async fn uploads_playlist(&self, channel: &ChannelRef) -> Result<String> {
        let query = match channel {
            ChannelRef::Id(id) => ("id", id.as_str()),
            ChannelRef::Handle(handle) => ("forHandle", handle.as_str()),
        };

        let (status, response) = self
            .get::<ChannelListResponse>("channels", &[("part", "contentDetails"), query])
            .await?;
        let response = Self::require_success("channels", status, response)?;

        response
            .items
            .into_iter()
            .next()
            .map(|c| c.content_details.related_playlists.uploads)
            .ok_or_else(|| PitstopError::ChannelNotFound(channel.to_string()))
    }

    /// Fetch one page of a playlist.
    ///
    /// A missing uploads playlist is reported as `None`, which is how the API
    /// answers for channels that never uploaded.
    async fn playlist_page(
        &self,
        playlist_id: &str,
        token: Option<&str>,
    ) -> Result<Option<ListingPage>> {
        let page_size = self.page_size.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
        ];
        if let Some(token) = token {
            query.push(("pageToken", token));
        }

        let (status, response) = self
            .get::<PlaylistItemsResponse>("playlistItems", &query)
            .await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = Self::require_success("playlistItems", status, response)?;

        Ok(Some(response.into_page(playlist_id, &self.origin)))
    }

    /// Issue a GET against the API, returning the status and the parsed body
    /// on success or the raw body text otherwise.
    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, &str)],
    ) -> Result<(StatusCode, std::result::Result<T, String>)> {
        let url = format!("{}/{}", self.api_base, endpoint);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok((status, Ok(response.json::<T>().await?)))
        } else {
            let body = response.text().await.unwrap_or_default();
            Ok((status, Err(body)))
        }
    }

    fn require_success<T>(
        endpoint: &str,
        status: StatusCode,
        response: std::result::Result<T, String>,
    ) -> Result<T> {
        response.map_err(|body| {
            PitstopError::VideoSource(format!("{} request failed ({}): {}", endpoint, status, body))
        })
    }
}

#[async_trait]
impl VideoListing for DataApiListing {
    async fn first_page(&self, channel: &str) -> Result<ListingPage> {
        let channel = ChannelRef::parse(channel);
        let playlist_id = self.uploads_playlist(&channel).await?;
        debug!("Uploads playlist for {} is {}", channel, playlist_id);

        Ok(self
            .playlist_page(&playlist_id, None)
            .await?
            .unwrap_or_default())
    }

    async fn next_page(&self, cursor: &PageCursor) -> Result<ListingPage> {
        self.playlist_page(&cursor.listing_id, Some(&cursor.token))
            .await?
            .ok_or_else(|| {
                PitstopError::VideoSource(format!(
                    "playlist {} disappeared while paging",
                    cursor.listing_id
                ))
            })
    }
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelItem {
    content_details: ChannelContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChannelContentDetails {
    related_playlists: RelatedPlaylists,
}

#[derive(Debug, Deserialize)]
struct RelatedPlaylists {
    uploads: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    next_page_token: Option<String>,
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: PlaylistItemSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: String,
    channel_id: String,
    channel_title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

impl PlaylistItemsResponse {
    fn into_page(self, playlist_id: &str, origin: &str) -> ListingPage {
        let videos = self
            .items
            .into_iter()
            .filter_map(|item| {
                let snippet = item.snippet;
                let id = snippet.resource_id.video_id?;
                Some(VideoRecord {
                    link: format!("{}/watch?v={}", origin, id),
                    id,
                    title: snippet.title,
                    channel_name: snippet.channel_title,
                    channel_link: format!("/channel/{}", snippet.channel_id),
                })
            })
            .collect();

        let next = self
            .next_page_token
            .filter(|t| !t.is_empty())
            .map(|token| PageCursor {
                listing_id: playlist_id.to_string(),
                token,
            });

        ListingPage { videos, next }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::youtube::ChannelVideoLister;
    use mockito::{Matcher, Server};
    use std::sync::Arc;

    const UPLOADS: &str = r#"{
        "items": [{"contentDetails": {"relatedPlaylists": {"uploads": "UUabc"}}}]
    }"#;

    fn listing(server: &Server, page_size: u32) -> DataApiListing {
        let mut settings = YoutubeSettings::default();
        settings.api_base = server.url();
        settings.page_size = page_size;
        DataApiListing::new(&settings, "key").unwrap()
    }

    fn playlist_item(id: &str) -> String {
        format!(
            r#"{{"snippet": {{
                "title": "Video {id}",
                "channelId": "UCabc",
                "channelTitle": "ChrisFix",
                "resourceId": {{"videoId": "{id}"}}
            }}}}"#
        )
    }

    #[test]
    fn test_parse_playlist_page() {
        let json = r#"{
            "kind": "youtube#playlistItemListResponse",
            "nextPageToken": "EAAaBlBUOkNESQ",
            "pageInfo": {"totalResults": 120, "resultsPerPage": 2},
            "items": [
                {"snippet": {
                    "title": "How to Replace Brake Pads",
                    "channelId": "UCes1EvRjcKU4sY_UEavndBw",
                    "channelTitle": "ChrisFix",
                    "resourceId": {"kind": "youtube#video", "videoId": "abc123def45"}
                }},
                {"snippet": {
                    "title": "Private video",
                    "channelId": "UCes1EvRjcKU4sY_UEavndBw",
                    "channelTitle": "ChrisFix",
                    "resourceId": {"kind": "youtube#video"}
                }}
            ]
        }"#;

        let response: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        let page = response.into_page("UUes1EvRjcKU4sY_UEavndBw", "https://www.youtube.com");

        assert!(page.has_more());
        assert_eq!(
            page.next,
            Some(PageCursor {
                listing_id: "UUes1EvRjcKU4sY_UEavndBw".to_string(),
                token: "EAAaBlBUOkNESQ".to_string(),
            })
        );
        assert_eq!(page.videos.len(), 1);

        let video = &page.videos[0];
        assert_eq!(video.id, "abc123def45");
        assert_eq!(video.title, "How to Replace Brake Pads");
        assert_eq!(video.link, "https://www.youtube.com/watch?v=abc123def45");
        assert_eq!(video.channel_name, "ChrisFix");
        assert_eq!(video.channel_link, "/channel/UCes1EvRjcKU4sY_UEavndBw");
    }

    #[test]
    fn test_last_page_has_no_cursor() {
        let json = r#"{"items": []}"#;
        let response: PlaylistItemsResponse = serde_json::from_str(json).unwrap();
        let page = response.into_page("UUx", "https://www.youtube.com");
        assert!(!page.has_more());
        assert!(page.videos.is_empty());
    }

    #[test]
    fn test_parse_channel_response() {
        let json = r#"{
            "items": [{
                "id": "UCes1EvRjcKU4sY_UEavndBw",
                "contentDetails": {"relatedPlaylists": {"likes": "", "uploads": "UUes1EvRjcKU4sY_UEavndBw"}}
            }]
        }"#;
        let response: ChannelListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            response.items[0].content_details.related_playlists.uploads,
            "UUes1EvRjcKU4sY_UEavndBw"
        );

        let empty: ChannelListResponse = serde_json::from_str(r#"{"pageInfo": {}}"#).unwrap();
        assert!(empty.items.is_empty());
    }

    #[test]
    fn test_page_size_is_clamped() {
        let mut settings = YoutubeSettings::default();
        settings.page_size = 500;
        let listing = DataApiListing::new(&settings, "key").unwrap();
        assert_eq!(listing.page_size, 50);
    }

    #[tokio::test]
    async fn test_follows_page_tokens() {
        let mut server = Server::new_async().await;
        let channel = server
            .mock("GET", "/channels")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("part".into(), "contentDetails".into()),
                Matcher::UrlEncoded("forHandle".into(), "@ChrisFix".into()),
                Matcher::UrlEncoded("key".into(), "key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(UPLOADS)
            .create_async()
            .await;
        let first = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::Exact(
                "part=snippet&playlistId=UUabc&maxResults=2&key=key".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"nextPageToken": "PAGE2", "items": [{}, {}]}}"#,
                playlist_item("v1"),
                playlist_item("v2")
            ))
            .create_async()
            .await;
        let second = server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("playlistId".into(), "UUabc".into()),
                Matcher::UrlEncoded("pageToken".into(), "PAGE2".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(r#"{{"items": [{}]}}"#, playlist_item("v3")))
            .create_async()
            .await;

        let lister = ChannelVideoLister::new(Arc::new(listing(&server, 2)));
        let videos = lister
            .list("https://www.youtube.com/@ChrisFix/videos")
            .await
            .unwrap();

        let ids: Vec<_> = videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, vec!["v1", "v2", "v3"]);
        assert_eq!(videos[2].link, "https://www.youtube.com/watch?v=v3");
        assert_eq!(videos[2].channel_link, "/channel/UCabc");

        channel.assert_async().await;
        first.assert_async().await;
        second.assert_async().await;
    }

    #[tokio::test]
    async fn test_missing_uploads_playlist_is_empty_channel() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(UPLOADS)
            .create_async()
            .await;
        server
            .mock("GET", "/playlistItems")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"error": {"code": 404, "message": "playlistNotFound"}}"#)
            .create_async()
            .await;

        let lister = ChannelVideoLister::new(Arc::new(listing(&server, 50)));
        let videos = lister.list("UCabc").await.unwrap();
        assert!(videos.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_channel_is_not_found() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(Matcher::UrlEncoded("id".into(), "UCnope".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"pageInfo": {"totalResults": 0}}"#)
            .create_async()
            .await;

        let err = listing(&server, 50).first_page("UCnope").await.unwrap_err();
        assert!(matches!(err, PitstopError::ChannelNotFound(ref c) if c == "UCnope"));
    }

    #[tokio::test]
    async fn test_error_status_is_video_source_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/channels")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#)
            .create_async()
            .await;

        let err = listing(&server, 50).first_page("UCabc").await.unwrap_err();
        match err {
            PitstopError::VideoSource(msg) => assert!(msg.contains("quotaExceeded")),
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
