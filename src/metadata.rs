//! Video title and thumbnail lookup
//!
//! Metadata is decoration only, so lookups never fail: any problem yields
//! the fallback title and the default thumbnail for the video.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::MetadataConfig;

pub const FALLBACK_TITLE: &str = "Untitled Video";

/// Title and thumbnail shown next to a remotely fetched transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoMetadata {
    pub video_id: String,
    pub title: String,
    pub thumbnail_url: String,
}

impl VideoMetadata {
    /// Metadata used when the lookup is unavailable
    pub fn fallback(video_id: &str, thumbnail_template: &str) -> Self {
        Self {
            video_id: video_id.to_string(),
            title: FALLBACK_TITLE.to_string(),
            thumbnail_url: thumbnail_template.replace("{video_id}", video_id),
        }
    }
}

/// Source of video metadata
#[async_trait]
pub trait MetadataSource: Send + Sync {
    async fn lookup(&self, video_id: &str) -> VideoMetadata;
}

#[derive(Debug, Deserialize)]
struct VideoListResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
struct VideoItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
struct Snippet {
    title: String,
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    high: Option<Thumbnail>,
    #[serde(rename = "default")]
    fallback: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

/// YouTube Data API v3 client
#[derive(Debug, Clone)]
pub struct YouTubeMetadataClient {
    client: reqwest::Client,
    config: MetadataConfig,
}

impl YouTubeMetadataClient {
    pub fn new(config: MetadataConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn fetch_snippet(&self, video_id: &str, api_key: &str) -> Result<Option<Snippet>, reqwest::Error> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("part", "snippet"), ("id", video_id), ("key", api_key)])
            .send()
            .await?
            .error_for_status()?;

        let body: VideoListResponse = response.json().await?;
        Ok(body.items.into_iter().next().map(|item| item.snippet))
    }
}

#[async_trait]
impl MetadataSource for YouTubeMetadataClient {
    async fn lookup(&self, video_id: &str) -> VideoMetadata {
        let fallback = VideoMetadata::fallback(video_id, &self.config.fallback_thumbnail);

        let Some(api_key) = self.config.api_key.as_deref() else {
            debug!("No YouTube API key configured, using fallback metadata");
            return fallback;
        };

        match self.fetch_snippet(video_id, api_key).await {
            Ok(Some(snippet)) => {
                let thumbnail = snippet
                    .thumbnails
                    .high
                    .or(snippet.thumbnails.fallback)
                    .map(|t| t.url)
                    .unwrap_or(fallback.thumbnail_url);
                VideoMetadata {
                    video_id: video_id.to_string(),
                    title: snippet.title,
                    thumbnail_url: thumbnail,
                }
            }
            Ok(None) => {
                debug!("Video {} not found in Data API", video_id);
                fallback
            }
            Err(e) => {
                warn!("Metadata lookup failed for {}: {}", video_id, e);
                fallback
            }
        }
    }
}
