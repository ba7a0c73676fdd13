//! YouTube caption client
//!
//! Caption tracks are listed in the player response embedded in the watch
//! page. Each track exposes a timed-text URL that returns JSON events when
//! asked for `fmt=json3`.

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

use super::{TranscriptFragment, TranscriptSource};
use crate::config::TranscriptConfig;
use crate::error::{AppError, Result};

const CAPTION_TRACKS_KEY: &str = "\"captionTracks\":";

/// Kind marker YouTube puts on auto-generated tracks
const GENERATED_KIND: &str = "asr";

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    #[serde(default)]
    kind: Option<String>,
}

impl CaptionTrack {
    fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some(GENERATED_KIND)
    }
}

#[derive(Debug, Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimedTextEvent {
    #[serde(default)]
    t_start_ms: u64,
    #[serde(default)]
    d_duration_ms: u64,
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// Fetches captions straight from YouTube
#[derive(Debug, Clone)]
pub struct YouTubeTranscriptClient {
    client: reqwest::Client,
    watch_endpoint: String,
}

impl YouTubeTranscriptClient {
    pub fn new(config: &TranscriptConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent("Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36");
        if let Some(seconds) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(seconds));
        }
        let client = builder
            .build()
            .map_err(|e| AppError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            watch_endpoint: config.watch_endpoint.clone(),
        })
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Fetch(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AppError::Fetch(format!("YouTube responded with {}", response.status())));
        }

        response.text().await.map_err(|e| AppError::Fetch(e.to_string()))
    }

    async fn list_tracks(&self, video_id: &str) -> Result<Vec<CaptionTrack>> {
        let html = self
            .get_text(
                self.client
                    .get(&self.watch_endpoint)
                    .query(&[("v", video_id)])
                    .header("Accept-Language", "en-US"),
            )
            .await?;

        parse_caption_tracks(&html)
            .ok_or_else(|| AppError::Fetch(format!("no captions available for video {}", video_id)))
    }
}

#[async_trait]
impl TranscriptSource for YouTubeTranscriptClient {
    async fn fetch_fragments(&self, video_id: &str, languages: &[String]) -> Result<Vec<TranscriptFragment>> {
        let tracks = self.list_tracks(video_id).await?;
        debug!("Video {} has {} caption tracks", video_id, tracks.len());

        let track = select_track(&tracks, languages).ok_or_else(|| {
            let available: Vec<&str> = tracks.iter().map(|t| t.language_code.as_str()).collect();
            AppError::Fetch(format!(
                "no captions in [{}] for video {} (available: [{}])",
                languages.join(", "),
                video_id,
                available.join(", ")
            ))
        })?;

        info!(
            "🎬 Using {} captions ({}) for {}",
            track.language_code,
            if track.is_generated() { "generated" } else { "manual" },
            video_id
        );

        let body = self
            .get_text(self.client.get(&track.base_url).query(&[("fmt", "json3")]))
            .await?;

        parse_timed_text(&body)
    }
}

/// Pull the caption track list out of a watch page
fn parse_caption_tracks(html: &str) -> Option<Vec<CaptionTrack>> {
    let start = html.find(CAPTION_TRACKS_KEY)? + CAPTION_TRACKS_KEY.len();

    // Only the array value is wanted; the rest of the page is ignored
    serde_json::Deserializer::from_str(&html[start..])
        .into_iter::<Vec<CaptionTrack>>()
        .next()?
        .ok()
        .filter(|tracks| !tracks.is_empty())
}

/// Pick the track for the first preferred language that has one; within a
/// language a manually created track wins over a generated one
fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let in_language = || tracks.iter().filter(move |t| &t.language_code == lang);
        in_language()
            .find(|t| !t.is_generated())
            .or_else(|| in_language().next())
    })
}

fn parse_timed_text(body: &str) -> Result<Vec<TranscriptFragment>> {
    let timed_text: TimedText = serde_json::from_str(body)
        .map_err(|e| AppError::Fetch(format!("unreadable caption data: {}", e)))?;

    let fragments = timed_text
        .events
        .into_iter()
        .filter_map(|event| {
            let text: String = event.segs.iter().map(|s| s.utf8.as_str()).collect();
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if text.is_empty() {
                return None;
            }
            Some(TranscriptFragment {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect();

    Ok(fragments)
}
