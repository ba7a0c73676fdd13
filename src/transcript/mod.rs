//! Transcript acquisition: remote captions by video URL, or an uploaded SRT file

pub mod srt;
pub mod youtube;

pub use srt::{decode_srt, parse_srt, SrtDocument, SrtEntry};
pub use youtube::YouTubeTranscriptClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{AppError, Result};

/// One timed piece of caption text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptFragment {
    pub text: String,
    /// Start offset in seconds
    pub start: f64,
    /// Duration in seconds
    pub duration: f64,
}

/// Source of caption fragments for a video
#[async_trait]
pub trait TranscriptSource: Send + Sync {
    /// Fetch fragments in source order, using the first of `languages` that
    /// the video has captions for
    async fn fetch_fragments(&self, video_id: &str, languages: &[String]) -> Result<Vec<TranscriptFragment>>;
}

/// Extract the video id from a URL: the text after `v=` up to the next `&`
pub fn extract_video_id(url: &str) -> Result<String> {
    let (_, rest) = url
        .trim()
        .split_once("v=")
        .ok_or_else(|| AppError::InvalidUrl(format!("no v= parameter in {}", url)))?;

    let video_id = rest.split('&').next().unwrap_or_default();
    if video_id.is_empty() {
        return Err(AppError::InvalidUrl(format!("empty video id in {}", url)));
    }

    Ok(video_id.to_string())
}

/// Join fragment texts with single spaces, in order
pub fn join_fragments(fragments: &[TranscriptFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Fetch and flatten the transcript for a video URL.
///
/// Returns the transcript text and the video id.
pub async fn fetch_transcript(
    source: &dyn TranscriptSource,
    url: &str,
    languages: &[String],
) -> Result<(String, String)> {
    let video_id = extract_video_id(url)?;
    let fragments = source.fetch_fragments(&video_id, languages).await?;

    if fragments.is_empty() {
        return Err(AppError::Fetch(format!("transcript for {} is empty", video_id)));
    }

    let transcript = join_fragments(&fragments);
    info!("📜 Fetched transcript for {} ({} fragments, {} chars)", video_id, fragments.len(), transcript.len());

    Ok((transcript, video_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedSource(Vec<TranscriptFragment>);

    #[async_trait]
    impl TranscriptSource for FixedSource {
        async fn fetch_fragments(&self, _video_id: &str, _languages: &[String]) -> Result<Vec<TranscriptFragment>> {
            Ok(self.0.clone())
        }
    }

    fn fragment(text: &str, start: f64) -> TranscriptFragment {
        TranscriptFragment {
            text: text.to_string(),
            start,
            duration: 1.0,
        }
    }

    #[test]
    fn test_extract_video_id() {
        assert_eq!(extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&list=PL123&t=30").unwrap(),
            "dQw4w9WgXcQ"
        );
        assert_eq!(extract_video_id("  v=abc  ").unwrap(), "abc");
    }

    #[test]
    fn test_extract_video_id_rejects_urls_without_id() {
        assert!(matches!(extract_video_id("https://youtu.be/dQw4w9WgXcQ"), Err(AppError::InvalidUrl(_))));
        assert!(matches!(extract_video_id("https://www.youtube.com/watch?v=&t=3"), Err(AppError::InvalidUrl(_))));
        assert!(matches!(extract_video_id(""), Err(AppError::InvalidUrl(_))));
    }

    #[test]
    fn test_join_fragments_preserves_order() {
        let fragments = vec![fragment("hello", 0.0), fragment("big", 1.0), fragment("world", 2.0)];
        assert_eq!(join_fragments(&fragments), "hello big world");
    }

    #[tokio::test]
    async fn test_fetch_transcript_returns_text_and_id() {
        let source = FixedSource(vec![fragment("first line", 0.0), fragment("second line", 2.0)]);
        let (text, id) = fetch_transcript(&source, "https://youtube.com/watch?v=xyz&t=1", &["en".to_string()])
            .await
            .unwrap();
        assert_eq!(text, "first line second line");
        assert_eq!(id, "xyz");
    }

    #[tokio::test]
    async fn test_fetch_transcript_invalid_url_skips_source() {
        let source = FixedSource(vec![fragment("unused", 0.0)]);
        let err = fetch_transcript(&source, "https://example.com/video", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn test_fetch_transcript_empty_is_fetch_error() {
        let source = FixedSource(Vec::new());
        let err = fetch_transcript(&source, "watch?v=abc", &[]).await.unwrap_err();
        assert!(matches!(err, AppError::Fetch(_)));
    }
}
