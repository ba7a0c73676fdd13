//! State for one interactive session
//!
//! Every field is replaced wholesale. Loading a new transcript clears the
//! summary and quiz derived from the previous one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::VideoMetadata;
use crate::quiz::QuizSet;

/// Where the current transcript came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TranscriptOrigin {
    Video { video_id: String },
    Upload { filename: Option<String> },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Session {
    transcript: String,
    origin: Option<TranscriptOrigin>,
    metadata: Option<VideoMetadata>,
    summary: Option<String>,
    quiz: QuizSet,
    loaded_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_transcript(&self) -> bool {
        !self.transcript.is_empty()
    }

    /// Current transcript, if any
    pub fn transcript(&self) -> Option<&str> {
        if self.has_transcript() {
            Some(&self.transcript)
        } else {
            None
        }
    }

    pub fn origin(&self) -> Option<&TranscriptOrigin> {
        self.origin.as_ref()
    }

    pub fn metadata(&self) -> Option<&VideoMetadata> {
        self.metadata.as_ref()
    }

    pub fn summary(&self) -> Option<&str> {
        self.summary.as_deref()
    }

    pub fn quiz(&self) -> &QuizSet {
        &self.quiz
    }

    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Replace the transcript with one fetched for a video
    pub fn set_video_transcript(&mut self, transcript: String, metadata: VideoMetadata) {
        let origin = TranscriptOrigin::Video {
            video_id: metadata.video_id.clone(),
        };
        self.replace_transcript(transcript, origin, Some(metadata));
    }

    /// Replace the transcript with one decoded from an uploaded file
    pub fn set_uploaded_transcript(&mut self, transcript: String, filename: Option<String>) {
        self.replace_transcript(transcript, TranscriptOrigin::Upload { filename }, None);
    }

    fn replace_transcript(&mut self, transcript: String, origin: TranscriptOrigin, metadata: Option<VideoMetadata>) {
        self.transcript = transcript;
        self.origin = Some(origin);
        self.metadata = metadata;
        self.summary = None;
        self.quiz = QuizSet::default();
        self.loaded_at = Some(Utc::now());
    }

    pub fn set_summary(&mut self, summary: String) {
        self.summary = Some(summary);
    }

    pub fn set_quiz(&mut self, quiz: QuizSet) {
        self.quiz = quiz;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::parse_quiz;

    fn metadata(id: &str) -> VideoMetadata {
        VideoMetadata::fallback(id, "http://img.youtube.com/vi/{video_id}/0.jpg")
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(!session.has_transcript());
        assert!(session.transcript().is_none());
        assert!(session.quiz().is_empty());
        assert!(session.loaded_at().is_none());
    }

    #[test]
    fn test_video_transcript_sets_metadata() {
        let mut session = Session::new();
        session.set_video_transcript("hello world".to_string(), metadata("abc"));

        assert_eq!(session.transcript(), Some("hello world"));
        assert_eq!(session.metadata().unwrap().video_id, "abc");
        assert_eq!(
            session.origin(),
            Some(&TranscriptOrigin::Video { video_id: "abc".to_string() })
        );
        assert!(session.loaded_at().is_some());
    }

    #[test]
    fn test_new_transcript_clears_derived_state() {
        let mut session = Session::new();
        session.set_video_transcript("first".to_string(), metadata("abc"));
        session.set_summary("a summary".to_string());
        session.set_quiz(parse_quiz("Q1. Q\na) 1\nb) 2\nc) 3\nd) 4\nCorrect Answer: a)"));
        assert_eq!(session.quiz().len(), 1);

        session.set_uploaded_transcript("second".to_string(), Some("talk.srt".to_string()));

        assert_eq!(session.transcript(), Some("second"));
        assert!(session.metadata().is_none());
        assert!(session.summary().is_none());
        assert!(session.quiz().is_empty());
    }
}
