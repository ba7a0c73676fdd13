//! Transcript Lens
//!
//! Fetches a video transcript (by YouTube link or uploaded .srt file) and
//! offers an LLM summary, keyword search, question answering and a
//! generated multiple-choice quiz over it.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod metadata;
pub mod pipeline;
pub mod prompts;
pub mod quiz;
pub mod search;
pub mod session;
pub mod transcript;

// Re-export main types for easy access
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{AppError, Result};
pub use crate::llm::{create_llm, LLMConfig, LLMProvider, LLM};
pub use crate::metadata::{MetadataSource, VideoMetadata, YouTubeMetadataClient};
pub use crate::pipeline::{AnswerFeedback, Pipeline};
pub use crate::prompts::{PromptRequest, PromptSet};
pub use crate::quiz::{parse_quiz, QuizQuestion, QuizSet};
pub use crate::search::{highlight, search, SearchHit};
pub use crate::session::Session;
pub use crate::transcript::{decode_srt, extract_video_id, TranscriptSource, YouTubeTranscriptClient};
