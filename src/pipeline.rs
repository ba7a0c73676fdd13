//! Interactive actions over a session
//!
//! Each action runs at most one external call, surfaces any failure to the
//! caller and leaves the session untouched when it fails.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::llm::{create_llm, LLM};
use crate::metadata::{MetadataSource, VideoMetadata, YouTubeMetadataClient};
use crate::prompts::{PromptRequest, PromptSet};
use crate::quiz::{parse_quiz, QuizSet};
use crate::search::{search_highlighted, SearchHit};
use crate::session::Session;
use crate::transcript::{decode_srt, fetch_transcript, TranscriptSource, YouTubeTranscriptClient};

/// Outcome of checking one quiz answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerFeedback {
    pub correct: bool,
    /// Stated answer label, shown when the selection is wrong
    pub correct_answer: String,
}

impl AnswerFeedback {
    pub fn message(&self) -> String {
        if self.correct {
            "✅ Correct!".to_string()
        } else {
            format!("❌ Incorrect. Correct Answer: {}", self.correct_answer)
        }
    }
}

/// Owns the external collaborators used by the session actions
pub struct Pipeline {
    llm: Box<dyn LLM>,
    transcripts: Box<dyn TranscriptSource>,
    metadata: Box<dyn MetadataSource>,
    prompts: PromptSet,
    languages: Vec<String>,
}

impl Pipeline {
    pub fn new(
        llm: Box<dyn LLM>,
        transcripts: Box<dyn TranscriptSource>,
        metadata: Box<dyn MetadataSource>,
        prompts: PromptSet,
        languages: Vec<String>,
    ) -> Self {
        Self {
            llm,
            transcripts,
            metadata,
            prompts,
            languages,
        }
    }

    /// Build the pipeline with the HTTP clients described by `config`
    pub async fn from_config(config: &Config) -> Result<Self> {
        let llm = create_llm(&config.llm)?;
        let transcripts = YouTubeTranscriptClient::new(&config.transcript)?;
        let metadata = YouTubeMetadataClient::new(config.metadata.clone());
        let prompts = PromptSet::load(&config.llm.prompts).await;

        info!("🔧 Pipeline ready: {:?} / {}", llm.provider_type(), config.llm.model);

        Ok(Self::new(
            llm,
            Box::new(transcripts),
            Box::new(metadata),
            prompts,
            config.transcript.languages.clone(),
        ))
    }

    /// Fetch the transcript for a video URL and make it the session transcript
    pub async fn load_from_url(&self, session: &mut Session, url: &str) -> Result<VideoMetadata> {
        let (transcript, video_id) = fetch_transcript(self.transcripts.as_ref(), url, &self.languages).await?;
        let metadata = self.metadata.lookup(&video_id).await;

        info!("🎥 Loaded \"{}\" ({})", metadata.title, video_id);
        session.set_video_transcript(transcript, metadata.clone());
        Ok(metadata)
    }

    /// Decode an uploaded subtitle file and make it the session transcript
    pub fn load_from_srt(&self, session: &mut Session, bytes: &[u8], filename: Option<String>) -> Result<()> {
        let transcript = decode_srt(bytes)?;
        session.set_uploaded_transcript(transcript, filename);
        Ok(())
    }

    /// Summarize the transcript and keep the result for download
    pub async fn summarize(&self, session: &mut Session) -> Result<String> {
        let transcript = session.transcript().ok_or(AppError::NoTranscript)?;
        let prompt = self.prompts.render(PromptRequest::Summary { transcript });

        let summary = self.llm.complete(&prompt).await?.content;
        info!("📝 Summary generated ({} chars)", summary.len());

        session.set_summary(summary.clone());
        Ok(summary)
    }

    /// Answer a free-form question about the transcript
    pub async fn ask(&self, session: &Session, question: &str) -> Result<String> {
        let transcript = session.transcript().ok_or(AppError::NoTranscript)?;
        let question = question.trim();
        if question.is_empty() {
            return Err(AppError::EmptyQuestion);
        }

        let prompt = self.prompts.render(PromptRequest::Answer { question, transcript });
        let answer = self.llm.complete(&prompt).await?.content;
        debug!("Answered question ({} chars)", answer.len());
        Ok(answer)
    }

    /// Generate a fresh quiz, replacing any previous one
    pub async fn generate_quiz(&self, session: &mut Session) -> Result<QuizSet> {
        let transcript = session.transcript().ok_or(AppError::NoTranscript)?;
        let prompt = self.prompts.render(PromptRequest::Quiz { transcript });

        let raw = self.llm.complete(&prompt).await?.content;
        let quiz = parse_quiz(&raw);
        info!("🧩 Quiz generated: {} questions, {} blocks skipped", quiz.len(), quiz.skipped_blocks);

        let unanswered = quiz.iter().filter(|q| !q.has_answer()).count();
        if unanswered > 0 {
            warn!("{} quiz questions have no stated answer and accept no selection", unanswered);
        }

        session.set_quiz(quiz.clone());
        Ok(quiz)
    }

    /// Keyword search over the transcript
    pub fn search(&self, session: &Session, keyword: &str) -> Result<Vec<SearchHit>> {
        let transcript = session.transcript().ok_or(AppError::NoTranscript)?;
        Ok(search_highlighted(transcript, keyword))
    }

    /// Check a selected option for the question at `index` (0-based)
    pub fn check_answer(&self, session: &Session, index: usize, selection: &str) -> Result<AnswerFeedback> {
        let quiz = session.quiz();
        if quiz.is_empty() {
            return Err(AppError::NoQuiz);
        }
        let question = quiz.get(index).ok_or(AppError::QuestionOutOfRange(index))?;

        Ok(AnswerFeedback {
            correct: question.is_correct(selection),
            correct_answer: question.correct_answer.clone(),
        })
    }
}
