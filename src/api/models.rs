//! API data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metadata::VideoMetadata;
use crate::pipeline::AnswerFeedback;
use crate::quiz::{QuizQuestion, QuizSet, OPTION_COUNT};
use crate::search::SearchHit;
use crate::session::{Session, TranscriptOrigin};

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoadUrlRequest {
    pub url: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct UploadParams {
    pub filename: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AskRequest {
    pub question: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckAnswerRequest {
    /// 0-based question index
    pub index: usize,
    pub selection: String,
}

/// Current session as shown by the UI
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionView {
    pub has_transcript: bool,
    pub transcript: Option<String>,
    pub origin: Option<TranscriptOrigin>,
    pub metadata: Option<VideoMetadata>,
    pub has_summary: bool,
    pub quiz_questions: usize,
    pub loaded_at: Option<DateTime<Utc>>,
}

impl From<&Session> for SessionView {
    fn from(session: &Session) -> Self {
        Self {
            has_transcript: session.has_transcript(),
            transcript: session.transcript().map(str::to_string),
            origin: session.origin().cloned(),
            metadata: session.metadata().cloned(),
            has_summary: session.summary().is_some(),
            quiz_questions: session.quiz().len(),
            loaded_at: session.loaded_at(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryView {
    pub summary: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SearchView {
    pub keyword: String,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerView {
    pub question: String,
    pub answer: String,
}

/// Quiz question without its answer
#[derive(Debug, Serialize, Deserialize)]
pub struct QuizQuestionView {
    pub index: usize,
    pub question: String,
    pub options: [String; OPTION_COUNT],
}

impl From<(usize, &QuizQuestion)> for QuizQuestionView {
    fn from((index, question): (usize, &QuizQuestion)) -> Self {
        Self {
            index,
            question: question.question.clone(),
            options: question.options.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct QuizView {
    pub questions: Vec<QuizQuestionView>,
    pub skipped_blocks: usize,
}

impl From<&QuizSet> for QuizView {
    fn from(quiz: &QuizSet) -> Self {
        Self {
            questions: quiz.iter().enumerate().map(QuizQuestionView::from).collect(),
            skipped_blocks: quiz.skipped_blocks,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResultView {
    pub correct: bool,
    pub correct_answer: String,
    pub message: String,
}

impl From<AnswerFeedback> for AnswerResultView {
    fn from(feedback: AnswerFeedback) -> Self {
        Self {
            message: feedback.message(),
            correct: feedback.correct,
            correct_answer: feedback.correct_answer,
        }
    }
}
