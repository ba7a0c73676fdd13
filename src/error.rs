//! Error types surfaced to the user at the action that triggered them

/// Result type for transcript lens operations
pub type Result<T> = std::result::Result<T, AppError>;

/// Error types for transcript lens operations
///
/// None of these are fatal to a session: the user can always retry the same
/// action or pick a different one.
#[derive(thiserror::Error, Debug)]
pub enum AppError {
    #[error("Invalid video URL: {0}")]
    InvalidUrl(String),

    #[error("Transcript fetch failed: {0}")]
    Fetch(String),

    #[error("Subtitle decode failed: {0}")]
    Decode(String),

    #[error("Completion failed: {0}")]
    Completion(String),

    #[error("No transcript loaded. Provide a YouTube link or upload an .srt file")]
    NoTranscript,

    #[error("Question is empty")]
    EmptyQuestion,

    #[error("No quiz has been generated yet")]
    NoQuiz,

    #[error("Quiz has no question {0}")]
    QuestionOutOfRange(usize),

    #[error("No summary has been generated yet")]
    NoSummary,

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Short machine-readable kind, used by the HTTP layer
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::InvalidUrl(_) => "invalid_url",
            AppError::Fetch(_) => "fetch_error",
            AppError::Decode(_) => "decode_error",
            AppError::Completion(_) => "completion_error",
            AppError::NoTranscript => "no_transcript",
            AppError::EmptyQuestion => "empty_question",
            AppError::NoQuiz => "no_quiz",
            AppError::QuestionOutOfRange(_) => "question_out_of_range",
            AppError::NoSummary => "no_summary",
            AppError::Config(_) => "config_error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_keep_underlying_text() {
        let err = AppError::Completion("Gemini API error 429: quota".to_string());
        assert_eq!(err.to_string(), "Completion failed: Gemini API error 429: quota");
        assert_eq!(err.kind(), "completion_error");
    }
}
