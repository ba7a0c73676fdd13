//! Prompt templates for summary, question answering and quiz generation
//!
//! Summary and quiz prompts are the instruction text followed directly by the
//! transcript. The question-answer template carries `{question}` and
//! `{transcript}` placeholders.

use tracing::{debug, warn};

use crate::config::PromptConfig;

pub const SUMMARY_TEMPLATE: &str = "Welcome, Video Summarizer! Your task is to analyze the provided YouTube video transcript and generate a comprehensive, detailed summary that thoroughly captures the main points, key insights, and supporting details discussed throughout the video. You are encouraged to use important phrases, sentences, or even direct quotes from the transcript if they enhance clarity or accuracy. Present the summary in a well-structured format using bullet points for clarity. Focus on preserving the original tone and depth of the content. Do not limit the word count — prioritize completeness and context.";

pub const ANSWER_TEMPLATE: &str =
    "Use this transcript to answer the question: {question}\n\nTranscript: {transcript}\nAnswer:";

pub const QUIZ_TEMPLATE: &str = r#"You are a quiz generator. Create exactly 3 multiple-choice questions based on the transcript below. Each question must test understanding of the content — including facts, concepts, or insights from different parts of the transcript.

Guidelines:
- Each question must have **4 unique, clearly different options**, labeled **a)** to **d)**.
- Only **one correct answer** per question.
- **Do NOT include the correct answer inside any of the options**.
- **Number the questions correctly as Q1., Q2., Q3.**
- Format exactly as shown below.

Format:
Q1. Question text here
a) Option 1
b) Option 2
c) Option 3
d) Option 4
Correct Answer: a)

Q2. Question text here
...

Use only the format above. Do not add any commentary or explanation. Begin below:
"#;

/// What a prompt is being built for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Summary,
    Answer,
    Quiz,
}

/// Payload for a single prompt
#[derive(Debug, Clone, Copy)]
pub enum PromptRequest<'a> {
    Summary { transcript: &'a str },
    Answer { question: &'a str, transcript: &'a str },
    Quiz { transcript: &'a str },
}

impl PromptRequest<'_> {
    pub fn kind(&self) -> PromptKind {
        match self {
            PromptRequest::Summary { .. } => PromptKind::Summary,
            PromptRequest::Answer { .. } => PromptKind::Answer,
            PromptRequest::Quiz { .. } => PromptKind::Quiz,
        }
    }
}

/// The three instruction templates in use
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptSet {
    pub summary: String,
    pub answer: String,
    pub quiz: String,
}

impl Default for PromptSet {
    fn default() -> Self {
        Self {
            summary: SUMMARY_TEMPLATE.to_string(),
            answer: ANSWER_TEMPLATE.to_string(),
            quiz: QUIZ_TEMPLATE.to_string(),
        }
    }
}

impl PromptSet {
    /// Load templates from the configured prompt directory.
    ///
    /// Any file that is missing or unreadable falls back to the built-in
    /// template for that kind.
    pub async fn load(config: &PromptConfig) -> Self {
        let defaults = Self::default();

        Self {
            summary: load_or_default(config, &config.summary_file, defaults.summary).await,
            answer: load_or_default(config, &config.answer_file, defaults.answer).await,
            quiz: load_or_default(config, &config.quiz_file, defaults.quiz).await,
        }
    }

    pub fn template(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::Summary => &self.summary,
            PromptKind::Answer => &self.answer,
            PromptKind::Quiz => &self.quiz,
        }
    }

    /// Render the final prompt string for a request
    pub fn render(&self, request: PromptRequest<'_>) -> String {
        let template = self.template(request.kind());
        match request {
            PromptRequest::Summary { transcript } | PromptRequest::Quiz { transcript } => {
                format!("{template}{transcript}")
            }
            PromptRequest::Answer { question, transcript } => template
                .replace("{question}", question)
                .replace("{transcript}", transcript),
        }
    }
}

async fn load_or_default(config: &PromptConfig, filename: &str, fallback: String) -> String {
    match config.load_prompt(filename).await {
        Ok(content) if !content.is_empty() => {
            debug!("Loaded prompt override: {}", filename);
            content
        }
        Ok(_) => {
            warn!("Prompt file {} is empty, using built-in template", filename);
            fallback
        }
        Err(e) => {
            debug!("{}, using built-in template", e);
            fallback
        }
    }
}
