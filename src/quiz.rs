//! Quiz text parsing and answer checking
//!
//! The LLM is asked for three multiple-choice questions in a loose textual
//! format:
//!
//! ```text
//! Q1. Question text here
//! a) Option 1
//! b) Option 2
//! c) Option 3
//! d) Option 4
//! Correct Answer: a)
//! ```
//!
//! Models drift from that format regularly, so parsing is best-effort: blocks
//! that cannot be turned into a complete question are skipped and counted,
//! never reported as errors.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::debug;

/// Number of options every parsed question carries
pub const OPTION_COUNT: usize = 4;

/// Question line + options + at least one more line (usually the answer)
const MIN_BLOCK_LINES: usize = 1 + OPTION_COUNT + 1;

/// Marker on the line that states the correct answer
const ANSWER_MARKER: &str = "Correct Answer:";

fn question_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"Q\d+\.").expect("question marker pattern is valid"))
}

/// A single multiple-choice question
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    /// 1-based position in the quiz
    pub ordinal: usize,
    /// Question text, prefixed with its ordinal label (`Q1. ...`)
    pub question: String,
    /// The four options, verbatim (normally labeled `a)` .. `d)`)
    pub options: [String; OPTION_COUNT],
    /// Raw answer fragment, typically just the label (`a)`); empty if the
    /// model never stated one
    pub correct_answer: String,
}

impl QuizQuestion {
    /// Check a selected option against the stated answer.
    ///
    /// The answer is usually only a label such as `a)` while the selection is
    /// the full option text, so this is a prefix test. A question without a
    /// stated answer accepts nothing.
    pub fn is_correct(&self, selection: &str) -> bool {
        !self.correct_answer.is_empty() && selection.starts_with(&self.correct_answer)
    }

    /// Whether the model stated an answer for this question
    pub fn has_answer(&self) -> bool {
        !self.correct_answer.is_empty()
    }
}

/// The questions parsed from one quiz completion
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSet {
    pub questions: Vec<QuizQuestion>,
    /// Blocks found in the completion that were too short to use
    pub skipped_blocks: usize,
}

impl QuizSet {
    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuizQuestion> {
        self.questions.iter()
    }

    /// Look up a question by its 0-based index
    pub fn get(&self, index: usize) -> Option<&QuizQuestion> {
        self.questions.get(index)
    }
}

impl<'a> IntoIterator for &'a QuizSet {
    type Item = &'a QuizQuestion;
    type IntoIter = std::slice::Iter<'a, QuizQuestion>;

    fn into_iter(self) -> Self::IntoIter {
        self.questions.iter()
    }
}

/// Parse raw quiz text into structured questions.
///
/// Never fails. Text before the first `Q<n>.` marker is ignored, blocks with
/// fewer than six non-empty lines are dropped, and questions are renumbered
/// `1..=k` by output position regardless of the numbers the model used.
pub fn parse_quiz(raw: &str) -> QuizSet {
    let mut quiz = QuizSet::default();

    for block in split_blocks(raw) {
        match parse_block(block, quiz.questions.len() + 1) {
            Some(question) => quiz.questions.push(question),
            None => quiz.skipped_blocks += 1,
        }
    }

    debug!(
        "Parsed {} quiz questions ({} blocks skipped)",
        quiz.questions.len(),
        quiz.skipped_blocks
    );

    quiz
}

/// Slices of `raw` between consecutive question markers; preamble dropped
fn split_blocks(raw: &str) -> Vec<&str> {
    let markers: Vec<_> = question_marker().find_iter(raw).collect();

    markers
        .iter()
        .enumerate()
        .map(|(i, marker)| {
            let end = markers.get(i + 1).map_or(raw.len(), |next| next.start());
            &raw[marker.end()..end]
        })
        .collect()
}

fn parse_block(block: &str, ordinal: usize) -> Option<QuizQuestion> {
    let lines: Vec<&str> = block
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.len() < MIN_BLOCK_LINES {
        debug!("Skipping quiz block with {} lines", lines.len());
        return None;
    }

    let options: [String; OPTION_COUNT] =
        std::array::from_fn(|i| lines[1 + i].to_string());

    Some(QuizQuestion {
        ordinal,
        question: format!("Q{}. {}", ordinal, lines[0]),
        options,
        correct_answer: extract_answer(&lines),
    })
}

/// Text after the first colon of the first answer line, trimmed
fn extract_answer(lines: &[&str]) -> String {
    lines
        .iter()
        .find(|line| line.contains(ANSWER_MARKER))
        .and_then(|line| line.split_once(':'))
        .map(|(_, answer)| answer.trim().to_string())
        .unwrap_or_default()
}
