//! Keyword search over a transcript
//!
//! Sentences are split after `.`, `?` or `!` when whitespace follows. This is
//! a plain punctuation split: abbreviations like "Dr." end a sentence too.

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

/// Emphasis marker wrapped around keyword occurrences for display
const HIGHLIGHT_MARKER: &str = "**";

/// One search hit, ready for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    /// 1-based position in the result list
    pub rank: usize,
    pub sentence: String,
    /// Sentence with every keyword occurrence wrapped in `**`
    pub highlighted: String,
}

/// Split a transcript into sentences.
///
/// A boundary sits right after a terminator that is followed by whitespace;
/// the whitespace run itself is dropped.
pub fn split_sentences(transcript: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = transcript.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if !matches!(ch, '.' | '?' | '!') {
            continue;
        }
        let Some(&(next, next_ch)) = chars.peek() else {
            break;
        };
        if !next_ch.is_whitespace() {
            continue;
        }

        sentences.push(&transcript[start..next]);

        // Swallow the whitespace run
        start = next;
        while let Some(&(j, c)) = chars.peek() {
            if !c.is_whitespace() {
                break;
            }
            chars.next();
            start = j + c.len_utf8();
        }
    }

    if start < transcript.len() {
        sentences.push(&transcript[start..]);
    }

    sentences
}

/// Case-insensitive literal matcher for a keyword
fn keyword_pattern(keyword: &str) -> Option<Regex> {
    if keyword.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(keyword))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Sentences containing `keyword`, case-insensitively.
///
/// The keyword is matched literally. Results are trimmed and deduplicated by
/// exact text, keeping the order of first occurrence. An empty keyword
/// matches nothing.
pub fn search(transcript: &str, keyword: &str) -> Vec<String> {
    let Some(pattern) = keyword_pattern(keyword) else {
        return Vec::new();
    };

    let mut results: Vec<String> = Vec::new();
    for sentence in split_sentences(transcript) {
        if !pattern.is_match(sentence) {
            continue;
        }
        let clean = sentence.trim();
        if !results.iter().any(|existing| existing == clean) {
            results.push(clean.to_string());
        }
    }

    results
}

/// Wrap every case-insensitive occurrence of `keyword` in `**`, keeping the
/// original casing of the matched text
pub fn highlight(sentence: &str, keyword: &str) -> String {
    match keyword_pattern(keyword) {
        Some(pattern) => pattern
            .replace_all(sentence, |caps: &regex::Captures| {
                format!("{HIGHLIGHT_MARKER}{}{HIGHLIGHT_MARKER}", &caps[0])
            })
            .into_owned(),
        None => sentence.to_string(),
    }
}

/// Search and annotate the results for display
pub fn search_highlighted(transcript: &str, keyword: &str) -> Vec<SearchHit> {
    search(transcript, keyword)
        .into_iter()
        .enumerate()
        .map(|(i, sentence)| SearchHit {
            rank: i + 1,
            highlighted: highlight(&sentence, keyword),
            sentence,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_deduplicates_and_keeps_order() {
        let results = search("The cat sat. The cat ran. The cat sat.", "cat");
        assert_eq!(results, vec!["The cat sat.", "The cat ran."]);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let results = search("Python is great. python is fun.", "PYTHON");
        assert_eq!(results, vec!["Python is great.", "python is fun."]);
    }

    #[test]
    fn test_keyword_is_literal() {
        let transcript = "Costs rose 5.0 percent. Costs rose 500 percent? Wow (really)!";
        assert_eq!(search(transcript, "5.0"), vec!["Costs rose 5.0 percent."]);
        assert_eq!(search(transcript, "(really)"), vec!["Wow (really)!"]);
        assert!(search(transcript, ".*").is_empty());
    }

    #[test]
    fn test_empty_keyword_matches_nothing() {
        assert!(search("Anything at all.", "").is_empty());
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert!(search("Nothing to see here.", "dog").is_empty());
        assert!(search("", "dog").is_empty());
    }

    #[test]
    fn test_sentence_split_rules() {
        let sentences = split_sentences("Is it? Yes!  It is.\nDone... ok 3.14 stays");
        assert_eq!(sentences, vec!["Is it?", "Yes!", "It is.", "Done...", "ok 3.14 stays"]);
    }

    #[test]
    fn test_split_keeps_trailing_terminator_sentence() {
        assert_eq!(split_sentences("One. Two."), vec!["One.", "Two."]);
        assert_eq!(split_sentences("One. "), vec!["One."]);
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_highlight_keeps_original_case() {
        assert_eq!(
            highlight("Rust and rust and RUST.", "rust"),
            "**Rust** and **rust** and **RUST**."
        );
        assert_eq!(highlight("a+b is not ab", "a+b"), "**a+b** is not ab");
    }

    #[test]
    fn test_search_highlighted_numbers_hits() {
        let hits = search_highlighted("The cat sat. A dog ran. The Cat slept.", "cat");
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].rank, 1);
        assert_eq!(hits[1].rank, 2);
        assert_eq!(hits[1].highlighted, "The **Cat** slept.");
    }
}
