use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

use crate::error::{AppError, Result};

/// SRT (SubRip Subtitle) entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SrtEntry {
    /// Sequential number, if the block had one
    pub index: Option<u32>,
    /// Start timestamp
    pub start: Duration,
    /// End timestamp
    pub end: Duration,
    /// Dialogue text, markup removed, lines joined with spaces
    pub text: String,
}

/// Parsed subtitle file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SrtDocument {
    pub entries: Vec<SrtEntry>,
    /// Blocks without a usable timing line or dialogue
    pub skipped_blocks: usize,
}

impl SrtDocument {
    /// Dialogue of every entry joined with single spaces
    pub fn transcript(&self) -> String {
        self.entries
            .iter()
            .map(|e| e.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// End of the last entry
    pub fn total_duration(&self) -> Duration {
        self.entries
            .iter()
            .map(|entry| entry.end)
            .max()
            .unwrap_or(Duration::from_secs(0))
    }
}

fn timing_line() -> &'static Regex {
    static TIMING: OnceLock<Regex> = OnceLock::new();
    TIMING.get_or_init(|| {
        Regex::new(r"^(\d{1,2}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{1,2}:\d{2}:\d{2}[,.]\d{3})")
            .expect("timing pattern is valid")
    })
}

fn markup() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| Regex::new(r"<[^>]*>|\{\\[^}]*\}").expect("markup pattern is valid"))
}

/// Decode an uploaded subtitle file into plain transcript text.
///
/// Sequence numbers and timing lines are dropped; malformed blocks are
/// skipped. Fails if the bytes are not UTF-8 or no block is usable.
pub fn decode_srt(bytes: &[u8]) -> Result<String> {
    let content = std::str::from_utf8(bytes)
        .map_err(|e| AppError::Decode(format!("file is not valid UTF-8: {}", e)))?;

    let document = parse_srt(content);
    if document.entries.is_empty() {
        return Err(AppError::Decode("no subtitle blocks found".to_string()));
    }

    info!(
        "📄 Decoded {} subtitle entries covering {} ({} blocks skipped)",
        document.entries.len(),
        format_timestamp(document.total_duration()),
        document.skipped_blocks
    );

    Ok(document.transcript())
}

/// Parse SRT text into entries, skipping blocks that do not fit the format
pub fn parse_srt(content: &str) -> SrtDocument {
    let content = content.trim_start_matches('\u{feff}');
    let mut document = SrtDocument::default();
    let mut block: Vec<&str> = Vec::new();

    // `lines()` also strips the `\r` of CRLF endings
    for line in content.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line.trim());
            continue;
        }
        if block.is_empty() {
            continue;
        }
        for cue in split_cues(&block) {
            match parse_block(cue) {
                Some(entry) => document.entries.push(entry),
                None => {
                    debug!("Skipping malformed subtitle block starting with {:?}", cue.first());
                    document.skipped_blocks += 1;
                }
            }
        }
        block.clear();
    }

    document
}

/// Split a blank-line block into cues; a timing line after the first starts
/// a new cue, taking a digits-only line right before it as its index
fn split_cues<'b, 'a>(lines: &'b [&'a str]) -> Vec<&'b [&'a str]> {
    let mut cues = Vec::new();
    let mut start = 0;
    let mut last_timing: Option<usize> = None;

    for (i, line) in lines.iter().enumerate() {
        if !timing_line().is_match(line) {
            continue;
        }
        if let Some(previous) = last_timing {
            let cut = if i - 1 > previous && is_index(lines[i - 1]) { i - 1 } else { i };
            cues.push(&lines[start..cut]);
            start = cut;
        }
        last_timing = Some(i);
    }

    cues.push(&lines[start..]);
    cues
}

fn is_index(line: &str) -> bool {
    !line.is_empty() && line.chars().all(|c| c.is_ascii_digit())
}

fn parse_block(lines: &[&str]) -> Option<SrtEntry> {
    let (index, rest) = match lines.split_first() {
        Some((first, rest)) if is_index(first) => (first.parse().ok(), rest),
        _ => (None, lines),
    };

    let (timing, dialogue) = rest.split_first()?;
    let caps = timing_line().captures(timing)?;
    let start = parse_timestamp(&caps[1])?;
    let end = parse_timestamp(&caps[2])?;

    let text = dialogue
        .iter()
        .map(|line| clean_text(&markup().replace_all(line, "")))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if text.is_empty() {
        return None;
    }

    Some(SrtEntry { index, start, end, text })
}

/// Collapse whitespace runs to single spaces
fn clean_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse a single timestamp (HH:MM:SS,mmm)
fn parse_timestamp(timestamp: &str) -> Option<Duration> {
    let (hms, millis) = timestamp.split_once(|c: char| c == ',' || c == '.')?;

    let mut hms_parts = hms.split(':');
    let hours: u64 = hms_parts.next()?.parse().ok()?;
    let minutes: u64 = hms_parts.next()?.parse().ok()?;
    let seconds: u64 = hms_parts.next()?.parse().ok()?;
    let milliseconds: u64 = millis.parse().ok()?;

    if minutes >= 60 || seconds >= 60 {
        return None;
    }

    let total_seconds = hours * 3600 + minutes * 60 + seconds;
    Some(Duration::from_millis(total_seconds * 1000 + milliseconds))
}

/// Format duration as SRT timestamp (HH:MM:SS,mmm)
pub fn format_timestamp(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    let milliseconds = duration.subsec_millis();

    format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, milliseconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "1
00:00:01,000 --> 00:00:04,000
Hello and welcome.

2
00:00:04,500 --> 00:00:07,250
Today we talk
about <i>Rust</i>.

3
00:00:08,000 --> 00:00:09,000
Bye!
";

    #[test]
    fn test_decode_joins_dialogue() {
        let transcript = decode_srt(SAMPLE.as_bytes()).unwrap();
        assert_eq!(transcript, "Hello and welcome. Today we talk about Rust. Bye!");
    }

    #[test]
    fn test_parse_keeps_timing() {
        let document = parse_srt(SAMPLE);

        assert_eq!(document.entries.len(), 3);
        assert_eq!(document.entries[1].index, Some(2));
        assert_eq!(document.entries[1].start, Duration::from_millis(4500));
        assert_eq!(document.entries[1].end, Duration::from_millis(7250));
        assert_eq!(document.total_duration(), Duration::from_secs(9));
    }

    #[test]
    fn test_crlf_and_bom() {
        let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,000\r\nLine one\r\n\r\n2\r\n00:00:02,000 --> 00:00:03,000\r\nLine two\r\n";
        assert_eq!(decode_srt(content.as_bytes()).unwrap(), "Line one Line two");
    }

    #[test]
    fn test_malformed_blocks_are_skipped() {
        let content = "1
00:00:01,000 --> 00:00:02,000
Kept

2
not a timing line
Dropped

3
00:00:03,000 --> 00:00:04,000

4
00:00:05,000 --> 00:00:06,000
Also kept
";
        let document = parse_srt(content);

        assert_eq!(document.skipped_blocks, 2);
        assert_eq!(document.transcript(), "Kept Also kept");
    }

    #[test]
    fn test_block_without_index_is_accepted() {
        let document = parse_srt("00:00:01,000 --> 00:00:02,000 X1:40 X2:600\n{\\an8}Top text\n");
        assert_eq!(document.entries.len(), 1);
        assert_eq!(document.entries[0].index, None);
        assert_eq!(document.entries[0].text, "Top text");
    }

    #[test]
    fn test_numeric_dialogue_is_not_mistaken_for_index() {
        let document = parse_srt("7\n00:00:01,000 --> 00:00:02,000\n42\n");
        assert_eq!(document.transcript(), "42");
    }

    #[test]
    fn test_cues_without_blank_separator_are_split() {
        let content = "1\n00:00:01,000 --> 00:00:02,000\nHello\n2\n00:00:02,000 --> 00:00:03,000\nWorld\n";

        let transcript = decode_srt(content.as_bytes()).unwrap();
        assert_eq!(transcript, "Hello World");
        assert!(!transcript.contains("-->"));

        let document = parse_srt(content);
        assert_eq!(document.entries.len(), 2);
        assert_eq!(document.entries[1].index, Some(2));
        assert_eq!(document.entries[1].start, Duration::from_secs(2));
    }

    #[test]
    fn test_unseparated_cue_without_index_and_numeric_dialogue() {
        let content = "00:00:01,000 --> 00:00:02,000\n42\n00:00:02,000 --> 00:00:03,000\nNext\n";
        let document = parse_srt(content);

        // A digits-only line before a timing line is read as that cue's index
        assert_eq!(document.entries.len(), 1);
        assert_eq!(document.skipped_blocks, 1);
        assert_eq!(document.entries[0].index, Some(42));
        assert_eq!(document.transcript(), "Next");
    }

    #[test]
    fn test_decode_errors() {
        assert!(matches!(decode_srt(&[0xff, 0xfe, 0x00]), Err(AppError::Decode(_))));
        assert!(matches!(decode_srt(b""), Err(AppError::Decode(_))));
        assert!(matches!(decode_srt(b"just some text\nwith lines"), Err(AppError::Decode(_))));
    }

    #[test]
    fn test_timestamp_parsing_and_formatting() {
        assert_eq!(parse_timestamp("01:01:01,000"), Some(Duration::from_secs(3661)));
        assert_eq!(parse_timestamp("00:00:01.500"), Some(Duration::from_millis(1500)));
        assert_eq!(parse_timestamp("00:61:00,000"), None);
        assert_eq!(format_timestamp(Duration::from_millis(1500)), "00:00:01,500");
        assert_eq!(format_timestamp(Duration::from_secs(3661)), "01:01:01,000");
    }
}
