//! Transcript text helpers used by `inspect` and input loading

use std::sync::OnceLock;

use regex::Regex;

fn whitespace_regex() -> &'static Regex {
    static WHITESPACE_RE: OnceLock<Regex> = OnceLock::new();
    WHITESPACE_RE.get_or_init(|| Regex::new(r"\s+").expect("whitespace regex should compile"))
}

fn speaker_regex() -> &'static Regex {
    static SPEAKER_RE: OnceLock<Regex> = OnceLock::new();
    SPEAKER_RE.get_or_init(|| {
        Regex::new(r"(?m)^\s*([\p{L}][\p{L}\p{M} .'-]{0,40}?)\s*:\s*")
            .expect("speaker regex should compile")
    })
}

/// Collapse runs of whitespace into single spaces and trim
pub fn clean_text(text: &str) -> String {
    whitespace_regex().replace_all(text, " ").trim().to_string()
}

/// A single speaker turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub speaker: String,
    pub text: String,
}

/// Split a `Name: text` transcript into turns
///
/// A turn runs from its `Name:` label at the start of a line up to the next
/// label; continuation lines belong to the current speaker. Text before the
/// first label is dropped.
pub fn split_by_speaker(transcript: &str) -> Vec<Utterance> {
    let labels: Vec<(usize, usize, String)> = speaker_regex()
        .captures_iter(transcript)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let name = caps.get(1)?;
            Some((whole.start(), whole.end(), name.as_str().trim().to_string()))
        })
        .collect();

    labels
        .iter()
        .enumerate()
        .map(|(i, (_, body_start, speaker))| {
            let body_end = labels
                .get(i + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(transcript.len());
            Utterance {
                speaker: speaker.clone(),
                text: clean_text(&transcript[*body_start..body_end]),
            }
        })
        .filter(|u| !u.text.is_empty())
        .collect()
}

/// Basic size statistics of a text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
    pub paragraphs: usize,
}

pub fn text_stats(text: &str) -> TextStats {
    TextStats {
        characters: text.chars().count(),
        words: text.split_whitespace().count(),
        lines: text.split('\n').count(),
        paragraphs: text.split("\n\n").filter(|p| !p.trim().is_empty()).count(),
    }
}
