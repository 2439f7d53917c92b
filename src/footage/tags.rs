/*!
 * Tag-based footage scheduling.
 *
 * The script carries inline footage tags between plain narration, e.g.
 *
 * ```text
 * Hello world {{"video": "file_abc.mp4"}} This is a test {photo:file_logo.png} done
 * ```
 *
 * A tag starts its footage at the first word spoken after it. Photos last a
 * fixed time; a video runs until the word where the next tag starts, or to
 * the end of the narration if no tag follows. Word positions are found by
 * counting the whitespace-separated words of each text chunk.
 *
 * Nested, unbalanced or unterminated tags are rejected with `MalformedTag`
 * rather than being counted as spoken words.
 */

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::TimelineError;
use crate::timeline::Word;

use super::{FootageKind, FootageScheduler, FootageSegment, Schedule, script_end};

/// Default on-screen time for a photo tag in seconds
pub const DEFAULT_PHOTO_LENGTH: f64 = 1.0;

// Braced: {{"video": "a.mp4"}}, {video:a.mp4}, {video:"a b.mp4"}; bare: video:"a.mp4"
// Brace runs are captured so unbalanced ones can be rejected.
static FOOTAGE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(\{\{?)\s*"?(video|photo)"?\s*:\s*(?:"([^"]+)"|([^"{}\s]+))\s*(\}\}?)"#,
        r#"|\b(video|photo):"([^"]+)""#,
    ))
    .expect("Invalid footage tag regex")
});

// Leftovers of a tag that did not parse
static TAG_FRAGMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[{}]|\b(?:video|photo)"?:"#).expect("Invalid tag fragment regex")
});

/// Media kind named by a tag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    Video,
    Photo,
}

impl From<TagKind> for FootageKind {
    fn from(kind: TagKind) -> Self {
        match kind {
            TagKind::Video => FootageKind::Video,
            TagKind::Photo => FootageKind::Photo,
        }
    }
}

/// A piece of the script: either narration or a footage tag
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptToken {
    /// Plain narration, trimmed and non-empty
    Text(String),
    /// Inline footage tag
    Tag { kind: TagKind, filename: String },
}

impl ScriptToken {
    /// Number of spoken words this token consumes
    fn word_count(&self) -> usize {
        match self {
            ScriptToken::Text(text) => text.split_whitespace().count(),
            ScriptToken::Tag { .. } => 0,
        }
    }
}

/// Split a script into text chunks and footage tags, preserving order
pub fn tokenize_script(script: &str) -> Result<Vec<ScriptToken>, TimelineError> {
    let mut tokens = Vec::new();
    let mut last_index = 0;

    let push_text = |tokens: &mut Vec<ScriptToken>, chunk: &str| -> Result<(), TimelineError> {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            return Ok(());
        }
        if let Some(fragment) = TAG_FRAGMENT_REGEX.find(chunk) {
            return Err(TimelineError::MalformedTag(format!(
                "unparsed '{}' in \"{}\"",
                fragment.as_str(),
                chunk
            )));
        }
        tokens.push(ScriptToken::Text(chunk.to_string()));
        Ok(())
    };

    for caps in FOOTAGE_TAG_REGEX.captures_iter(script) {
        let Some(whole) = caps.get(0) else { continue };

        push_text(&mut tokens, &script[last_index..whole.start()])?;

        if let (Some(open), Some(close)) = (caps.get(1), caps.get(5)) {
            if open.len() != close.len() {
                return Err(TimelineError::MalformedTag(format!("unbalanced braces in {}", whole.as_str())));
            }
        }

        let kind = match caps.get(2).or_else(|| caps.get(6)).map(|m| m.as_str()) {
            Some("photo") => TagKind::Photo,
            _ => TagKind::Video,
        };
        let filename = caps
            .get(3)
            .or_else(|| caps.get(4))
            .or_else(|| caps.get(7))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default();

        tokens.push(ScriptToken::Tag { kind, filename });
        last_index = whole.end();
    }

    push_text(&mut tokens, &script[last_index..])?;

    Ok(tokens)
}

/// Schedules footage named by inline script tags
#[derive(Debug, Clone)]
pub struct TagScheduler {
    photo_length: f64,
}

impl TagScheduler {
    pub fn new(photo_length: f64) -> Self {
        Self { photo_length }
    }

    /// Start of the word at `cursor`, if the narration has that many words
    fn word_start(words: &[Word], cursor: usize) -> Option<f64> {
        words.get(cursor).map(|w| w.start)
    }

    /// Start time of the next tag after `tokens[index]`, looking ahead from `cursor`
    fn next_tag_start(tokens: &[ScriptToken], index: usize, cursor: usize, words: &[Word]) -> Option<f64> {
        let mut lookahead = cursor;
        for token in &tokens[index + 1..] {
            match token {
                ScriptToken::Text(_) => lookahead += token.word_count(),
                ScriptToken::Tag { .. } => return Self::word_start(words, lookahead),
            }
        }
        None
    }
}

impl Default for TagScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_PHOTO_LENGTH)
    }
}

impl FootageScheduler for TagScheduler {
    fn name(&self) -> &'static str {
        "tag"
    }

    fn schedule(&self, script: &str, words: &[Word], _assets: &[String]) -> Result<Schedule, TimelineError> {
        let tokens = tokenize_script(script)?;
        let end = script_end(words);
        let mut cursor = 0;
        let mut segments = Vec::new();

        for (index, token) in tokens.iter().enumerate() {
            let ScriptToken::Tag { kind, filename } = token else {
                cursor += token.word_count();
                continue;
            };

            let start = Self::word_start(words, cursor).unwrap_or(end);
            let segment_end = match kind {
                TagKind::Photo => start + self.photo_length,
                TagKind::Video => Self::next_tag_start(&tokens, index, cursor, words).unwrap_or(end),
            };

            segments.push(FootageSegment::new(filename.clone(), (*kind).into(), start, segment_end)?);
        }

        debug!(
            "Tag schedule: {} tokens, {} segments, script end {:.3}s",
            tokens.len(),
            segments.len(),
            end
        );

        Ok(Schedule {
            intro: None,
            segments,
            script_end: end,
        })
    }
}
