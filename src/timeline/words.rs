use serde::{Deserialize, Serialize};

use super::alignment::CharacterTiming;

// @module: Word grouping from character timings

/// A spoken word with its time span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    /// Word text, punctuation included
    pub text: String,
    /// Start of the first character in seconds
    pub start: f64,
    /// End of the last character in seconds
    pub end: f64,
}

impl Word {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start,
            end,
        }
    }

    /// Time the word takes to speak
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the word closes a sentence (`.`, `?` or `!` as last character)
    pub fn ends_sentence(&self) -> bool {
        self.text.ends_with(['.', '?', '!'])
    }

    /// Shift the word earlier by `amount` seconds
    pub(crate) fn shift_back(&mut self, amount: f64) {
        self.start -= amount;
        self.end -= amount;
    }
}

/// Group characters into words on whitespace boundaries.
///
/// A word starts at its first non-space character and ends with the last
/// character before the next whitespace run. A trailing run without
/// whitespace after it still forms a word.
pub fn group_chars_into_words(chars: &[CharacterTiming]) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for timing in chars {
        if timing.is_whitespace() {
            if let Some(word) = current.take() {
                words.push(word);
            }
            continue;
        }

        match current.as_mut() {
            Some(word) => {
                word.text.push(timing.ch);
                word.end = timing.end;
            }
            None => {
                current = Some(Word::new(timing.ch.to_string(), timing.start, timing.end));
            }
        }
    }

    if let Some(word) = current {
        words.push(word);
    }

    words
}
