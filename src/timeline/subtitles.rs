use std::fmt;

use serde::{Deserialize, Serialize};

use super::sentences::Sentence;
use super::words::Word;

// @module: Subtitle cues built from sentences

/// One numbered caption with word-level highlight windows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubtitleCue {
    /// 1-based sequence number
    pub index: usize,
    /// Cue start in seconds
    pub start: f64,
    /// Cue end in seconds
    pub end: f64,
    /// Caption text
    pub text: String,
    /// Words to highlight, each during its own span
    pub highlights: Vec<Word>,
}

impl SubtitleCue {
    /// Format seconds as an SRT timestamp (HH:MM:SS,mmm), rounded to the millisecond
    pub fn format_timestamp(seconds: f64) -> String {
        let ms = (seconds.max(0.0) * 1000.0).round() as u64;
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let secs = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, secs, millis)
    }
}

impl fmt::Display for SubtitleCue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(
            f,
            "{} --> {}",
            Self::format_timestamp(self.start),
            Self::format_timestamp(self.end)
        )?;
        writeln!(f, "{}", self.text)
    }
}

/// Turn sentences into numbered cues; empty sentences are skipped
pub fn cues_from_sentences(sentences: &[Sentence]) -> Vec<SubtitleCue> {
    sentences
        .iter()
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, sentence)| SubtitleCue {
            index: i + 1,
            start: sentence.start(),
            end: sentence.end(),
            text: sentence.text(),
            highlights: sentence.words.clone(),
        })
        .collect()
}

/// Render cues as an SRT document, blocks separated by blank lines
pub fn to_srt(cues: &[SubtitleCue]) -> String {
    cues.iter()
        .map(|cue| cue.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
