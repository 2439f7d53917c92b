/*!
 * Narration timeline primitives.
 *
 * This module turns a character-level speech alignment into word and sentence
 * timings and removes long silences from the narration:
 * - `alignment`: validated import of the TTS alignment payload
 * - `words`: grouping characters into words
 * - `sentences`: grouping words into subtitle-sized sentences
 * - `pauses`: pause detection, timeline compaction and keep intervals
 * - `subtitles`: numbered subtitle cues and SRT output
 *
 * All timestamps are seconds as `f64`.
 */

pub mod alignment;
pub mod words;
pub mod sentences;
pub mod pauses;
pub mod subtitles;

use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

// Re-export main types
pub use alignment::{AlignmentPayload, CharacterTiming};
pub use words::{Word, group_chars_into_words};
pub use sentences::{Sentence, group_words_into_sentences, DEFAULT_MAX_WORDS_PER_SENTENCE};
pub use pauses::{Pause, PauseDetection, PauseDetector, detect_pauses, keep_intervals};
pub use subtitles::{SubtitleCue, cues_from_sentences, to_srt};

/// Tolerance used when comparing timestamps for equality
pub const TIME_EPSILON: f64 = 1e-6;

/// A closed time window `[start, end]` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    /// Window start in seconds
    pub start: f64,
    /// Window end in seconds
    pub end: f64,
}

impl Interval {
    /// Create an interval, rejecting non-finite bounds and `end < start`
    pub fn new(start: f64, end: f64) -> Result<Self, TimelineError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TimelineError::InvalidInterval {
                start,
                end,
                reason: "bounds must be finite".to_string(),
            });
        }
        if end < start {
            return Err(TimelineError::InvalidInterval {
                start,
                end,
                reason: "end precedes start".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Length of the window in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Whether the window has no measurable length
    pub fn is_empty(&self) -> bool {
        self.duration() <= TIME_EPSILON
    }
}

/// Whether two timestamps are equal within `TIME_EPSILON`
pub fn times_match(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_EPSILON
}
