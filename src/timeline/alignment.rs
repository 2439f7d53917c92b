/*!
 * Character alignment import.
 *
 * The text-to-speech collaborator reports timing as three parallel arrays.
 * This module checks that the arrays agree with each other and converts them
 * into a typed sequence of `CharacterTiming` values.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

/// Character-level alignment as delivered by the speech provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlignmentPayload {
    /// One entry per spoken character, whitespace included
    pub characters: Vec<String>,

    /// Start time of each character in seconds
    #[serde(rename = "characterStartTimesSeconds", alias = "character_start_times_seconds")]
    pub character_start_times_seconds: Vec<f64>,

    /// End time of each character in seconds
    #[serde(rename = "characterEndTimesSeconds", alias = "character_end_times_seconds")]
    pub character_end_times_seconds: Vec<f64>,
}

/// Timing of a single character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacterTiming {
    /// The character itself
    pub ch: char,
    /// Start time in seconds
    pub start: f64,
    /// End time in seconds
    pub end: f64,
}

impl CharacterTiming {
    /// Create a character timing, rejecting reversed or non-finite times
    pub fn new(ch: char, start: f64, end: f64) -> Result<Self, TimelineError> {
        if !start.is_finite() || !end.is_finite() {
            return Err(TimelineError::AlignmentMismatch(format!(
                "non-finite timestamp for '{}'",
                ch.escape_default()
            )));
        }
        if start > end {
            return Err(TimelineError::AlignmentMismatch(format!(
                "character '{}' starts at {} after it ends at {}",
                ch.escape_default(),
                start,
                end
            )));
        }
        Ok(Self { ch, start, end })
    }

    /// Whether this character separates words
    pub fn is_whitespace(&self) -> bool {
        self.ch.is_whitespace()
    }
}

impl AlignmentPayload {
    /// Build a payload from parallel arrays
    pub fn new(characters: Vec<String>, starts: Vec<f64>, ends: Vec<f64>) -> Self {
        Self {
            characters,
            character_start_times_seconds: starts,
            character_end_times_seconds: ends,
        }
    }

    /// Number of characters in the payload
    pub fn len(&self) -> usize {
        self.characters.len()
    }

    /// Whether the payload carries no characters
    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Validate the payload and convert it into character timings.
    ///
    /// Fails with `AlignmentMismatch` when the arrays differ in length, when
    /// an entry is not exactly one character, when a character ends before it
    /// starts, or when start times go backwards.
    pub fn import(&self) -> Result<Vec<CharacterTiming>, TimelineError> {
        let count = self.characters.len();
        if self.character_start_times_seconds.len() != count
            || self.character_end_times_seconds.len() != count
        {
            return Err(TimelineError::AlignmentMismatch(format!(
                "array lengths differ: {} characters, {} start times, {} end times",
                count,
                self.character_start_times_seconds.len(),
                self.character_end_times_seconds.len()
            )));
        }

        let mut timings = Vec::with_capacity(count);
        let mut previous_start = f64::NEG_INFINITY;

        for (index, text) in self.characters.iter().enumerate() {
            let mut chars = text.chars();
            let ch = match (chars.next(), chars.next()) {
                (Some(ch), None) => ch,
                _ => {
                    return Err(TimelineError::AlignmentMismatch(format!(
                        "entry {} is not a single character: {:?}",
                        index, text
                    )));
                }
            };

            let start = self.character_start_times_seconds[index];
            let end = self.character_end_times_seconds[index];
            let timing = CharacterTiming::new(ch, start, end).map_err(|e| match e {
                TimelineError::AlignmentMismatch(msg) => {
                    TimelineError::AlignmentMismatch(format!("entry {}: {}", index, msg))
                }
                other => other,
            })?;

            if start < previous_start {
                return Err(TimelineError::AlignmentMismatch(format!(
                    "start time goes backwards at entry {}: {} < {}",
                    index, start, previous_start
                )));
            }
            previous_start = start;
            timings.push(timing);
        }

        debug!("Imported alignment with {} characters", timings.len());

        Ok(timings)
    }
}
