/*!
 * Pause detection and timeline compaction.
 *
 * A pause is a silence between two adjacent words that is at least
 * `gap_threshold` long. Each pause is narrowed by `pad` on both sides so the
 * cut never clips a word, and then removed from the word timeline by shifting
 * every later word back by the pause length.
 *
 * Pauses are reported in the original, uncompacted coordinates: the narration
 * audio that has to be cut is still on that timeline.
 */

use log::debug;
use serde::{Deserialize, Serialize};

use crate::errors::TimelineError;

use super::words::Word;
use super::Interval;

/// A silence to remove, in original timeline coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pause {
    /// Pause start in seconds
    pub start: f64,
    /// Pause end in seconds
    pub end: f64,
}

impl Pause {
    /// Create a pause; `end` must be strictly after `start`
    pub fn new(start: f64, end: f64) -> Result<Self, TimelineError> {
        if !(start.is_finite() && end.is_finite()) || end <= start {
            return Err(TimelineError::InvalidInterval {
                start,
                end,
                reason: "pause must have positive length".to_string(),
            });
        }
        Ok(Self { start, end })
    }

    /// Length of the pause in seconds
    pub fn length(&self) -> f64 {
        self.end - self.start
    }
}

/// Result of one detection and compaction pass
#[derive(Debug, Clone, PartialEq)]
pub struct PauseDetection {
    /// Words with every pause removed from their timestamps
    pub words: Vec<Word>,
    /// Removed pauses, sorted, in original coordinates
    pub pauses: Vec<Pause>,
}

impl PauseDetection {
    /// Total time removed from the narration
    pub fn removed_duration(&self) -> f64 {
        self.pauses.iter().map(Pause::length).sum()
    }
}

/// Finds silences between words and removes them from the timeline
#[derive(Debug, Clone, Copy)]
pub struct PauseDetector {
    gap_threshold: f64,
    pad: f64,
}

impl PauseDetector {
    pub fn new(gap_threshold: f64, pad: f64) -> Self {
        Self { gap_threshold, pad }
    }

    /// Find padded pauses between adjacent words, sorted by start.
    ///
    /// A gap of at least `gap_threshold` becomes a candidate; candidates that
    /// pad away to nothing are dropped.
    pub fn detect(&self, words: &[Word]) -> Vec<Pause> {
        let mut pauses: Vec<Pause> = words
            .windows(2)
            .filter(|pair| pair[1].start - pair[0].end >= self.gap_threshold)
            .filter_map(|pair| Pause::new(pair[0].end + self.pad, pair[1].start - self.pad).ok())
            .collect();

        pauses.sort_by(|a, b| a.start.total_cmp(&b.start));
        pauses
    }

    /// Remove `pauses` (sorted, original coordinates) from the word timeline.
    ///
    /// Pauses are applied one after another in time order. Each one is first
    /// moved into the already-shifted timeline, then every word starting at or
    /// after its shifted end moves back by its length.
    pub fn compact(&self, words: &[Word], pauses: &[Pause]) -> Vec<Word> {
        let mut words = words.to_vec();
        let mut total_shift = 0.0;

        for pause in pauses {
            let shifted_start = pause.start - total_shift;
            let shifted_end = pause.end - total_shift;
            let length = shifted_end - shifted_start;

            for word in words.iter_mut().filter(|w| w.start >= shifted_end) {
                word.shift_back(length);
            }

            total_shift += length;
        }

        words
    }

    /// Detect pauses and compact the words in one pass
    pub fn run(&self, words: &[Word]) -> PauseDetection {
        let pauses = self.detect(words);
        let words = self.compact(words, &pauses);

        debug!(
            "Pause detection: {} words, {} pauses, threshold {}s, pad {}s",
            words.len(),
            pauses.len(),
            self.gap_threshold,
            self.pad
        );

        PauseDetection { words, pauses }
    }
}

/// Detect pauses with the given threshold and padding and compact the words
pub fn detect_pauses(words: &[Word], gap_threshold: f64, pad: f64) -> (Vec<Word>, Vec<Pause>) {
    let detection = PauseDetector::new(gap_threshold, pad).run(words);
    (detection.words, detection.pauses)
}

/// Compute the parts of `[0, total_duration]` that survive removing `pauses`.
///
/// Pauses may arrive unsorted or overlapping. Fails with `NothingToKeep` if
/// nothing remains.
pub fn keep_intervals(pauses: &[Pause], total_duration: f64) -> Result<Vec<Interval>, TimelineError> {
    let mut sorted = pauses.to_vec();
    sorted.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut keep = Vec::with_capacity(sorted.len() + 1);
    let mut last_end = 0.0_f64;

    for pause in &sorted {
        if pause.start > last_end && last_end < total_duration {
            keep.push(Interval::new(last_end, pause.start.min(total_duration))?);
        }
        last_end = last_end.max(pause.end);
    }

    if last_end < total_duration {
        keep.push(Interval::new(last_end, total_duration)?);
    }

    keep.retain(|interval| !interval.is_empty());

    if keep.is_empty() {
        return Err(TimelineError::NothingToKeep);
    }

    Ok(keep)
}
