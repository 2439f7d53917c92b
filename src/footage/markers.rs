/*!
 * Marker-based footage scheduling.
 *
 * The narration contains a fixed number of sentinel words (for example
 * "PLACE" in a top-five script). Everything before the first sentinel is the
 * intro; each sentinel opens a segment that runs until the next sentinel, and
 * the last one runs until the end of the narration. The i-th sentinel always
 * receives the i-th asset.
 */

use log::debug;

use crate::errors::TimelineError;
use crate::timeline::{Interval, Word};

use super::{FootageKind, FootageScheduler, FootageSegment, Schedule, script_end};

/// Default sentinel word
pub const DEFAULT_MARKER_TOKEN: &str = "PLACE";

/// Default number of sentinels (and assets) per script
pub const DEFAULT_MARKER_COUNT: usize = 5;

/// Schedules one asset per sentinel word
#[derive(Debug, Clone)]
pub struct MarkerScheduler {
    token: String,
    count: usize,
}

impl MarkerScheduler {
    pub fn new(token: impl Into<String>, count: usize) -> Self {
        Self {
            token: token.into(),
            count,
        }
    }

    /// Indices of words whose text is exactly the sentinel token
    fn marker_indices(&self, words: &[Word]) -> Vec<usize> {
        words
            .iter()
            .enumerate()
            .filter(|(_, word)| word.text == self.token)
            .map(|(index, _)| index)
            .collect()
    }
}

impl Default for MarkerScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_MARKER_TOKEN, DEFAULT_MARKER_COUNT)
    }
}

impl FootageScheduler for MarkerScheduler {
    fn name(&self) -> &'static str {
        "marker"
    }

    fn schedule(&self, _script: &str, words: &[Word], assets: &[String]) -> Result<Schedule, TimelineError> {
        let markers = self.marker_indices(words);
        if markers.len() != self.count || markers.is_empty() {
            return Err(TimelineError::InvalidMarkerCount {
                token: self.token.clone(),
                expected: self.count,
                found: markers.len(),
            });
        }

        if assets.len() != self.count {
            return Err(TimelineError::AssetCountMismatch {
                expected: self.count,
                found: assets.len(),
            });
        }

        let end = script_end(words);
        let starts: Vec<f64> = markers.iter().map(|&i| words[i].start).collect();
        let intro = Interval::new(0.0, starts[0])?;

        let segments = starts
            .iter()
            .enumerate()
            .map(|(i, &start)| {
                let segment_end = starts.get(i + 1).copied().unwrap_or(end);
                FootageSegment::new(assets[i].clone(), FootageKind::Video, start, segment_end)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Marker schedule: intro {:.3}s, {} segments, script end {:.3}s",
            intro.duration(),
            segments.len(),
            end
        );

        Ok(Schedule {
            intro: Some(intro),
            segments,
            script_end: end,
        })
    }
}
