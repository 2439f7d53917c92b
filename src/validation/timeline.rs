/*!
 * Timeline coverage validation.
 *
 * Checks run in a fixed order and stop at the first failure:
 * - the timeline is not empty
 * - the first segment starts at zero
 * - the last segment ends at the script end
 * - each segment ends where the next one starts
 *
 * Segments are checked in the order given; they are never sorted.
 */

use log::debug;

use crate::errors::{GapLocation, TimelineError};
use crate::footage::FootageSegment;
use crate::timeline::TIME_EPSILON;

/// Checks that a segment list covers `[0, script_end]` without gaps or overlaps
#[derive(Debug, Clone, Copy)]
pub struct TimelineValidator {
    epsilon: f64,
}

impl TimelineValidator {
    /// Create a validator with a custom timestamp tolerance
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    fn matches(&self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.epsilon
    }

    /// Validate `segments` against `script_end`
    pub fn validate(
        &self,
        segments: Vec<FootageSegment>,
        script_end: f64,
    ) -> Result<ValidatedTimeline, TimelineError> {
        self.check(&segments, script_end)?;

        debug!(
            "Timeline validated: {} segments covering [0, {:.3}]",
            segments.len(),
            script_end
        );

        Ok(ValidatedTimeline {
            segments,
            script_end,
        })
    }

    /// Run the coverage checks again on an already validated timeline
    pub fn revalidate(&self, timeline: ValidatedTimeline) -> Result<ValidatedTimeline, TimelineError> {
        let ValidatedTimeline { segments, script_end } = timeline;
        self.validate(segments, script_end)
    }

    fn check(&self, segments: &[FootageSegment], script_end: f64) -> Result<(), TimelineError> {
        let (Some(first), Some(last)) = (segments.first(), segments.last()) else {
            return Err(TimelineError::EmptyTimeline);
        };

        if !self.matches(first.start, 0.0) {
            return Err(TimelineError::TimelineGap {
                at: GapLocation::Start,
                expected: 0.0,
                found: first.start,
            });
        }

        if !self.matches(last.end, script_end) {
            return Err(TimelineError::TimelineGap {
                at: GapLocation::End,
                expected: script_end,
                found: last.end,
            });
        }

        for (i, pair) in segments.windows(2).enumerate() {
            if !self.matches(pair[0].end, pair[1].start) {
                return Err(TimelineError::TimelineGap {
                    at: GapLocation::Between(i),
                    expected: pair[0].end,
                    found: pair[1].start,
                });
            }
        }

        Ok(())
    }
}

impl Default for TimelineValidator {
    fn default() -> Self {
        Self::new(TIME_EPSILON)
    }
}

/// A segment list proven to cover `[0, script_end]` contiguously.
///
/// Only `TimelineValidator` can build one, so holding a value is proof the
/// checks passed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedTimeline {
    segments: Vec<FootageSegment>,
    script_end: f64,
}

impl ValidatedTimeline {
    /// Segments in timeline order
    pub fn segments(&self) -> &[FootageSegment] {
        &self.segments
    }

    /// End of the narration the timeline covers
    pub fn script_end(&self) -> f64 {
        self.script_end
    }

    /// Number of segments
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false; an empty timeline never validates
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Give back the segment list
    pub fn into_segments(self) -> Vec<FootageSegment> {
        self.segments
    }

    /// Rewrite every asset reference; windows are untouched so coverage still holds
    pub fn map_assets<E>(mut self, mut resolve: impl FnMut(&str) -> Result<String, E>) -> Result<Self, E> {
        for segment in &mut self.segments {
            segment.asset_ref = resolve(&segment.asset_ref)?;
        }
        Ok(self)
    }
}
