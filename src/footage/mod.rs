/*!
 * Footage scheduling.
 *
 * Decides which visual asset plays during which window of the compacted
 * narration. Two strategies sit behind the `FootageScheduler` trait:
 * - `markers`: a fixed number of sentinel words split the narration into an
 *   intro and one segment per asset
 * - `tags`: inline tags in the script text name the asset to show from that
 *   point on
 *
 * The strategy is picked from configuration with `scheduler_for`.
 */

pub mod markers;
pub mod tags;

use serde::{Deserialize, Serialize};

use crate::app_config::{FootageConfig, ScheduleStrategy};
use crate::errors::TimelineError;
use crate::timeline::{Interval, Word};

// Re-export main types
pub use markers::MarkerScheduler;
pub use tags::{ScriptToken, TagKind, TagScheduler, tokenize_script};

/// What kind of media backs a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FootageKind {
    Video,
    Photo,
    /// Opening stretch before the first marker, shown over the background
    Intro,
}

impl std::fmt::Display for FootageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FootageKind::Video => write!(f, "video"),
            FootageKind::Photo => write!(f, "photo"),
            FootageKind::Intro => write!(f, "intro"),
        }
    }
}

/// A visual asset scheduled on the narration timeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FootageSegment {
    /// Opaque asset reference, resolved by the caller
    pub asset_ref: String,
    /// Kind of media
    pub kind: FootageKind,
    /// Window start in seconds
    pub start: f64,
    /// Window end in seconds
    pub end: f64,
}

impl FootageSegment {
    /// Create a segment; the window must be finite and not reversed
    pub fn new(
        asset_ref: impl Into<String>,
        kind: FootageKind,
        start: f64,
        end: f64,
    ) -> Result<Self, TimelineError> {
        let window = Interval::new(start, end)?;
        Ok(Self {
            asset_ref: asset_ref.into(),
            kind,
            start: window.start,
            end: window.end,
        })
    }

    /// Length of the window in seconds
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Time window of the segment
    pub fn window(&self) -> Interval {
        Interval {
            start: self.start,
            end: self.end,
        }
    }
}

/// Output of a scheduling strategy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    /// Opening window before the first asset segment, if the strategy has one
    pub intro: Option<Interval>,
    /// Asset-backed segments in schedule order
    pub segments: Vec<FootageSegment>,
    /// End of the narration (end of the last word)
    pub script_end: f64,
}

impl Schedule {
    /// Flatten into a single segment list.
    ///
    /// A non-empty intro becomes a leading `Intro` segment backed by
    /// `intro_asset`; an intro without an asset fails with `MissingAsset`.
    pub fn into_timeline(self, intro_asset: Option<&str>) -> Result<Vec<FootageSegment>, TimelineError> {
        let mut timeline = Vec::with_capacity(self.segments.len() + 1);

        if let Some(intro) = self.intro.filter(|i| !i.is_empty()) {
            let asset = intro_asset.ok_or_else(|| {
                TimelineError::MissingAsset("intro requires a background video".to_string())
            })?;
            timeline.push(FootageSegment::new(asset, FootageKind::Intro, intro.start, intro.end)?);
        }

        timeline.extend(self.segments);
        Ok(timeline)
    }
}

/// A strategy that places footage on the compacted narration timeline
pub trait FootageScheduler: Send + Sync {
    /// Short strategy name for logs
    fn name(&self) -> &'static str;

    /// Schedule footage for `script` spoken as `words`.
    ///
    /// `assets` is the ordered asset list for strategies that take their
    /// assets from the caller; strategies that read asset names from the
    /// script ignore it.
    fn schedule(&self, script: &str, words: &[Word], assets: &[String]) -> Result<Schedule, TimelineError>;
}

/// End of the narration: end of the last word, or 0 without words
pub fn script_end(words: &[Word]) -> f64 {
    words.last().map_or(0.0, |w| w.end)
}

/// Build the scheduler selected in the configuration
pub fn scheduler_for(config: &FootageConfig) -> Box<dyn FootageScheduler> {
    match config.strategy {
        ScheduleStrategy::Marker => Box::new(MarkerScheduler::new(
            config.marker_token.clone(),
            config.marker_count,
        )),
        ScheduleStrategy::Tag => Box::new(TagScheduler::new(config.photo_length)),
    }
}
