/*!
 * Render plan data types.
 *
 * A plan is an ordered list of operations over labelled streams. Each
 * operation names its inputs (asset references or labels produced by earlier
 * operations) and the label of its own output; the last operation's output
 * is the finished video.
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::app_config::RenderConfig;
use crate::errors::TimelineError;
use crate::footage::{FootageKind, FootageSegment};

/// One step of the render plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOperation {
    /// Repeat a clip `count` times back to back
    Loop {
        input: String,
        count: u32,
        output: String,
    },
    /// Cut (or, for a photo, hold) a clip to `duration` seconds from its start
    Trim {
        input: String,
        kind: FootageKind,
        duration: f64,
        output: String,
    },
    /// Join clips end to end in the given order
    Concat {
        inputs: Vec<String>,
        output: String,
    },
    /// Show `overlay` on top of `base` during `[start, end]`
    OverlayWindow {
        base: String,
        overlay: String,
        start: f64,
        end: f64,
        output: String,
    },
    /// Mix background music under the video's audio
    MixAudio {
        base: String,
        music: String,
        gain_db: f64,
        output: String,
    },
    /// Blend a visual effect clip over the whole video
    BlendEffect {
        base: String,
        effect: String,
        mode: String,
        opacity: f64,
        output: String,
    },
}

impl RenderOperation {
    /// Label of the stream this operation produces
    pub fn output(&self) -> &str {
        match self {
            RenderOperation::Loop { output, .. }
            | RenderOperation::Trim { output, .. }
            | RenderOperation::Concat { output, .. }
            | RenderOperation::OverlayWindow { output, .. }
            | RenderOperation::MixAudio { output, .. }
            | RenderOperation::BlendEffect { output, .. } => output,
        }
    }

    /// Short operation name for logs
    pub fn name(&self) -> &'static str {
        match self {
            RenderOperation::Loop { .. } => "loop",
            RenderOperation::Trim { .. } => "trim",
            RenderOperation::Concat { .. } => "concat",
            RenderOperation::OverlayWindow { .. } => "overlay_window",
            RenderOperation::MixAudio { .. } => "mix_audio",
            RenderOperation::BlendEffect { .. } => "blend_effect",
        }
    }
}

/// Persistent background video shown under all segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundVideo {
    /// Asset reference
    pub asset: String,
    /// Clip length in seconds when known; a shorter clip is looped
    #[serde(default)]
    pub duration: Option<f64>,
}

/// Assets that apply to the whole video rather than a single segment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalAssets {
    /// Background video, required when the timeline has an intro
    #[serde(default)]
    pub background_video: Option<BackgroundVideo>,
    /// Background music track
    #[serde(default)]
    pub music: Option<String>,
    /// Visual effect overlay clip
    #[serde(default)]
    pub effect: Option<String>,
}

impl GlobalAssets {
    /// Check the media type of every global asset by extension
    pub fn validate(&self) -> Result<(), TimelineError> {
        if let Some(background) = &self.background_video {
            check_extension("background video", &background.asset, &["mp4"])?;
            if let Some(duration) = background.duration {
                if !(duration.is_finite() && duration > 0.0) {
                    return Err(TimelineError::InvalidAsset(format!(
                        "background video '{}' has invalid duration {}",
                        background.asset, duration
                    )));
                }
            }
        }
        if let Some(music) = &self.music {
            check_extension("music", music, &["mp3", "mp4"])?;
        }
        if let Some(effect) = &self.effect {
            check_extension("effect", effect, &["mp4"])?;
        }
        Ok(())
    }
}

fn check_extension(role: &str, asset: &str, allowed: &[&str]) -> Result<(), TimelineError> {
    let extension = Path::new(asset)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if allowed.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(TimelineError::InvalidAsset(format!(
            "{} '{}' must be one of: {}",
            role,
            asset,
            allowed.join(", ")
        )))
    }
}

/// Styling parameters handed to the renderer with the plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Styling {
    /// Background music gain in dB
    pub volume_db: f64,
    /// Subtitle text color
    pub subtitle_color: String,
    /// Color of the word currently spoken
    pub highlight_color: String,
    /// Effect blend mode
    pub blend_mode: String,
    /// Effect opacity
    pub effect_opacity: f64,
}

impl Styling {
    /// Check that every styling value the renderer needs is present
    pub fn validate(&self) -> Result<(), TimelineError> {
        if !self.volume_db.is_finite() {
            return Err(TimelineError::MissingStyling("music volume adjustment".to_string()));
        }
        if self.subtitle_color.trim().is_empty() {
            return Err(TimelineError::MissingStyling("subtitle color".to_string()));
        }
        if self.highlight_color.trim().is_empty() {
            return Err(TimelineError::MissingStyling("highlight color".to_string()));
        }
        if self.blend_mode.trim().is_empty() {
            return Err(TimelineError::MissingStyling("effect blend mode".to_string()));
        }
        Ok(())
    }
}

impl From<&RenderConfig> for Styling {
    fn from(config: &RenderConfig) -> Self {
        Self {
            volume_db: config.volume_db,
            subtitle_color: config.subtitle_color.clone(),
            highlight_color: config.highlight_color.clone(),
            blend_mode: config.blend_mode.clone(),
            effect_opacity: config.effect_opacity,
        }
    }
}

impl Default for Styling {
    fn default() -> Self {
        Self::from(&RenderConfig::default())
    }
}

/// An immutable, ordered render plan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderPlan {
    operations: Vec<RenderOperation>,
    segments: Vec<FootageSegment>,
    duration: f64,
    styling: Styling,
}

impl RenderPlan {
    pub(crate) fn new(
        operations: Vec<RenderOperation>,
        segments: Vec<FootageSegment>,
        duration: f64,
        styling: Styling,
    ) -> Self {
        Self {
            operations,
            segments,
            duration,
            styling,
        }
    }

    /// Operations in execution order
    pub fn operations(&self) -> &[RenderOperation] {
        &self.operations
    }

    /// Timeline the plan was built from
    pub fn segments(&self) -> &[FootageSegment] {
        &self.segments
    }

    /// Length of the finished video in seconds
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Styling parameters for the renderer
    pub fn styling(&self) -> &Styling {
        &self.styling
    }

    /// Label of the final output stream
    pub fn final_output(&self) -> Option<&str> {
        self.operations.last().map(RenderOperation::output)
    }

    /// Pretty JSON form of the plan
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
