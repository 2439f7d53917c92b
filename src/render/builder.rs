/*!
 * Render plan construction.
 *
 * The plan follows a fixed sequence:
 * - `Loop` the background when it is shorter than the narration
 * - one `Trim` per segment, in timeline order (intro segments trim the background)
 * - one `Concat` of the trimmed segments
 * - with a background: trim it to the narration length and show the
 *   concatenated footage over it with one `OverlayWindow` per asset segment
 * - `MixAudio` for background music
 * - `BlendEffect` for the effect overlay
 *
 * The same inputs always produce the same plan.
 */

use log::debug;

use crate::errors::TimelineError;
use crate::footage::FootageKind;
use crate::timeline::TIME_EPSILON;
use crate::validation::ValidatedTimeline;

use super::plan::{GlobalAssets, RenderOperation, RenderPlan, Styling};

const TIMELINE_LABEL: &str = "timeline";
const BACKGROUND_LABEL: &str = "background";
const BACKGROUND_LOOP_LABEL: &str = "background_loop";
const MIXED_LABEL: &str = "mixed";
const FINAL_LABEL: &str = "final";

/// Builds render plans from validated timelines
#[derive(Debug, Clone)]
pub struct RenderPlanBuilder {
    styling: Styling,
}

impl RenderPlanBuilder {
    pub fn new(styling: Styling) -> Self {
        Self { styling }
    }

    /// Build the plan for `timeline` with the job's global assets
    pub fn build(&self, timeline: &ValidatedTimeline, globals: &GlobalAssets) -> Result<RenderPlan, TimelineError> {
        globals.validate()?;
        self.styling.validate()?;

        let segments = timeline.segments();
        let script_end = timeline.script_end();
        let mut operations = Vec::with_capacity(segments.len() * 2 + 4);

        // Stream every background use reads from, looped if too short
        let background_source = match &globals.background_video {
            Some(background) => match background.duration {
                Some(duration) if duration + TIME_EPSILON < script_end => {
                    let loops = (script_end / duration).ceil();
                    let count = u32::try_from(loops as u64).map_err(|_| {
                        TimelineError::InvalidAsset(format!(
                            "background video of {}s would need {} loops to cover {:.3}s",
                            duration, loops, script_end
                        ))
                    })?;
                    operations.push(RenderOperation::Loop {
                        input: background.asset.clone(),
                        count,
                        output: BACKGROUND_LOOP_LABEL.to_string(),
                    });
                    Some(BACKGROUND_LOOP_LABEL.to_string())
                }
                _ => Some(background.asset.clone()),
            },
            None => None,
        };

        let mut trimmed = Vec::with_capacity(segments.len());
        for (index, segment) in segments.iter().enumerate() {
            let input = match (segment.kind, &background_source) {
                (FootageKind::Intro, Some(source)) => source.clone(),
                (FootageKind::Intro, None) => {
                    return Err(TimelineError::MissingAsset(
                        "intro requires a background video".to_string(),
                    ));
                }
                _ => segment.asset_ref.clone(),
            };

            let output = format!("segment_{:02}", index);
            operations.push(RenderOperation::Trim {
                input,
                kind: segment.kind,
                duration: segment.duration(),
                output: output.clone(),
            });
            trimmed.push(output);
        }

        operations.push(RenderOperation::Concat {
            inputs: trimmed,
            output: TIMELINE_LABEL.to_string(),
        });
        let mut current = TIMELINE_LABEL.to_string();

        if let Some(source) = &background_source {
            operations.push(RenderOperation::Trim {
                input: source.clone(),
                kind: FootageKind::Video,
                duration: script_end,
                output: BACKGROUND_LABEL.to_string(),
            });
            current = BACKGROUND_LABEL.to_string();

            for (index, segment) in segments.iter().enumerate() {
                if segment.kind == FootageKind::Intro {
                    continue;
                }
                let output = format!("overlay_{:02}", index);
                operations.push(RenderOperation::OverlayWindow {
                    base: current,
                    overlay: TIMELINE_LABEL.to_string(),
                    start: segment.start,
                    end: segment.end,
                    output: output.clone(),
                });
                current = output;
            }
        }

        if let Some(music) = &globals.music {
            operations.push(RenderOperation::MixAudio {
                base: current,
                music: music.clone(),
                gain_db: self.styling.volume_db,
                output: MIXED_LABEL.to_string(),
            });
            current = MIXED_LABEL.to_string();
        }

        if let Some(effect) = &globals.effect {
            operations.push(RenderOperation::BlendEffect {
                base: current,
                effect: effect.clone(),
                mode: self.styling.blend_mode.clone(),
                opacity: self.styling.effect_opacity,
                output: FINAL_LABEL.to_string(),
            });
        }

        debug!(
            "Render plan: {} operations for {} segments over {:.3}s",
            operations.len(),
            segments.len(),
            script_end
        );

        Ok(RenderPlan::new(
            operations,
            segments.to_vec(),
            script_end,
            self.styling.clone(),
        ))
    }
}

impl Default for RenderPlanBuilder {
    fn default() -> Self {
        Self::new(Styling::default())
    }
}
