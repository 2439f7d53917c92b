/*!
 * Timeline pipeline for a single job.
 *
 * Stages run strictly in sequence and the first failure ends the job:
 * 1. import the character alignment and group it into words
 * 2. detect pauses and compact the word timeline
 * 3. group words into subtitle sentences and cues
 * 4. schedule footage with the configured strategy
 * 5. assemble and validate the timeline
 * 6. resolve asset references
 * 7. build the render plan
 */

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::errors::{JobError, TimelineError};
use crate::footage::{FootageScheduler, scheduler_for};
use crate::render::{AssetResolver, BackgroundVideo, GlobalAssets, RenderPlan, RenderPlanBuilder, Styling};
use crate::timeline::{
    AlignmentPayload, Interval, Pause, PauseDetector, SubtitleCue, Word, cues_from_sentences,
    group_chars_into_words, group_words_into_sentences, keep_intervals, to_srt,
};
use crate::validation::{TimelineValidator, ValidatedTimeline};

use super::registry::JobLog;

/// Everything needed to plan one video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Optional display name
    #[serde(default)]
    pub name: Option<String>,
    /// Script text, with inline tags for the tag strategy
    pub script: String,
    /// Character alignment of the narration
    pub alignment: AlignmentPayload,
    /// Ordered footage assets for the marker strategy
    #[serde(default)]
    pub footage_assets: Vec<String>,
    /// Background video, music and effect
    #[serde(default)]
    pub globals: GlobalAssets,
}

impl JobRequest {
    /// Read a job description from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .context(format!("Failed to read job file: {}", path.display()))?;
        let request = serde_json::from_str(&contents)
            .context(format!("Failed to parse job file: {}", path.display()))?;
        Ok(request)
    }
}

/// Result of a successful pipeline run
#[derive(Debug, Clone)]
pub struct PipelineOutput {
    /// Words on the compacted timeline
    pub words: Vec<Word>,
    /// Removed pauses, in original narration coordinates
    pub pauses: Vec<Pause>,
    /// Parts of the original narration audio to keep
    pub keep_intervals: Vec<Interval>,
    /// Subtitle cues on the compacted timeline
    pub cues: Vec<SubtitleCue>,
    /// Validated footage timeline with resolved assets
    pub timeline: ValidatedTimeline,
    /// Render plan
    pub plan: RenderPlan,
    /// Styling handed to the renderer
    pub styling: Styling,
}

impl PipelineOutput {
    /// Subtitle cues as an SRT document
    pub fn srt(&self) -> String {
        to_srt(&self.cues)
    }
}

/// Runs the stages of a job with one configuration
pub struct TimelinePipeline {
    config: Config,
    scheduler: Box<dyn FootageScheduler>,
    resolver: Arc<dyn AssetResolver>,
    validator: TimelineValidator,
    builder: RenderPlanBuilder,
}

impl TimelinePipeline {
    pub fn new(config: &Config, resolver: Arc<dyn AssetResolver>) -> Self {
        Self {
            config: config.clone(),
            scheduler: scheduler_for(&config.footage),
            resolver,
            validator: TimelineValidator::default(),
            builder: RenderPlanBuilder::new(Styling::from(&config.render)),
        }
    }

    /// Configuration the pipeline was built with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run every stage for `request`, reporting progress through `log`
    pub fn run(&self, request: &JobRequest, log: &JobLog) -> Result<PipelineOutput, JobError> {
        request.globals.validate()?;

        let characters = request.alignment.import()?;
        let original_words = group_chars_into_words(&characters);
        if original_words.is_empty() {
            return Err(TimelineError::EmptyTimeline.into());
        }
        log.debug(format!(
            "Imported {} characters into {} words",
            characters.len(),
            original_words.len()
        ));

        let timeline_config = &self.config.timeline;
        let detection = PauseDetector::new(timeline_config.gap_threshold, timeline_config.pad)
            .run(&original_words);
        let narration_end = original_words.last().map_or(0.0, |w| w.end);
        let keep = keep_intervals(&detection.pauses, narration_end)?;
        log.info(format!(
            "Removed {} pauses ({:.2}s of silence)",
            detection.pauses.len(),
            detection.removed_duration()
        ));

        let sentences = group_words_into_sentences(&detection.words, timeline_config.max_words_per_sentence);
        let cues = cues_from_sentences(&sentences);

        let schedule = self
            .scheduler
            .schedule(&request.script, &detection.words, &request.footage_assets)?;
        let script_end = schedule.script_end;
        log.info(format!(
            "Scheduled {} footage segments with the {} strategy",
            schedule.segments.len(),
            self.scheduler.name()
        ));

        let intro_asset = request.globals.background_video.as_ref().map(|b| b.asset.as_str());
        let segments = schedule.into_timeline(intro_asset)?;
        let timeline = self.validator.validate(segments, script_end)?;

        let resolver = &self.resolver;
        let timeline = timeline.map_assets(|asset| resolver.resolve(asset))?;
        let globals = self.resolve_globals(&request.globals)?;

        let plan = self.builder.build(&timeline, &globals)?;
        log.info(format!(
            "Render plan ready: {} operations, {:.2}s",
            plan.operations().len(),
            plan.duration()
        ));

        Ok(PipelineOutput {
            words: detection.words,
            pauses: detection.pauses,
            keep_intervals: keep,
            cues,
            timeline,
            styling: plan.styling().clone(),
            plan,
        })
    }

    fn resolve_globals(&self, globals: &GlobalAssets) -> Result<GlobalAssets, JobError> {
        let resolve = |asset: &Option<String>| -> Result<Option<String>, JobError> {
            asset
                .as_deref()
                .map(|a| self.resolver.resolve(a))
                .transpose()
                .map_err(JobError::from)
        };

        let background_video = match &globals.background_video {
            Some(background) => Some(BackgroundVideo {
                asset: self.resolver.resolve(&background.asset)?,
                duration: background.duration,
            }),
            None => None,
        };

        Ok(GlobalAssets {
            background_video,
            music: resolve(&globals.music)?,
            effect: resolve(&globals.effect)?,
        })
    }
}

impl std::fmt::Debug for TimelinePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimelinePipeline")
            .field("strategy", &self.scheduler.name())
            .field("resolver", &self.resolver)
            .finish()
    }
}
