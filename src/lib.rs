/*!
 * # reeltime - narration-driven video timelines
 *
 * A Rust library that turns a narrated script into a render plan for a
 * short-form video.
 *
 * ## Features
 *
 * - Import character-level speech alignment and group it into words
 * - Remove long pauses from the narration and report what to cut
 * - Group words into short subtitle sentences with word highlights
 * - Schedule footage with either strategy:
 *   - sentinel markers (fixed number of segments plus an intro)
 *   - inline script tags (video and photo)
 * - Validate that footage covers the narration without gaps
 * - Build a deterministic render plan for an external renderer
 * - Run many jobs concurrently with a bounded worker pool
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `timeline`: Alignment import, words, sentences, pauses and subtitles
 * - `footage`: Footage segments and scheduling strategies
 * - `validation`: Timeline coverage validation
 * - `render`: Render plan types, builder and collaborator traits
 * - `jobs`: Job pipeline, worker pool and per-job log channels
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod timeline;
pub mod footage;
pub mod validation;
pub mod render;
pub mod jobs;

// Re-export main types for easier usage
pub use app_config::{Config, ScheduleStrategy};
pub use errors::{AppError, GapLocation, JobError, RenderError, TimelineError};
pub use footage::{FootageKind, FootageScheduler, FootageSegment, Schedule, scheduler_for};
pub use jobs::{JobHandle, JobLogRegistry, JobReport, JobRequest, PipelineOutput, TimelinePipeline, WorkerPool};
pub use render::{GlobalAssets, RenderOperation, RenderPlan, RenderPlanBuilder, Renderer};
pub use timeline::{Pause, Word, detect_pauses, group_chars_into_words, group_words_into_sentences, keep_intervals};
pub use validation::{TimelineValidator, ValidatedTimeline};
