/*!
 * Validation of assembled footage timelines.
 *
 * A scheduled timeline must cover the narration exactly: it starts at zero,
 * ends at the script end, and every segment ends where the next one begins.
 * Passing these checks produces a `ValidatedTimeline`, the only form of
 * timeline the render plan builder accepts.
 *
 * # Architecture
 *
 * - `timeline`: coverage checks and the validated timeline type
 */

pub mod timeline;

// Re-export main types
pub use timeline::{TimelineValidator, ValidatedTimeline};
