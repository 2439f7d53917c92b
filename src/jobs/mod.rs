/*!
 * Job execution.
 *
 * A job is one video: a script, its narration alignment and its assets.
 *
 * # Architecture
 *
 * - `pipeline`: the sequential stages of a single job
 * - `pool`: bounded concurrent execution with cancellation and timeouts
 * - `registry`: per-job log channels
 */

pub mod pipeline;
pub mod pool;
pub mod registry;

// Re-export main types
pub use pipeline::{JobRequest, PipelineOutput, TimelinePipeline};
pub use pool::{JobHandle, JobReport, WorkerPool};
pub use registry::{JobEvent, JobLog, JobLogRegistry};
