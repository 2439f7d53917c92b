/*!
 * Error types for the reeltime library.
 *
 * Every stage of the timeline pipeline fails fast with a typed error; there is
 * no degraded or partially scheduled output. The variants here mirror the
 * failure kinds a caller has to distinguish:
 * - `TimelineError`: alignment import, scheduling and validation failures
 * - `RenderError`: failures surfaced by the renderer or asset collaborators
 * - `JobError`: failures of a whole job run inside the worker pool
 * - `AppError`: top-level wrapper used by the binary
 */

use thiserror::Error;

/// Where a timeline coverage check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GapLocation {
    /// The first segment does not start at zero
    Start,
    /// The last segment does not end at the script end
    End,
    /// Segment `i` does not end where segment `i + 1` starts
    Between(usize),
}

impl std::fmt::Display for GapLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GapLocation::Start => write!(f, "start"),
            GapLocation::End => write!(f, "end"),
            GapLocation::Between(index) => write!(f, "segment {}", index),
        }
    }
}

/// Errors raised while building or checking a timeline
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TimelineError {
    /// Alignment arrays have different lengths or carry inconsistent timestamps
    #[error("Alignment mismatch: {0}")]
    AlignmentMismatch(String),

    /// The marker strategy found the wrong number of sentinel words
    #[error("Expected exactly {expected} occurrences of '{token}', found {found}")]
    InvalidMarkerCount {
        /// Sentinel token that was searched for
        token: String,
        /// Required number of sentinels
        expected: usize,
        /// Number actually present in the word stream
        found: usize,
    },

    /// The marker strategy was given the wrong number of assets
    #[error("Expected {expected} footage assets, got {found}")]
    AssetCountMismatch {
        /// Required number of assets
        expected: usize,
        /// Number of assets supplied
        found: usize,
    },

    /// There is nothing to schedule or validate
    #[error("Timeline is empty")]
    EmptyTimeline,

    /// Coverage of `[0, script_end]` is broken
    #[error("Timeline gap at {at}: expected {expected:.6}, found {found:.6}")]
    TimelineGap {
        /// Location of the failed check
        at: GapLocation,
        /// Timestamp the invariant required
        expected: f64,
        /// Timestamp actually present
        found: f64,
    },

    /// A segment or pause was constructed with an invalid range
    #[error("Invalid interval [{start}, {end}]: {reason}")]
    InvalidInterval {
        /// Interval start in seconds
        start: f64,
        /// Interval end in seconds
        end: f64,
        /// Which rule was violated
        reason: String,
    },

    /// Removing every pause would leave no media
    #[error("No intervals to keep: the trimmed media would be empty")]
    NothingToKeep,

    /// An asset reference used by the timeline does not resolve
    #[error("Missing asset: {0}")]
    MissingAsset(String),

    /// A global asset has the wrong media type
    #[error("Invalid asset: {0}")]
    InvalidAsset(String),

    /// A styling value the renderer needs is absent or unusable
    #[error("Missing styling: {0}")]
    MissingStyling(String),

    /// The script holds a footage tag that is nested, unbalanced or unterminated
    #[error("Malformed footage tag: {0}")]
    MalformedTag(String),
}

/// Errors surfaced by external collaborators (renderer, asset store)
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer rejected or failed to execute the plan
    #[error("Renderer failed: {0}")]
    RendererFailed(String),

    /// An asset could not be resolved by the collaborator
    #[error("Missing asset: {0}")]
    MissingAsset(String),

    /// Writing the plan or its outputs failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors for a job running in the worker pool
#[derive(Error, Debug)]
pub enum JobError {
    /// A pipeline stage failed
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// The renderer collaborator failed
    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    /// The job was cancelled through its handle
    #[error("Job {0} was cancelled")]
    Cancelled(String),

    /// The job exceeded its time budget
    #[error("Job {job_id} timed out after {timeout_secs}s")]
    TimedOut {
        /// Identifier of the job
        job_id: String,
        /// Budget that was exceeded
        timeout_secs: u64,
    },

    /// The pool queue is full
    #[error("Worker pool queue is full ({capacity} jobs pending)")]
    QueueFull {
        /// Maximum number of queued jobs
        capacity: usize,
    },

    /// The worker task ended without reporting a result
    #[error("Worker for job {0} stopped unexpectedly")]
    WorkerLost(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from the timeline pipeline
    #[error("Timeline error: {0}")]
    Timeline(#[from] TimelineError),

    /// Error from a job run
    #[error("Job error: {0}")]
    Job(#[from] JobError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
