/*!
 * Per-job log channels.
 *
 * Every running job owns one broadcast channel for its progress lines. The
 * job writes through a `JobLog`; any number of readers subscribe by job id.
 * The channel is registered when the job starts and removed when its
 * `JobLog` is dropped, which closes it for every subscriber.
 */

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Local};
use log::Level;
use parking_lot::RwLock;
use tokio::sync::broadcast;

/// Buffered events per job before slow readers start lagging
pub const DEFAULT_CHANNEL_CAPACITY: usize = 256;

/// One progress line published by a job
#[derive(Debug, Clone)]
pub struct JobEvent {
    /// Job that produced the line
    pub job_id: String,
    /// Severity
    pub level: Level,
    /// Message text
    pub message: String,
    /// Wall-clock time of the event
    pub timestamp: DateTime<Local>,
}

type Channels = Arc<RwLock<HashMap<String, broadcast::Sender<JobEvent>>>>;

/// Hands out per-job log channels with an explicit lifecycle
#[derive(Debug, Clone)]
pub struct JobLogRegistry {
    channels: Channels,
    capacity: usize,
}

impl JobLogRegistry {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            channels: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Register a channel for `job_id` and return its writer
    pub fn open(&self, job_id: &str) -> JobLog {
        let (sender, _) = broadcast::channel(self.capacity);
        self.channels.write().insert(job_id.to_string(), sender.clone());

        JobLog {
            job_id: job_id.to_string(),
            sender,
            channels: Some(Arc::clone(&self.channels)),
        }
    }

    /// Subscribe to a live job's log; `None` if the job is unknown or finished
    pub fn subscribe(&self, job_id: &str) -> Option<broadcast::Receiver<JobEvent>> {
        self.channels.read().get(job_id).map(broadcast::Sender::subscribe)
    }

    /// Whether a job currently has an open channel
    pub fn is_open(&self, job_id: &str) -> bool {
        self.channels.read().contains_key(job_id)
    }

    /// Ids of jobs with an open channel
    pub fn active_jobs(&self) -> Vec<String> {
        self.channels.read().keys().cloned().collect()
    }

    /// Number of open channels
    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}

impl Default for JobLogRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Single writer of a job's log channel.
///
/// Every line is also forwarded to the `log` facade. Dropping the writer
/// removes the channel from its registry.
#[derive(Debug)]
pub struct JobLog {
    job_id: String,
    sender: broadcast::Sender<JobEvent>,
    channels: Option<Channels>,
}

impl JobLog {
    /// A writer that is not registered anywhere; lines still reach `log`
    pub fn detached(job_id: &str) -> Self {
        let (sender, _) = broadcast::channel(1);
        Self {
            job_id: job_id.to_string(),
            sender,
            channels: None,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Publish a line at `level`
    pub fn publish(&self, level: Level, message: impl Into<String>) {
        let message = message.into();
        log::log!(level, "[{}] {}", short_id(&self.job_id), message);

        // No subscribers is not an error
        let _ = self.sender.send(JobEvent {
            job_id: self.job_id.clone(),
            level,
            message,
            timestamp: Local::now(),
        });
    }

    pub fn info(&self, message: impl Into<String>) {
        self.publish(Level::Info, message);
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.publish(Level::Debug, message);
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.publish(Level::Warn, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.publish(Level::Error, message);
    }
}

impl Drop for JobLog {
    fn drop(&mut self) {
        if let Some(channels) = self.channels.take() {
            channels.write().remove(&self.job_id);
        }
    }
}

fn short_id(job_id: &str) -> &str {
    job_id.get(..8).unwrap_or(job_id)
}
