/*!
 * Bounded worker pool for pipeline jobs.
 *
 * Each submitted job runs in its own tokio task. A semaphore caps how many
 * jobs run at once; jobs beyond that wait in a bounded queue, and a job that
 * would overflow the queue is rejected with `QueueFull`. Every job has a
 * time budget and can be cancelled through its handle.
 */

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use log::{debug, warn};
use tokio::sync::{Semaphore, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::app_config::WorkerConfig;
use crate::errors::JobError;
use crate::render::Renderer;

use super::pipeline::{JobRequest, PipelineOutput, TimelinePipeline};
use super::registry::{JobLog, JobLogRegistry};

/// Outcome of a finished job
#[derive(Debug, Clone)]
pub struct JobReport {
    /// Job identifier
    pub job_id: String,
    /// Pipeline results
    pub output: PipelineOutput,
    /// File produced by the renderer, if an output path was given
    pub rendered: Option<PathBuf>,
    /// Wall time from start of execution to completion
    pub elapsed: Duration,
}

/// Handle to a submitted job
#[derive(Debug)]
pub struct JobHandle {
    job_id: String,
    cancel: Option<oneshot::Sender<()>>,
    task: JoinHandle<Result<JobReport, JobError>>,
}

impl JobHandle {
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Ask the job to stop; returns false if it already finished or was cancelled
    pub fn cancel(&mut self) -> bool {
        match self.cancel.take() {
            Some(sender) => sender.send(()).is_ok(),
            None => false,
        }
    }

    /// Wait for the job to finish
    pub async fn wait(self) -> Result<JobReport, JobError> {
        let JobHandle { job_id, cancel, task } = self;
        let result = task.await.map_err(|_| JobError::WorkerLost(job_id))?;
        drop(cancel);
        result
    }
}

/// Shared state moved into each job task
#[derive(Clone)]
struct JobContext {
    pipeline: Arc<TimelinePipeline>,
    renderer: Arc<dyn Renderer>,
    permits: Arc<Semaphore>,
    timeout: Duration,
}

/// Releases a job's queue slot when the task ends, including by panic
struct InFlightSlot(Arc<AtomicUsize>);

impl Drop for InFlightSlot {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Runs pipeline jobs with bounded concurrency
pub struct WorkerPool {
    context: JobContext,
    registry: JobLogRegistry,
    in_flight: Arc<AtomicUsize>,
    max_concurrent: usize,
    queue_capacity: usize,
}

impl WorkerPool {
    pub fn new(pipeline: Arc<TimelinePipeline>, renderer: Arc<dyn Renderer>, config: &WorkerConfig) -> Self {
        let max_concurrent = config.max_concurrent_jobs.max(1);
        Self {
            context: JobContext {
                pipeline,
                renderer,
                permits: Arc::new(Semaphore::new(max_concurrent)),
                timeout: Duration::from_secs(config.job_timeout_secs),
            },
            registry: JobLogRegistry::new(),
            in_flight: Arc::new(AtomicUsize::new(0)),
            max_concurrent,
            queue_capacity: config.queue_capacity,
        }
    }

    /// Override the per-job time budget
    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.context.timeout = timeout;
        self
    }

    /// Registry of the per-job log channels
    pub fn registry(&self) -> &JobLogRegistry {
        &self.registry
    }

    /// Jobs submitted and not yet finished, running or queued
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Submit a job; `output` is where the renderer writes its result
    pub fn submit(&self, request: JobRequest, output: Option<PathBuf>) -> Result<JobHandle, JobError> {
        let limit = self.max_concurrent + self.queue_capacity;
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| (n < limit).then_some(n + 1))
            .map_err(|_| JobError::QueueFull {
                capacity: self.queue_capacity,
            })?;

        let job_id = Uuid::new_v4().to_string();
        let log = self.registry.open(&job_id);
        let (cancel_tx, mut cancel_rx) = oneshot::channel::<()>();
        let context = self.context.clone();
        let slot = InFlightSlot(Arc::clone(&self.in_flight));
        let id = job_id.clone();

        debug!("Job {} queued ({} in flight)", job_id, self.in_flight());

        let task = tokio::spawn(async move {
            let _slot = slot;
            let result = tokio::select! {
                result = run_job(&context, &id, request, output, &log) => result,
                Ok(()) = &mut cancel_rx => Err(JobError::Cancelled(id.clone())),
            };

            match &result {
                Ok(report) => log.info(format!("Job finished in {:.2?}", report.elapsed)),
                Err(JobError::Cancelled(_)) => log.warn("Job cancelled"),
                Err(e) => log.error(format!("Job failed: {}", e)),
            }

            drop(log);
            result
        });

        Ok(JobHandle {
            job_id,
            cancel: Some(cancel_tx),
            task,
        })
    }
}

impl std::fmt::Debug for WorkerPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerPool")
            .field("max_concurrent", &self.max_concurrent)
            .field("queue_capacity", &self.queue_capacity)
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

async fn run_job(
    context: &JobContext,
    job_id: &str,
    request: JobRequest,
    output: Option<PathBuf>,
    log: &JobLog,
) -> Result<JobReport, JobError> {
    let _permit = context
        .permits
        .acquire()
        .await
        .map_err(|_| JobError::WorkerLost(job_id.to_string()))?;

    log.info(format!(
        "Job started{}",
        request.name.as_deref().map(|n| format!(": {}", n)).unwrap_or_default()
    ));
    let started = Instant::now();

    let work = async {
        let output_plan = context.pipeline.run(&request, log)?;
        let rendered = match &output {
            Some(path) => Some(context.renderer.render(&output_plan.plan, path).await?),
            None => None,
        };
        Ok::<_, JobError>((output_plan, rendered))
    };

    match tokio::time::timeout(context.timeout, work).await {
        Ok(result) => {
            let (output, rendered) = result?;
            Ok(JobReport {
                job_id: job_id.to_string(),
                output,
                rendered,
                elapsed: started.elapsed(),
            })
        }
        Err(_) => {
            warn!("Job {} exceeded its {}s budget", job_id, context.timeout.as_secs());
            Err(JobError::TimedOut {
                job_id: job_id.to_string(),
                timeout_secs: context.timeout.as_secs(),
            })
        }
    }
}
