// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use std::collections::VecDeque;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::WalkDir;

use reeltime::app_config::{self, Config, ScheduleStrategy};
use reeltime::errors::JobError;
use reeltime::jobs::{JobHandle, JobRequest, TimelinePipeline, WorkerPool};
use reeltime::render::{AssetResolver, DirectoryResolver, PassthroughResolver, PlanWriter};

const JOB_FILE_SUFFIX: &str = ".job.json";
const PLAN_FILE_SUFFIX: &str = ".plan.json";

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

/// CLI Wrapper for ScheduleStrategy to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliStrategy {
    Marker,
    Tag,
}

impl From<CliStrategy> for ScheduleStrategy {
    fn from(cli_strategy: CliStrategy) -> Self {
        match cli_strategy {
            CliStrategy::Marker => ScheduleStrategy::Marker,
            CliStrategy::Tag => ScheduleStrategy::Tag,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Build render plans for job files
    Plan(PlanArgs),

    /// Generate shell completions for reeltime
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct PlanArgs {
    /// Job file (*.job.json) or directory of job files
    #[arg(value_name = "JOB_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing plan files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Footage scheduling strategy
    #[arg(short, long, value_enum)]
    strategy: Option<CliStrategy>,

    /// Directory asset references are resolved against
    #[arg(short, long)]
    assets_dir: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// reeltime - narration-driven video timelines
///
/// Turns a narrated script and its speech alignment into a render plan:
/// pauses removed, subtitles grouped and footage scheduled.
#[derive(Parser, Debug)]
#[command(name = "reeltime")]
#[command(version = "0.1.0")]
#[command(about = "Plan short-form videos from narrated scripts")]
#[command(long_about = "reeltime reads job files (script, speech alignment and assets) and writes a render plan next to each one.

EXAMPLES:
    reeltime plan top5.job.json                  # Plan a single job
    reeltime plan -s tag story.job.json          # Use inline script tags
    reeltime plan -a ./media jobs/               # Plan every job in a folder, checking assets
    reeltime completions bash > reeltime.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color for log level
    fn color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "1;31",
            Level::Warn => "1;33",
            Level::Info => "1;32",
            Level::Debug => "1;36",
            Level::Trace => "1;35",
        }
    }

    // @returns: Emoji for log level
    fn get_emoji_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "❌ ",
            Level::Warn => "🚧 ",
            Level::Info => " ",
            Level::Debug => "🔍 ",
            Level::Trace => "📋 ",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let level = record.level();

            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "\x1B[{}m{} {} {}\x1B[0m",
                Self::color_for_level(level),
                now,
                Self::get_emoji_for_level(level),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Trace is the ceiling; the effective level is set once options are known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "reeltime", &mut std::io::stdout());
            Ok(())
        }
        Commands::Plan(args) => run_plan(args).await,
    }
}

async fn run_plan(options: PlanArgs) -> Result<()> {
    let mut config = Config::load_or_create(&options.config_path)?;

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
    if let Some(strategy) = &options.strategy {
        config.footage.strategy = strategy.clone().into();
    }

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let jobs = collect_job_files(&options.input_path)?;
    if jobs.is_empty() {
        warn!("No job files found in {:?}", options.input_path);
        return Ok(());
    }

    let resolver: Arc<dyn AssetResolver> = match &options.assets_dir {
        Some(dir) => Arc::new(DirectoryResolver::new(dir.clone())),
        None => Arc::new(PassthroughResolver),
    };
    let pipeline = Arc::new(TimelinePipeline::new(&config, resolver));
    let pool = WorkerPool::new(pipeline, Arc::new(PlanWriter), &config.workers);

    info!(
        "Planning {} job(s) with the {} strategy",
        jobs.len(),
        config.footage.strategy
    );

    let progress = ProgressBar::new(jobs.len() as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map_err(|e| anyhow!("Invalid progress template: {}", e))?
            .progress_chars("#>-"),
    );

    let mut pending: VecDeque<(PathBuf, JobHandle)> = VecDeque::new();
    let mut results = Vec::with_capacity(jobs.len());
    for job_path in &jobs {
        let plan_path = plan_path_for(job_path);
        if plan_path.exists() && !options.force_overwrite {
            warn!("Plan already exists: {:?}. Use -f to force overwrite.", plan_path);
            progress.inc(1);
            continue;
        }

        let request = match JobRequest::from_file(job_path) {
            Ok(request) => request,
            Err(e) => {
                error!("{:#}", e);
                progress.inc(1);
                continue;
            }
        };

        loop {
            match pool.submit(request.clone(), Some(plan_path.clone())) {
                Ok(handle) => {
                    pending.push_back((job_path.clone(), handle));
                    break;
                }
                // Queue is full: wait for the oldest job before retrying
                Err(JobError::QueueFull { .. }) if !pending.is_empty() => {
                    if let Some((path, handle)) = pending.pop_front() {
                        results.push((path, handle.wait().await));
                        progress.inc(1);
                    }
                }
                Err(e) => {
                    error!("Could not queue {:?}: {}", job_path, e);
                    progress.inc(1);
                    break;
                }
            }
        }
    }

    let remaining = join_all(pending.into_iter().map(|(path, handle)| {
        let progress = progress.clone();
        async move {
            let result = handle.wait().await;
            progress.inc(1);
            (path, result)
        }
    }))
    .await;
    results.extend(remaining);

    progress.finish_with_message("done");

    let mut failures = 0;
    for (path, result) in results {
        match result {
            Ok(report) => info!(
                "Success: {:?} ({} segments, {} cues)",
                report.rendered.unwrap_or(path),
                report.output.timeline.len(),
                report.output.cues.len()
            ),
            Err(e) => {
                failures += 1;
                error!("Failed {:?}: {}", path, e);
            }
        }
    }

    if failures > 0 {
        return Err(anyhow!("{} job(s) failed", failures));
    }

    Ok(())
}

// Single job file, or every *.job.json below a directory
fn collect_job_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    if input_path.is_file() {
        return Ok(vec![input_path.to_path_buf()]);
    }
    if !input_path.is_dir() {
        return Err(anyhow!("Input path does not exist: {:?}", input_path));
    }

    let mut jobs: Vec<PathBuf> = WalkDir::new(input_path)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| p.to_string_lossy().ends_with(JOB_FILE_SUFFIX))
        .collect();
    jobs.sort();

    Ok(jobs)
}

// foo.job.json -> foo.plan.json, anything else -> <stem>.plan.json
fn plan_path_for(job_path: &Path) -> PathBuf {
    let file_name = job_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let stem = file_name
        .strip_suffix(JOB_FILE_SUFFIX)
        .map(str::to_string)
        .or_else(|| job_path.file_stem().map(|s| s.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "job".to_string());

    job_path.with_file_name(format!("{}{}", stem, PLAN_FILE_SUFFIX))
}
