use anyhow::{Context, Result, anyhow};
use log::warn;
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Pause detection and subtitle grouping
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Footage scheduling strategy
    #[serde(default)]
    pub footage: FootageConfig,

    /// Render styling
    #[serde(default)]
    pub render: RenderConfig,

    /// Worker pool sizing
    #[serde(default)]
    pub workers: WorkerConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// How footage is placed on the narration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ScheduleStrategy {
    // @strategy: Fixed number of sentinel words in the narration
    #[default]
    Marker,
    // @strategy: Inline footage tags in the script text
    Tag,
}

impl std::fmt::Display for ScheduleStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Marker => write!(f, "marker"),
            Self::Tag => write!(f, "tag"),
        }
    }
}

// Implement FromStr trait for ScheduleStrategy
impl std::str::FromStr for ScheduleStrategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "marker" => Ok(Self::Marker),
            "tag" => Ok(Self::Tag),
            _ => Err(anyhow!("Invalid schedule strategy: {}", s)),
        }
    }
}

/// Pause detection and sentence grouping settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TimelineConfig {
    /// Minimum silence between two words that counts as a pause, in seconds
    #[serde(default = "default_gap_threshold")]
    pub gap_threshold: f64,

    /// Silence kept on each side of a removed pause, in seconds
    #[serde(default = "default_pad")]
    pub pad: f64,

    /// Maximum words per subtitle sentence
    #[serde(default = "default_max_words_per_sentence")]
    pub max_words_per_sentence: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            gap_threshold: default_gap_threshold(),
            pad: default_pad(),
            max_words_per_sentence: default_max_words_per_sentence(),
        }
    }
}

/// Footage scheduling settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct FootageConfig {
    /// Scheduling strategy
    #[serde(default)]
    pub strategy: ScheduleStrategy,

    /// Sentinel word for the marker strategy
    #[serde(default = "default_marker_token")]
    pub marker_token: String,

    /// Exact number of sentinels (and assets) for the marker strategy
    #[serde(default = "default_marker_count")]
    pub marker_count: usize,

    /// On-screen time of a photo tag, in seconds
    #[serde(default = "default_photo_length")]
    pub photo_length: f64,
}

impl Default for FootageConfig {
    fn default() -> Self {
        Self {
            strategy: ScheduleStrategy::default(),
            marker_token: default_marker_token(),
            marker_count: default_marker_count(),
            photo_length: default_photo_length(),
        }
    }
}

/// Styling handed to the renderer
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RenderConfig {
    /// Blend mode of the effect overlay
    #[serde(default = "default_blend_mode")]
    pub blend_mode: String,

    /// Opacity of the effect overlay (0.0 to 1.0)
    #[serde(default = "default_effect_opacity")]
    pub effect_opacity: f64,

    /// Background music gain in dB
    #[serde(default = "default_volume_db")]
    pub volume_db: f64,

    /// Subtitle text color
    #[serde(default = "default_subtitle_color")]
    pub subtitle_color: String,

    /// Color of the word currently spoken
    #[serde(default = "default_highlight_color")]
    pub highlight_color: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            blend_mode: default_blend_mode(),
            effect_opacity: default_effect_opacity(),
            volume_db: default_volume_db(),
            subtitle_color: default_subtitle_color(),
            highlight_color: default_highlight_color(),
        }
    }
}

/// Worker pool settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct WorkerConfig {
    /// Jobs allowed to run at the same time
    #[serde(default = "default_max_concurrent_jobs")]
    pub max_concurrent_jobs: usize,

    /// Jobs allowed to wait for a free worker
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    /// Time budget of a single job in seconds
    #[serde(default = "default_job_timeout_secs")]
    pub job_timeout_secs: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            max_concurrent_jobs: default_max_concurrent_jobs(),
            queue_capacity: default_queue_capacity(),
            job_timeout_secs: default_job_timeout_secs(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    // @returns: Matching filter for the log facade
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_gap_threshold() -> f64 {
    0.4
}

fn default_pad() -> f64 {
    0.075
}

fn default_max_words_per_sentence() -> usize {
    3
}

fn default_marker_token() -> String {
    "PLACE".to_string()
}

fn default_marker_count() -> usize {
    5
}

fn default_photo_length() -> f64 {
    1.0
}

fn default_blend_mode() -> String {
    "lighten".to_string()
}

fn default_effect_opacity() -> f64 {
    0.2
}

fn default_volume_db() -> f64 {
    -25.0
}

fn default_subtitle_color() -> String {
    "white".to_string()
}

fn default_highlight_color() -> String {
    "#7710e2".to_string()
}

fn default_max_concurrent_jobs() -> usize {
    2
}

fn default_queue_capacity() -> usize {
    16
}

fn default_job_timeout_secs() -> u64 {
    600
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let timeline = &self.timeline;
        if !(timeline.gap_threshold.is_finite() && timeline.gap_threshold > 0.0) {
            return Err(anyhow!("Gap threshold must be positive, got {}", timeline.gap_threshold));
        }
        if !(timeline.pad.is_finite() && timeline.pad >= 0.0) {
            return Err(anyhow!("Pause padding must not be negative, got {}", timeline.pad));
        }
        if timeline.max_words_per_sentence == 0 {
            return Err(anyhow!("Sentences must allow at least one word"));
        }

        let footage = &self.footage;
        if footage.strategy == ScheduleStrategy::Marker {
            if footage.marker_token.trim().is_empty() {
                return Err(anyhow!("Marker token is required for the marker strategy"));
            }
            if footage.marker_count == 0 {
                return Err(anyhow!("Marker count must be at least 1"));
            }
        }
        if !(footage.photo_length.is_finite() && footage.photo_length > 0.0) {
            return Err(anyhow!("Photo length must be positive, got {}", footage.photo_length));
        }

        let render = &self.render;
        if !(0.0..=1.0).contains(&render.effect_opacity) {
            return Err(anyhow!("Effect opacity must be between 0 and 1, got {}", render.effect_opacity));
        }
        if !render.volume_db.is_finite() {
            return Err(anyhow!("Music volume must be a finite dB value"));
        }
        if render.blend_mode.trim().is_empty() {
            return Err(anyhow!("Blend mode is required"));
        }
        if render.subtitle_color.trim().is_empty() || render.highlight_color.trim().is_empty() {
            return Err(anyhow!("Subtitle and highlight colors are required"));
        }

        let workers = &self.workers;
        if workers.max_concurrent_jobs == 0 {
            return Err(anyhow!("At least one concurrent job is required"));
        }
        if workers.job_timeout_secs == 0 {
            return Err(anyhow!("Job timeout must be at least one second"));
        }

        Ok(())
    }

    /// Load the configuration from `path`, or write and return the default
    /// configuration if the file does not exist
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if path.exists() {
            let file = File::open(path)
                .context(format!("Failed to open config file: {}", path.display()))?;

            let reader = BufReader::new(file);
            let config: Config = serde_json::from_reader(reader)
                .context(format!("Failed to parse config file: {}", path.display()))?;

            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());

        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;

        std::fs::write(path, config_json)
            .context(format!("Failed to write default config to file: {}", path.display()))?;

        Ok(config)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            timeline: TimelineConfig::default(),
            footage: FootageConfig::default(),
            render: RenderConfig::default(),
            workers: WorkerConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
