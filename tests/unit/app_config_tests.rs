/*!
 * Tests for application configuration functionality
 */

use reeltime::app_config::{Config, LogLevel, ScheduleStrategy};

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.timeline.gap_threshold, 0.4);
    assert_eq!(config.timeline.pad, 0.075);
    assert_eq!(config.timeline.max_words_per_sentence, 3);
    assert_eq!(config.footage.strategy, ScheduleStrategy::Marker);
    assert_eq!(config.footage.photo_length, 1.0);
    assert_eq!(config.render.effect_opacity, 0.2);
    assert_eq!(config.render.subtitle_color, "white");
    assert_eq!(config.render.highlight_color, "#7710e2");
    assert_eq!(config.log_level, LogLevel::Info);
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.timeline.gap_threshold = 0.0;
    assert!(config.validate().is_err());
    config.timeline.gap_threshold = 0.4;

    config.timeline.max_words_per_sentence = 0;
    assert!(config.validate().is_err());
    config.timeline.max_words_per_sentence = 3;

    config.footage.photo_length = -1.0;
    assert!(config.validate().is_err());
    config.footage.photo_length = 1.0;

    config.render.subtitle_color = String::new();
    assert!(config.validate().is_err());
    config.render.subtitle_color = "white".to_string();

    config.workers.max_concurrent_jobs = 0;
    assert!(config.validate().is_err());
    config.workers.max_concurrent_jobs = 2;

    // Empty marker token only matters for the marker strategy
    config.footage.marker_token = String::new();
    assert!(config.validate().is_err());
    config.footage.strategy = ScheduleStrategy::Tag;
    assert!(config.validate().is_ok());
}

#[test]
fn test_loadOrCreate_withMissingFile_shouldWriteDefaults() {
    let dir = common::create_temp_dir().unwrap();
    let path = dir.path().join("conf.json");

    let config = Config::load_or_create(&path).unwrap();

    assert!(path.exists());
    assert_eq!(config, Config::default());
    let reloaded = Config::load_or_create(&path).unwrap();
    assert_eq!(reloaded, config);
}

#[test]
fn test_loadOrCreate_withExistingFile_shouldReadIt() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        dir.path(),
        "conf.json",
        r#"{"footage": {"strategy": "tag", "photo_length": 2.5}, "workers": {"max_concurrent_jobs": 8}}"#,
    )
    .unwrap();

    let config = Config::load_or_create(&path).unwrap();

    assert_eq!(config.footage.strategy, ScheduleStrategy::Tag);
    assert_eq!(config.footage.photo_length, 2.5);
    assert_eq!(config.workers.max_concurrent_jobs, 8);
    assert_eq!(config.workers.queue_capacity, 16);
}

#[test]
fn test_loadOrCreate_withInvalidJson_shouldFailWithContext() {
    let dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(dir.path(), "conf.json", "{ not json").unwrap();

    let error = Config::load_or_create(&path).unwrap_err();

    assert!(format!("{:#}", error).contains("Failed to parse config file"));
}

#[test]
fn test_config_serialization_shouldRoundTripThroughJson() {
    let mut config = Config::default();
    config.render.volume_db = -18.0;
    config.log_level = LogLevel::Debug;

    let json = serde_json::to_string_pretty(&config).unwrap();
    let parsed: Config = serde_json::from_str(&json).unwrap();

    assert_eq!(parsed, config);
}
