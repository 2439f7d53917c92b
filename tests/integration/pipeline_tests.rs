/*!
 * End-to-end tests of the timeline pipeline
 */

use std::sync::Arc;

use reeltime::app_config::{Config, ScheduleStrategy};
use reeltime::errors::{GapLocation, JobError, RenderError, TimelineError};
use reeltime::footage::FootageKind;
use reeltime::jobs::{JobLog, JobRequest, TimelinePipeline};
use reeltime::render::{DirectoryResolver, GlobalAssets, PassthroughResolver, RenderOperation};

use crate::common;

fn pipeline(config: &Config) -> TimelinePipeline {
    TimelinePipeline::new(config, Arc::new(PassthroughResolver))
}

fn tag_config() -> Config {
    let mut config = Config::default();
    config.footage.strategy = ScheduleStrategy::Tag;
    config
}

fn tag_words() -> Vec<(&'static str, f64, f64)> {
    vec![
        ("Hello", 0.0, 0.5),
        ("world", 0.5, 1.0),
        ("This", 1.0, 1.2),
        ("is", 1.2, 1.4),
        ("a", 1.4, 1.5),
        ("test", 1.5, 2.0),
        ("done", 2.0, 2.5),
    ]
}

fn tag_request(script: &str) -> JobRequest {
    JobRequest {
        name: None,
        script: script.to_string(),
        alignment: common::alignment_from_words(&tag_words()),
        footage_assets: vec![],
        globals: GlobalAssets::default(),
    }
}

#[test]
fn test_run_withMarkerJob_shouldProduceIntroAndFiveSegments() {
    let output = pipeline(&Config::default())
        .run(&common::top5_request(), &JobLog::detached("top5"))
        .unwrap();

    let segments = output.timeline.segments();
    assert_eq!(segments.len(), 6);
    assert_eq!(segments[0].kind, FootageKind::Intro);
    assert_eq!(segments[0].asset_ref, "background.mp4");
    assert!((segments[0].end - 1.35).abs() < 1e-9);
    assert_eq!(segments[1].asset_ref, "place1.mp4");
    assert_eq!(segments[5].asset_ref, "place5.mp4");
    assert!((output.timeline.script_end() - 6.75).abs() < 1e-9);
}

#[test]
fn test_run_withMarkerJob_shouldReportPausesOnOriginalTimeline() {
    let output = pipeline(&Config::default())
        .run(&common::top5_request(), &JobLog::detached("top5"))
        .unwrap();

    assert_eq!(output.pauses.len(), 1);
    assert!((output.pauses[0].start - 1.275).abs() < 1e-9);
    assert!((output.pauses[0].end - 2.125).abs() < 1e-9);

    assert_eq!(output.keep_intervals.len(), 2);
    assert!((output.keep_intervals[0].end - 1.275).abs() < 1e-9);
    assert!((output.keep_intervals[1].start - 2.125).abs() < 1e-9);
    assert!((output.keep_intervals[1].end - 7.6).abs() < 1e-9);
}

#[test]
fn test_run_withMarkerJob_shouldBuildFullRenderPlan() {
    let output = pipeline(&Config::default())
        .run(&common::top5_request(), &JobLog::detached("top5"))
        .unwrap();

    let ops = output.plan.operations();
    assert_eq!(ops.len(), 16);
    assert!(matches!(&ops[0], RenderOperation::Loop { count: 3, .. }));
    assert_eq!(ops.iter().filter(|op| matches!(op, RenderOperation::OverlayWindow { .. })).count(), 5);
    assert_eq!(output.plan.final_output(), Some("final"));
    assert_eq!(output.styling.highlight_color, "#7710e2");
}

#[test]
fn test_run_withMarkerJob_shouldKeepSubtitleTextIntact() {
    let request = common::top5_request();
    let output = pipeline(&Config::default())
        .run(&request, &JobLog::detached("top5"))
        .unwrap();

    let cue_text = output.cues.iter().map(|c| c.text.as_str()).collect::<Vec<_>>().join(" ");
    assert_eq!(cue_text, request.script);
    assert!(output.srt().starts_with("1\n00:00:00,000 --> "));
}

#[test]
fn test_run_withFourMarkers_shouldFailWithInvalidMarkerCount() {
    let mut words = common::top5_words();
    words[13].0 = "THERE";
    let mut request = common::top5_request();
    request.alignment = common::alignment_from_words(&words);

    let result = pipeline(&Config::default()).run(&request, &JobLog::detached("bad"));

    assert!(matches!(
        result,
        Err(JobError::Timeline(TimelineError::InvalidMarkerCount { found: 4, .. }))
    ));
}

#[test]
fn test_run_withMismatchedAlignment_shouldFailBeforeScheduling() {
    let mut request = common::top5_request();
    request.alignment.character_end_times_seconds.pop();

    let result = pipeline(&Config::default()).run(&request, &JobLog::detached("bad"));

    assert!(matches!(result, Err(JobError::Timeline(TimelineError::AlignmentMismatch(_)))));
}

#[test]
fn test_run_withMarkerJobWithoutBackground_shouldFailWithMissingAsset() {
    let mut request = common::top5_request();
    request.globals.background_video = None;

    let result = pipeline(&Config::default()).run(&request, &JobLog::detached("bad"));

    assert!(matches!(result, Err(JobError::Timeline(TimelineError::MissingAsset(_)))));
}

#[test]
fn test_run_withImageMusic_shouldFailWithInvalidAsset() {
    let mut request = common::top5_request();
    request.globals.music = Some("music.png".to_string());

    let result = pipeline(&Config::default()).run(&request, &JobLog::detached("bad"));

    assert!(matches!(result, Err(JobError::Timeline(TimelineError::InvalidAsset(_)))));
}

#[test]
fn test_run_withTagJob_shouldScheduleTaggedVideos() {
    let request = tag_request("{video:opening.mp4} Hello world {video:clip.mp4} This is a test done");

    let output = pipeline(&tag_config())
        .run(&request, &JobLog::detached("tags"))
        .unwrap();

    let segments = output.timeline.segments();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[0].asset_ref, "opening.mp4");
    assert_eq!(segments[0].end, 1.0);
    assert_eq!(segments[1].start, 1.0);
    assert_eq!(segments[1].end, 2.5);
    assert!(output.pauses.is_empty());
    assert_eq!(output.plan.final_output(), Some("timeline"));
}

#[test]
fn test_run_withNestedTag_shouldFailWithMalformedTag() {
    let request = tag_request("{video:opening.mp4} Hello world {video:{video:clip.mp4}} This is a test done");

    let result = pipeline(&tag_config()).run(&request, &JobLog::detached("tags"));

    assert!(matches!(result, Err(JobError::Timeline(TimelineError::MalformedTag(_)))));
}

#[test]
fn test_run_withTagJobNotStartingAtZero_shouldFailValidation() {
    let request = tag_request("Hello world {video:file_abc.mp4} This is a test {photo:file_logo.png} done");

    let result = pipeline(&tag_config()).run(&request, &JobLog::detached("tags"));

    assert!(matches!(
        result,
        Err(JobError::Timeline(TimelineError::TimelineGap { at: GapLocation::Start, .. }))
    ));
}

#[test]
fn test_run_withDirectoryResolver_shouldFailOnMissingFootage() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "opening.mp4", "").unwrap();
    let pipeline = TimelinePipeline::new(&tag_config(), Arc::new(DirectoryResolver::new(dir.path())));
    let request = tag_request("{video:opening.mp4} Hello world {video:missing.mp4} This is a test done");

    let result = pipeline.run(&request, &JobLog::detached("tags"));

    assert!(matches!(result, Err(JobError::Render(RenderError::MissingAsset(ref msg))) if msg.contains("missing.mp4")));
}

#[test]
fn test_run_withDirectoryResolver_shouldRewriteAssetPaths() {
    let dir = common::create_temp_dir().unwrap();
    common::create_test_file(dir.path(), "opening.mp4", "").unwrap();
    common::create_test_file(dir.path(), "clip.mp4", "").unwrap();
    let pipeline = TimelinePipeline::new(&tag_config(), Arc::new(DirectoryResolver::new(dir.path())));
    let request = tag_request("{video:opening.mp4} Hello world {video:clip.mp4} This is a test done");

    let output = pipeline.run(&request, &JobLog::detached("tags")).unwrap();

    let expected = dir.path().join("clip.mp4").to_string_lossy().into_owned();
    assert_eq!(output.timeline.segments()[1].asset_ref, expected);
}

#[test]
fn test_jobRequest_fromFile_shouldAcceptCamelCaseAlignment() {
    let dir = common::create_temp_dir().unwrap();
    let json = r#"{
        "script": "Hi",
        "alignment": {
            "characters": ["H", "i"],
            "characterStartTimesSeconds": [0.0, 0.1],
            "characterEndTimesSeconds": [0.1, 0.2]
        },
        "footage_assets": ["a.mp4"],
        "globals": {"music": "m.mp3"}
    }"#;
    let path = common::create_test_file(dir.path(), "hi.job.json", json).unwrap();

    let request = JobRequest::from_file(&path).unwrap();

    assert_eq!(request.alignment.len(), 2);
    assert_eq!(request.globals.music.as_deref(), Some("m.mp3"));
    assert!(request.globals.background_video.is_none());
}

#[test]
fn test_planWriter_withPipelineOutput_shouldWritePlanFile() {
    use reeltime::render::{PlanWriter, Renderer};

    let dir = common::create_temp_dir().unwrap();
    let output = pipeline(&Config::default())
        .run(&common::top5_request(), &JobLog::detached("top5"))
        .unwrap();
    let path = dir.path().join("top5.plan.json");

    let written = tokio_test::block_on(async { PlanWriter.render(&output.plan, &path).await }).unwrap();

    let json: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(written).unwrap()).unwrap();
    assert_eq!(json["operations"][0]["op"], "loop");
    assert_eq!(json["styling"]["blend_mode"], "lighten");
}
