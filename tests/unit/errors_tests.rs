/*!
 * Tests for error types and conversions
 */

use reeltime::errors::{AppError, GapLocation, JobError, RenderError, TimelineError};

#[test]
fn test_timelineError_invalidMarkerCount_shouldDisplayTokenAndCounts() {
    let error = TimelineError::InvalidMarkerCount {
        token: "PLACE".to_string(),
        expected: 5,
        found: 4,
    };
    let display = format!("{}", error);
    assert!(display.contains("PLACE"));
    assert!(display.contains('5'));
    assert!(display.contains('4'));
}

#[test]
fn test_timelineError_timelineGap_shouldDisplayLocation() {
    let error = TimelineError::TimelineGap {
        at: GapLocation::Between(2),
        expected: 3.0,
        found: 3.5,
    };
    let display = format!("{}", error);
    assert!(display.contains("segment 2"));
    assert!(display.contains("3.500000"));
}

#[test]
fn test_jobError_fromTimelineError_shouldWrapCorrectly() {
    let job_error: JobError = TimelineError::EmptyTimeline.into();
    assert!(matches!(job_error, JobError::Timeline(TimelineError::EmptyTimeline)));
    assert!(format!("{}", job_error).contains("Timeline is empty"));
}

#[test]
fn test_jobError_fromRenderError_shouldWrapCorrectly() {
    let job_error: JobError = RenderError::MissingAsset("a.mp4".to_string()).into();
    assert!(matches!(job_error, JobError::Render(RenderError::MissingAsset(_))));
}

#[test]
fn test_jobError_queueFull_shouldDisplayCapacity() {
    let error = JobError::QueueFull { capacity: 8 };
    assert!(format!("{}", error).contains("8 jobs pending"));
}

#[test]
fn test_appError_fromIoError_shouldBecomeFileError() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "job.json");
    let app_error: AppError = io_error.into();
    assert!(matches!(app_error, AppError::File(_)));
}

#[test]
fn test_appError_fromAnyhow_shouldBecomeUnknown() {
    let app_error: AppError = anyhow::anyhow!("boom").into();
    assert!(matches!(app_error, AppError::Unknown(ref msg) if msg == "boom"));
}

#[test]
fn test_appError_fromJobError_shouldNestMessage() {
    let app_error: AppError = JobError::Cancelled("abc".to_string()).into();
    let display = format!("{}", app_error);
    assert!(display.contains("Job error"));
    assert!(display.contains("abc"));
}
