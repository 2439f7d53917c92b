/*!
 * Common test utilities for the reeltime test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use reeltime::jobs::JobRequest;
use reeltime::render::{BackgroundVideo, GlobalAssets};
use reeltime::timeline::AlignmentPayload;

// Re-export the mock renderer module
pub mod mock_renderer;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Builds a character alignment that reproduces the given word timings.
///
/// Characters of a word split its span evenly; the space between two words
/// spans the silence between them.
pub fn alignment_from_words(words: &[(&str, f64, f64)]) -> AlignmentPayload {
    let mut characters = Vec::new();
    let mut starts = Vec::new();
    let mut ends = Vec::new();

    for (index, (text, start, end)) in words.iter().enumerate() {
        if index > 0 {
            let previous_end = words[index - 1].2;
            characters.push(" ".to_string());
            starts.push(previous_end);
            ends.push(*start);
        }

        let chars: Vec<char> = text.chars().collect();
        let step = (end - start) / chars.len() as f64;
        for (i, ch) in chars.iter().enumerate() {
            characters.push(ch.to_string());
            starts.push(if i == 0 { *start } else { start + step * i as f64 });
            ends.push(if i + 1 == chars.len() { *end } else { start + step * (i + 1) as f64 });
        }
    }

    AlignmentPayload::new(characters, starts, ends)
}

/// A top-five narration with five `PLACE` sentinels and one long pause
/// (1.2s to 2.2s) after the intro
pub fn top5_words() -> Vec<(&'static str, f64, f64)> {
    vec![
        ("Top", 0.0, 0.3),
        ("five", 0.35, 0.7),
        ("cities.", 0.75, 1.2),
        ("PLACE", 2.2, 2.6),
        ("Paris", 2.65, 3.0),
        ("rocks.", 3.05, 3.5),
        ("PLACE", 3.55, 3.9),
        ("Rome", 3.95, 4.3),
        ("shines.", 4.5, 5.0),
        ("PLACE", 5.05, 5.4),
        ("Tokyo", 5.45, 5.9),
        ("PLACE", 5.95, 6.3),
        ("Lima", 6.35, 6.7),
        ("PLACE", 6.75, 7.1),
        ("Oslo.", 7.15, 7.6),
    ]
}

/// The five footage assets matching `top5_words`
pub fn top5_assets() -> Vec<String> {
    (1..=5).map(|i| format!("place{}.mp4", i)).collect()
}

/// Background, music and effect assets
pub fn full_globals(background_duration: Option<f64>) -> GlobalAssets {
    GlobalAssets {
        background_video: Some(BackgroundVideo {
            asset: "background.mp4".to_string(),
            duration: background_duration,
        }),
        music: Some("music.mp3".to_string()),
        effect: Some("effect.mp4".to_string()),
    }
}

/// A complete marker-strategy job
pub fn top5_request() -> JobRequest {
    let words = top5_words();
    JobRequest {
        name: Some("top5".to_string()),
        script: words.iter().map(|(t, _, _)| *t).collect::<Vec<_>>().join(" "),
        alignment: alignment_from_words(&words),
        footage_assets: top5_assets(),
        globals: full_globals(Some(3.0)),
    }
}
