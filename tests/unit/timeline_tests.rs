/*!
 * Tests for the narration timeline through the public API
 */

use reeltime::timeline::{
    PauseDetector, cues_from_sentences, group_chars_into_words, group_words_into_sentences,
};

use crate::common;

#[test]
fn test_alignmentFixture_shouldReproduceWordTimings() {
    let fixture = common::top5_words();
    let chars = common::alignment_from_words(&fixture).import().unwrap();

    let words = group_chars_into_words(&chars);

    assert_eq!(words.len(), fixture.len());
    for (word, (text, start, end)) in words.iter().zip(&fixture) {
        assert_eq!(word.text, *text);
        assert_eq!(word.start, *start);
        assert_eq!(word.end, *end);
    }
}

#[test]
fn test_sentences_shouldConcatenateBackToWords() {
    let chars = common::alignment_from_words(&common::top5_words()).import().unwrap();
    let words = group_chars_into_words(&chars);

    let sentences = group_words_into_sentences(&words, 3);

    let flattened: Vec<_> = sentences.iter().flat_map(|s| s.words.iter().cloned()).collect();
    assert_eq!(flattened, words);
    assert!(sentences.iter().all(|s| s.len() <= 3));
}

#[test]
fn test_compaction_shouldPreserveOrderAndRemoveDetectedSilence() {
    let chars = common::alignment_from_words(&common::top5_words()).import().unwrap();
    let words = group_chars_into_words(&chars);

    let detection = PauseDetector::new(0.4, 0.075).run(&words);

    assert_eq!(detection.pauses.len(), 1);
    assert!((detection.removed_duration() - 0.85).abs() < 1e-9);
    for pair in detection.words.windows(2) {
        assert!(pair[0].start <= pair[1].start);
    }
    let last = detection.words.last().unwrap();
    assert!((last.end - 6.75).abs() < 1e-9);
}

#[test]
fn test_cues_shouldBeNumberedFromOne() {
    let chars = common::alignment_from_words(&common::top5_words()).import().unwrap();
    let words = group_chars_into_words(&chars);

    let cues = cues_from_sentences(&group_words_into_sentences(&words, 3));

    for (i, cue) in cues.iter().enumerate() {
        assert_eq!(cue.index, i + 1);
        assert!(cue.start <= cue.end);
    }
}
