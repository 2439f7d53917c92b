use serde::{Deserialize, Serialize};

use super::words::Word;

/// Default cap on words per sentence, sized for on-screen captions
pub const DEFAULT_MAX_WORDS_PER_SENTENCE: usize = 3;

/// An ordered group of words shown together
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sentence {
    pub words: Vec<Word>,
}

impl Sentence {
    /// Start of the first word, or 0 for an empty sentence
    pub fn start(&self) -> f64 {
        self.words.first().map_or(0.0, |w| w.start)
    }

    /// End of the last word, or 0 for an empty sentence
    pub fn end(&self) -> f64 {
        self.words.last().map_or(0.0, |w| w.end)
    }

    /// Words joined by single spaces
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Split words into sentences in a single greedy left-to-right pass.
///
/// A sentence closes after a word ending in `.`, `?` or `!`, or once it holds
/// `max_words` words. Whatever remains at the end is emitted as the last
/// sentence. A `max_words` of zero is treated as one.
pub fn group_words_into_sentences(words: &[Word], max_words: usize) -> Vec<Sentence> {
    let max_words = max_words.max(1);
    let mut sentences = Vec::new();
    let mut current: Vec<Word> = Vec::with_capacity(max_words);

    for word in words {
        current.push(word.clone());

        if word.ends_sentence() || current.len() >= max_words {
            sentences.push(Sentence {
                words: std::mem::take(&mut current),
            });
        }
    }

    if !current.is_empty() {
        sentences.push(Sentence { words: current });
    }

    sentences
}
