//! Windowed collocate counting around subject words
//!
//! For every occurrence of a subject word, each enabled side contributes one
//! phrase per window length `k` in `1..=window`, provided `k` tokens exist on
//! that side within the sentence. With `window = 2` and the sentence
//! "the quick brown fox", subject "the" yields the following phrases
//! "quick" and "quick brown".
//!
//! Both sides are counted by default. [`WindowSides::Following`] restricts
//! counting to the phrases after the subject.

use super::Counter;
use crate::{
    error::{CoreError, Result},
    monoid::Monoid,
    table::{CountTable, WordFrequencies},
    types::{Chunk, CollocateKey, Phrase, Sentence, Side},
};
use std::collections::HashSet;

/// Which sides of a subject occurrence are scanned
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WindowSides {
    /// Phrases before and after the subject
    #[default]
    Both,
    /// Only phrases after the subject
    Following,
    /// Only phrases before the subject
    Preceding,
}

impl WindowSides {
    /// Whether phrases on `side` are counted
    pub fn includes(self, side: Side) -> bool {
        match self {
            WindowSides::Both => true,
            WindowSides::Following => side == Side::Following,
            WindowSides::Preceding => side == Side::Preceding,
        }
    }
}

/// Partial result of a collocate count
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollocateCounts {
    /// Joint occurrences keyed by `(subject, side, phrase)`
    pub collocates: CountTable<CollocateKey>,
    /// Occurrences of each subject word on its own
    pub subjects: WordFrequencies,
}

impl CollocateCounts {
    /// Whether nothing was observed
    pub fn is_empty(&self) -> bool {
        self.collocates.is_empty() && self.subjects.is_empty()
    }
}

impl Monoid for CollocateCounts {
    fn identity() -> Self {
        Self::default()
    }

    fn combine(self, other: Self) -> Self {
        Self {
            collocates: self.collocates.combine(other.collocates),
            subjects: self.subjects.combine(other.subjects),
        }
    }
}

/// Counts phrases adjacent to a fixed set of subject words
#[derive(Debug, Clone)]
pub struct CollocateCounter {
    subjects: HashSet<String>,
    window: usize,
    sides: WindowSides,
}

impl CollocateCounter {
    /// Create a counter for `subjects` with windows of `1..=window` tokens
    pub fn new<I, S>(subjects: I, window: usize, sides: WindowSides) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if window == 0 {
            return Err(CoreError::invalid_config(
                "collocate window must be greater than 0",
            ));
        }

        let subjects: HashSet<String> = subjects.into_iter().map(Into::into).collect();
        if subjects.is_empty() {
            return Err(CoreError::invalid_config("subject set must not be empty"));
        }

        Ok(Self {
            subjects,
            window,
            sides,
        })
    }

    /// The maximum window length
    pub fn window(&self) -> usize {
        self.window
    }

    /// The sides that are scanned
    pub fn sides(&self) -> WindowSides {
        self.sides
    }

    /// Whether `word` is a subject
    pub fn is_subject(&self, word: &str) -> bool {
        self.subjects.contains(word)
    }

    /// Add the collocates of one sentence to `counts`
    pub fn count_sentence(&self, sentence: &Sentence, counts: &mut CollocateCounts) {
        let tokens = sentence.tokens();

        for (i, token) in tokens.iter().enumerate() {
            let Some(subject) = self.subjects.get(token.word()) else {
                continue;
            };
            counts.subjects.increment(subject.clone());

            for k in 1..=self.window {
                if self.sides.includes(Side::Preceding) && k <= i {
                    counts.collocates.increment(CollocateKey::new(
                        subject.as_str(),
                        Side::Preceding,
                        Phrase::from_tokens(&tokens[i - k..i]),
                    ));
                }
                if self.sides.includes(Side::Following) && i + k < tokens.len() {
                    counts.collocates.increment(CollocateKey::new(
                        subject.as_str(),
                        Side::Following,
                        Phrase::from_tokens(&tokens[i + 1..=i + k]),
                    ));
                }
            }
        }
    }
}

impl Counter for CollocateCounter {
    type Partial = CollocateCounts;

    fn name(&self) -> &'static str {
        "collocates"
    }

    fn count(&self, chunk: &Chunk) -> Result<Self::Partial> {
        let mut counts = CollocateCounts::default();
        for (position, sentence) in chunk.sentences.iter().enumerate() {
            sentence.validate(position)?;
            self.count_sentence(sentence, &mut counts);
        }
        Ok(counts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOX: &str = "the quick brown fox jumps over the lazy dog";

    fn count(text: &str, window: usize, sides: WindowSides) -> CollocateCounts {
        let chunk = Chunk::from_sentences(vec![Sentence::from_words(text.split_whitespace())]);
        CollocateCounter::new(["the"], window, sides)
            .unwrap()
            .count(&chunk)
            .unwrap()
    }

    fn key(side: Side, phrase: &str) -> CollocateKey {
        CollocateKey::new("the", side, Phrase::from(phrase))
    }

    #[test]
    fn test_config_rejected() {
        assert!(CollocateCounter::new(["the"], 0, WindowSides::Both).is_err());
        assert!(CollocateCounter::new(Vec::<String>::new(), 2, WindowSides::Both).is_err());
    }

    #[test]
    fn test_following_windows_only() {
        let counts = count(FOX, 2, WindowSides::Following);

        assert_eq!(counts.subjects.get("the"), 2);
        assert_eq!(counts.collocates.get(&key(Side::Following, "quick brown")), 1);
        assert_eq!(counts.collocates.get(&key(Side::Following, "lazy dog")), 1);
        assert_eq!(counts.collocates.get(&key(Side::Following, "quick")), 1);
        assert_eq!(counts.collocates.get(&key(Side::Following, "lazy")), 1);
        assert_eq!(counts.collocates.len(), 4);
    }

    #[test]
    fn test_both_sides_include_preceding_windows() {
        let counts = count(FOX, 2, WindowSides::Both);

        assert_eq!(counts.collocates.get(&key(Side::Preceding, "jumps over")), 1);
        assert_eq!(counts.collocates.get(&key(Side::Preceding, "over")), 1);
        assert_eq!(counts.collocates.get(&key(Side::Following, "quick brown")), 1);
        assert_eq!(counts.collocates.len(), 6);
        // The sentence-initial "the" has no preceding window
        assert_eq!(counts.collocates.total(), 6);
    }

    #[test]
    fn test_window_truncated_at_sentence_edge() {
        let counts = count("the dog", 3, WindowSides::Both);
        assert_eq!(counts.collocates.len(), 1);
        assert_eq!(counts.collocates.get(&key(Side::Following, "dog")), 1);
    }

    #[test]
    fn test_windows_do_not_cross_sentences() {
        let chunk = Chunk::from_sentences(vec![
            Sentence::from_words(["over", "the"]),
            Sentence::from_words(["lazy", "dog"]),
        ]);
        let counts = CollocateCounter::new(["the"], 2, WindowSides::Both)
            .unwrap()
            .count(&chunk)
            .unwrap();

        assert_eq!(counts.collocates.get(&key(Side::Following, "lazy")), 0);
        assert_eq!(counts.collocates.get(&key(Side::Preceding, "over")), 1);
        assert_eq!(counts.subjects.get("the"), 1);
    }

    #[test]
    fn test_subject_without_neighbours_still_counted() {
        let counts = count("the", 2, WindowSides::Both);
        assert_eq!(counts.subjects.get("the"), 1);
        assert!(counts.collocates.is_empty());
    }
}
