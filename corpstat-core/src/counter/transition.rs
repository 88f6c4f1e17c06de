//! Part-of-speech transition counting
//!
//! Pairs are formed from consecutive *tagged* tokens. An untagged token is
//! skipped without breaking adjacency, so `DET <untagged> NOUN` counts as
//! one `(DET, NOUN)` transition. Pairs never cross a sentence.

use super::Counter;
use crate::{
    error::Result,
    table::CountTable,
    types::{Chunk, Sentence, TagPair, Token},
};

/// Counts ordered pairs of adjacent part-of-speech tags
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransitionCounter;

impl TransitionCounter {
    /// Create a transition counter
    pub fn new() -> Self {
        Self
    }

    /// Add the tag transitions of one sentence to `table`
    pub fn count_sentence(&self, sentence: &Sentence, table: &mut CountTable<TagPair>) {
        let mut previous: Option<&str> = None;
        for tag in sentence.tokens().iter().filter_map(Token::tag) {
            if let Some(prev) = previous {
                table.increment(TagPair::new(prev, tag));
            }
            previous = Some(tag);
        }
    }
}

impl Counter for TransitionCounter {
    type Partial = CountTable<TagPair>;

    fn name(&self) -> &'static str {
        "transitions"
    }

    fn count(&self, chunk: &Chunk) -> Result<Self::Partial> {
        let mut table = CountTable::new();
        for (position, sentence) in chunk.sentences.iter().enumerate() {
            sentence.validate(position)?;
            self.count_sentence(sentence, &mut table);
        }
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(sentences: Vec<Sentence>) -> CountTable<TagPair> {
        TransitionCounter::new()
            .count(&Chunk::from_sentences(sentences))
            .unwrap()
    }

    #[test]
    fn test_fully_tagged_sentence() {
        let counts = count(vec![Sentence::from_tagged([
            ("the", "DET"),
            ("quick", "ADJ"),
            ("brown", "ADJ"),
            ("fox", "NOUN"),
        ])]);

        assert_eq!(counts.len(), 3);
        assert_eq!(counts.get(&TagPair::new("DET", "ADJ")), 1);
        assert_eq!(counts.get(&TagPair::new("ADJ", "ADJ")), 1);
        assert_eq!(counts.get(&TagPair::new("ADJ", "NOUN")), 1);
    }

    #[test]
    fn test_untagged_tokens_do_not_break_adjacency() {
        let sentence = Sentence::new(vec![
            Token::tagged("the", "DET"),
            Token::new("very"),
            Token::new("very"),
            Token::tagged("old", "ADJ"),
            Token::tagged("fox", ""),
            Token::tagged("sleeps", "VERB"),
        ]);
        let counts = count(vec![sentence]);

        assert_eq!(counts.len(), 2);
        assert_eq!(counts.get(&TagPair::new("DET", "ADJ")), 1);
        assert_eq!(counts.get(&TagPair::new("ADJ", "VERB")), 1);
    }

    #[test]
    fn test_pairs_stop_at_sentence_edges() {
        let counts = count(vec![
            Sentence::from_tagged([("dogs", "NOUN")]),
            Sentence::from_tagged([("bark", "VERB")]),
        ]);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_untagged_corpus_yields_nothing() {
        let counts = count(vec![Sentence::from_words(["no", "tags", "here"])]);
        assert!(counts.is_empty());
    }
}
