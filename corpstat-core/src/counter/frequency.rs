//! N-gram frequency counting

use super::Counter;
use crate::{
    error::{CoreError, Result},
    table::{CountTable, WordFrequencies},
    types::{Chunk, Ngram, Phrase, Sentence},
};

/// Counts every contiguous n-token window of every sentence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrequencyCounter {
    n: usize,
}

impl FrequencyCounter {
    /// Create a counter for n-grams of length `n`
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(CoreError::invalid_config(
                "n-gram length must be greater than 0",
            ));
        }
        Ok(Self { n })
    }

    /// The n-gram length
    pub fn n(&self) -> usize {
        self.n
    }

    /// Add the n-grams of one sentence to `table`
    pub fn count_sentence(&self, sentence: &Sentence, table: &mut CountTable<Ngram>) {
        // `windows` yields nothing for sentences shorter than n
        for window in sentence.tokens().windows(self.n) {
            table.increment(Phrase::from_tokens(window));
        }
    }
}

impl Counter for FrequencyCounter {
    type Partial = CountTable<Ngram>;

    fn name(&self) -> &'static str {
        "frequency"
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

/// Re-key a unigram table by plain word form.
///
/// Entries that are not single words are dropped.
pub fn into_word_frequencies(table: CountTable<Ngram>) -> WordFrequencies {
    table
        .into_iter()
        .filter(|(phrase, _)| phrase.len() == 1)
        .map(|(phrase, count)| (phrase.words()[0].clone(), count))
        .collect()
}
