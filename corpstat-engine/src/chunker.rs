//! Corpus chunking
//!
//! Chunks are contiguous runs of whole sentences. A sentence never
//! straddles two chunks, so no counter ever needs state from a neighbour.

use crate::error::{EngineError, Result};
use corpstat_core::{Chunk, Sentence};

/// Splits a sentence stream into fixed-size chunks
#[derive(Debug, Clone, Copy)]
pub struct ChunkManager {
    chunk_size: usize,
}

impl ChunkManager {
    /// Create a chunk manager emitting `chunk_size` sentences per chunk
    pub fn new(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(EngineError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }

    /// Sentences per chunk
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Lazily chunk a sentence stream.
    ///
    /// Only the final chunk may be shorter than the chunk size; an empty
    /// stream yields no chunks.
    pub fn chunks<I>(&self, sentences: I) -> ChunkIter<I::IntoIter>
    where
        I: IntoIterator<Item = Sentence>,
    {
        ChunkIter {
            sentences: sentences.into_iter(),
            chunk_size: self.chunk_size,
            next_index: 0,
            next_start: 0,
        }
    }

    /// Chunk a whole corpus into memory
    pub fn chunk_all<I>(&self, sentences: I) -> Vec<Chunk>
    where
        I: IntoIterator<Item = Sentence>,
    {
        self.chunks(sentences).collect()
    }
}

/// Iterator over the chunks of a sentence stream
#[derive(Debug)]
pub struct ChunkIter<I> {
    sentences: I,
    chunk_size: usize,
    next_index: usize,
    next_start: usize,
}

impl<I> Iterator for ChunkIter<I>
where
    I: Iterator<Item = Sentence>,
{
    type Item = Chunk;

    fn next(&mut self) -> Option<Chunk> {
        let batch: Vec<Sentence> = self.sentences.by_ref().take(self.chunk_size).collect();
        if batch.is_empty() {
            return None;
        }

        let chunk = Chunk::new(self.next_index, self.next_start, batch);
        self.next_index += 1;
        self.next_start += chunk.len();
        Some(chunk)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(len: usize) -> Vec<Sentence> {
        (0..len)
            .map(|i| Sentence::from_words([format!("w{i}")]))
            .collect()
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(ChunkManager::new(0).is_err());
    }

    #[test]
    fn test_fixed_size_chunks() {
        let chunks = ChunkManager::new(3).unwrap().chunk_all(corpus(8));

        let sizes: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(sizes, vec![3, 3, 2]);

        let starts: Vec<usize> = chunks.iter().map(|c| c.start).collect();
        assert_eq!(starts, vec![0, 3, 6]);
        assert_eq!(chunks[2].index, 2);
        assert_eq!(chunks[2].end(), 8);
    }

    #[test]
    fn test_every_sentence_in_exactly_one_chunk() {
        let original = corpus(10);
        let chunks = ChunkManager::new(4).unwrap().chunk_all(original.clone());
        let rejoined: Vec<Sentence> = chunks.into_iter().flat_map(|c| c.sentences).collect();
        assert_eq!(rejoined, original);
    }

    #[test]
    fn test_empty_corpus_has_no_chunks() {
        let mut chunks = ChunkManager::new(5).unwrap().chunks(Vec::new());
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_oversized_chunk_holds_everything() {
        let chunks = ChunkManager::new(100).unwrap().chunk_all(corpus(7));
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].len(), 7);
    }
}
