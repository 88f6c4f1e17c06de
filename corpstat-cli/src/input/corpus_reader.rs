//! Corpus file parsing
//!
//! One sentence per line, tokens separated by whitespace. A token is either
//! `word` or `word/TAG`, split at the last `/`. Blank lines are skipped.

use anyhow::{Context, Result};
use corpstat_engine::{Sentence, Token};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

/// Parse one token.
///
/// A trailing `/` with nothing after it is part of the word, so a bare `/`
/// stays an untagged token. `/TAG` yields a token without a word form,
/// which counting rejects.
pub fn parse_token(raw: &str) -> Token {
    match raw.rsplit_once('/') {
        Some((word, tag)) if !tag.is_empty() => Token::tagged(word, tag),
        _ => Token::new(raw),
    }
}

/// Parse one line; blank lines yield no sentence
pub fn parse_line(line: &str) -> Option<Sentence> {
    let sentence: Sentence = line.split_whitespace().map(parse_token).collect();
    (!sentence.is_empty()).then_some(sentence)
}

/// Reads normalized corpus files
pub struct CorpusReader;

impl CorpusReader {
    /// Parse corpus text
    pub fn parse(content: &str) -> Vec<Sentence> {
        content.lines().filter_map(parse_line).collect()
    }

    /// Read and parse one corpus file
    pub fn read_file(path: &Path) -> Result<Vec<Sentence>> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    /// Read every file in parallel, keeping file order.
    ///
    /// `on_file` is called from worker threads as each file finishes.
    pub fn read_all<F>(paths: &[PathBuf], on_file: F) -> Result<Vec<Sentence>>
    where
        F: Fn(&Path) + Sync,
    {
        let per_file = paths
            .par_iter()
            .map(|path| -> Result<Vec<Sentence>> {
                let sentences = Self::read_file(path)?;
                log::debug!("{}: {} sentences", path.display(), sentences.len());
                on_file(path);
                Ok(sentences)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(per_file.into_iter().flatten().collect())
    }
}
