//! Data model shared by the counters, the scorer and the engine
//!
//! Tokens and sentences arrive already normalized and tagged; nothing in
//! this crate re-tokenizes. Sentences are atomic: every window the counters
//! build is taken from a single sentence.

use crate::error::{CoreError, Result};
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Serialize, Serializer};

/// A word form with an optional part-of-speech tag
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    word: String,
    tag: Option<String>,
}

impl Token {
    /// Create an untagged token
    pub fn new<S: Into<String>>(word: S) -> Self {
        Self {
            word: word.into(),
            tag: None,
        }
    }

    /// Create a token carrying a part-of-speech tag
    pub fn tagged<S: Into<String>, T: Into<String>>(word: S, tag: T) -> Self {
        Self {
            word: word.into(),
            tag: Some(tag.into()),
        }
    }

    /// The word form
    pub fn word(&self) -> &str {
        &self.word
    }

    /// The part-of-speech tag; an empty tag counts as no tag
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().filter(|tag| !tag.is_empty())
    }

    /// A token is well formed when its word form is non-empty and free of
    /// whitespace, so every n-gram displays unambiguously
    pub fn is_well_formed(&self) -> bool {
        !self.word.is_empty() && !self.word.chars().any(char::is_whitespace)
    }
}

/// An ordered run of tokens; windows never cross its edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sentence {
    tokens: Vec<Token>,
}

impl Sentence {
    /// Create a sentence from tokens
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Create an untagged sentence from word forms
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        words.into_iter().map(Token::new).collect()
    }

    /// Create a tagged sentence from `(word, tag)` pairs
    pub fn from_tagged<I, S, T>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<String>,
    {
        pairs
            .into_iter()
            .map(|(word, tag)| Token::tagged(word, tag))
            .collect()
    }

    /// The tokens in order
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Number of tokens
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the sentence has no tokens
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Word forms in order
    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.tokens.iter().map(Token::word)
    }

    /// Reject the first malformed token.
    ///
    /// `position` is the sentence index reported in the error.
    pub fn validate(&self, position: usize) -> Result<()> {
        match self.tokens.iter().position(|t| !t.is_well_formed()) {
            Some(token) => Err(CoreError::MalformedToken {
                sentence: position,
                token,
            }),
            None => Ok(()),
        }
    }
}

impl From<Vec<Token>> for Sentence {
    fn from(tokens: Vec<Token>) -> Self {
        Self::new(tokens)
    }
}

impl FromIterator<Token> for Sentence {
    fn from_iter<I: IntoIterator<Item = Token>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// A contiguous slice of the corpus assigned to one worker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in the chunk sequence
    pub index: usize,
    /// Corpus offset of the first sentence
    pub start: usize,
    /// The sentences, in corpus order
    pub sentences: Vec<Sentence>,
}

impl Chunk {
    /// Create a chunk
    pub fn new(index: usize, start: usize, sentences: Vec<Sentence>) -> Self {
        Self {
            index,
            start,
            sentences,
        }
    }

    /// A standalone chunk covering the given sentences from offset 0
    pub fn from_sentences(sentences: Vec<Sentence>) -> Self {
        Self::new(0, 0, sentences)
    }

    /// Number of sentences
    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    /// Whether the chunk holds no sentences
    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Corpus offset one past the last sentence
    pub fn end(&self) -> usize {
        self.start + self.sentences.len()
    }
}

/// An ordered sequence of word forms (an n-gram or a collocate phrase).
///
/// Phrases order by their displayed text, words joined by single spaces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Phrase(SmallVec<[String; 4]>);

/// N-grams and collocate phrases share one representation
pub type Ngram = Phrase;

impl Phrase {
    /// Build a phrase from the word forms of a token window
    pub fn from_tokens(tokens: &[Token]) -> Self {
        Self(tokens.iter().map(|t| t.word().to_owned()).collect())
    }

    /// The word forms
    pub fn words(&self) -> &[String] {
        &self.0
    }

    /// Number of words
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the phrase has no words
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Characters of the displayed text, without allocating it
    fn display_chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().enumerate().flat_map(|(i, word)| {
            let separator = (i > 0).then_some(' ');
            separator.into_iter().chain(word.chars())
        })
    }
}

impl Ord for Phrase {
    fn cmp(&self, other: &Self) -> Ordering {
        self.display_chars()
            .cmp(other.display_chars())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for Phrase {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S: Into<String>> FromIterator<S> for Phrase {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl From<&str> for Phrase {
    /// Splits on whitespace
    fn from(text: &str) -> Self {
        text.split_whitespace().collect()
    }
}

impl fmt::Display for Phrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, word) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            f.write_str(word)?;
        }
        Ok(())
    }
}

#[cfg(feature = "serde")]
impl Serialize for Phrase {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Ordered pair of part-of-speech tags
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct TagPair {
    /// Tag of the earlier token
    pub first: String,
    /// Tag of the later token
    pub second: String,
}

impl TagPair {
    /// Create a tag pair
    pub fn new<S: Into<String>, T: Into<String>>(first: S, second: T) -> Self {
        Self {
            first: first.into(),
            second: second.into(),
        }
    }
}

impl fmt::Display for TagPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} > {}", self.first, self.second)
    }
}

/// Which side of a subject word a collocate window sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Side {
    /// Tokens before the subject
    Preceding,
    /// Tokens after the subject
    Following,
}

/// Key of a collocate count table
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct CollocateKey {
    /// The subject word
    pub subject: String,
    /// The side the phrase was taken from
    pub side: Side,
    /// The collocate phrase, in original token order
    pub phrase: Phrase,
}

impl CollocateKey {
    /// Create a collocate key
    pub fn new<S: Into<String>>(subject: S, side: Side, phrase: Phrase) -> Self {
        Self {
            subject: subject.into(),
            side,
            phrase,
        }
    }
}
