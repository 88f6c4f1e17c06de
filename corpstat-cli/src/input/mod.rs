//! Input handling module

pub mod corpus_reader;
pub mod glob_resolver;

pub use corpus_reader::{parse_line, parse_token, CorpusReader};
pub use glob_resolver::resolve_patterns;
