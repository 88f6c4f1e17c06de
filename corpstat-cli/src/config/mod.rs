//! Configuration module
//!
//! An optional TOML file supplies defaults; command-line flags override it.

use crate::error::CliError;
use anyhow::{Context, Result};
use corpstat_engine::{EngineConfig, WindowSides};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// CLI configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct CliConfig {
    /// Engine configuration
    #[serde(default)]
    pub engine: EngineSection,

    /// Analysis parameters
    #[serde(default)]
    pub analysis: AnalysisSection,
}

/// Engine-related configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngineSection {
    /// Sentences per chunk
    pub chunk_size: Option<usize>,

    /// Number of worker threads (0 = auto)
    pub threads: Option<usize>,

    /// Worker pool build retries
    pub pool_retries: Option<usize>,
}

/// Analysis-related configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisSection {
    /// N-gram length for frequency counts
    pub n: Option<usize>,

    /// Collocation window
    pub window: Option<usize>,

    /// Subjects for general collocation
    pub top_k: Option<usize>,

    /// Sides of a subject to scan
    pub sides: Option<Sides>,

    /// Collocates kept per subject (0 = unlimited)
    pub per_subject_limit: Option<usize>,

    /// Counts at or below this are dropped from frequency output
    pub discard_threshold: Option<u64>,

    /// Length of ranked output (0 = unlimited)
    pub limit: Option<usize>,
}

/// Collocation window sides, as spelled on the command line and in files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Sides {
    /// Words before and after the subject
    Both,
    /// Only words after the subject
    Following,
    /// Only words before the subject
    Preceding,
}

impl From<Sides> for WindowSides {
    fn from(sides: Sides) -> Self {
        match sides {
            Sides::Both => WindowSides::Both,
            Sides::Following => WindowSides::Following,
            Sides::Preceding => WindowSides::Preceding,
        }
    }
}

/// Command-line engine settings that take precedence over the file
#[derive(Debug, Clone, Copy, Default)]
pub struct EngineOverrides {
    /// `--threads`
    pub threads: Option<usize>,
    /// `--chunk-size`
    pub chunk_size: Option<usize>,
}

impl CliConfig {
    /// Load a configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to load config file: {}", path.display()))
    }

    /// Load `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse TOML configuration text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CliError::ConfigError(e.to_string()).into())
    }

    /// Resolve the engine configuration, flags first
    pub fn engine_config(&self, overrides: EngineOverrides) -> Result<EngineConfig> {
        let mut builder = EngineConfig::builder();

        if let Some(size) = overrides.chunk_size.or(self.engine.chunk_size) {
            builder = builder.chunk_size(size);
        }
        let threads = overrides.threads.or(self.engine.threads).filter(|&t| t > 0);
        builder = builder.threads(threads);
        if let Some(retries) = self.engine.pool_retries {
            builder = builder.pool_retries(retries);
        }

        builder
            .build()
            .map_err(|e| CliError::ConfigError(e.to_string()).into())
    }
}

/// Turn a `0 = unlimited` setting into an optional limit
pub fn limit_setting(value: usize) -> Option<usize> {
    (value > 0).then_some(value)
}
