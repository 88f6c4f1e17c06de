//! CLI command implementations

use anyhow::Result;
use clap::Subcommand;

pub mod analyze;
pub mod generate_config;

pub use analyze::{
    AnalysisCommand, CollocateArgs, CommonArgs, FrequencyArgs, GeneralCollocateArgs,
    TransitionsArgs,
};
pub use generate_config::GenerateConfigArgs;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Count n-gram frequencies
    Frequency(FrequencyArgs),

    /// Count part-of-speech tag transitions
    Transitions(TransitionsArgs),

    /// Find collocates of the given subject words
    Collocate(CollocateArgs),

    /// Find collocates of the most frequent words
    GeneralCollocate(GeneralCollocateArgs),

    /// Write a configuration template
    GenerateConfig(GenerateConfigArgs),
}

impl Commands {
    /// Execute the selected command
    pub fn execute(&self) -> Result<()> {
        match self {
            Commands::Frequency(args) => args.execute(),
            Commands::Transitions(args) => args.execute(),
            Commands::Collocate(args) => args.execute(),
            Commands::GeneralCollocate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
        }
    }
}
