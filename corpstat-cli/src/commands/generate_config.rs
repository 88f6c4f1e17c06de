//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", required = true)]
    pub output: PathBuf,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        fs::write(&self.output, Self::template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("Configuration template written to {}", self.output.display());
        println!("Use it with:");
        println!(
            "   corpstat frequency -i corpus/ --config {}",
            self.output.display()
        );

        Ok(())
    }

    /// Configuration template with the built-in defaults
    pub fn template() -> &'static str {
        r#"# corpstat configuration
#
# Command-line flags take precedence over the values below.

[engine]
# Sentences per chunk
chunk_size = 10000

# Worker threads (0 = one per CPU)
threads = 0

# Worker pool build retries
pool_retries = 2

[analysis]
# N-gram length for `frequency`
n = 1

# Maximum collocate length in tokens
window = 2

# Sides of a subject to scan: "both", "following" or "preceding"
sides = "both"

# Subjects for `general-collocate`
top_k = 1000

# Collocates kept per subject by `general-collocate` (0 = all)
per_subject_limit = 100

# N-grams seen this many times or fewer are dropped by `frequency`
discard_threshold = 0

# Length of ranked output (0 = all)
limit = 0
"#
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CliConfig, Sides};
    use tempfile::TempDir;

    #[test]
    fn test_template_parses_to_defaults() {
        let config = CliConfig::parse(GenerateConfigArgs::template()).unwrap();
        assert_eq!(config.engine.chunk_size, Some(10_000));
        assert_eq!(config.analysis.sides, Some(Sides::Both));
        assert_eq!(config.analysis.top_k, Some(1000));
    }

    #[test]
    fn test_execute_success() {
        let temp_dir = TempDir::new().unwrap();
        let output_path = temp_dir.path().join("corpstat.toml");

        let args = GenerateConfigArgs {
            output: output_path.clone(),
        };

        assert!(args.execute().is_ok());
        let content = std::fs::read_to_string(&output_path).unwrap();
        assert!(content.contains("[engine]"));
        assert!(content.contains("[analysis]"));
    }
}
