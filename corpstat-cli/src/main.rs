//! corpstat command-line entry point

use clap::Parser;
use corpstat_cli::commands::Commands;
use std::process::ExitCode;

/// Chunked parallel corpus statistics
#[derive(Debug, Parser)]
#[command(name = "corpstat", author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            // Engine errors already carry their causes in the message
            let mut message = err.to_string();
            for cause in err.chain().skip(1) {
                let cause = cause.to_string();
                if !message.contains(&cause) {
                    message = format!("{message}: {cause}");
                }
            }
            eprintln!("Error: {message}");
            ExitCode::FAILURE
        }
    }
}
