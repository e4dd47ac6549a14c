//! PageWire CLI - Bridge interface for the renderer plugin
//!
//! Commands: run, check
//! Outputs JSON to stdout
//! Returns non-zero on validation failure

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use pagewire_core::{script, CommandQueue, GenerationReport};

#[derive(Parser)]
#[command(name = "pagewire-cli")]
#[command(about = "PageWire CLI - Print Command Compiler")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a command script and print the generation report
    Run {
        /// Path to the JSON command script
        #[arg(short, long)]
        script: PathBuf,

        /// Compact instead of pretty-printed output
        #[arg(long)]
        compact: bool,
    },

    /// Run a command script and print only success and checksum
    Check {
        /// Path to the JSON command script
        #[arg(short, long)]
        script: PathBuf,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { script, compact } => {
            let report = match generate(&script) {
                Ok(report) => report,
                Err(exit) => return exit,
            };

            let rendered = if compact {
                serde_json::to_string(&report)
            } else {
                serde_json::to_string_pretty(&report)
            };
            match rendered {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!(r#"{{"error": "Failed to serialize report: {}"}}"#, e);
                    return ExitCode::FAILURE;
                }
            }
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2) // Validation failure
            }
        }

        Commands::Check { script } => {
            let report = match generate(&script) {
                Ok(report) => report,
                Err(exit) => return exit,
            };
            println!(
                "{}",
                serde_json::json!({
                    "success": report.success,
                    "commands": report.commands.len(),
                    "checksum": report.checksum,
                    "messages": report.messages,
                })
            );
            if report.success {
                ExitCode::SUCCESS
            } else {
                ExitCode::from(2)
            }
        }
    }
}

/// Loads and runs `path`, converting every failure into a report.
fn generate(path: &PathBuf) -> Result<GenerationReport, ExitCode> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!(r#"{{"error": "Failed to read script: {}"}}"#, e);
            return Err(ExitCode::FAILURE);
        }
    };

    let parsed = match script::Script::from_json(&content) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!(r#"{{"error": "Invalid script: {}"}}"#, e);
            return Err(ExitCode::FAILURE);
        }
    };

    let mut queue = CommandQueue::new();
    match script::run(&mut queue, &parsed) {
        Ok(()) => match GenerationReport::from_queue(&queue) {
            Ok(report) => Ok(report),
            Err(e) => {
                eprintln!(r#"{{"error": "Failed to build report: {}"}}"#, e);
                Err(ExitCode::FAILURE)
            }
        },
        // One invalid command invalidates the whole stream: the run layer
        // aborts and reports the failure.
        Err(e) => Ok(GenerationReport::from_error(&e)),
    }
}
