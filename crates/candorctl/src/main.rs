//! Candor Control - administrative CLI for the confidence gate.
//!
//! Inspects and edits the configuration the hooks read, manages the
//! session notes log, and reports where everything lives on disk.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "candorctl")]
#[command(about = "Candor - confidence gating for assistant turns", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show resolved settings and file locations
    Status,

    /// Show or change gate settings
    Config {
        /// Set a value (minConfidence=N or verbose=true|false)
        #[arg(long)]
        set: Option<String>,

        /// Write to the project-local config instead of the global one
        #[arg(long)]
        local: bool,
    },

    /// Append a session note
    Note {
        /// Note text
        message: Vec<String>,
    },

    /// List recent session notes
    Notes {
        /// Maximum entries to show
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => commands::status(),
        Commands::Config { set, local } => commands::config(set, local),
        Commands::Note { message } => commands::note(message.join(" ")),
        Commands::Notes { limit } => commands::notes(limit),
    }
}
