//! notesync CLI - blog to Notion publishing engine.
//!
//! Provides commands for:
//! - `sync`: Publish blog posts (and blogroll links) to Notion databases
//! - `convert`: Convert a markdown file to Notion block JSON
//! - `check-images`: Validate embedded image URLs

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckImagesArgs, ConvertArgs, SyncArgs};
use output::Output;

/// notesync - blog to Notion publishing engine.
#[derive(Parser)]
#[command(name = "notesync", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish posts and links to Notion.
    Sync(SyncArgs),
    /// Convert a markdown file to Notion block JSON.
    Convert(ConvertArgs),
    /// Validate embedded image URLs.
    CheckImages(CheckImagesArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Commands::Sync(args) => args.execute(&output),
        Commands::Convert(args) => args.execute(&output),
        Commands::CheckImages(args) => args.execute(&output),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
