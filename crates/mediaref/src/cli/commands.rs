//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Mediaref - keep media references renderable
#[derive(Parser, Debug)]
#[command(name = "mediaref")]
#[command(about = "Resolve, repair and encode media references", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to bundled, home and ./mediaref.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Hydrate every item in a JSON file and report the outcome
    Hydrate {
        /// Path to a JSON array of content items
        #[arg(long)]
        items: PathBuf,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Resolve a single item
    Resolve {
        /// Path to a JSON array of content items
        #[arg(long)]
        items: PathBuf,

        /// ID of the content item
        id: String,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Print a file as a data URL
    Encode {
        /// File to encode
        file: PathBuf,

        /// MIME type to use instead of the inferred one
        #[arg(long)]
        mime: Option<String>,
    },

    /// Print the MIME type inferred from a path's extension
    Mime {
        /// File path or name
        path: String,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
