//! Mediaref CLI binary.
//!
//! This binary provides command-line access to the resolution engine:
//! - Hydrate a JSON file of content items and report per-item outcomes
//! - Repair a single item on demand
//! - Encode files as data URLs and inspect inferred MIME types

use clap::Parser;
use mediaref::{MediarefConfig, init_logging};

mod cli;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    use cli::{Cli, Commands, encode_file, handle_hydrate, handle_resolve, print_mime};

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => MediarefConfig::from_file(path)?,
        None => MediarefConfig::load()?,
    };

    // Initialize tracing
    let logging = if cli.verbose {
        config.logging().clone().with_level("debug")
    } else {
        config.logging().clone()
    };
    init_logging(&logging)?;

    // Execute the requested command
    match cli.command {
        Commands::Hydrate { items, format } => {
            handle_hydrate(&config, &items, format).await?;
        }

        Commands::Resolve { items, id, format } => {
            handle_resolve(&config, &items, &id, format).await?;
        }

        Commands::Encode { file, mime } => {
            encode_file(&config, &file, mime.as_deref()).await?;
        }

        Commands::Mime { path } => {
            print_mime(&config, &path);
        }
    }

    Ok(())
}
