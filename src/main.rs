use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use pcdindex::cli::{Cli, Commands};
use pcdindex::config::Config;
use pcdindex::logging::init_logging;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let project_root = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    // Fall back to defaults so a broken config still reaches the command's error
    let config = Config::load(&project_root).unwrap_or_default();

    // The guard must live until exit or buffered file logs are lost
    let _logging_guard = init_logging(&config.logging, &project_root)?;

    tracing::info!("pcdindex starting up");
    tracing::debug!("Loaded configuration from: {}", project_root.display());

    match cli.command {
        Commands::Init => {
            pcdindex::commands::init::run().await?;
        }
        Commands::Index { list } => {
            pcdindex::commands::index::run(list).await?;
        }
        Commands::Definition {
            symbol,
            file,
            line,
            character,
        } => {
            pcdindex::commands::definition::run(symbol, file, line, character).await?;
        }
        Commands::Complete { partial, mode } => {
            pcdindex::commands::complete::run(&partial, mode).await?;
        }
        Commands::Watch { debounce_ms } => {
            pcdindex::commands::watch::run(debounce_ms).await?;
        }
        Commands::Serve { no_watch } => {
            pcdindex::commands::serve::run(no_watch).await?;
        }
    }

    Ok(())
}
