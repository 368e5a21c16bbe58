use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use fabula_core::AppConfig;
use fabula_infrastructure::{FabulaPaths, config_storage};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "fabula")]
#[command(about = "Fabula - emoji story sessions with a crash-safe local history", long_about = None)]
struct Cli {
    /// Overrides the directory holding the session log.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw emojis, attach a note, and save the session
    New {
        /// Number of emojis to draw (1-10)
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
        /// Note to attach to the session
        #[arg(long, default_value = "")]
        note: String,
        /// Generate a story from the emojis before saving
        #[arg(long)]
        story: bool,
        /// Ollama model to generate with (defaults to the configured one)
        #[arg(long)]
        model: Option<String>,
    },
    /// Show every saved session
    History {
        /// Print the history as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },
    /// Check the local Ollama service and list pulled models
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = config_storage::load_config()?;
    let data_dir = resolve_data_dir(&cli, &config)?;

    match cli.command {
        Commands::New {
            count,
            note,
            story,
            model,
        } => commands::new::run(&config, &data_dir, count, note, story, model).await,
        Commands::History { json } => commands::history::run(&config, &data_dir, json),
        Commands::Status => commands::status::run(&config).await,
    }
}

fn resolve_data_dir(cli: &Cli, config: &AppConfig) -> Result<PathBuf> {
    if let Some(dir) = &cli.data_dir {
        return Ok(dir.clone());
    }
    if let Some(dir) = &config.data_dir {
        return Ok(dir.clone());
    }
    FabulaPaths::data_dir().map_err(|e| anyhow::anyhow!("Failed to resolve data directory: {}", e))
}
