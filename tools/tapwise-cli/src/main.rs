//! Tapwise CLI: command-line interface for touch gesture classification.
//!
//! Usage:
//!   tapwise replay <SCRIPT>      Classify a recorded touch script
//!   tapwise validate <SCRIPT>    Check a touch script for contract violations
//!   tapwise config               Show (or create) the configuration file

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tapwise_common::config::AppConfig;

mod commands;

#[derive(Parser)]
#[command(
    name = "tapwise",
    about = "Touch gesture classification for recorded and live touch streams",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Configuration file (defaults to the standard location)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a touch script through the classifier
    Replay {
        /// Path to the touch script (JSONL)
        script: PathBuf,

        /// Write gestures to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Pace the script in real time instead of replaying instantly
        #[arg(long)]
        live: bool,

        /// Seconds to keep running after the last batch
        #[arg(long)]
        settle: Option<f64>,
    },

    /// Validate a touch script
    Validate {
        /// Path to the touch script (JSONL)
        script: PathBuf,
    },

    /// Show the active configuration
    Config {
        /// Write the default configuration to the config file
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .map_err(|e| anyhow::anyhow!("Failed to load config {}: {e}", path.display()))?,
        None => AppConfig::load(),
    };

    // Initialize logging
    let mut logging = config.logging.clone();
    if cli.verbose {
        logging.level = "debug".to_string();
    }
    tapwise_common::logging::init_logging(&logging);

    match cli.command {
        Commands::Replay {
            script,
            output,
            live,
            settle,
        } => commands::replay::run(&config, script, output, live, settle).await,
        Commands::Validate { script } => commands::validate::run(script),
        Commands::Config { init } => commands::config::run(&config, cli.config, init),
    }
}
