//! Leafscan CLI - Batch plant disease diagnosis pipeline.
//!
//! Points a vision language model at a folder of plant images and forwards
//! each diagnosis, together with the original image bytes, to a downstream
//! web application. One `run` invocation is one batch; nothing is persisted
//! locally.
//!
//! # Usage
//!
//! ```bash
//! # Diagnose a folder and submit results to the webapp
//! GOOGLE_API_KEY=... leafscan run ./images \
//!     --endpoint http://localhost:3001/api/analysis
//!
//! # Dry run against a local Ollama model, no endpoint configured
//! leafscan run ./images --llm ollama
//!
//! # Inspect or bootstrap the config file
//! leafscan config show
//! leafscan config init
//! ```

use anyhow::Context;
use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Leafscan - Batch plant disease diagnosis pipeline.
#[derive(Parser, Debug)]
#[command(name = "leafscan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Diagnose a folder of plant images and submit results to the webapp
    Run(cli::run::RunArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // A config file that exists but fails to load (bad TOML, invalid values)
    // aborts the run here, before logging is up and before any side effect.
    // Falling back to defaults would silently discard the configured endpoint
    // and credentials.
    let config = leafscan_core::Config::load().with_context(|| {
        format!(
            "failed to load configuration from {} — fix the file or remove it \
             to start from defaults",
            leafscan_core::Config::default_path().display()
        )
    })?;
    logging::init(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Leafscan v{}", leafscan_core::VERSION);

    match cli.command {
        Commands::Run(args) => cli::run::execute(args, config).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
