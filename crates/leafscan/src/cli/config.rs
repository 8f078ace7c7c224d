//! The `leafscan config` command: inspect and bootstrap the config file.

use clap::{Args, Subcommand};
use leafscan_core::Config;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,

    /// Write a starter config file with defaults
    Init {
        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => show(),
        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
            Ok(())
        }
        ConfigCommand::Init { force } => init(force),
    }
}

/// Print the effective config, noting whether it came from disk or is the
/// built-in default. The note goes to stderr so stdout stays valid TOML.
fn show() -> anyhow::Result<()> {
    let path = Config::default_path();
    if path.exists() {
        eprintln!("# loaded from {}", path.display());
    } else {
        eprintln!("# no file at {} - showing built-in defaults", path.display());
    }
    let config = Config::load()?;
    print!("{}", config.to_toml()?);
    Ok(())
}

fn init(force: bool) -> anyhow::Result<()> {
    let path = Config::default_path();
    if path.exists() {
        if !force {
            anyhow::bail!(
                "{} already exists; pass --force to replace it",
                path.display()
            );
        }
        tracing::warn!("Replacing existing config at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // The written file keeps the API key as a ${GOOGLE_API_KEY} reference;
    // the secret itself never lands on disk.
    std::fs::write(&path, Config::default().to_toml()?)?;
    println!("Wrote starter config to {}", path.display());
    Ok(())
}
