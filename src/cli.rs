//! Command-line interface definitions using clap

use std::path::Path;

use clap::{Parser, Subcommand};
use colored::Colorize;

use crate::config::StaticConfig;

/// tinylink - a minimal URL shortener
#[derive(Parser, Debug)]
#[command(name = "tinylink")]
#[command(version)]
#[command(about = "A minimal URL shortener service", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = "config.toml")]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

/// Configuration management commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Generate example configuration file
    Generate {
        /// Output path (default: config.example.toml)
        output_path: Option<String>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Write the default configuration as TOML.
pub fn config_generate(output_path: Option<String>, force: bool) -> anyhow::Result<()> {
    let path = output_path.unwrap_or_else(|| "config.example.toml".to_string());

    if !force && Path::new(&path).exists() {
        anyhow::bail!("File already exists: {} (use --force to overwrite)", path);
    }

    println!(
        "{} {}",
        "Generating configuration file...".yellow(),
        path.blue()
    );

    StaticConfig::default()
        .save_to_file(&path)
        .map_err(|e| anyhow::anyhow!("Failed to write {}: {}", path, e))?;

    println!(
        "  {} {}",
        "Configuration file generated successfully".green(),
        path.blue()
    );
    Ok(())
}
