//! # targz Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This file serves as the main entry point for the targz CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Routing execution to the `compress` / `extract` handlers
//!
//! ## Examples
//!
//! ```bash
//! # Pack a directory (entries are named relative to its parent)
//! targz compress ./data -o out/dest.tar.gz
//!
//! # Unpack it again, logging every entry
//! targz -v extract out/dest.tar.gz -o out/unpacked
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Route to the command handler (which loads configuration)
//! 4. Format and display any errors that occur
//!
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Handles the compress / extract subcommands.

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "targz",
    about = "📦 targz: pack and unpack .tar.gz archives",
    long_about = "Pack files and directories into gzip-compressed tar archives and unpack them again.\n\
                  Entry names are relative to a root directory so trees round-trip intact.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file to load instead of the user and project files.
    #[arg(long, global = true, env = "TARGZ_CONFIG")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Pack files and directories into a .tar.gz archive.
    #[command(alias = "c")]
    Compress(commands::compress::CompressArgs),
    /// Unpack a .tar.gz archive into a directory.
    #[command(alias = "x")]
    Extract(commands::extract::ExtractArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let config_path = cli.config;
    let command_result = match cli.command {
        Commands::Compress(args) => commands::compress::handle_compress(args, config_path).await,
        Commands::Extract(args) => commands::extract::handle_extract(args, config_path).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
