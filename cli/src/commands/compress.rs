//! # targz Compress Command
//!
//! File: cli/src/commands/compress.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `targz compress`, which packs files and directories into a
//! `.tar.gz` archive.
//!
//! ## Workflow
//!
//! 1. Load configuration and merge it with the command-line flags
//! 2. Resolve the naming root (`--root`, or the common parent of the sources)
//! 3. Validate the destination (`ArchiveRequest::new`)
//! 4. Run the writer on the blocking pool, logging progress through `tracing`
//! 5. Print a one-line summary
//!
//! ## Examples
//!
//! ```bash
//! targz compress ./src ./docs -o release.tar.gz
//! targz compress /srv/app/logs --root /srv -o logs.tar.gz --level 9 --sort
//! ```
//!
use anyhow::{anyhow, Context};
use clap::Parser;
use std::path::PathBuf;
use targz::archive::naming;
use targz::archive::options::CompressOptions;
use targz::archive::progress::TracingListener;
use targz::archive::writer::{self, ArchiveRequest};
use targz::core::config::{self, CompressConfig};
use targz::core::error::{Result, TargzError};
use tracing::{debug, info};

/// # Compress Arguments (`CompressArgs`)
///
/// Command-line arguments accepted by `targz compress`. Flags override the
/// `[compress]` section of the configuration.
#[derive(Parser, Debug)]
pub struct CompressArgs {
    /// Files or directories to archive, in order.
    #[arg(required = true)]
    sources: Vec<PathBuf>,

    /// Archive to create. Must end in `.tar.gz`; an existing file is overwritten.
    #[arg(short, long)]
    output: PathBuf,

    /// Directory that entry names are relative to.
    /// Defaults to the deepest common parent of the sources.
    #[arg(long)]
    root: Option<PathBuf>,

    /// Gzip compression level (0-9).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(0..=9))]
    level: Option<u32>,

    /// Also archive directories that have no children.
    #[arg(long)]
    include_empty_dirs: bool,

    /// Visit directory children in file-name order.
    #[arg(long)]
    sort: bool,
}

/// # Handle Compress Command (`handle_compress`)
///
/// Builds the archive described by `args`.
///
/// ## Errors
///
/// Returns an `Err` if the configuration cannot be loaded, a source path
/// cannot be resolved, the destination is rejected, or the writer fails.
pub async fn handle_compress(args: CompressArgs, config_path: Option<PathBuf>) -> Result<()> {
    info!("Handling compress command...");
    let cfg = config::load_config(config_path.as_deref())
        .context("Failed to load targz configuration")?;
    let options = resolve_options(&args, &cfg.compress);
    debug!("Compression options: {:?}", options);

    let sources = args
        .sources
        .iter()
        .map(|source| {
            std::path::absolute(source)
                .map(|absolute| naming::normalize(&absolute))
                .with_context(|| format!("Failed to resolve source '{}'", source.display()))
        })
        .collect::<Result<Vec<_>>>()?;
    let root = match args.root {
        Some(root) => root,
        None => naming::common_root(&sources).ok_or_else(|| {
            anyhow!(TargzError::ArgumentParsing(
                "At least one source is required.".to_string()
            ))
        })?,
    };
    debug!("Naming entries relative to {}", root.display());

    let request = ArchiveRequest::new(&root, &sources, &args.output)?;
    let stats = tokio::task::spawn_blocking(move || {
        let mut listener = TracingListener;
        writer::compress(&request, &options, Some(&mut listener))
    })
    .await
    .context("Compression task failed to complete")?
    .with_context(|| format!("Failed to create archive '{}'", args.output.display()))?;

    println!(
        "Created {} ({} files, {} directories, {} bytes)",
        args.output.display(),
        stats.files,
        stats.directories,
        stats.bytes
    );
    Ok(())
}

/// Layers the command-line flags over the configured defaults.
fn resolve_options(args: &CompressArgs, cfg: &CompressConfig) -> CompressOptions {
    let mut options = cfg.to_options();
    if let Some(level) = args.level {
        options.level = level;
    }
    options.include_empty_dirs |= args.include_empty_dirs;
    options.sort_entries |= args.sort;
    options
}
