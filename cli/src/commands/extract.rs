//! # targz Extract Command
//!
//! File: cli/src/commands/extract.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Implements `targz extract`, which unpacks a `.tar.gz` archive.
//! The output directory is taken from `--output`, then from
//! `extract.output_dir` in the configuration, then the current directory.
//!
//! ```bash
//! targz extract release.tar.gz -o /tmp/release
//! ```
//!
use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use targz::archive::progress::TracingListener;
use targz::archive::reader::{self, ExtractionRequest};
use targz::core::config::{self, ExtractConfig};
use targz::core::error::Result;
use tracing::{debug, info};

/// # Extract Arguments (`ExtractArgs`)
#[derive(Parser, Debug)]
pub struct ExtractArgs {
    /// Archive to unpack. Must end in `.tar.gz`.
    archive: PathBuf,

    /// Directory to unpack into; created if missing.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

/// # Handle Extract Command (`handle_extract`)
///
/// Unpacks the archive named in `args`. Files that already exist in the
/// output directory are overwritten; on failure, whatever was extracted so
/// far stays on disk.
pub async fn handle_extract(args: ExtractArgs, config_path: Option<PathBuf>) -> Result<()> {
    info!("Handling extract command...");
    let cfg = config::load_config(config_path.as_deref())
        .context("Failed to load targz configuration")?;
    let output = resolve_output(args.output, &cfg.extract);
    let options = cfg.extract.to_options();
    debug!("Extracting into {} with {:?}", output.display(), options);

    let request = ExtractionRequest::new(&args.archive, &output)?;
    let stats = tokio::task::spawn_blocking(move || {
        let mut listener = TracingListener;
        reader::decompress(&request, &options, Some(&mut listener))
    })
    .await
    .context("Extraction task failed to complete")?
    .with_context(|| format!("Failed to extract '{}'", args.archive.display()))?;

    println!(
        "Extracted {} into {} ({} files, {} directories, {} bytes)",
        args.archive.display(),
        output.display(),
        stats.files,
        stats.directories,
        stats.bytes
    );
    Ok(())
}

fn resolve_output(flag: Option<PathBuf>, cfg: &ExtractConfig) -> PathBuf {
    flag.or_else(|| cfg.output_dir.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("."))
}
