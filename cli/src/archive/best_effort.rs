//! # targz Best-Effort Wrappers (`archive::best_effort`)
//!
//! File: cli/src/archive/best_effort.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Log-and-continue wrappers around the archive pipelines.
//!
//! These helpers run with default options and report failure as `false`
//! after logging the error through `tracing`. Use [`crate::archive::writer`]
//! and [`crate::archive::reader`] directly when the caller needs to know what
//! went wrong.
//!
use crate::archive::options::{CompressOptions, ExtractOptions};
use crate::archive::progress::{CompressionListener, DecompressionListener};
use crate::archive::reader::{self, ExtractionRequest};
use crate::archive::writer::{self, ArchiveRequest};
use std::path::Path;
use tracing::error;

/// Compresses `sources` into `destination`; returns whether it worked.
pub fn compress<S: AsRef<Path>>(
    root: &Path,
    sources: &[S],
    destination: &Path,
    listener: Option<&mut dyn CompressionListener>,
) -> bool {
    let result = ArchiveRequest::new(root, sources, destination)
        .and_then(|request| writer::compress(&request, &CompressOptions::default(), listener));
    match result {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Compression of {} failed: {:#}",
                destination.display(),
                anyhow::Error::new(e)
            );
            false
        }
    }
}

/// Extracts `archive` below `output_root`; returns whether it worked.
pub fn decompress(
    archive: &Path,
    output_root: &Path,
    listener: Option<&mut dyn DecompressionListener>,
) -> bool {
    let result = ExtractionRequest::new(archive, output_root)
        .and_then(|request| reader::decompress(&request, &ExtractOptions::default(), listener));
    match result {
        Ok(_) => true,
        Err(e) => {
            error!(
                "Decompression of {} failed: {:#}",
                archive.display(),
                anyhow::Error::new(e)
            );
            false
        }
    }
}
