//! # targz Archive Engine (`archive`)
//!
//! File: cli/src/archive/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module packs files and directories into gzip-compressed tar archives
//! and unpacks them again. Both directions share one naming convention and
//! report progress through listener hooks.
//!
//! ## Architecture
//!
//! - **`naming`**: Root-relative, `/`-separated entry names.
//! - **`entry`**: Entry headers and their tar representation.
//! - **`stream`**: Opening and finishing the gzip tar streams.
//! - **`writer`**: The compression pipeline (`compress`).
//! - **`reader`**: The extraction pipeline (`decompress`).
//! - **`progress`**: Listener traits and ready-made listeners.
//! - **`options`**: Tunables for both pipelines.
//! - **`best_effort`**: Wrappers that log failures instead of returning them.
//!
//! ## Usage
//!
//! ```no_run
//! use targz::archive::{reader, writer};
//! use targz::archive::options::{CompressOptions, ExtractOptions};
//! use targz::archive::progress::EventLog;
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut events = EventLog::default();
//! let request = writer::ArchiveRequest::new("data", ["data/input"], "out/dest.tar.gz")?;
//! writer::compress(&request, &CompressOptions::default(), Some(&mut events))?;
//!
//! let request = reader::ExtractionRequest::new("out/dest.tar.gz", "out/unpacked")?;
//! reader::decompress(&request, &ExtractOptions::default(), Some(&mut events))?;
//! # Ok(())
//! # }
//! ```
//!

pub mod best_effort;
pub mod entry;
pub mod naming;
pub mod options;
pub mod progress;
pub mod reader;
pub mod stream;
pub mod writer;

/// Counts reported by a successful compress or extract run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    /// File entries written or extracted.
    pub files: usize,
    /// Directory entries written or extracted.
    pub directories: usize,
    /// Payload bytes of all file entries.
    pub bytes: u64,
}
