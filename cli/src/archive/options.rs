//! # targz Pipeline Options (`archive::options`)
//!
//! File: cli/src/archive/options.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Tunables for the compression and extraction pipelines.
//!

/// Default size of the transfer buffers, in bytes.
pub const DEFAULT_BUFFER_SIZE: usize = 2048;

/// Canonical double extension required on archive paths.
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Options for [`crate::archive::writer::compress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressOptions {
    /// Gzip level, 0 to 9. Values above 9 are clamped.
    pub level: u32,
    /// Archive directories without children instead of dropping them.
    pub include_empty_dirs: bool,
    /// Visit directory children sorted by file name rather than in listing order.
    pub sort_entries: bool,
    /// Read buffer size used when streaming file contents into the archive.
    pub buffer_size: usize,
}

impl Default for CompressOptions {
    fn default() -> Self {
        CompressOptions {
            level: 6,
            include_empty_dirs: false,
            sort_entries: false,
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Options for [`crate::archive::reader::decompress`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Copy buffer size used when writing extracted files.
    pub buffer_size: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            buffer_size: DEFAULT_BUFFER_SIZE,
        }
    }
}

/// Returns `true` when `path` names a file with the canonical archive extension.
pub fn has_archive_extension(path: &std::path::Path) -> bool {
    path.to_string_lossy().ends_with(ARCHIVE_EXTENSION)
}
