//! # targz Progress Hooks (`archive::progress`)
//!
//! File: cli/src/archive/progress.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The writer and the reader report progress through two listener traits, one
//! per direction. A listener is passed to each call (`Option<&mut dyn ...>`);
//! there is no global registry. Hooks run synchronously on the calling thread,
//! in the order the entries are processed, and the operation waits for each
//! hook to return.
//!
//! Directories and files have separate hooks. Every hook has an empty default
//! body, so implementors only override what they care about.
//!
//! ## Provided listeners
//!
//! - [`EventLog`]: records every hook as a [`ProgressEvent`], per direction.
//! - [`TracingListener`]: logs every hook at `info` level.
//!
//! ```
//! use targz::archive::progress::{CompressionListener, ProgressEvent, EventLog};
//! use std::path::Path;
//!
//! let mut log = EventLog::default();
//! log.on_compression_start();
//! log.on_file_compressed(Path::new("/data/a.txt"), "a.txt");
//! assert_eq!(log.compression[1], ProgressEvent::FileDone("a.txt".into()));
//! ```
//!
use std::path::Path;
use tracing::info;

/// Hooks invoked by [`crate::archive::writer::compress`].
///
/// `path` is the source on disk, `name` the entry name inside the archive.
pub trait CompressionListener {
    /// Called once, after the destination is opened and before any source is read.
    fn on_compression_start(&mut self) {}

    /// Called after a directory entry has been written, before its children.
    fn on_directory_compressed(&mut self, _path: &Path, _name: &str) {}

    /// Called after a file's entry and contents have been written.
    fn on_file_compressed(&mut self, _path: &Path, _name: &str) {}

    /// Called once, after the archive has been finished and flushed.
    fn on_compression_complete(&mut self) {}
}

/// Hooks invoked by [`crate::archive::reader::decompress`].
///
/// `name` is the entry name inside the archive, without a trailing slash.
pub trait DecompressionListener {
    fn on_decompression_start(&mut self) {}

    fn on_directory_decompressed(&mut self, _name: &str) {}

    fn on_file_decompressed(&mut self, _name: &str) {}

    fn on_decompression_complete(&mut self) {}
}

/// Listener used when the caller passes none.
pub(crate) struct Silent;

impl CompressionListener for Silent {}
impl DecompressionListener for Silent {}

/// One progress notification, independent of direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    Start,
    DirectoryDone(String),
    FileDone(String),
    Complete,
}

/// Records the events of both directions in delivery order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct EventLog {
    pub compression: Vec<ProgressEvent>,
    pub decompression: Vec<ProgressEvent>,
}

impl CompressionListener for EventLog {
    fn on_compression_start(&mut self) {
        self.compression.push(ProgressEvent::Start);
    }

    fn on_directory_compressed(&mut self, _path: &Path, name: &str) {
        self.compression
            .push(ProgressEvent::DirectoryDone(name.to_string()));
    }

    fn on_file_compressed(&mut self, _path: &Path, name: &str) {
        self.compression.push(ProgressEvent::FileDone(name.to_string()));
    }

    fn on_compression_complete(&mut self) {
        self.compression.push(ProgressEvent::Complete);
    }
}

impl DecompressionListener for EventLog {
    fn on_decompression_start(&mut self) {
        self.decompression.push(ProgressEvent::Start);
    }

    fn on_directory_decompressed(&mut self, name: &str) {
        self.decompression
            .push(ProgressEvent::DirectoryDone(name.to_string()));
    }

    fn on_file_decompressed(&mut self, name: &str) {
        self.decompression
            .push(ProgressEvent::FileDone(name.to_string()));
    }

    fn on_decompression_complete(&mut self) {
        self.decompression.push(ProgressEvent::Complete);
    }
}

/// Logs every hook through `tracing`. Visible with `targz -v`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingListener;

impl CompressionListener for TracingListener {
    fn on_compression_start(&mut self) {
        info!("Started compression.");
    }

    fn on_directory_compressed(&mut self, _path: &Path, name: &str) {
        info!("Compressed directory {}/", name);
    }

    fn on_file_compressed(&mut self, _path: &Path, name: &str) {
        info!("Compressed {}", name);
    }

    fn on_compression_complete(&mut self) {
        info!("Finished compression.");
    }
}

impl DecompressionListener for TracingListener {
    fn on_decompression_start(&mut self) {
        info!("Started decompression.");
    }

    fn on_directory_decompressed(&mut self, name: &str) {
        info!("Decompressed directory {}/", name);
    }

    fn on_file_decompressed(&mut self, name: &str) {
        info!("Decompressed file {}", name);
    }

    fn on_decompression_complete(&mut self) {
        info!("Finished decompression.");
    }
}
