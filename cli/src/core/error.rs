//! # targz Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module defines the error types used throughout targz. The archive
//! pipelines return typed errors so callers can tell *why* an operation failed;
//! the application layer (configuration, command handlers) uses `anyhow` for
//! flexible context chaining.
//!
//! ## Architecture
//!
//! - `CompressError`: failures of the compression pipeline (`archive::writer`).
//! - `DecompressError`: failures of the extraction pipeline (`archive::reader`).
//! - `TargzError`: application-level errors (configuration, argument handling).
//! - `Result<T>`: alias for `anyhow::Result<T>` used by the application layer.
//!
//! Precondition violations (`InvalidDestination`, `InputNotFound`,
//! `InvalidInput`) are detected before any stream is opened and leave no
//! output behind. `Io` variants always carry the triggering `std::io::Error`.
//! Partially written output (a truncated archive, a half-extracted tree) is
//! never cleaned up.
//!
//! ## Examples
//!
//! ```rust
//! use targz::core::error::CompressError;
//!
//! # fn check(result: Result<(), CompressError>) {
//! match result {
//!     Ok(()) => println!("done"),
//!     Err(CompressError::InvalidDestination { path, reason }) => {
//!         eprintln!("refusing to write {}: {}", path.display(), reason);
//!     }
//!     Err(e) => eprintln!("compression failed: {e}"),
//! }
//! # }
//! ```
//!
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while building an archive.
#[derive(Error, Debug)]
pub enum CompressError {
    #[error("Invalid destination '{}': {reason}", path.display())]
    InvalidDestination { path: PathBuf, reason: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl CompressError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        CompressError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Errors produced while unpacking an archive.
#[derive(Error, Debug)]
pub enum DecompressError {
    #[error("Archive '{}' does not exist", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Invalid archive '{}': {reason}", path.display())]
    InvalidInput { path: PathBuf, reason: String },

    /// An entry name that would land outside the output root.
    #[error("Archive entry '{name}' escapes the output directory")]
    UnsafeEntry { name: String },

    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl DecompressError {
    pub(crate) fn io(context: impl Into<String>, source: io::Error) -> Self {
        DecompressError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Application-level errors raised outside the archive pipelines.
#[derive(Error, Debug)]
pub enum TargzError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

/// Type alias for Result using anyhow::Error, used by config loading and commands.
pub type Result<T> = anyhow::Result<T>;
