//! # targz Library
//!
//! File: cli/src/lib.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! The archive engine behind the `targz` binary: pack files and directories
//! into `.tar.gz` archives and unpack them again, with progress hooks.
//!
//! - `archive`: naming, writer, reader, progress hooks, best-effort wrappers
//! - `core`: configuration and error types
//!
pub mod archive;
pub mod core;
