//! # targz Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the targz CLI. Each subcommand
//! defines its own arguments struct and an async handler that loads the
//! configuration, builds the request, and runs the archive pipeline on the
//! blocking thread pool.
//!
//! - `compress`: Pack files and directories into a `.tar.gz` archive
//! - `extract`: Unpack a `.tar.gz` archive
//!

/// `targz compress`: arguments and handler.
pub mod compress;
/// `targz extract`: arguments and handler.
pub mod extract;
