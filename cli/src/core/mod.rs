//! # targz Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module aggregates the infrastructure shared by the archive engine and
//! the command handlers:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types for the pipelines and the application layer
//!
pub mod config;
pub mod error;
