//! # targz Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! This module implements loading, merging, validation, and access to the
//! targz configuration. Configuration only carries tunables (compression level,
//! transfer buffer sizes, traversal behavior, a default extraction directory);
//! every value can be overridden per invocation from the command line.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file passed via `--config` / `TARGZ_CONFIG` (when given, the
//!    two sources below are not consulted)
//! 2. Project-specific `.targz.toml` in the current directory or ancestors
//! 3. User-specific `<config dir>/targz/config.toml`
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [compress]
//! level = 9
//! sort_entries = true
//!
//! [extract]
//! output_dir = "~/unpacked"
//! ```
//!
//! ```no_run
//! use targz::core::config;
//!
//! # fn main() -> anyhow::Result<()> {
//! let cfg = config::load_config(None)?;
//! let options = cfg.compress.to_options();
//! println!("compressing at level {}", options.level);
//! # Ok(())
//! # }
//! ```
//!
use crate::archive::options::{CompressOptions, ExtractOptions, DEFAULT_BUFFER_SIZE};
use crate::core::error::{Result, TargzError};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub compress: CompressConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Settings for `targz compress`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CompressConfig {
    /// Gzip level, 0 (store) to 9 (best).
    #[serde(default = "default_level")]
    pub level: u32,
    /// Write entries for directories that have no children.
    #[serde(default)]
    pub include_empty_dirs: bool,
    /// Visit directory children sorted by file name instead of listing order.
    #[serde(default)]
    pub sort_entries: bool,
    /// Size of the read buffer used when streaming file contents.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
}

/// Settings for `targz extract`.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExtractConfig {
    /// Size of the copy buffer used when writing extracted files.
    #[serde(default = "default_buffer_size")]
    pub buffer_size: usize,
    /// Where `extract` unpacks to when `--output` is not given (can use ~).
    #[serde(default)]
    pub output_dir: Option<String>,
}

fn default_level() -> u32 {
    6
}
fn default_buffer_size() -> usize {
    DEFAULT_BUFFER_SIZE
}

impl Default for CompressConfig {
    fn default() -> Self {
        CompressConfig {
            level: default_level(),
            include_empty_dirs: false,
            sort_entries: false,
            buffer_size: default_buffer_size(),
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        ExtractConfig {
            buffer_size: default_buffer_size(),
            output_dir: None,
        }
    }
}

impl CompressConfig {
    /// Converts the configured values into pipeline options.
    pub fn to_options(&self) -> CompressOptions {
        CompressOptions {
            level: self.level,
            include_empty_dirs: self.include_empty_dirs,
            sort_entries: self.sort_entries,
            buffer_size: self.buffer_size,
        }
    }
}

impl ExtractConfig {
    pub fn to_options(&self) -> ExtractOptions {
        ExtractOptions {
            buffer_size: self.buffer_size,
        }
    }
}

const PROJECT_CONFIG_FILENAME: &str = ".targz.toml";

/// Loads, merges, expands and validates the configuration.
///
/// When `explicit` names a file, that file alone is layered over the
/// defaults; otherwise the user and project files are looked up.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut merged = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut merged);
    validate_config(&merged).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged);
    Ok(merged)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(proj_dirs) = ProjectDirs::from("com", "targz", "targz") else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = proj_dirs.config_dir().join("config.toml");
    if config_path.exists() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    match find_project_config_path(&current_dir) {
        Some(path) => {
            info!("Loading project configuration from: {}", path.display());
            load_config_from_path(&path).map(Some)
        }
        None => {
            debug!("No {} found in current directory or ancestors.", PROJECT_CONFIG_FILENAME);
            Ok(None)
        }
    }
}

/// Walks up from `start` looking for `.targz.toml`, stopping at a `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win wherever they differ from the defaults.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    let defaults = Config::default();
    let mut merged = user;

    if project.compress.level != defaults.compress.level {
        merged.compress.level = project.compress.level;
    }
    if project.compress.include_empty_dirs {
        merged.compress.include_empty_dirs = true;
    }
    if project.compress.sort_entries {
        merged.compress.sort_entries = true;
    }
    if project.compress.buffer_size != defaults.compress.buffer_size {
        merged.compress.buffer_size = project.compress.buffer_size;
    }
    if project.extract.buffer_size != defaults.extract.buffer_size {
        merged.extract.buffer_size = project.extract.buffer_size;
    }
    merged.extract.output_dir = project.extract.output_dir.or(merged.extract.output_dir);
    merged
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = config.extract.output_dir.as_mut() {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded extract output directory: {}", dir);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if config.compress.level > 9 {
        return Err(anyhow!(TargzError::Config(format!(
            "Invalid compression level {}. Expected a value between 0 and 9.",
            config.compress.level
        ))));
    }
    if config.compress.buffer_size == 0 || config.extract.buffer_size == 0 {
        return Err(anyhow!(TargzError::Config(
            "buffer_size must be greater than zero.".to_string()
        )));
    }
    if let Some(dir) = &config.extract.output_dir {
        if dir.is_empty() {
            return Err(anyhow!(TargzError::Config(
                "extract.output_dir cannot be empty.".to_string()
            )));
        }
    }
    Ok(())
}
