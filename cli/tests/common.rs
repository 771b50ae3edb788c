//! # targz CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and pulls in what it needs.
//!

// Not every test file uses every helper.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// # Get targz Command (`targz_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `targz` binary.
///
/// ## Panics
/// Panics if the `targz` binary cannot be found via `Command::cargo_bin`.
pub fn targz_cmd() -> Command {
    Command::cargo_bin("targz").expect("Failed to find targz binary for testing")
}

/// Writes an empty configuration file under `dir` and returns its path, so
/// runs never pick up the user's or the project's configuration.
pub fn isolated_config(dir: &Path) -> PathBuf {
    let path = dir.join("targz.toml");
    fs::write(&path, "").expect("Failed to write test configuration");
    path
}

/// Writes `contents` to `path`, creating missing parent directories.
pub fn write_file(path: &Path, contents: impl AsRef<[u8]>) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent directory");
    }
    fs::write(path, contents).expect("Failed to write test file");
}

/// Lists everything below `root` as sorted `/`-separated relative paths,
/// with a trailing `/` on directories.
pub fn tree(root: &Path) -> Vec<String> {
    let mut entries: Vec<String> = WalkDir::new(root)
        .min_depth(1)
        .into_iter()
        .map(|entry| {
            let entry = entry.expect("Failed to walk extracted tree");
            let relative = entry
                .path()
                .strip_prefix(root)
                .expect("Walked path outside root")
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/");
            if entry.file_type().is_dir() {
                format!("{}/", relative)
            } else {
                relative
            }
        })
        .collect();
    entries.sort();
    entries
}
