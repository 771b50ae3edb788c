//! # targz Entry Headers (`archive::entry`)
//!
//! File: cli/src/archive/entry.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Archive entry headers and their mapping onto tar headers. Directories are
//! stored with a trailing `/` and mode `0755`, files with mode `0644`.
//!
use std::path::Path;
use std::time::UNIX_EPOCH;

/// Name, kind and payload size of one archive entry.
///
/// `relative_name` follows the conventions of [`crate::archive::naming`]:
/// `/`-separated, root-relative, no leading or trailing slash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryHeader {
    pub relative_name: String,
    pub is_directory: bool,
    pub size: u64,
}

impl EntryHeader {
    pub fn directory(relative_name: impl Into<String>) -> Self {
        EntryHeader {
            relative_name: relative_name.into(),
            is_directory: true,
            size: 0,
        }
    }

    pub fn file(relative_name: impl Into<String>, size: u64) -> Self {
        EntryHeader {
            relative_name: relative_name.into(),
            is_directory: false,
            size,
        }
    }

    /// The name as stored in the tar stream; directories get a trailing `/`.
    pub fn stored_name(&self) -> String {
        if self.is_directory {
            format!("{}/", self.relative_name)
        } else {
            self.relative_name.clone()
        }
    }

    /// Builds the GNU tar header for this entry. The path is filled in by
    /// `tar::Builder::append_data`, which also handles long names.
    pub(crate) fn to_tar_header(&self, source: &Path) -> tar::Header {
        let mut header = tar::Header::new_gnu();
        if self.is_directory {
            header.set_entry_type(tar::EntryType::Directory);
            header.set_mode(0o755);
        } else {
            header.set_entry_type(tar::EntryType::Regular);
            header.set_mode(0o644);
        }
        header.set_size(self.size);
        header.set_mtime(modified_secs(source));
        header
    }

    /// Reads the header of an entry coming out of a tar stream.
    ///
    /// Returns `None` for entry kinds this crate does not round-trip
    /// (symlinks, hard links, devices, fifos).
    pub(crate) fn from_tar_entry<R: std::io::Read>(entry: &tar::Entry<'_, R>) -> Option<Self> {
        let raw = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
        let relative_name = raw.trim_end_matches('/').to_string();
        let entry_type = entry.header().entry_type();
        if entry_type.is_dir() {
            Some(EntryHeader::directory(relative_name))
        } else if entry_type.is_file() || entry_type == tar::EntryType::Continuous {
            Some(EntryHeader::file(relative_name, entry.size()))
        } else {
            None
        }
    }
}

fn modified_secs(path: &Path) -> u64 {
    std::fs::metadata(path)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or(0)
}
