//! # targz Archive Reader (`archive::reader`)
//!
//! File: cli/src/archive/reader.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Unpacks a `.tar.gz` archive below an output directory.
//!
//! ## Architecture
//!
//! - `ExtractionRequest` checks that the archive exists and carries the
//!   `.tar.gz` extension before anything is opened.
//! - `decompress` reads entries strictly in stored order. Directory entries are
//!   created with all missing ancestors; file entries create their parent
//!   directories on demand, so archives whose files come before their
//!   directories (or that have no directory entries at all) unpack too.
//! - File contents are copied in chunks of `ExtractOptions::buffer_size`.
//! - Entry names are confined to the output directory: absolute names and
//!   names containing `..` abort the extraction.
//!
//! Symlinks, hard links and device entries are skipped with a warning.
//! Failures abort immediately and leave whatever was already written on disk.
//!
use crate::archive::entry::EntryHeader;
use crate::archive::options::{has_archive_extension, ExtractOptions, ARCHIVE_EXTENSION};
use crate::archive::progress::{DecompressionListener, Silent};
use crate::archive::stream;
use crate::archive::ArchiveStats;
use crate::core::error::DecompressError;
use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, info, warn};

/// Which archive to unpack and where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionRequest {
    archive_path: PathBuf,
    output_root: PathBuf,
}

impl ExtractionRequest {
    /// Fails with `InputNotFound` when the archive is missing and with
    /// `InvalidInput` when its name does not end in `.tar.gz`.
    pub fn new(
        archive_path: impl AsRef<Path>,
        output_root: impl AsRef<Path>,
    ) -> Result<Self, DecompressError> {
        let request = ExtractionRequest {
            archive_path: archive_path.as_ref().to_path_buf(),
            output_root: output_root.as_ref().to_path_buf(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    fn validate(&self) -> Result<(), DecompressError> {
        if !self.archive_path.exists() {
            return Err(DecompressError::InputNotFound {
                path: self.archive_path.clone(),
            });
        }
        if !has_archive_extension(&self.archive_path) {
            return Err(DecompressError::InvalidInput {
                path: self.archive_path.clone(),
                reason: format!("input must end with '{}'", ARCHIVE_EXTENSION),
            });
        }
        if self.archive_path.is_dir() {
            return Err(DecompressError::InvalidInput {
                path: self.archive_path.clone(),
                reason: "input is a directory".to_string(),
            });
        }
        Ok(())
    }
}

/// Recreates the archive's directories and files below the output root.
///
/// Listener hooks fire in this order: start, one directory/file hook per
/// extracted entry (stored order), complete.
pub fn decompress(
    request: &ExtractionRequest,
    options: &ExtractOptions,
    listener: Option<&mut dyn DecompressionListener>,
) -> Result<ArchiveStats, DecompressError> {
    request.validate()?;
    let mut silent = Silent;
    let listener: &mut dyn DecompressionListener = match listener {
        Some(listener) => listener,
        None => &mut silent,
    };

    info!(
        "Extracting {} into {}",
        request.archive_path.display(),
        request.output_root.display()
    );
    let mut archive = stream::open_compressed_reader(&request.archive_path).map_err(|e| {
        DecompressError::io(
            format!(
                "Could not create input stream '{}'",
                request.archive_path.display()
            ),
            e,
        )
    })?;

    listener.on_decompression_start();
    let mut stats = ArchiveStats::default();
    let entries = archive
        .entries()
        .map_err(|e| DecompressError::io("Failed to read archive entries", e))?;
    for next in entries {
        let mut entry =
            next.map_err(|e| DecompressError::io("Failed to read archive entry", e))?;
        let Some(header) = EntryHeader::from_tar_entry(&entry) else {
            warn!(
                "Skipping unsupported entry {} ({:?})",
                String::from_utf8_lossy(&entry.path_bytes()),
                entry.header().entry_type()
            );
            continue;
        };
        let target = resolve_target(&request.output_root, &header.relative_name)?;

        if header.is_directory {
            fs::create_dir_all(&target).map_err(|e| {
                DecompressError::io(
                    format!("Failed to create directory '{}'", target.display()),
                    e,
                )
            })?;
            stats.directories += 1;
            debug!("Created directory {}", target.display());
            listener.on_directory_decompressed(&header.relative_name);
        } else {
            let written = write_file(&mut entry, &target, options.buffer_size)?;
            if written != header.size {
                return Err(DecompressError::io(
                    format!("Entry '{}' is truncated", header.relative_name),
                    io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        format!("expected {} bytes, found {}", header.size, written),
                    ),
                ));
            }
            stats.files += 1;
            stats.bytes += written;
            debug!("Wrote {} ({} bytes)", target.display(), written);
            listener.on_file_decompressed(&header.relative_name);
        }
    }

    stream::finish_reader(archive).map_err(|e| {
        DecompressError::io(
            format!(
                "Could not close input stream '{}'",
                request.archive_path.display()
            ),
            e,
        )
    })?;
    listener.on_decompression_complete();

    info!(
        "Extracted {} files and {} directories ({} bytes)",
        stats.files, stats.directories, stats.bytes
    );
    Ok(stats)
}

/// Maps an entry name onto a path below `output_root`.
fn resolve_target(output_root: &Path, name: &str) -> Result<PathBuf, DecompressError> {
    let mut target = output_root.to_path_buf();
    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(DecompressError::UnsafeEntry {
                    name: name.to_string(),
                });
            }
        }
    }
    Ok(target)
}

/// Copies one entry's payload into `target`, creating or truncating it.
fn write_file<R: Read>(
    entry: &mut R,
    target: &Path,
    buffer_size: usize,
) -> Result<u64, DecompressError> {
    if let Some(parent) = target.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).map_err(|e| {
                DecompressError::io(
                    format!("Failed to create directory '{}'", parent.display()),
                    e,
                )
            })?;
            debug!("Created missing parent {}", parent.display());
        }
    }

    let file = File::create(target).map_err(|e| {
        DecompressError::io(format!("Failed to create '{}'", target.display()), e)
    })?;
    let buffer_size = buffer_size.max(1);
    let mut output = BufWriter::with_capacity(buffer_size, file);
    let mut buffer = vec![0u8; buffer_size];
    let mut written = 0u64;
    loop {
        let count = match entry.read(&mut buffer) {
            Ok(0) => break,
            Ok(count) => count,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => {
                return Err(DecompressError::io(
                    format!("Failed to read archive data for '{}'", target.display()),
                    e,
                ))
            }
        };
        output.write_all(&buffer[..count]).map_err(|e| {
            DecompressError::io(format!("Failed to write '{}'", target.display()), e)
        })?;
        written += count as u64;
    }
    output.into_inner().map_err(|e| {
        DecompressError::io(
            format!("Failed to flush '{}'", target.display()),
            e.into_error(),
        )
    })?;
    Ok(written)
}
