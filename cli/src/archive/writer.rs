//! # targz Archive Writer (`archive::writer`)
//!
//! File: cli/src/archive/writer.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Packs a list of files and directories into a `.tar.gz` archive.
//!
//! ## Architecture
//!
//! - `ArchiveRequest` validates the destination before anything is opened.
//! - `compress` opens the destination, then walks each source pre-order,
//!   depth-first (`walkdir`): a directory entry is always written before the
//!   entries of its children, which is what lets the reader recreate
//!   directories before placing files inside them.
//! - Entry names come from [`crate::archive::naming::relative_name`].
//!
//! Directories without children are dropped unless
//! `CompressOptions::include_empty_dirs` is set. The root directory itself
//! never gets an entry. Symlinks and special files are skipped.
//!
//! Failures abort the whole operation. The destination is not removed, so a
//! failed run can leave a truncated archive behind.
//!
//! ## Usage
//!
//! ```no_run
//! use targz::archive::options::CompressOptions;
//! use targz::archive::progress::TracingListener;
//! use targz::archive::writer::{compress, ArchiveRequest};
//!
//! # fn main() -> Result<(), targz::core::error::CompressError> {
//! let request = ArchiveRequest::new("/srv", ["/srv/app"], "/backups/app.tar.gz")?;
//! let stats = compress(&request, &CompressOptions::default(), Some(&mut TracingListener))?;
//! println!("{} files, {} bytes", stats.files, stats.bytes);
//! # Ok(())
//! # }
//! ```
//!
use crate::archive::entry::EntryHeader;
use crate::archive::naming::{normalize, relative_name};
use crate::archive::options::{has_archive_extension, CompressOptions, ARCHIVE_EXTENSION};
use crate::archive::progress::{CompressionListener, Silent};
use crate::archive::stream::{self, ArchiveWriter};
use crate::archive::ArchiveStats;
use crate::core::error::CompressError;
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// What to pack and where to put it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveRequest {
    root: PathBuf,
    sources: Vec<PathBuf>,
    destination: PathBuf,
}

impl ArchiveRequest {
    /// Builds a request, rejecting destinations that do not end in `.tar.gz`
    /// or that already exist as a directory.
    ///
    /// All three paths are made absolute against the current directory, with
    /// `.` and `..` removed (symlinks are not resolved), so entry names do not
    /// depend on how the paths were spelled.
    pub fn new<S>(
        root: impl AsRef<Path>,
        sources: impl IntoIterator<Item = S>,
        destination: impl AsRef<Path>,
    ) -> Result<Self, CompressError>
    where
        S: AsRef<Path>,
    {
        let request = ArchiveRequest {
            root: absolutize(root.as_ref())?,
            sources: sources
                .into_iter()
                .map(|source| absolutize(source.as_ref()))
                .collect::<Result<_, _>>()?,
            destination: absolutize(destination.as_ref())?,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn destination(&self) -> &Path {
        &self.destination
    }

    fn validate(&self) -> Result<(), CompressError> {
        if !has_archive_extension(&self.destination) {
            return Err(CompressError::InvalidDestination {
                path: self.destination.clone(),
                reason: format!("output must end with '{}'", ARCHIVE_EXTENSION),
            });
        }
        if self.destination.is_dir() {
            return Err(CompressError::InvalidDestination {
                path: self.destination.clone(),
                reason: "output cannot be a directory".to_string(),
            });
        }
        Ok(())
    }
}

fn absolutize(path: &Path) -> Result<PathBuf, CompressError> {
    std::path::absolute(path)
        .map(|absolute| normalize(&absolute))
        .map_err(|e| CompressError::io(format!("Failed to resolve '{}'", path.display()), e))
}

/// Writes every source of `request` into its destination archive.
///
/// Creates or overwrites the destination. Listener hooks fire in this order:
/// start, one directory/file hook per written entry (pre-order), complete.
pub fn compress(
    request: &ArchiveRequest,
    options: &CompressOptions,
    listener: Option<&mut dyn CompressionListener>,
) -> Result<ArchiveStats, CompressError> {
    request.validate()?;
    let mut silent = Silent;
    let listener: &mut dyn CompressionListener = match listener {
        Some(listener) => listener,
        None => &mut silent,
    };

    info!(
        "Compressing {} source(s) into {}",
        request.sources.len(),
        request.destination.display()
    );
    let mut builder = stream::open_compressed_writer(&request.destination, options.level)
        .map_err(|e| {
            CompressError::io(
                format!(
                    "Could not create output stream '{}'",
                    request.destination.display()
                ),
                e,
            )
        })?;

    listener.on_compression_start();
    let mut stats = ArchiveStats::default();
    for source in &request.sources {
        compress_source(&mut builder, request, source, options, listener, &mut stats)?;
    }

    stream::finish_writer(builder).map_err(|e| {
        CompressError::io(
            format!(
                "Could not close output stream '{}'",
                request.destination.display()
            ),
            e,
        )
    })?;
    listener.on_compression_complete();

    info!(
        "Wrote {} ({} files, {} directories, {} bytes)",
        request.destination.display(),
        stats.files,
        stats.directories,
        stats.bytes
    );
    Ok(stats)
}

fn compress_source(
    builder: &mut ArchiveWriter,
    request: &ArchiveRequest,
    source: &Path,
    options: &CompressOptions,
    listener: &mut dyn CompressionListener,
    stats: &mut ArchiveStats,
) -> Result<(), CompressError> {
    let mut walker = WalkDir::new(source);
    if options.sort_entries {
        walker = walker.sort_by_file_name();
    }

    for next in walker {
        let entry = next.map_err(|e| {
            let failed = e.path().unwrap_or(source).display().to_string();
            CompressError::io(format!("Failed to read '{}'", failed), e.into())
        })?;
        let path = entry.path();
        let file_type = entry.file_type();
        let root = request.root.as_path();

        if file_type.is_dir() {
            if !options.include_empty_dirs && is_empty_dir(path)? {
                debug!("Skipping empty directory {}", path.display());
                continue;
            }
            let name = relative_name(root, path);
            if name.is_empty() {
                debug!("{} is the archive root, no entry written", path.display());
                continue;
            }
            append_directory(builder, path, &name)?;
            stats.directories += 1;
            debug!("Added directory entry {}/", name);
            listener.on_directory_compressed(path, &name);
        } else if file_type.is_file() {
            if path == request.destination.as_path() {
                warn!("Skipping {}, it is the archive being written", path.display());
                continue;
            }
            let name = file_entry_name(root, path);
            let size = append_file(builder, path, &name, options.buffer_size)?;
            stats.files += 1;
            stats.bytes += size;
            debug!("Added file entry {} ({} bytes)", name, size);
            listener.on_file_compressed(path, &name);
        } else {
            warn!("Skipping unsupported entry {}", path.display());
        }
    }
    Ok(())
}

/// A file passed as its own root has no relative name; fall back to its file name.
fn file_entry_name(root: &Path, path: &Path) -> String {
    let name = relative_name(root, path);
    if name.is_empty() {
        path.file_name()
            .map(|file_name| file_name.to_string_lossy().into_owned())
            .unwrap_or_default()
    } else {
        name
    }
}

fn is_empty_dir(path: &Path) -> Result<bool, CompressError> {
    let mut children = fs::read_dir(path).map_err(|e| {
        CompressError::io(format!("Failed to list directory '{}'", path.display()), e)
    })?;
    Ok(children.next().is_none())
}

fn append_directory(
    builder: &mut ArchiveWriter,
    path: &Path,
    name: &str,
) -> Result<(), CompressError> {
    let header = EntryHeader::directory(name);
    let mut tar_header = header.to_tar_header(path);
    builder
        .append_data(&mut tar_header, header.stored_name(), io::empty())
        .map_err(|e| {
            CompressError::io(
                format!(
                    "Problem encountered while compressing directory '{}'",
                    path.display()
                ),
                e,
            )
        })
}

/// Streams one file into the archive and returns its size.
fn append_file(
    builder: &mut ArchiveWriter,
    path: &Path,
    name: &str,
    buffer_size: usize,
) -> Result<u64, CompressError> {
    let file = File::open(path)
        .map_err(|e| CompressError::io(format!("Failed to open '{}'", path.display()), e))?;
    let size = file
        .metadata()
        .map_err(|e| CompressError::io(format!("Failed to stat '{}'", path.display()), e))?
        .len();

    let header = EntryHeader::file(name, size);
    let mut tar_header = header.to_tar_header(path);
    // The header size is fixed up front; never copy more than it announces.
    let contents = BufReader::with_capacity(buffer_size.max(1), file).take(size);
    builder
        .append_data(&mut tar_header, header.stored_name(), contents)
        .map_err(|e| {
            CompressError::io(
                format!(
                    "Problem encountered while compressing file '{}'",
                    path.display()
                ),
                e,
            )
        })?;
    Ok(size)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::progress::{EventLog, ProgressEvent};
    use tempfile::tempdir;

    /// Entry names in stored order, as written in the tar stream.
    fn stored_names(archive: &Path) -> Vec<String> {
        let mut reader = stream::open_compressed_reader(archive).unwrap();
        reader
            .entries()
            .unwrap()
            .map(|entry| String::from_utf8_lossy(&entry.unwrap().path_bytes()).into_owned())
            .collect()
    }

    #[test]
    fn test_rejects_destination_without_extension() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("out.zip");

        let result = ArchiveRequest::new(temp_dir.path(), [temp_dir.path()], &destination);
        assert!(matches!(
            result,
            Err(CompressError::InvalidDestination { .. })
        ));
        assert!(!destination.exists());
    }

    #[test]
    fn test_rejects_destination_that_is_a_directory() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("taken.tar.gz");
        fs::create_dir(&destination).unwrap();

        let err = ArchiveRequest::new(temp_dir.path(), [temp_dir.path()], &destination)
            .unwrap_err();
        assert!(err.to_string().contains("cannot be a directory"));
    }

    #[test]
    fn test_directory_entry_precedes_its_files() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(data.join("nested")).unwrap();
        fs::write(data.join("nested/inner.txt"), "inner").unwrap();
        fs::write(data.join("top.txt"), "top").unwrap();
        let destination = temp_dir.path().join("out.tar.gz");

        let request = ArchiveRequest::new(temp_dir.path(), [&data], &destination).unwrap();
        let options = CompressOptions {
            sort_entries: true,
            ..Default::default()
        };
        let stats = compress(&request, &options, None).unwrap();

        assert_eq!(
            stored_names(&destination),
            vec!["data/", "data/nested/", "data/nested/inner.txt", "data/top.txt"]
        );
        assert_eq!(stats.files, 2);
        assert_eq!(stats.directories, 2);
        assert_eq!(stats.bytes, 8);
    }

    #[test]
    fn test_empty_directories_are_dropped_by_default() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(data.join("empty")).unwrap();
        fs::write(data.join("file.txt"), "x").unwrap();
        let destination = temp_dir.path().join("out.tar.gz");

        let request = ArchiveRequest::new(temp_dir.path(), [&data], &destination).unwrap();
        compress(&request, &CompressOptions::default(), None).unwrap();
        let names = stored_names(&destination);
        assert!(!names.iter().any(|name| name.starts_with("data/empty")));

        let options = CompressOptions {
            include_empty_dirs: true,
            ..Default::default()
        };
        compress(&request, &options, None).unwrap();
        assert!(stored_names(&destination).contains(&"data/empty/".to_string()));
    }

    #[test]
    fn test_root_itself_has_no_entry_or_event() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("only.txt"), "1").unwrap();
        let destination = temp_dir.path().join("out.tar.gz");

        let request = ArchiveRequest::new(&data, [&data], &destination).unwrap();
        let mut log = EventLog::default();
        compress(&request, &CompressOptions::default(), Some(&mut log)).unwrap();

        assert_eq!(stored_names(&destination), vec!["only.txt"]);
        assert_eq!(
            log.compression,
            vec![
                ProgressEvent::Start,
                ProgressEvent::FileDone("only.txt".into()),
                ProgressEvent::Complete
            ]
        );
    }

    #[test]
    fn test_missing_source_is_an_io_failure() {
        let temp_dir = tempdir().unwrap();
        let destination = temp_dir.path().join("out.tar.gz");
        let request = ArchiveRequest::new(
            temp_dir.path(),
            [temp_dir.path().join("ghost")],
            &destination,
        )
        .unwrap();

        let mut log = EventLog::default();
        let result = compress(&request, &CompressOptions::default(), Some(&mut log));
        assert!(matches!(result, Err(CompressError::Io { .. })));
        assert_eq!(log.compression, vec![ProgressEvent::Start]);
    }

    #[test]
    fn test_destination_inside_source_is_not_archived() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir(&data).unwrap();
        fs::write(data.join("a.txt"), "hello").unwrap();
        let destination = data.join("self.tar.gz");

        let request = ArchiveRequest::new(temp_dir.path(), [&data], &destination).unwrap();
        let mut log = EventLog::default();
        let stats = compress(&request, &CompressOptions::default(), Some(&mut log)).unwrap();

        assert_eq!(stored_names(&destination), vec!["data/", "data/a.txt"]);
        assert_eq!(stats.files, 1);
        assert!(!log
            .compression
            .contains(&ProgressEvent::FileDone("data/self.tar.gz".into())));
    }

    #[test]
    fn test_dotted_paths_are_normalized() {
        let temp_dir = tempdir().unwrap();
        let data = temp_dir.path().join("data");
        fs::create_dir_all(data.join("sub")).unwrap();
        fs::write(data.join("a.txt"), "a").unwrap();
        let destination = temp_dir.path().join("out.tar.gz");

        let request = ArchiveRequest::new(
            temp_dir.path().join("data/sub/../.."),
            [data.join("sub/..")],
            temp_dir.path().join("data/../out.tar.gz"),
        )
        .unwrap();
        assert_eq!(request.sources(), &[data.clone()][..]);
        assert_eq!(request.destination(), destination.as_path());

        compress(&request, &sorted_options(), None).unwrap();
        assert_eq!(stored_names(&destination), vec!["data/", "data/a.txt"]);
    }

    fn sorted_options() -> CompressOptions {
        CompressOptions {
            sort_entries: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_file_as_its_own_root_uses_file_name() {
        let temp_dir = tempdir().unwrap();
        let file = temp_dir.path().join("solo.bin");
        fs::write(&file, [1u8, 2, 3]).unwrap();
        assert_eq!(file_entry_name(&file, &file), "solo.bin");
    }
}
