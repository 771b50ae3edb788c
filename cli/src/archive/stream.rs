//! # targz Archive Streams (`archive::stream`)
//!
//! File: cli/src/archive/stream.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Thin constructors for the gzip-compressed tar streams used by the writer and
//! the reader. The `tar` crate builds and walks the container, `flate2`
//! supplies the gzip framing, and buffered file handles sit underneath.
//!
//! Every layer owns the one below it, so dropping a stream on an error path
//! releases the file handle. [`finish_writer`] is the only way to surface
//! errors raised while flushing the trailing tar blocks, the gzip footer and
//! the file buffer.
//!
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

/// Entry sink writing a `.tar.gz` file.
pub type ArchiveWriter = tar::Builder<GzEncoder<BufWriter<File>>>;

/// Entry source reading a `.tar.gz` file.
pub type ArchiveReader = tar::Archive<GzDecoder<BufReader<File>>>;

/// Creates (or truncates) `path` and wraps it in a gzip tar builder.
pub fn open_compressed_writer(path: &Path, level: u32) -> io::Result<ArchiveWriter> {
    let file = File::create(path)?;
    let encoder = GzEncoder::new(BufWriter::new(file), Compression::new(level.min(9)));
    Ok(tar::Builder::new(encoder))
}

/// Writes the tar end-of-archive blocks, the gzip footer, and flushes the file.
pub fn finish_writer(builder: ArchiveWriter) -> io::Result<()> {
    let encoder = builder.into_inner()?;
    let mut buffered = encoder.finish()?;
    buffered.flush()?;
    let file = buffered.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()
}

/// Opens `path` for sequential entry reading.
pub fn open_compressed_reader(path: &Path) -> io::Result<ArchiveReader> {
    let file = File::open(path)?;
    Ok(tar::Archive::new(GzDecoder::new(BufReader::new(file))))
}

/// Consumes whatever follows the tar end-of-archive marker so the gzip
/// decoder reaches its footer and verifies the checksum.
pub fn finish_reader(archive: ArchiveReader) -> io::Result<()> {
    let mut decoder = archive.into_inner();
    io::copy(&mut decoder, &mut io::sink())?;
    Ok(())
}
