//! # targz Archive Pipeline Integration Tests
//!
//! File: cli/tests/archive.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Drives the library's writer and reader against real directory trees in
//! temporary directories: round trips, listener ordering, large payloads,
//! overwriting, and the failure modes that must abort an operation.
//!

mod common;
use common::*;
use std::fs;
use std::path::Path;
use targz::archive::options::{CompressOptions, ExtractOptions};
use targz::archive::progress::{EventLog, ProgressEvent};
use targz::archive::reader::{decompress, ExtractionRequest};
use targz::archive::writer::{compress, ArchiveRequest};
use targz::archive::{best_effort, stream};
use targz::core::error::{CompressError, DecompressError};
use tempfile::tempdir;

fn sorted() -> CompressOptions {
    CompressOptions {
        sort_entries: true,
        ..Default::default()
    }
}

fn round_trip<S: AsRef<Path>>(
    root: &Path,
    sources: &[S],
    work: &Path,
    options: &CompressOptions,
) -> Vec<String> {
    let archive = work.join("trip.tar.gz");
    let output = work.join("unpacked");
    let request = ArchiveRequest::new(root, sources, &archive).unwrap();
    compress(&request, options, None).unwrap();
    let request = ExtractionRequest::new(&archive, &output).unwrap();
    decompress(&request, &ExtractOptions::default(), None).unwrap();
    tree(&output)
}

#[test]
fn test_nested_tree_round_trips() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("project/README.md"), "# readme");
    write_file(&src.join("project/lib/a/b/deep.rs"), "fn deep() {}");
    write_file(&src.join("project/empty.txt"), "");
    fs::create_dir_all(src.join("project/hollow")).unwrap();

    let project = src.join("project");
    let listing = round_trip(&src, &[&project], temp_dir.path(), &sorted());

    assert_eq!(
        listing,
        vec![
            "project/",
            "project/README.md",
            "project/empty.txt",
            "project/lib/",
            "project/lib/a/",
            "project/lib/a/b/",
            "project/lib/a/b/deep.rs",
        ]
    );
    let out = temp_dir.path().join("unpacked/project");
    assert_eq!(fs::read_to_string(out.join("lib/a/b/deep.rs")).unwrap(), "fn deep() {}");
    assert_eq!(fs::read(out.join("empty.txt")).unwrap().len(), 0);
}

#[test]
fn test_empty_directories_survive_when_requested() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    fs::create_dir_all(src.join("keep/hollow")).unwrap();

    let keep = src.join("keep");
    let options = CompressOptions {
        include_empty_dirs: true,
        ..sorted()
    };
    let listing = round_trip(&src, &[&keep], temp_dir.path(), &options);
    assert_eq!(listing, vec!["keep/", "keep/hollow/"]);
}

#[test]
fn test_multiple_sources_share_one_root() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("one/1.txt"), "1");
    write_file(&src.join("two/2.txt"), "2");
    write_file(&src.join("loose.txt"), "loose");

    let one = src.join("one");
    let two = src.join("two");
    let loose = src.join("loose.txt");
    let listing = round_trip(&src, &[&one, &two, &loose], temp_dir.path(), &sorted());
    assert_eq!(
        listing,
        vec!["loose.txt", "one/", "one/1.txt", "two/", "two/2.txt"]
    );
}

#[test]
fn test_listener_order_matches_in_both_directions() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("docs/b.txt"), "b");
    write_file(&src.join("docs/a.txt"), "a");
    let archive = temp_dir.path().join("docs.tar.gz");
    let docs = src.join("docs");

    let mut log = EventLog::default();
    let request = ArchiveRequest::new(&src, [&docs], &archive).unwrap();
    compress(&request, &sorted(), Some(&mut log)).unwrap();
    let request = ExtractionRequest::new(&archive, temp_dir.path().join("out")).unwrap();
    decompress(&request, &ExtractOptions::default(), Some(&mut log)).unwrap();

    let expected = vec![
        ProgressEvent::Start,
        ProgressEvent::DirectoryDone("docs".into()),
        ProgressEvent::FileDone("docs/a.txt".into()),
        ProgressEvent::FileDone("docs/b.txt".into()),
        ProgressEvent::Complete,
    ];
    assert_eq!(log.compression, expected);
    assert_eq!(log.decompression, expected);
}

#[test]
fn test_unsorted_events_follow_stored_order() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    for name in ["zeta.txt", "alpha.txt", "mid/one.txt", "mid/two.txt", "beta.txt"] {
        write_file(&src.join("bag").join(name), name);
    }
    let archive = temp_dir.path().join("bag.tar.gz");
    let bag = src.join("bag");

    let mut log = EventLog::default();
    let request = ArchiveRequest::new(&src, [&bag], &archive).unwrap();
    compress(&request, &CompressOptions::default(), Some(&mut log)).unwrap();

    let mut reader = stream::open_compressed_reader(&archive).unwrap();
    let stored: Vec<String> = reader
        .entries()
        .unwrap()
        .map(|entry| String::from_utf8_lossy(&entry.unwrap().path_bytes()).into_owned())
        .collect();
    let reported: Vec<String> = log
        .compression
        .iter()
        .filter_map(|event| match event {
            ProgressEvent::DirectoryDone(name) => Some(format!("{}/", name)),
            ProgressEvent::FileDone(name) => Some(name.clone()),
            _ => None,
        })
        .collect();

    assert_eq!(reported, stored);
    assert_eq!(stored.len(), 7);
    assert_eq!(stored[0], "bag/");
}

#[test]
fn test_payload_larger_than_buffer_is_intact() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    let payload: Vec<u8> = (0..1_048_576u32).map(|i| (i * 31 % 251) as u8).collect();
    write_file(&src.join("blob.bin"), &payload);
    let archive = temp_dir.path().join("blob.tar.gz");
    let output = temp_dir.path().join("out");

    let blob = src.join("blob.bin");
    let request = ArchiveRequest::new(&src, [&blob], &archive).unwrap();
    let stats = compress(&request, &CompressOptions::default(), None).unwrap();
    assert_eq!(stats.bytes, payload.len() as u64);

    let request = ExtractionRequest::new(&archive, &output).unwrap();
    let options = ExtractOptions { buffer_size: 7 };
    let stats = decompress(&request, &options, None).unwrap();
    assert_eq!(stats.files, 1);
    assert_eq!(fs::read(output.join("blob.bin")).unwrap(), payload);
}

#[test]
fn test_extracting_twice_overwrites() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("notes/today.txt"), "original");
    let archive = temp_dir.path().join("notes.tar.gz");
    let output = temp_dir.path().join("out");
    let notes = src.join("notes");

    assert!(best_effort::compress(&src, &[&notes], &archive, None));
    assert!(best_effort::decompress(&archive, &output, None));
    fs::write(output.join("notes/today.txt"), "edited locally, and longer").unwrap();
    assert!(best_effort::decompress(&archive, &output, None));

    assert_eq!(
        fs::read_to_string(output.join("notes/today.txt")).unwrap(),
        "original"
    );
}

#[test]
fn test_compress_overwrites_existing_archive() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("only.txt"), "fresh");
    let archive = temp_dir.path().join("reuse.tar.gz");
    fs::write(&archive, "stale bytes that are not an archive").unwrap();

    let only = src.join("only.txt");
    let request = ArchiveRequest::new(&src, [&only], &archive).unwrap();
    compress(&request, &CompressOptions::default(), None).unwrap();

    let output = temp_dir.path().join("out");
    let request = ExtractionRequest::new(&archive, &output).unwrap();
    decompress(&request, &ExtractOptions::default(), None).unwrap();
    assert_eq!(fs::read_to_string(output.join("only.txt")).unwrap(), "fresh");
}

#[test]
fn test_missing_source_aborts_after_earlier_sources() {
    let temp_dir = tempdir().unwrap();
    let src = temp_dir.path().join("src");
    write_file(&src.join("real.txt"), "real");
    let archive = temp_dir.path().join("partial.tar.gz");

    let real = src.join("real.txt");
    let ghost = src.join("ghost");
    let mut log = EventLog::default();
    let request = ArchiveRequest::new(&src, [&real, &ghost], &archive).unwrap();
    let result = compress(&request, &CompressOptions::default(), Some(&mut log));

    assert!(matches!(result, Err(CompressError::Io { .. })));
    assert_eq!(
        log.compression,
        vec![
            ProgressEvent::Start,
            ProgressEvent::FileDone("real.txt".into())
        ]
    );
    assert!(archive.exists()); // Left behind, not cleaned up.
}

#[test]
fn test_non_gzip_input_is_an_io_failure() {
    let temp_dir = tempdir().unwrap();
    let archive = temp_dir.path().join("fake.tar.gz");
    fs::write(&archive, "plain text pretending to be gzip").unwrap();

    let mut log = EventLog::default();
    let request = ExtractionRequest::new(&archive, temp_dir.path().join("out")).unwrap();
    let result = decompress(&request, &ExtractOptions::default(), Some(&mut log));
    assert!(matches!(result, Err(DecompressError::Io { .. })));
    assert!(!log.decompression.contains(&ProgressEvent::Complete));
}

#[test]
fn test_entry_escaping_output_is_rejected() {
    let temp_dir = tempdir().unwrap();
    let archive = temp_dir.path().join("evil.tar.gz");
    let mut builder = stream::open_compressed_writer(&archive, 6).unwrap();
    let name = b"../evil.txt";
    let data = b"gotcha";
    let mut header = tar::Header::new_gnu();
    header.as_old_mut().name[..name.len()].copy_from_slice(name);
    header.set_entry_type(tar::EntryType::Regular);
    header.set_size(data.len() as u64);
    header.set_mode(0o644);
    header.set_cksum();
    builder.append(&header, &data[..]).unwrap();
    stream::finish_writer(builder).unwrap();

    let output = temp_dir.path().join("jail/out");
    let request = ExtractionRequest::new(&archive, &output).unwrap();
    let result = decompress(&request, &ExtractOptions::default(), None);

    assert!(matches!(result, Err(DecompressError::UnsafeEntry { .. })));
    assert!(!temp_dir.path().join("jail/evil.txt").exists());
}
