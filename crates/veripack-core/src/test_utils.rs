//! Test utilities for building packages and manifests.
//!
//! Reusable helpers for creating in-memory test archives and on-disk
//! package fixtures, shared by module tests and integration tests.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Write;
use std::path::Path;

use crate::digest::ChecksumAlgorithm;
use crate::digest::stream_digest;

/// Hex digest of an in-memory byte slice.
#[must_use]
pub fn digest_hex(data: &[u8], algorithm: ChecksumAlgorithm) -> String {
    stream_digest(Cursor::new(data), algorithm).unwrap()
}

/// Builds a minimal schema-valid METS manifest whose file section lists
/// the given `(href, checksum type, checksum)` triples.
#[must_use]
pub fn manifest_xml(entries: &[(&str, &str, &str)]) -> String {
    let mut doc = String::from(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<mets xmlns="http://www.loc.gov/METS/" xmlns:xlink="http://www.w3.org/1999/xlink">
  <fileSec>
    <fileGrp>
"#,
    );
    for (index, (href, kind, value)) in entries.iter().enumerate() {
        doc.push_str(&format!(
            r#"      <file ID="f{index}" CHECKSUM="{value}" CHECKSUMTYPE="{kind}">
        <FLocat LOCTYPE="URL" xlink:href="{href}"/>
      </file>
"#,
        ));
    }
    doc.push_str("    </fileGrp>\n  </fileSec>\n</mets>\n");
    doc
}

/// Writes `(path, content)` pairs under `root`, creating parent
/// directories as needed.
pub fn write_dir_package(root: &Path, files: &[(&str, &[u8])]) {
    for (path, content) in files {
        let full = root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }
}

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Entries whose path ends in `.xml` or `.txt` compress fine either
/// way; everything is written deflated to exercise the streaming
/// decode path. Use [`create_test_zip_stored`] for stored members.
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    build_zip(entries, zip::CompressionMethod::Deflated)
}

/// Creates an in-memory ZIP archive with uncompressed (stored) members.
#[must_use]
pub fn create_test_zip_stored(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    build_zip(entries, zip::CompressionMethod::Stored)
}

fn build_zip(entries: Vec<(&str, &[u8])>, method: zip::CompressionMethod) -> Vec<u8> {
    use zip::write::SimpleFileOptions;
    use zip::write::ZipWriter;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default()
        .compression_method(method)
        .unix_permissions(0o644);

    for (path, data) in entries {
        writer.start_file(path, options).unwrap();
        writer.write_all(data).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

/// Creates an in-memory TAR archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are created with
/// mode 0o644.
#[must_use]
pub fn create_test_tar(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    let mut builder = tar::Builder::new(Vec::new());
    for (path, data) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        if header.set_path(path).is_err() {
            // `set_path` refuses `..` components, but tests need such
            // members to exercise rejection at listing time.
            let name = &mut header.as_gnu_mut().unwrap().name;
            name[..path.len()].copy_from_slice(path.as_bytes());
        }
        header.set_cksum();
        builder.append(&header, data).unwrap();
    }
    builder.into_inner().unwrap()
}
