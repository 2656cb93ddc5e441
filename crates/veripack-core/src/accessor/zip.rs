//! ZIP-backed package access.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use std::path::PathBuf;

use flate2::read::DeflateDecoder;
use zip::CompressionMethod;
use zip::ZipArchive;

use crate::Result;
use crate::VerifyError;
use crate::types::RelPath;

use super::FileListing;
use super::PackageAccessor;
use super::RejectedPath;

/// How a ZIP member's data is stored.
#[derive(Debug, Clone, PartialEq, Eq)]
enum MemberCompression {
    Stored,
    Deflated,
    Other(String),
}

#[derive(Debug, Clone)]
struct ZipMember {
    data_start: u64,
    compressed_size: u64,
    compression: MemberCompression,
}

/// Package stored as a ZIP container.
///
/// The central directory is indexed once at construction. Opening a
/// member seeks straight to its data and decodes on the fly, so member
/// content is streamed rather than inflated up front.
#[derive(Debug)]
pub struct ZipAccessor {
    path: PathBuf,
    members: BTreeMap<RelPath, ZipMember>,
    rejected: Vec<RejectedPath>,
}

impl ZipAccessor {
    /// Opens a ZIP container and indexes its central directory.
    ///
    /// Member paths that escape the root are rejected here, at listing
    /// time, and kept out of the index.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Archive`] when the container cannot be read as a
    /// ZIP archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(file).map_err(|e| VerifyError::Archive {
            message: format!("cannot read '{}' as zip: {e}", path.display()),
        })?;

        let mut members = BTreeMap::new();
        let mut rejected = Vec::new();

        for index in 0..archive.len() {
            // Raw access: metadata only, no decompression.
            let entry = archive.by_index_raw(index).map_err(|e| VerifyError::Archive {
                message: format!("corrupt zip entry {index}: {e}"),
            })?;
            if !entry.is_file() {
                continue;
            }

            let raw_name = entry.name().to_owned();
            let member = ZipMember {
                data_start: entry.data_start(),
                compressed_size: entry.compressed_size(),
                compression: match entry.compression() {
                    CompressionMethod::Stored => MemberCompression::Stored,
                    CompressionMethod::Deflated => MemberCompression::Deflated,
                    other => MemberCompression::Other(other.to_string()),
                },
            };

            match RelPath::resolve(&raw_name) {
                Ok(rel) => {
                    members.insert(rel, member);
                }
                Err(err) => rejected.push(RejectedPath {
                    raw: raw_name,
                    reason: err.to_string(),
                }),
            }
        }

        Ok(Self {
            path: path.to_path_buf(),
            members,
            rejected,
        })
    }
}

impl PackageAccessor for ZipAccessor {
    fn list_files(&self) -> Result<FileListing> {
        Ok(FileListing {
            files: self.members.keys().cloned().collect(),
            rejected: self.rejected.clone(),
        })
    }

    fn open(&self, path: &RelPath) -> Result<Box<dyn Read + Send>> {
        let member = self.members.get(path).ok_or_else(|| VerifyError::NotFound {
            path: path.as_str().to_owned(),
        })?;

        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(member.data_start))?;
        let raw = file.take(member.compressed_size);

        match &member.compression {
            MemberCompression::Stored => Ok(Box::new(raw)),
            MemberCompression::Deflated => Ok(Box::new(DeflateDecoder::new(raw))),
            MemberCompression::Other(method) => Err(VerifyError::Archive {
                message: format!(
                    "member '{path}' uses unsupported compression method {method}"
                ),
            }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::create_test_zip;
    use tempfile::TempDir;

    fn write_zip(entries: Vec<(&str, &[u8])>) -> (TempDir, PathBuf) {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.zip");
        std::fs::write(&path, create_test_zip(entries)).unwrap();
        (temp, path)
    }

    #[test]
    fn lists_members_in_sorted_order() {
        let (_temp, path) = write_zip(vec![
            ("mets.xml", b"<mets/>" as &[u8]),
            ("data/b.txt", b"beta"),
            ("data/a.txt", b"alpha"),
        ]);
        let accessor = ZipAccessor::open(&path).unwrap();
        let listing = accessor.list_files().unwrap();
        let names: Vec<&str> = listing.files.iter().map(RelPath::as_str).collect();
        assert_eq!(names, vec!["data/a.txt", "data/b.txt", "mets.xml"]);
    }

    #[test]
    fn streams_member_content() {
        let (_temp, path) = write_zip(vec![("data/a.txt", b"alpha" as &[u8])]);
        let accessor = ZipAccessor::open(&path).unwrap();
        let rel = RelPath::resolve("data/a.txt").unwrap();
        let mut content = String::new();
        accessor.open(&rel).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "alpha");
    }

    #[test]
    fn streams_stored_member_content() {
        use crate::test_utils::create_test_zip_stored;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("package.zip");
        std::fs::write(
            &path,
            create_test_zip_stored(vec![("data/a.txt", b"alpha" as &[u8])]),
        )
        .unwrap();

        let accessor = ZipAccessor::open(&path).unwrap();
        let rel = RelPath::resolve("data/a.txt").unwrap();
        let mut content = String::new();
        accessor.open(&rel).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "alpha");
    }

    #[test]
    fn independent_streams_per_open() {
        let (_temp, path) = write_zip(vec![("a.txt", b"content" as &[u8])]);
        let accessor = ZipAccessor::open(&path).unwrap();
        let rel = RelPath::resolve("a.txt").unwrap();

        let mut first = accessor.open(&rel).unwrap();
        let mut second = accessor.open(&rel).unwrap();
        let mut buf = [0u8; 3];
        first.read_exact(&mut buf).unwrap();
        let mut all = String::new();
        second.read_to_string(&mut all).unwrap();
        assert_eq!(all, "content");
    }

    #[test]
    fn traversing_member_is_rejected_at_listing_time() {
        let (_temp, path) = write_zip(vec![
            ("good.txt", b"ok" as &[u8]),
            ("../escape.txt", b"bad"),
        ]);
        let accessor = ZipAccessor::open(&path).unwrap();
        let listing = accessor.list_files().unwrap();

        let names: Vec<&str> = listing.files.iter().map(RelPath::as_str).collect();
        assert_eq!(names, vec!["good.txt"]);
        assert_eq!(listing.rejected.len(), 1);
        assert_eq!(listing.rejected[0].raw, "../escape.txt");
    }

    #[test]
    fn open_unknown_member_is_not_found() {
        let (_temp, path) = write_zip(vec![("a.txt", b"x" as &[u8])]);
        let accessor = ZipAccessor::open(&path).unwrap();
        let rel = RelPath::resolve("missing.txt").unwrap();
        assert!(matches!(
            accessor.open(&rel).err().unwrap(),
            VerifyError::NotFound { .. }
        ));
    }

    #[test]
    fn garbage_container_is_an_archive_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("broken.zip");
        std::fs::write(&path, b"this is not a zip file").unwrap();
        assert!(matches!(
            ZipAccessor::open(&path).unwrap_err(),
            VerifyError::Archive { .. }
        ));
    }
}
