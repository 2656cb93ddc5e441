//! TAR-backed package access.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::path::Path;
use std::path::PathBuf;

use crate::Result;
use crate::VerifyError;
use crate::types::RelPath;

use super::FileListing;
use super::PackageAccessor;
use super::RejectedPath;

#[derive(Debug, Clone, Copy)]
struct TarMember {
    data_start: u64,
    size: u64,
}

/// Package stored as an uncompressed TAR container.
///
/// The container is scanned once at construction to record each regular
/// member's data offset. Opening a member seeks straight to that
/// offset, so content streams without re-walking the archive.
#[derive(Debug)]
pub struct TarAccessor {
    path: PathBuf,
    members: BTreeMap<RelPath, TarMember>,
    rejected: Vec<RejectedPath>,
}

impl TarAccessor {
    /// Opens a TAR container and indexes its members.
    ///
    /// Member paths that escape the root are rejected here, at listing
    /// time, and kept out of the index.
    ///
    /// # Errors
    ///
    /// [`VerifyError::Archive`] when the container cannot be read as a
    /// TAR archive.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let mut archive = tar::Archive::new(file);

        let mut members = BTreeMap::new();
        let mut rejected = Vec::new();

        let entries = archive.entries().map_err(|e| VerifyError::Archive {
            message: format!("cannot read '{}' as tar: {e}", path.display()),
        })?;
        for entry in entries {
            let entry = entry.map_err(|e| VerifyError::Archive {
                message: format!("corrupt tar entry: {e}"),
            })?;
            if !entry.header().entry_type().is_file() {
                continue;
            }

            let raw_bytes = entry.path_bytes();
            let Ok(raw_name) = std::str::from_utf8(&raw_bytes) else {
                rejected.push(RejectedPath {
                    raw: String::from_utf8_lossy(&raw_bytes).into_owned(),
                    reason: "member name is not valid UTF-8".to_owned(),
                });
                continue;
            };

            let member = TarMember {
                data_start: entry.raw_file_position(),
                size: entry.size(),
            };
            match RelPath::resolve(raw_name) {
                Ok(rel) => {
                    members.insert(rel, member);
                }
                Err(err) => rejected.push(RejectedPath {
                    raw: raw_name.to_owned(),
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

impl PackageAccessor for TarAccessor {
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
        Ok(Box::new(file.take(member.size)))
    }
}
