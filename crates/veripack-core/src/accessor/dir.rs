//! Directory-backed package access.

use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use walkdir::WalkDir;

use crate::Result;
use crate::VerifyError;
use crate::types::RelPath;

use super::FileListing;
use super::PackageAccessor;
use super::RejectedPath;

/// Package stored as a plain directory tree.
#[derive(Debug)]
pub struct DirAccessor {
    root: PathBuf,
}

impl DirAccessor {
    /// Creates an accessor over an existing directory root.
    ///
    /// # Errors
    ///
    /// [`VerifyError::UnsupportedPackage`] if `root` is not a
    /// directory.
    pub fn new(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            return Err(VerifyError::UnsupportedPackage {
                path: root.to_path_buf(),
                reason: "not a directory".to_owned(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// The directory root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl PackageAccessor for DirAccessor {
    fn list_files(&self) -> Result<FileListing> {
        let mut listing = FileListing::default();

        // Symlinks are not followed; only regular files count.
        for entry in WalkDir::new(&self.root).follow_links(false) {
            let entry = entry.map_err(|e| VerifyError::Io(std::io::Error::other(e)))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let relative = entry
                .path()
                .strip_prefix(&self.root)
                .map_err(|e| VerifyError::Io(std::io::Error::other(e)))?;

            let Some(utf8) = relative.to_str() else {
                listing.rejected.push(RejectedPath {
                    raw: relative.to_string_lossy().into_owned(),
                    reason: "file name is not valid UTF-8".to_owned(),
                });
                continue;
            };
            // A literal backslash would be rewritten to '/' during
            // normalization and the listed path could never be opened.
            if utf8.contains('\\') {
                listing.rejected.push(RejectedPath {
                    raw: utf8.to_owned(),
                    reason: "file name contains a backslash".to_owned(),
                });
                continue;
            }
            match RelPath::resolve(utf8) {
                Ok(path) => {
                    listing.files.insert(path);
                }
                Err(err) => listing.rejected.push(RejectedPath {
                    raw: utf8.to_owned(),
                    reason: err.to_string(),
                }),
            }
        }

        Ok(listing)
    }

    fn open(&self, path: &RelPath) -> Result<Box<dyn Read + Send>> {
        let full = self.root.join(path.to_native());
        if !full.is_file() {
            return Err(VerifyError::NotFound {
                path: path.as_str().to_owned(),
            });
        }
        let file = File::open(&full)?;
        Ok(Box::new(file))
    }
}
