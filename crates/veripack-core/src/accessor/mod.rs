//! Read-only access to a package stored as a directory or an archive.

mod dir;
mod tar;
mod zip;

pub use dir::DirAccessor;
pub use tar::TarAccessor;
pub use zip::ZipAccessor;

use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;

use crate::Result;
use crate::VerifyError;
use crate::types::RelPath;

/// The enumerated contents of a package.
#[derive(Debug, Clone, Default)]
pub struct FileListing {
    /// Every regular file under the root, root-relative, normalized and
    /// de-duplicated. `BTreeSet` keeps the order deterministic.
    pub files: BTreeSet<RelPath>,
    /// Member paths rejected at listing time. Rejections are surfaced
    /// in the report, never silently stripped.
    pub rejected: Vec<RejectedPath>,
}

/// A package member whose path could not be admitted to the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedPath {
    /// The path as stored in the container.
    pub raw: String,
    /// Why it was rejected.
    pub reason: String,
}

/// Uniform read-only view over a package.
///
/// Implementations exist for directory-backed and archive-backed
/// packages; callers never branch on which backing is in use. Accessors
/// hold only immutable state, and every [`open`](Self::open) call
/// returns an independent stream, so one accessor may be shared across
/// concurrently running checks.
pub trait PackageAccessor: std::fmt::Debug + Send + Sync {
    /// Enumerates every regular file under the package root.
    fn list_files(&self) -> Result<FileListing>;

    /// Opens an independent byte stream over the named file's content.
    ///
    /// Archive backings stream member content rather than inflating the
    /// whole container, so arbitrarily large payload files stay cheap.
    ///
    /// # Errors
    ///
    /// [`VerifyError::NotFound`] if the path does not name an existing
    /// regular file.
    fn open(&self, path: &RelPath) -> Result<Box<dyn Read + Send>>;

    /// Normalizes a manifest-declared reference against the root.
    ///
    /// # Errors
    ///
    /// [`VerifyError::PathTraversal`] when the reference escapes the
    /// root.
    fn resolve(&self, href: &str) -> Result<RelPath> {
        RelPath::resolve(href)
    }
}

/// Opens the accessor variant matching the package location: a
/// directory root, a `.zip` container, or an uncompressed `.tar`
/// container.
///
/// # Errors
///
/// [`VerifyError::UnsupportedPackage`] for anything else, including
/// compressed tarballs, which do not support the random access the
/// checks need.
pub fn open_package(path: &Path) -> Result<Box<dyn PackageAccessor>> {
    if path.is_dir() {
        return Ok(Box::new(DirAccessor::new(path)?));
    }
    if !path.is_file() {
        return Err(VerifyError::UnsupportedPackage {
            path: path.to_path_buf(),
            reason: "location does not exist".to_owned(),
        });
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("zip") => Ok(Box::new(ZipAccessor::open(path)?)),
        Some("tar") => Ok(Box::new(TarAccessor::open(path)?)),
        Some("gz" | "tgz" | "bz2" | "xz" | "zst") => Err(VerifyError::UnsupportedPackage {
            path: path.to_path_buf(),
            reason: "compressed tarballs do not support random member access".to_owned(),
        }),
        _ => Err(VerifyError::UnsupportedPackage {
            path: path.to_path_buf(),
            reason: "expected a directory, .zip, or .tar package".to_owned(),
        }),
    }
}
