//! Validated root-relative path type.

use std::fmt;
use std::path::PathBuf;

use crate::Result;
use crate::VerifyError;

/// A normalized, root-relative path inside a package.
///
/// `RelPath` represents a path that has been validated to not contain:
/// - Parent directory traversal (`..`)
/// - Absolute path prefixes (POSIX roots or drive letters)
/// - Null bytes
/// - Empty or `.`-only content
///
/// Separators are normalized to `/`, `.` segments are removed, and the
/// value compares lexicographically, so any sorted collection of
/// `RelPath`s iterates in a deterministic order.
///
/// # Examples
///
/// ```
/// use veripack_core::RelPath;
///
/// let p = RelPath::resolve("data/./a.txt").unwrap();
/// assert_eq!(p.as_str(), "data/a.txt");
///
/// assert!(RelPath::resolve("../escape.txt").is_err());
/// assert!(RelPath::resolve("/etc/passwd").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RelPath(String);

impl RelPath {
    /// Validates and normalizes a declared relative reference.
    ///
    /// This is the only way to construct a `RelPath`; a value that
    /// escapes the package root can never exist.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::PathTraversal`] when the reference is
    /// empty, absolute, contains `..` segments, or contains null bytes.
    pub fn resolve(raw: &str) -> Result<Self> {
        if raw.contains('\0') {
            return Err(VerifyError::PathTraversal {
                path: raw.replace('\0', "\\0"),
                reason: "path contains null bytes".to_owned(),
            });
        }

        // Archive members and manifest hrefs may use either separator.
        let unified = raw.replace('\\', "/");

        if unified.starts_with('/') {
            return Err(VerifyError::PathTraversal {
                path: raw.to_owned(),
                reason: "absolute path".to_owned(),
            });
        }
        if unified.len() >= 2 && unified.as_bytes()[1] == b':' {
            return Err(VerifyError::PathTraversal {
                path: raw.to_owned(),
                reason: "absolute path (drive prefix)".to_owned(),
            });
        }

        let mut segments = Vec::new();
        for segment in unified.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    return Err(VerifyError::PathTraversal {
                        path: raw.to_owned(),
                        reason: "parent directory traversal".to_owned(),
                    });
                }
                other => segments.push(other),
            }
        }

        if segments.is_empty() {
            return Err(VerifyError::PathTraversal {
                path: raw.to_owned(),
                reason: "empty path".to_owned(),
            });
        }

        Ok(Self(segments.join("/")))
    }

    /// Returns the normalized `/`-separated path.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the final path segment.
    #[must_use]
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// Whether the path sits directly under the package root.
    #[must_use]
    pub fn is_root_level(&self) -> bool {
        !self.0.contains('/')
    }

    /// Converts to a platform `PathBuf` for joining against a real
    /// directory root.
    #[must_use]
    pub fn to_native(&self) -> PathBuf {
        self.0.split('/').collect()
    }
}

impl fmt::Display for RelPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
