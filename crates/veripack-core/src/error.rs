//! Error types for package verification operations.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, VerifyError>;

/// Errors raised by the verification engine.
///
/// Only manifest lookup and well-formedness failures abort the checks
/// for a manifest. Everything observable per entry or per file (schema
/// violations, malformed entries, checksum mismatches, read failures
/// while streaming) is captured as a finding inside a
/// [`CheckOutcome`](crate::report::CheckOutcome) instead, so callers
/// always receive a complete report.
#[derive(Debug, Error)]
pub enum VerifyError {
    /// No file at the package root matched the manifest name or pattern.
    #[error("no manifest matching '{pattern}' found at the package root")]
    ManifestNotFound {
        /// The literal name or pattern that was searched for.
        pattern: String,
    },

    /// More than one root-level file matched the manifest pattern.
    #[error("manifest pattern '{pattern}' is ambiguous: matches {matches:?}")]
    ManifestAmbiguous {
        /// The pattern that was searched for.
        pattern: String,
        /// Every root-level file name that matched.
        matches: Vec<String>,
    },

    /// The manifest filename pattern is not a valid regular expression.
    #[error("invalid manifest pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The rejected pattern.
        pattern: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The manifest is not parseable XML.
    #[error("manifest '{manifest}' is not well-formed XML: {message}")]
    WellFormedness {
        /// Root-relative path of the manifest.
        manifest: String,
        /// Parser diagnostic.
        message: String,
    },

    /// A path escapes the package root.
    #[error("path '{path}' escapes the package root: {reason}")]
    PathTraversal {
        /// The offending path as declared.
        path: String,
        /// Why the path was rejected.
        reason: String,
    },

    /// A resolved path does not exist as a regular file in the package.
    #[error("file '{path}' not found in package")]
    NotFound {
        /// The root-relative path that failed to open.
        path: String,
    },

    /// The package location is neither a directory nor a supported
    /// archive container.
    #[error("unsupported package location '{path}': {reason}")]
    UnsupportedPackage {
        /// The package location as given by the caller.
        path: PathBuf,
        /// Why the location cannot be opened.
        reason: String,
    },

    /// The archive container is corrupt or uses an unsupported feature.
    #[error("archive error: {message}")]
    Archive {
        /// Diagnostic from the archive reader.
        message: String,
    },

    /// An I/O failure outside of checksum streaming.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
