//! Error conversion utilities for CLI.
//!
//! Converts veripack-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use veripack_core::VerifyError;

/// Converts `VerifyError` to a user-friendly anyhow error with context
pub fn convert_verify_error(err: &VerifyError, package: &Path) -> anyhow::Error {
    match err {
        VerifyError::ManifestNotFound { pattern } => {
            anyhow!(
                "No manifest matching '{}' at the root of '{}'\n\
                 HINT: Use --manifest for a literal name or --manifest-pattern for a regex.",
                pattern,
                package.display()
            )
        }
        VerifyError::ManifestAmbiguous { pattern, matches } => {
            anyhow!(
                "Manifest pattern '{}' matches {} files in '{}': {}\n\
                 HINT: Tighten the pattern until exactly one root-level file matches.",
                pattern,
                matches.len(),
                package.display(),
                matches.join(", ")
            )
        }
        VerifyError::WellFormedness { manifest, message } => {
            anyhow!(
                "Manifest '{}' in '{}' is not well-formed XML: {}\n\
                 No checks were run for this package.",
                manifest,
                package.display(),
                message
            )
        }
        VerifyError::UnsupportedPackage { path, reason } => {
            anyhow!(
                "Cannot open package '{}': {}\n\
                 HINT: Supported locations are directories, .zip, and uncompressed .tar files.",
                path.display(),
                reason
            )
        }
        VerifyError::InvalidPattern { pattern, source } => {
            anyhow!("Manifest pattern '{pattern}' is not a valid regular expression: {source}")
        }
        other => anyhow!("{}: {other}", package.display()),
    }
}
