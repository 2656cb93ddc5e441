//! Manifest-driven package integrity verification.
//!
//! `veripack-core` verifies a packaged digital object against its XML
//! manifest: the manifest is checked for well-formedness and structural
//! schema validity, every referenced file for presence and checksum
//! fixity, and the package for files the manifest never references.
//! The four checks are independent; each produces its own outcome, and
//! no check's failure suppresses another's signal.
//!
//! # Examples
//!
//! ```no_run
//! use veripack_core::CheckConfig;
//! use veripack_core::ManifestLocator;
//! use veripack_core::verify_location;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let locator = ManifestLocator::Name("mets.xml".to_owned());
//! let report = verify_location("package".as_ref(), &locator, &CheckConfig::default())?;
//! for outcome in report.outcomes() {
//!     println!("{}: {:?}", outcome.kind, outcome.status);
//! }
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod accessor;
pub mod api;
pub mod checks;
pub mod config;
pub mod digest;
pub mod error;
pub mod manifest;
pub mod report;
pub mod test_utils;
pub mod types;

// Re-export main API types
pub use accessor::DirAccessor;
pub use accessor::PackageAccessor;
pub use accessor::TarAccessor;
pub use accessor::ZipAccessor;
pub use accessor::open_package;
pub use api::PackageOutcome;
pub use api::verify_batch;
pub use api::verify_location;
pub use api::verify_package;
pub use config::CheckConfig;
pub use digest::ChecksumAlgorithm;
pub use error::Result;
pub use error::VerifyError;
pub use manifest::FileEntry;
pub use manifest::Manifest;
pub use manifest::ManifestLocator;
pub use report::CheckKind;
pub use report::CheckOutcome;
pub use report::CheckStatus;
pub use report::Finding;
pub use report::FindingStatus;
pub use report::VerificationReport;
pub use types::RelPath;
