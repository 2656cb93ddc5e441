//! High-level verification API.

use std::path::Path;
use std::path::PathBuf;
use std::time::SystemTime;

use crate::Result;
use crate::accessor::PackageAccessor;
use crate::accessor::open_package;
use crate::checks::completeness;
use crate::checks::fixity;
use crate::checks::orphans;
use crate::checks::validity;
use crate::config::CheckConfig;
use crate::manifest::ManifestLocator;
use crate::manifest::parse;
use crate::report::Finding;
use crate::report::VerificationReport;

/// Verifies one package against its manifest.
///
/// Runs the checks selected in `config` over the same parsed entry list
/// and the same package listing, then merges their outcomes into a
/// single report.
///
/// # Errors
///
/// Only manifest lookup failures, malformed manifest XML, and package
/// access failures are returned as errors; everything else lands in the
/// report as findings.
///
/// # Examples
///
/// ```no_run
/// use veripack_core::CheckConfig;
/// use veripack_core::ManifestLocator;
/// use veripack_core::accessor::open_package;
/// use veripack_core::verify_package;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let accessor = open_package("package".as_ref())?;
/// let locator = ManifestLocator::Name("mets.xml".to_owned());
/// let report = verify_package(&*accessor, &locator, &CheckConfig::default())?;
/// println!("passed: {}", report.passed());
/// # Ok(())
/// # }
/// ```
pub fn verify_package(
    accessor: &dyn PackageAccessor,
    locator: &ManifestLocator,
    config: &CheckConfig,
) -> Result<VerificationReport> {
    let listing = accessor.list_files()?;
    let manifest = parse(accessor, &listing, locator)?;

    let listing_findings = listing
        .rejected
        .iter()
        .map(|rejected| Finding::error(rejected.raw.clone(), rejected.reason.clone()))
        .collect();

    Ok(VerificationReport {
        validity: config.validity.then(|| validity::check(&manifest)),
        completeness: config
            .completeness
            .then(|| completeness::check(&listing, &manifest.entries)),
        fixity: config.fixity.then(|| fixity::verify(accessor, &manifest.entries)),
        orphans: config
            .orphans
            .then(|| orphans::check(&listing, &manifest.entries, &manifest.path)),
        manifest: manifest.path,
        timestamp: SystemTime::now(),
        listing_findings,
    })
}

/// Verifies a package at a filesystem location, choosing the accessor
/// variant (directory, zip, tar) from the location itself.
///
/// # Errors
///
/// As [`verify_package`], plus
/// [`VerifyError::UnsupportedPackage`](crate::VerifyError::UnsupportedPackage)
/// for locations with no matching accessor.
pub fn verify_location(
    location: &Path,
    locator: &ManifestLocator,
    config: &CheckConfig,
) -> Result<VerificationReport> {
    let accessor = open_package(location)?;
    verify_package(&*accessor, locator, config)
}

/// The result slot for one package in a batch run.
#[derive(Debug)]
pub struct PackageOutcome {
    /// The package location as submitted.
    pub location: PathBuf,
    /// The report, or the fatal error that stopped this package.
    pub result: Result<VerificationReport>,
}

/// Verifies every submitted package location independently.
///
/// One package's fatal error never aborts the rest; it is captured in
/// that package's slot. No state is shared between packages.
#[must_use]
pub fn verify_batch(
    locations: &[PathBuf],
    locator: &ManifestLocator,
    config: &CheckConfig,
) -> Vec<PackageOutcome> {
    locations
        .iter()
        .map(|location| PackageOutcome {
            location: location.clone(),
            result: verify_location(location, locator, config),
        })
        .collect()
}
