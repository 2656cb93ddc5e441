//! Completeness check: every referenced file is present.

use crate::accessor::FileListing;
use crate::manifest::FileEntry;
use crate::report::CheckKind;
use crate::report::CheckOutcome;
use crate::report::Finding;

/// Tests each entry's resolved path for membership in the package
/// listing, in manifest document order.
///
/// Malformed entries surface here too, as `error` findings, so an
/// undeclarable file is never silently dropped from consideration.
#[must_use]
pub fn check(listing: &FileListing, entries: &[FileEntry]) -> CheckOutcome {
    let findings = entries
        .iter()
        .map(|entry| {
            let subject = entry.subject();
            if !entry.defects.is_empty() {
                return Finding::error(
                    subject,
                    format!("malformed entry: {}", entry.describe_defects()),
                );
            }
            match &entry.path {
                Some(path) if listing.files.contains(path) => Finding::pass(subject),
                Some(_) => Finding::fail(subject, "referenced file is missing from the package"),
                None => Finding::error(subject, "malformed entry: incomplete declaration"),
            }
        })
        .collect();
    CheckOutcome::from_findings(CheckKind::Completeness, findings)
}
