//! Orphan detection: package files never referenced by the manifest.

use std::collections::BTreeSet;

use crate::accessor::FileListing;
use crate::manifest::FileEntry;
use crate::report::CheckKind;
use crate::report::CheckOutcome;
use crate::report::Finding;
use crate::types::RelPath;

/// Computes the package files not referenced by any entry.
///
/// The manifest's own path is never an orphan, and only regular files
/// count (directory entries never appear in the listing). Findings come
/// out in lexicographic path order, so reports are reproducible.
#[must_use]
pub fn check(listing: &FileListing, entries: &[FileEntry], manifest_path: &RelPath) -> CheckOutcome {
    let referenced: BTreeSet<&RelPath> = entries.iter().filter_map(|e| e.path.as_ref()).collect();

    let findings = listing
        .files
        .iter()
        .filter(|path| *path != manifest_path && !referenced.contains(path))
        .map(|orphan| Finding::fail(orphan.as_str(), "file is not referenced by the manifest"))
        .collect();

    CheckOutcome::from_findings(CheckKind::Orphans, findings)
}
