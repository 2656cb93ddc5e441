//! Fixity check: file content matches declared checksums.

use crate::VerifyError;
use crate::accessor::PackageAccessor;
use crate::digest::stream_digest;
use crate::manifest::FileEntry;
use crate::report::CheckKind;
use crate::report::CheckOutcome;
use crate::report::Finding;

/// Recomputes and compares checksums for every entry, in manifest
/// document order.
///
/// Presence is observed here independently of the completeness check: a
/// missing file yields a `missing` finding so fixity stays
/// interpretable on its own. Digest comparison is case-insensitive;
/// mismatches record both digests for diagnosis, and read failures
/// while streaming are reported as `error`, distinct from mismatches.
#[must_use]
pub fn verify(accessor: &dyn PackageAccessor, entries: &[FileEntry]) -> CheckOutcome {
    let findings = entries
        .iter()
        .map(|entry| verify_entry(accessor, entry))
        .collect();
    CheckOutcome::from_findings(CheckKind::Fixity, findings)
}

fn verify_entry(accessor: &dyn PackageAccessor, entry: &FileEntry) -> Finding {
    let subject = entry.subject();

    if !entry.defects.is_empty() {
        return Finding::error(subject, format!("malformed entry: {}", entry.describe_defects()));
    }

    // Defect-free entries always carry both a path and a checksum.
    let (Some(path), Some(declared)) = (&entry.path, &entry.checksum) else {
        return Finding::error(subject, "malformed entry: incomplete declaration");
    };

    let stream = match accessor.open(path) {
        Ok(stream) => stream,
        Err(VerifyError::NotFound { .. }) => {
            return Finding::missing(subject, "file not found in package");
        }
        Err(err) => return Finding::error(subject, err.to_string()),
    };

    match stream_digest(stream, declared.algorithm) {
        Ok(computed) if computed.eq_ignore_ascii_case(&declared.value) => Finding::pass(subject),
        Ok(computed) => Finding::fail(
            subject,
            format!(
                "checksum mismatch: declared {} {}, computed {}",
                declared.algorithm, declared.value, computed
            ),
        ),
        Err(err) => Finding::error(subject, format!("read failure while streaming: {err}")),
    }
}
