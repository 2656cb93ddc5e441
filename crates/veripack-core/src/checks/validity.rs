//! Validity check: manifest schema conformance as its own outcome.

use crate::manifest::Manifest;
use crate::report::CheckKind;
use crate::report::CheckOutcome;
use crate::report::Finding;

/// Reports the manifest's structural schema validation as a check of
/// its own, independent of the other three: a package can be complete
/// and fixity-correct while its manifest is schema-invalid, and the
/// reverse holds for valid-but-tampered packages.
#[must_use]
pub fn check(manifest: &Manifest) -> CheckOutcome {
    let findings = manifest
        .schema_violations
        .iter()
        .map(|violation| Finding::fail(manifest.path.as_str(), violation.clone()))
        .collect();
    CheckOutcome::from_findings(CheckKind::Validity, findings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::RelPath;

    fn manifest(violations: Vec<String>) -> Manifest {
        Manifest {
            path: RelPath::resolve("mets.xml").unwrap(),
            namespace: None,
            schema_violations: violations,
            entries: Vec::new(),
        }
    }

    #[test]
    fn clean_manifest_passes() {
        let outcome = check(&manifest(Vec::new()));
        assert!(outcome.passed());
        assert!(outcome.findings.is_empty());
    }

    #[test]
    fn each_violation_becomes_a_finding() {
        let outcome = check(&manifest(vec![
            "manifest has no fileSec".to_owned(),
            "file 'f1' declares no checksum".to_owned(),
        ]));
        assert!(!outcome.passed());
        assert_eq!(outcome.findings.len(), 2);
        assert_eq!(outcome.findings[0].subject, "mets.xml");
    }
}
