//! Structured verification results.

use std::fmt;
use std::time::SystemTime;

use crate::types::RelPath;

/// The four independent checks a verification run can perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckKind {
    /// Manifest is well-formed and structurally schema-valid.
    Validity,
    /// Every referenced file is present in the package.
    Completeness,
    /// Every referenced file's content matches its declared checksum.
    Fixity,
    /// No package file is left unreferenced by the manifest.
    Orphans,
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Validity => "validity",
            Self::Completeness => "completeness",
            Self::Fixity => "fixity",
            Self::Orphans => "orphans",
        };
        f.write_str(name)
    }
}

/// Overall status of one check.
///
/// A check passes only when every finding passed. A finding-level
/// `missing` or `error` demotes the check to `Fail` just like an
/// ordinary mismatch; the finer distinction stays on the finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Every finding passed.
    Pass,
    /// At least one finding did not pass.
    Fail,
}

/// Status of a single per-item finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindingStatus {
    /// The item satisfied the check.
    Pass,
    /// The item violated the check.
    Fail,
    /// The item could not be located in the package.
    Missing,
    /// The item could not be checked (malformed entry, read failure).
    Error,
}

impl fmt::Display for FindingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Missing => "missing",
            Self::Error => "error",
        };
        f.write_str(name)
    }
}

/// One per-item result inside a check outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    /// Status of this item.
    pub status: FindingStatus,
    /// What was checked: an entry path, an entry identifier, or an
    /// orphan path.
    pub subject: String,
    /// Human-readable cause; empty for passing findings.
    pub cause: String,
}

impl Finding {
    /// A passing finding for `subject`.
    #[must_use]
    pub fn pass(subject: impl Into<String>) -> Self {
        Self {
            status: FindingStatus::Pass,
            subject: subject.into(),
            cause: String::new(),
        }
    }

    /// A failing finding with a cause.
    #[must_use]
    pub fn fail(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            status: FindingStatus::Fail,
            subject: subject.into(),
            cause: cause.into(),
        }
    }

    /// A finding for an item absent from the package.
    #[must_use]
    pub fn missing(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            status: FindingStatus::Missing,
            subject: subject.into(),
            cause: cause.into(),
        }
    }

    /// A finding for an item that could not be checked.
    #[must_use]
    pub fn error(subject: impl Into<String>, cause: impl Into<String>) -> Self {
        Self {
            status: FindingStatus::Error,
            subject: subject.into(),
            cause: cause.into(),
        }
    }
}

/// The result of one check against one manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    /// Which check produced this outcome.
    pub kind: CheckKind,
    /// Derived overall status.
    pub status: CheckStatus,
    /// Ordered per-item findings. Fixity and completeness findings
    /// follow manifest document order; orphan findings are sorted
    /// lexicographically.
    pub findings: Vec<Finding>,
}

impl CheckOutcome {
    /// Builds an outcome, deriving the overall status from the findings.
    #[must_use]
    pub fn from_findings(kind: CheckKind, findings: Vec<Finding>) -> Self {
        let status = if findings.iter().all(|f| f.status == FindingStatus::Pass) {
            CheckStatus::Pass
        } else {
            CheckStatus::Fail
        };
        Self {
            kind,
            status,
            findings,
        }
    }

    /// Whether the check passed overall.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.status == CheckStatus::Pass
    }

    /// Findings that did not pass, in their original order.
    pub fn problems(&self) -> impl Iterator<Item = &Finding> {
        self.findings
            .iter()
            .filter(|f| f.status != FindingStatus::Pass)
    }
}

/// The full verification result for one manifest.
///
/// A plain value with no package resources attached; it can be
/// serialized or rendered without re-touching the package.
#[derive(Debug, Clone)]
pub struct VerificationReport {
    /// Root-relative path of the manifest this report describes.
    pub manifest: RelPath,
    /// When verification ran.
    pub timestamp: SystemTime,
    /// Schema validity outcome, when requested.
    pub validity: Option<CheckOutcome>,
    /// Completeness outcome, when requested.
    pub completeness: Option<CheckOutcome>,
    /// Fixity outcome, when requested.
    pub fixity: Option<CheckOutcome>,
    /// Orphan detection outcome, when requested.
    pub orphans: Option<CheckOutcome>,
    /// Package paths rejected at listing time (archive members escaping
    /// the root). Never silently dropped: each rejection is a finding
    /// that fails the report.
    pub listing_findings: Vec<Finding>,
}

impl VerificationReport {
    /// Iterates over the outcomes that were produced.
    pub fn outcomes(&self) -> impl Iterator<Item = &CheckOutcome> {
        [
            self.validity.as_ref(),
            self.completeness.as_ref(),
            self.fixity.as_ref(),
            self.orphans.as_ref(),
        ]
        .into_iter()
        .flatten()
    }

    /// Overall pass: every requested check passed and the package
    /// listing contained no rejected paths.
    #[must_use]
    pub fn passed(&self) -> bool {
        self.listing_findings.is_empty() && self.outcomes().all(CheckOutcome::passed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn outcome_status_derivation() {
        let outcome = CheckOutcome::from_findings(
            CheckKind::Fixity,
            vec![Finding::pass("a"), Finding::pass("b")],
        );
        assert!(outcome.passed());

        let outcome = CheckOutcome::from_findings(
            CheckKind::Fixity,
            vec![Finding::pass("a"), Finding::error("b", "unreadable")],
        );
        assert_eq!(outcome.status, CheckStatus::Fail);
        assert_eq!(outcome.problems().count(), 1);
    }

    #[test]
    fn empty_findings_pass() {
        let outcome = CheckOutcome::from_findings(CheckKind::Orphans, Vec::new());
        assert!(outcome.passed());
    }

    #[test]
    fn report_overall_requires_every_requested_check() {
        let pass = CheckOutcome::from_findings(CheckKind::Completeness, vec![Finding::pass("x")]);
        let fail = CheckOutcome::from_findings(
            CheckKind::Fixity,
            vec![Finding::fail("x", "checksum mismatch")],
        );

        let mut report = VerificationReport {
            manifest: RelPath::resolve("mets.xml").unwrap(),
            timestamp: SystemTime::now(),
            validity: None,
            completeness: Some(pass),
            fixity: Some(fail),
            orphans: None,
            listing_findings: Vec::new(),
        };
        assert!(!report.passed());

        report.fixity = None;
        assert!(report.passed());

        report.listing_findings =
            vec![Finding::error("../evil", "path escapes the package root")];
        assert!(!report.passed());
    }
}
