//! JSON output formatter for machine-readable results.

use std::io::Write;
use std::io::{self};
use std::time::UNIX_EPOCH;

use anyhow::Result;
use serde::Serialize;
use veripack_core::CheckOutcome;
use veripack_core::Finding;
use veripack_core::Manifest;
use veripack_core::PackageOutcome;
use veripack_core::VerificationReport;

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;

pub struct JsonFormatter;

#[derive(Serialize)]
struct FindingOutput {
    status: String,
    subject: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    cause: String,
}

#[derive(Serialize)]
struct OutcomeOutput {
    kind: String,
    status: String,
    findings: Vec<FindingOutput>,
}

#[derive(Serialize)]
struct ReportOutput {
    package: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    timestamp_epoch_secs: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    passed: Option<bool>,
    checks: Vec<OutcomeOutput>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    rejected_paths: Vec<FindingOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct EntryOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    algorithm: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    checksum: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    defects: Vec<String>,
}

fn finding_output(finding: &Finding) -> FindingOutput {
    FindingOutput {
        status: finding.status.to_string(),
        subject: finding.subject.clone(),
        cause: finding.cause.clone(),
    }
}

fn outcome_output(outcome: &CheckOutcome) -> OutcomeOutput {
    OutcomeOutput {
        kind: outcome.kind.to_string(),
        status: if outcome.passed() { "pass" } else { "fail" }.to_owned(),
        findings: outcome.findings.iter().map(finding_output).collect(),
    }
}

fn report_output(package: String, report: &VerificationReport) -> ReportOutput {
    ReportOutput {
        package,
        manifest: Some(report.manifest.as_str().to_owned()),
        timestamp_epoch_secs: report
            .timestamp
            .duration_since(UNIX_EPOCH)
            .ok()
            .map(|d| d.as_secs()),
        passed: Some(report.passed()),
        checks: report.outcomes().map(outcome_output).collect(),
        rejected_paths: report.listing_findings.iter().map(finding_output).collect(),
        error: None,
    }
}

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_batch(&self, outcomes: &[PackageOutcome]) -> Result<()> {
        let reports: Vec<ReportOutput> = outcomes
            .iter()
            .map(|outcome| {
                let package = outcome.location.display().to_string();
                match &outcome.result {
                    Ok(report) => report_output(package, report),
                    Err(err) => ReportOutput {
                        package,
                        manifest: None,
                        timestamp_epoch_secs: None,
                        passed: None,
                        checks: Vec::new(),
                        rejected_paths: Vec::new(),
                        error: Some(err.to_string()),
                    },
                }
            })
            .collect();

        let output = JsonOutput::success("verify", reports);
        Self::output(&output)
    }

    fn format_entries(&self, manifest: &Manifest) -> Result<()> {
        let entries: Vec<EntryOutput> = manifest
            .entries
            .iter()
            .map(|entry| EntryOutput {
                id: entry.id.clone(),
                path: entry.path.as_ref().map(|p| p.as_str().to_owned()),
                algorithm: entry
                    .checksum
                    .as_ref()
                    .map(|c| c.algorithm.declared_name().to_owned()),
                checksum: entry.checksum.as_ref().map(|c| c.value.clone()),
                defects: entry.defects.iter().map(ToString::to_string).collect(),
            })
            .collect();

        let output = JsonOutput::success("list", entries);
        Self::output(&output)
    }

    fn format_error(&self, error: &anyhow::Error) {
        let output = JsonOutput::<()>::error("unknown", format!("{error:?}"));
        let _ = Self::output(&output);
    }
}
