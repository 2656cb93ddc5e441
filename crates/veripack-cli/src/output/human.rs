//! Human-readable output formatter with colors and styling.

use anyhow::Result;
use console::Term;
use console::style;
use veripack_core::CheckOutcome;
use veripack_core::FindingStatus;
use veripack_core::Manifest;
use veripack_core::PackageOutcome;
use veripack_core::VerificationReport;

use super::formatter::OutputFormatter;
use crate::error::convert_verify_error;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn write_line(&self, line: &str) {
        let _ = self.term.write_line(line);
    }

    fn mark(&self, passed: bool) -> String {
        if self.use_colors {
            if passed {
                style("✓").green().bold().to_string()
            } else {
                style("✗").red().bold().to_string()
            }
        } else if passed {
            "OK".to_owned()
        } else {
            "FAIL".to_owned()
        }
    }

    fn write_outcome(&self, outcome: &CheckOutcome) {
        self.write_line(&format!(
            "  {} {}",
            self.mark(outcome.passed()),
            outcome.kind
        ));
        for finding in &outcome.findings {
            if finding.status == FindingStatus::Pass && !self.verbose {
                continue;
            }
            let line = if finding.cause.is_empty() {
                format!("      [{}] {}", finding.status, finding.subject)
            } else {
                format!(
                    "      [{}] {}: {}",
                    finding.status, finding.subject, finding.cause
                )
            };
            self.write_line(&line);
        }
    }

    fn write_report(&self, location: &str, report: &VerificationReport) {
        self.write_line(&format!(
            "{} {} ({})",
            self.mark(report.passed()),
            location,
            report.manifest
        ));
        for outcome in report.outcomes() {
            self.write_outcome(outcome);
        }
        for finding in &report.listing_findings {
            self.write_line(&format!(
                "      [{}] {}: {}",
                finding.status, finding.subject, finding.cause
            ));
        }
    }

    fn write_summary_table(&self, outcomes: &[PackageOutcome]) {
        fn cell(outcome: Option<&CheckOutcome>) -> &'static str {
            outcome.map_or("-", |o| if o.passed() { "pass" } else { "fail" })
        }

        let width = outcomes
            .iter()
            .map(|o| o.location.display().to_string().len())
            .chain(std::iter::once("package".len()))
            .max()
            .unwrap_or_default();

        self.write_line("");
        self.write_line(&format!(
            "{:<width$}  {:<12} {:<12} {:<12} {:<12} result",
            "package", "validity", "completeness", "fixity", "orphans"
        ));
        for outcome in outcomes {
            let location = outcome.location.display().to_string();
            let row = match &outcome.result {
                Ok(report) => format!(
                    "{location:<width$}  {:<12} {:<12} {:<12} {:<12} {}",
                    cell(report.validity.as_ref()),
                    cell(report.completeness.as_ref()),
                    cell(report.fixity.as_ref()),
                    cell(report.orphans.as_ref()),
                    if report.passed() { "PASS" } else { "FAIL" },
                ),
                Err(_) => format!(
                    "{location:<width$}  {:<12} {:<12} {:<12} {:<12} ERROR",
                    "-", "-", "-", "-"
                ),
            };
            self.write_line(&row);
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_batch(&self, outcomes: &[PackageOutcome]) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        for outcome in outcomes {
            let location = outcome.location.display().to_string();
            match &outcome.result {
                Ok(report) => self.write_report(&location, report),
                Err(err) => {
                    let friendly = convert_verify_error(err, &outcome.location);
                    self.write_line(&format!("{} {location}: {friendly}", self.mark(false)));
                }
            }
        }

        self.write_summary_table(outcomes);

        let passed = outcomes
            .iter()
            .filter(|o| o.result.as_ref().is_ok_and(VerificationReport::passed))
            .count();
        self.write_line(&format!(
            "{passed}/{} package(s) passed",
            outcomes.len()
        ));
        Ok(())
    }

    fn format_entries(&self, manifest: &Manifest) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.write_line(&format!(
            "{} entries in {}",
            manifest.entries.len(),
            manifest.path
        ));
        for entry in &manifest.entries {
            let id = entry.id.as_deref().unwrap_or("-");
            let path = entry
                .path
                .as_ref()
                .map_or_else(|| "<unresolved>".to_owned(), ToString::to_string);
            let checksum = entry.checksum.as_ref().map_or_else(
                || "-".to_owned(),
                |c| format!("{} {}", c.algorithm, c.value),
            );
            self.write_line(&format!("  {id}  {path}  {checksum}"));
            if !entry.defects.is_empty() {
                self.write_line(&format!("      malformed: {}", entry.describe_defects()));
            }
        }
        Ok(())
    }

    fn format_error(&self, error: &anyhow::Error) {
        let styled = if self.use_colors {
            format!("{} {error:#}", style("error:").red().bold())
        } else {
            format!("error: {error:#}")
        };
        let _ = Term::stderr().write_line(&styled);
    }
}
