//! Output formatter trait for CLI results.

use anyhow::Result;
use serde::Serialize;
use veripack_core::Manifest;
use veripack_core::PackageOutcome;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Renders the full batch of per-package verification results.
    fn format_batch(&self, outcomes: &[PackageOutcome]) -> Result<()>;

    /// Renders a manifest's entry table.
    fn format_entries(&self, manifest: &Manifest) -> Result<()>;

    /// Renders a top-level error.
    fn format_error(&self, error: &anyhow::Error);
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Error,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(operation: impl Into<String>, error: impl Into<String>) -> JsonOutput<()> {
        JsonOutput {
            operation: operation.into(),
            status: Status::Error,
            data: None,
            error: Some(error.into()),
        }
    }
}
