//! Machine-readable validation report.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use mkt_model::{IssueKind, ResourceName, ValidationIssue, ValidationReport};
use serde::Serialize;

pub const REPORT_SCHEMA: &str = "mkt-seed.validation-report";
pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize)]
pub struct ValidationReportPayload<'a> {
    pub schema: &'static str,
    pub schema_version: u32,
    pub generated_at: String,
    /// Path or URL the document was loaded from.
    pub source: &'a str,
    pub valid: bool,
    pub issue_count: usize,
    pub by_resource: BTreeMap<ResourceName, usize>,
    pub by_kind: BTreeMap<IssueKind, usize>,
    pub issues: &'a [ValidationIssue],
}

impl<'a> ValidationReportPayload<'a> {
    pub fn new(source: &'a str, report: &'a ValidationReport) -> Self {
        Self {
            schema: REPORT_SCHEMA,
            schema_version: REPORT_SCHEMA_VERSION,
            generated_at: Utc::now().to_rfc3339(),
            source,
            valid: report.is_valid(),
            issue_count: report.error_count(),
            by_resource: report.count_by_resource(),
            by_kind: report.count_by_kind(),
            issues: &report.issues,
        }
    }
}

/// Writes the report as pretty JSON, creating parent directories.
pub fn write_validation_report_json(
    output_path: &Path,
    source: &str,
    report: &ValidationReport,
) -> Result<()> {
    if let Some(parent) = output_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create report directory {}", parent.display()))?;
    }
    let payload = ValidationReportPayload::new(source, report);
    let json = serde_json::to_string_pretty(&payload)?;
    std::fs::write(output_path, format!("{json}\n"))
        .with_context(|| format!("write validation report {}", output_path.display()))?;
    Ok(())
}
