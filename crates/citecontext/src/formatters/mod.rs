//! Report formatting and file output.

pub mod json;
pub mod markdown;

use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::PipelineResult;
use crate::models::Report;

pub use json::{format_report_json, parse_report_json};
pub use markdown::format_records_markdown;

/// Read a report JSON file.
pub fn read_report(path: &Path) -> PipelineResult<Report> {
    let raw = fs::read_to_string(path)?;
    Ok(parse_report_json(&raw)?)
}

/// Write `report` as JSON to `path`.
pub fn write_json(path: &Path, report: &Report) -> PipelineResult<()> {
    fs::write(path, format_report_json(report)?)?;
    info!(path = %path.display(), records = report.records.len(), "wrote JSON report");
    Ok(())
}

/// Write `report`'s records as a Markdown table to `path`.
pub fn write_markdown(path: &Path, report: &Report, max_context_chars: usize) -> PipelineResult<()> {
    fs::write(path, format_records_markdown(&report.records, max_context_chars))?;
    info!(path = %path.display(), "wrote Markdown report");
    Ok(())
}
