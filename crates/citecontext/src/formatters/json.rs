//! JSON report output.

use crate::models::Report;

/// Pretty-printed report; non-ASCII text is written as-is.
pub fn format_report_json(report: &Report) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}

/// Parse a report written by [`format_report_json`].
pub fn parse_report_json(input: &str) -> serde_json::Result<Report> {
    serde_json::from_str(input)
}
