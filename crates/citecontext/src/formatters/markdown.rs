//! Markdown table output.

use crate::models::{CitationRecord, PaperSummary};

/// Columns without enrichment.
pub const DEFAULT_HEADERS: &[&str] = &[
    "Cited paper",
    "Cited venue / year",
    "Citing paper",
    "Citing venue / year",
    "Earliest citing author",
    "Citation context",
];

/// Columns once any record carries a title summary.
pub const ENRICHED_HEADERS: &[&str] = &[
    "Cited paper",
    "Cited venue / year",
    "Citing paper",
    "Citing venue / year",
    "Earliest citing author",
    "Title sum",
    "Citation context",
];

fn has_enrichment(records: &[CitationRecord]) -> bool {
    records.iter().any(|r| !r.title_sum().is_empty())
}

/// Headers matching the rows [`records_to_rows`] produces.
#[must_use]
pub fn headers_for_records(records: &[CitationRecord]) -> &'static [&'static str] {
    if has_enrichment(records) { ENRICHED_HEADERS } else { DEFAULT_HEADERS }
}

/// Escape a value for a table cell: pipes escaped, newlines as `<br>`.
#[must_use]
pub fn escape_cell(value: &str) -> String {
    value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', "<br>")
        .replace('|', "\\|")
        .trim()
        .to_string()
}

/// Render a table; short rows are padded, long rows cut to the header width.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    let header_cells: Vec<String> = headers.iter().map(|h| escape_cell(h)).collect();
    out.push_str(&format!("| {} |\n", header_cells.join(" | ")));
    out.push_str(&format!("| {} |\n", vec!["---"; headers.len()].join(" | ")));

    for row in rows {
        let cells: Vec<String> = (0..headers.len())
            .map(|i| row.get(i).map(|v| escape_cell(v)).unwrap_or_default())
            .collect();
        out.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    out
}

/// `"venue year"`, or whichever is present.
#[must_use]
pub fn venue_year(venue: Option<&str>, year: Option<i32>) -> String {
    let venue = venue.map(str::trim).unwrap_or("");
    match (venue.is_empty(), year) {
        (false, Some(y)) => format!("{venue} {y}"),
        (false, None) => venue.to_string(),
        (true, Some(y)) => y.to_string(),
        (true, None) => String::new(),
    }
}

/// `[title](url)`, plain title without a url, `""` without a title.
#[must_use]
pub fn link(title: Option<&str>, url: Option<&str>) -> String {
    let title = title.map(str::trim).unwrap_or("");
    let url = url.map(str::trim).unwrap_or("");
    if title.is_empty() {
        String::new()
    } else if url.is_empty() {
        title.to_string()
    } else {
        format!("[{title}]({url})")
    }
}

/// First non-blank context, truncated to `max_chars` characters with `…`.
/// `max_chars == 0` disables truncation.
#[must_use]
pub fn pick_context(contexts: &[String], max_chars: usize) -> String {
    let first = contexts.iter().map(|c| c.trim()).find(|c| !c.is_empty()).unwrap_or("");
    if max_chars > 0 && first.chars().count() > max_chars {
        let head: String = first.chars().take(max_chars - 1).collect();
        format!("{}…", head.trim_end())
    } else {
        first.to_string()
    }
}

fn paper_cells(paper: &PaperSummary) -> (String, String) {
    (
        link(paper.title.as_deref(), paper.url.as_deref()),
        venue_year(paper.venue.as_deref(), paper.year),
    )
}

fn earliest_cell(record: &CitationRecord) -> String {
    let name = record.earliest_author_name();
    let year = record.citing_earliest_author.as_ref().and_then(|a| a.earliest_publication_year);
    match year {
        Some(year) if !name.is_empty() => format!("{name} ({year})"),
        _ => name.to_string(),
    }
}

/// Table rows, most-cited cited paper first, then most-cited citing paper,
/// then cited and citing titles (case-insensitive).
#[must_use]
pub fn records_to_rows(records: &[CitationRecord], max_context_chars: usize) -> Vec<Vec<String>> {
    let enriched = has_enrichment(records);

    let mut sorted: Vec<&CitationRecord> = records.iter().collect();
    sorted.sort_by_cached_key(|r| {
        (
            std::cmp::Reverse(r.cited_paper.citation_count.unwrap_or(0)),
            std::cmp::Reverse(r.citing_paper.citation_count.unwrap_or(0)),
            r.cited_paper.title.as_deref().unwrap_or("").to_lowercase(),
            r.citing_paper.title.as_deref().unwrap_or("").to_lowercase(),
        )
    });

    sorted
        .into_iter()
        .map(|r| {
            let (cited_title, cited_vy) = paper_cells(&r.cited_paper);
            let (citing_title, citing_vy) = paper_cells(&r.citing_paper);
            let mut row = vec![cited_title, cited_vy, citing_title, citing_vy, earliest_cell(r)];
            if enriched {
                row.push(r.title_sum().to_string());
            }
            row.push(pick_context(&r.citation_contexts, max_context_chars));
            row
        })
        .collect()
}

/// Full Markdown document for `records`.
#[must_use]
pub fn format_records_markdown(records: &[CitationRecord], max_context_chars: usize) -> String {
    render_table(headers_for_records(records), &records_to_rows(records, max_context_chars))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_cell() {
        assert_eq!(escape_cell(" a|b\r\nc\rd "), "a\\|b<br>c<br>d");
    }

    #[test]
    fn test_venue_year() {
        assert_eq!(venue_year(Some("ICML"), Some(2020)), "ICML 2020");
        assert_eq!(venue_year(Some("  "), Some(2020)), "2020");
        assert_eq!(venue_year(Some("ICML"), None), "ICML");
        assert_eq!(venue_year(None, None), "");
    }

    #[test]
    fn test_link() {
        assert_eq!(link(Some("T"), Some("https://x")), "[T](https://x)");
        assert_eq!(link(Some("T"), None), "T");
        assert_eq!(link(None, Some("https://x")), "");
    }

    #[test]
    fn test_pick_context_truncates_on_char_boundary() {
        let contexts = vec!["   ".to_string(), "αβγδε".to_string()];
        assert_eq!(pick_context(&contexts, 3), "αβ…");
        assert_eq!(pick_context(&contexts, 5), "αβγδε");
        assert_eq!(pick_context(&contexts, 0), "αβγδε");
        assert_eq!(pick_context(&[], 10), "");
    }

    #[test]
    fn test_render_table_pads_rows() {
        let out = render_table(&["A", "B"], &[vec!["1".to_string()]]);
        assert_eq!(out, "| A | B |\n| --- | --- |\n| 1 |  |\n");
    }
}
