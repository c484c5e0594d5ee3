//! Report rows written by the extraction run and read back by enrichment.

use serde::{Deserialize, Serialize};

use super::{Citation, ExternalIds, Paper};

/// The author whose papers were scanned.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitedAuthor {
    /// Semantic Scholar author ID.
    #[serde(rename = "authorId")]
    pub author_id: String,
    /// Display name.
    pub name: String,
}

/// Paper fields echoed into each record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PaperSummary {
    pub paper_id: Option<String>,
    pub title: Option<String>,
    pub venue: Option<String>,
    pub year: Option<i32>,
    pub citation_count: Option<i32>,
    pub external_ids: Option<ExternalIds>,
    pub url: Option<String>,
}

impl From<&Paper> for PaperSummary {
    fn from(paper: &Paper) -> Self {
        Self {
            paper_id: paper.paper_id.clone(),
            title: paper.title.clone(),
            venue: paper.venue.clone(),
            year: paper.year,
            citation_count: paper.citation_count,
            external_ids: paper.external_ids.clone(),
            url: paper.url.clone(),
        }
    }
}

/// Citing author with the oldest first publication.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarliestAuthor {
    #[serde(rename = "authorId", default)]
    pub author_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub earliest_publication_year: Option<i32>,
}

/// One piece of citation-context evidence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CitationRecord {
    pub cited_author: CitedAuthor,
    pub cited_paper: PaperSummary,
    pub citing_paper: PaperSummary,
    #[serde(default)]
    pub citing_first_author: String,
    #[serde(default)]
    pub citing_last_author: String,
    #[serde(default)]
    pub citing_earliest_author: Option<EarliestAuthor>,
    #[serde(default)]
    pub corresponding_author_assumption: String,
    /// Filled by a later enrichment step; always null today.
    #[serde(rename = "citing_last_author_is_IEEE_Fellow", default)]
    pub citing_last_author_is_ieee_fellow: Option<bool>,
    /// Filled by a later enrichment step; always null today.
    #[serde(default)]
    pub citing_last_author_position: Option<String>,
    #[serde(rename = "isInfluential", default)]
    pub is_influential: Option<bool>,
    #[serde(default)]
    pub citation_contexts: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citing_earliest_author_title_sum: Option<String>,
}

impl CitationRecord {
    /// Build a record for one kept citation of `cited`.
    #[must_use]
    pub fn new(
        cited_author: &CitedAuthor,
        cited: &Paper,
        citation: &Citation,
        earliest: Option<EarliestAuthor>,
    ) -> Self {
        let citing = citation.citing_paper.clone().unwrap_or_default();
        Self {
            cited_author: cited_author.clone(),
            cited_paper: PaperSummary::from(cited),
            citing_paper: PaperSummary::from(&citing),
            citing_first_author: citing.first_author_name().to_string(),
            citing_last_author: citing.last_author_name().to_string(),
            citing_earliest_author: earliest,
            corresponding_author_assumption: "last_author".to_string(),
            citing_last_author_is_ieee_fellow: None,
            citing_last_author_position: None,
            is_influential: citation.is_influential,
            citation_contexts: citation.contexts.clone(),
            citing_earliest_author_title_sum: None,
        }
    }

    /// Earliest author's trimmed name, `""` if unknown.
    #[must_use]
    pub fn earliest_author_name(&self) -> &str {
        self.citing_earliest_author.as_ref().map_or("", |a| a.name.trim())
    }

    /// Trimmed title summary, `""` if not enriched.
    #[must_use]
    pub fn title_sum(&self) -> &str {
        self.citing_earliest_author_title_sum.as_deref().map_or("", str::trim)
    }
}

/// Parameters echoed at the top of a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunQuery {
    pub author_name: Option<String>,
    pub author_id: Option<String>,
    pub max_target_papers: usize,
    pub scan_citations_per_paper: usize,
    pub top_citations_per_paper: usize,
    pub influential_only: bool,
    pub require_context: bool,
    pub max_records: usize,
    pub earliest_author_cutoff_year: i32,
}

/// Report file contents: the query plus its records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    pub query: RunQuery,
    pub records: Vec<CitationRecord>,
}
