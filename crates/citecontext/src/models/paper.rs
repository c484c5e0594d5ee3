//! Paper data model matching Semantic Scholar API schema.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::AuthorRef;

/// A research paper from Semantic Scholar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paper {
    /// Semantic Scholar paper ID (the API occasionally returns null for citing papers).
    #[serde(default)]
    pub paper_id: Option<String>,

    /// Paper title.
    #[serde(default)]
    pub title: Option<String>,

    /// Publication year.
    #[serde(default)]
    pub year: Option<i32>,

    /// Publication venue (journal or conference).
    #[serde(default)]
    pub venue: Option<String>,

    /// Number of citations this paper has received.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// Influential citation count.
    #[serde(default)]
    pub influential_citation_count: Option<i32>,

    /// External identifiers (DOI, ArXiv, DBLP, etc.).
    #[serde(default)]
    pub external_ids: Option<ExternalIds>,

    /// Semantic Scholar landing page.
    #[serde(default)]
    pub url: Option<String>,

    /// List of authors, in byline order.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub authors: Vec<AuthorRef>,
}

impl Paper {
    /// Paper ID, or `""` if the API did not return one.
    #[must_use]
    pub fn id(&self) -> &str {
        self.paper_id.as_deref().unwrap_or("")
    }

    /// Get citation count or 0 if not available.
    #[must_use]
    pub fn citations(&self) -> i32 {
        self.citation_count.unwrap_or(0)
    }

    /// First author's name, trimmed; `""` if unknown.
    #[must_use]
    pub fn first_author_name(&self) -> &str {
        self.authors.first().map(AuthorRef::trimmed_name).unwrap_or("")
    }

    /// Last author's name, trimmed; `""` if unknown.
    #[must_use]
    pub fn last_author_name(&self) -> &str {
        self.authors.last().map(AuthorRef::trimmed_name).unwrap_or("")
    }
}

/// External identifiers for a paper.
///
/// Well-known keys are typed; anything else the API returns is kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExternalIds {
    /// Digital Object Identifier.
    #[serde(rename = "DOI", default, skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,

    /// ArXiv preprint ID.
    #[serde(rename = "ArXiv", default, skip_serializing_if = "Option::is_none")]
    pub arxiv: Option<String>,

    /// DBLP key.
    #[serde(rename = "DBLP", default, skip_serializing_if = "Option::is_none")]
    pub dblp: Option<String>,

    /// Semantic Scholar Corpus ID.
    #[serde(rename = "CorpusId", default, skip_serializing_if = "Option::is_none")]
    pub corpus_id: Option<i64>,

    /// Remaining identifiers (MAG, PubMed, ACL, ...).
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_json::Value>,
}

/// One page of `/author/{id}/papers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaperPage {
    /// Offset of this page.
    #[serde(default)]
    pub offset: usize,

    /// Next offset if more results are available.
    #[serde(default)]
    pub next: Option<usize>,

    /// Papers in this page.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: Vec<Paper>,
}
