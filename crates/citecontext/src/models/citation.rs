//! Citation edges returned by `/paper/{id}/citations`.

use serde::{Deserialize, Serialize};

use super::Paper;

/// One citing paper plus the edge metadata.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    /// The citing paper.
    #[serde(default)]
    pub citing_paper: Option<Paper>,

    /// Verbatim sentences around the citation.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub contexts: Vec<String>,

    /// Highly-influential flag; `None` when the API omitted it.
    #[serde(default)]
    pub is_influential: Option<bool>,
}

impl Citation {
    /// Whether the API returned at least one context string.
    #[must_use]
    pub fn has_context(&self) -> bool {
        !self.contexts.is_empty()
    }

    /// False only when the API explicitly flagged the citation as not influential.
    #[must_use]
    pub fn counts_as_influential(&self) -> bool {
        self.is_influential != Some(false)
    }

    /// Citing paper citation count, 0 when unknown.
    #[must_use]
    pub fn citing_citations(&self) -> i32 {
        self.citing_paper.as_ref().map_or(0, Paper::citations)
    }

    /// Citing paper year, 0 when unknown.
    #[must_use]
    pub fn citing_year(&self) -> i32 {
        self.citing_paper.as_ref().and_then(|p| p.year).unwrap_or(0)
    }
}

/// One page of citations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CitationPage {
    /// Offset for pagination.
    #[serde(default)]
    pub offset: usize,

    /// Next offset if more results available.
    #[serde(default)]
    pub next: Option<usize>,

    /// Citation data.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: Vec<Citation>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_citation_missing_flag_and_null_contexts() {
        let c: Citation = serde_json::from_str(
            r#"{"citingPaper": {"paperId": "p", "citationCount": 5}, "contexts": null}"#,
        )
        .unwrap();
        assert_eq!(c.is_influential, None);
        assert!(!c.has_context());
        assert_eq!(c.citing_citations(), 5);
        assert_eq!(c.citing_year(), 0);
    }

    #[test]
    fn test_citation_page() {
        let page: CitationPage = serde_json::from_str(
            r#"{"offset": 0, "next": 100, "data": [
                {"citingPaper": {"paperId": "p1"}, "isInfluential": true, "contexts": ["see [3]"]}
            ]}"#,
        )
        .unwrap();
        assert_eq!(page.next, Some(100));
        assert_eq!(page.data.len(), 1);
        assert_eq!(page.data[0].is_influential, Some(true));
        assert!(page.data[0].has_context());
    }
}
