//! Author data model matching Semantic Scholar API schema.

use serde::{Deserialize, Serialize};

/// Author search result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorSearchResult {
    /// Total matching authors.
    #[serde(default)]
    pub total: i64,

    /// Offset for pagination.
    #[serde(default)]
    pub offset: i32,

    /// Next offset if more results.
    #[serde(default)]
    pub next: Option<i32>,

    /// List of authors.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub data: Vec<Author>,
}

/// A research author from Semantic Scholar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    /// Unique Semantic Scholar author ID.
    pub author_id: String,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,

    /// Author's institutional affiliations.
    #[serde(default, deserialize_with = "super::null_as_default")]
    pub affiliations: Vec<String>,

    /// Total number of papers by this author.
    #[serde(default)]
    pub paper_count: Option<i32>,

    /// Total citation count across all papers.
    #[serde(default)]
    pub citation_count: Option<i32>,

    /// h-index metric.
    #[serde(default)]
    pub h_index: Option<i32>,
}

impl Author {
    /// Get the author name, falling back to "Unknown" if not available.
    #[must_use]
    pub fn name_or_default(&self) -> &str {
        self.name.as_deref().unwrap_or("Unknown")
    }

    /// Disambiguation score: prolific, well-cited authors first, with a
    /// flat bonus when the affiliation keyword matches.
    #[must_use]
    pub fn disambiguation_score(&self, affiliation_keyword: Option<&str>) -> f64 {
        let mut score = f64::from(self.paper_count.unwrap_or(0)) / 1000.0
            + f64::from(self.citation_count.unwrap_or(0)) / 1_000_000.0
            + f64::from(self.h_index.unwrap_or(0)) / 1000.0;

        if let Some(keyword) = affiliation_keyword.filter(|k| !k.is_empty()) {
            let affiliations = self.affiliations.join(" ").to_lowercase();
            if affiliations.contains(&keyword.to_lowercase()) {
                score += 1.0;
            }
        }
        score
    }
}

/// Minimal author reference embedded in paper responses.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorRef {
    /// Author ID (may be missing for unresolved authors).
    #[serde(default)]
    pub author_id: Option<String>,

    /// Author name.
    #[serde(default)]
    pub name: Option<String>,
}

impl AuthorRef {
    /// Name with surrounding whitespace removed; `""` if missing.
    #[must_use]
    pub fn trimmed_name(&self) -> &str {
        self.name.as_deref().map(str::trim).unwrap_or("")
    }

    /// Non-empty, trimmed author ID.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.author_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author(papers: i32, citations: i32, h: i32, affiliations: &[&str]) -> Author {
        Author {
            author_id: "1".into(),
            name: Some("A".into()),
            affiliations: affiliations.iter().map(|s| (*s).to_string()).collect(),
            paper_count: Some(papers),
            citation_count: Some(citations),
            h_index: Some(h),
        }
    }

    #[test]
    fn test_score_components() {
        let a = author(100, 2_000_000, 50, &[]);
        let score = a.disambiguation_score(None);
        assert!((score - (0.1 + 2.0 + 0.05)).abs() < 1e-9);
    }

    #[test]
    fn test_affiliation_bonus_is_case_insensitive() {
        let a = author(0, 0, 0, &["Shanghai Jiao Tong University"]);
        assert!((a.disambiguation_score(Some("jiao tong")) - 1.0).abs() < 1e-9);
        assert!(a.disambiguation_score(Some("MIT")).abs() < 1e-9);
    }

    #[test]
    fn test_author_ref_blank_id_is_none() {
        let r = AuthorRef { author_id: Some("  ".into()), name: Some(" Bob ".into()) };
        assert_eq!(r.id(), None);
        assert_eq!(r.trimmed_name(), "Bob");
    }
}
