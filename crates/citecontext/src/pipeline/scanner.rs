//! Citation scanning: page through a paper's citations, filter, rank, keep the top few.

use std::cmp::Reverse;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::client::SemanticScholarClient;
use crate::config::api;
use crate::error::ClientResult;
use crate::models::Citation;

/// Which citations survive and how many are kept per paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationFilter {
    /// Drop citations the API flags as not influential (a missing flag passes).
    pub influential_only: bool,
    /// Drop citations without context sentences.
    pub require_context: bool,
    /// Keep at most this many per cited paper.
    pub top_per_paper: usize,
}

impl CitationFilter {
    /// Whether `citation` passes the influence and context checks.
    #[must_use]
    pub fn admits(&self, citation: &Citation) -> bool {
        if self.influential_only && !citation.counts_as_influential() {
            return false;
        }
        if self.require_context && !citation.has_context() {
            return false;
        }
        citation.citing_paper.is_some()
    }
}

/// Up to `max_items` citations of `paper_id`, in API order.
pub async fn scan_citations(
    client: &SemanticScholarClient,
    paper_id: &str,
    max_items: usize,
) -> ClientResult<Vec<Citation>> {
    let mut citations = Vec::new();
    let mut offset = 0;

    while citations.len() < max_items {
        let request_limit = api::PAGE_SIZE.min(max_items - citations.len());
        let page = client.get_citations(paper_id, offset, request_limit).await?;
        let batch = page.data.len();
        if batch == 0 {
            break;
        }

        let room = max_items - citations.len();
        citations.extend(page.data.into_iter().take(room));

        if batch < request_limit {
            break;
        }
        offset += batch;
        if offset > api::MAX_CITATIONS_OFFSET {
            break;
        }
    }

    Ok(citations)
}

/// Filter, dedup by citing paper, and keep the top `filter.top_per_paper`.
///
/// Ranking: citations not flagged as non-influential first, then citing paper
/// citation count, then citing year (newer first), then scan order. A citing
/// paper seen twice keeps its first occurrence not flagged non-influential.
/// So relaxing `influential_only` only ever adds citations after the ones the
/// strict filter keeps.
#[must_use]
pub fn rank_citations(citations: Vec<Citation>, filter: &CitationFilter) -> Vec<Citation> {
    let admitted: Vec<Citation> = citations.into_iter().filter(|c| filter.admits(c)).collect();

    let mut chosen: HashMap<&str, usize> = HashMap::new();
    for (i, c) in admitted.iter().enumerate() {
        let id = citing_id(c);
        if id.is_empty() {
            continue;
        }
        match chosen.entry(id) {
            Entry::Vacant(slot) => {
                slot.insert(i);
            }
            Entry::Occupied(mut slot) => {
                if !admitted[*slot.get()].counts_as_influential() && c.counts_as_influential() {
                    slot.insert(i);
                }
            }
        }
    }
    let mut keep = vec![false; admitted.len()];
    for i in chosen.into_values() {
        keep[i] = true;
    }

    let mut kept: Vec<Citation> = admitted
        .into_iter()
        .enumerate()
        .filter(|(i, c)| keep[*i] || citing_id(c).is_empty())
        .map(|(_, c)| c)
        .collect();

    kept.sort_by_key(|c| {
        Reverse((c.counts_as_influential(), c.citing_citations(), c.citing_year()))
    });
    kept.truncate(filter.top_per_paper);
    kept
}

fn citing_id(citation: &Citation) -> &str {
    citation.citing_paper.as_ref().map_or("", |p| p.id())
}
