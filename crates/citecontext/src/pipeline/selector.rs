//! Target paper selection: resolve the author, list their papers, keep the most cited.

use std::cmp::Reverse;

use tracing::{debug, info};

use crate::client::SemanticScholarClient;
use crate::config::{api, fields};
use crate::error::{ClientResult, PipelineError, PipelineResult};
use crate::models::{Author, Paper};

/// Runner-up within this fraction of the best score makes a strict search ambiguous.
const AMBIGUITY_RATIO: f64 = 0.98;

/// Pick the best author search candidate for `name`.
///
/// With `strict`, a runner-up scoring at least 98% of the winner is an error
/// listing the top candidates.
pub async fn resolve_author(
    client: &SemanticScholarClient,
    name: &str,
    affiliation_keyword: Option<&str>,
    strict: bool,
) -> PipelineResult<Author> {
    let result = client.search_authors(name, api::AUTHOR_SEARCH_LIMIT, fields::AUTHOR_SEARCH).await?;
    rank_candidates(name, result.data, affiliation_keyword, strict)
}

fn rank_candidates(
    name: &str,
    candidates: Vec<Author>,
    affiliation_keyword: Option<&str>,
    strict: bool,
) -> PipelineResult<Author> {
    let mut ranked: Vec<(f64, Author)> = candidates
        .into_iter()
        .map(|a| (a.disambiguation_score(affiliation_keyword), a))
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    if strict && ranked.len() >= 2 && ranked[1].0 >= ranked[0].0 * AMBIGUITY_RATIO {
        let candidates = ranked
            .iter()
            .take(5)
            .map(|(_, c)| {
                format!(
                    "{} (authorId={}, affiliations={:?})",
                    c.name_or_default(),
                    c.author_id,
                    c.affiliations
                )
            })
            .collect();
        return Err(PipelineError::AmbiguousAuthor { candidates });
    }

    let (score, best) =
        ranked.into_iter().next().ok_or_else(|| PipelineError::AuthorNotFound(name.to_string()))?;
    info!(author_id = %best.author_id, name = best.name_or_default(), score, "resolved author");
    Ok(best)
}

/// Every paper of `author_id`, 100 per page, up to the offset ceiling.
pub async fn fetch_author_papers(
    client: &SemanticScholarClient,
    author_id: &str,
) -> ClientResult<Vec<Paper>> {
    let mut papers = Vec::new();
    let mut offset = 0;

    loop {
        let page = client
            .get_author_papers(author_id, offset, api::PAGE_SIZE, fields::AUTHOR_PAPERS, None)
            .await?;
        let batch = page.data.len();
        papers.extend(page.data);
        if batch < api::PAGE_SIZE {
            break;
        }
        offset += api::PAGE_SIZE;
        if offset > api::MAX_AUTHOR_PAPERS_OFFSET {
            break;
        }
    }

    debug!(author_id, papers = papers.len(), "fetched author papers");
    Ok(papers)
}

/// Top `k` papers by citation count (ties: newer first). Papers without an ID are dropped.
#[must_use]
pub fn select_target_papers(mut papers: Vec<Paper>, k: usize) -> Vec<Paper> {
    papers.retain(|p| !p.id().is_empty());
    papers.sort_by_key(|p| Reverse((p.citations(), p.year.unwrap_or(0))));
    papers.truncate(k);
    papers
}
