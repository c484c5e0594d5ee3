//! Choose the citing author with the oldest first publication.

use tracing::warn;

use crate::client::PublicationYears;
use crate::models::{EarliestAuthor, Paper};

/// Among `paper`'s authors with an ID, the one whose first publication is
/// earliest. Byline order breaks ties.
///
/// With `cutoff_year`, only authors who had published by then are considered;
/// the lookup is bounded by the cutoff so newer authors cost one request.
/// Failed lookups are logged and the author skipped. If no author has a known
/// year, the first named author is returned with no year; `None` only when
/// the paper lists no named author at all.
pub async fn pick_earliest_publishing_author<Y>(
    years: &Y,
    paper: &Paper,
    cutoff_year: Option<i32>,
) -> Option<EarliestAuthor>
where
    Y: PublicationYears + ?Sized,
{
    let mut best: Option<EarliestAuthor> = None;

    for author in &paper.authors {
        let Some(author_id) = author.id() else {
            continue;
        };
        let year = match years.earliest_publication_year(author_id, cutoff_year).await {
            Ok(Some(year)) => year,
            Ok(None) => continue,
            Err(e) => {
                warn!(author_id, error = %e, "earliest publication year lookup failed");
                continue;
            }
        };
        if cutoff_year.is_some_and(|cutoff| year > cutoff) {
            continue;
        }
        if best.as_ref().and_then(|b| b.earliest_publication_year).is_none_or(|y| year < y) {
            best = Some(EarliestAuthor {
                author_id: Some(author_id.to_string()),
                name: author.trimmed_name().to_string(),
                earliest_publication_year: Some(year),
            });
        }
    }

    best.or_else(|| {
        paper.authors.iter().find(|a| !a.trimmed_name().is_empty()).map(|a| EarliestAuthor {
            author_id: a.id().map(str::to_string),
            name: a.trimmed_name().to_string(),
            earliest_publication_year: None,
        })
    })
}
