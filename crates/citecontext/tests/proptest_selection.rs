//! Property-based tests for citation and target paper selection.

use std::collections::HashSet;

use proptest::prelude::*;

use citecontext::models::{Citation, Paper};
use citecontext::pipeline::{rank_citations, select_target_papers, CitationFilter};

fn arb_citation() -> impl Strategy<Value = Citation> {
    (
        "c[0-9]{1,2}",                         // citing paper id (collisions intended)
        proptest::option::of(0i32..10_000),    // citation count
        proptest::option::of(1990i32..2030),   // year
        proptest::option::of(any::<bool>()),   // isInfluential
        proptest::collection::vec("[a-z ]{0,20}", 0..3),
    )
        .prop_map(|(id, citation_count, year, is_influential, contexts)| Citation {
            citing_paper: Some(Paper {
                paper_id: Some(id),
                citation_count,
                year,
                ..Default::default()
            }),
            contexts,
            is_influential,
        })
}

fn arb_filter() -> impl Strategy<Value = CitationFilter> {
    (any::<bool>(), any::<bool>(), 0usize..6).prop_map(|(influential_only, require_context, top_per_paper)| {
        CitationFilter { influential_only, require_context, top_per_paper }
    })
}

proptest! {
    /// Never more than `top_per_paper`, every survivor passes the filter, no repeats.
    #[test]
    fn ranked_citations_respect_filter(
        citations in proptest::collection::vec(arb_citation(), 0..40),
        filter in arb_filter(),
    ) {
        let kept = rank_citations(citations, &filter);

        prop_assert!(kept.len() <= filter.top_per_paper);
        prop_assert!(kept.iter().all(|c| filter.admits(c)));

        let ids: HashSet<&str> = kept.iter().map(|c| c.citing_paper.as_ref().unwrap().id()).collect();
        prop_assert_eq!(ids.len(), kept.len());
    }

    /// Output is ordered by influence, then citing citation count, then year.
    #[test]
    fn ranked_citations_are_sorted(
        citations in proptest::collection::vec(arb_citation(), 0..40),
        filter in arb_filter(),
    ) {
        let kept = rank_citations(citations, &filter);
        for pair in kept.windows(2) {
            let a = (pair[0].counts_as_influential(), pair[0].citing_citations(), pair[0].citing_year());
            let b = (pair[1].counts_as_influential(), pair[1].citing_citations(), pair[1].citing_year());
            prop_assert!(a >= b);
        }
    }

    /// Relaxing the influence filter never drops a kept citing paper, at any
    /// per-paper limit.
    #[test]
    fn relaxed_filter_is_superset(
        citations in proptest::collection::vec(arb_citation(), 0..40),
        require_context in any::<bool>(),
        top_per_paper in 0usize..6,
    ) {
        let strict = CitationFilter { influential_only: true, require_context, top_per_paper };
        let relaxed = CitationFilter { influential_only: false, ..strict };

        let strict_ids: HashSet<String> = rank_citations(citations.clone(), &strict)
            .iter()
            .map(|c| c.citing_paper.as_ref().unwrap().id().to_string())
            .collect();
        let relaxed_ids: HashSet<String> = rank_citations(citations, &relaxed)
            .iter()
            .map(|c| c.citing_paper.as_ref().unwrap().id().to_string())
            .collect();

        prop_assert!(strict_ids.is_subset(&relaxed_ids));
    }

    /// Target selection keeps at most `k` papers, all with IDs, most cited first.
    #[test]
    fn target_papers_bounded_and_sorted(
        counts in proptest::collection::vec((proptest::option::of(0i32..5000), any::<bool>()), 0..30),
        k in 0usize..10,
    ) {
        let papers: Vec<Paper> = counts
            .iter()
            .enumerate()
            .map(|(i, (citation_count, has_id))| Paper {
                paper_id: has_id.then(|| format!("p{i}")),
                citation_count: *citation_count,
                ..Default::default()
            })
            .collect();

        let selected = select_target_papers(papers, k);

        prop_assert!(selected.len() <= k);
        prop_assert!(selected.iter().all(|p| !p.id().is_empty()));
        for pair in selected.windows(2) {
            prop_assert!(pair[0].citations() >= pair[1].citations());
        }
    }
}
