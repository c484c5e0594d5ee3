//! Stage 1: author -> target papers -> citations -> bounded list of records.

pub mod earliest;
pub mod scanner;
pub mod selector;

use tracing::{info, info_span, Instrument};

use crate::client::SemanticScholarClient;
use crate::error::{PipelineError, PipelineResult};
use crate::models::{CitationRecord, CitedAuthor, Report, RunQuery};
use crate::progress;

pub use earliest::pick_earliest_publishing_author;
pub use scanner::{CitationFilter, rank_citations, scan_citations};
pub use selector::{fetch_author_papers, resolve_author, select_target_papers};

/// Parameters of one extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub author_name: Option<String>,
    pub author_id: Option<String>,
    /// Disambiguates author search.
    pub affiliation_keyword: Option<String>,
    pub max_target_papers: usize,
    pub scan_citations_per_paper: usize,
    pub top_citations_per_paper: usize,
    pub max_records: usize,
    /// 0 disables the cutoff.
    pub earliest_author_cutoff_year: i32,
    pub influential_only: bool,
    pub require_context: bool,
    /// Fail instead of guessing when author search is ambiguous.
    pub strict_disambiguation: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            author_name: None,
            author_id: None,
            affiliation_keyword: None,
            max_target_papers: 20,
            scan_citations_per_paper: 1000,
            top_citations_per_paper: 3,
            max_records: 60,
            earliest_author_cutoff_year: 0,
            influential_only: true,
            require_context: true,
            strict_disambiguation: false,
        }
    }
}

impl RunConfig {
    /// Citation filter derived from the run flags.
    #[must_use]
    pub const fn filter(&self) -> CitationFilter {
        CitationFilter {
            influential_only: self.influential_only,
            require_context: self.require_context,
            top_per_paper: self.top_citations_per_paper,
        }
    }

    /// Cutoff year, if enabled.
    #[must_use]
    pub const fn cutoff_year(&self) -> Option<i32> {
        if self.earliest_author_cutoff_year > 0 {
            Some(self.earliest_author_cutoff_year)
        } else {
            None
        }
    }

    /// Parameters echoed into the report.
    #[must_use]
    pub fn query(&self) -> RunQuery {
        RunQuery {
            author_name: self.author_name.clone(),
            author_id: self.author_id.clone(),
            max_target_papers: self.max_target_papers,
            scan_citations_per_paper: self.scan_citations_per_paper,
            top_citations_per_paper: self.top_citations_per_paper,
            influential_only: self.influential_only,
            require_context: self.require_context,
            max_records: self.max_records,
            earliest_author_cutoff_year: self.earliest_author_cutoff_year,
        }
    }
}

/// Run the extraction and return the report.
///
/// Records per cited paper never exceed `top_citations_per_paper`, and the
/// total never exceeds `max_records`.
pub async fn run(client: &SemanticScholarClient, cfg: &RunConfig) -> PipelineResult<Report> {
    let cited_author = cited_author(client, cfg).await?;
    let span = info_span!("run", author_id = %cited_author.author_id);

    extract(client, cfg, &cited_author).instrument(span).await
}

async fn extract(
    client: &SemanticScholarClient,
    cfg: &RunConfig,
    cited_author: &CitedAuthor,
) -> PipelineResult<Report> {
    let papers = fetch_author_papers(client, &cited_author.author_id).await?;
    let total_papers = papers.len();
    let targets = select_target_papers(papers, cfg.max_target_papers);
    if targets.is_empty() {
        return Err(PipelineError::NoPapers(cited_author.author_id.clone()));
    }
    info!(total_papers, targets = targets.len(), "selected target papers");

    let filter = cfg.filter();
    let cutoff = cfg.cutoff_year();
    let mut records: Vec<CitationRecord> = Vec::new();
    let bar = progress::bar(targets.len(), "Citations");

    'papers: for cited in &targets {
        if records.len() >= cfg.max_records {
            break;
        }

        let citations = scan_citations(client, cited.id(), cfg.scan_citations_per_paper).await?;
        let scanned = citations.len();
        let kept = rank_citations(citations, &filter);
        info!(paper_id = cited.id(), scanned, kept = kept.len(), "scanned citations");

        for citation in &kept {
            if records.len() >= cfg.max_records {
                break 'papers;
            }
            let earliest = match &citation.citing_paper {
                Some(citing) => pick_earliest_publishing_author(client, citing, cutoff).await,
                None => None,
            };
            records.push(CitationRecord::new(cited_author, cited, citation, earliest));
        }
        bar.inc(1);
    }
    bar.finish_and_clear();

    info!(records = records.len(), "extraction finished");
    Ok(Report { query: cfg.query(), records })
}

async fn cited_author(
    client: &SemanticScholarClient,
    cfg: &RunConfig,
) -> PipelineResult<CitedAuthor> {
    let author_id = cfg.author_id.as_deref().map(str::trim).filter(|id| !id.is_empty());
    let author_name = cfg.author_name.as_deref().map(str::trim).filter(|n| !n.is_empty());

    match (author_id, author_name) {
        (Some(id), name) => Ok(CitedAuthor {
            author_id: id.to_string(),
            name: name.unwrap_or("Unknown").to_string(),
        }),
        (None, Some(name)) => {
            let chosen = resolve_author(
                client,
                name,
                cfg.affiliation_keyword.as_deref(),
                cfg.strict_disambiguation,
            )
            .await?;
            Ok(CitedAuthor {
                name: chosen.name.clone().unwrap_or_else(|| name.to_string()),
                author_id: chosen.author_id,
            })
        }
        (None, None) => {
            Err(PipelineError::validation("author", "provide --author_id or --author_name"))
        }
    }
}
