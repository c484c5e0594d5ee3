//! Stage 2: title enrichment for the earliest citing authors.
//!
//! For each person: web search -> read result pages -> LLM summary of their
//! notable titles. Summaries are cached on disk for 7 days, keyed by the
//! normalized name.

pub mod prompt;

use std::collections::{BTreeMap, HashSet};

use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::cache::JsonDiskCache;
use crate::client::{ChatMessage, LlmClient, WebClient};
use crate::config::TitleSearchConfig;
use crate::error::ClientResult;
use crate::models::CitationRecord;
use crate::progress;

use prompt::{PageText, UNKNOWN};

/// Bump to invalidate cached summaries after prompt changes.
const CACHE_VERSION: &str = "titlesearch:v5";

/// Search -> read pages -> summarize.
#[derive(Debug)]
pub struct TitleSearchAgent {
    llm: LlmClient,
    web: WebClient,
    cache: JsonDiskCache,
    num_search_results: usize,
    max_page_chars: usize,
    query_delay: std::time::Duration,
}

impl TitleSearchAgent {
    /// Build the agent and open its cache directory.
    pub fn new(cfg: &TitleSearchConfig) -> anyhow::Result<Self> {
        Ok(Self {
            llm: LlmClient::new(&cfg.llm)?,
            web: WebClient::new(cfg.search_url.clone(), cfg.fetch_timeout)?,
            cache: JsonDiskCache::new(&cfg.cache_dir, cfg.cache_ttl)?,
            num_search_results: cfg.num_search_results,
            max_page_chars: cfg.max_page_chars,
            query_delay: cfg.query_delay,
        })
    }

    /// Cache key for `name`: case and surrounding whitespace are ignored.
    #[must_use]
    pub fn cache_key(name: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(format!("{CACHE_VERSION}:{}", name.trim().to_lowercase()).as_bytes());
        format!("{:x}", hasher.finalize())
    }

    /// Short summary of `name`'s notable titles, or `"unknown"`.
    pub async fn search_titles(&self, name: &str) -> ClientResult<String> {
        let key = Self::cache_key(name);
        if let Some(cached) = self.cache.get::<String>(&key) {
            debug!(name, "title search cache hit");
            return Ok(cached);
        }

        let pages = self.search_and_read(name).await;
        let summary = if pages.is_empty() {
            info!(name, "no pages found");
            UNKNOWN.to_string()
        } else {
            info!(name, pages = pages.len(), model = self.llm.model(), "summarizing titles");
            let messages = [
                ChatMessage::system(prompt::SYSTEM_PROMPT),
                ChatMessage::user(prompt::build_user_prompt(name, &pages)),
            ];
            let reply = self.llm.chat(&messages, Some(0.1), None).await?;
            prompt::clean_summary(&reply)
        };

        if let Err(e) = self.cache.set(&key, &summary) {
            warn!(name, error = %e, "failed to cache title summary");
        }
        Ok(summary)
    }

    async fn search_and_read(&self, name: &str) -> Vec<PageText> {
        let mut seen = HashSet::new();
        let mut pages = Vec::new();

        for (i, query) in prompt::search_queries(name).iter().enumerate() {
            if i > 0 && !self.query_delay.is_zero() {
                tokio::time::sleep(self.query_delay).await;
            }
            debug!(query, "searching");
            for hit in self.web.search(query, self.num_search_results).await {
                if hit.href.is_empty() || !seen.insert(hit.href.clone()) {
                    continue;
                }
                debug!(url = %hit.href, "visiting");
                let text = self.web.fetch_page_text(&hit.href, self.max_page_chars).await;
                if !text.is_empty() {
                    pages.push(PageText { url: hit.href, text });
                }
            }
        }
        pages
    }

    /// Summaries for each unique, non-blank name (trimmed).
    pub async fn batch_search(&self, names: &[String]) -> ClientResult<BTreeMap<String, String>> {
        let unique = unique_names(names.iter().map(String::as_str));
        let bar = progress::bar(unique.len(), "Title search");
        let mut results = BTreeMap::new();

        for name in unique {
            let summary = self.search_titles(&name).await?;
            results.insert(name, summary);
            bar.inc(1);
        }
        bar.finish_and_clear();
        Ok(results)
    }
}

/// Trimmed, non-blank names in first-seen order, without repeats.
#[must_use]
pub fn unique_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(str::trim)
        .filter(|n| !n.is_empty() && seen.insert(*n))
        .map(str::to_string)
        .collect()
}

/// Fill `citing_earliest_author_title_sum` for every record whose earliest
/// author got a summary. Returns the number of unique names searched.
pub async fn enrich_records(
    records: &mut [CitationRecord],
    agent: &TitleSearchAgent,
) -> ClientResult<usize> {
    let names = unique_names(records.iter().map(CitationRecord::earliest_author_name));
    if names.is_empty() {
        return Ok(0);
    }

    info!(authors = names.len(), "enriching earliest-author titles");
    let titles = agent.batch_search(&names).await?;

    for record in records.iter_mut() {
        if let Some(summary) = titles.get(record.earliest_author_name()) {
            record.citing_earliest_author_title_sum = Some(summary.clone());
        }
    }
    Ok(names.len())
}
