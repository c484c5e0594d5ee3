//! Web search (HTML results page) and readable page text.
//!
//! Both operations are best-effort: failures are logged and produce empty
//! results so a single bad page never aborts an enrichment run.

use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, HeaderMap, USER_AGENT};
use scraper::{Html, Node, Selector};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::Url;

const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36";

/// Subtrees that never contribute readable text.
const SKIPPED_TAGS: &[&str] =
    &["script", "style", "nav", "footer", "header", "aside", "noscript", "iframe"];

static RESULT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result").expect("valid selector"));
static RESULT_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a.result__a").expect("valid selector"));
static RESULT_SNIPPET: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".result__snippet").expect("valid selector"));
static INLINE_WS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{a0}]+").expect("valid regex"));

/// One organic search result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub href: String,
    pub body: String,
}

/// Client for the search endpoint and arbitrary result pages.
#[derive(Debug, Clone)]
pub struct WebClient {
    client: Client,
    search_url: String,
}

impl WebClient {
    /// Build a client that searches via `search_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be built.
    pub fn new(search_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, BROWSER_USER_AGENT.parse()?);
        headers.insert(
            ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8".parse()?,
        );
        headers.insert(ACCEPT_LANGUAGE, "en-US,en;q=0.9,zh-CN;q=0.8".parse()?);

        let client = Client::builder().default_headers(headers).timeout(timeout).gzip(true).build()?;
        Ok(Self { client, search_url: search_url.into() })
    }

    /// Run `query` and return up to `max_results` hits; empty on failure.
    pub async fn search(&self, query: &str, max_results: usize) -> Vec<SearchHit> {
        match self.try_search(query, max_results).await {
            Ok(hits) => hits,
            Err(e) => {
                warn!(query, error = %e, "search failed");
                Vec::new()
            }
        }
    }

    async fn try_search(&self, query: &str, max_results: usize) -> anyhow::Result<Vec<SearchHit>> {
        let url = Url::parse_with_params(&self.search_url, &[("q", query)])?;
        let html = self.client.get(url.clone()).send().await?.error_for_status()?.text().await?;
        let hits = parse_search_results(&html, &url, max_results);
        debug!(query, hits = hits.len(), "search results");
        Ok(hits)
    }

    /// Fetch `url` and return its readable text (at most `max_chars`); `""` on failure.
    pub async fn fetch_page_text(&self, url: &str, max_chars: usize) -> String {
        let result = async {
            let response = self.client.get(url).send().await?.error_for_status()?;
            response.text().await
        }
        .await;

        match result {
            Ok(html) => extract_page_text(&html, max_chars),
            Err(e) => {
                warn!(url, error = %e, "page fetch failed");
                String::new()
            }
        }
    }
}

/// Parse an HTML results page. `base` resolves relative and redirect links.
#[must_use]
pub fn parse_search_results(html: &str, base: &Url, max_results: usize) -> Vec<SearchHit> {
    let doc = Html::parse_document(html);
    let mut hits = Vec::new();

    for result in doc.select(&RESULT) {
        if hits.len() >= max_results {
            break;
        }
        if result.value().classes().any(|c| c == "result--ad") {
            continue;
        }
        let Some(link) = result.select(&RESULT_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href").and_then(|h| resolve_result_href(h, base))
        else {
            continue;
        };
        let body = result
            .select(&RESULT_SNIPPET)
            .next()
            .map(|s| s.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        hits.push(SearchHit {
            title: link.text().collect::<String>().trim().to_string(),
            href,
            body,
        });
    }
    hits
}

/// Unwrap `/l/?uddg=<target>` redirect links; keep direct http(s) links.
fn resolve_result_href(href: &str, base: &Url) -> Option<String> {
    let url = base.join(href).ok()?;
    if let Some((_, target)) = url.query_pairs().find(|(k, _)| k == "uddg") {
        return Some(target.into_owned());
    }
    matches!(url.scheme(), "http" | "https").then(|| url.to_string())
}

/// Readable text of an HTML page: boilerplate subtrees dropped, one trimmed
/// non-empty line per text run, truncated to `max_chars` characters.
#[must_use]
pub fn extract_page_text(html: &str, max_chars: usize) -> String {
    let doc = Html::parse_document(html);
    let mut lines: Vec<String> = Vec::new();

    for node in doc.tree.root().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node
            .ancestors()
            .any(|a| a.value().as_element().is_some_and(|e| SKIPPED_TAGS.contains(&e.name())));
        if hidden {
            continue;
        }
        for line in text.lines() {
            let line = INLINE_WS.replace_all(line.trim(), " ");
            if !line.is_empty() {
                lines.push(line.into_owned());
            }
        }
    }

    lines.join("\n").chars().take(max_chars).collect()
}
