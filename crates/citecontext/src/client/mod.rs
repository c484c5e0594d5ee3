//! HTTP clients.
//!
//! - [`SemanticScholarClient`]: Graph API access with retry middleware, a
//!   client-side throttle, and a 7-day disk cache of raw responses
//! - [`LlmClient`]: OpenAI-compatible chat completions
//! - [`WebClient`]: HTML search results and page text

mod llm;
mod web;

use std::sync::Arc;
use std::time::Duration;

use chrono::Datelike;
use moka::future::Cache;
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, warn};
use url::Url;

use crate::cache::JsonDiskCache;
use crate::config::{Config, api, fields};
use crate::error::{ClientError, ClientResult};
use crate::models::{AuthorSearchResult, CitationPage, PaperPage};

pub use llm::{ChatMessage, LlmClient};
pub use web::{SearchHit, WebClient, extract_page_text, parse_search_results};

/// Lookup of an author's earliest publication year.
///
/// Implemented by [`SemanticScholarClient`]; the earliest-author selection is
/// written against this trait so it can run without the network.
#[async_trait::async_trait]
pub trait PublicationYears: Send + Sync {
    /// Earliest year in `[floor, max_year]` with a publication, or `None`
    /// if the author has nothing up to `max_year`.
    async fn earliest_publication_year(
        &self,
        author_id: &str,
        max_year: Option<i32>,
    ) -> ClientResult<Option<i32>>;
}

/// Semantic Scholar Graph API client.
#[derive(Clone)]
pub struct SemanticScholarClient {
    /// HTTP client with middleware.
    client: ClientWithMiddleware,

    /// Raw response cache (disabled when `None`).
    cache: Option<JsonDiskCache>,

    /// Earliest-year lookups already answered in this process.
    earliest_years: Cache<String, Option<i32>>,

    /// API key (optional).
    api_key: Option<String>,

    /// Graph API base URL.
    graph_api_url: Url,

    /// Minimum gap between uncached requests.
    min_interval: Duration,

    /// When the last uncached request was sent.
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl SemanticScholarClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails or the cache
    /// directory cannot be created.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT, "application/json".parse()?);

        if let Some(ref key) = config.api_key {
            headers.insert("x-api-key", key.parse()?);
        }

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(api::MAX_KEEPALIVE)
            .pool_idle_timeout(api::KEEPALIVE_EXPIRY)
            .gzip(true)
            .build()?;

        let retry_policy = ExponentialBackoff::builder()
            .retry_bounds(Duration::from_secs(1), Duration::from_secs(60))
            .build_with_max_retries(config.max_retries);

        let client = ClientBuilder::new(client)
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();

        let graph_api_url = Url::parse(&config.graph_api_url)?;
        anyhow::ensure!(
            !graph_api_url.cannot_be_a_base(),
            "invalid Graph API URL: {}",
            config.graph_api_url
        );

        let cache = config
            .cache_dir
            .map(|dir| JsonDiskCache::new(dir, config.cache_ttl))
            .transpose()?;

        Ok(Self {
            client,
            cache,
            earliest_years: Cache::new(10_000),
            api_key: config.api_key,
            graph_api_url,
            min_interval: config.min_interval,
            last_request: Arc::new(Mutex::new(None)),
        })
    }

    /// Check if an API key is configured.
    #[must_use]
    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Search for authors by name.
    pub async fn search_authors(
        &self,
        query: &str,
        limit: usize,
        fields: &[&str],
    ) -> ClientResult<AuthorSearchResult> {
        let url = self.endpoint(&["author", "search"]);

        let params = vec![
            ("query".to_string(), query.to_string()),
            ("limit".to_string(), limit.to_string()),
            ("fields".to_string(), fields.join(",")),
        ];

        self.get(url, &params).await
    }

    /// Get one page of an author's papers.
    ///
    /// `publication_date_or_year` is passed through as the API's
    /// `publicationDateOrYear` filter (e.g. `":2015"` for "up to 2015").
    pub async fn get_author_papers(
        &self,
        author_id: &str,
        offset: usize,
        limit: usize,
        fields: &[&str],
        publication_date_or_year: Option<&str>,
    ) -> ClientResult<PaperPage> {
        let url = self.endpoint(&["author", author_id, "papers"]);

        let mut params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("fields".to_string(), fields.join(",")),
        ];
        if let Some(range) = publication_date_or_year {
            params.push(("publicationDateOrYear".to_string(), range.to_string()));
        }

        self.get(url, &params).await
    }

    /// Get one page of paper citations, with contexts and influence flags.
    pub async fn get_citations(
        &self,
        paper_id: &str,
        offset: usize,
        limit: usize,
    ) -> ClientResult<CitationPage> {
        let url = self.endpoint(&["paper", paper_id, "citations"]);

        let mut requested: Vec<String> =
            fields::CITING_PAPER.iter().map(|f| format!("citingPaper.{f}")).collect();
        requested.extend(fields::CITATION_EDGE.iter().map(|f| (*f).to_string()));

        let params = vec![
            ("limit".to_string(), limit.to_string()),
            ("offset".to_string(), offset.to_string()),
            ("fields".to_string(), requested.join(",")),
        ];

        self.get(url, &params).await
    }

    /// Whether the author has any paper published up to and including `year`.
    pub async fn has_paper_up_to_year(&self, author_id: &str, year: i32) -> ClientResult<bool> {
        let range = format!(":{year}");
        let page = self.get_author_papers(author_id, 0, 1, &["year"], Some(&range)).await?;
        Ok(!page.data.is_empty())
    }

    /// Graph API URL for `segments`, each percent-encoded as one path segment.
    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.graph_api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Wait until `min_interval` has passed since the previous request.
    async fn throttle(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        let mut last = self.last_request.lock().await;
        let wait = throttle_wait(*last, Instant::now(), self.min_interval);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }
        *last = Some(Instant::now());
    }

    /// Make a GET request.
    async fn get<T>(&self, url: Url, params: &[(String, String)]) -> ClientResult<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let url_str = url.as_str();

        // Check cache
        let cache_key = Self::cache_key("GET", url_str, params);
        if let Some(cached) =
            self.cache.as_ref().and_then(|c| c.get::<serde_json::Value>(&cache_key))
        {
            debug!(url = url_str, "cache hit");
            return serde_json::from_value(cached).map_err(ClientError::from);
        }

        self.throttle().await;

        debug!(url = url_str, "GET");
        let response = self.client.get(url.clone()).query(params).send().await?;

        let response = check_status(response).await?;
        let value: serde_json::Value = response.json().await?;

        // Cache response
        if let Some(cache) = &self.cache {
            if let Err(e) = cache.set(&cache_key, &value) {
                warn!(url = url_str, error = %e, "failed to write cache entry");
            }
        }

        serde_json::from_value(value).map_err(ClientError::from)
    }

    /// Generate cache key.
    fn cache_key(method: &str, url: &str, params: &[(String, String)]) -> String {
        use md5::{Digest, Md5};

        let mut hasher = Md5::new();
        hasher.update(method.as_bytes());
        hasher.update(b"|");
        hasher.update(url.as_bytes());
        hasher.update(b"|");

        for (k, v) in params {
            hasher.update(k.as_bytes());
            hasher.update(b"=");
            hasher.update(v.as_bytes());
            hasher.update(b"&");
        }

        format!("{:x}", hasher.finalize())
    }
}

#[async_trait::async_trait]
impl PublicationYears for SemanticScholarClient {
    /// Binary search over the `publicationDateOrYear` filter with `limit=1`,
    /// so an author's full paper list is never downloaded.
    async fn earliest_publication_year(
        &self,
        author_id: &str,
        max_year: Option<i32>,
    ) -> ClientResult<Option<i32>> {
        let author_id = author_id.trim();
        if author_id.is_empty() {
            return Ok(None);
        }

        let max_year = max_year.unwrap_or_else(|| chrono::Utc::now().year());
        let memo_key = format!("{author_id}:{max_year}");
        if let Some(known) = self.earliest_years.get(&memo_key).await {
            return Ok(known);
        }

        let (mut lo, mut hi) = if api::EARLIEST_YEAR_FLOOR <= max_year {
            (api::EARLIEST_YEAR_FLOOR, max_year)
        } else {
            (max_year, api::EARLIEST_YEAR_FLOOR)
        };

        let earliest = if self.has_paper_up_to_year(author_id, hi).await? {
            while lo < hi {
                let mid = lo + (hi - lo) / 2;
                if self.has_paper_up_to_year(author_id, mid).await? {
                    hi = mid;
                } else {
                    lo = mid + 1;
                }
            }
            Some(lo)
        } else {
            None
        };

        debug!(author_id, max_year, ?earliest, "earliest publication year");
        self.earliest_years.insert(memo_key, earliest).await;
        Ok(earliest)
    }
}

impl std::fmt::Debug for SemanticScholarClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SemanticScholarClient")
            .field("has_api_key", &self.has_api_key())
            .field("cache_dir", &self.cache.as_ref().map(JsonDiskCache::dir))
            .finish()
    }
}

/// Map non-success statuses onto [`ClientError`].
pub(crate) async fn check_status(response: reqwest::Response) -> ClientResult<reqwest::Response> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    match status.as_u16() {
        429 => {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok())
                .unwrap_or(60);

            Err(ClientError::rate_limited(retry_after))
        }
        404 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::not_found(text))
        }
        400 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::bad_request(text))
        }
        500..=599 => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::server(status.as_u16(), text))
        }
        _ => {
            let text = response.text().await.unwrap_or_default();
            Err(ClientError::UnexpectedStatus { status: status.as_u16(), message: text })
        }
    }
}

/// Time still to wait at `now` so requests stay `min_interval` apart.
fn throttle_wait(last: Option<Instant>, now: Instant, min_interval: Duration) -> Duration {
    last.map_or(Duration::ZERO, |prev| {
        min_interval.saturating_sub(now.saturating_duration_since(prev))
    })
}
