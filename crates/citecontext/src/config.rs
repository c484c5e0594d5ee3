//! Configuration for the Graph API client and the title-search stage.

use std::path::PathBuf;
use std::time::Duration;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Graph API endpoint.
    pub const GRAPH_API: &str = "https://api.semanticscholar.org/graph/v1";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Client-side throttle between uncached requests (250ms = 4 req/s).
    pub const MIN_INTERVAL: Duration = Duration::from_millis(250);

    /// Retries on transient failures (429, 5xx, timeouts).
    pub const MAX_RETRIES: u32 = 6;

    /// Disk cache TTL (7 days).
    pub const CACHE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    /// Default directory for cached Graph API responses.
    pub const CACHE_DIR: &str = ".cache/semanticscholar";

    /// Page size for author paper and citation listings.
    pub const PAGE_SIZE: usize = 100;

    /// Offset ceiling when listing an author's papers.
    pub const MAX_AUTHOR_PAPERS_OFFSET: usize = 10_000;

    /// Offset ceiling when listing a paper's citations.
    pub const MAX_CITATIONS_OFFSET: usize = 50_000;

    /// Candidates requested from author search.
    pub const AUTHOR_SEARCH_LIMIT: usize = 10;

    /// Lower bound of the earliest-publication-year search.
    pub const EARLIEST_YEAR_FLOOR: i32 = 1800;

    /// Maximum keepalive connections.
    pub const MAX_KEEPALIVE: usize = 10;

    /// Keepalive expiry.
    pub const KEEPALIVE_EXPIRY: Duration = Duration::from_secs(30);
}

/// Field sets for Graph API requests.
pub mod fields {
    /// Fields for author search candidates.
    pub const AUTHOR_SEARCH: &[&str] =
        &["name", "authorId", "affiliations", "paperCount", "citationCount", "hIndex"];

    /// Fields for an author's paper list.
    pub const AUTHOR_PAPERS: &[&str] = &[
        "paperId",
        "title",
        "year",
        "venue",
        "externalIds",
        "citationCount",
        "influentialCitationCount",
        "authors",
        "url",
    ];

    /// Citing-paper fields for citation listings.
    pub const CITING_PAPER: &[&str] = &[
        "paperId",
        "title",
        "year",
        "venue",
        "authors",
        "externalIds",
        "url",
        "citationCount",
    ];

    /// Citation-edge fields requested alongside the citing paper.
    pub const CITATION_EDGE: &[&str] = &["isInfluential", "contexts"];
}

/// Title-search and LLM defaults.
pub mod titles {
    use std::time::Duration;

    /// Default chat model.
    pub const DEFAULT_MODEL: &str = "deepseek-v3-1-250821";

    /// HTML search endpoint.
    pub const SEARCH_URL: &str = "https://html.duckduckgo.com/html/";

    /// Default directory for cached title summaries.
    pub const CACHE_DIR: &str = ".cache/titlesearch";

    /// LLM request timeout.
    pub const LLM_TIMEOUT: Duration = Duration::from_secs(300);

    /// Page fetch timeout.
    pub const FETCH_TIMEOUT: Duration = Duration::from_secs(15);

    /// Pause between the two search queries for one name.
    pub const QUERY_DELAY: Duration = Duration::from_secs(1);

    /// LLM retries on transient failures.
    pub const LLM_MAX_RETRIES: u32 = 3;
}

/// Graph API client configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Semantic Scholar API key (optional).
    pub api_key: Option<String>,

    /// Base URL for Graph API (for testing with mock servers).
    pub graph_api_url: String,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,

    /// Sleep before each uncached request.
    pub min_interval: Duration,

    /// Retries on transient failures.
    pub max_retries: u32,

    /// Response cache directory; `None` disables the disk cache.
    pub cache_dir: Option<PathBuf>,

    /// Cache TTL; `None` keeps entries forever.
    pub cache_ttl: Option<Duration>,
}

impl Config {
    /// Create a new configuration with optional API key and default limits.
    #[must_use]
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            api_key,
            graph_api_url: api::GRAPH_API.to_string(),
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
            min_interval: api::MIN_INTERVAL,
            max_retries: api::MAX_RETRIES,
            cache_dir: Some(PathBuf::from(api::CACHE_DIR)),
            cache_ttl: Some(api::CACHE_TTL),
        }
    }

    /// Create a test configuration with custom URLs for mock servers.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_key: None,
            graph_api_url: format!("{}/graph/v1", base_url),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
            min_interval: Duration::from_millis(0), // No delay in tests
            max_retries: 0,
            cache_dir: None, // No caching in tests
            cache_ttl: Some(api::CACHE_TTL),
        }
    }

    /// Create configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(std::env::var("SEMANTIC_SCHOLAR_API_KEY").ok())
    }

    /// Check if an API key is configured.
    #[must_use]
    pub const fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(None)
    }
}

/// OpenAI-compatible chat completion configuration.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// API base, e.g. `https://api.deepseek.com/v1`.
    pub api_base: String,
    /// Bearer key.
    pub api_key: String,
    /// Model name.
    pub model: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Default `max_tokens`.
    pub max_tokens: u32,
    /// Default sampling temperature.
    pub temperature: f32,
    /// Retries on transient failures.
    pub max_retries: u32,
}

impl LlmConfig {
    #[must_use]
    pub fn new(api_base: impl Into<String>, api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            timeout: titles::LLM_TIMEOUT,
            max_tokens: 4096,
            temperature: 0.1,
            max_retries: titles::LLM_MAX_RETRIES,
        }
    }
}

/// Title search agent configuration.
#[derive(Debug, Clone)]
pub struct TitleSearchConfig {
    /// LLM used for summarizing page text.
    pub llm: LlmConfig,
    /// Summary cache directory.
    pub cache_dir: PathBuf,
    /// Summary cache TTL.
    pub cache_ttl: Option<Duration>,
    /// HTML search endpoint.
    pub search_url: String,
    /// Results requested per query.
    pub num_search_results: usize,
    /// Characters kept per page.
    pub max_page_chars: usize,
    /// Page fetch timeout.
    pub fetch_timeout: Duration,
    /// Pause between queries.
    pub query_delay: Duration,
}

impl TitleSearchConfig {
    #[must_use]
    pub fn new(llm: LlmConfig) -> Self {
        Self {
            llm,
            cache_dir: PathBuf::from(titles::CACHE_DIR),
            cache_ttl: Some(api::CACHE_TTL),
            search_url: titles::SEARCH_URL.to_string(),
            num_search_results: 5,
            max_page_chars: 3000,
            fetch_timeout: titles::FETCH_TIMEOUT,
            query_delay: titles::QUERY_DELAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(!config.has_api_key());
        assert_eq!(config.cache_ttl, Some(Duration::from_secs(604_800)));
    }

    #[test]
    fn test_config_with_api_key() {
        let config = Config::new(Some("test-key".to_string()));
        assert!(config.has_api_key());
        assert_eq!(config.api_key, Some("test-key".to_string()));
    }

    #[test]
    fn test_testing_config_disables_cache_and_throttle() {
        let config = Config::for_testing("http://127.0.0.1:9");
        assert!(config.cache_dir.is_none());
        assert_eq!(config.min_interval, Duration::ZERO);
        assert_eq!(config.graph_api_url, "http://127.0.0.1:9/graph/v1");
    }

    #[test]
    fn test_fields() {
        assert!(fields::AUTHOR_PAPERS.contains(&"citationCount"));
        assert!(fields::CITING_PAPER.contains(&"authors"));
        assert!(fields::CITATION_EDGE.contains(&"contexts"));
    }
}
