//! Flag groups shared by the stage 2 binaries.

use std::path::PathBuf;

use clap::Args;

use crate::config::{LlmConfig, TitleSearchConfig, titles};

/// LLM endpoint and web search flags.
#[derive(Args, Debug, Clone)]
pub struct TitleSearchArgs {
    /// OpenAI-compatible API base, e.g. https://api.deepseek.com/v1
    #[arg(long = "api_base")]
    pub api_base: String,

    /// LLM API key
    #[arg(long = "api_key", env = "LLM_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Model name
    #[arg(long = "model", default_value = titles::DEFAULT_MODEL)]
    pub model: String,

    /// Title summary cache directory
    #[arg(long = "cache_dir", default_value = titles::CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Search results visited per query
    #[arg(long = "num_search_results", default_value_t = 5)]
    pub num_search_results: usize,

    /// Characters kept from each visited page
    #[arg(long = "max_page_chars", default_value_t = 3000)]
    pub max_page_chars: usize,

    /// HTML search endpoint
    #[arg(long = "search_url", default_value = titles::SEARCH_URL)]
    pub search_url: String,
}

impl TitleSearchArgs {
    /// Agent configuration for these flags.
    #[must_use]
    pub fn to_config(&self) -> TitleSearchConfig {
        let llm = LlmConfig::new(self.api_base.clone(), self.api_key.clone(), self.model.clone());
        TitleSearchConfig {
            cache_dir: self.cache_dir.clone(),
            search_url: self.search_url.clone(),
            num_search_results: self.num_search_results,
            max_page_chars: self.max_page_chars,
            ..TitleSearchConfig::new(llm)
        }
    }
}

/// Logging flags.
#[derive(Args, Debug, Clone)]
pub struct LogArgs {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long = "log_level", default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Output logs as JSON
    #[arg(long = "json_logs")]
    pub json_logs: bool,
}

impl LogArgs {
    pub fn init(&self) {
        crate::logging::init_tracing(&self.log_level, self.json_logs);
    }
}
