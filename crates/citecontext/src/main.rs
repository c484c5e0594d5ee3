//! citecontext - citation-context extraction, stage 1.
//!
//! Writes a JSON report and a Markdown table for one author.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use citecontext::{
    Config, PipelineError, SemanticScholarClient, cli::LogArgs, config::api, formatters,
    pipeline::{self, RunConfig},
};

#[derive(Parser, Debug)]
#[command(name = "citecontext")]
#[command(about = "Extract citation contexts for an author's most-cited papers from Semantic Scholar")]
#[command(version)]
struct Cli {
    /// Author name to search for
    #[arg(long = "author_name", required_unless_present = "author_id")]
    author_name: Option<String>,

    /// Semantic Scholar author id (skips author search)
    #[arg(long = "author_id")]
    author_id: Option<String>,

    /// Keyword matched against affiliations to disambiguate the author search
    #[arg(long = "affiliation_keyword")]
    affiliation_keyword: Option<String>,

    /// Fail when the author search has no clear winner
    #[arg(long = "strict_disambiguation", overrides_with = "no_strict_disambiguation")]
    strict_disambiguation: bool,

    #[arg(long = "no-strict_disambiguation", overrides_with = "strict_disambiguation", hide = true)]
    no_strict_disambiguation: bool,

    /// Number of most-cited papers to scan
    #[arg(long = "max_target_papers", default_value_t = 20)]
    max_target_papers: usize,

    /// Citations scanned per cited paper
    #[arg(long = "scan_citations_per_paper", default_value_t = 1000)]
    scan_citations_per_paper: usize,

    /// Citations kept per cited paper
    #[arg(long = "top_citations_per_paper", default_value_t = 3)]
    top_citations_per_paper: usize,

    /// Total records kept
    #[arg(long = "max_records", default_value_t = 60)]
    max_records: usize,

    /// Ignore publication years after this when picking the earliest author (0 = off)
    #[arg(long = "earliest_author_cutoff_year", default_value_t = 0)]
    earliest_author_cutoff_year: i32,

    /// Keep only influential citations (default)
    #[arg(long = "influential_only", overrides_with = "no_influential_only")]
    influential_only: bool,

    /// Keep non-influential citations too
    #[arg(long = "no-influential_only", overrides_with = "influential_only")]
    no_influential_only: bool,

    /// Keep only citations with context sentences (default)
    #[arg(long = "require_context", overrides_with = "no_require_context")]
    require_context: bool,

    /// Keep citations without context sentences too
    #[arg(long = "no-require_context", overrides_with = "require_context")]
    no_require_context: bool,

    /// JSON report path
    #[arg(long = "output_json", default_value = "output.json")]
    output_json: PathBuf,

    /// Markdown report path
    #[arg(long = "output_md", default_value = "output.md")]
    output_md: PathBuf,

    /// Context characters shown per Markdown row (0 = no limit)
    #[arg(long = "max_context_chars", default_value_t = 280)]
    max_context_chars: usize,

    /// Semantic Scholar API key (optional, enables higher rate limits)
    #[arg(long = "api_key", env = "SEMANTIC_SCHOLAR_API_KEY")]
    api_key: Option<String>,

    /// Response cache directory
    #[arg(long = "cache_dir", default_value = api::CACHE_DIR)]
    cache_dir: PathBuf,

    /// Disable the response cache
    #[arg(long = "no_cache")]
    no_cache: bool,

    /// Per-request timeout in seconds
    #[arg(long = "timeout_sec", default_value_t = 60.0)]
    timeout_sec: f64,

    /// Sleep before each uncached request, in seconds
    #[arg(long = "min_interval_sec", default_value_t = 0.25)]
    min_interval_sec: f64,

    /// Retries on 429 and 5xx responses
    #[arg(long = "max_retries", default_value_t = 6)]
    max_retries: u32,

    #[command(flatten)]
    log: LogArgs,
}

impl Cli {
    fn client_config(&self) -> anyhow::Result<Config> {
        let mut config = Config::new(self.api_key.clone().filter(|k| !k.trim().is_empty()));
        config.request_timeout = Duration::try_from_secs_f64(self.timeout_sec)?;
        config.min_interval = Duration::try_from_secs_f64(self.min_interval_sec)?;
        config.max_retries = self.max_retries;
        config.cache_dir = (!self.no_cache).then(|| self.cache_dir.clone());
        Ok(config)
    }

    fn run_config(&self) -> RunConfig {
        RunConfig {
            author_name: self.author_name.clone(),
            author_id: self.author_id.clone(),
            affiliation_keyword: self.affiliation_keyword.clone(),
            max_target_papers: self.max_target_papers,
            scan_citations_per_paper: self.scan_citations_per_paper,
            top_citations_per_paper: self.top_citations_per_paper,
            max_records: self.max_records,
            earliest_author_cutoff_year: self.earliest_author_cutoff_year,
            influential_only: self.influential_only || !self.no_influential_only,
            require_context: self.require_context || !self.no_require_context,
            strict_disambiguation: self.strict_disambiguation && !self.no_strict_disambiguation,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    cli.log.init();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting citation-context extraction");

    let client = SemanticScholarClient::new(cli.client_config()?)?;
    if !client.has_api_key() {
        tracing::warn!("No SEMANTIC_SCHOLAR_API_KEY set, expect stricter rate limits");
    }

    let report =
        pipeline::run(&client, &cli.run_config()).await.map_err(PipelineError::into_report)?;

    formatters::write_json(&cli.output_json, &report)?;
    formatters::write_markdown(&cli.output_md, &report, cli.max_context_chars)?;

    println!(
        "Wrote {} records to {} and {}",
        report.records.len(),
        cli.output_json.display(),
        cli.output_md.display()
    );
    Ok(())
}
