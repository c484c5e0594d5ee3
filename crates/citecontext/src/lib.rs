//! Citation-context extraction from the Semantic Scholar Graph API.
//!
//! Given an author, pick their most-cited papers, scan the papers citing
//! them, and keep a bounded set of citation records with the sentences
//! that cite the work. Each record names the citing paper's earliest
//! publishing author. An optional second stage asks an LLM, fed with web
//! search results, for that author's notable titles.
//!
//! # Features
//!
//! - **Bounded output**: per-paper and global record limits
//! - **Disk cache**: Graph API responses and title summaries kept for 7 days
//! - **Retries**: transient failures retried with exponential backoff
//! - **Reports**: JSON plus a Markdown table
//!
//! # Example
//!
//! ```no_run
//! use citecontext::{Config, SemanticScholarClient, pipeline::{self, RunConfig}};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = SemanticScholarClient::new(Config::from_env())?;
//!     let cfg = RunConfig { author_id: Some("1741101".into()), ..RunConfig::default() };
//!     let report = pipeline::run(&client, &cfg).await?;
//!     println!("{} records", report.records.len());
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod cli;
pub mod client;
pub mod config;
pub mod enrichment;
pub mod error;
pub mod formatters;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod progress;

pub use cache::JsonDiskCache;
pub use client::{PublicationYears, SemanticScholarClient};
pub use config::{Config, LlmConfig, TitleSearchConfig};
pub use enrichment::TitleSearchAgent;
pub use error::{CacheError, ClientError, PipelineError};
pub use models::{CitationRecord, Report};
