//! enrich-titles - stage 2 of citation-context extraction.
//!
//! Reads a stage 1 JSON report, looks up notable titles for every earliest
//! citing author, and writes the enriched report.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use citecontext::{
    TitleSearchAgent,
    cli::{LogArgs, TitleSearchArgs},
    enrichment, formatters,
};

#[derive(Parser, Debug)]
#[command(name = "enrich-titles")]
#[command(about = "Add earliest-author title summaries to a citecontext JSON report")]
#[command(version)]
struct Cli {
    /// Stage 1 JSON report
    #[arg(long = "input")]
    input: PathBuf,

    /// Enriched JSON report path
    #[arg(long = "output")]
    output: PathBuf,

    /// Optional Markdown report path
    #[arg(long = "output_md")]
    output_md: Option<PathBuf>,

    /// Context characters shown per Markdown row (0 = no limit)
    #[arg(long = "max_context_chars", default_value_t = 280)]
    max_context_chars: usize,

    #[command(flatten)]
    search: TitleSearchArgs,

    #[command(flatten)]
    log: LogArgs,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let cli = Cli::parse();

    cli.log.init();

    let mut report = formatters::read_report(&cli.input)
        .with_context(|| format!("failed to read report {}", cli.input.display()))?;
    tracing::info!(input = %cli.input.display(), records = report.records.len(), "loaded report");

    let agent = TitleSearchAgent::new(&cli.search.to_config())?;
    let searched = enrichment::enrich_records(&mut report.records, &agent).await?;

    formatters::write_json(&cli.output, &report)?;
    if let Some(path) = &cli.output_md {
        formatters::write_markdown(path, &report, cli.max_context_chars)?;
    }

    println!(
        "Enriched {} records ({} unique authors) into {}",
        report.records.len(),
        searched,
        cli.output.display()
    );
    Ok(())
}
