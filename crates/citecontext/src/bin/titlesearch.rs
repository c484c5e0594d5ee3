//! titlesearch - look up notable titles for people by name.

use std::path::PathBuf;

use clap::Parser;

use citecontext::{
    TitleSearchAgent,
    cli::{LogArgs, TitleSearchArgs},
};

#[derive(Parser, Debug)]
#[command(name = "titlesearch")]
#[command(about = "Summarize notable academic titles for each name via web search and an LLM")]
#[command(version)]
struct Cli {
    /// Person names to look up
    #[arg(required = true)]
    names: Vec<String>,

    /// Write the JSON result here instead of stdout
    #[arg(long = "output")]
    output: Option<PathBuf>,

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

    let agent = TitleSearchAgent::new(&cli.search.to_config())?;
    let results = agent.batch_search(&cli.names).await?;
    let json = serde_json::to_string_pretty(&results)?;

    match &cli.output {
        Some(path) => {
            std::fs::write(path, format!("{json}\n"))?;
            tracing::info!(path = %path.display(), names = results.len(), "wrote title summaries");
        }
        None => println!("{json}"),
    }
    Ok(())
}
