//! Command-line entry point for the papertrawl harvester.

use anyhow::Context;
use clap::Parser;
use papertrawl_core::HarvestConfig;
use papertrawl_harvest::{HarvestOrchestrator, HttpFetcher, TracingReporter};
use papertrawl_store::RecordStore;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Harvest an open-access proceedings listing into a CSV record store.
///
/// Re-running against an existing store is always safe: already-persisted
/// entries are skipped and only genuinely new ones are fetched.
#[derive(Debug, Parser)]
#[command(name = "papertrawl", version)]
struct Cli {
    /// Destination record store (CSV file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Number of concurrent detail-page fetches
    #[arg(short, long)]
    workers: Option<usize>,

    /// Listing page URL to enumerate
    #[arg(long)]
    listing_url: Option<String>,

    /// Base URL for resolving relative links found in the listing
    #[arg(long)]
    base_url: Option<String>,

    /// Config file path (defaults to the XDG config location)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Precedence: flags over environment over config file over defaults
    let mut config = match &cli.config {
        Some(path) => {
            let mut config =
                HarvestConfig::load_from(path).context("failed to load config file")?;
            config.apply_env();
            config
        }
        None => HarvestConfig::load_with_env().context("failed to load configuration")?,
    };

    if let Some(output) = cli.output {
        config.harvest.output = output;
    }
    if let Some(workers) = cli.workers {
        config.harvest.workers = workers;
    }
    if let Some(listing_url) = cli.listing_url {
        config.harvest.listing_url = listing_url;
    }
    if let Some(base_url) = cli.base_url {
        config.harvest.base_url = base_url;
    }

    tracing::info!(
        listing_url = %config.harvest.listing_url,
        workers = config.harvest.workers,
        output = %config.harvest.output.display(),
        "starting harvest"
    );

    let fetcher =
        Arc::new(HttpFetcher::new(&config.http).context("failed to initialize HTTP fetcher")?);
    let store = RecordStore::new(&config.harvest.output);
    let orchestrator = HarvestOrchestrator::new(fetcher, store.clone(), &config.harvest);

    let summary = orchestrator
        .run_with_progress(&TracingReporter)
        .await
        .context("harvest failed")?;

    println!("Harvest complete.");
    println!("  listed entries:      {}", summary.listed);
    println!("  new entries:         {}", summary.enumerated);
    println!("  skipped (existing):  {}", summary.skipped);
    println!("  dropped (unparsed):  {}", summary.parse_dropped);
    println!("  enrichment failures: {}", summary.enrichment_failed);
    println!("  newly persisted:     {}", summary.persisted);

    // The store is the source of truth for what is durably written
    match store.count_rows() {
        Ok(total) => println!("  store total rows:    {total}"),
        Err(e) => tracing::warn!(error = %e, "could not count store rows"),
    }

    Ok(())
}
