//! Amzscan main entry point
//!
//! Command-line interface for the Amazon keyword search scraper.

use amzscan::config::{load_input, OutputOptions, SearchParameters};
use amzscan::crawler::crawl;
use amzscan::driver::HttpBrowser;
use amzscan::output::open_sink;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Amzscan: Amazon keyword search scraper
///
/// Amzscan crawls Amazon search results for a list of keywords, extracts
/// normalized product records, optionally enriches them from detail pages,
/// and writes them to a JSON Lines file or a SQLite database.
#[derive(Parser, Debug)]
#[command(name = "amzscan")]
#[command(version = "1.0.0")]
#[command(about = "Amazon keyword search scraper", long_about = None)]
struct Cli {
    /// Path to TOML input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the normalized parameters without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading input from: {}", cli.input.display());
    let (params, output) = load_input(&cli.input)?;

    tracing::info!(
        "Input parsed: keywords={:?}, max_items_per_keyword={}, max_pages={}, \
         country={}, min_rating={:?}, min_reviews={:?}, exclude_sponsored={}, \
         fetch_details={}, max_detail_items={}",
        params.keywords,
        params.max_items_per_keyword,
        params.max_pages,
        params.country,
        params.min_rating,
        params.min_reviews,
        params.exclude_sponsored,
        params.fetch_details,
        params.max_detail_items
    );

    if cli.dry_run {
        handle_dry_run(&params, &output);
        return Ok(());
    }

    // Session startup failures happen outside the per-keyword boundary and
    // propagate to the caller.
    let session = HttpBrowser::new(params.country)?;
    let mut sink = open_sink(&output)?;

    crawl(&params, &session, sink.as_mut()).await?;
    tracing::info!("Crawl completed");

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("amzscan=info,warn"),
            1 => EnvFilter::new("amzscan=debug,info"),
            2 => EnvFilter::new("amzscan=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles --dry-run: shows what would be crawled without crawling
fn handle_dry_run(params: &SearchParameters, output: &OutputOptions) {
    println!("=== Amzscan Dry Run ===\n");

    println!("Keywords ({}):", params.keywords.len());
    for keyword in &params.keywords {
        println!("  - {} ({})", keyword, params.country.search_url(keyword));
    }

    println!("\nLimits:");
    println!("  Max items per keyword: {}", params.max_items_per_keyword);
    println!("  Max pages: {}", params.max_pages);

    println!("\nMarketplace:");
    println!("  Country: {}", params.country);
    println!("  Origin: {}", params.country.origin());
    println!("  Locale: {}", params.country.locale());

    println!("\nFilters:");
    match params.min_rating {
        Some(min) => println!("  Min rating: {}", min),
        None => println!("  Min rating: (none)"),
    }
    match params.min_reviews {
        Some(min) => println!("  Min reviews: {}", min),
        None => println!("  Min reviews: (none)"),
    }
    println!("  Exclude sponsored: {}", params.exclude_sponsored);

    println!("\nDetails:");
    println!("  Fetch details: {}", params.fetch_details);
    println!("  Max detail items: {}", params.max_detail_items);

    println!("\nOutput:");
    match &output.database_path {
        Some(path) => println!("  SQLite database: {}", path.display()),
        None => println!("  JSON Lines file: {}", output.jsonl_path.display()),
    }

    println!("\n✓ Input is valid");
}
