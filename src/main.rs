//! Skitter main entry point
//!
//! Command-line interface for the single-session crawl kernel.

use anyhow::Context;
use clap::Parser;
use skitter::config::{load_config, Config};
use skitter::driver::{Driver, HttpTransport, StdoutSink};
use skitter::frontier::Frontier;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use url::Url;

/// Skitter: a focused, single-session web crawl kernel
///
/// Skitter fetches pages starting from a seed URL, classifies their
/// content, extracts records and links with pattern rules, and follows
/// in-scope links through a priority-ordered frontier until a configured
/// bound stops it.
#[derive(Parser, Debug)]
#[command(name = "skitter")]
#[command(version)]
#[command(about = "A focused, single-session web crawl kernel", long_about = None)]
struct Cli {
    /// Seed URL to start crawling from
    #[arg(value_name = "SEED")]
    seed: String,

    /// Path to TOML configuration file (defaults apply when omitted)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show the effective settings without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path).with_context(|| format!("loading {}", path.display()))?
        }
        None => Config::default(),
    };

    let seed = Url::parse(&cli.seed).with_context(|| format!("parsing seed URL '{}'", cli.seed))?;

    if cli.dry_run {
        print_effective_config(&config, &seed);
        return Ok(());
    }

    run_crawl(config, seed).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("skitter=info,warn"),
            1 => EnvFilter::new("skitter=debug,info"),
            2 => EnvFilter::new("skitter=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Handles --dry-run: prints the effective configuration
fn print_effective_config(config: &Config, seed: &Url) {
    println!("=== Skitter Dry Run ===\n");

    println!("Seed: {seed}");
    println!("User agent: {}", config.user_agent);

    println!("\nLimits:");
    println!("  Max crawl time: {}ms", config.limits.max_crawl_time);
    println!("  Max crawl depth: {}", config.limits.max_crawl_depth);
    println!("  Max crawled links: {}", config.limits.max_crawled_links);
    println!(
        "  Max link fetch time: {}ms",
        config.limits.max_link_fetch_time
    );

    if config.sniff.is_empty() {
        println!("\nSniff rules: builtin (html, xml)");
    } else {
        println!("\nSniff rules ({}):", config.sniff.len());
        for rule in &config.sniff {
            println!("  {} -> {}", rule.pattern, rule.mime);
        }
    }

    println!("\nPriority rules ({}):", config.priority.len());
    for rule in &config.priority {
        println!("  {} -> {:?}", rule.pattern, rule.directive);
    }

    if config.extract.link.is_empty() && config.extract.data.is_empty() {
        println!("\nExtractors: builtin (html anchors/link tags, html titles)");
    } else {
        println!("\nLink extractors ({}):", config.extract.link.len());
        for entry in &config.extract.link {
            println!("  {}: {}", entry.mime, entry.pattern);
        }
        println!("Data extractors ({}):", config.extract.data.len());
        for entry in &config.extract.data {
            println!("  {}: {}", entry.mime, entry.pattern);
        }
    }

    println!("\n✓ Configuration is valid");
}

/// Builds the kernel components and runs the crawl session
async fn run_crawl(config: Config, seed: Url) -> anyhow::Result<()> {
    let frontier = Frontier::new(config.frontier_limits(), config.priority_engine()?);
    let sniffer = config.sniffer()?;
    let pipeline = config.pipeline()?;
    let transport = HttpTransport::new(&config.user_agent).context("building HTTP client")?;

    let mut driver = Driver::new(frontier, sniffer, pipeline, transport, StdoutSink);
    let summary = driver.start(seed).await?;

    tracing::info!(
        "Done: {} links crawled, {} records emitted, {} left in frontier, {:?} elapsed",
        summary.links_crawled,
        summary.records_emitted,
        summary.frontier_remainder,
        summary.elapsed
    );

    Ok(())
}
