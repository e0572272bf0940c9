//! Sectioncrawl main entry point
//!
//! This is the command-line interface for the Sectioncrawl site-to-markdown crawler.

use anyhow::{bail, Context};
use clap::{Args, Parser, Subcommand};
use sectioncrawl::config::{load_config_with_hash, validate, validate_seed_url, Config};
use sectioncrawl::output::{print_statistics, FsWriter};
use sectioncrawl::split::split_directory;
use sectioncrawl::Coordinator;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sectioncrawl: a section-granular site-to-markdown crawler
///
/// Sectioncrawl follows a page's links to a bounded depth and writes the main content of
/// every page, plus each of its sections, as separate markdown files.
#[derive(Parser, Debug)]
#[command(name = "sectioncrawl")]
#[command(version)]
#[command(about = "Crawl a site into per-section markdown files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl a site starting from a seed URL
    Crawl(CrawlArgs),

    /// Split markdown files into chunks at their headings
    Split(SplitArgs),
}

#[derive(Args, Debug)]
struct CrawlArgs {
    /// Seed URL (absolute http or https)
    #[arg(value_name = "URL")]
    url: String,

    /// Maximum link depth to follow (0 = seed page only)
    #[arg(short, long)]
    depth: Option<u32>,

    /// Directory the markdown files are written to
    #[arg(short, long)]
    output: Option<String>,

    /// Follow links to other hosts
    #[arg(long)]
    allow_external: bool,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Maximum number of fetches in flight
    #[arg(long)]
    concurrency: Option<u32>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Validate the configuration and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct SplitArgs {
    /// Directory containing markdown files to split
    #[arg(value_name = "INPUT_DIR")]
    input_dir: PathBuf,

    /// Directory to save the chunks in
    #[arg(short, long, default_value = "chunks")]
    output_dir: PathBuf,

    /// Maximum heading level to split at (1-6)
    #[arg(short = 'l', long, value_parser = clap::value_parser!(u8).range(1..=6))]
    max_level: Option<u8>,

    /// Search for markdown files recursively in subdirectories
    #[arg(short, long)]
    recursive: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    match cli.command {
        Command::Crawl(args) => handle_crawl(args).await,
        Command::Split(args) => handle_split(args),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sectioncrawl=info,warn"),
            1 => EnvFilter::new("sectioncrawl=debug,info"),
            2 => EnvFilter::new("sectioncrawl=trace,debug"),
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

/// Builds the effective configuration: file values first, then command-line overrides
fn resolve_config(args: &CrawlArgs) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(depth) = args.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(output) = &args.output {
        config.output.directory = output.clone();
    }
    if args.allow_external {
        config.crawler.allow_external = true;
    }
    if let Some(concurrency) = args.concurrency {
        config.crawler.max_concurrent_fetches = concurrency;
    }
    if let Some(timeout) = args.timeout {
        config.crawler.request_timeout_secs = timeout;
        config.crawler.connect_timeout_secs = config.crawler.connect_timeout_secs.min(timeout);
    }

    validate(&config)?;
    Ok(config)
}

/// Handles --dry-run: shows the effective configuration
fn handle_dry_run(config: &Config, seed: &str) {
    println!("=== Sectioncrawl Dry Run ===\n");

    println!("Seed: {}", seed);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Allow external: {}", config.crawler.allow_external);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );

    println!("\nUser Agent: {}", config.user_agent.value);
    println!("Output directory: {}", config.output.directory);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(args: CrawlArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let seed = validate_seed_url(&args.url)?;

    if args.dry_run {
        handle_dry_run(&config, seed.as_str());
        return Ok(());
    }

    let cancel = CancellationToken::new();
    let coordinator = Coordinator::new(config)?.with_cancellation(cancel.clone());

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight pages");
            cancel.cancel();
        }
    });

    let report = match coordinator.run(seed.as_str()).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    println!();
    print_statistics(&report.statistics);

    Ok(())
}

/// Handles the split subcommand
fn handle_split(args: SplitArgs) -> anyhow::Result<()> {
    if !args.input_dir.is_dir() {
        bail!(
            "Input directory '{}' does not exist",
            args.input_dir.display()
        );
    }

    let writer = FsWriter::new(&args.output_dir);
    let summary = split_directory(&args.input_dir, &writer, args.max_level, args.recursive)?;

    if summary.files_processed + summary.files_failed == 0 {
        println!("No markdown files found in {}", args.input_dir.display());
        return Ok(());
    }

    println!(
        "Split {} files into {} chunks in {} ({} failed)",
        summary.files_processed,
        summary.chunks_written,
        args.output_dir.display(),
        summary.files_failed
    );

    Ok(())
}
