//! Sumi-Index main entry point
//!
//! This is the command-line interface for the Sumi-Index crawler and search shell.

use anyhow::{bail, Context};
use clap::Parser;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sumi_index::config::{load_config_with_hash, Config};
use sumi_index::crawler::run_crawl;
use sumi_index::output::{load_statistics, print_statistics};
use sumi_index::repl::run_query_loop;
use sumi_index::storage::{ensure_writable, load_index, save_index};
use sumi_index::{CrawlOutcome, InvertedIndex};
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Sumi-Index: crawl one site and search what it says
///
/// Sumi-Index crawls outward from a seed page, stays within one domain prefix,
/// indexes the text of every page it fetches, and then answers single-word
/// queries. The index is saved as JSON on exit or on Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "sumi-index")]
#[command(version = "1.0.0")]
#[command(about = "A same-domain crawler with an inverted index", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["query_only", "no_repl"])]
    dry_run: bool,

    /// Skip crawling and search a previously saved index
    #[arg(long, conflicts_with = "no_repl")]
    query_only: bool,

    /// Save the index and exit as soon as crawling finishes
    #[arg(long)]
    no_repl: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config).with_context(|| {
        format!("Failed to load configuration from {}", cli.config.display())
    })?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    spawn_signal_listener(shutdown.clone());

    if cli.query_only {
        handle_query_only(&config, shutdown).await
    } else {
        handle_crawl(config, &config_hash, shutdown, !cli.no_repl).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so they do not interleave with search results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("sumi_index=info,warn"),
            1 => EnvFilter::new("sumi_index=debug,info"),
            2 => EnvFilter::new("sumi_index=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Sumi-Index Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Target domain prefix: {}", config.crawler.target_domain);
    println!("  Page budget: {}", config.crawler.page_budget);
    println!("  Workers: {}", config.crawler.workers);
    println!("  Fetch timeout: {}ms", config.crawler.fetch_timeout);
    println!("  Politeness delay: {}ms", config.crawler.politeness_delay);
    println!(
        "  Queue capacity: {} jobs, {} results",
        config.crawler.job_queue_capacity, config.crawler.result_queue_capacity
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Index: {}", config.output.index_path);

    if !config
        .crawler
        .seed_url
        .starts_with(&config.crawler.target_domain)
    {
        println!("\n! Seed URL does not start with the target domain prefix;");
        println!("  none of its links will be followed");
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the default mode: crawl, report, search, save
async fn handle_crawl(
    config: Config,
    config_hash: &str,
    shutdown: CancellationToken,
    interactive: bool,
) -> anyhow::Result<()> {
    let index_path = PathBuf::from(&config.output.index_path);
    ensure_writable(&index_path)
        .with_context(|| format!("Cannot write index to {}", index_path.display()))?;

    let index = Arc::new(InvertedIndex::new());
    let report = run_crawl(config, Arc::clone(&index), shutdown.clone())
        .await
        .context("Crawl failed")?;

    print_statistics(&load_statistics(&report, &index));

    if report.outcome == CrawlOutcome::Cancelled {
        println!("\nShutdown signal received. Saving index...");
        persist(&index, &index_path, config_hash)?;
        println!("Index saved. Exiting.");
        return Ok(());
    }

    if interactive && run_repl(Arc::clone(&index), shutdown).await? {
        println!("\nShutdown signal received. Saving index...");
    }

    persist(&index, &index_path, config_hash)?;
    println!("Index saved to {}", index_path.display());

    Ok(())
}

/// Handles the --query-only mode: search an index saved by an earlier run
async fn handle_query_only(config: &Config, shutdown: CancellationToken) -> anyhow::Result<()> {
    let index_path = Path::new(&config.output.index_path);
    let index = load_index(index_path)
        .with_context(|| format!("Failed to load index from {}", index_path.display()))?;

    println!("Loaded {} unique words from {}", index.len(), index_path.display());

    run_repl(Arc::new(index), shutdown).await?;
    Ok(())
}

/// Runs the query loop on its own thread
///
/// Stdin reads cannot be interrupted, so the loop lives on a plain OS thread
/// that is left behind if a shutdown signal arrives first.
///
/// # Returns
///
/// `true` if a shutdown signal ended the session, `false` if the user did
async fn run_repl(index: Arc<InvertedIndex>, shutdown: CancellationToken) -> anyhow::Result<bool> {
    let (done_tx, done_rx) = oneshot::channel();

    std::thread::Builder::new()
        .name("query-loop".to_string())
        .spawn(move || {
            let result = run_query_loop(&index, io::stdin().lock(), io::stdout());
            let _ = done_tx.send(result);
        })
        .context("Failed to start query loop")?;

    tokio::select! {
        finished = done_rx => match finished {
            Ok(result) => {
                result.context("Query loop failed")?;
                Ok(false)
            }
            Err(_) => bail!("Query loop thread exited without reporting"),
        },
        _ = shutdown.cancelled() => Ok(true),
    }
}

/// Writes the index snapshot
fn persist(index: &InvertedIndex, path: &Path, config_hash: &str) -> anyhow::Result<()> {
    save_index(index, path, Some(config_hash))
        .with_context(|| format!("Failed to save index to {}", path.display()))?;
    Ok(())
}

/// Cancels `shutdown` on SIGINT or SIGTERM
fn spawn_signal_listener(shutdown: CancellationToken) {
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        tracing::info!("Shutdown signal received");
        shutdown.cancel();
    });
}

async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    tokio::select! {
        _ = ctrl_c => {}
        _ = wait_for_sigterm() => {}
    }
}

#[cfg(unix)]
async fn wait_for_sigterm() {
    use tokio::signal::unix::{signal, SignalKind};
    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!("Failed to register SIGTERM handler: {}", e);
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_sigterm() {
    std::future::pending::<()>().await
}
