//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the control loop that:
//! - Seeds the frontier and dispatches jobs to the worker pool
//! - Consumes results and feeds page text into the index
//! - Turns newly discovered links into jobs, within the page budget
//! - Detects completion through in-flight accounting
//! - Stops early when the shutdown token fires

use crate::config::Config;
use crate::crawler::fetcher::{FetchResult, FetchedPage, Fetcher, HttpFetcher};
use crate::crawler::frontier::{Frontier, Rejection};
use crate::crawler::pool::{Job, JobQueue, WorkerPool};
use crate::index::InvertedIndex;
use crate::SumiError;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// How a crawl ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrawlOutcome {
    /// Every admitted job was resolved
    Completed,
    /// The shutdown token fired before the crawl finished
    Cancelled,
}

/// Counters gathered while crawling
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlReport {
    pub outcome: CrawlOutcome,

    /// URLs admitted to the job stream (the visited set)
    pub pages_scheduled: usize,

    /// Pages fetched and added to the index
    pub pages_indexed: usize,

    /// Fetches that produced the failure sentinel
    pub pages_failed: usize,

    /// Links found on fetched pages, duplicates included
    pub links_seen: usize,

    /// Links turned away as already visited or off-domain
    pub links_rejected: usize,

    /// Largest number of jobs waiting for room in the job channel
    pub backlog_peak: usize,

    /// Jobs still unresolved when the crawl stopped
    pub in_flight_at_exit: usize,

    pub elapsed: Duration,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    fetcher: Arc<dyn Fetcher>,
    index: Arc<InvertedIndex>,
    shutdown: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator that fetches over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `index` - Index that receives page text; readable by others at any time
    /// * `shutdown` - Cancelling this token stops the crawl
    pub fn new(
        config: Config,
        index: Arc<InvertedIndex>,
        shutdown: CancellationToken,
    ) -> Result<Self, SumiError> {
        let timeout = Duration::from_millis(config.crawler.fetch_timeout);
        let fetcher = HttpFetcher::new(&config.user_agent, timeout)?;
        Ok(Self::with_fetcher(config, Arc::new(fetcher), index, shutdown))
    }

    /// Creates a coordinator around any `Fetcher`
    pub fn with_fetcher(
        config: Config,
        fetcher: Arc<dyn Fetcher>,
        index: Arc<InvertedIndex>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            config: Arc::new(config),
            fetcher,
            index,
            shutdown,
        }
    }

    /// Runs the crawl until every job is resolved or shutdown is requested
    ///
    /// The in-flight counter is raised immediately before a job is handed to
    /// the job queue and lowered immediately after a result is taken from the
    /// result channel. It returning to zero is the only way the crawl completes.
    pub async fn run(self) -> Result<CrawlReport, SumiError> {
        let crawler = &self.config.crawler;
        let start_time = Instant::now();

        let (job_tx, job_rx) = mpsc::channel::<Job>(crawler.job_queue_capacity.max(1) as usize);
        let (result_tx, mut result_rx) =
            mpsc::channel::<FetchResult>(crawler.result_queue_capacity.max(1) as usize);

        let pool = WorkerPool::spawn(
            crawler.workers.max(1) as usize,
            Arc::clone(&self.fetcher),
            job_rx,
            result_tx,
            Duration::from_millis(crawler.politeness_delay),
        );

        let mut queue = JobQueue::new(job_tx);
        let mut frontier = Frontier::new(crawler.page_budget as usize, &crawler.target_domain);
        let mut report = CrawlReport {
            outcome: CrawlOutcome::Completed,
            pages_scheduled: 0,
            pages_indexed: 0,
            pages_failed: 0,
            links_seen: 0,
            links_rejected: 0,
            backlog_peak: 0,
            in_flight_at_exit: 0,
            elapsed: Duration::ZERO,
        };

        if !frontier.is_on_domain(&crawler.seed_url) {
            tracing::warn!(
                "Seed {} does not start with target domain {}; only the seed will be fetched",
                crawler.seed_url,
                crawler.target_domain
            );
        }

        tracing::info!(
            "Starting crawl from {} with {} workers (budget {} pages)",
            crawler.seed_url,
            pool.size(),
            crawler.page_budget
        );

        frontier.seed(&crawler.seed_url);
        let mut in_flight: usize = 1;
        let mut loop_result = queue.submit(crawler.seed_url.clone());

        while loop_result.is_ok() && in_flight > 0 {
            tokio::select! {
                biased;

                _ = self.shutdown.cancelled() => {
                    tracing::info!("Shutdown requested with {} jobs in flight", in_flight);
                    report.outcome = CrawlOutcome::Cancelled;
                    break;
                }

                flushed = queue.flush_one(), if queue.has_backlog() => {
                    loop_result = flushed;
                }

                received = result_rx.recv() => {
                    let Some(result) = received else {
                        loop_result = Err(SumiError::WorkerPool(format!(
                            "all workers exited with {} jobs in flight",
                            in_flight
                        )));
                        break;
                    };

                    in_flight -= 1;
                    loop_result = self.handle_result(
                        result,
                        &mut frontier,
                        &mut queue,
                        &mut in_flight,
                        &mut report,
                    );

                    tracing::debug!(
                        "Queue status: {} in flight, {} visited, {} backlogged",
                        in_flight,
                        frontier.visited_count(),
                        queue.backlog_len()
                    );

                    let resolved = report.pages_indexed + report.pages_failed;
                    if resolved % 10 == 0 {
                        let rate = resolved as f64 / start_time.elapsed().as_secs_f64().max(f64::EPSILON);
                        tracing::info!(
                            "Progress: {} pages resolved, {} in flight, {:.2} pages/sec",
                            resolved,
                            in_flight,
                            rate
                        );
                    }
                }
            }
        }

        report.pages_scheduled = frontier.visited_count();
        report.backlog_peak = queue.backlog_peak();
        report.in_flight_at_exit = in_flight;

        // Closing the job channel lets idle workers finish
        drop(queue);
        drop(result_rx);

        if report.outcome == CrawlOutcome::Cancelled || loop_result.is_err() {
            pool.abort();
        } else {
            pool.shutdown().await;
        }

        loop_result?;

        report.elapsed = start_time.elapsed();
        tracing::info!(
            "Crawl {:?}: {} indexed, {} failed, {} scheduled in {:?}",
            report.outcome,
            report.pages_indexed,
            report.pages_failed,
            report.pages_scheduled,
            report.elapsed
        );

        Ok(report)
    }

    /// Applies one result to the index and the frontier
    fn handle_result(
        &self,
        result: FetchResult,
        frontier: &mut Frontier,
        queue: &mut JobQueue,
        in_flight: &mut usize,
        report: &mut CrawlReport,
    ) -> Result<(), SumiError> {
        let page = match result {
            FetchResult::Page(page) => page,
            FetchResult::Failed { url, .. } => {
                tracing::debug!("No page for {}", url);
                report.pages_failed += 1;
                return Ok(());
            }
        };

        self.index.add(&page.url, &page.text);
        report.pages_indexed += 1;
        report.links_seen += page.links.len();

        if frontier.budget_reached() {
            tracing::trace!(
                "Budget of {} reached; not following links from {}",
                frontier.page_budget(),
                page.url
            );
            return Ok(());
        }

        self.schedule_links(page, frontier, queue, in_flight, report)
    }

    fn schedule_links(
        &self,
        page: FetchedPage,
        frontier: &mut Frontier,
        queue: &mut JobQueue,
        in_flight: &mut usize,
        report: &mut CrawlReport,
    ) -> Result<(), SumiError> {
        for link in page.links {
            match frontier.consider(&link) {
                Ok(()) => {
                    *in_flight += 1;
                    queue.submit(link)?;
                }
                Err(Rejection::AlreadyVisited) => {
                    report.links_rejected += 1;
                }
                Err(Rejection::OffDomain) => {
                    tracing::trace!("Skipping off-domain link {}", link);
                    report.links_rejected += 1;
                }
            }
        }

        Ok(())
    }
}

/// Runs a crawl over HTTP with the given configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use std::sync::Arc;
/// use sumi_index::config::load_config;
/// use sumi_index::crawler::run_crawl;
/// use sumi_index::InvertedIndex;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("sumi-index.toml"))?;
/// let index = Arc::new(InvertedIndex::new());
/// let report = run_crawl(config, Arc::clone(&index), CancellationToken::new()).await?;
/// println!("{} pages indexed", report.pages_indexed);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(
    config: Config,
    index: Arc<InvertedIndex>,
    shutdown: CancellationToken,
) -> Result<CrawlReport, SumiError> {
    Coordinator::new(config, index, shutdown)?.run().await
}
