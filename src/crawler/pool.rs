//! Fetch worker pool and the job handoff that feeds it
//!
//! Workers share one job receiver and one result sender. They never touch the
//! visited set or the index; everything they learn travels back to the
//! coordinator as a `FetchResult`.

use crate::crawler::fetcher::{FetchResult, Fetcher};
use crate::SumiError;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// A URL waiting to be fetched
pub type Job = String;

/// Fixed-size set of fetch loops
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `workers` fetch loops on the current tokio runtime
    ///
    /// # Arguments
    ///
    /// * `workers` - Number of concurrent fetch loops
    /// * `fetcher` - Performs the actual retrieval
    /// * `jobs` - Shared job source; closing it stops the pool
    /// * `results` - Shared result sink; every job yields exactly one result
    /// * `politeness_delay` - Pause after each successful fetch
    pub fn spawn(
        workers: usize,
        fetcher: Arc<dyn Fetcher>,
        jobs: mpsc::Receiver<Job>,
        results: mpsc::Sender<FetchResult>,
        politeness_delay: Duration,
    ) -> Self {
        let jobs = Arc::new(Mutex::new(jobs));

        let handles = (1..=workers)
            .map(|id| {
                tokio::spawn(worker_loop(
                    id,
                    Arc::clone(&fetcher),
                    Arc::clone(&jobs),
                    results.clone(),
                    politeness_delay,
                ))
            })
            .collect();

        tracing::debug!("Spawned {} fetch workers", workers);

        Self { handles }
    }

    /// Number of workers in the pool
    pub fn size(&self) -> usize {
        self.handles.len()
    }

    /// Waits for every worker to exit
    ///
    /// Workers exit once the job source is closed and drained, or once the
    /// result sink has been dropped.
    pub async fn shutdown(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                if e.is_panic() {
                    tracing::error!("Fetch worker panicked: {}", e);
                }
            }
        }
    }

    /// Abandons all workers, including fetches still on the wire
    pub fn abort(self) {
        for handle in &self.handles {
            handle.abort();
        }
    }
}

async fn worker_loop(
    id: usize,
    fetcher: Arc<dyn Fetcher>,
    jobs: Arc<Mutex<mpsc::Receiver<Job>>>,
    results: mpsc::Sender<FetchResult>,
    politeness_delay: Duration,
) {
    loop {
        // The lock is only held while waiting for the next job
        let job = { jobs.lock().await.recv().await };

        let Some(url) = job else {
            tracing::trace!("Worker {} stopping: job queue closed", id);
            break;
        };

        tracing::debug!("Worker {} processing {}", id, url);
        let result = fetcher.fetch(&url).await;
        let fetched = result.is_page();

        if let FetchResult::Failed { url, error } = &result {
            tracing::warn!("Worker {} failed to fetch {}: {}", id, url, error);
        }

        if results.send(result).await.is_err() {
            tracing::trace!("Worker {} stopping: result sink closed", id);
            break;
        }

        if fetched && !politeness_delay.is_zero() {
            tokio::time::sleep(politeness_delay).await;
        }
    }
}

/// Non-blocking handoff of jobs into the bounded job channel
///
/// Submitting never waits. When the channel is full the job is appended to an
/// in-memory FIFO backlog, and the coordinator moves backlogged jobs into the
/// channel with [`JobQueue::flush_one`] as slots free up, alongside consuming
/// results. The backlog can only hold admitted URLs, so its size is bounded by
/// the page budget plus the links of a single page.
pub struct JobQueue {
    sender: mpsc::Sender<Job>,
    backlog: VecDeque<Job>,
    backlog_peak: usize,
}

impl JobQueue {
    pub fn new(sender: mpsc::Sender<Job>) -> Self {
        Self {
            sender,
            backlog: VecDeque::new(),
            backlog_peak: 0,
        }
    }

    /// Hands `job` to the pool without blocking
    ///
    /// Jobs keep their submission order: once anything is backlogged, new jobs
    /// queue behind it.
    pub fn submit(&mut self, job: Job) -> Result<(), SumiError> {
        if !self.backlog.is_empty() {
            self.push_backlog(job);
            return Ok(());
        }

        match self.sender.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(job)) => {
                self.push_backlog(job);
                Ok(())
            }
            Err(TrySendError::Closed(job)) => Err(SumiError::WorkerPool(format!(
                "job queue closed while submitting {}",
                job
            ))),
        }
    }

    /// Waits for a free channel slot and moves the oldest backlogged job into it
    ///
    /// Cancel safe: if the future is dropped before a slot is granted, the
    /// backlog is unchanged.
    pub async fn flush_one(&mut self) -> Result<(), SumiError> {
        let permit = self
            .sender
            .reserve()
            .await
            .map_err(|_| SumiError::WorkerPool("job queue closed".to_string()))?;

        if let Some(job) = self.backlog.pop_front() {
            permit.send(job);
        }

        Ok(())
    }

    pub fn has_backlog(&self) -> bool {
        !self.backlog.is_empty()
    }

    pub fn backlog_len(&self) -> usize {
        self.backlog.len()
    }

    /// Largest backlog observed so far
    pub fn backlog_peak(&self) -> usize {
        self.backlog_peak
    }

    fn push_backlog(&mut self, job: Job) {
        self.backlog.push_back(job);
        self.backlog_peak = self.backlog_peak.max(self.backlog.len());
    }
}
