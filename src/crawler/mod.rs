//! Crawler module for concurrent page fetching and indexing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed timeout
//! - HTML link and text extraction
//! - The fetch worker pool and its job handoff
//! - Visited-set tracking and the page budget
//! - Overall crawl coordination and completion detection

mod coordinator;
mod extractor;
mod fetcher;
mod frontier;
mod pool;

pub use coordinator::{run_crawl, Coordinator, CrawlOutcome, CrawlReport};
pub use extractor::{extract_content, extract_links, extract_text, ExtractedContent};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage, Fetcher, HttpFetcher};
pub use frontier::{Frontier, Rejection};
pub use pool::{Job, JobQueue, WorkerPool};
