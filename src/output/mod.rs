//! Output module for crawl summaries
//!
//! This module handles turning crawl counters into the summary shown on the
//! terminal once crawling stops.

pub mod stats;

pub use stats::{format_statistics, load_statistics, print_statistics, CrawlStatistics};
