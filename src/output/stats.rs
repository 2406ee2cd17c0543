//! Statistics for a finished or interrupted crawl
//!
//! This module combines the coordinator's report with the state of the index
//! and renders it for the terminal.

use crate::crawler::{CrawlOutcome, CrawlReport};
use crate::index::InvertedIndex;
use std::fmt;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    pub report: CrawlReport,

    /// Distinct tokens in the index after the crawl
    pub unique_tokens: usize,
}

impl CrawlStatistics {
    /// Share of scheduled pages that were fetched and indexed
    pub fn success_rate(&self) -> f64 {
        if self.report.pages_scheduled == 0 {
            return 0.0;
        }
        (self.report.pages_indexed as f64 / self.report.pages_scheduled as f64) * 100.0
    }
}

impl fmt::Display for CrawlStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = &self.report;

        let heading = match report.outcome {
            CrawlOutcome::Completed => "Crawling Complete!",
            CrawlOutcome::Cancelled => "Crawling Interrupted",
        };

        writeln!(f, "=== {} ===\n", heading)?;
        writeln!(f, "Overview:")?;
        writeln!(f, "  Pages scheduled: {}", report.pages_scheduled)?;
        writeln!(f, "  Pages indexed: {}", report.pages_indexed)?;
        writeln!(f, "  Pages failed: {}", report.pages_failed)?;
        if report.in_flight_at_exit > 0 {
            writeln!(f, "  Pages abandoned: {}", report.in_flight_at_exit)?;
        }
        writeln!(f, "  Links seen: {}", report.links_seen)?;
        writeln!(f, "  Links not followed: {}", report.links_rejected)?;
        writeln!(f, "  Peak job backlog: {}", report.backlog_peak)?;
        writeln!(f, "  Elapsed: {:.2}s", report.elapsed.as_secs_f64())?;
        writeln!(f)?;
        writeln!(f, "Indexed {} unique words.", self.unique_tokens)?;
        writeln!(
            f,
            "Success Rate: {:.1}% ({} / {} pages indexed)",
            self.success_rate(),
            report.pages_indexed,
            report.pages_scheduled
        )
    }
}

/// Gathers statistics from a crawl report and the index it filled
pub fn load_statistics(report: &CrawlReport, index: &InvertedIndex) -> CrawlStatistics {
    CrawlStatistics {
        report: report.clone(),
        unique_tokens: index.len(),
    }
}

/// Renders statistics as the block printed after a crawl
pub fn format_statistics(stats: &CrawlStatistics) -> String {
    stats.to_string()
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    print!("{}", stats);
}
