//! Visited-set bookkeeping for the crawl
//!
//! The frontier decides whether a discovered link becomes a new job. It is
//! owned by the coordinator task alone, so it needs no locking.

use std::collections::HashSet;

/// Tracks every URL admitted to the job stream
///
/// A URL is recorded the moment it is admitted, before it is fetched. This is
/// what keeps a URL from being scheduled twice while its result is still in
/// flight, and it also means URLs whose fetch later fails still count toward
/// the page budget.
#[derive(Debug)]
pub struct Frontier {
    visited: HashSet<String>,
    page_budget: usize,
    target_domain: String,
}

/// Why `consider` turned a link away
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Already admitted earlier in this crawl
    AlreadyVisited,
    /// Does not start with the target domain prefix
    OffDomain,
}

impl Frontier {
    /// Creates an empty frontier
    ///
    /// `target_domain` is compared as a literal string prefix, not by host:
    /// with a target of `https://go.dev`, the link `http://go.dev/doc` is
    /// off-domain and `https://go.dev.example.com/` is on-domain.
    pub fn new(page_budget: usize, target_domain: impl Into<String>) -> Self {
        Self {
            visited: HashSet::new(),
            page_budget,
            target_domain: target_domain.into(),
        }
    }

    /// Admits the seed URL unconditionally
    ///
    /// Returns false if it was already present.
    pub fn seed(&mut self, url: &str) -> bool {
        self.visited.insert(url.to_string())
    }

    /// Returns true once the number of admitted URLs has reached the budget
    pub fn budget_reached(&self) -> bool {
        self.visited.len() >= self.page_budget
    }

    /// Decides whether `link` becomes a new job, recording it if so
    pub fn consider(&mut self, link: &str) -> Result<(), Rejection> {
        if self.visited.contains(link) {
            return Err(Rejection::AlreadyVisited);
        }

        if !self.is_on_domain(link) {
            return Err(Rejection::OffDomain);
        }

        self.visited.insert(link.to_string());
        Ok(())
    }

    /// Literal prefix match against the target domain
    pub fn is_on_domain(&self, link: &str) -> bool {
        link.starts_with(&self.target_domain)
    }

    /// Number of URLs admitted so far
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn contains(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    pub fn page_budget(&self) -> usize {
        self.page_budget
    }
}
