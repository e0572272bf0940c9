//! Crawl statistics
//!
//! Counters collected while a crawl runs and the end-of-run summary printed by the CLI.

use crate::CrawlError;
use std::collections::HashMap;
use std::fmt;

/// Category of a branch-terminal failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Network error, non-success status or non-HTML response
    Fetch,
    /// No main content region was found
    NoContent,
    /// A document could not be written
    Write,
    /// The crawl was cancelled before the page was fetched
    Cancelled,
    /// Anything else
    Other,
}

impl FailureKind {
    /// All kinds in display order
    pub fn all() -> &'static [FailureKind] {
        &[
            FailureKind::Fetch,
            FailureKind::NoContent,
            FailureKind::Write,
            FailureKind::Cancelled,
            FailureKind::Other,
        ]
    }
}

impl From<&CrawlError> for FailureKind {
    fn from(err: &CrawlError) -> Self {
        match err {
            CrawlError::Fetch { .. } | CrawlError::Reqwest(_) => FailureKind::Fetch,
            CrawlError::NoContentFound { .. } => FailureKind::NoContent,
            CrawlError::Write { .. } | CrawlError::Io(_) => FailureKind::Write,
            CrawlError::Cancelled { .. } => FailureKind::Cancelled,
            _ => FailureKind::Other,
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FailureKind::Fetch => "fetch failed",
            FailureKind::NoContent => "no content found",
            FailureKind::Write => "write failed",
            FailureKind::Cancelled => "cancelled",
            FailureKind::Other => "other",
        };
        f.write_str(label)
    }
}

/// Crawl statistics summary
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlStatistics {
    /// Pages claimed in the visited set
    pub pages_visited: u64,

    /// Main-content documents written
    pub pages_saved: u64,

    /// Section documents written
    pub sections_saved: u64,

    /// Branch-terminal failures by kind
    pub failures: HashMap<FailureKind, u64>,
}

impl CrawlStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a failure that ended one page's branch
    pub fn record_failure(&mut self, err: &CrawlError) {
        *self.failures.entry(FailureKind::from(err)).or_insert(0) += 1;
    }

    /// Total number of failed pages
    pub fn total_failures(&self) -> u64 {
        self.failures.values().sum()
    }

    /// Failures of one kind
    pub fn failures_of(&self, kind: FailureKind) -> u64 {
        self.failures.get(&kind).copied().unwrap_or(0)
    }
}

/// Prints statistics to stdout in a formatted manner
///
/// # Arguments
///
/// * `stats` - The statistics to display
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages visited: {}", stats.pages_visited);
    println!("  Pages saved: {}", stats.pages_saved);
    println!("  Sections saved: {}", stats.sections_saved);
    println!();

    if !stats.failures.is_empty() {
        println!("Failures:");
        for kind in FailureKind::all() {
            let count = stats.failures_of(*kind);
            if count > 0 {
                println!("  {}: {}", kind, count);
            }
        }
        println!();
    }

    let success_rate = if stats.pages_visited > 0 {
        (stats.pages_saved as f64 / stats.pages_visited as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} pages saved)",
        success_rate, stats.pages_saved, stats.pages_visited
    );
}
