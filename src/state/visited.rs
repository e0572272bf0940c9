//! Run-scoped visited set
//!
//! The set is the only global deduplication point of a crawl. Claiming a URL is a single
//! check-and-insert under one lock, so concurrent branches never fetch the same page twice.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};
use url::Url;

#[derive(Debug, Default)]
struct Inner {
    seen: HashSet<String>,
    order: Vec<String>,
}

/// URLs claimed during a crawl, in claim order
#[derive(Debug, Default)]
pub struct VisitedSet {
    inner: Mutex<Inner>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims a URL
    ///
    /// Returns true if the URL was not visited before and is now claimed by the caller.
    pub fn try_visit(&self, url: &Url) -> bool {
        let mut inner = self.lock();
        if inner.seen.insert(url.as_str().to_string()) {
            inner.order.push(url.as_str().to_string());
            true
        } else {
            false
        }
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.lock().seen.contains(url.as_str())
    }

    pub fn len(&self) -> usize {
        self.lock().order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Visited URLs in the order they were claimed
    pub fn snapshot(&self) -> Vec<String> {
        self.lock().order.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        // the set stays consistent even if a holder panicked mid-insert
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
