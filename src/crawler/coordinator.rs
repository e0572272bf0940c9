//! Crawler coordinator - main crawl orchestration logic
//!
//! A crawl is a depth-first recursion from the seed page. For every page the coordinator:
//! - Claims the URL in the visited set (the only global deduplication point)
//! - Fetches the page under the fetch semaphore, honoring cancellation
//! - Writes the main content and every section as markdown documents
//! - Recurses into the page's links while the depth limit allows
//!
//! Sibling links are crawled one at a time unless `max-concurrent-fetches` is raised.
//! A failure ends only the branch of the page it happened on.

use crate::config::{validate, validate_seed_url, Config};
use crate::crawler::fetcher::{build_http_client, fetch_url, FetchedPage};
use crate::crawler::parser::{parse_page, ParsedPage};
use crate::output::{
    safe_name, section_slug, CrawlStatistics, DocumentWriter, FsWriter, MarkdownDocument,
};
use crate::state::{PageProgress, VisitedSet};
use crate::url::normalize_url;
use crate::CrawlError;
use futures::future::{BoxFuture, FutureExt};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use url::Url;

/// Summary of a finished crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Counters collected during the run
    pub statistics: CrawlStatistics,

    /// Every claimed URL, in claim order
    pub visited: Vec<String>,
}

impl CrawlReport {
    pub fn pages_visited(&self) -> u64 {
        self.statistics.pages_visited
    }

    pub fn pages_saved(&self) -> u64 {
        self.statistics.pages_saved
    }

    pub fn sections_saved(&self) -> u64 {
        self.statistics.sections_saved
    }
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    client: Client,
    writer: Arc<dyn DocumentWriter>,
    visited: VisitedSet,
    statistics: Mutex<CrawlStatistics>,
    fetch_permits: Semaphore,
    cancel: CancellationToken,
}

impl Coordinator {
    /// Creates a coordinator that writes into the configured output directory
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, CrawlError> {
        let writer = Arc::new(FsWriter::new(&config.output.directory));
        Self::with_writer(config, writer)
    }

    /// Creates a coordinator that hands its documents to `writer`
    pub fn with_writer(config: Config, writer: Arc<dyn DocumentWriter>) -> Result<Self, CrawlError> {
        validate(&config)?;
        let client = build_http_client(&config)?;
        let permits = config.crawler.max_concurrent_fetches as usize;

        Ok(Self {
            config: Arc::new(config),
            client,
            writer,
            visited: VisitedSet::new(),
            statistics: Mutex::new(CrawlStatistics::new()),
            fetch_permits: Semaphore::new(permits),
            cancel: CancellationToken::new(),
        })
    }

    /// Replaces the coordinator's cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Token that stops the crawl when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Crawls from `seed` and returns the run report
    ///
    /// Only an invalid seed URL is an error; page-level failures are counted in the report.
    pub async fn run(&self, seed: &str) -> Result<CrawlReport, CrawlError> {
        let seed = validate_seed_url(seed)?;
        let seed = normalize_url(seed.as_str())?;

        tracing::info!(
            "Starting crawl of {} (max depth: {}, output: {})",
            seed,
            self.config.crawler.max_depth,
            self.config.output.directory
        );
        let start_time = std::time::Instant::now();

        self.crawl(seed, 0).await;

        let report = self.report();
        tracing::info!(
            "Crawl completed: {} pages visited, {} saved in {:?}",
            report.pages_visited(),
            report.pages_saved(),
            start_time.elapsed()
        );

        Ok(report)
    }

    /// Current report
    pub fn report(&self) -> CrawlReport {
        CrawlReport {
            statistics: self.with_statistics(|stats| stats.clone()),
            visited: self.visited.snapshot(),
        }
    }

    /// Crawls one page and, depth permitting, everything reachable from it
    pub fn crawl<'a>(&'a self, url: Url, depth: u32) -> BoxFuture<'a, ()> {
        async move {
            if !self.visited.try_visit(&url) {
                tracing::trace!("Already visited: {}", url);
                return;
            }
            self.with_statistics(|stats| stats.pages_visited += 1);

            let mut progress = PageProgress::new(url.as_str(), depth);
            match self.process_page(&url, depth, &mut progress).await {
                Ok(links) => {
                    if !links.is_empty() {
                        progress.advance();
                        let limit = self.config.crawler.max_concurrent_fetches as usize;
                        stream::iter(links)
                            .for_each_concurrent(limit, |link| self.crawl(link, depth + 1))
                            .await;
                    }
                    tracing::info!("Completed page: {}", url);
                }
                Err(e) => {
                    if matches!(e, CrawlError::Cancelled { .. }) {
                        tracing::debug!("{}", e);
                    } else if e.is_branch_terminal() {
                        tracing::warn!("{}", e);
                    } else {
                        tracing::error!("Unexpected error on {}: {}", url, e);
                    }
                    self.with_statistics(|stats| stats.record_failure(&e));
                }
            }
            progress.finish();
        }
        .boxed()
    }

    /// Fetches, parses and emits a page; returns the links to recurse into
    async fn process_page(
        &self,
        url: &Url,
        depth: u32,
        progress: &mut PageProgress,
    ) -> Result<Vec<Url>, CrawlError> {
        if self.cancel.is_cancelled() {
            return Err(CrawlError::Cancelled {
                url: url.to_string(),
            });
        }

        tracing::info!("Fetching {}... (depth: {})", url, depth);
        progress.advance();
        let fetched = self.fetch(url).await?;

        progress.advance();
        // relative links resolve against where the redirects ended
        let link_base = Url::parse(&fetched.final_url)?;
        let collect_links = depth < self.config.crawler.max_depth;
        let page = parse_page(
            &fetched.body,
            url,
            &link_base,
            self.config.crawler.allow_external,
            collect_links,
            progress,
        )?;

        progress.advance();
        self.emit(url, &page)?;

        if !collect_links {
            return Ok(Vec::new());
        }

        progress.advance();
        let links = page
            .links
            .iter()
            .filter_map(|link| normalize_url(link.as_str()).ok())
            .filter(|link| !self.visited.contains(link))
            .collect();

        Ok(links)
    }

    /// Fetches a page while holding a fetch permit
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let cancelled = || CrawlError::Cancelled {
            url: url.to_string(),
        };

        let _permit = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(cancelled()),
            permit = self.fetch_permits.acquire() => permit.map_err(|_| cancelled())?,
        };

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(cancelled()),
            result = fetch_url(&self.client, url.as_str()) => result.into_page(url.as_str()),
        }
    }

    /// Writes the main content document and one document per section
    ///
    /// Only a failed main document is returned. A section that cannot be written is
    /// counted and skipped.
    fn emit(&self, url: &Url, page: &ParsedPage) -> Result<(), CrawlError> {
        let main_name = format!("{}.md", safe_name(url, ""));
        let document = MarkdownDocument::new(&page.title, url.as_str(), page.markdown.clone());
        self.writer.write(&main_name, &document.render())?;
        self.with_statistics(|stats| stats.pages_saved += 1);
        tracing::info!("Saved main content: {}", main_name);

        for section in &page.sections {
            let slug = section_slug(&section.heading, section.ordinal);
            let section_name = format!("{}.md", safe_name(url, &slug));
            let document =
                MarkdownDocument::new(&section.heading, url.as_str(), section.markdown.clone());
            match self.writer.write(&section_name, &document.render()) {
                Ok(_) => {
                    self.with_statistics(|stats| stats.sections_saved += 1);
                    tracing::info!("Saved section: {}", section_name);
                }
                Err(e) => {
                    tracing::warn!("Skipping section '{}' of {}: {}", section.heading, url, e);
                    self.with_statistics(|stats| stats.record_failure(&e));
                }
            }
        }

        Ok(())
    }

    fn with_statistics<T>(&self, f: impl FnOnce(&mut CrawlStatistics) -> T) -> T {
        let mut stats = self
            .statistics
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut stats)
    }
}

/// Runs a complete crawl operation
///
/// # Arguments
///
/// * `config` - The crawl configuration
/// * `seed` - Absolute http(s) URL the crawl starts from
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished; page failures are counted, not returned
/// * `Err(CrawlError)` - Invalid configuration or seed URL
///
/// # Example
///
/// ```no_run
/// use sectioncrawl::config::Config;
/// use sectioncrawl::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let mut config = Config::default();
/// config.crawler.max_depth = 1;
/// let report = crawl(config, "https://example.com/").await?;
/// println!("{} pages saved", report.pages_saved());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: Config, seed: &str) -> Result<CrawlReport, CrawlError> {
    Coordinator::new(config)?.run(seed).await
}
