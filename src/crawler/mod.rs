//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - Page parsing into content, sections and links
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;

pub use coordinator::{crawl, Coordinator, CrawlReport};
pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage};
pub use parser::{parse_page, ParsedPage, ParsedSection};
