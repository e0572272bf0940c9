//! Output module for emitted documents
//!
//! This module handles:
//! - Deriving deterministic, filesystem-safe file names from URLs
//! - Laying out markdown documents with their title and source header
//! - Writing documents to disk and recording crawl statistics

mod document;
mod naming;
pub mod stats;
mod writer;

pub use document::MarkdownDocument;
pub use naming::{safe_name, section_slug, HASH_LEN, MAX_NAME_LEN, TRUNCATED_LEN};
pub use stats::{print_statistics, CrawlStatistics, FailureKind};
pub use writer::{DocumentWriter, FsWriter, MemoryWriter};
