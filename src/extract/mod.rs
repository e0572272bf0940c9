//! Content extraction for crawled pages
//!
//! This module contains everything that looks inside a parsed page:
//! - A small capability interface over the parse tree
//! - Main-content and link-scope selection
//! - Section segmentation at heading boundaries
//! - HTML to markdown conversion

mod convert;
mod segment;
mod selector;
mod tree;

pub use convert::html_to_markdown;
pub use segment::{is_skipped_heading, segment, Section, SECTION_TAGS, SKIP_SECTIONS};
pub use selector::{extract_title, select_link_scope, select_main_content, UNTITLED};
pub use tree::HtmlNode;
