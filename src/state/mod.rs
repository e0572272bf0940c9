//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageStage`: Tracks the stage of an individual page (pending, fetching, parsing, ...)
//! - `VisitedSet`: The run-scoped set of claimed URLs

mod page_stage;
mod visited;

// Re-export main types
pub use page_stage::{PageProgress, PageStage};
pub use visited::VisitedSet;
