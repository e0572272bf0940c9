//! URL handling module for Sectioncrawl
//!
//! This module provides URL normalization for the visited set, network-location
//! extraction, and the link policy that decides which anchors are followed.

mod domain;
mod normalize;
mod policy;

// Re-export main functions
pub use domain::network_location;
pub use normalize::normalize_url;
pub use policy::{is_external, is_skipped_url, resolve_links, SKIP_PATTERNS};
