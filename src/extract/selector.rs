//! Content region selection
//!
//! Pages rarely agree on where their content lives, so selection walks a fixed chain of
//! common containers from most to least specific and takes the first non-empty match.

use crate::extract::tree::HtmlNode;

/// Title used when a page has neither a `<title>` nor an `<h1>`
pub const UNTITLED: &str = "Untitled";

/// Selects the main content region of a document
///
/// Candidates, in order: element with id `content`, first `<main>`, first `<article>`,
/// first element with class `content`, `<body>`. A candidate only counts if it has at
/// least one child node.
///
/// Returns `None` when no candidate exists, which callers report as "no content found".
pub fn select_main_content<N: HtmlNode>(root: N) -> Option<N> {
    non_empty(root.find_by_id("content"))
        .or_else(|| non_empty(root.find_by_tag("main")))
        .or_else(|| non_empty(root.find_by_tag("article")))
        .or_else(|| non_empty(root.find_by_class("content")))
        .or_else(|| non_empty(root.find_by_tag("body")))
}

/// Selects the region links are collected from: `<main>`, `<article>`, then `<body>`
///
/// `None` means the page contributes no links; it is not an error.
pub fn select_link_scope<N: HtmlNode>(root: N) -> Option<N> {
    non_empty(root.find_by_tag("main"))
        .or_else(|| non_empty(root.find_by_tag("article")))
        .or_else(|| non_empty(root.find_by_tag("body")))
}

/// Extracts the page title: first `<title>`, else first `<h1>`, else [`UNTITLED`]
pub fn extract_title<N: HtmlNode>(root: N) -> String {
    non_empty(root.find_by_tag("title"))
        .or_else(|| non_empty(root.find_by_tag("h1")))
        .map(|node| node.text_content().trim().to_string())
        .filter(|title| !title.is_empty())
        .unwrap_or_else(|| UNTITLED.to_string())
}

fn non_empty<N: HtmlNode>(candidate: Option<N>) -> Option<N> {
    candidate.filter(|node| !node.is_empty())
}
