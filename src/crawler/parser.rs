//! Page parser
//!
//! Turns a fetched HTML body into everything the crawler needs from it:
//! - Page title
//! - Main content converted to markdown
//! - Sections converted to markdown
//! - Links to follow (absolute, filtered)
//!
//! `scraper::Html` is not `Send`, so the whole parse happens synchronously here and only
//! owned data leaves this module.

use crate::extract::{
    extract_title, html_to_markdown, segment, select_link_scope, select_main_content, HtmlNode,
};
use crate::state::PageProgress;
use crate::url::resolve_links;
use crate::CrawlError;
use scraper::Html;
use url::Url;

/// A section ready to be emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSection {
    /// Trimmed heading text
    pub heading: String,

    /// Position of the heading among all section headings of the page
    pub ordinal: usize,

    /// Section body as markdown
    pub markdown: String,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Page title, `Untitled` if the page has none
    pub title: String,

    /// Main content as markdown
    pub markdown: String,

    /// Non-empty, non-boilerplate sections in document order
    pub sections: Vec<ParsedSection>,

    /// Links to follow, in document order (duplicates kept)
    pub links: Vec<Url>,
}

/// Parses a page body
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - URL the page was requested with (used in errors)
/// * `link_base` - URL relative links are resolved against (the final URL after redirects)
/// * `allow_external` - Whether links to other hosts are kept
/// * `collect_links` - Whether links are extracted at all
/// * `progress` - Stage tracker of the page
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(CrawlError::NoContentFound)` - No main content region was found
///
/// # Example
///
/// ```
/// use sectioncrawl::crawler::parse_page;
/// use sectioncrawl::state::PageProgress;
/// use url::Url;
///
/// let html = r#"<html><head><title>Test</title></head>
///     <body><main><h2>Intro</h2><p>Hello</p><a href="/next">Next</a></main></body></html>"#;
/// let url = Url::parse("https://example.com/").unwrap();
/// let mut progress = PageProgress::new(url.as_str(), 0);
/// let page = parse_page(html, &url, &url, false, true, &mut progress).unwrap();
///
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.sections[0].heading, "Intro");
/// assert_eq!(page.links[0].as_str(), "https://example.com/next");
/// ```
pub fn parse_page(
    html: &str,
    page_url: &Url,
    link_base: &Url,
    allow_external: bool,
    collect_links: bool,
    progress: &mut PageProgress,
) -> Result<ParsedPage, CrawlError> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let content = select_main_content(root).ok_or_else(|| CrawlError::NoContentFound {
        url: page_url.to_string(),
    })?;

    progress.advance();
    let title = extract_title(root);
    let markdown = html_to_markdown(&content.outer_html());

    let sections = segment(content)
        .into_iter()
        .map(|section| ParsedSection {
            markdown: html_to_markdown(&section.body_html()),
            heading: section.heading,
            ordinal: section.ordinal,
        })
        .collect();

    let links = if collect_links {
        select_link_scope(root)
            .map(|scope| resolve_links(scope, link_base, allow_external))
            .unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(ParsedPage {
        title,
        markdown,
        sections,
        links,
    })
}
