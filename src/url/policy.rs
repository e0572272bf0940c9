//! Link scoping and filtering rules
//!
//! Decides which anchors on a page are followed: same-site only unless external links are
//! allowed, and never to session pages or downloadable files.

use crate::extract::HtmlNode;
use crate::url::domain::network_location;
use url::Url;

/// Substrings that mark a URL as not worth following: session and account pages, plus
/// non-document downloads. Matched against the lowercase absolute URL.
pub const SKIP_PATTERNS: &[&str] = &[
    "login", "logout", "signup", "register", "contact", "browse", "zip", "download", "pdf", "doc",
    "xls", "ppt", "docx", "xlsx", "pptx",
];

/// Href prefixes that execute script instead of navigating
const SCRIPT_PREFIXES: &[&str] = &["javascript:", "vbscript:"];

/// Returns true if `candidate` points to a different network location than `base`
///
/// A candidate without its own network location (a relative reference such as
/// `/docs` or `page.html`) is never external.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sectioncrawl::url::is_external;
///
/// let base = Url::parse("https://a.com/x").unwrap();
/// assert!(!is_external(&base, "https://a.com/y"));
/// assert!(is_external(&base, "https://b.com/y"));
/// assert!(!is_external(&base, "/relative"));
/// ```
pub fn is_external(base: &Url, candidate: &str) -> bool {
    let candidate_netloc = match Url::parse(candidate) {
        Ok(url) => network_location(&url),
        // Scheme-relative references (`//host/path`) still name a host
        Err(url::ParseError::RelativeUrlWithoutBase) if candidate.starts_with("//") => base
            .join(candidate)
            .map(|url| network_location(&url))
            .unwrap_or_default(),
        Err(_) => String::new(),
    };

    !candidate_netloc.is_empty() && candidate_netloc != network_location(base)
}

/// Returns true if the absolute URL matches one of [`SKIP_PATTERNS`]
pub fn is_skipped_url(url: &str) -> bool {
    let lowered = url.to_lowercase();
    SKIP_PATTERNS.iter().any(|pattern| lowered.contains(pattern))
}

/// Collects the links to follow from every `<a href>` inside `scope`
///
/// # Link Rules
///
/// **Exclude:**
/// - Empty hrefs and pure fragments (`#section`)
/// - Script hrefs (`javascript:`)
/// - Anything that does not resolve to an http(s) URL (`mailto:`, `tel:`, ...)
/// - External links unless `allow_external` is set
/// - URLs matching [`SKIP_PATTERNS`]
///
/// Document order is preserved and duplicates are kept; deduplication happens against
/// the crawl's visited set.
pub fn resolve_links<N: HtmlNode>(scope: N, base: &Url, allow_external: bool) -> Vec<Url> {
    scope
        .find_all_by_tags(&["a"])
        .into_iter()
        .filter_map(|anchor| anchor.attribute("href").map(str::to_string))
        .filter_map(|href| resolve_link(&href, base, allow_external))
        .collect()
}

/// Applies the link rules to a single href
fn resolve_link(href: &str, base: &Url, allow_external: bool) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SCRIPT_PREFIXES.iter().any(|prefix| lowered.starts_with(prefix)) {
        return None;
    }

    let absolute = base.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    if !allow_external && is_external(base, absolute.as_str()) {
        return None;
    }

    if is_skipped_url(absolute.as_str()) {
        return None;
    }

    Some(absolute)
}
