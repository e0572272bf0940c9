//! Output file naming
//!
//! Maps a page URL, plus an optional qualifier such as a section heading, to a base file
//! name that is deterministic and safe on common filesystems.

use crate::url::network_location;
use sha2::{Digest, Sha256};
use url::Url;

/// Names longer than this many bytes are truncated and given a hash suffix
pub const MAX_NAME_LEN: usize = 100;

/// Bytes kept from an over-long name before the hash suffix
pub const TRUNCATED_LEN: usize = 50;

/// Hex characters of the URL digest appended to truncated names
pub const HASH_LEN: usize = 10;

/// Characters that are illegal in file names on at least one common platform
const ILLEGAL_CHARS: &[char] = &['\\', '/', '*', '?', ':', '"', '<', '>', '|'];

/// Builds the base file name for a URL
///
/// The name is `host_path` (or just `host` for the site root) where the host loses a
/// leading `www.`, the path loses its surrounding slashes and file extension, illegal
/// characters become `_` and runs of dots or whitespace become `-`. Names over
/// [`MAX_NAME_LEN`] bytes keep their first [`TRUNCATED_LEN`] bytes (cut on a character
/// boundary) followed by `_` and a [`HASH_LEN`]-character SHA-256 prefix of the full URL.
/// A non-empty `suffix` is appended as `_{suffix}`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use sectioncrawl::output::safe_name;
///
/// let url = Url::parse("https://www.example.com/docs/intro.html").unwrap();
/// assert_eq!(safe_name(&url, ""), "example-com_docs_intro");
/// assert_eq!(safe_name(&url, "Setup"), "example-com_docs_intro_Setup");
/// ```
pub fn safe_name(url: &Url, suffix: &str) -> String {
    let netloc = network_location(url);
    let host = netloc.strip_prefix("www.").unwrap_or(&netloc);
    let path = strip_extension(url.path().trim_matches('/'));

    let base = if path.is_empty() {
        host.to_string()
    } else {
        format!("{}_{}", host, path)
    };

    let mut name = sanitize(&base);
    if name.len() > MAX_NAME_LEN {
        name = format!(
            "{}_{}",
            truncate_on_boundary(&name, TRUNCATED_LEN),
            digest(url.as_str())
        );
    }

    if suffix.is_empty() {
        name
    } else {
        format!("{}_{}", name, suffix)
    }
}

/// Builds the file-name qualifier for a section heading
///
/// Illegal characters are dropped, the rest is trimmed and runs of dots or whitespace
/// become `-`. Headings that sanitize to nothing fall back to `section_{ordinal}`.
///
/// Slugs over [`MAX_NAME_LEN`] bytes are shortened the same way as page names, with the
/// digest taken over the heading, so a page name plus slug stays well inside the
/// 255-byte file name limit even for multibyte headings.
pub fn section_slug(heading: &str, ordinal: usize) -> String {
    let kept: String = heading
        .chars()
        .filter(|c| !ILLEGAL_CHARS.contains(c))
        .collect();
    let slug = collapse_separators(kept.trim());

    if slug.is_empty() {
        format!("section_{}", ordinal)
    } else if slug.len() > MAX_NAME_LEN {
        format!("{}_{}", truncate_on_boundary(&slug, TRUNCATED_LEN), digest(heading))
    } else {
        slug
    }
}

/// Short stable hex digest
fn digest(input: &str) -> String {
    let digest = Sha256::digest(input.as_bytes());
    let mut hex = hex::encode(digest);
    hex.truncate(HASH_LEN);
    hex
}

/// Longest prefix of `s` that fits in `max_bytes` without splitting a character
fn truncate_on_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

fn sanitize(raw: &str) -> String {
    let replaced: String = raw
        .chars()
        .map(|c| if ILLEGAL_CHARS.contains(&c) { '_' } else { c })
        .collect();
    collapse_separators(&replaced)
}

/// Replaces every run of dots or whitespace with a single `-`
fn collapse_separators(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut in_run = false;

    for c in raw.chars() {
        if c == '.' || c.is_whitespace() {
            if !in_run {
                out.push('-');
                in_run = true;
            }
        } else {
            out.push(c);
            in_run = false;
        }
    }

    out
}

/// Removes the extension of the last path segment (`a/b.html` -> `a/b`)
///
/// Leading dots of the segment do not start an extension (`a/.hidden` is unchanged).
fn strip_extension(path: &str) -> &str {
    let segment_start = path.rfind('/').map_or(0, |i| i + 1);
    let segment = &path[segment_start..];
    let leading_dots = segment.len() - segment.trim_start_matches('.').len();

    match segment[leading_dots..].rfind('.') {
        Some(dot) => &path[..segment_start + leading_dots + dot],
        None => path,
    }
}
