//! Markdown document layout
//!
//! Every emitted file starts with the same header:
//!
//! ```text
//! # {title}
//!
//! Source: {url}
//!
//! {body}
//! ```

/// A page or section ready to be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownDocument {
    /// Page title or section heading, on a single line
    pub title: String,

    /// URL the content was taken from
    pub source: String,

    /// Converted markdown body
    pub body: String,
}

impl MarkdownDocument {
    /// Creates a document; whitespace inside the title is collapsed so the header stays
    /// on one line
    pub fn new(title: &str, source: &str, body: String) -> Self {
        Self {
            title: title.split_whitespace().collect::<Vec<_>>().join(" "),
            source: source.to_string(),
            body,
        }
    }

    /// Renders the document with its header
    pub fn render(&self) -> String {
        format!("# {}\n\nSource: {}\n\n{}", self.title, self.source, self.body)
    }

    /// Reads a rendered document back, returning `None` if the header is malformed
    pub fn parse(content: &str) -> Option<Self> {
        let rest = content.strip_prefix("# ")?;
        let (title, rest) = rest.split_once("\n\n")?;
        let rest = rest.strip_prefix("Source: ")?;
        let (source, body) = rest.split_once("\n\n")?;

        Some(Self {
            title: title.to_string(),
            source: source.to_string(),
            body: body.to_string(),
        })
    }
}
