//! HTML to markdown conversion
//!
//! Links, images and tables are kept in the markdown output.

/// Converts an HTML fragment to markdown
pub fn html_to_markdown(html: &str) -> String {
    html2md::parse_html(html)
}
