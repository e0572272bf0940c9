//! Heading-driven section segmentation
//!
//! Every `<h2>`/`<h3>` inside the content region opens a section that runs over the
//! heading's following element siblings up to the next `<h2>`/`<h3>` sibling. Only
//! immediate siblings are walked; a heading nested inside a sibling container does not
//! end the span.

use crate::extract::tree::HtmlNode;

/// Heading tags that open a section
pub const SECTION_TAGS: &[&str] = &["h2", "h3"];

/// Section titles that are boilerplate rather than content (prefix match, case-sensitive)
pub const SKIP_SECTIONS: &[&str] = &[
    "References",
    "See also",
    "External links",
    "Notes",
    "Bibliography",
    "Comments",
    "Related",
    "Share",
    "Tags",
];

/// A heading and the sibling nodes that belong to it
#[derive(Debug, Clone)]
pub struct Section<N> {
    /// Trimmed heading text
    pub heading: String,

    /// Heading depth, 2 or 3
    pub level: u8,

    /// Position of the heading among all `<h2>`/`<h3>` candidates of the region
    pub ordinal: usize,

    /// Sibling elements between this heading and the next one, exclusive of both
    pub body: Vec<N>,
}

impl<N: HtmlNode> Section<N> {
    /// Serialized HTML of the section body
    pub fn body_html(&self) -> String {
        self.body.iter().map(HtmlNode::outer_html).collect()
    }
}

/// Returns true if a section with this heading is left out of the output
pub fn is_skipped_heading(heading: &str) -> bool {
    SKIP_SECTIONS.iter().any(|skip| heading.starts_with(skip))
}

/// Splits a content region into sections
///
/// Headings with empty text, headings on the skip list and headings with no following
/// content are dropped without producing a section.
pub fn segment<N: HtmlNode>(content: N) -> Vec<Section<N>> {
    let mut sections = Vec::new();

    for (ordinal, head) in content.find_all_by_tags(SECTION_TAGS).into_iter().enumerate() {
        let heading = head.text_content().trim().to_string();
        if heading.is_empty() {
            continue;
        }

        if is_skipped_heading(&heading) {
            tracing::trace!("Skipping boilerplate section: {}", heading);
            continue;
        }

        let body: Vec<N> = head
            .following_element_siblings()
            .take_while(|node| !is_section_tag(node.tag_name()))
            .collect();

        if body.is_empty() {
            tracing::trace!("Section has no content: {}", heading);
            continue;
        }

        sections.push(Section {
            heading,
            level: heading_level(head.tag_name()),
            ordinal,
            body,
        });
    }

    sections
}

fn is_section_tag(tag: &str) -> bool {
    SECTION_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t))
}

fn heading_level(tag: &str) -> u8 {
    if tag.eq_ignore_ascii_case("h2") {
        2
    } else {
        3
    }
}
