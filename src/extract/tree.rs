//! Minimal parse-tree capability interface
//!
//! The content selector, the section segmenter and link resolution only need a handful of
//! queries against a parsed document. They are written against [`HtmlNode`] so that the
//! parser backend can be swapped and so unit tests can run on an in-memory tree.

use scraper::ElementRef;

/// An element handle in a parsed document
///
/// Handles are cheap to copy and borrow from the document they were taken from.
pub trait HtmlNode: Copy {
    /// Lowercase tag name (e.g. `h2`)
    fn tag_name(&self) -> &str;

    /// Value of an attribute, if present
    fn attribute(&self, name: &str) -> Option<&str>;

    /// Concatenated text of this element and all of its descendants
    fn text_content(&self) -> String;

    /// Whether the element has any child node (element or text)
    fn has_child_nodes(&self) -> bool;

    /// Serialized HTML of the element including its own tags
    fn outer_html(&self) -> String;

    /// Next sibling that is an element, skipping text and comment nodes
    fn next_element_sibling(&self) -> Option<Self>;

    /// Descendant elements in document order, excluding `self`
    fn descendant_elements(&self) -> impl Iterator<Item = Self>;

    /// An element without any child node counts as empty
    fn is_empty(&self) -> bool {
        !self.has_child_nodes()
    }

    fn find_by_id(&self, id: &str) -> Option<Self> {
        self.descendant_elements()
            .find(|node| node.attribute("id") == Some(id))
    }

    fn find_by_tag(&self, tag: &str) -> Option<Self> {
        self.descendant_elements()
            .find(|node| node.tag_name().eq_ignore_ascii_case(tag))
    }

    fn find_by_class(&self, class: &str) -> Option<Self> {
        self.descendant_elements().find(|node| {
            node.attribute("class")
                .map_or(false, |classes| classes.split_ascii_whitespace().any(|c| c == class))
        })
    }

    fn find_all_by_tags(&self, tags: &[&str]) -> Vec<Self> {
        self.descendant_elements()
            .filter(|node| tags.iter().any(|tag| node.tag_name().eq_ignore_ascii_case(tag)))
            .collect()
    }

    /// All following element siblings, nearest first
    fn following_element_siblings(&self) -> impl Iterator<Item = Self> {
        std::iter::successors(self.next_element_sibling(), |node| {
            node.next_element_sibling()
        })
    }
}

impl<'a> HtmlNode for ElementRef<'a> {
    fn tag_name(&self) -> &str {
        self.value().name()
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.value().attr(name)
    }

    fn text_content(&self) -> String {
        self.text().collect()
    }

    fn has_child_nodes(&self) -> bool {
        self.has_children()
    }

    fn outer_html(&self) -> String {
        self.html()
    }

    fn next_element_sibling(&self) -> Option<Self> {
        self.next_siblings().find_map(ElementRef::wrap)
    }

    fn descendant_elements(&self) -> impl Iterator<Item = Self> {
        self.descendants().skip(1).filter_map(ElementRef::wrap)
    }
}


#[cfg(test)]
mod tests {
    use super::fake::{FakeTree, ROOT};
    use super::*;
    use scraper::Html;

    #[test]
    fn test_scraper_find_queries() {
        let html = Html::parse_document(
            r#"<html><body><div class="nav primary">n</div><main id="content"><p>x</p></main></body></html>"#,
        );
        let root = html.root_element();

        assert_eq!(root.find_by_id("content").unwrap().tag_name(), "main");
        assert_eq!(root.find_by_tag("MAIN").unwrap().tag_name(), "main");
        assert_eq!(root.find_by_class("primary").unwrap().tag_name(), "div");
        assert!(root.find_by_class("prim").is_none());
        assert!(root.find_by_tag("article").is_none());
    }

    #[test]
    fn test_scraper_next_sibling_skips_text() {
        let html = Html::parse_document("<body><h2>A</h2> text <p>one</p><!-- c --><p>two</p></body>");
        let h2 = html.root_element().find_by_tag("h2").unwrap();

        let siblings: Vec<String> = h2
            .following_element_siblings()
            .map(|node| node.text_content())
            .collect();
        assert_eq!(siblings, vec!["one", "two"]);
    }

    #[test]
    fn test_scraper_is_empty() {
        let html = Html::parse_document("<body><main></main><article> </article></body>");
        let root = html.root_element();

        assert!(root.find_by_tag("main").unwrap().is_empty());
        // whitespace-only text still counts as a child node
        assert!(!root.find_by_tag("article").unwrap().is_empty());
    }

    #[test]
    fn test_find_all_by_tags_document_order() {
        let html = Html::parse_document(
            "<body><h3>a</h3><div><h2>b</h2></div><h4>skip</h4><h2>c</h2></body>",
        );
        let heads: Vec<String> = html
            .root_element()
            .find_all_by_tags(&["h2", "h3"])
            .iter()
            .map(|node| node.text_content())
            .collect();
        assert_eq!(heads, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_fake_tree_matches_interface() {
        let mut tree = FakeTree::new();
        let body = tree.add(ROOT, "body", &[], "");
        let div = tree.add(body, "div", &[("id", "content")], "");
        let h2 = tree.add(div, "h2", &[], "Intro");
        tree.add(div, "p", &[], "x");

        let root = tree.root();
        assert_eq!(root.find_by_id("content").unwrap().index(), div);
        assert_eq!(tree.node(h2).next_element_sibling().unwrap().text_content(), "x");
        assert_eq!(tree.node(div).text_content(), "Introx");
        assert_eq!(
            tree.node(div).outer_html(),
            r#"<div id="content"><h2>Intro</h2><p>x</p></div>"#
        );
    }
}
