//! XML utility functions for navigating element trees.
//!
//! Thin helpers over [`roxmltree`], the external tree parser. The binder
//! only needs tag names, ordered element children, trimmed text content
//! and attribute lookup; everything else stays inside roxmltree.

use roxmltree::Node;

/// Get the tag name without namespace prefix.
///
/// # Examples
/// ```
/// use roxmltree::Document;
/// use xmlbind::xml::get_tag_name;
///
/// let doc = Document::parse("<point><x>3</x></point>").unwrap();
/// assert_eq!(get_tag_name(doc.root_element()), "point");
/// ```
pub fn get_tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

/// Get the text content of a node, trimmed.
///
/// Scalar conversion always operates on this trimmed form.
pub fn get_text(node: Node<'_, '_>) -> String {
    node.text()
        .map(|s| s.trim().to_string())
        .unwrap_or_default()
}

/// Get all element children of a node, in document order.
///
/// Text nodes, comments and processing instructions are filtered out.
pub fn element_children<'a, 'input>(
    node: Node<'a, 'input>,
) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|child| child.is_element())
}

/// Get an attribute value from a node.
///
/// The binder itself never reads attributes, but callers inspecting
/// nodes from a consumer callback may.
pub fn get_attribute<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attribute(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use roxmltree::Document;

    #[test]
    fn test_get_tag_name() {
        let doc = Document::parse("<root><child/></root>").unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_get_tag_name_with_namespace() {
        let xml = r#"<ns:root xmlns:ns="http://example.com"/>"#;
        let doc = Document::parse(xml).unwrap();
        assert_eq!(get_tag_name(doc.root_element()), "root");
    }

    #[test]
    fn test_get_text_trims() {
        let doc = Document::parse("<v>  42  </v>").unwrap();
        assert_eq!(get_text(doc.root_element()), "42");
    }

    #[test]
    fn test_get_text_empty_element() {
        let doc = Document::parse("<v/>").unwrap();
        assert_eq!(get_text(doc.root_element()), "");
    }

    #[test]
    fn test_element_children_skips_text() {
        let doc = Document::parse("<root>text<a/>more<b/></root>").unwrap();
        let children: Vec<_> = element_children(doc.root_element()).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(get_tag_name(children[0]), "a");
        assert_eq!(get_tag_name(children[1]), "b");
    }

    #[test]
    fn test_get_attribute() {
        let doc = Document::parse(r#"<root attr="value"/>"#).unwrap();
        assert_eq!(get_attribute(doc.root_element(), "attr"), Some("value"));
        assert_eq!(get_attribute(doc.root_element(), "missing"), None);
    }
}
