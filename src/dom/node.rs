//! Node representation.

/// Compact node identifier (index into the document arena).
pub type NodeId = u32;

/// Type of a document node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// Document root
    Document,
    /// Element node
    Element,
    /// Text content
    Text,
    /// Comment
    Comment,
    /// `<!DOCTYPE ...>` declaration
    Doctype,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// A node in the arena.
///
/// `name` holds the lowercase tag for elements and the declaration body for
/// doctypes; `data` holds the payload of text and comment nodes.
#[derive(Debug, Clone)]
pub struct Node {
    pub kind: NodeKind,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub name: String,
    pub attributes: Vec<Attribute>,
    pub data: String,
}

impl Node {
    pub fn document() -> Self {
        Self::bare(NodeKind::Document)
    }

    pub fn element(tag: &str) -> Self {
        Node {
            name: tag.to_ascii_lowercase(),
            ..Self::bare(NodeKind::Element)
        }
    }

    pub fn text(data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Self::bare(NodeKind::Text)
        }
    }

    pub fn comment(data: impl Into<String>) -> Self {
        Node {
            data: data.into(),
            ..Self::bare(NodeKind::Comment)
        }
    }

    pub fn doctype(body: impl Into<String>) -> Self {
        Node {
            name: body.into(),
            ..Self::bare(NodeKind::Doctype)
        }
    }

    fn bare(kind: NodeKind) -> Self {
        Node {
            kind,
            parent: None,
            children: Vec::new(),
            name: String::new(),
            attributes: Vec::new(),
            data: String::new(),
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.kind == NodeKind::Element
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == NodeKind::Text
    }

    /// Whether this node may hold children.
    #[inline]
    pub fn is_container(&self) -> bool {
        matches!(self.kind, NodeKind::Document | NodeKind::Element)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attribute("class")
            .is_some_and(|v| v.split_ascii_whitespace().any(|c| c == class))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_tag_is_lowercased() {
        let elem = Node::element("DIV");
        assert_eq!(elem.kind, NodeKind::Element);
        assert_eq!(elem.name, "div");
        assert!(elem.is_container());
        assert!(elem.parent.is_none());
    }

    #[test]
    fn test_text_node_is_not_container() {
        let text = Node::text("hello");
        assert!(text.is_text());
        assert!(!text.is_container());
        assert_eq!(text.data, "hello");
    }

    #[test]
    fn test_has_class_matches_whole_words() {
        let mut elem = Node::element("span");
        elem.attributes.push(Attribute {
            name: "class".to_string(),
            value: "foo  dlsite-rj-converted\tbar".to_string(),
        });
        assert!(elem.has_class("dlsite-rj-converted"));
        assert!(elem.has_class("bar"));
        assert!(!elem.has_class("dlsite"));
    }
}
