use crate::dom::{Document, NodeId, html};

use super::matcher::TokenMatcher;

/// Why a text node was not converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// Not a text node.
    NotText,
    /// Content is empty or whitespace only.
    Blank,
    /// Content contains no token.
    NoToken,
    /// The node has no container.
    Detached,
    /// The container already carries the conversion marker.
    AlreadyConverted,
    /// The container is an element whose text must stay inert.
    InertContainer(String),
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotText => write!(f, "not a text node"),
            Self::Blank => write!(f, "whitespace only"),
            Self::NoToken => write!(f, "no token"),
            Self::Detached => write!(f, "detached"),
            Self::AlreadyConverted => write!(f, "container already converted"),
            Self::InertContainer(tag) => write!(f, "inside <{}>", tag),
        }
    }
}

/// Decides, at conversion time, whether a text node may be converted.
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    marker: String,
    inert_tags: Vec<String>,
}

impl EligibilityFilter {
    pub fn new<I, S>(marker: impl Into<String>, inert_tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            marker: marker.into(),
            inert_tags: inert_tags
                .into_iter()
                .map(|t| t.as_ref().to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn is_inert_tag(&self, tag: &str) -> bool {
        self.inert_tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }

    /// Returns the container of `node` when it may be converted.
    ///
    /// Checks run cheapest first: token presence, then container,
    /// then marker, then container tag.
    pub fn check(
        &self,
        doc: &Document,
        matcher: &TokenMatcher,
        node: NodeId,
    ) -> Result<NodeId, Rejection> {
        let text = doc.text(node).ok_or(Rejection::NotText)?;
        if text.trim().is_empty() {
            return Err(Rejection::Blank);
        }
        if !matcher.contains_token(text) {
            return Err(Rejection::NoToken);
        }
        let container = doc.parent(node).ok_or(Rejection::Detached)?;
        if !self.marker.is_empty() && doc.has_class(container, &self.marker) {
            return Err(Rejection::AlreadyConverted);
        }
        // Raw-text content cannot hold elements, whatever the configuration.
        if let Some(tag) = doc.tag_name(container)
            && (self.is_inert_tag(tag) || html::is_raw_text_element(tag))
        {
            return Err(Rejection::InertContainer(tag.to_string()));
        }
        Ok(container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> EligibilityFilter {
        EligibilityFilter::new("dlsite-rj-converted", ["A", "SCRIPT", "STYLE", "NOSCRIPT"])
    }

    fn text_in(doc: &mut Document, tag: &str, text: &str) -> (NodeId, NodeId) {
        let el = doc.create_element(tag);
        doc.append_child(Document::ROOT, el).unwrap();
        let t = doc.create_text(text);
        doc.append_child(el, t).unwrap();
        (el, t)
    }

    #[test]
    fn accepts_plain_container() {
        let mut doc = Document::new();
        let (p, t) = text_in(&mut doc, "p", "see RJ123456");
        assert_eq!(filter().check(&doc, &TokenMatcher::default(), t), Ok(p));
    }

    #[test]
    fn rejects_text_without_token_first() {
        let mut doc = Document::new();
        let t = doc.create_text("nothing here");
        assert_eq!(
            filter().check(&doc, &TokenMatcher::default(), t),
            Err(Rejection::NoToken)
        );
    }

    #[test]
    fn rejects_detached_text() {
        let mut doc = Document::new();
        let t = doc.create_text("RJ123456");
        assert_eq!(
            filter().check(&doc, &TokenMatcher::default(), t),
            Err(Rejection::Detached)
        );
    }

    #[test]
    fn rejects_marked_container() {
        let mut doc = Document::new();
        let (p, t) = text_in(&mut doc, "div", "visit RJ999999");
        doc.add_class(p, "dlsite-rj-converted").unwrap();
        assert_eq!(
            filter().check(&doc, &TokenMatcher::default(), t),
            Err(Rejection::AlreadyConverted)
        );
    }

    #[test]
    fn rejects_inert_containers_case_insensitively() {
        for tag in ["a", "script", "style", "noscript"] {
            let mut doc = Document::new();
            let (_, t) = text_in(&mut doc, tag, "RJ123456");
            assert_eq!(
                filter().check(&doc, &TokenMatcher::default(), t),
                Err(Rejection::InertContainer(tag.to_string())),
                "<{tag}> should be inert"
            );
        }
    }

    #[test]
    fn raw_text_containers_are_inert_even_when_not_configured() {
        let empty = EligibilityFilter::new("dlsite-rj-converted", Vec::<String>::new());
        for tag in ["textarea", "title"] {
            let mut doc = Document::new();
            let (_, t) = text_in(&mut doc, tag, "RJ123456");
            assert_eq!(
                empty.check(&doc, &TokenMatcher::default(), t),
                Err(Rejection::InertContainer(tag.to_string())),
                "<{tag}> should be inert"
            );
        }
    }

    #[test]
    fn only_the_immediate_container_counts() {
        let mut doc = Document::new();
        let (a, _) = text_in(&mut doc, "a", "");
        let span = doc.create_element("span");
        doc.append_child(a, span).unwrap();
        let t = doc.create_text("RJ123456");
        doc.append_child(span, t).unwrap();
        assert_eq!(filter().check(&doc, &TokenMatcher::default(), t), Ok(span));
    }

    #[test]
    fn rejects_non_text_and_blank() {
        let mut doc = Document::new();
        let (p, _) = text_in(&mut doc, "p", "RJ123456");
        let blank = doc.create_text("  \n ");
        doc.append_child(p, blank).unwrap();
        let m = TokenMatcher::default();
        assert_eq!(filter().check(&doc, &m, p), Err(Rejection::NotText));
        assert_eq!(filter().check(&doc, &m, blank), Err(Rejection::Blank));
    }
}
