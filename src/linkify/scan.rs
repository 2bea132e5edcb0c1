//! Read-only token listing.

use serde::Serialize;

use crate::dom::{Document, NodeId};

use super::Linkifier;
use super::walker::collect_text_nodes;

/// A token found in a document's text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenHit {
    pub token: String,
    pub url: String,
    /// Tags of the enclosing elements, outermost first, e.g. `html > body > p`.
    pub path: String,
    /// Why the token would be left alone, if it would.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<String>,
}

/// Tags of the elements enclosing `node`, outermost first.
pub fn element_path(doc: &Document, node: NodeId) -> String {
    let mut tags: Vec<&str> = doc
        .ancestors(node)
        .into_iter()
        .filter_map(|id| doc.tag_name(id))
        .collect();
    tags.reverse();
    tags.join(" > ")
}

impl Linkifier {
    /// Every token in the text under `root`, in document order, with the
    /// verdict a conversion pass would reach. The document is not changed.
    pub fn find_tokens(&self, doc: &Document, root: NodeId) -> Vec<TokenHit> {
        let Ok(nodes) = collect_text_nodes(doc, root) else {
            return Vec::new();
        };
        let mut hits = Vec::new();
        for node in nodes {
            let Some(text) = doc.text(node) else {
                continue;
            };
            let skipped = self
                .filter
                .check(doc, &self.matcher, node)
                .err()
                .map(|reason| reason.to_string());
            let path = element_path(doc, node);
            for m in self.matcher.find_iter(text) {
                hits.push(TokenHit {
                    token: m.token.to_string(),
                    url: self.builder.url_for(m.token),
                    path: path.clone(),
                    skipped: skipped.clone(),
                });
            }
        }
        hits
    }

    /// Tokens in `<body>`, the part of the page a page pass converts.
    /// Returns `None` if there is no body.
    pub fn find_page_tokens(&self, doc: &Document) -> Option<Vec<TokenHit>> {
        let body = doc.body()?;
        Some(self.find_tokens(doc, body))
    }
}
