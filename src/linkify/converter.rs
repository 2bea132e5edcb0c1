//! Splitting a single text node into text and link fragments.

use crate::dom::{Document, DomError, NodeId};

use super::Linkifier;
use super::eligibility::Rejection;
use super::matcher::TokenMatcher;

/// A piece of a scanned string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'t> {
    Text(&'t str),
    Token(&'t str),
}

impl<'t> Segment<'t> {
    pub fn as_str(&self) -> &'t str {
        match self {
            Segment::Text(s) | Segment::Token(s) => s,
        }
    }
}

/// Split `text` into plain-text gaps and tokens. Empty gaps are omitted, so
/// concatenating the segments always yields `text` again.
pub fn split_text<'t>(matcher: &TokenMatcher, text: &'t str) -> Vec<Segment<'t>> {
    let mut segments = Vec::new();
    let mut last = 0;
    for m in matcher.find_iter(text) {
        if m.start > last {
            segments.push(Segment::Text(&text[last..m.start]));
        }
        segments.push(Segment::Token(m.token));
        last = m.end;
    }
    if last < text.len() {
        segments.push(Segment::Text(&text[last..]));
    }
    segments
}

/// Outcome of converting one text node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Conversion {
    /// The node was replaced by `fragments` inside `container`.
    Converted {
        container: NodeId,
        fragments: Vec<NodeId>,
        links: usize,
    },
    /// The eligibility filter turned the node down; nothing changed.
    Skipped(Rejection),
    /// The tree changed under us or a fragment could not be built; the node
    /// was left as it was.
    Failed(DomError),
}

impl Linkifier {
    /// Convert one text node and mark its container as converted.
    ///
    /// A rejected node is a no-op. Replacement failures are logged and
    /// reported, never propagated.
    pub fn convert_text_node(&self, doc: &mut Document, node: NodeId) -> Conversion {
        let outcome = self.replace_text_node(doc, node);
        if let Conversion::Converted { container, .. } = &outcome {
            self.mark_converted(doc, *container);
        }
        outcome
    }

    /// Replace `node` by its fragments without marking the container.
    pub(crate) fn replace_text_node(&self, doc: &mut Document, node: NodeId) -> Conversion {
        if let Err(reason) = self.filter.check(doc, &self.matcher, node) {
            log::trace!("Skipping text node #{}: {}", node, reason);
            return Conversion::Skipped(reason);
        }
        self.substitute(doc, node)
    }

    /// Build the fragments for `node` and put them in its place. The caller
    /// has already run the eligibility check.
    pub(crate) fn substitute(&self, doc: &mut Document, node: NodeId) -> Conversion {
        let text = doc.text(node).unwrap_or_default().to_string();
        let mut fragments = Vec::new();
        let mut links = 0;
        for segment in split_text(&self.matcher, &text) {
            let fragment = match segment {
                Segment::Text(s) => doc.create_text(s),
                Segment::Token(token) => match self.builder.build(doc, token) {
                    Ok(link) => {
                        links += 1;
                        link
                    }
                    Err(e) => {
                        log::error!("Failed to build link for {}: {}", token, e);
                        return Conversion::Failed(e);
                    }
                },
            };
            fragments.push(fragment);
        }

        // replace_with resolves the container again and fails on a node that
        // has been detached since the check.
        match doc.replace_with(node, &fragments) {
            Ok(()) => {
                let container = fragments
                    .first()
                    .and_then(|&f| doc.parent(f))
                    .unwrap_or(Document::ROOT);
                log::debug!(
                    "Converted {} token(s) in text node #{} under node #{}",
                    links,
                    node,
                    container
                );
                Conversion::Converted {
                    container,
                    fragments,
                    links,
                }
            }
            Err(e) => {
                log::error!("Could not replace text node #{}: {}; skipping", node, e);
                Conversion::Failed(e)
            }
        }
    }

    /// Put the conversion marker on `container` if it is an element.
    pub(crate) fn mark_converted(&self, doc: &mut Document, container: NodeId) {
        let marker = self.filter.marker();
        if marker.is_empty() || doc.tag_name(container).is_none() {
            return;
        }
        if let Err(e) = doc.add_class(container, marker) {
            log::error!("Could not mark node #{} as converted: {}", container, e);
        }
    }
}
