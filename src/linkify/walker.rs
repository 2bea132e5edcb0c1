//! Subtree passes.

use crate::dom::{Document, DomError, NodeId};

use super::Linkifier;
use super::converter::Conversion;

/// Summary of one pass over a subtree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PassReport {
    /// Non-blank text nodes visited.
    pub candidates: usize,
    /// Text nodes replaced by fragments.
    pub converted: usize,
    /// Links inserted.
    pub links: usize,
    /// Text nodes turned down by the eligibility filter.
    pub skipped: usize,
    /// Text nodes left alone because replacement failed.
    pub failed: usize,
}

/// All non-blank text nodes under `root` (including `root` itself when it
/// is a text node), in document order.
pub fn collect_text_nodes(doc: &Document, root: NodeId) -> Result<Vec<NodeId>, DomError> {
    if doc.node(root).is_none() {
        return Err(DomError::UnknownNode(root));
    }
    let nodes = doc
        .descendants(root)
        .into_iter()
        .filter(|&id| doc.text(id).is_some_and(|t| !t.trim().is_empty()))
        .collect();
    Ok(nodes)
}

impl Linkifier {
    /// Convert every eligible text node under `root`.
    ///
    /// Errors are logged and end the pass early; they never reach the
    /// caller.
    pub fn process_subtree(&self, doc: &mut Document, root: NodeId) -> PassReport {
        match self.try_process_subtree(doc, root) {
            Ok(report) => report,
            Err(e) => {
                log::error!("Text node pass over node #{} aborted: {}", root, e);
                PassReport::default()
            }
        }
    }

    /// Like [`Linkifier::process_subtree`], but reports traversal errors.
    ///
    /// Nodes are converted in reverse document order so replacing one node
    /// never moves a node that is still to be visited. Containers are marked
    /// once the whole pass is done, which lets a container holding several
    /// text nodes have all of them converted.
    pub fn try_process_subtree(
        &self,
        doc: &mut Document,
        root: NodeId,
    ) -> Result<PassReport, DomError> {
        let nodes = collect_text_nodes(doc, root)?;
        let mut report = PassReport {
            candidates: nodes.len(),
            ..PassReport::default()
        };
        let mut containers: Vec<NodeId> = Vec::new();

        for &node in nodes.iter().rev() {
            match self.replace_text_node(doc, node) {
                Conversion::Converted {
                    container, links, ..
                } => {
                    report.converted += 1;
                    report.links += links;
                    if !containers.contains(&container) {
                        containers.push(container);
                    }
                }
                Conversion::Skipped(_) => report.skipped += 1,
                Conversion::Failed(_) => report.failed += 1,
            }
        }

        for container in containers {
            self.mark_converted(doc, container);
        }

        if report.links > 0 {
            log::debug!(
                "Pass over node #{}: {} link(s) in {} of {} text node(s)",
                root,
                report.links,
                report.converted,
                report.candidates
            );
        }
        Ok(report)
    }

    /// Full-document pass over `<body>`, which is marked afterwards.
    ///
    /// Returns `None` (and logs a warning) when the document has no body.
    pub fn process_page(&self, doc: &mut Document) -> Option<PassReport> {
        let Some(body) = doc.body() else {
            log::warn!("Document has no <body>; nothing to convert");
            return None;
        };
        let report = self.process_subtree(doc, body);
        self.mark_converted(doc, body);
        log::info!(
            "Converted {} token(s) in {} text node(s)",
            report.links,
            report.converted
        );
        Some(report)
    }
}
