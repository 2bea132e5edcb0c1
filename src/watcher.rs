//! Live conversion of inserted content.
//!
//! The watcher registers a mutation observer on a target node. Every node
//! reported as added gets its own deferred pass, run on the current
//! [`tokio::task::LocalSet`]. The watcher's own output never cascades: link
//! fragments are inert elements and their containers are marked, so the
//! passes triggered by a conversion find nothing left to do.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::dom::{Document, MutationRecord, NodeId, NodeKind, ObserverId};
use crate::linkify::Linkifier;

/// A document shared between the host and deferred passes.
pub type SharedDocument = Rc<RefCell<Document>>;

/// Handle to an installed watcher.
///
/// Dropping the handle does not stop the watcher; call
/// [`ChangeWatcher::disconnect`] for that.
pub struct ChangeWatcher {
    doc: SharedDocument,
    observer: ObserverId,
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl ChangeWatcher {
    /// Observe `target` and its subtree.
    ///
    /// Must be called from within a [`tokio::task::LocalSet`], while nothing
    /// else borrows `doc`.
    pub fn install(
        doc: SharedDocument,
        target: NodeId,
        linkifier: Rc<Linkifier>,
        delay: Duration,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let observer = doc
            .borrow_mut()
            .observe(target, move |record: &MutationRecord| {
                tx.send(record.clone()).is_ok()
            });
        let cancel = CancellationToken::new();
        let task = tokio::task::spawn_local(watch(
            Rc::clone(&doc),
            rx,
            linkifier,
            delay,
            cancel.clone(),
        ));
        log::debug!("Change watcher installed on node #{}", target);

        Self {
            doc,
            observer,
            cancel,
            task,
        }
    }

    pub fn is_observing(&self) -> bool {
        !self.cancel.is_cancelled() && !self.task.is_finished()
    }

    /// Stop observing and cancel every pass that has not run yet.
    pub fn disconnect(&self) {
        self.cancel.cancel();
        // If the document is borrowed right now, the registration is dropped
        // on the next delivery instead, once the channel is closed.
        if let Ok(mut doc) = self.doc.try_borrow_mut() {
            doc.disconnect(self.observer);
        }
        log::debug!("Change watcher disconnected");
    }
}

async fn watch(
    doc: SharedDocument,
    mut rx: mpsc::UnboundedReceiver<MutationRecord>,
    linkifier: Rc<Linkifier>,
    delay: Duration,
    cancel: CancellationToken,
) {
    loop {
        let first = tokio::select! {
            _ = cancel.cancelled() => break,
            record = rx.recv() => match record {
                Some(record) => record,
                None => break,
            },
        };

        // Everything already queued belongs to the same batch.
        let mut batch = vec![first];
        while let Ok(record) = rx.try_recv() {
            batch.push(record);
        }

        for record in batch {
            for node in record.added_nodes {
                let kind = doc.try_borrow().ok().and_then(|d| d.kind(node));
                if !matches!(kind, Some(NodeKind::Comment | NodeKind::Doctype)) {
                    schedule_pass(&doc, &linkifier, node, delay, &cancel);
                }
            }
        }
    }
    log::debug!("Change watcher stopped");
}

fn schedule_pass(
    doc: &SharedDocument,
    linkifier: &Rc<Linkifier>,
    node: NodeId,
    delay: Duration,
    cancel: &CancellationToken,
) {
    let doc = Rc::clone(doc);
    let linkifier = Rc::clone(linkifier);
    let cancel = cancel.clone();
    tokio::task::spawn_local(async move {
        tokio::select! {
            _ = cancel.cancelled() => return,
            _ = tokio::time::sleep(delay) => {}
        }
        let Ok(mut doc) = doc.try_borrow_mut() else {
            log::error!("Document is busy; skipping pass over node #{}", node);
            return;
        };
        linkifier.process_subtree(&mut doc, node);
    });
}
