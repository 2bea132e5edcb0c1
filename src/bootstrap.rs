//! Initial pass and watcher installation.

use std::rc::Rc;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::config::{Config, Delays};
use crate::dom::ReadyState;
use crate::linkify::Linkifier;
use crate::watcher::{ChangeWatcher, SharedDocument};

async fn wait_until_ready(doc: &SharedDocument) -> bool {
    let rx = {
        let Ok(mut doc) = doc.try_borrow_mut() else {
            log::error!("Document is busy; cannot wait for it to become ready");
            return false;
        };
        if doc.ready_state() != ReadyState::Loading {
            return true;
        }
        let (tx, rx) = oneshot::channel();
        doc.add_ready_listener(move || {
            let _ = tx.send(());
        });
        rx
    };
    if rx.await.is_err() {
        log::warn!("Ready listener dropped before the document became ready");
        return false;
    }
    true
}

/// Wait for the document to be ready, wait the initial delay, convert the
/// page and start watching `<body>`.
///
/// Returns `None` if the document never becomes ready, has no body, or is
/// borrowed elsewhere when the pass is due.
pub async fn bootstrap(
    doc: SharedDocument,
    linkifier: Rc<Linkifier>,
    delays: Delays,
) -> Option<ChangeWatcher> {
    if !wait_until_ready(&doc).await {
        return None;
    }
    tokio::time::sleep(delays.initial()).await;

    let body = {
        let Ok(mut doc) = doc.try_borrow_mut() else {
            log::error!("Document is busy; skipping the initial page pass");
            return None;
        };
        linkifier.process_page(&mut doc);
        doc.body()?
    };
    Some(ChangeWatcher::install(
        doc,
        body,
        linkifier,
        delays.mutation(),
    ))
}

/// Spawn [`bootstrap`] on the current [`tokio::task::LocalSet`].
pub fn start(
    doc: SharedDocument,
    config: &Config,
) -> Result<JoinHandle<Option<ChangeWatcher>>, regex::Error> {
    let linkifier = Rc::new(Linkifier::new(config)?);
    let delays = config.delays.clone();
    Ok(tokio::task::spawn_local(bootstrap(doc, linkifier, delays)))
}
