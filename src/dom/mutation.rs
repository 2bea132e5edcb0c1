//! Structural change notifications.
//!
//! Observers register a target node and receive a [`MutationRecord`] for
//! every child-list change made to the target or any of its descendants.
//! Records are pushed synchronously at the moment of the change; batching
//! and deferral are up to the sink.

use super::node::NodeId;

/// One child-list change on `target`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord {
    pub target: NodeId,
    pub added_nodes: Vec<NodeId>,
    pub removed_nodes: Vec<NodeId>,
}

/// Receiver side of an observer registration.
pub trait MutationSink {
    /// Deliver a record. Returning `false` tells the document the sink is
    /// gone and the registration can be dropped.
    fn deliver(&self, record: &MutationRecord) -> bool;
}

impl<F> MutationSink for F
where
    F: Fn(&MutationRecord) -> bool,
{
    fn deliver(&self, record: &MutationRecord) -> bool {
        self(record)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(pub(crate) u32);

pub(crate) struct Observer {
    pub id: ObserverId,
    pub target: NodeId,
    pub sink: Box<dyn MutationSink>,
}

#[derive(Default)]
pub(crate) struct ObserverRegistry {
    observers: Vec<Observer>,
    next_id: u32,
}

impl ObserverRegistry {
    pub fn register(&mut self, target: NodeId, sink: Box<dyn MutationSink>) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push(Observer { id, target, sink });
        id
    }

    pub fn unregister(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|o| o.id != id);
        self.observers.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }

    /// Deliver `record` to every observer whose target is in `scope`
    /// (the mutated node followed by its ancestors).
    pub fn notify(&mut self, scope: &[NodeId], record: &MutationRecord) {
        self.observers.retain(|observer| {
            if !scope.contains(&observer.target) {
                return true;
            }
            let alive = observer.sink.deliver(record);
            if !alive {
                log::debug!("Dropping closed mutation observer {:?}", observer.id);
            }
            alive
        });
    }
}
