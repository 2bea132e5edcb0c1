//! Arena-based mutable document tree.
//!
//! Nodes live in a single arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Nodes are never freed: a removed node simply becomes detached
//! (no parent) and may be inserted again later.

pub mod document;
pub mod html;
pub mod mutation;
pub mod node;

pub use document::{Document, ReadyState};
pub use mutation::{MutationRecord, MutationSink, ObserverId};
pub use node::{Attribute, Node, NodeId, NodeKind};

/// Errors raised by structural tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    /// The id does not refer to a node of this document.
    UnknownNode(NodeId),
    /// The node has no parent, so it cannot be replaced or removed in place.
    Detached(NodeId),
    /// Attributes can only be set on elements.
    NotAnElement(NodeId),
    /// `child` is not a child of `parent`.
    NotAChild { parent: NodeId, child: NodeId },
    /// Inserting `child` under `parent` would create a cycle, or `parent`
    /// cannot hold children.
    HierarchyRequest { parent: NodeId, child: NodeId },
}

impl std::fmt::Display for DomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownNode(id) => write!(f, "unknown node #{}", id),
            Self::Detached(id) => write!(f, "node #{} has no parent", id),
            Self::NotAnElement(id) => write!(f, "node #{} is not an element", id),
            Self::NotAChild { parent, child } => {
                write!(f, "node #{} is not a child of node #{}", child, parent)
            }
            Self::HierarchyRequest { parent, child } => {
                write!(f, "cannot insert node #{} under node #{}", child, parent)
            }
        }
    }
}

impl std::error::Error for DomError {}
