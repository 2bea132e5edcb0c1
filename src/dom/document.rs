//! Mutable document arena.

use super::DomError;
use super::mutation::{MutationRecord, MutationSink, ObserverId, ObserverRegistry};
use super::node::{Attribute, Node, NodeId, NodeKind};

/// Loading phase of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReadyState {
    #[default]
    Loading,
    Interactive,
    Complete,
}

type ReadyListener = Box<dyn FnOnce()>;

/// A mutable document stored in arena format.
///
/// Node `0` is always the document root.
pub struct Document {
    nodes: Vec<Node>,
    ready_state: ReadyState,
    ready_listeners: Vec<ReadyListener>,
    observers: ObserverRegistry,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("nodes", &self.nodes.len())
            .field("ready_state", &self.ready_state)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Document {
    pub const ROOT: NodeId = 0;

    /// Create an empty document in the `Loading` state.
    pub fn new() -> Self {
        Document {
            nodes: vec![Node::document()],
            ready_state: ReadyState::Loading,
            ready_listeners: Vec::new(),
            observers: ObserverRegistry::default(),
        }
    }

    pub fn root(&self) -> NodeId {
        Self::ROOT
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, DomError> {
        self.nodes.get_mut(id as usize).ok_or(DomError::UnknownNode(id))
    }

    fn get(&self, id: NodeId) -> Result<&Node, DomError> {
        self.node(id).ok_or(DomError::UnknownNode(id))
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        id
    }

    // ===== Construction =====

    /// Append a newly built node under `parent` without validation or change
    /// notification. Only for building a tree from scratch.
    pub(crate) fn append_fresh(&mut self, parent: NodeId, mut node: Node) -> NodeId {
        let has_parent = self.node(parent).is_some();
        node.parent = has_parent.then_some(parent);
        let id = self.alloc(node);
        if let Some(p) = self.nodes.get_mut(parent as usize) {
            p.children.push(id);
        }
        id
    }

    pub(crate) fn append_text_data(&mut self, id: NodeId, data: &str) {
        if let Some(node) = self.nodes.get_mut(id as usize)
            && node.is_text()
        {
            node.data.push_str(data);
        }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.alloc(Node::element(tag))
    }

    pub fn create_text(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(Node::text(data))
    }

    pub fn create_comment(&mut self, data: impl Into<String>) -> NodeId {
        self.alloc(Node::comment(data))
    }

    pub fn create_doctype(&mut self, body: impl Into<String>) -> NodeId {
        self.alloc(Node::doctype(body))
    }

    // ===== Queries =====

    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.node(id).map(|n| n.kind)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.is_element())
            .map(|n| n.name.as_str())
    }

    /// Payload of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id)
            .filter(|n| n.is_text())
            .map(|n| n.data.as_str())
    }

    /// Concatenated text of all text descendants, in document order.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id).and_then(|n| n.attribute(name))
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.node(id).is_some_and(|n| n.has_class(class))
    }

    /// `id` followed by all of its descendants in document (pre-)order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        if self.node(id).is_none() {
            return out;
        }
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.children(current).iter().rev());
        }
        out
    }

    /// `id` followed by its ancestors up to the root of its tree.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.node(id).map(|_| id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Whether `id` is connected to the document root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        self.ancestors(id).last() == Some(&Self::ROOT)
    }

    /// First element with the given tag, in document order.
    pub fn find_element(&self, tag: &str) -> Option<NodeId> {
        self.descendants(Self::ROOT)
            .into_iter()
            .find(|&id| {
                self.tag_name(id)
                    .is_some_and(|t| t.eq_ignore_ascii_case(tag))
            })
    }

    pub fn body(&self) -> Option<NodeId> {
        self.find_element("body")
    }

    // ===== Attributes =====

    pub fn set_attribute(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        let node = self.node_mut(id)?;
        if !node.is_element() {
            return Err(DomError::NotAnElement(id));
        }
        let value = value.into();
        match node
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(attr) => attr.value = value,
            None => node.attributes.push(Attribute {
                name: name.to_ascii_lowercase(),
                value,
            }),
        }
        Ok(())
    }

    /// Add `class` to the element's class list if not already present.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        if self.has_class(id, class) {
            return Ok(());
        }
        let value = match self.attribute(id, "class") {
            Some(existing) if !existing.trim().is_empty() => {
                format!("{} {}", existing.trim(), class)
            }
            _ => class.to_string(),
        };
        self.set_attribute(id, "class", value)
    }

    // ===== Structural mutation =====

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let index = self.get(parent)?.children.len();
        self.insert_at(parent, index, &[child])
    }

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        let index = match reference {
            Some(r) => self.index_of(parent, r)?,
            None => self.get(parent)?.children.len(),
        };
        self.insert_at(parent, index, &[child])
    }

    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let index = self.index_of(parent, child)?;
        self.node_mut(parent)?.children.remove(index);
        self.node_mut(child)?.parent = None;
        self.notify(MutationRecord {
            target: parent,
            added_nodes: Vec::new(),
            removed_nodes: vec![child],
        });
        Ok(())
    }

    /// Replace `old` in its parent with `replacements`, in order, as one
    /// change. Fails with [`DomError::Detached`] if `old` has no parent.
    pub fn replace_with(&mut self, old: NodeId, replacements: &[NodeId]) -> Result<(), DomError> {
        let parent = self.get(old)?.parent.ok_or(DomError::Detached(old))?;
        for &child in replacements {
            self.check_insertable(parent, child)?;
            if child == old {
                return Err(DomError::HierarchyRequest { parent, child });
            }
        }
        for &child in replacements {
            self.detach(child)?;
        }
        let index = self.index_of(parent, old)?;
        let node = self.node_mut(parent)?;
        node.children.splice(index..=index, replacements.iter().copied());
        self.node_mut(old)?.parent = None;
        for &child in replacements {
            self.node_mut(child)?.parent = Some(parent);
        }
        self.notify(MutationRecord {
            target: parent,
            added_nodes: replacements.to_vec(),
            removed_nodes: vec![old],
        });
        Ok(())
    }

    fn insert_at(
        &mut self,
        parent: NodeId,
        index: usize,
        children: &[NodeId],
    ) -> Result<(), DomError> {
        for &child in children {
            self.check_insertable(parent, child)?;
        }
        let mut index = index;
        for &child in children {
            // Moving a child forward within the same parent shifts the slot.
            if self.parent(child) == Some(parent) && self.index_of(parent, child)? < index {
                index -= 1;
            }
            self.detach(child)?;
        }
        let node = self.node_mut(parent)?;
        let index = index.min(node.children.len());
        node.children.splice(index..index, children.iter().copied());
        for &child in children {
            self.node_mut(child)?.parent = Some(parent);
        }
        self.notify(MutationRecord {
            target: parent,
            added_nodes: children.to_vec(),
            removed_nodes: Vec::new(),
        });
        Ok(())
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let parent_node = self.get(parent)?;
        let child_node = self.get(child)?;
        if !parent_node.is_container()
            || child_node.kind == NodeKind::Document
            || self.ancestors(parent).contains(&child)
        {
            return Err(DomError::HierarchyRequest { parent, child });
        }
        Ok(())
    }

    fn detach(&mut self, child: NodeId) -> Result<(), DomError> {
        if let Some(old_parent) = self.get(child)?.parent {
            self.remove_child(old_parent, child)?;
        }
        Ok(())
    }

    fn index_of(&self, parent: NodeId, child: NodeId) -> Result<usize, DomError> {
        self.get(parent)?
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(DomError::NotAChild { parent, child })
    }

    // ===== Observation =====

    /// Register `sink` for child-list changes on `target` and its subtree.
    pub fn observe(&mut self, target: NodeId, sink: impl MutationSink + 'static) -> ObserverId {
        log::debug!("Observing structural changes under node #{}", target);
        self.observers.register(target, Box::new(sink))
    }

    pub fn disconnect(&mut self, id: ObserverId) -> bool {
        self.observers.unregister(id)
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn notify(&mut self, record: MutationRecord) {
        if self.observers.is_empty() {
            return;
        }
        let scope = self.ancestors(record.target);
        self.observers.notify(&scope, &record);
    }

    // ===== Ready state =====

    pub fn ready_state(&self) -> ReadyState {
        self.ready_state
    }

    /// Advance the ready state. Leaving `Loading` fires every pending
    /// ready listener exactly once.
    pub fn set_ready_state(&mut self, state: ReadyState) {
        let was_loading = self.ready_state == ReadyState::Loading;
        self.ready_state = state;
        if was_loading && state != ReadyState::Loading {
            log::debug!("Document ready ({:?})", state);
            for listener in std::mem::take(&mut self.ready_listeners) {
                listener();
            }
        }
    }

    /// Run `listener` once the document leaves `Loading`. Listeners added
    /// after that point never fire; check [`Document::ready_state`] first.
    pub fn add_ready_listener(&mut self, listener: impl FnOnce() + 'static) {
        self.ready_listeners.push(Box::new(listener));
    }
}
