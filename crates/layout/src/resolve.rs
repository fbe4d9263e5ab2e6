//! Deferred binding of ids to pages.
//!
//! Nodes live in an arena owned by the registry and refer to each other by
//! [`NodeId`]. A node waits for its own id (if any) plus every id its
//! descendants wait for; ids are propagated up the ancestor chain when a
//! child is attached, never discovered later by scanning. A registered
//! container completes once nothing below it waits any more, and every node
//! is reported through [`ResolveRegistry::drain_completed`] at most once.

use crate::LayoutError;
use folio_types::AnchorId;
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

/// A located page: its position in the document and its formatted number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRef {
    pub index: usize,
    pub number: String,
}

impl PageRef {
    pub fn new(index: usize, number: impl Into<String>) -> Self {
        Self { index, number: number.into() }
    }
}

/// The capability set of content that waits for ids.
pub trait Resolvable {
    /// Ids still waiting for a target.
    fn ids(&self) -> Vec<AnchorId>;

    /// Binds `id` to `targets`. The first target is the one that counts;
    /// an empty list resolves the id without a destination. Ids that are
    /// not pending are ignored.
    fn resolve(&mut self, id: &AnchorId, targets: &[PageRef]);

    fn is_resolved(&self) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0)
    }
}

#[derive(Debug, Default)]
struct ResolvableNode {
    ref_id: Option<AnchorId>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    /// Pending id -> nodes (this one or descendants) bound by it.
    pending: BTreeMap<AnchorId, Vec<NodeId>>,
    target: Option<PageRef>,
    bound: bool,
    registered: bool,
    notified: bool,
}

#[derive(Debug, Default)]
pub struct ResolveRegistry {
    nodes: Vec<ResolvableNode>,
    /// Pending id -> registered containers waiting for it.
    waiting: BTreeMap<AnchorId, Vec<NodeId>>,
    completed: Vec<NodeId>,
}

impl ResolveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detached node. `ref_id` is the id the node itself waits
    /// for; containers pass `None`.
    pub fn create(&mut self, ref_id: Option<AnchorId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = ResolvableNode { ref_id: ref_id.clone(), ..Default::default() };
        if let Some(ref_id) = ref_id {
            node.pending.insert(ref_id, vec![id]);
        }
        self.nodes.push(node);
        id
    }

    /// Attaches `child` below `parent`, propagating the child's pending ids
    /// to every ancestor.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), LayoutError> {
        self.check(parent)?;
        self.check(child)?;
        if parent == child || self.nodes[child.0].parent.is_some() || self.nodes[child.0].registered {
            return Err(LayoutError::Registry(format!("{} cannot be attached to {}", child, parent)));
        }
        if self.nodes[parent.0].notified {
            return Err(LayoutError::Registry(format!("{} already completed", parent)));
        }

        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);

        let inherited: Vec<(AnchorId, Vec<NodeId>)> = self.nodes[child.0]
            .pending
            .iter()
            .map(|(id, nodes)| (id.clone(), nodes.clone()))
            .collect();
        let mut current = Some(parent);
        let mut root = parent;
        while let Some(node) = current {
            for (id, bound) in &inherited {
                self.nodes[node.0].pending.entry(id.clone()).or_default().extend(bound);
            }
            root = node;
            current = self.nodes[node.0].parent;
        }

        if self.nodes[root.0].registered {
            for (id, _) in inherited {
                self.wait_for(id, root);
            }
        }
        Ok(())
    }

    /// Registers a top-level container. Its pending ids become resolvable
    /// through [`ResolveRegistry::resolve`]; a container with nothing
    /// pending completes immediately.
    pub fn register(&mut self, node: NodeId) -> Result<(), LayoutError> {
        self.check(node)?;
        if self.nodes[node.0].parent.is_some() {
            return Err(LayoutError::Registry(format!("{} is not a top-level node", node)));
        }
        if self.nodes[node.0].registered {
            return Ok(());
        }
        self.nodes[node.0].registered = true;
        let ids: Vec<AnchorId> = self.nodes[node.0].pending.keys().cloned().collect();
        for id in ids {
            self.wait_for(id, node);
        }
        self.check_finish(node);
        Ok(())
    }

    /// Binds `id` for every registered container waiting on it.
    pub fn resolve(&mut self, id: &AnchorId, targets: &[PageRef]) {
        let Some(roots) = self.waiting.remove(id) else {
            trace!("Ignoring resolution of '{}': nothing is waiting for it", id);
            return;
        };
        for root in roots {
            self.resolve_in(root, id, targets);
        }
    }

    /// Binds `id` inside the tree of one registered container only. Used
    /// for ids that were already located when the container was
    /// registered.
    pub fn resolve_node(&mut self, node: NodeId, id: &AnchorId, targets: &[PageRef]) {
        if node.0 >= self.nodes.len() {
            return;
        }
        let root = self.root_of(node);
        if let Some(roots) = self.waiting.get_mut(id) {
            roots.retain(|r| *r != root);
            if roots.is_empty() {
                self.waiting.remove(id);
            }
        }
        self.resolve_in(root, id, targets);
    }

    fn resolve_in(&mut self, root: NodeId, id: &AnchorId, targets: &[PageRef]) {
        let Some(bound) = self.nodes[root.0].pending.remove(id) else {
            return;
        };
        for &node in &bound {
            let entry = &mut self.nodes[node.0];
            if entry.ref_id.as_ref() == Some(id) && !entry.bound {
                entry.bound = true;
                entry.target = targets.first().cloned();
                if entry.target.is_none() {
                    debug!("{} resolved without a target for '{}'", node, id);
                }
            }
            let mut current = Some(node);
            while let Some(n) = current {
                if n == root {
                    break;
                }
                self.nodes[n.0].pending.remove(id);
                current = self.nodes[n.0].parent;
            }
        }
        for node in bound {
            self.check_finish(node);
        }
    }

    /// Walks from `node` to its root, reporting every node that has
    /// nothing pending and was not reported before.
    fn check_finish(&mut self, node: NodeId) {
        if !self.nodes[self.root_of(node).0].registered {
            return;
        }
        let mut current = Some(node);
        while let Some(n) = current {
            if !self.nodes[n.0].pending.is_empty() {
                break;
            }
            self.notify_subtree(n);
            current = self.nodes[n.0].parent;
        }
    }

    fn notify_subtree(&mut self, node: NodeId) {
        if self.nodes[node.0].notified {
            return;
        }
        let children = self.nodes[node.0].children.clone();
        for child in children {
            self.notify_subtree(child);
        }
        self.nodes[node.0].notified = true;
        self.completed.push(node);
    }

    fn wait_for(&mut self, id: AnchorId, root: NodeId) {
        let roots = self.waiting.entry(id).or_default();
        if !roots.contains(&root) {
            roots.push(root);
        }
    }

    fn root_of(&self, mut node: NodeId) -> NodeId {
        while let Some(parent) = self.nodes[node.0].parent {
            node = parent;
        }
        node
    }

    fn check(&self, node: NodeId) -> Result<(), LayoutError> {
        if node.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(LayoutError::Registry(format!("unknown {}", node)))
        }
    }

    /// Nodes completed since the last call, children before their parents.
    pub fn drain_completed(&mut self) -> Vec<NodeId> {
        std::mem::take(&mut self.completed)
    }

    pub fn is_resolved(&self, node: NodeId) -> bool {
        self.nodes.get(node.0).is_some_and(|n| n.pending.is_empty())
    }

    /// The page a node's own id was bound to. `None` while pending and for
    /// ids resolved without a target.
    pub fn target(&self, node: NodeId) -> Option<&PageRef> {
        self.nodes.get(node.0).and_then(|n| n.target.as_ref())
    }

    pub fn ref_id(&self, node: NodeId) -> Option<&AnchorId> {
        self.nodes.get(node.0).and_then(|n| n.ref_id.as_ref())
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        self.nodes.get(node.0).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Ids the node (or its descendants) still waits for.
    pub fn pending_ids(&self, node: NodeId) -> Vec<AnchorId> {
        self.nodes
            .get(node.0)
            .map(|n| n.pending.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Every id some registered container still waits for.
    pub fn waiting_ids(&self) -> Vec<AnchorId> {
        self.waiting.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(index: usize) -> PageRef {
        PageRef::new(index, (index + 1).to_string())
    }

    #[test]
    fn test_first_target_wins() {
        let mut registry = ResolveRegistry::new();
        let node = registry.create(Some("a".into()));
        registry.register(node).unwrap();
        registry.resolve(&"a".into(), &[page(2), page(5)]);
        assert_eq!(registry.target(node), Some(&page(2)));
        assert_eq!(registry.drain_completed(), vec![node]);
    }

    #[test]
    fn test_empty_targets_resolve_without_destination() {
        let mut registry = ResolveRegistry::new();
        let node = registry.create(Some("ghost".into()));
        registry.register(node).unwrap();
        registry.resolve(&"ghost".into(), &[]);
        assert!(registry.is_resolved(node));
        assert_eq!(registry.target(node), None);
    }

    #[test]
    fn test_unknown_id_is_a_no_op() {
        let mut registry = ResolveRegistry::new();
        let node = registry.create(Some("a".into()));
        registry.register(node).unwrap();
        registry.resolve(&"b".into(), &[page(0)]);
        assert!(!registry.is_resolved(node));
        assert!(registry.drain_completed().is_empty());
    }

    #[test]
    fn test_empty_container_completes_on_register() {
        let mut registry = ResolveRegistry::new();
        let root = registry.create(None);
        registry.register(root).unwrap();
        assert_eq!(registry.drain_completed(), vec![root]);
    }

    #[test]
    fn test_attach_to_completed_container_fails() {
        let mut registry = ResolveRegistry::new();
        let root = registry.create(None);
        registry.register(root).unwrap();
        let child = registry.create(Some("late".into()));
        assert!(matches!(registry.add_child(root, child), Err(LayoutError::Registry(_))));
    }
}
