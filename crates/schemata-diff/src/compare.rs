//! Equality predicates over schema nodes.
//!
//! Neither predicate looks at node ids: two nodes with different identities
//! but the same shape compare equal.

use schemata_tree::{NodeId, NodeKind, SchemaNode, SchemaTree};

/// Compare a node's own attributes: type, metadata, constraints and ref
/// target. Children are not visited.
pub fn are_nodes_content_equal(a: &SchemaNode, b: &SchemaNode) -> bool {
    if a.metadata != b.metadata {
        return false;
    }
    match (&a.kind, &b.kind) {
        (NodeKind::Object { .. }, NodeKind::Object { .. }) => true,
        (NodeKind::Array { .. }, NodeKind::Array { .. }) => true,
        (NodeKind::String(x), NodeKind::String(y)) => x == y,
        (NodeKind::Number(x), NodeKind::Number(y)) => x == y,
        (NodeKind::Boolean(x), NodeKind::Boolean(y)) => x == y,
        (NodeKind::Ref { target: x }, NodeKind::Ref { target: y }) => x == y,
        (
            NodeKind::Object { .. }
            | NodeKind::Array { .. }
            | NodeKind::String(_)
            | NodeKind::Number(_)
            | NodeKind::Boolean(_)
            | NodeKind::Ref { .. },
            _,
        ) => false,
    }
}

/// Deep structural comparison of nodes drawn from two trees.
///
/// Children are resolved in the tree each node belongs to: `a` in `left`,
/// `b` in `right`.
#[derive(Clone, Copy, Debug)]
pub struct NodeComparator<'a> {
    left: &'a SchemaTree,
    right: &'a SchemaTree,
}

impl<'a> NodeComparator<'a> {
    pub fn new(left: &'a SchemaTree, right: &'a SchemaTree) -> Self {
        Self { left, right }
    }

    /// Deep equality: own attributes, then children recursively.
    pub fn nodes_equal(&self, a: &SchemaNode, b: &SchemaNode) -> bool {
        if !are_nodes_content_equal(a, b) {
            return false;
        }
        match (&a.kind, &b.kind) {
            (NodeKind::Object { properties: x }, NodeKind::Object { properties: y }) => {
                x.len() == y.len()
                    && x.iter().all(|(name, child)| {
                        y.get(name)
                            .is_some_and(|other| self.children_equal(child, other))
                    })
            }
            (NodeKind::Array { items: x }, NodeKind::Array { items: y }) => self.children_equal(x, y),
            _ => true,
        }
    }

    /// Deep equality of the two roots.
    pub fn trees_equal(&self) -> bool {
        self.nodes_equal(self.left.root(), self.right.root())
    }

    fn children_equal(&self, a: &NodeId, b: &NodeId) -> bool {
        match (self.left.get(a), self.right.get(b)) {
            (Some(a), Some(b)) => self.nodes_equal(a, b),
            _ => false,
        }
    }
}
