//! Editing sessions that produce new snapshots.
//!
//! A [`TreeEditor`] owns a mutable copy of the nodes. Its operations keep
//! node identities intact (a moved or renamed node keeps its id), drop whole
//! subtrees on removal, and defer full validation to [`TreeEditor::finish`],
//! which rebuilds the path index and rejects anything that is not a tree.

use std::collections::HashMap;

use schemata_types::{NodeId, PathSegment};

use crate::error::{TreeError, TreeResult};
use crate::node::{NodeKind, NodeMetadata, SchemaNode};
use crate::tree::SchemaTree;

#[derive(Clone, Debug)]
pub struct TreeEditor {
    root: NodeId,
    nodes: HashMap<NodeId, SchemaNode>,
}

impl TreeEditor {
    /// Start a new tree consisting of `root` alone.
    pub fn new(root: SchemaNode) -> Self {
        let id = root.id.clone();
        let mut nodes = HashMap::new();
        nodes.insert(id.clone(), root);
        Self { root: id, nodes }
    }

    /// Start from a copy of an existing snapshot.
    pub fn from_tree(tree: &SchemaTree) -> Self {
        let (root, nodes) = tree.clone().into_parts();
        Self { root, nodes }
    }

    /// Id of the root node being edited.
    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    /// The node as currently edited, if present.
    pub fn get(&self, id: &NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id)
    }

    /// Attach `node` as property `name` of the object `parent`.
    ///
    /// Whatever subtree previously occupied that property is dropped.
    pub fn set_property(
        &mut self,
        parent: &NodeId,
        name: &str,
        node: SchemaNode,
    ) -> TreeResult<&mut Self> {
        self.attach(parent, PathSegment::Property(name.to_string()), node)
    }

    /// Attach `node` as the item schema of the array `parent`.
    pub fn set_items(&mut self, parent: &NodeId, node: SchemaNode) -> TreeResult<&mut Self> {
        self.attach(parent, PathSegment::Items, node)
    }

    /// Detach a node from its parent and drop its whole subtree.
    pub fn remove(&mut self, id: &NodeId) -> TreeResult<&mut Self> {
        if *id == self.root {
            return Err(TreeError::InvalidEdit("cannot remove the root node".into()));
        }
        self.require(id)?;
        self.unlink(id);
        self.drop_subtree(id);
        Ok(self)
    }

    /// Re-attach an existing node as property `name` of `parent`, keeping its id.
    pub fn move_to_property(
        &mut self,
        id: &NodeId,
        parent: &NodeId,
        name: &str,
    ) -> TreeResult<&mut Self> {
        if *id == self.root {
            return Err(TreeError::InvalidEdit("cannot move the root node".into()));
        }
        self.require(id)?;
        if self.is_within(parent, id) {
            return Err(TreeError::InvalidEdit(format!(
                "cannot move {id} inside its own subtree"
            )));
        }
        let segment = PathSegment::Property(name.to_string());
        self.check_slot(parent, &segment)?;
        let occupant = self.require(parent)?.kind.child(&segment).cloned();
        if let Some(occupant) = occupant.filter(|o| o != id) {
            if self.is_within(id, &occupant) {
                return Err(TreeError::InvalidEdit(format!(
                    "cannot move {id} over its own ancestor {occupant}"
                )));
            }
        }
        self.unlink(id);
        self.link(parent, segment, id.clone())
    }

    /// Rename property `from` of `parent` to `to`, keeping the child's id.
    pub fn rename_property(&mut self, parent: &NodeId, from: &str, to: &str) -> TreeResult<&mut Self> {
        let child = match &self.require(parent)?.kind {
            NodeKind::Object { properties } => properties.get(from).cloned(),
            _ => None,
        };
        let Some(child) = child else {
            return Err(TreeError::InvalidEdit(format!(
                "{parent} has no property {from:?}"
            )));
        };
        self.move_to_property(&child, parent, to)
    }

    /// Change a node's descriptive attributes.
    pub fn update_metadata(
        &mut self,
        id: &NodeId,
        update: impl FnOnce(&mut NodeMetadata),
    ) -> TreeResult<&mut Self> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        update(&mut node.metadata);
        Ok(self)
    }

    /// Replace a node's kind, keeping its id and metadata.
    ///
    /// Former children that the new kind no longer references are dropped
    /// together with their subtrees. Children referenced by the new kind must
    /// already exist in the editor.
    pub fn set_kind(&mut self, id: &NodeId, kind: NodeKind) -> TreeResult<&mut Self> {
        let node = self
            .nodes
            .get_mut(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))?;
        let old = std::mem::replace(&mut node.kind, kind);
        let kept: Vec<NodeId> = node.children().into_iter().map(|(_, c)| c.clone()).collect();
        for (_, child) in old.children() {
            if !kept.contains(child) {
                self.drop_subtree(child);
            }
        }
        Ok(self)
    }

    /// Validate and freeze the edited nodes into a new snapshot.
    pub fn finish(self) -> TreeResult<SchemaTree> {
        SchemaTree::from_map(self.root, self.nodes)
    }

    // ---------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------

    fn require(&self, id: &NodeId) -> TreeResult<&SchemaNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    fn attach(&mut self, parent: &NodeId, segment: PathSegment, node: SchemaNode) -> TreeResult<&mut Self> {
        if self.nodes.contains_key(&node.id) {
            return Err(TreeError::DuplicateNode(node.id));
        }
        self.check_slot(parent, &segment)?;
        let id = node.id.clone();
        self.nodes.insert(id.clone(), node);
        self.link(parent, segment, id)
    }

    fn check_slot(&self, parent: &NodeId, segment: &PathSegment) -> TreeResult<()> {
        let parent_node = self.require(parent)?;
        match (&parent_node.kind, segment) {
            (NodeKind::Object { .. }, PathSegment::Property(_))
            | (NodeKind::Array { .. }, PathSegment::Items) => Ok(()),
            (kind, segment) => Err(TreeError::InvalidEdit(format!(
                "cannot attach {segment} to {} node {parent}",
                kind.node_type()
            ))),
        }
    }

    /// Point `parent`'s `segment` at `child`, dropping any previous occupant.
    fn link(&mut self, parent: &NodeId, segment: PathSegment, child: NodeId) -> TreeResult<&mut Self> {
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or_else(|| TreeError::NodeNotFound(parent.clone()))?;
        let previous = match (&mut parent_node.kind, segment) {
            (NodeKind::Object { properties }, PathSegment::Property(name)) => {
                properties.insert(name, child.clone())
            }
            (NodeKind::Array { items }, PathSegment::Items) => {
                Some(std::mem::replace(items, child.clone()))
            }
            (kind, segment) => {
                return Err(TreeError::InvalidEdit(format!(
                    "cannot attach {segment} to {} node {parent}",
                    kind.node_type()
                )))
            }
        };
        if let Some(previous) = previous.filter(|p| *p != child) {
            self.drop_subtree(&previous);
        }
        Ok(self)
    }

    /// Remove the reference to `id` from whichever node holds it.
    ///
    /// An array losing its item schema is left pointing at the removed id;
    /// `finish` reports it unless a new item schema is attached first.
    fn unlink(&mut self, id: &NodeId) {
        for node in self.nodes.values_mut() {
            if let NodeKind::Object { properties } = &mut node.kind {
                properties.retain(|_, child| child != id);
            }
        }
    }

    fn drop_subtree(&mut self, id: &NodeId) {
        let mut stack = vec![id.clone()];
        while let Some(next) = stack.pop() {
            if let Some(node) = self.nodes.remove(&next) {
                stack.extend(node.children().into_iter().map(|(_, c)| c.clone()));
            }
        }
    }

    /// Returns `true` if `id` is `ancestor` or lies beneath it.
    fn is_within(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        let mut stack = vec![ancestor];
        while let Some(next) = stack.pop() {
            if next == id {
                return true;
            }
            if let Some(node) = self.nodes.get(next) {
                stack.extend(node.children().into_iter().map(|(_, c)| c));
            }
        }
        false
    }
}
