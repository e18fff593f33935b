//! The immutable schema tree snapshot.
//!
//! [`SchemaTree`] owns its nodes and its [`NodePathIndex`]. It has no
//! mutating methods: [`SchemaTree::edit`] hands out a [`TreeEditor`] over a
//! copy, and `Clone` yields a deep, independent snapshot that a diff can hold
//! while the original keeps evolving elsewhere.
//!
//! # Invariants
//!
//! - Every node id appears exactly once and is reachable from the root.
//! - The index holds exactly the paths reachable from the root, so
//!   `node_at(path_of(id)) == node_by_id(id)`.

use std::collections::HashMap;

use tracing::debug;

use schemata_types::{NodeId, Path, PathSegment};

use crate::editor::TreeEditor;
use crate::error::{TreeError, TreeResult};
use crate::index::NodePathIndex;
use crate::node::SchemaNode;

#[derive(Clone, Debug)]
pub struct SchemaTree {
    root: NodeId,
    nodes: HashMap<NodeId, SchemaNode>,
    index: NodePathIndex,
}

impl SchemaTree {
    /// Build a snapshot from a root id and the full set of nodes.
    ///
    /// Fails on duplicate ids and on any structural violation reported by
    /// [`NodePathIndex::build`].
    pub fn new(root: impl Into<NodeId>, nodes: impl IntoIterator<Item = SchemaNode>) -> TreeResult<Self> {
        let root = root.into();
        let mut map = HashMap::new();
        for node in nodes {
            if map.contains_key(&node.id) {
                return Err(TreeError::DuplicateNode(node.id));
            }
            map.insert(node.id.clone(), node);
        }
        Self::from_map(root, map)
    }

    pub(crate) fn from_map(root: NodeId, nodes: HashMap<NodeId, SchemaNode>) -> TreeResult<Self> {
        let index = NodePathIndex::build(&root, &nodes)?;
        debug!(root = %root.short_id(), nodes = nodes.len(), "built schema tree snapshot");
        Ok(Self { root, nodes, index })
    }

    /// The root node.
    pub fn root(&self) -> &SchemaNode {
        // The index build rejected trees without their root.
        &self.nodes[&self.root]
    }

    pub fn root_id(&self) -> &NodeId {
        &self.root
    }

    /// Look up a node by id.
    pub fn node_by_id(&self, id: &NodeId) -> TreeResult<&SchemaNode> {
        self.nodes
            .get(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    /// Presence check that never fails.
    pub fn get(&self, id: &NodeId) -> Option<&SchemaNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Resolve a path by walking its segments from the root.
    pub fn node_at(&self, path: &Path) -> TreeResult<&SchemaNode> {
        let mut node = self.root();
        for segment in path.segments() {
            node = node
                .kind
                .child(segment)
                .and_then(|id| self.nodes.get(id))
                .ok_or_else(|| TreeError::PathNotFound(path.clone()))?;
        }
        Ok(node)
    }

    /// The materialized path of a node.
    pub fn path_of(&self, id: &NodeId) -> TreeResult<&Path> {
        self.index
            .path_of(id)
            .ok_or_else(|| TreeError::NodeNotFound(id.clone()))
    }

    /// The parent id, or `None` for the root and unknown ids.
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.index.parent_of(id)
    }

    /// The segment under which a node hangs from its parent.
    pub fn segment_of(&self, id: &NodeId) -> Option<&PathSegment> {
        self.index.path_of(id).and_then(Path::last)
    }

    /// All node ids in pre-order.
    ///
    /// The iterator is lazy and can be restarted by calling this again; the
    /// order is stable for the lifetime of the snapshot.
    pub fn node_ids(&self) -> std::slice::Iter<'_, NodeId> {
        self.index.ids()
    }

    /// All nodes in pre-order.
    pub fn nodes(&self) -> impl Iterator<Item = &SchemaNode> + '_ {
        self.node_ids().filter_map(|id| self.nodes.get(id))
    }

    pub fn count_nodes(&self) -> usize {
        self.index.len()
    }

    pub fn index(&self) -> &NodePathIndex {
        &self.index
    }

    /// Start an editing session over a copy of this snapshot.
    pub fn edit(&self) -> TreeEditor {
        TreeEditor::from_tree(self)
    }

    pub(crate) fn into_parts(self) -> (NodeId, HashMap<NodeId, SchemaNode>) {
        (self.root, self.nodes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SchemaTree {
        SchemaTree::new(
            "root",
            vec![
                SchemaNode::object("root", [("name", "name"), ("address", "address"), ("tags", "tags")]),
                SchemaNode::string("name"),
                SchemaNode::object("address", [("city", "city")]),
                SchemaNode::string("city"),
                SchemaNode::array("tags", "tag"),
                SchemaNode::string("tag"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn root_and_lookup() {
        let tree = profile();
        assert_eq!(tree.root().id, NodeId::from("root"));
        assert_eq!(tree.node_by_id(&"city".into()).unwrap().id, NodeId::from("city"));
        assert!(tree.node_by_id(&"ghost".into()).unwrap_err().is_not_found());
    }

    #[test]
    fn node_at_and_path_of_are_inverse() {
        let tree = profile();
        for id in tree.node_ids() {
            let path = tree.path_of(id).unwrap();
            assert_eq!(&tree.node_at(path).unwrap().id, id);
        }
    }

    #[test]
    fn node_at_reports_missing_segments() {
        let tree = profile();
        let missing = [
            Path::root().property("nope"),
            Path::root().property("name").property("x"),
            Path::root().property("address").items(),
            Path::root().property("tags").property("0"),
        ];
        for path in missing {
            assert_eq!(tree.node_at(&path).unwrap_err(), TreeError::PathNotFound(path.clone()));
        }
    }

    #[test]
    fn path_of_unknown_id_is_not_found() {
        let tree = profile();
        assert_eq!(
            tree.path_of(&"ghost".into()).unwrap_err(),
            TreeError::NodeNotFound("ghost".into())
        );
    }

    #[test]
    fn node_ids_is_restartable_and_counted() {
        let tree = profile();
        let first: Vec<_> = tree.node_ids().collect();
        let second: Vec<_> = tree.node_ids().collect();
        assert_eq!(first, second);
        assert_eq!(tree.count_nodes(), 6);
        assert_eq!(first.len(), tree.count_nodes());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = SchemaTree::new(
            "root",
            vec![SchemaNode::empty_object("root"), SchemaNode::empty_object("root")],
        )
        .unwrap_err();
        assert_eq!(err, TreeError::DuplicateNode("root".into()));
    }

    #[test]
    fn clone_is_independent_and_equivalent() {
        let tree = profile();
        let copy = tree.clone();
        assert_eq!(copy.root_id(), tree.root_id());
        for id in tree.node_ids() {
            assert_eq!(copy.path_of(id).unwrap(), tree.path_of(id).unwrap());
            assert_eq!(copy.node_by_id(id).unwrap(), tree.node_by_id(id).unwrap());
        }
        drop(tree);
        assert_eq!(copy.count_nodes(), 6);
    }

    #[test]
    fn parent_and_segment() {
        let tree = profile();
        assert_eq!(tree.parent_of(&"city".into()), Some(&NodeId::from("address")));
        assert_eq!(tree.segment_of(&"tag".into()), Some(&PathSegment::Items));
        assert_eq!(tree.segment_of(&"root".into()), None);
    }
}
