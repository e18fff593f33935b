//! Bidirectional id/path index.
//!
//! [`NodePathIndex`] is built once per snapshot by a full pre-order
//! traversal. It answers "does this id exist, and at what path" in constant
//! time, which is what lets the diff engine classify every id without
//! re-walking either tree.
//!
//! # Invariants
//!
//! - Every indexed id was reached exactly once from the root.
//! - `id_at(path_of(id)) == id` for every indexed id.
//! - `order` lists ids in pre-order with object properties by name.

use std::collections::HashMap;

use schemata_types::{NodeId, Path};

use crate::error::{TreeError, TreeResult};
use crate::node::SchemaNode;

#[derive(Clone, Debug, Default)]
pub struct NodePathIndex {
    paths: HashMap<NodeId, Path>,
    ids: HashMap<Path, NodeId>,
    parents: HashMap<NodeId, NodeId>,
    order: Vec<NodeId>,
}

impl NodePathIndex {
    /// Walk the tree rooted at `root` and index every node.
    ///
    /// Fails if a child reference dangles, if a node is reached twice (a
    /// shared child or a cycle), or if any supplied node is unreachable.
    pub fn build(root: &NodeId, nodes: &HashMap<NodeId, SchemaNode>) -> TreeResult<Self> {
        if !nodes.contains_key(root) {
            return Err(TreeError::NodeNotFound(root.clone()));
        }

        let mut index = Self::default();
        let mut stack: Vec<(NodeId, Path, Option<NodeId>)> = vec![(root.clone(), Path::root(), None)];

        while let Some((id, path, parent)) = stack.pop() {
            if index.paths.contains_key(&id) {
                return Err(TreeError::SharedNode(id));
            }
            let Some(node) = nodes.get(&id) else {
                return Err(TreeError::DanglingChild {
                    parent: parent.unwrap_or_else(|| root.clone()),
                    child: id,
                });
            };

            // Reverse so that the first child is popped first.
            for (segment, child) in node.children().into_iter().rev() {
                stack.push((child.clone(), path.child(segment), Some(id.clone())));
            }

            if let Some(parent) = parent {
                index.parents.insert(id.clone(), parent);
            }
            index.ids.insert(path.clone(), id.clone());
            index.paths.insert(id.clone(), path);
            index.order.push(id);
        }

        if index.order.len() != nodes.len() {
            // Sorted so the reported id does not depend on hash order.
            let mut unreachable: Vec<&NodeId> = nodes
                .keys()
                .filter(|id| !index.paths.contains_key(*id))
                .collect();
            unreachable.sort();
            if let Some(id) = unreachable.first() {
                return Err(TreeError::Unreachable((*id).clone()));
            }
        }

        Ok(index)
    }

    pub fn path_of(&self, id: &NodeId) -> Option<&Path> {
        self.paths.get(id)
    }

    pub fn id_at(&self, path: &Path) -> Option<&NodeId> {
        self.ids.get(path)
    }

    /// The parent id, or `None` for the root and unknown ids.
    pub fn parent_of(&self, id: &NodeId) -> Option<&NodeId> {
        self.parents.get(id)
    }

    pub fn contains(&self, id: &NodeId) -> bool {
        self.paths.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Indexed ids in pre-order.
    pub fn ids(&self) -> std::slice::Iter<'_, NodeId> {
        self.order.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_map(nodes: Vec<SchemaNode>) -> HashMap<NodeId, SchemaNode> {
        nodes.into_iter().map(|n| (n.id.clone(), n)).collect()
    }

    #[test]
    fn indexes_paths_and_parents() {
        let nodes = node_map(vec![
            SchemaNode::object("root", [("tags", "tags"), ("name", "name")]),
            SchemaNode::array("tags", "tag"),
            SchemaNode::string("tag"),
            SchemaNode::string("name"),
        ]);
        let index = NodePathIndex::build(&"root".into(), &nodes).unwrap();

        assert_eq!(index.len(), 4);
        assert_eq!(
            index.path_of(&"tag".into()),
            Some(&Path::root().property("tags").items())
        );
        assert_eq!(
            index.id_at(&Path::root().property("name")),
            Some(&NodeId::from("name"))
        );
        assert_eq!(index.parent_of(&"tag".into()), Some(&NodeId::from("tags")));
        assert_eq!(index.parent_of(&"root".into()), None);
    }

    #[test]
    fn order_is_preorder_by_property_name() {
        let nodes = node_map(vec![
            SchemaNode::object("root", [("b", "b"), ("a", "a")]),
            SchemaNode::object("a", [("x", "x")]),
            SchemaNode::string("x"),
            SchemaNode::string("b"),
        ]);
        let index = NodePathIndex::build(&"root".into(), &nodes).unwrap();
        let order: Vec<&str> = index.ids().map(NodeId::as_str).collect();
        assert_eq!(order, vec!["root", "a", "x", "b"]);
    }

    #[test]
    fn missing_root_is_not_found() {
        let err = NodePathIndex::build(&"root".into(), &HashMap::new()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn dangling_child_is_rejected() {
        let nodes = node_map(vec![SchemaNode::object("root", [("a", "ghost")])]);
        let err = NodePathIndex::build(&"root".into(), &nodes).unwrap_err();
        assert_eq!(
            err,
            TreeError::DanglingChild {
                parent: "root".into(),
                child: "ghost".into()
            }
        );
    }

    #[test]
    fn shared_child_is_rejected() {
        let nodes = node_map(vec![
            SchemaNode::object("root", [("a", "leaf"), ("b", "leaf")]),
            SchemaNode::string("leaf"),
        ]);
        let err = NodePathIndex::build(&"root".into(), &nodes).unwrap_err();
        assert_eq!(err, TreeError::SharedNode("leaf".into()));
    }

    #[test]
    fn cycle_is_rejected() {
        let nodes = node_map(vec![
            SchemaNode::object("root", [("a", "a")]),
            SchemaNode::object("a", [("back", "root")]),
        ]);
        let err = NodePathIndex::build(&"root".into(), &nodes).unwrap_err();
        assert_eq!(err, TreeError::SharedNode("root".into()));
    }

    #[test]
    fn unreachable_node_is_rejected() {
        let nodes = node_map(vec![
            SchemaNode::empty_object("root"),
            SchemaNode::string("orphan"),
        ]);
        let err = NodePathIndex::build(&"root".into(), &nodes).unwrap_err();
        assert_eq!(err, TreeError::Unreachable("orphan".into()));
    }
}
