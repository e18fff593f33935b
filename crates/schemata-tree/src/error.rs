//! Error types for schema trees.

use schemata_types::{NodeId, Path, PathError};

/// Errors that can occur while building, querying or editing a schema tree.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TreeError {
    /// No node with this id exists in the tree.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// Walking the path from the root did not reach a node.
    #[error("no node at path {0}")]
    PathNotFound(Path),

    /// Two nodes were supplied with the same id.
    #[error("duplicate node id: {0}")]
    DuplicateNode(NodeId),

    /// A composite node references a child that was not supplied.
    #[error("node {parent} references missing child {child}")]
    DanglingChild {
        /// The node holding the reference.
        parent: NodeId,
        /// The missing child.
        child: NodeId,
    },

    /// A node is reachable through more than one parent, or through itself.
    #[error("node {0} is reachable more than once")]
    SharedNode(NodeId),

    /// A node was supplied that the root does not reach.
    #[error("node {0} is not reachable from the root")]
    Unreachable(NodeId),

    /// An editing operation was structurally impossible.
    #[error("invalid edit: {0}")]
    InvalidEdit(String),

    /// An imported schema document could not be interpreted.
    #[error("invalid schema document at {path:?}: {reason}")]
    InvalidDocument {
        /// Pointer to the offending declaration.
        path: String,
        /// What was wrong with it.
        reason: String,
    },

    #[error("path error: {0}")]
    Path(#[from] PathError),
}

impl TreeError {
    /// Returns `true` for the lookup failures (`NodeNotFound`, `PathNotFound`).
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NodeNotFound(_) | Self::PathNotFound(_))
    }
}

/// Convenience alias for tree results.
pub type TreeResult<T> = Result<T, TreeError>;
