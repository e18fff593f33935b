//! Schema tree snapshots for Schemata.
//!
//! A [`SchemaTree`] is an immutable snapshot of a typed schema: a root id, the
//! nodes keyed by their stable [`NodeId`], and a [`NodePathIndex`] computed
//! once at construction. Edits never mutate a snapshot; a [`TreeEditor`] works
//! on an owned copy and produces a new, re-validated tree.
//!
//! # Key Types
//!
//! - [`SchemaNode`] / [`NodeKind`] / [`NodeType`] -- Typed schema nodes
//! - [`SchemaTree`] -- Immutable snapshot with id and path lookups
//! - [`NodePathIndex`] -- Bidirectional id/path index built per snapshot
//! - [`TreeEditor`] -- Owned editing session producing new snapshots

pub mod document;
pub mod editor;
pub mod error;
pub mod index;
pub mod node;
pub mod tree;

pub use editor::TreeEditor;
pub use error::{TreeError, TreeResult};
pub use index::NodePathIndex;
pub use node::{
    BooleanConstraints, NodeKind, NodeMetadata, NodeType, NumberConstraints, SchemaNode,
    StringConstraints,
};
pub use schemata_types::{NodeId, Path, PathSegment};
pub use tree::SchemaTree;
