//! Foundation types for Schemata.
//!
//! This crate provides the identity and addressing types shared by every
//! other Schemata crate: stable node identities, structured schema paths,
//! and the RFC 6901 JSON Pointer codec those paths are rendered through.
//!
//! # Key Types
//!
//! - [`NodeId`] -- Opaque identity of a schema node, stable across tree versions
//! - [`Path`] / [`PathSegment`] -- Structured location of a node inside a schema tree
//! - [`pointer`] -- JSON Pointer token escaping, parsing and formatting

pub mod error;
pub mod node_id;
pub mod path;
pub mod pointer;

pub use error::PathError;
pub use node_id::NodeId;
pub use path::{Path, PathSegment};
