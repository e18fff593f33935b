//! Diff engine for Schemata.
//!
//! Compares two snapshots of a schema tree by node identity. Every id is
//! classified exactly once: added, removed, moved (its path changed) or
//! modified (same path, different own attributes).
//!
//! # Key Types
//!
//! - [`NodeComparator`] -- Structural and content equality over two trees
//! - [`RawChange`] / [`ChangeCollector`] -- Per-id change records
//! - [`CoalescedChanges`] -- Changes grouped into ordered buckets

pub mod change;
pub mod coalescer;
pub mod collector;
pub mod compare;
pub mod error;

pub use change::{ChangeKind, RawChange};
pub use coalescer::{coalesce, CoalescedChanges};
pub use collector::ChangeCollector;
pub use compare::{are_nodes_content_equal, NodeComparator};
pub use error::{DiffError, DiffResult};

use schemata_tree::SchemaTree;

/// Collect and coalesce the changes between `base` and `current`.
pub fn diff_trees(base: &SchemaTree, current: &SchemaTree) -> DiffResult<CoalescedChanges> {
    let raw = ChangeCollector::new(base, current).collect()?;
    Ok(coalesce(raw))
}
