//! Change collection.
//!
//! The collector is driven by id sets, not by a positional walk: every id in
//! either tree is looked up in the other tree's index. An id whose path
//! changed is reported as moved even if its content changed too.

use tracing::debug;

use schemata_tree::SchemaTree;

use crate::change::RawChange;
use crate::compare::are_nodes_content_equal;
use crate::error::DiffResult;

pub struct ChangeCollector<'a> {
    base: &'a SchemaTree,
    current: &'a SchemaTree,
}

impl<'a> ChangeCollector<'a> {
    pub fn new(base: &'a SchemaTree, current: &'a SchemaTree) -> Self {
        Self { base, current }
    }

    /// Emit removed, then added, then moved and modified changes.
    ///
    /// Within each pass ids follow the pre-order of the tree being scanned.
    pub fn collect(&self) -> DiffResult<Vec<RawChange>> {
        let mut changes = Vec::new();

        for id in self.base.node_ids() {
            if !self.current.contains(id) {
                changes.push(RawChange::Removed {
                    base: self.base.node_by_id(id)?.clone(),
                });
            }
        }

        for id in self.current.node_ids() {
            if !self.base.contains(id) {
                changes.push(RawChange::Added {
                    current: self.current.node_by_id(id)?.clone(),
                });
            }
        }

        for id in self.base.node_ids() {
            if !self.current.contains(id) {
                continue;
            }
            let base = self.base.node_by_id(id)?;
            let current = self.current.node_by_id(id)?;
            if self.base.path_of(id)? != self.current.path_of(id)? {
                changes.push(RawChange::Moved {
                    base: base.clone(),
                    current: current.clone(),
                });
            } else if !are_nodes_content_equal(base, current) {
                changes.push(RawChange::Modified {
                    base: base.clone(),
                    current: current.clone(),
                });
            }
        }

        debug!(
            base_nodes = self.base.count_nodes(),
            current_nodes = self.current.count_nodes(),
            changes = changes.len(),
            "collected raw changes"
        );
        Ok(changes)
    }
}
