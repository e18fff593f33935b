//! Grouping raw changes into typed buckets.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use schemata_tree::NodeId;

use crate::change::{ChangeKind, RawChange};

/// Raw changes partitioned by kind, each bucket keeping collection order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CoalescedChanges {
    pub moved: Vec<RawChange>,
    pub added: Vec<RawChange>,
    pub removed: Vec<RawChange>,
    pub modified: Vec<RawChange>,
}

impl CoalescedChanges {
    /// Returns `true` if there are no changes in any bucket.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total number of changes across all buckets.
    pub fn len(&self) -> usize {
        self.moved.len() + self.added.len() + self.removed.len() + self.modified.len()
    }

    /// The bucket holding `id`, if any.
    pub fn classify(&self, id: &NodeId) -> Option<ChangeKind> {
        [&self.moved, &self.added, &self.removed, &self.modified]
            .into_iter()
            .flatten()
            .find(|change| change.id() == id)
            .map(RawChange::kind)
    }

    pub fn bucket(&self, kind: ChangeKind) -> &[RawChange] {
        match kind {
            ChangeKind::Moved => &self.moved,
            ChangeKind::Added => &self.added,
            ChangeKind::Removed => &self.removed,
            ChangeKind::Modified => &self.modified,
        }
    }

    fn bucket_mut(&mut self, kind: ChangeKind) -> &mut Vec<RawChange> {
        match kind {
            ChangeKind::Moved => &mut self.moved,
            ChangeKind::Added => &mut self.added,
            ChangeKind::Removed => &mut self.removed,
            ChangeKind::Modified => &mut self.modified,
        }
    }
}

/// Partition `changes` into buckets.
///
/// # Panics
///
/// Panics if an id occurs more than once. The collector classifies each id
/// exactly once, so a repeat means the producing traversal is broken.
pub fn coalesce(changes: Vec<RawChange>) -> CoalescedChanges {
    let mut seen: HashMap<NodeId, ChangeKind> = HashMap::with_capacity(changes.len());
    let mut out = CoalescedChanges::default();

    for change in changes {
        let kind = change.kind();
        if let Some(first) = seen.insert(change.id().clone(), kind) {
            panic!(
                "change partition violated: node {} classified as both {first} and {kind}",
                change.id()
            );
        }
        out.bucket_mut(kind).push(change);
    }

    debug!(
        moved = out.moved.len(),
        added = out.added.len(),
        removed = out.removed.len(),
        modified = out.modified.len(),
        "coalesced changes"
    );
    out
}
