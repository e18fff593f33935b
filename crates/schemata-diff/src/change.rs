//! Raw per-id change records.

use std::fmt;

use serde::{Deserialize, Serialize};

use schemata_tree::{NodeId, SchemaNode};

/// The classification of a change.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Removed,
    Moved,
    Modified,
}

impl ChangeKind {
    /// Lowercase bucket name, as used in logs and serialized changes.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Moved => "moved",
            Self::Modified => "modified",
        }
    }
}

impl fmt::Display for ChangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One node's change between the base and the current tree.
///
/// Added changes carry only the current node, removed changes only the base
/// node, and moved or modified changes carry both.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RawChange {
    Added { current: SchemaNode },
    Removed { base: SchemaNode },
    Moved { base: SchemaNode, current: SchemaNode },
    Modified { base: SchemaNode, current: SchemaNode },
}

impl RawChange {
    /// The bucket this change belongs to.
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::Added { .. } => ChangeKind::Added,
            Self::Removed { .. } => ChangeKind::Removed,
            Self::Moved { .. } => ChangeKind::Moved,
            Self::Modified { .. } => ChangeKind::Modified,
        }
    }

    /// The id of the changed node, shared by both sides when both exist.
    pub fn id(&self) -> &NodeId {
        match self {
            Self::Added { current } => &current.id,
            Self::Removed { base } | Self::Moved { base, .. } | Self::Modified { base, .. } => &base.id,
        }
    }

    /// The node as it was in the base tree, if it existed there.
    pub fn base_node(&self) -> Option<&SchemaNode> {
        match self {
            Self::Added { .. } => None,
            Self::Removed { base } | Self::Moved { base, .. } | Self::Modified { base, .. } => Some(base),
        }
    }

    /// The node as it is in the current tree, if it still exists.
    pub fn current_node(&self) -> Option<&SchemaNode> {
        match self {
            Self::Removed { .. } => None,
            Self::Added { current } | Self::Moved { current, .. } | Self::Modified { current, .. } => {
                Some(current)
            }
        }
    }
}
