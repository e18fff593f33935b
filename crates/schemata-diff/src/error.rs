//! Error types for the diff crate.

use schemata_tree::TreeError;

/// Errors that can occur while diffing two schema trees.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DiffError {
    /// A tree lookup failed during the diff.
    #[error("tree error: {0}")]
    Tree(#[from] TreeError),
}

/// Convenience alias for diff results.
pub type DiffResult<T> = Result<T, DiffError>;
