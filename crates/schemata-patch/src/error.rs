//! Error types for patch generation and application.

use schemata_diff::DiffError;
use schemata_tree::TreeError;
use schemata_types::PathError;

/// Errors that can occur while building, generating, enriching or applying
/// a patch.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PatchError {
    /// The location an operation addresses does not exist.
    #[error("target not found: {0:?}")]
    NotFound(String),

    /// An operation is missing a required field or is self-contradictory.
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    /// No default value can be derived for an added node.
    #[error("cannot derive a default for {path:?}: {reason}")]
    Enrichment {
        /// Schema pointer of the node.
        path: String,
        /// Why no default exists.
        reason: String,
    },

    /// The location exists but cannot hold the operation's result.
    #[error("invalid target {0:?}")]
    InvalidTarget(String),

    /// The patch configuration could not be parsed.
    #[error("config error: {0}")]
    Config(String),

    /// A patch could not be rendered as JSON.
    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("diff error: {0}")]
    Diff(#[from] DiffError),

    #[error("path error: {0}")]
    Path(#[from] PathError),
}

/// Convenience alias for patch results.
pub type PatchResult<T> = Result<T, PatchError>;
