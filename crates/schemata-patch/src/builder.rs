//! Validating construction of patch operations.

use serde_json::Value;

use schemata_types::pointer;

use crate::error::{PatchError, PatchResult};
use crate::operation::{OperationKind, PatchOperation};

/// Builder for a single [`PatchOperation`].
///
/// ```
/// use schemata_patch::{OperationKind, PatchBuilder};
///
/// let op = PatchBuilder::new(OperationKind::Move)
///     .from("/properties/a")
///     .path("/properties/b")
///     .build()
///     .unwrap();
/// assert_eq!(op.from(), Some("/properties/a"));
/// ```
#[derive(Clone, Debug)]
pub struct PatchBuilder {
    kind: OperationKind,
    path: Option<String>,
    value: Option<Value>,
    from: Option<String>,
}

impl PatchBuilder {
    pub fn new(kind: OperationKind) -> Self {
        Self {
            kind,
            path: None,
            value: None,
            from: None,
        }
    }

    /// A validated `add` of `value` at `path`.
    pub fn add(path: impl Into<String>, value: Value) -> PatchResult<PatchOperation> {
        Self::new(OperationKind::Add).path(path).value(value).build()
    }

    /// A validated `remove` of `path`.
    pub fn remove(path: impl Into<String>) -> PatchResult<PatchOperation> {
        Self::new(OperationKind::Remove).path(path).build()
    }

    /// A validated `replace` of `path` with `value`.
    pub fn replace(path: impl Into<String>, value: Value) -> PatchResult<PatchOperation> {
        Self::new(OperationKind::Replace).path(path).value(value).build()
    }

    /// A validated `move` from `from` to `path`.
    pub fn move_to(from: impl Into<String>, path: impl Into<String>) -> PatchResult<PatchOperation> {
        Self::new(OperationKind::Move).from(from).path(path).build()
    }

    /// Set the target pointer.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Set the value for `add` and `replace`.
    pub fn value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    /// Set the source pointer for `move`.
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Validate the collected fields and produce the operation.
    pub fn build(self) -> PatchResult<PatchOperation> {
        let kind = self.kind;
        let path = self
            .path
            .ok_or_else(|| PatchError::InvalidOperation(format!("{kind} without a path")))?;
        let tokens = pointer::parse_pointer(&path)
            .map_err(|e| PatchError::InvalidOperation(format!("{kind} path: {e}")))?;

        match kind {
            OperationKind::Add | OperationKind::Replace => {
                let value = self
                    .value
                    .ok_or_else(|| PatchError::InvalidOperation(format!("{kind} {path:?} without a value")))?;
                Ok(if kind == OperationKind::Add {
                    PatchOperation::Add { path, value }
                } else {
                    PatchOperation::Replace { path, value }
                })
            }
            OperationKind::Remove => {
                if tokens.is_empty() {
                    return Err(PatchError::InvalidOperation(
                        "remove cannot target the document root".into(),
                    ));
                }
                Ok(PatchOperation::Remove { path })
            }
            OperationKind::Move => {
                let from = self
                    .from
                    .ok_or_else(|| PatchError::InvalidOperation(format!("move to {path:?} without a from path")))?;
                let source = pointer::parse_pointer(&from)
                    .map_err(|e| PatchError::InvalidOperation(format!("move from path: {e}")))?;
                if pointer::is_strict_prefix(&source, &tokens) {
                    return Err(PatchError::InvalidOperation(format!(
                        "cannot move {from:?} into its own child {path:?}"
                    )));
                }
                Ok(PatchOperation::Move { from, path })
            }
        }
    }
}
