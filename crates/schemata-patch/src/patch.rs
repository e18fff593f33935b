//! The patch artifact.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PatchError, PatchResult};
use crate::operation::PatchOperation;

/// An ordered operation sequence: schema operations first, then the data
/// operations appended by enrichment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    operations: Vec<PatchOperation>,
    schema_len: usize,
}

impl Patch {
    /// A patch holding only schema operations.
    pub fn new(schema_operations: Vec<PatchOperation>) -> Self {
        let schema_len = schema_operations.len();
        Self {
            operations: schema_operations,
            schema_len,
        }
    }

    /// Append data operations after everything already in the patch.
    pub fn append_data(&mut self, ops: impl IntoIterator<Item = PatchOperation>) {
        self.operations.extend(ops);
    }

    /// Every operation, schema half first.
    pub fn operations(&self) -> &[PatchOperation] {
        &self.operations
    }

    pub fn schema_operations(&self) -> &[PatchOperation] {
        &self.operations[..self.boundary()]
    }

    pub fn data_operations(&self) -> &[PatchOperation] {
        &self.operations[self.boundary()..]
    }

    /// Total number of operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Consume the patch, keeping the flat operation list.
    pub fn into_operations(self) -> Vec<PatchOperation> {
        self.operations
    }

    // A deserialized patch may carry an out-of-range boundary.
    fn boundary(&self) -> usize {
        self.schema_len.min(self.operations.len())
    }

    /// The whole sequence as an RFC 6902 JSON array.
    pub fn to_json(&self) -> PatchResult<Value> {
        serde_json::to_value(&self.operations).map_err(|e| PatchError::Serialization(e.to_string()))
    }
}
