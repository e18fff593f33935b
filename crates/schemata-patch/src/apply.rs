//! Applying patch operations to JSON documents.
//!
//! Operations are replayed in order against a `serde_json::Value`. Objects
//! are addressed by key, arrays by canonical index, and `add` accepts `-` to
//! append.

use serde_json::Value;

use schemata_tree::SchemaTree;
use schemata_types::pointer;

use crate::error::{PatchError, PatchResult};
use crate::operation::PatchOperation;
use crate::patch::Patch;

/// Apply one operation.
pub fn apply_operation(doc: &mut Value, op: &PatchOperation) -> PatchResult<()> {
    match op {
        PatchOperation::Add { path, value } => add(doc, path, value.clone()),
        PatchOperation::Remove { path } => remove(doc, path).map(drop),
        PatchOperation::Replace { path, value } => replace(doc, path, value.clone()),
        PatchOperation::Move { from, path } => {
            let source = pointer::parse_pointer(from)?;
            let target = pointer::parse_pointer(path)?;
            if pointer::is_strict_prefix(&source, &target) {
                return Err(PatchError::InvalidTarget(path.clone()));
            }
            if source == target {
                return doc.pointer(from).map(drop).ok_or_else(|| PatchError::NotFound(from.clone()));
            }
            let value = remove(doc, from)?;
            add(doc, path, value)
        }
    }
}

/// Apply operations in sequence, stopping at the first failure.
pub fn apply_patch(doc: &mut Value, ops: &[PatchOperation]) -> PatchResult<()> {
    for op in ops {
        apply_operation(doc, op)?;
    }
    Ok(())
}

/// Replay the schema half of `patch` on `base` and import the result.
///
/// The imported tree carries freshly minted ids, so compare it with the
/// target by shape rather than by identity.
pub fn apply_to_tree(base: &SchemaTree, patch: &Patch) -> PatchResult<SchemaTree> {
    let mut doc = base.to_document();
    apply_patch(&mut doc, patch.schema_operations())?;
    Ok(SchemaTree::from_document(&doc)?)
}

/// Split a pointer into the parent pointer tokens and the last token.
fn split(path: &str) -> PatchResult<(Vec<String>, String)> {
    let mut tokens = pointer::parse_pointer(path)?;
    let last = tokens
        .pop()
        .ok_or_else(|| PatchError::InvalidTarget(path.to_string()))?;
    Ok((tokens, last))
}

fn parent_mut<'a>(doc: &'a mut Value, tokens: &[String], path: &str) -> PatchResult<&'a mut Value> {
    doc.pointer_mut(&pointer::format_pointer(tokens))
        .ok_or_else(|| PatchError::NotFound(path.to_string()))
}

fn add(doc: &mut Value, path: &str, value: Value) -> PatchResult<()> {
    if path.is_empty() {
        *doc = value;
        return Ok(());
    }
    let (parent, key) = split(path)?;
    match parent_mut(doc, &parent, path)? {
        Value::Object(map) => {
            map.insert(key, value);
            Ok(())
        }
        Value::Array(arr) => {
            if key == "-" {
                arr.push(value);
                return Ok(());
            }
            let idx = pointer::array_index(&key)
                .filter(|idx| *idx <= arr.len())
                .ok_or_else(|| PatchError::InvalidTarget(path.to_string()))?;
            arr.insert(idx, value);
            Ok(())
        }
        _ => Err(PatchError::InvalidTarget(path.to_string())),
    }
}

fn remove(doc: &mut Value, path: &str) -> PatchResult<Value> {
    let (parent, key) = split(path)?;
    match parent_mut(doc, &parent, path)? {
        Value::Object(map) => map
            .remove(&key)
            .ok_or_else(|| PatchError::NotFound(path.to_string())),
        Value::Array(arr) => {
            let idx = pointer::array_index(&key)
                .filter(|idx| *idx < arr.len())
                .ok_or_else(|| PatchError::NotFound(path.to_string()))?;
            Ok(arr.remove(idx))
        }
        _ => Err(PatchError::InvalidTarget(path.to_string())),
    }
}

fn replace(doc: &mut Value, path: &str, value: Value) -> PatchResult<()> {
    let target = doc
        .pointer_mut(path)
        .ok_or_else(|| PatchError::NotFound(path.to_string()))?;
    *target = value;
    Ok(())
}
