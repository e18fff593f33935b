//! Ordering rules that keep a patch valid under index shifts.
//!
//! Removals run deepest first and, among siblings, from the highest array
//! index down, so no removal shifts a location a later removal addresses.
//! Additions run the other way round so every parent exists before its
//! children and lower indices are filled first.

use std::cmp::Ordering;

use schemata_types::pointer;

use crate::operation::PatchOperation;

/// Compare two reference tokens, numerically when both are array indices.
pub fn compare_tokens(a: &str, b: &str) -> Ordering {
    match (pointer::array_index(a), pointer::array_index(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Lexicographic comparison of token sequences using [`compare_tokens`].
pub fn compare_pointers(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        match compare_tokens(x, y) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    a.len().cmp(&b.len())
}

fn tokens(op: &PatchOperation) -> Vec<String> {
    // Operations come from the builder, which validated their pointers.
    pointer::parse_pointer(op.path()).unwrap_or_default()
}

/// Deeper paths first, then higher tokens first.
pub fn sort_removals(ops: &mut [PatchOperation]) {
    ops.sort_by_cached_key(|op| std::cmp::Reverse(SortKey(tokens(op))));
}

/// Shallower paths first, then lower tokens first.
pub fn sort_additions(ops: &mut [PatchOperation]) {
    ops.sort_by_cached_key(|op| SortKey(tokens(op)));
}

/// Depth, then numeric-aware token order.
#[derive(PartialEq, Eq)]
struct SortKey(Vec<String>);

impl Ord for SortKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| compare_pointers(&self.0, &other.0))
    }
}

impl PartialOrd for SortKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
