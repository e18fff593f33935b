//! Patch generation from coalesced changes.
//!
//! The generator emits four phases in a fixed order: removes, moves, adds,
//! replaces. Each operation is computed against the document as the earlier
//! operations left it, so replaying the sequence on the base document yields
//! the current one.
//!
//! Surviving nodes are normally relocated with `move`. A survivor is instead
//! *re-created* (removed in the first phase, added in the third) when its
//! base copy cannot be moved into place: its type changed, its base parent
//! is removed or re-created, its new parent is new or re-created, or no
//! move order frees its target slot.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use schemata_diff::{are_nodes_content_equal, CoalescedChanges, RawChange};
use schemata_tree::{NodeId, Path, PathSegment, SchemaTree};

use crate::builder::PatchBuilder;
use crate::config::PatchConfig;
use crate::error::PatchResult;
use crate::operation::PatchOperation;
use crate::order::{sort_additions, sort_removals};

/// A child position: the parent id and the segment under it.
type Slot = (NodeId, PathSegment);

pub struct PatchGenerator<'a> {
    base: &'a SchemaTree,
    current: &'a SchemaTree,
    changes: &'a CoalescedChanges,
    config: &'a PatchConfig,
}

impl<'a> PatchGenerator<'a> {
    pub fn new(
        base: &'a SchemaTree,
        current: &'a SchemaTree,
        changes: &'a CoalescedChanges,
        config: &'a PatchConfig,
    ) -> Self {
        Self {
            base,
            current,
            changes,
            config,
        }
    }

    /// Produce the ordered schema operations.
    pub fn generate(&self) -> PatchResult<Vec<PatchOperation>> {
        if self.changes.is_empty() {
            return Ok(Vec::new());
        }

        let (base_root, current_root) = (self.base.root(), self.current.root());
        if base_root.id != current_root.id || base_root.node_type() != current_root.node_type() {
            debug!(
                base_root = %base_root.id.short_id(),
                current_root = %current_root.id.short_id(),
                "root replaced, emitting whole-document replace"
            );
            return Ok(vec![PatchBuilder::replace("", self.current.to_document())?]);
        }

        let plan = self.plan()?;
        let removals = self.removals(&plan.rebuilt)?;
        let additions = self.additions(&plan.rebuilt)?;
        let replacements = self.replacements(&plan.rebuilt)?;

        debug!(
            removes = removals.len(),
            moves = plan.moves.len(),
            adds = additions.len(),
            replaces = replacements.len(),
            rebuilt = plan.rebuilt.len(),
            "generated schema operations"
        );

        let mut ops = removals;
        ops.extend(plan.moves);
        ops.extend(additions);
        ops.extend(replacements);
        Ok(ops)
    }

    // ---------------------------------------------------------------
    // Planning
    // ---------------------------------------------------------------

    fn plan(&self) -> PatchResult<Plan> {
        let mut forced: HashSet<NodeId> = self
            .base
            .nodes()
            .filter(|node| {
                self.current
                    .get(&node.id)
                    .is_some_and(|current| current.node_type() != node.node_type())
            })
            .map(|node| node.id.clone())
            .collect();

        loop {
            let rebuilt = self.rebuilt(&forced);
            match self.schedule_moves(&rebuilt)? {
                Schedule::Moves(moves) => return Ok(Plan { rebuilt, moves }),
                Schedule::Stuck(id) => {
                    debug!(node = %id.short_id(), "no move order frees the target slot, re-creating node");
                    forced.insert(id);
                }
            }
        }
    }

    /// Every node the add phase declares: added nodes, `forced` survivors,
    /// and survivors whose base or current surroundings are being rebuilt.
    fn rebuilt(&self, forced: &HashSet<NodeId>) -> HashSet<NodeId> {
        let mut rebuilt = forced.clone();
        rebuilt.extend(self.changes.added.iter().map(|change| change.id().clone()));

        loop {
            let mut grew = false;
            for id in self.current.node_ids() {
                if rebuilt.contains(id) || !self.base.contains(id) {
                    continue;
                }
                let base_copy_destroyed = self
                    .base
                    .parent_of(id)
                    .is_some_and(|parent| rebuilt.contains(parent) || !self.current.contains(parent));
                let parent_rebuilt = self
                    .current
                    .parent_of(id)
                    .is_some_and(|parent| rebuilt.contains(parent));
                if base_copy_destroyed || parent_rebuilt {
                    rebuilt.insert(id.clone());
                    grew = true;
                }
            }
            if !grew {
                return rebuilt;
            }
        }
    }

    /// Order the moves of the kept survivors, simulating the document after
    /// the remove phase.
    fn schedule_moves(&self, rebuilt: &HashSet<NodeId>) -> PatchResult<Schedule> {
        let kept = |id: &NodeId| self.current.contains(id) && !rebuilt.contains(id);

        let mut workspace = Workspace::default();
        for id in self.base.node_ids().filter(|id| kept(*id)) {
            if let Some(slot) = slot_in(self.base, id) {
                workspace.place(id, slot);
            }
        }

        // Moved nodes first, in bucket order, then anything else whose
        // parent identity changed.
        let candidates = self
            .changes
            .moved
            .iter()
            .map(RawChange::id)
            .chain(self.current.node_ids());
        let mut seen = HashSet::new();
        let mut pending: Vec<(NodeId, Slot)> = Vec::new();
        for id in candidates {
            if !kept(id) || !seen.insert(id) {
                continue;
            }
            if let (Some(at), Some(target)) = (workspace.slots.get(id), slot_in(self.current, id)) {
                if *at != target {
                    pending.push((id.clone(), target));
                }
            }
        }

        let mut moves = Vec::with_capacity(pending.len());
        while !pending.is_empty() {
            let ready = pending.iter().position(|(id, target)| {
                !workspace.occupants.contains_key(target) && !workspace.is_within(&target.0, id)
            });
            let Some(index) = ready else {
                return Ok(Schedule::Stuck(pending.swap_remove(0).0));
            };
            let (id, target) = pending.remove(index);
            let from = workspace.path(&id);
            workspace.place(&id, target);
            let to = workspace.path(&id);
            moves.push(PatchBuilder::move_to(from.to_pointer(), to.to_pointer())?);
        }
        Ok(Schedule::Moves(moves))
    }

    // ---------------------------------------------------------------
    // Phases
    // ---------------------------------------------------------------

    /// Removed nodes and re-created survivors, at their base paths.
    fn removals(&self, rebuilt: &HashSet<NodeId>) -> PatchResult<Vec<PatchOperation>> {
        let doomed = self
            .changes
            .removed
            .iter()
            .map(RawChange::id)
            .chain(self.base.node_ids().filter(|id| rebuilt.contains(*id)));
        let mut ops = Vec::new();
        for id in doomed {
            ops.push(PatchBuilder::remove(self.base.path_of(id)?.to_pointer())?);
        }
        sort_removals(&mut ops);
        Ok(ops)
    }

    /// Shallow declarations of every rebuilt node, at its current path.
    fn additions(&self, rebuilt: &HashSet<NodeId>) -> PatchResult<Vec<PatchOperation>> {
        let mut ops = Vec::new();
        for id in self.current.node_ids().filter(|id| rebuilt.contains(*id)) {
            let path = self.current.path_of(id)?;
            ops.push(PatchBuilder::add(path.to_pointer(), self.current.node_declaration(id)?)?);
        }
        sort_additions(&mut ops);
        Ok(ops)
    }

    /// Full current declarations of modified nodes that were not rebuilt.
    fn replacements(&self, rebuilt: &HashSet<NodeId>) -> PatchResult<Vec<PatchOperation>> {
        let moved = self
            .config
            .replace_moved_content
            .then_some(&self.changes.moved);
        let candidates = self.changes.modified.iter().chain(moved.into_iter().flatten());

        let mut ops = Vec::new();
        for change in candidates {
            let id = change.id();
            if rebuilt.contains(id) {
                continue;
            }
            if let RawChange::Moved { base, current } = change {
                if are_nodes_content_equal(base, current) {
                    continue;
                }
            }
            let path = self.current.path_of(id)?;
            ops.push(PatchBuilder::replace(path.to_pointer(), self.current.subtree_document(id)?)?);
        }
        Ok(ops)
    }
}

struct Plan {
    rebuilt: HashSet<NodeId>,
    moves: Vec<PatchOperation>,
}

enum Schedule {
    Moves(Vec<PatchOperation>),
    /// Every pending move is blocked; this node should be re-created.
    Stuck(NodeId),
}

fn slot_in(tree: &SchemaTree, id: &NodeId) -> Option<Slot> {
    let parent = tree.parent_of(id)?;
    let segment = tree.segment_of(id)?;
    Some((parent.clone(), segment.clone()))
}

/// Kept nodes by slot, as the document stands during the move phase.
#[derive(Default)]
struct Workspace {
    slots: HashMap<NodeId, Slot>,
    occupants: HashMap<Slot, NodeId>,
}

impl Workspace {
    fn place(&mut self, id: &NodeId, slot: Slot) {
        if let Some(old) = self.slots.insert(id.clone(), slot.clone()) {
            self.occupants.remove(&old);
        }
        self.occupants.insert(slot, id.clone());
    }

    fn path(&self, id: &NodeId) -> Path {
        let mut segments = Vec::new();
        let mut at = id;
        while let Some((parent, segment)) = self.slots.get(at) {
            segments.push(segment.clone());
            at = parent;
        }
        segments.reverse();
        Path::from_segments(segments)
    }

    /// Returns `true` if `id` is `ancestor` or lies below it.
    fn is_within(&self, id: &NodeId, ancestor: &NodeId) -> bool {
        let mut at = id;
        loop {
            if at == ancestor {
                return true;
            }
            match self.slots.get(at) {
                Some((parent, _)) => at = parent,
                None => return false,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemata_diff::diff_trees;
    use schemata_tree::SchemaNode;
    use serde_json::json;

    fn base() -> SchemaTree {
        SchemaTree::new(
            "root",
            vec![
                SchemaNode::object("root", [("name", "name"), ("address", "address"), ("tags", "tags")]),
                SchemaNode::string("name"),
                SchemaNode::object("address", [("city", "city"), ("zip", "zip")]),
                SchemaNode::string("city"),
                SchemaNode::string("zip"),
                SchemaNode::array("tags", "tag"),
                SchemaNode::string("tag"),
            ],
        )
        .unwrap()
    }

    fn generate(base: &SchemaTree, current: &SchemaTree) -> Vec<serde_json::Value> {
        let changes = diff_trees(base, current).unwrap();
        let config = PatchConfig::default();
        PatchGenerator::new(base, current, &changes, &config)
            .generate()
            .unwrap()
            .iter()
            .map(|op| serde_json::to_value(op).unwrap())
            .collect()
    }

    #[test]
    fn no_changes_no_operations() {
        let tree = base();
        assert!(generate(&tree, &tree.clone()).is_empty());
    }

    #[test]
    fn rename_is_a_single_move() {
        let mut editor = base().edit();
        editor.rename_property(&"root".into(), "name", "fullName").unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![json!({"op": "move", "from": "/properties/name", "path": "/properties/fullName"})]
        );
    }

    #[test]
    fn phases_run_remove_move_add_replace() {
        let mut editor = base().edit();
        editor
            .remove(&"zip".into())
            .unwrap()
            .move_to_property(&"city".into(), &"root".into(), "city")
            .unwrap()
            .set_property(&"root".into(), "email", SchemaNode::string("email"))
            .unwrap()
            .update_metadata(&"name".into(), |m| m.title = Some("Name".into()))
            .unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![
                json!({"op": "remove", "path": "/properties/address/properties/zip"}),
                json!({"op": "move", "from": "/properties/address/properties/city", "path": "/properties/city"}),
                json!({"op": "add", "path": "/properties/email", "value": {"type": "string"}}),
                json!({"op": "replace", "path": "/properties/name", "value": {"type": "string", "title": "Name"}}),
            ]
        );
    }

    #[test]
    fn moved_descendants_ride_along() {
        let mut editor = base().edit();
        editor.rename_property(&"root".into(), "address", "home").unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![json!({"op": "move", "from": "/properties/address", "path": "/properties/home"})]
        );
    }

    #[test]
    fn removes_run_deepest_first() {
        let mut editor = base().edit();
        editor.remove(&"address".into()).unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![
                json!({"op": "remove", "path": "/properties/address/properties/zip"}),
                json!({"op": "remove", "path": "/properties/address/properties/city"}),
                json!({"op": "remove", "path": "/properties/address"}),
            ]
        );
    }

    #[test]
    fn new_objects_are_declared_before_their_children() {
        let mut editor = base().edit();
        editor
            .set_property(&"root".into(), "meta", SchemaNode::empty_object("meta"))
            .unwrap()
            .move_to_property(&"zip".into(), &"meta".into(), "zip")
            .unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![
                json!({"op": "remove", "path": "/properties/address/properties/zip"}),
                json!({"op": "add", "path": "/properties/meta", "value": {"type": "object", "properties": {}}}),
                json!({"op": "add", "path": "/properties/meta/properties/zip", "value": {"type": "string"}}),
            ]
        );
    }

    #[test]
    fn swap_falls_back_to_recreation() {
        let current = SchemaTree::new(
            "root",
            vec![
                SchemaNode::object("root", [("name", "address"), ("address", "name"), ("tags", "tags")]),
                SchemaNode::string("name"),
                SchemaNode::object("address", [("city", "city"), ("zip", "zip")]),
                SchemaNode::string("city"),
                SchemaNode::string("zip"),
                SchemaNode::array("tags", "tag"),
                SchemaNode::string("tag"),
            ],
        )
        .unwrap();
        let ops = generate(&base(), &current);
        // The first pending move (address, in base pre-order) is re-created
        // along with its children; name then moves into the freed slot.
        assert_eq!(
            ops,
            vec![
                json!({"op": "remove", "path": "/properties/address/properties/zip"}),
                json!({"op": "remove", "path": "/properties/address/properties/city"}),
                json!({"op": "remove", "path": "/properties/address"}),
                json!({"op": "move", "from": "/properties/name", "path": "/properties/address"}),
                json!({"op": "add", "path": "/properties/name", "value": {"type": "object", "properties": {}}}),
                json!({"op": "add", "path": "/properties/name/properties/city", "value": {"type": "string"}}),
                json!({"op": "add", "path": "/properties/name/properties/zip", "value": {"type": "string"}}),
            ]
        );
    }

    #[test]
    fn type_change_recreates_the_node() {
        let mut editor = base().edit();
        editor
            .set_kind(&"name".into(), schemata_tree::NodeKind::Number(Default::default()))
            .unwrap();
        let current = editor.finish().unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![
                json!({"op": "remove", "path": "/properties/name"}),
                json!({"op": "add", "path": "/properties/name", "value": {"type": "number"}}),
            ]
        );
    }

    #[test]
    fn root_type_change_replaces_everything() {
        let current = SchemaTree::new(
            "root",
            vec![SchemaNode::array("root", "item"), SchemaNode::boolean("item")],
        )
        .unwrap();
        assert_eq!(
            generate(&base(), &current),
            vec![json!({"op": "replace", "path": "", "value": {"type": "array", "items": {"type": "boolean"}}})]
        );
    }

    #[test]
    fn moved_and_modified_gets_a_replace() {
        let mut editor = base().edit();
        editor
            .rename_property(&"root".into(), "name", "label")
            .unwrap()
            .update_metadata(&"name".into(), |m| m.deprecated = true)
            .unwrap();
        let current = editor.finish().unwrap();
        let changes = diff_trees(&base(), &current).unwrap();
        let tree = base();

        let config = PatchConfig::default();
        let ops = PatchGenerator::new(&tree, &current, &changes, &config).generate().unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[1],
            PatchOperation::Replace {
                path: "/properties/label".into(),
                value: json!({"type": "string", "deprecated": true})
            }
        );

        let config = PatchConfig {
            replace_moved_content: false,
            ..Default::default()
        };
        let ops = PatchGenerator::new(&tree, &current, &changes, &config).generate().unwrap();
        assert_eq!(ops.len(), 1);
    }
}
