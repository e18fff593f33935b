//! Default-value data operations for schema additions.
//!
//! For every schema `add` that declares a data-bearing field, the enricher
//! appends an `add` against the data document so that existing instances
//! hold a valid value right after the patch. That covers brand-new nodes as
//! well as survivors the generator re-creates, for example after a type
//! change. Schema operations are never touched.

use serde_json::{Map, Number, Value};
use tracing::debug;

use schemata_tree::{NodeKind, Path, SchemaNode, SchemaTree};
use schemata_types::pointer;

use crate::builder::PatchBuilder;
use crate::error::{PatchError, PatchResult};
use crate::operation::PatchOperation;

pub struct PatchEnricher<'a> {
    current: &'a SchemaTree,
}

impl<'a> PatchEnricher<'a> {
    /// An enricher resolving schema paths against `current`.
    pub fn new(current: &'a SchemaTree) -> Self {
        Self { current }
    }

    /// Derive the data operations for `schema_ops`.
    ///
    /// Nodes under an array item schema have no single data location and are
    /// skipped, as are nodes whose data parent an earlier operation already
    /// initialised.
    pub fn enrich(&self, schema_ops: &[PatchOperation]) -> PatchResult<Vec<PatchOperation>> {
        let mut initialised: Vec<Vec<String>> = Vec::new();
        let mut data_ops = Vec::new();

        for op in schema_ops {
            let PatchOperation::Add { path, .. } = op else {
                continue;
            };
            let schema_path = Path::parse(path)?;
            let Some(data_path) = schema_path.data_pointer() else {
                continue;
            };
            let tokens = pointer::parse_pointer(&data_path)?;
            if initialised
                .iter()
                .any(|prefix| pointer::is_strict_prefix(prefix, &tokens))
            {
                continue;
            }
            let node = self.current.node_at(&schema_path)?;
            let Some(value) = self.default_value(node, &schema_path)? else {
                continue;
            };
            debug!(node = %node.id.short_id(), path = %data_path, "appending default value");
            data_ops.push(PatchBuilder::add(data_path, value)?);
            initialised.push(tokens);
        }
        Ok(data_ops)
    }

    /// The value a fresh instance holds for `node`, located at `path`, or
    /// `None` for purely structural objects.
    pub fn default_value(&self, node: &SchemaNode, path: &Path) -> PatchResult<Option<Value>> {
        let value = match &node.kind {
            NodeKind::String(c) => Value::String(c.default.clone().unwrap_or_default()),
            NodeKind::Number(c) => match c.default {
                None => Value::from(0),
                Some(d) => Number::from_f64(d)
                    .map(Value::Number)
                    .ok_or_else(|| enrichment_error(path, format!("default {d} is not a finite number")))?,
            },
            NodeKind::Boolean(c) => Value::Bool(c.default.unwrap_or(false)),
            NodeKind::Array { .. } => Value::Array(Vec::new()),
            NodeKind::Object { properties } => {
                let mut map = Map::new();
                for (name, child) in properties {
                    let child = self.current.node_by_id(child)?;
                    if let Some(value) = self.default_value(child, &path.property(name.clone()))? {
                        map.insert(name.clone(), value);
                    }
                }
                if map.is_empty() {
                    return Ok(None);
                }
                Value::Object(map)
            }
            NodeKind::Ref { target } => {
                return Err(enrichment_error(
                    path,
                    format!("reference to {target:?} has no derivable default"),
                ));
            }
        };
        Ok(Some(value))
    }
}

fn enrichment_error(path: &Path, reason: String) -> PatchError {
    PatchError::Enrichment {
        path: path.to_pointer(),
        reason,
    }
}
