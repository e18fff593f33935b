//! JSON Schema-shaped documents.
//!
//! A tree exports to, and imports from, a plain `serde_json::Value` in the
//! familiar JSON Schema layout. Patch operations address this document with
//! schema pointers (`/properties/<name>`, `/items`), so export and import
//! are the bridge between a [`SchemaTree`] and the JSON-Patch world.
//!
//! Node ids are not part of the document. Importing mints fresh ids.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use schemata_types::{NodeId, Path, PathSegment};

use crate::error::{TreeError, TreeResult};
use crate::node::{
    BooleanConstraints, NodeKind, NodeMetadata, NumberConstraints, SchemaNode, StringConstraints,
};
use crate::tree::SchemaTree;

const TYPE: &str = "type";
const REF: &str = "$ref";
const PROPERTIES: &str = "properties";
const ITEMS: &str = "items";

impl SchemaTree {
    /// Export the whole tree.
    pub fn to_document(&self) -> Value {
        // The root is always present, so this cannot fail.
        self.subtree_document(self.root_id()).unwrap_or(Value::Null)
    }

    /// Export one node together with its subtree.
    pub fn subtree_document(&self, id: &NodeId) -> TreeResult<Value> {
        let node = self.node_by_id(id)?;
        let mut doc = declaration(node);
        match &node.kind {
            NodeKind::Object { properties } => {
                let mut map = Map::new();
                for (name, child) in properties {
                    map.insert(name.clone(), self.subtree_document(child)?);
                }
                doc.insert(PROPERTIES.into(), Value::Object(map));
            }
            NodeKind::Array { items } => {
                doc.insert(ITEMS.into(), self.subtree_document(items)?);
            }
            NodeKind::String(_) | NodeKind::Number(_) | NodeKind::Boolean(_) | NodeKind::Ref { .. } => {}
        }
        Ok(Value::Object(doc))
    }

    /// Export one node without its children.
    ///
    /// Objects carry an empty `properties` map and arrays carry no `items`,
    /// so the children can be added one by one afterwards.
    pub fn node_declaration(&self, id: &NodeId) -> TreeResult<Value> {
        let node = self.node_by_id(id)?;
        let mut doc = declaration(node);
        if let NodeKind::Object { .. } = node.kind {
            doc.insert(PROPERTIES.into(), Value::Object(Map::new()));
        }
        Ok(Value::Object(doc))
    }

    /// Import a document, minting a fresh id for every node.
    pub fn from_document(document: &Value) -> TreeResult<Self> {
        let mut nodes = HashMap::new();
        let root = import(document, &Path::root(), &mut nodes)?;
        Self::from_map(root, nodes)
    }
}

/// The node's own attributes, without any children.
fn declaration(node: &SchemaNode) -> Map<String, Value> {
    let mut doc = Map::new();
    match &node.kind {
        NodeKind::Object { .. } => {
            doc.insert(TYPE.into(), json!("object"));
        }
        NodeKind::Array { .. } => {
            doc.insert(TYPE.into(), json!("array"));
        }
        NodeKind::String(c) => {
            doc.insert(TYPE.into(), json!("string"));
            insert_some(&mut doc, "default", c.default.as_ref().map(|d| json!(d)));
            insert_some(&mut doc, "format", c.format.as_ref().map(|f| json!(f)));
            insert_some(&mut doc, "pattern", c.pattern.as_ref().map(|p| json!(p)));
        }
        NodeKind::Number(c) => {
            doc.insert(TYPE.into(), json!("number"));
            insert_some(&mut doc, "default", c.default.map(Value::from));
            insert_some(&mut doc, "minimum", c.minimum.map(Value::from));
            insert_some(&mut doc, "maximum", c.maximum.map(Value::from));
        }
        NodeKind::Boolean(c) => {
            doc.insert(TYPE.into(), json!("boolean"));
            insert_some(&mut doc, "default", c.default.map(Value::from));
        }
        NodeKind::Ref { target } => {
            doc.insert(REF.into(), json!(target));
        }
    }
    let meta = &node.metadata;
    insert_some(&mut doc, "title", meta.title.as_ref().map(|t| json!(t)));
    insert_some(&mut doc, "description", meta.description.as_ref().map(|d| json!(d)));
    if meta.deprecated {
        doc.insert("deprecated".into(), Value::Bool(true));
    }
    doc
}

fn insert_some(doc: &mut Map<String, Value>, key: &str, value: Option<Value>) {
    if let Some(value) = value {
        doc.insert(key.into(), value);
    }
}

// ---------------------------------------------------------------
// Import
// ---------------------------------------------------------------

fn invalid(path: &Path, reason: impl Into<String>) -> TreeError {
    TreeError::InvalidDocument {
        path: path.to_pointer(),
        reason: reason.into(),
    }
}

fn import(value: &Value, path: &Path, nodes: &mut HashMap<NodeId, SchemaNode>) -> TreeResult<NodeId> {
    let Value::Object(doc) = value else {
        return Err(invalid(path, "declaration must be an object"));
    };

    let kind = if let Some(target) = doc.get(REF) {
        let target = target
            .as_str()
            .ok_or_else(|| invalid(path, "$ref must be a string"))?;
        NodeKind::Ref {
            target: target.to_string(),
        }
    } else {
        let ty = doc
            .get(TYPE)
            .and_then(Value::as_str)
            .ok_or_else(|| invalid(path, "missing type"))?;
        match ty {
            "object" => {
                let mut properties = std::collections::BTreeMap::new();
                match doc.get(PROPERTIES) {
                    None => {}
                    Some(Value::Object(props)) => {
                        for (name, child) in props {
                            let id = import(child, &path.property(name.clone()), nodes)?;
                            properties.insert(name.clone(), id);
                        }
                    }
                    Some(_) => return Err(invalid(path, "properties must be an object")),
                }
                NodeKind::Object { properties }
            }
            "array" => {
                let items = doc
                    .get(ITEMS)
                    .ok_or_else(|| invalid(path, "array without items"))?;
                NodeKind::Array {
                    items: import(items, &path.child(PathSegment::Items), nodes)?,
                }
            }
            "string" => NodeKind::String(StringConstraints {
                default: opt_string(doc, "default", path)?,
                format: opt_string(doc, "format", path)?,
                pattern: opt_string(doc, "pattern", path)?,
            }),
            "number" | "integer" => NodeKind::Number(NumberConstraints {
                default: opt_number(doc, "default", path)?,
                minimum: opt_number(doc, "minimum", path)?,
                maximum: opt_number(doc, "maximum", path)?,
            }),
            "boolean" => NodeKind::Boolean(BooleanConstraints {
                default: match doc.get("default") {
                    None => None,
                    Some(Value::Bool(b)) => Some(*b),
                    Some(_) => return Err(invalid(path, "default must be a boolean")),
                },
            }),
            other => return Err(invalid(path, format!("unknown type {other:?}"))),
        }
    };

    let metadata = NodeMetadata {
        title: opt_string(doc, "title", path)?,
        description: opt_string(doc, "description", path)?,
        deprecated: match doc.get("deprecated") {
            None => false,
            Some(Value::Bool(b)) => *b,
            Some(_) => return Err(invalid(path, "deprecated must be a boolean")),
        },
    };

    let id = NodeId::generate();
    nodes.insert(
        id.clone(),
        SchemaNode {
            id: id.clone(),
            kind,
            metadata,
        },
    );
    Ok(id)
}

fn opt_string(doc: &Map<String, Value>, key: &str, path: &Path) -> TreeResult<Option<String>> {
    match doc.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(invalid(path, format!("{key} must be a string"))),
    }
}

fn opt_number(doc: &Map<String, Value>, key: &str, path: &Path) -> TreeResult<Option<f64>> {
    match doc.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| invalid(path, format!("{key} must be a number"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> SchemaTree {
        SchemaTree::new(
            "root",
            vec![
                SchemaNode::object("root", [("name", "name"), ("tags", "tags"), ("owner", "owner")])
                    .with_title("Profile"),
                SchemaNode::new("name", NodeKind::String(StringConstraints::with_default("anon")))
                    .with_description("Display name"),
                SchemaNode::array("tags", "tag"),
                SchemaNode::string("tag"),
                SchemaNode::reference("owner", "user").deprecated(),
            ],
        )
        .unwrap()
    }

    #[test]
    fn export_uses_json_schema_layout() {
        let doc = profile().to_document();
        assert_eq!(
            doc,
            json!({
                "type": "object",
                "title": "Profile",
                "properties": {
                    "name": {"type": "string", "default": "anon", "description": "Display name"},
                    "tags": {"type": "array", "items": {"type": "string"}},
                    "owner": {"$ref": "user", "deprecated": true}
                }
            })
        );
    }

    #[test]
    fn declarations_are_shallow() {
        let tree = profile();
        assert_eq!(
            tree.node_declaration(&"root".into()).unwrap(),
            json!({"type": "object", "title": "Profile", "properties": {}})
        );
        assert_eq!(tree.node_declaration(&"tags".into()).unwrap(), json!({"type": "array"}));
        assert!(tree.node_declaration(&"ghost".into()).unwrap_err().is_not_found());
    }

    #[test]
    fn import_then_export_is_stable() {
        let doc = profile().to_document();
        let imported = SchemaTree::from_document(&doc).unwrap();
        assert_eq!(imported.count_nodes(), 5);
        assert_eq!(imported.to_document(), doc);
        let tag = imported.node_at(&Path::root().property("tags").items()).unwrap();
        assert_eq!(tag.node_type().as_str(), "string");
    }

    #[test]
    fn import_accepts_integer_and_missing_properties() {
        let tree = SchemaTree::from_document(&json!({
            "type": "object",
            "properties": {
                "age": {"type": "integer", "minimum": 0},
                "extra": {"type": "object"}
            }
        }))
        .unwrap();
        let age = tree.node_at(&Path::root().property("age")).unwrap();
        assert_eq!(
            age.kind,
            NodeKind::Number(NumberConstraints {
                default: None,
                minimum: Some(0.0),
                maximum: None
            })
        );
        assert_eq!(tree.count_nodes(), 3);
    }

    #[test]
    fn malformed_documents_report_their_location() {
        let cases = [
            (json!("string"), ""),
            (json!({"type": "object", "properties": {"a": {"type": "tuple"}}}), "/properties/a"),
            (json!({"type": "array"}), ""),
            (json!({"type": "object", "properties": {"l": {"type": "array", "items": 3}}}), "/properties/l/items"),
            (json!({"$ref": 7}), ""),
            (json!({"type": "boolean", "default": "yes"}), ""),
            (json!({"type": "string", "title": 1}), ""),
        ];
        for (doc, expected) in cases {
            match SchemaTree::from_document(&doc).unwrap_err() {
                TreeError::InvalidDocument { path, .. } => assert_eq!(path, expected, "{doc}"),
                other => panic!("unexpected error {other:?}"),
            }
        }
    }
}
