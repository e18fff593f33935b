//! Schema node types.
//!
//! A node's kind is a closed tagged variant. Comparison, serialization and
//! default-value derivation all match on [`NodeKind`] exhaustively, so adding
//! a kind is a compile error everywhere it needs handling.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use schemata_types::{NodeId, PathSegment};

/// The bare discriminant of a [`NodeKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Ref,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Object => "object",
            Self::Array => "array",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Ref => "ref",
        }
    }

    /// Object and array nodes carry children; the rest are leaves.
    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Object | Self::Array)
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive attributes shared by every node kind.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub deprecated: bool,
}

/// Own attributes of a string node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringConstraints {
    pub default: Option<String>,
    pub format: Option<String>,
    pub pattern: Option<String>,
}

impl StringConstraints {
    pub fn with_default(default: impl Into<String>) -> Self {
        Self {
            default: Some(default.into()),
            ..Default::default()
        }
    }
}

/// Own attributes of a number node.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NumberConstraints {
    pub default: Option<f64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl NumberConstraints {
    pub fn with_default(default: f64) -> Self {
        Self {
            default: Some(default),
            ..Default::default()
        }
    }
}

/// Own attributes of a boolean node.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BooleanConstraints {
    pub default: Option<bool>,
}

/// What a node is, together with its structural children.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeKind {
    /// Named properties; ordering is irrelevant, iteration is by name.
    Object {
        properties: BTreeMap<String, NodeId>,
    },
    /// Exactly one item schema.
    Array { items: NodeId },
    String(StringConstraints),
    Number(NumberConstraints),
    Boolean(BooleanConstraints),
    /// Reference to another schema by id.
    Ref { target: String },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            Self::Object { .. } => NodeType::Object,
            Self::Array { .. } => NodeType::Array,
            Self::String(_) => NodeType::String,
            Self::Number(_) => NodeType::Number,
            Self::Boolean(_) => NodeType::Boolean,
            Self::Ref { .. } => NodeType::Ref,
        }
    }

    /// Structural children in traversal order.
    pub fn children(&self) -> Vec<(PathSegment, &NodeId)> {
        match self {
            Self::Object { properties } => properties
                .iter()
                .map(|(name, id)| (PathSegment::Property(name.clone()), id))
                .collect(),
            Self::Array { items } => vec![(PathSegment::Items, items)],
            Self::String(_) | Self::Number(_) | Self::Boolean(_) | Self::Ref { .. } => Vec::new(),
        }
    }

    /// The child reached through `segment`, if any.
    pub fn child(&self, segment: &PathSegment) -> Option<&NodeId> {
        match (self, segment) {
            (Self::Object { properties }, PathSegment::Property(name)) => properties.get(name),
            (Self::Array { items }, PathSegment::Items) => Some(items),
            _ => None,
        }
    }
}

/// A node in a schema tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaNode {
    /// Stable identity, preserved across tree versions.
    pub id: NodeId,
    pub kind: NodeKind,
    #[serde(default)]
    pub metadata: NodeMetadata,
}

impl SchemaNode {
    pub fn new(id: impl Into<NodeId>, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            kind,
            metadata: NodeMetadata::default(),
        }
    }

    /// An object node with the given `(name, child id)` properties.
    pub fn object<I, S, T>(id: impl Into<NodeId>, properties: I) -> Self
    where
        I: IntoIterator<Item = (S, T)>,
        S: Into<String>,
        T: Into<NodeId>,
    {
        let properties = properties
            .into_iter()
            .map(|(name, child)| (name.into(), child.into()))
            .collect();
        Self::new(id, NodeKind::Object { properties })
    }

    /// An object node with no properties.
    pub fn empty_object(id: impl Into<NodeId>) -> Self {
        Self::new(
            id,
            NodeKind::Object {
                properties: BTreeMap::new(),
            },
        )
    }

    pub fn array(id: impl Into<NodeId>, items: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Array { items: items.into() })
    }

    pub fn string(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::String(StringConstraints::default()))
    }

    pub fn number(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Number(NumberConstraints::default()))
    }

    pub fn boolean(id: impl Into<NodeId>) -> Self {
        Self::new(id, NodeKind::Boolean(BooleanConstraints::default()))
    }

    pub fn reference(id: impl Into<NodeId>, target: impl Into<String>) -> Self {
        Self::new(
            id,
            NodeKind::Ref {
                target: target.into(),
            },
        )
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.metadata.deprecated = true;
        self
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn children(&self) -> Vec<(PathSegment, &NodeId)> {
        self.kind.children()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_children_are_name_ordered() {
        let node = SchemaNode::object("root", [("zeta", "z"), ("alpha", "a")]);
        let children: Vec<_> = node.children().into_iter().map(|(s, id)| (s, id.clone())).collect();
        assert_eq!(
            children,
            vec![
                (PathSegment::Property("alpha".into()), NodeId::from("a")),
                (PathSegment::Property("zeta".into()), NodeId::from("z")),
            ]
        );
    }

    #[test]
    fn array_has_single_items_child() {
        let node = SchemaNode::array("tags", "tag");
        assert_eq!(node.children().len(), 1);
        assert_eq!(node.kind.child(&PathSegment::Items), Some(&NodeId::from("tag")));
        assert_eq!(node.kind.child(&PathSegment::Property("items".into())), None);
    }

    #[test]
    fn leaves_have_no_children() {
        for node in [
            SchemaNode::string("s"),
            SchemaNode::number("n"),
            SchemaNode::boolean("b"),
            SchemaNode::reference("r", "other"),
        ] {
            assert!(node.children().is_empty());
            assert!(!node.node_type().is_composite());
        }
    }

    #[test]
    fn builder_methods_set_metadata() {
        let node = SchemaNode::string("name")
            .with_title("Name")
            .with_description("Full name")
            .deprecated();
        assert_eq!(node.metadata.title.as_deref(), Some("Name"));
        assert_eq!(node.metadata.description.as_deref(), Some("Full name"));
        assert!(node.metadata.deprecated);
    }

    #[test]
    fn node_type_display() {
        assert_eq!(NodeType::Object.to_string(), "object");
        assert_eq!(SchemaNode::reference("r", "x").node_type().to_string(), "ref");
    }

    #[test]
    fn serde_roundtrip() {
        let node = SchemaNode::new(
            "age",
            NodeKind::Number(NumberConstraints {
                default: Some(18.0),
                minimum: Some(0.0),
                maximum: None,
            }),
        )
        .with_title("Age");
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["kind"]["type"], "number");
        let parsed: SchemaNode = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }
}
