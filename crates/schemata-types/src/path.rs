//! Structured paths into a schema tree.
//!
//! A [`Path`] locates a node by walking from the root: a
//! [`PathSegment::Property`] descends into an object property, and
//! [`PathSegment::Items`] descends into an array's item schema.
//!
//! Paths render to two pointer forms:
//!
//! - the **schema pointer**, addressing the node's declaration inside the
//!   exported schema document (`/properties/address/properties/city`);
//! - the **data pointer**, addressing the value that node describes inside a
//!   data instance (`/address/city`). Paths through `Items` have no data
//!   pointer, since an item schema describes every element at once.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PathError;
use crate::pointer;

const PROPERTIES: &str = "properties";
const ITEMS: &str = "items";

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PathSegment {
    /// Descend into the named property of an object node.
    Property(String),
    /// Descend into the item schema of an array node.
    Items,
}

impl PathSegment {
    /// The property name, if this is a property segment.
    pub fn property_name(&self) -> Option<&str> {
        match self {
            Self::Property(name) => Some(name),
            Self::Items => None,
        }
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => write!(f, "{PROPERTIES}/{}", pointer::escape_token(name)),
            Self::Items => f.write_str(ITEMS),
        }
    }
}

/// Location of a node inside a schema tree.
///
/// Two paths are equal iff their segment sequences are equal element-wise.
/// The root path has no segments.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` for the root path.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn is_root(&self) -> bool {
        self.is_empty()
    }

    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    /// A new path extended by one segment.
    pub fn child(&self, segment: PathSegment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    pub fn property(&self, name: impl Into<String>) -> Self {
        self.child(PathSegment::Property(name.into()))
    }

    pub fn items(&self) -> Self {
        self.child(PathSegment::Items)
    }

    /// The enclosing path, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, init) = self.segments.split_last()?;
        Some(Self {
            segments: init.to_vec(),
        })
    }

    /// Returns `true` if `self` is a direct child of `other`.
    pub fn is_child_of(&self, other: &Path) -> bool {
        self.len() == other.len() + 1 && self.starts_with(other)
    }

    /// Returns `true` if `prefix` equals `self` or is an ancestor of it.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.segments.starts_with(&prefix.segments)
    }

    /// Render as a schema-document pointer.
    pub fn to_pointer(&self) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            out.push('/');
            out.push_str(&segment.to_string());
        }
        out
    }

    /// Render as a data-instance pointer, if the path addresses a single value.
    pub fn data_pointer(&self) -> Option<String> {
        let names = self
            .segments
            .iter()
            .map(PathSegment::property_name)
            .collect::<Option<Vec<_>>>()?;
        Some(pointer::format_pointer(names))
    }

    /// Parse a schema-document pointer.
    pub fn parse(schema_pointer: &str) -> Result<Self, PathError> {
        let tokens = pointer::parse_pointer(schema_pointer)?;
        let mut segments = Vec::with_capacity(tokens.len() / 2 + 1);
        let mut iter = tokens.into_iter().enumerate();
        while let Some((position, token)) = iter.next() {
            if token == PROPERTIES {
                let Some((_, name)) = iter.next() else {
                    return Err(PathError::MissingPropertyName(schema_pointer.to_string()));
                };
                segments.push(PathSegment::Property(name));
            } else if token == ITEMS {
                segments.push(PathSegment::Items);
            } else {
                return Err(PathError::UnexpectedToken {
                    pointer: schema_pointer.to_string(),
                    token,
                    position,
                });
            }
        }
        Ok(Self { segments })
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str("/");
        }
        f.write_str(&self.to_pointer())
    }
}

impl FromStr for Path {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Self::from_segments(segments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_city() -> Path {
        Path::root().property("address").property("city")
    }

    #[test]
    fn schema_pointer_form() {
        assert_eq!(Path::root().to_pointer(), "");
        assert_eq!(address_city().to_pointer(), "/properties/address/properties/city");
        assert_eq!(
            Path::root().property("tags").items().to_pointer(),
            "/properties/tags/items"
        );
    }

    #[test]
    fn property_names_are_escaped() {
        let path = Path::root().property("a/b").property("c~d");
        assert_eq!(path.to_pointer(), "/properties/a~1b/properties/c~0d");
        assert_eq!(Path::parse(&path.to_pointer()).unwrap(), path);
    }

    #[test]
    fn parse_inverts_to_pointer() {
        let path = Path::root()
            .property("items")
            .items()
            .property("properties");
        assert_eq!(Path::parse(&path.to_pointer()).unwrap(), path);
        assert_eq!(Path::parse("").unwrap(), Path::root());
    }

    #[test]
    fn parse_rejects_foreign_tokens() {
        assert!(matches!(
            Path::parse("/definitions/x"),
            Err(PathError::UnexpectedToken { position: 0, .. })
        ));
        assert!(matches!(
            Path::parse("/properties"),
            Err(PathError::MissingPropertyName(_))
        ));
        assert!(matches!(Path::parse("properties/a"), Err(PathError::NotAbsolute(_))));
    }

    #[test]
    fn data_pointer_form() {
        assert_eq!(address_city().data_pointer().as_deref(), Some("/address/city"));
        assert_eq!(Path::root().data_pointer().as_deref(), Some(""));
        assert_eq!(Path::root().property("tags").items().data_pointer(), None);
    }

    #[test]
    fn parent_and_child_relations() {
        let city = address_city();
        let address = city.parent().unwrap();
        assert_eq!(address, Path::root().property("address"));
        assert!(city.is_child_of(&address));
        assert!(!city.is_child_of(&Path::root()));
        assert!(city.starts_with(&Path::root()));
        assert!(city.starts_with(&city));
        assert_eq!(Path::root().parent(), None);
        assert_eq!(city.len(), 2);
    }

    #[test]
    fn equality_is_segment_wise() {
        assert_eq!(address_city(), Path::root().property("address").property("city"));
        assert_ne!(address_city(), Path::root().property("city"));
        assert_ne!(Path::root().items(), Path::root().property("items"));
    }

    #[test]
    fn display_shows_root_as_slash() {
        assert_eq!(Path::root().to_string(), "/");
        assert_eq!(address_city().to_string(), "/properties/address/properties/city");
    }
}
