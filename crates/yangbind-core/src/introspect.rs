//! Field and node introspection
//!
//! Helpers that answer structural questions about schema and data nodes
//! without touching values: what shape a resolved node has, which field of
//! a container a schema name maps to, and what name a field serializes
//! under.

use std::fmt;

use crate::path::strip_module_prefix;
use crate::schema::{NodeKind, SchemaNode};

/// Shape of a resolved node reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeShape {
    /// A container (or the tree root)
    Container,
    /// One keyed list entry
    Entry,
    /// A list addressed without its complete keys
    Collection,
    Leaf,
    LeafList,
}

impl NodeShape {
    /// Shape of a node of `kind`; `keyed` says whether a list was pinned to one entry
    pub fn of(kind: NodeKind, keyed: bool) -> Self {
        match (kind, keyed) {
            (NodeKind::Container, _) => NodeShape::Container,
            (NodeKind::List, true) => NodeShape::Entry,
            (NodeKind::List, false) => NodeShape::Collection,
            (NodeKind::Leaf, _) => NodeShape::Leaf,
            (NodeKind::LeafList, _) => NodeShape::LeafList,
        }
    }

    pub fn is_leaf_like(&self) -> bool {
        matches!(self, NodeShape::Leaf | NodeShape::LeafList)
    }

    pub fn is_collection(&self) -> bool {
        matches!(self, NodeShape::Collection)
    }

    /// Containers and entries hold child fields a payload object decodes into
    pub fn has_fields(&self) -> bool {
        matches!(self, NodeShape::Container | NodeShape::Entry)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeShape::Container => "container",
            NodeShape::Entry => "entry",
            NodeShape::Collection => "collection",
            NodeShape::Leaf => "leaf",
            NodeShape::LeafList => "leaf-list",
        }
    }
}

impl fmt::Display for NodeShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field index on `parent` whose schema name matches `schema_name`
///
/// The name may carry a module prefix. When several fields share a name the
/// first declared one is returned.
pub fn field_for(parent: &SchemaNode, schema_name: &str) -> Option<usize> {
    parent.field_index(strip_module_prefix(schema_name))
}

/// Whether a node of this shape is checked structurally before GET/DELETE
pub fn requires_precondition(shape: NodeShape) -> bool {
    !shape.is_leaf_like()
}

/// JSON member name for `child` written inside a node owned by `parent_module`
///
/// With qualification on, the name carries its module whenever the module
/// differs from the enclosing one, so top-level fields are always qualified.
pub fn serialization_name(child: &SchemaNode, parent_module: &str, module_qualify: bool) -> String {
    if module_qualify && child.module() != parent_module {
        child.qualified_name()
    } else {
        child.name().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeafType, Schema};

    fn schema() -> Schema {
        Schema::new([SchemaNode::container("top").in_module("m").with_children([
            SchemaNode::leaf("a", LeafType::String),
            SchemaNode::leaf("b", LeafType::String).in_module("aug"),
        ])])
        .unwrap()
    }

    #[test]
    fn test_shape_of() {
        assert_eq!(NodeShape::of(NodeKind::List, false), NodeShape::Collection);
        assert_eq!(NodeShape::of(NodeKind::List, true), NodeShape::Entry);
        assert_eq!(NodeShape::of(NodeKind::Container, true), NodeShape::Container);
        assert!(NodeShape::LeafList.is_leaf_like());
        assert!(!NodeShape::Collection.has_fields());
    }

    #[test]
    fn test_field_for_strips_prefix() {
        let schema = schema();
        let top = schema.root().child(0).unwrap();
        assert_eq!(field_for(top, "m:a"), Some(0));
        assert_eq!(field_for(top, "b"), Some(1));
        assert_eq!(field_for(top, "c"), None);
    }

    #[test]
    fn test_serialization_name_qualifies_on_module_change() {
        let schema = schema();
        let top = schema.root().child(0).unwrap();
        assert_eq!(serialization_name(top, "", true), "m:top");
        assert_eq!(serialization_name(top.child(0).unwrap(), "m", true), "a");
        assert_eq!(serialization_name(top.child(1).unwrap(), "m", true), "aug:b");
        assert_eq!(serialization_name(top.child(1).unwrap(), "m", false), "b");
    }

    #[test]
    fn test_leaf_like_skip_precondition() {
        assert!(!requires_precondition(NodeShape::Leaf));
        assert!(requires_precondition(NodeShape::Collection));
    }
}
