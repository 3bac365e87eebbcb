//! JSON emission of schema-typed data
//!
//! Output follows RFC 7951 conventions: member names are qualified with
//! their module where the module changes (always at the top level), lists
//! are arrays of entry objects in key order, and empty containers, lists
//! and leaf-lists are left out.

use serde_json::{Map, Value};

use crate::errors::{BindError, Result};
use crate::introspect::serialization_name;
use crate::schema::{NodeKind, SchemaNode};
use crate::tree::{validate_subtree, Container, DataNode, DataTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmitOptions {
    /// Skip the structural check of the data before emitting
    pub skip_validation: bool,
    pub module_qualify: bool,
    /// Indented output; compact otherwise
    pub pretty: bool,
}

impl Default for EmitOptions {
    fn default() -> Self {
        Self {
            skip_validation: false,
            module_qualify: true,
            pretty: true,
        }
    }
}

/// Emit a container's fields as a JSON object
///
/// `schema` is the container's own schema node; its fields are named
/// relative to its module.
///
/// # Errors
///
/// Returns validation errors unless `skip_validation` is set,
/// `InternalSchema` when stored data disagrees with the schema, and
/// `Serialization` if the JSON text cannot be produced.
pub fn emit_container(schema: &SchemaNode, container: &Container, options: &EmitOptions) -> Result<String> {
    if !options.skip_validation {
        validate_subtree(schema, container)?;
    }
    let object = Value::Object(container_json(container, schema, options.module_qualify)?);
    let text = if options.pretty {
        serde_json::to_string_pretty(&object)
    } else {
        serde_json::to_string(&object)
    };
    text.map_err(|e| BindError::Serialization {
        message: e.to_string(),
    })
}

/// Emit a whole tree from its root
///
/// # Errors
///
/// Same as [`emit_container`].
pub fn emit_tree(tree: &DataTree, options: &EmitOptions) -> Result<String> {
    emit_container(tree.schema().root(), tree.root(), options)
}

/// A container's fields as a JSON object, empty fields left out
///
/// # Errors
///
/// Returns `InternalSchema` when stored data disagrees with the schema.
pub fn container_json(container: &Container, schema: &SchemaNode, module_qualify: bool) -> Result<Map<String, Value>> {
    let mut out = Map::new();
    for (idx, node) in container.fields() {
        let child = schema.child(idx).ok_or_else(|| BindError::InternalSchema {
            message: format!("'{}' has no field at slot {}", schema.name(), idx),
        })?;
        if let Some(value) = node_json(node, child, module_qualify)? {
            out.insert(serialization_name(child, schema.module(), module_qualify), value);
        }
    }
    Ok(out)
}

fn node_json(node: &DataNode, schema: &SchemaNode, module_qualify: bool) -> Result<Option<Value>> {
    let value = match (schema.kind(), node) {
        (NodeKind::Container, DataNode::Container(c)) => {
            let obj = container_json(c, schema, module_qualify)?;
            (!obj.is_empty()).then_some(Value::Object(obj))
        }
        (NodeKind::List, DataNode::List(list)) => {
            let entries = list
                .iter()
                .map(|(_, entry)| container_json(entry, schema, module_qualify).map(Value::Object))
                .collect::<Result<Vec<_>>>()?;
            (!entries.is_empty()).then_some(Value::Array(entries))
        }
        (NodeKind::Leaf, DataNode::Leaf(v)) => Some(v.to_json()),
        (NodeKind::LeafList, DataNode::LeafList(values)) => (!values.is_empty())
            .then(|| Value::Array(values.iter().map(|v| v.to_json()).collect())),
        (kind, other) => {
            return Err(BindError::InternalSchema {
                message: format!(
                    "'{}' stores a {:?} where the schema declares a {:?}",
                    schema.name(),
                    other.kind(),
                    kind
                ),
            })
        }
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::codec::{JsonCodec, PayloadCodec};
    use crate::path::Path;
    use crate::schema::{LeafType, Schema};

    fn compact() -> EmitOptions {
        EmitOptions {
            pretty: false,
            ..EmitOptions::default()
        }
    }

    fn tree() -> DataTree {
        let schema = Schema::new([SchemaNode::container("top").in_module("m").with_children([
            SchemaNode::list("item", &["id"]).with_children([
                SchemaNode::leaf("id", LeafType::uint16()),
                SchemaNode::container("state").with_child(SchemaNode::leaf("up", LeafType::Boolean)),
            ]),
            SchemaNode::leaf("note", LeafType::String).in_module("aug"),
        ])])
        .unwrap();
        DataTree::new(Arc::new(schema))
    }

    #[test]
    fn test_emit_qualifies_on_module_change() {
        let mut tree = tree();
        let top = tree.get_or_create_node(&Path::parse("/top")).unwrap();
        JsonCodec
            .decode(br#"{"item": [{"id": 2}, {"id": 1}], "aug:note": "hi"}"#, &mut tree, &top)
            .unwrap();

        assert_eq!(
            emit_tree(&tree, &compact()).unwrap(),
            r#"{"m:top":{"aug:note":"hi","item":[{"id":1},{"id":2}]}}"#
        );

        let plain = EmitOptions {
            module_qualify: false,
            pretty: false,
            ..EmitOptions::default()
        };
        assert_eq!(
            emit_tree(&tree, &plain).unwrap(),
            r#"{"top":{"item":[{"id":1},{"id":2}],"note":"hi"}}"#
        );
    }

    #[test]
    fn test_empty_containers_omitted() {
        let mut tree = tree();
        tree.get_or_create_node(&Path::parse("/top/item[id=1]/state"))
            .unwrap();
        assert_eq!(
            emit_tree(&tree, &compact()).unwrap(),
            r#"{"m:top":{"item":[{"id":1}]}}"#
        );

        let empty = DataTree::new(Arc::clone(tree.schema()));
        assert_eq!(emit_tree(&empty, &EmitOptions::default()).unwrap(), "{}");
    }
}
