//! Payload decoding into bound nodes
//!
//! The binder hands a payload and a resolved [`NodeRef`] to a
//! [`PayloadCodec`]; the codec merges the payload into the tree at that
//! node. [`JsonCodec`] reads RFC 7951 style JSON:
//!
//! - container and list entry targets take an object of their fields
//! - collection targets take an array of entries, bare or wrapped as
//!   `{"list-name": [...]}`
//! - leaf and leaf-list targets take `{"leaf-name": value}`
//!
//! Member names may carry a `module:` prefix. Decoding merges: fields the
//! payload does not mention keep their current values.

use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::debug;

use crate::errors::{BindError, Result};
use crate::introspect::NodeShape;
use crate::path::strip_module_prefix;
use crate::schema::{NodeKind, SchemaNode};
use crate::tree::{Container, DataNode, DataTree, List, ListKey, NodeRef, SlotMut};

/// Decodes request payloads into a data tree
pub trait PayloadCodec: Send + Sync {
    /// Short codec name for logs
    fn name(&self) -> &'static str;

    /// Merge `payload` into `tree` at `node`
    ///
    /// # Errors
    ///
    /// Returns `InvalidPayload`-kind errors when the payload is empty, not
    /// well-formed, names unknown fields or carries ill-typed values.
    fn decode(&self, payload: &[u8], tree: &mut DataTree, node: &NodeRef) -> Result<()>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn name(&self) -> &'static str {
        "json"
    }

    fn decode(&self, payload: &[u8], tree: &mut DataTree, node: &NodeRef) -> Result<()> {
        if payload.is_empty() {
            return Err(malformed("payload is empty"));
        }
        let value: Value =
            serde_json::from_slice(payload).map_err(|e| malformed(e.to_string()))?;

        let schema = Arc::clone(tree.schema());
        let target = schema
            .node_at(&node.schema_indices())
            .ok_or_else(|| BindError::InternalSchema {
                message: format!("no schema node for {}", node.path()),
            })?;
        let slot = tree.slot_mut(node).ok_or_else(|| BindError::NotFound {
            path: node.path().to_string(),
        })?;

        match (node.shape(), slot) {
            (NodeShape::Container | NodeShape::Entry, SlotMut::Container(c)) => {
                decode_object(c, target, as_object(&value, target)?)?
            }
            (NodeShape::Container | NodeShape::Entry, SlotMut::Field(slot)) => {
                decode_field(slot, target, &value)?
            }
            (NodeShape::Collection, SlotMut::Field(slot)) => {
                let items = match &value {
                    Value::Array(_) => &value,
                    other => wrapped(other, target)?,
                };
                decode_field(slot, target, items)?
            }
            (NodeShape::Leaf | NodeShape::LeafList, SlotMut::Field(slot)) => {
                decode_field(slot, target, wrapped(&value, target)?)?
            }
            (shape, SlotMut::Container(_)) => {
                return Err(BindError::InternalSchema {
                    message: format!("{} target at {} resolved to a container", shape, node.path()),
                })
            }
        }

        debug!(
            codec = self.name(),
            path = %node.path(),
            bytes = payload.len(),
            "decoded payload"
        );
        Ok(())
    }
}

fn malformed(reason: impl Into<String>) -> BindError {
    BindError::MalformedPayload {
        reason: reason.into(),
    }
}

fn display_name(schema: &SchemaNode) -> &str {
    if schema.name().is_empty() {
        "/"
    } else {
        schema.name()
    }
}

fn as_object<'v>(value: &'v Value, schema: &SchemaNode) -> Result<&'v Map<String, Value>> {
    value.as_object().ok_or_else(|| {
        malformed(format!("expected an object for '{}'", display_name(schema)))
    })
}

fn as_array<'v>(value: &'v Value, schema: &SchemaNode) -> Result<&'v Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| malformed(format!("expected an array for '{}'", schema.name())))
}

/// Member whose name, prefix stripped, equals `name`
fn member<'v>(obj: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    obj.iter()
        .find(|(k, _)| strip_module_prefix(k) == name)
        .map(|(_, v)| v)
}

/// The value of a `{"name": value}` wrapper object
fn wrapped<'v>(value: &'v Value, schema: &SchemaNode) -> Result<&'v Value> {
    let obj = as_object(value, schema)?;
    if let Some((extra, _)) = obj
        .iter()
        .find(|(k, _)| strip_module_prefix(k) != schema.name())
    {
        return Err(BindError::UnknownField {
            node: schema.name().to_string(),
            field: extra.clone(),
        });
    }
    member(obj, schema.name())
        .ok_or_else(|| malformed(format!("expected member '{}'", schema.name())))
}

fn decode_object(
    container: &mut Container,
    schema: &SchemaNode,
    obj: &Map<String, Value>,
) -> Result<()> {
    for (name, value) in obj {
        let (idx, child) = schema
            .child_by_name(strip_module_prefix(name))
            .ok_or_else(|| BindError::UnknownField {
                node: display_name(schema).to_string(),
                field: name.clone(),
            })?;
        decode_field(container.slot_mut(idx), child, value)?;
    }
    Ok(())
}

fn mismatch(schema: &SchemaNode) -> BindError {
    BindError::InternalSchema {
        message: format!("stored data for '{}' does not match its schema", schema.name()),
    }
}

fn decode_field(slot: &mut Option<DataNode>, schema: &SchemaNode, value: &Value) -> Result<()> {
    match schema.kind() {
        NodeKind::Container => {
            let obj = as_object(value, schema)?;
            let DataNode::Container(c) =
                slot.get_or_insert_with(|| DataNode::Container(Container::new(schema)))
            else {
                return Err(mismatch(schema));
            };
            decode_object(c, schema, obj)
        }
        NodeKind::List => {
            let items = as_array(value, schema)?;
            let DataNode::List(list) = slot.get_or_insert_with(|| DataNode::List(List::default()))
            else {
                return Err(mismatch(schema));
            };
            for item in items {
                let obj = as_object(item, schema)?;
                let key = entry_key(schema, obj)?;
                let entry = list.entry_or_insert_with(key, || Container::new(schema));
                decode_object(entry, schema, obj)?;
            }
            Ok(())
        }
        NodeKind::Leaf => {
            let leaf_type = schema.leaf_type().ok_or_else(|| mismatch(schema))?;
            *slot = Some(DataNode::Leaf(leaf_type.from_json(schema.name(), value)?));
            Ok(())
        }
        NodeKind::LeafList => {
            let leaf_type = schema.leaf_type().ok_or_else(|| mismatch(schema))?;
            let items = as_array(value, schema)?;
            let DataNode::LeafList(values) = slot.get_or_insert_with(|| DataNode::LeafList(Vec::new()))
            else {
                return Err(mismatch(schema));
            };
            for item in items {
                let typed = leaf_type.from_json(schema.name(), item)?;
                if !values.contains(&typed) {
                    values.push(typed);
                }
            }
            Ok(())
        }
    }
}

/// Canonical key of a payload list entry
fn entry_key(list: &SchemaNode, obj: &Map<String, Value>) -> Result<ListKey> {
    list.keys()
        .iter()
        .map(|name| {
            let raw = member(obj, name).ok_or_else(|| {
                malformed(format!(
                    "entry of list '{}' is missing key '{}'",
                    list.name(),
                    name
                ))
            })?;
            let leaf_type = list
                .child_by_name(name)
                .and_then(|(_, leaf)| leaf.leaf_type())
                .ok_or_else(|| mismatch(list))?;
            Ok(leaf_type.from_json(name, raw)?.to_string())
        })
        .collect()
}
