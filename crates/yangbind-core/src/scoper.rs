//! Response scoping
//!
//! A GET response is rendered as the target's parent with only the target
//! field populated. The parent's type is preserved, so the document has the
//! same shape a full emission of the parent would have, minus every sibling
//! of the target:
//!
//! ```text
//! GET /acl/acl-sets/acl-set[name=A][type=ACL_IPV4]/acl-entries
//! → {"openconfig-acl:acl-entries":{"acl-entry":[...]}}
//! ```

use tracing::debug;

use crate::emit::{emit_container, EmitOptions};
use crate::errors::{BindError, Result};
use crate::introspect::{field_for, NodeShape};
use crate::path::Path;
use crate::schema::SchemaNode;
use crate::tree::{matching_entries, Container, DataNode, DataTree, List, NodeRef, NodeView};

/// Render the data at `target_path` scoped to its parent, as compact JSON
///
/// # Errors
///
/// See [`render_scoped_with`].
pub fn render_scoped(tree: &DataTree, target_path: &str) -> Result<Vec<u8>> {
    render_scoped_with(tree, target_path, true)
}

/// Render with explicit module qualification
///
/// # Errors
///
/// - `InvalidPath` when the path is empty or its parent is not a container
///   or a single list entry
/// - `InvalidPath`-kind errors when the path does not resolve
/// - `NotFound` when no data exists at the target
/// - `InternalSchema` when the target has no field on its parent's schema
pub fn render_scoped_with(tree: &DataTree, target_path: &str, module_qualify: bool) -> Result<Vec<u8>> {
    let target_path = Path::parse(target_path);
    if target_path.is_empty() {
        return Err(BindError::InvalidPath {
            path: target_path.to_string(),
            reason: "target path is empty".to_string(),
        });
    }
    let parent_path = target_path.parent();

    let target = tree
        .get_node(&target_path, false)?
        .into_iter()
        .next()
        .ok_or_else(|| BindError::NotFound {
            path: target_path.to_string(),
        })?;
    let parent = if parent_path.is_empty() {
        tree.root_ref()
    } else {
        tree.get_node(&parent_path, false)?
            .into_iter()
            .next()
            .ok_or_else(|| BindError::NotFound {
                path: parent_path.to_string(),
            })?
    };
    if !parent.shape().has_fields() {
        return Err(BindError::InvalidPath {
            path: target_path.to_string(),
            reason: format!("parent {} is a {}, not a container", parent.path(), parent.shape()),
        });
    }

    let parent_schema = tree.schema_node(&parent).ok_or_else(|| BindError::InternalSchema {
        message: format!("no schema node for {}", parent.path()),
    })?;
    let Some(NodeView::Container(parent_data)) = tree.node(&parent) else {
        return Err(BindError::NotFound {
            path: parent.path().to_string(),
        });
    };
    let idx = field_for(parent_schema, target.name()).ok_or_else(|| BindError::InternalSchema {
        message: format!(
            "no field '{}' registered on '{}'",
            target.name(),
            parent_schema.name()
        ),
    })?;

    let target_schema = parent_schema
        .child(idx)
        .ok_or_else(|| BindError::InternalSchema {
            message: format!("field {} missing on '{}'", idx, parent_schema.name()),
        })?;

    let mut scoped = Container::empty_tree(parent_schema);
    scoped.set_field(
        idx,
        scoped_value(&target, &target_path, target_schema, parent_data, idx)?,
    );

    let options = EmitOptions {
        skip_validation: true,
        module_qualify,
        pretty: false,
    };
    let body = emit_container(parent_schema, &scoped, &options)?;
    debug!(
        path = %target.path(),
        parent = %parent.path(),
        bytes = body.len(),
        "rendered scoped response"
    );
    Ok(body.into_bytes())
}

/// The parent's field value restricted to what the target addresses
///
/// A collection target keeps only the entries agreeing with the keys the
/// path does give.
fn scoped_value(
    target: &NodeRef,
    target_path: &Path,
    target_schema: &SchemaNode,
    parent: &Container,
    idx: usize,
) -> Result<DataNode> {
    let not_found = || BindError::NotFound {
        path: target.path().to_string(),
    };
    let stored = parent.field(idx).ok_or_else(not_found)?;
    match (target.shape(), stored, target.list_key()) {
        (NodeShape::Entry, DataNode::List(list), Some(key)) => {
            let entry = list.get(key).ok_or_else(not_found)?;
            Ok(DataNode::List(List::single(key.clone(), entry.clone())))
        }
        (NodeShape::Collection, DataNode::List(list), _) => {
            let matching = matching_entries(target_path, target_schema, list)?;
            if matching.is_empty() {
                return Err(not_found());
            }
            Ok(DataNode::List(matching))
        }
        _ => Ok(stored.clone()),
    }
}
