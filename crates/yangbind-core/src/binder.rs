//! Schema tree binder
//!
//! Binding maps a request path onto the data tree and applies what the
//! opcode implies there:
//!
//! 1. reject an empty path, or an empty payload for a decoding opcode
//! 2. resolve the path: GET and DELETE only look, CREATE/REPLACE/UPDATE
//!    allocate whatever is missing on the way
//! 3. for REPLACE and UPDATE, a target that is a whole list (no complete
//!    keys) moves the write anchor up to the list's parent, and the payload
//!    is decoded there
//! 4. decode the payload through the [`PayloadCodec`]
//! 5. validate the subtree at the anchor
//!
//! A failed bind leaves the tree untouched. Binding never deletes; DELETE
//! callers remove the returned target themselves once the precondition
//! check has passed.

use tracing::debug;

use crate::codec::{JsonCodec, PayloadCodec};
use crate::errors::{BindError, Result};
use crate::introspect::{requires_precondition, NodeShape};
use crate::opcode::Opcode;
use crate::path::Path;
use crate::tree::{DataTree, NodeRef, ValidateOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BindOptions {
    /// Let leafrefs pass when their target holds no data
    pub relax_leafrefs: bool,
}

impl Default for BindOptions {
    fn default() -> Self {
        Self {
            relax_leafrefs: true,
        }
    }
}

/// Outcome of a successful bind
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    pub opcode: Opcode,
    /// The node the request path addressed
    pub target: NodeRef,
    /// Where the payload was written and validation ran
    pub anchor: Path,
    /// Whether the anchor was moved up from the target
    pub reanchored: bool,
}

/// Bind with the JSON codec and default options
///
/// # Errors
///
/// See [`bind_with`].
pub fn bind(tree: &mut DataTree, path: &str, opcode: Opcode, payload: &[u8]) -> Result<Binding> {
    bind_with(tree, path, opcode, payload, &JsonCodec, &BindOptions::default())
}

/// Bind a request path and payload into `tree`
///
/// CREATE, REPLACE and UPDATE are all-or-nothing: on any error `tree` is
/// left exactly as it was.
///
/// # Errors
///
/// - `EmptyPath` / `EmptyPayload` (`EmptyInput`) for missing input
/// - `InvalidPath`-kind errors when the path does not resolve against the
///   schema, including `MissingKeys` for CREATE on a whole list
/// - `NotFound` when GET or DELETE address no data
/// - `InvalidPayload`-kind errors from the codec
/// - `ValidationFailed`-kind errors from validation at the anchor
pub fn bind_with(
    tree: &mut DataTree,
    path: &str,
    opcode: Opcode,
    payload: &[u8],
    codec: &dyn PayloadCodec,
    options: &BindOptions,
) -> Result<Binding> {
    if path.is_empty() {
        return Err(BindError::EmptyPath);
    }
    if opcode.carries_payload() && payload.is_empty() {
        return Err(BindError::EmptyPayload {
            path: path.to_string(),
            opcode: opcode.to_string(),
        });
    }
    if !opcode.carries_payload() {
        return bind_in(tree, path, opcode, payload, codec, options);
    }

    // Writes land in a staged copy; `tree` only changes once every step passed
    let mut staged = tree.clone();
    let binding = bind_in(&mut staged, path, opcode, payload, codec, options)?;
    *tree = staged;
    Ok(binding)
}

fn bind_in(
    tree: &mut DataTree,
    path: &str,
    opcode: Opcode,
    payload: &[u8],
    codec: &dyn PayloadCodec,
    options: &BindOptions,
) -> Result<Binding> {
    let requested = Path::parse(path);
    let target = match opcode {
        Opcode::Get | Opcode::Delete => first_match(tree, &requested)?,
        Opcode::Create | Opcode::Replace | Opcode::Update => tree.get_or_create_node(&requested)?,
    };

    let reanchored = opcode.reanchors_collections() && target.shape() == NodeShape::Collection;
    let anchor = if reanchored {
        target.path().parent()
    } else {
        target.path().clone()
    };
    if reanchored {
        debug!(
            path = %target.path(),
            anchor = %anchor,
            opcode = %opcode,
            "list target without keys, anchoring at parent"
        );
    }

    match opcode {
        Opcode::Create => {
            if target.is_collection() {
                return Err(BindError::MissingKeys {
                    path: target.path().to_string(),
                    list: target.name().to_string(),
                });
            }
            codec.decode(payload, tree, &target)?;
        }
        Opcode::Replace | Opcode::Update => {
            let write_at = if reanchored {
                node_at(tree, &anchor)?
            } else {
                target.clone()
            };
            codec.decode(payload, tree, &write_at)?;
        }
        Opcode::Get | Opcode::Delete => {}
    }

    let validate = match opcode {
        Opcode::Replace | Opcode::Update => true,
        Opcode::Get | Opcode::Delete => requires_precondition(target.shape()),
        Opcode::Create => false,
    };
    if validate {
        let anchor_node = node_at(tree, &anchor)?;
        let options = ValidateOptions {
            ignore_missing_leafrefs: options.relax_leafrefs,
        };
        tree.validate(&anchor_node, &options)?;
    }

    debug!(
        path = %target.path(),
        anchor = %anchor,
        opcode = %opcode,
        shape = %target.shape(),
        validated = validate,
        "bound request"
    );
    Ok(Binding {
        opcode,
        target,
        anchor,
        reanchored,
    })
}

fn first_match(tree: &DataTree, path: &Path) -> Result<NodeRef> {
    tree.get_node(path, false)?
        .into_iter()
        .next()
        .ok_or_else(|| BindError::NotFound {
            path: path.to_string(),
        })
}

/// The existing node at `path`; the root for the empty path
fn node_at(tree: &DataTree, path: &Path) -> Result<NodeRef> {
    if path.is_empty() {
        return Ok(tree.root_ref());
    }
    first_match(tree, path)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::errors::ExErrorKind;
    use crate::schema::{LeafType, Schema, SchemaNode};
    use crate::tree::NodeView;

    fn tree() -> DataTree {
        let schema = Schema::new([SchemaNode::container("top").in_module("m").with_children([
            SchemaNode::container("items").with_child(
                SchemaNode::list("item", &["id"]).with_children([
                    SchemaNode::leaf("id", LeafType::leafref("../config/id")),
                    SchemaNode::container("config").with_children([
                        SchemaNode::leaf("id", LeafType::uint32()),
                        SchemaNode::leaf("label", LeafType::String),
                    ]),
                ]),
            ),
            SchemaNode::leaf("name", LeafType::String),
        ])])
        .unwrap();
        DataTree::new(Arc::new(schema))
    }

    #[test]
    fn test_replace_on_collection_reanchors_to_parent() {
        let mut tree = tree();
        let binding = bind(
            &mut tree,
            "/top/items/item",
            Opcode::Replace,
            br#"{"item": [{"id": 1, "config": {"id": 1}}]}"#,
        )
        .unwrap();
        assert!(binding.reanchored);
        assert_eq!(binding.anchor.to_string(), "/top/items");
        assert_eq!(binding.target.shape(), NodeShape::Collection);

        let found = tree.get_node(&Path::parse("/top/items/item[id=1]"), false).unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_update_on_entry_keeps_anchor() {
        let mut tree = tree();
        let binding = bind(
            &mut tree,
            "/top/items/item[id=5]",
            Opcode::Update,
            br#"{"config": {"id": 5, "label": "five"}}"#,
        )
        .unwrap();
        assert!(!binding.reanchored);
        assert_eq!(binding.anchor.to_string(), "/top/items/item[id=5]");
    }

    #[test]
    fn test_create_on_collection_is_missing_keys() {
        let mut tree = tree();
        let err = bind(&mut tree, "/top/items/item", Opcode::Create, b"{}").unwrap_err();
        assert!(matches!(err, BindError::MissingKeys { .. }));
        assert_eq!(err.kind(), ExErrorKind::InvalidPath);
    }

    #[test]
    fn test_empty_inputs() {
        let mut tree = tree();
        assert!(matches!(
            bind(&mut tree, "", Opcode::Get, b"").unwrap_err(),
            BindError::EmptyPath
        ));
        for opcode in [Opcode::Create, Opcode::Replace, Opcode::Update] {
            let err = bind(&mut tree, "/top/items/item", opcode, b"").unwrap_err();
            assert_eq!(err.kind(), ExErrorKind::EmptyInput, "{}", opcode);
        }
        assert!(tree.is_empty());
    }

    #[test]
    fn test_get_absent_is_not_found_and_side_effect_free() {
        let mut tree = tree();
        let err = bind(&mut tree, "/top/items/item[id=9]", Opcode::Get, b"").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::NotFound);
        let root = tree.root_ref();
        let Some(NodeView::Container(c)) = tree.node(&root) else {
            panic!("root missing");
        };
        assert!(c.field(0).is_none());
    }

    #[test]
    fn test_replace_validates_leafrefs_at_anchor() {
        let mut tree = tree();
        let err = bind(
            &mut tree,
            "/top/items/item[id=1]",
            Opcode::Replace,
            br#"{"config": {"id": 2}}"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::ValidationFailed);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_delete_binds_existing_target() {
        let mut tree = tree();
        bind(&mut tree, "/top", Opcode::Update, br#"{"name": "n"}"#).unwrap();
        let binding = bind(&mut tree, "/top/name", Opcode::Delete, b"").unwrap();
        assert_eq!(binding.target.shape(), NodeShape::Leaf);
        assert!(tree.remove(&binding.target).unwrap());
    }

    #[test]
    fn test_unknown_segment_is_invalid_path() {
        let mut tree = tree();
        let err = bind(&mut tree, "/top/nope", Opcode::Update, b"{}").unwrap_err();
        assert_eq!(err.kind(), ExErrorKind::InvalidPath);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_failed_write_leaves_tree_unchanged() {
        let mut tree = tree();
        bind(&mut tree, "/top", Opcode::Update, br#"{"name": "kept"}"#).unwrap();
        let before = tree.root().clone();

        let failures: [(&str, Opcode, &[u8]); 4] = [
            ("/top/items/item[id=3]", Opcode::Replace, br#"{"bogus": 1}"#),
            ("/top/items/item[id=3]", Opcode::Update, br#"{"config": {"id": 4}}"#),
            ("/top/items/item[id=3]/config/label/x", Opcode::Create, b"{}"),
            ("/top/items/item[id=3]", Opcode::Create, b"not json"),
        ];
        for (path, opcode, payload) in failures {
            assert!(bind(&mut tree, path, opcode, payload).is_err(), "{} {}", opcode, path);
            assert_eq!(tree.root(), &before, "{} {}", opcode, path);
        }
    }
}
