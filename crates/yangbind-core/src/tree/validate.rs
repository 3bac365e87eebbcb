//! Structural and cross-reference validation
//!
//! Checks run over a subtree: stored data kinds agree with the schema, list
//! entries carry key leaves equal to the key they are stored under, leaf
//! values satisfy their type, and leafref values name existing data.

use tracing::debug;

use super::node::{Container, DataNode, List, ListKey};
use super::{schema_indices, view_at, DataTree, LeafValue, NodeRef, NodeView, Step};
use crate::errors::{BindError, Result};
use crate::introspect::NodeShape;
use crate::schema::{LeafType, LeafrefPath, NodeKind, SchemaNode};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Leafrefs pass when no data exists at their target location
    pub ignore_missing_leafrefs: bool,
}

impl ValidateOptions {
    pub fn relaxed() -> Self {
        Self {
            ignore_missing_leafrefs: true,
        }
    }

    pub fn strict() -> Self {
        Self::default()
    }
}

struct Validator<'t> {
    /// `None` for detached subtrees; leafrefs are then not checked
    tree: Option<&'t DataTree>,
    options: ValidateOptions,
    steps: Vec<Step>,
    segments: Vec<String>,
}

impl<'t> Validator<'t> {
    fn here(&self) -> String {
        if self.segments.is_empty() {
            "/".to_string()
        } else {
            format!("/{}", self.segments.join("/"))
        }
    }

    fn failed(&self, reason: impl Into<String>) -> BindError {
        BindError::ValidationFailed {
            path: self.here(),
            reason: reason.into(),
        }
    }

    fn container(&mut self, container: &Container, schema: &SchemaNode) -> Result<()> {
        for (idx, node) in container.fields() {
            let child = schema.child(idx).ok_or_else(|| BindError::InternalSchema {
                message: format!(
                    "{} holds data in slot {} but '{}' has {} fields",
                    self.here(),
                    idx,
                    schema.name(),
                    schema.children().len()
                ),
            })?;
            self.steps.push(Step::Field(idx));
            self.segments.push(child.name().to_string());
            let outcome = self.node(node, child);
            self.segments.pop();
            self.steps.pop();
            outcome?;
        }
        Ok(())
    }

    fn node(&mut self, node: &DataNode, schema: &SchemaNode) -> Result<()> {
        match (schema.kind(), node) {
            (NodeKind::Container, DataNode::Container(c)) => self.container(c, schema),
            (NodeKind::List, DataNode::List(list)) => self.list(list, schema),
            (NodeKind::Leaf, DataNode::Leaf(value)) => self.leaf(value, schema),
            (NodeKind::LeafList, DataNode::LeafList(values)) => {
                values.iter().try_for_each(|value| self.leaf(value, schema))
            }
            (kind, other) => Err(BindError::InternalSchema {
                message: format!(
                    "{} stores a {:?} where the schema declares a {:?}",
                    self.here(),
                    other.kind(),
                    kind
                ),
            }),
        }
    }

    fn list(&mut self, list: &List, schema: &SchemaNode) -> Result<()> {
        let plain = self.segments.last().cloned().unwrap_or_default();
        for (key, entry) in list.iter() {
            let mut keyed = plain.clone();
            for (name, value) in schema.keys().iter().zip(key) {
                keyed.push_str(&format!("[{}={}]", name, value));
            }
            if let Some(last) = self.segments.last_mut() {
                *last = keyed;
            }
            self.steps.push(Step::Entry(key.clone()));
            let outcome = self
                .entry_keys(entry, key, schema)
                .and_then(|()| self.container(entry, schema));
            self.steps.pop();
            outcome?;
        }
        if let Some(last) = self.segments.last_mut() {
            *last = plain;
        }
        Ok(())
    }

    fn entry_keys(&self, entry: &Container, key: &ListKey, schema: &SchemaNode) -> Result<()> {
        if key.len() != schema.keys().len() {
            return Err(self.failed(format!(
                "entry key has {} values but '{}' declares {} keys",
                key.len(),
                schema.name(),
                schema.keys().len()
            )));
        }
        for (name, expected) in schema.keys().iter().zip(key) {
            let found = schema.field_index(name).and_then(|idx| entry.leaf(idx));
            match found {
                Some(value) if value.to_string() == *expected => {}
                Some(value) => {
                    return Err(BindError::KeyMismatch {
                        path: self.here(),
                        key: name.clone(),
                        expected: expected.clone(),
                        found: value.to_string(),
                    })
                }
                None => return Err(self.failed(format!("key leaf '{}' is not set", name))),
            }
        }
        Ok(())
    }

    fn leaf(&self, value: &LeafValue, schema: &SchemaNode) -> Result<()> {
        let leaf_type = schema.leaf_type().ok_or_else(|| BindError::InternalSchema {
            message: format!("leaf '{}' has no type", schema.name()),
        })?;
        leaf_type
            .check(schema.name(), value)
            .map_err(|e| self.failed(e.to_string()))?;

        match (leaf_type, self.tree) {
            (LeafType::Leafref { path, .. }, Some(tree)) => self.leafref(tree, value, path),
            _ => Ok(()),
        }
    }

    fn leafref(&self, tree: &DataTree, value: &LeafValue, target: &str) -> Result<()> {
        let lp = LeafrefPath::parse(target);
        let mut base = Vec::new();
        if !lp.absolute {
            // Drop the leaf itself, then climb one schema level per extra `..`
            base = self.steps.clone();
            base.pop();
            for _ in 1..lp.up {
                match base.pop() {
                    Some(Step::Entry(_)) => {
                        base.pop();
                    }
                    Some(Step::Field(_)) => {}
                    None => return Err(self.failed(format!("leafref {} climbs above the root", target))),
                }
            }
        }

        let mut found = Vec::new();
        let base_schema = tree.schema().node_at(&schema_indices(&base));
        if let (Some(NodeView::Container(c)), Some(schema)) = (view_at(tree.root(), &base), base_schema) {
            collect_targets(c, schema, &lp.names, &mut found)?;
        }

        if found.is_empty() {
            if self.options.ignore_missing_leafrefs {
                return Ok(());
            }
        } else if found.iter().any(|t| t.to_string() == value.to_string()) {
            return Ok(());
        }
        Err(BindError::LeafrefViolation {
            path: self.here(),
            value: value.to_string(),
            target: target.to_string(),
        })
    }
}

fn collect_targets<'a>(
    container: &'a Container,
    schema: &SchemaNode,
    names: &[String],
    out: &mut Vec<&'a LeafValue>,
) -> Result<()> {
    let Some((name, rest)) = names.split_first() else {
        return Ok(());
    };
    let (idx, child) = schema
        .child_by_name(name)
        .ok_or_else(|| BindError::InternalSchema {
            message: format!("leafref names unknown node '{}' under '{}'", name, schema.name()),
        })?;
    match container.field(idx) {
        None => Ok(()),
        Some(DataNode::Container(c)) => collect_targets(c, child, rest, out),
        Some(DataNode::List(list)) => list
            .iter()
            .try_for_each(|(_, entry)| collect_targets(entry, child, rest, out)),
        Some(DataNode::Leaf(value)) if rest.is_empty() => {
            out.push(value);
            Ok(())
        }
        Some(DataNode::LeafList(values)) if rest.is_empty() => {
            out.extend(values);
            Ok(())
        }
        Some(_) => Ok(()),
    }
}

impl DataTree {
    /// Validate the subtree at `node`
    ///
    /// An absent node has nothing to check and passes. Leafrefs are resolved
    /// against the whole tree, so references may point outside the subtree.
    ///
    /// # Errors
    ///
    /// Returns `ValidationFailed`-kind errors (`KeyMismatch`,
    /// `LeafrefViolation`, `ValidationFailed`) for constraint violations and
    /// `InternalSchema` when stored data disagrees with the schema.
    pub fn validate(&self, node: &NodeRef, options: &ValidateOptions) -> Result<()> {
        let Some(view) = self.node(node) else {
            return Ok(());
        };
        let schema = self.schema_node(node).ok_or_else(|| BindError::InternalSchema {
            message: format!("no schema node for {}", node.path()),
        })?;
        let mut validator = Validator {
            tree: Some(self),
            options: *options,
            steps: node.steps().to_vec(),
            segments: node.path().segments().iter().map(ToString::to_string).collect(),
        };

        match view {
            NodeView::Container(c) => {
                if let (NodeShape::Entry, Some(key)) = (node.shape(), node.list_key()) {
                    validator.entry_keys(c, key, schema)?;
                }
                validator.container(c, schema)?;
            }
            NodeView::Collection(list) => validator.list(list, schema)?,
            NodeView::Leaf(value) => validator.leaf(value, schema)?,
            NodeView::LeafList(values) => values
                .iter()
                .try_for_each(|value| validator.leaf(value, schema))?,
        }
        debug!(path = %node.path(), "validated subtree");
        Ok(())
    }
}

/// Validate a container that is not attached to a tree
///
/// Covers data kinds, key consistency and leaf types; leafrefs are skipped
/// since their targets cannot be reached.
///
/// # Errors
///
/// Same as [`DataTree::validate`], minus leafref violations.
pub fn validate_subtree(schema: &SchemaNode, container: &Container) -> Result<()> {
    let mut validator = Validator {
        tree: None,
        options: ValidateOptions::default(),
        steps: Vec::new(),
        segments: Vec::new(),
    };
    validator.container(container, schema)
}
