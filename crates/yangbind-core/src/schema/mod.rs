//! Schema tree describing the modeled data
//!
//! A [`Schema`] is built once from a set of module top-level nodes and is
//! immutable afterwards. Registration assigns owning modules to every
//! descendant, checks list key declarations, builds each node's field
//! table (child name → child index) and resolves leafref target types.
//! Field matching during binding and rendering goes through these tables
//! only.

mod types;

use std::collections::HashMap;

use crate::errors::{BindError, Result};

pub use types::{LeafType, LeafrefPath};

/// Structural kind of a schema node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Container,
    List,
    Leaf,
    LeafList,
}

impl NodeKind {
    /// Leaves and leaf-lists carry values rather than child fields
    pub fn is_leaf_like(&self) -> bool {
        matches!(self, NodeKind::Leaf | NodeKind::LeafList)
    }
}

/// One node of the schema tree
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    name: String,
    module: String,
    kind: NodeKind,
    keys: Vec<String>,
    leaf_type: Option<LeafType>,
    children: Vec<SchemaNode>,
    fields: HashMap<String, usize>,
}

impl SchemaNode {
    fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            module: String::new(),
            kind,
            keys: Vec::new(),
            leaf_type: None,
            children: Vec::new(),
            fields: HashMap::new(),
        }
    }

    pub fn container(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Container)
    }

    /// A keyed list; `keys` must name leaf children, in key order
    pub fn list(name: impl Into<String>, keys: &[&str]) -> Self {
        let mut node = Self::new(name, NodeKind::List);
        node.keys = keys.iter().map(|k| k.to_string()).collect();
        node
    }

    pub fn leaf(name: impl Into<String>, leaf_type: LeafType) -> Self {
        let mut node = Self::new(name, NodeKind::Leaf);
        node.leaf_type = Some(leaf_type);
        node
    }

    pub fn leaf_list(name: impl Into<String>, leaf_type: LeafType) -> Self {
        let mut node = Self::new(name, NodeKind::LeafList);
        node.leaf_type = Some(leaf_type);
        node
    }

    /// Owning module; descendants without one inherit it at registration
    pub fn in_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_child(mut self, child: SchemaNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SchemaNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn leaf_type(&self) -> Option<&LeafType> {
        self.leaf_type.as_ref()
    }

    pub fn children(&self) -> &[SchemaNode] {
        &self.children
    }

    pub fn child(&self, index: usize) -> Option<&SchemaNode> {
        self.children.get(index)
    }

    /// Index of the child whose name matches, first declaration wins
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.get(name).copied()
    }

    pub fn child_by_name(&self, name: &str) -> Option<(usize, &SchemaNode)> {
        let idx = self.field_index(name)?;
        self.children.get(idx).map(|c| (idx, c))
    }

    /// `module:name`, the qualified serialization name
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.module, self.name)
    }

    fn register(&mut self, parent_module: &str, schema_path: &str) -> Result<()> {
        if self.module.is_empty() {
            self.module = parent_module.to_string();
        }
        let here = format!("{}/{}", schema_path, self.name);

        match self.kind {
            NodeKind::Leaf | NodeKind::LeafList => {
                if self.leaf_type.is_none() {
                    return Err(schema_error(&here, "leaf has no type"));
                }
                if !self.children.is_empty() {
                    return Err(schema_error(&here, "leaf declares children"));
                }
                if let Some(LeafType::Leafref { path, .. }) = &self.leaf_type {
                    if path.is_empty() {
                        return Err(schema_error(&here, "leafref has an empty path"));
                    }
                }
            }
            NodeKind::Container | NodeKind::List => {}
        }

        self.fields.clear();
        for (idx, child) in self.children.iter().enumerate() {
            self.fields.entry(child.name.clone()).or_insert(idx);
        }

        if self.kind == NodeKind::List {
            if self.keys.is_empty() {
                return Err(schema_error(&here, "list declares no keys"));
            }
            for key in &self.keys {
                match self.child_by_name(key) {
                    Some((_, child)) if child.kind == NodeKind::Leaf => {}
                    _ => {
                        return Err(schema_error(
                            &here,
                            &format!("key '{}' is not a leaf child", key),
                        ))
                    }
                }
            }
        }

        let module = self.module.clone();
        for child in &mut self.children {
            child.register(&module, &here)?;
        }
        Ok(())
    }
}

/// Leafref chains longer than this are treated as cycles
const MAX_LEAFREF_DEPTH: usize = 8;

fn collect_leafrefs(node: &SchemaNode, at: &mut Vec<usize>, out: &mut Vec<(Vec<usize>, String)>) {
    if let Some(LeafType::Leafref { path, .. }) = &node.leaf_type {
        out.push((at.clone(), path.clone()));
    }
    for (idx, child) in node.children.iter().enumerate() {
        at.push(idx);
        collect_leafrefs(child, at, out);
        at.pop();
    }
}

/// Schema indices of the node a leafref path points at
fn leafref_target(root: &SchemaNode, leaf: &[usize], path: &LeafrefPath) -> Option<Vec<usize>> {
    let mut at = if path.absolute {
        Vec::new()
    } else {
        let keep = leaf.len().checked_sub(path.up)?;
        leaf[..keep].to_vec()
    };
    let mut node = at
        .iter()
        .try_fold(root, |node, &idx| node.child(idx))?;
    for name in &path.names {
        let (idx, child) = node.child_by_name(name)?;
        at.push(idx);
        node = child;
    }
    Some(at)
}

fn resolve_leafref(root: &SchemaNode, leaf: &[usize], raw: &str, depth: usize) -> Result<LeafType> {
    let here = || format!("leafref '{}'", raw);
    if depth > MAX_LEAFREF_DEPTH {
        return Err(schema_error(&here(), "leafref chain too deep"));
    }
    let target = leafref_target(root, leaf, &LeafrefPath::parse(raw))
        .ok_or_else(|| schema_error(&here(), "target does not exist"))?;
    let node = target
        .iter()
        .try_fold(root, |node, &idx| node.child(idx))
        .ok_or_else(|| schema_error(&here(), "target does not exist"))?;
    match (&node.kind, &node.leaf_type) {
        (kind, Some(LeafType::Leafref { path, .. })) if kind.is_leaf_like() => {
            resolve_leafref(root, &target, path, depth + 1)
        }
        (kind, Some(ty)) if kind.is_leaf_like() => Ok(ty.clone()),
        _ => Err(schema_error(&here(), "target is not a leaf")),
    }
}

fn resolve_leafrefs(root: &mut SchemaNode) -> Result<()> {
    let mut pending = Vec::new();
    collect_leafrefs(root, &mut Vec::new(), &mut pending);

    let mut resolved = Vec::with_capacity(pending.len());
    for (at, path) in pending {
        let ty = resolve_leafref(root, &at, &path, 0)?;
        resolved.push((at, ty));
    }

    for (at, ty) in resolved {
        let mut node = &mut *root;
        for idx in at {
            node = node
                .children
                .get_mut(idx)
                .ok_or_else(|| schema_error("leafref", "schema changed during resolution"))?;
        }
        if let Some(LeafType::Leafref { target, .. }) = &mut node.leaf_type {
            *target = Some(Box::new(ty));
        }
    }
    Ok(())
}

fn schema_error(at: &str, reason: &str) -> BindError {
    BindError::InternalSchema {
        message: format!("{}: {}", at, reason),
    }
}

/// A registered, immutable schema tree
///
/// The root is a synthetic container whose children are the top-level
/// nodes of every registered module.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    root: SchemaNode,
}

impl Schema {
    /// Register module top-level nodes
    ///
    /// # Errors
    ///
    /// Returns `InternalSchema` if a top-level node has no module, a list
    /// declares no keys or a key that is not a leaf child, a leaf is
    /// malformed, or a leafref points at nothing.
    pub fn new(modules: impl IntoIterator<Item = SchemaNode>) -> Result<Self> {
        let mut root = SchemaNode::container("");
        for node in modules {
            if node.module.is_empty() {
                return Err(schema_error(
                    &format!("/{}", node.name),
                    "top-level node has no module",
                ));
            }
            root.children.push(node);
        }
        root.register("", "")?;
        resolve_leafrefs(&mut root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &SchemaNode {
        &self.root
    }

    /// Walk child indices from the root
    pub fn node_at(&self, indices: &[usize]) -> Option<&SchemaNode> {
        indices
            .iter()
            .try_fold(&self.root, |node, &idx| node.child(idx))
    }

    /// Names of the registered modules, in registration order, deduplicated
    pub fn modules(&self) -> Vec<&str> {
        let mut out: Vec<&str> = Vec::new();
        for child in &self.root.children {
            if !out.contains(&child.module.as_str()) {
                out.push(&child.module);
            }
        }
        out
    }
}
