//! Schema-typed data trees
//!
//! A [`DataTree`] pairs a registered [`Schema`] with a root [`Container`].
//! Nodes inside it are addressed by [`NodeRef`]: an owned handle made of
//! navigation steps plus a description of the node it was resolved to.
//! References stay valid while the nodes they walk through exist; lookups
//! through a stale reference return `None` instead of panicking.

mod lookup;
mod node;
mod validate;
mod value;

use std::sync::Arc;

use crate::introspect::NodeShape;
use crate::path::{Path, Segment};
use crate::schema::{NodeKind, Schema, SchemaNode};

pub use node::{Container, DataNode, List, ListKey};
pub use validate::{validate_subtree, ValidateOptions};
pub use value::LeafValue;
pub(crate) use lookup::matching_entries;

/// One navigation step below a container
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    /// Child field by schema index
    Field(usize),
    /// List entry by canonical key
    Entry(ListKey),
}

/// Handle to a node resolved inside a [`DataTree`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    steps: Vec<Step>,
    path: Path,
    name: String,
    module: String,
    kind: NodeKind,
    shape: NodeShape,
}

impl NodeRef {
    pub(crate) fn root() -> Self {
        Self {
            steps: Vec::new(),
            path: Path::root(),
            name: String::new(),
            module: String::new(),
            kind: NodeKind::Container,
            shape: NodeShape::Container,
        }
    }

    /// Descend into field `index`, described by `child`
    pub(crate) fn field(&self, index: usize, child: &SchemaNode) -> Self {
        let mut steps = self.steps.clone();
        steps.push(Step::Field(index));
        let mut path = self.path.clone();
        path.push(Segment::new(child.name()));
        Self {
            steps,
            path,
            name: child.name().to_string(),
            module: child.module().to_string(),
            kind: child.kind(),
            shape: NodeShape::of(child.kind(), false),
        }
    }

    /// Pin a collection reference to one entry of `list`
    pub(crate) fn entry(&self, key: ListKey, list: &SchemaNode) -> Self {
        let mut path = self.path.parent();
        let mut segment = Segment::new(list.name());
        for (name, value) in list.keys().iter().zip(&key) {
            segment = segment.with_predicate(name.clone(), value.clone());
        }
        path.push(segment);
        let mut steps = self.steps.clone();
        steps.push(Step::Entry(key));
        Self {
            steps,
            path,
            shape: NodeShape::Entry,
            ..self.clone()
        }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Canonical path of the node, with keys in schema order
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Schema name of the node; empty for the root
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn module(&self) -> &str {
        &self.module
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn shape(&self) -> NodeShape {
        self.shape
    }

    pub fn is_root(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn is_collection(&self) -> bool {
        self.shape.is_collection()
    }

    /// Key of the entry this reference pins, if it pins one
    pub fn list_key(&self) -> Option<&ListKey> {
        match self.steps.last() {
            Some(Step::Entry(key)) => Some(key),
            _ => None,
        }
    }

    /// Schema child indices from the root; entry steps add none
    pub fn schema_indices(&self) -> Vec<usize> {
        schema_indices(&self.steps)
    }
}

pub(crate) fn schema_indices(steps: &[Step]) -> Vec<usize> {
    steps
        .iter()
        .filter_map(|step| match step {
            Step::Field(idx) => Some(*idx),
            Step::Entry(_) => None,
        })
        .collect()
}

/// Read-only view of the data a [`NodeRef`] points at
#[derive(Debug, Clone, Copy)]
pub enum NodeView<'a> {
    /// A container, list entry or the root
    Container(&'a Container),
    Collection(&'a List),
    Leaf(&'a LeafValue),
    LeafList(&'a [LeafValue]),
}

impl<'a> NodeView<'a> {
    fn of(node: &'a DataNode) -> Self {
        match node {
            DataNode::Container(c) => NodeView::Container(c),
            DataNode::List(l) => NodeView::Collection(l),
            DataNode::Leaf(v) => NodeView::Leaf(v),
            DataNode::LeafList(vs) => NodeView::LeafList(vs),
        }
    }
}

/// Mutable access to the data a [`NodeRef`] points at
#[derive(Debug)]
pub enum SlotMut<'a> {
    /// A list entry or the root, which always exist once reached
    Container(&'a mut Container),
    /// A field slot of the parent container, possibly unset
    Field(&'a mut Option<DataNode>),
}

/// A schema plus the data bound against it
#[derive(Debug, Clone)]
pub struct DataTree {
    schema: Arc<Schema>,
    root: Container,
}

impl DataTree {
    pub fn new(schema: Arc<Schema>) -> Self {
        let root = Container::new(schema.root());
        Self { schema, root }
    }

    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn root(&self) -> &Container {
        &self.root
    }

    pub fn root_ref(&self) -> NodeRef {
        NodeRef::root()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Schema node a reference was resolved against
    pub fn schema_node(&self, node: &NodeRef) -> Option<&SchemaNode> {
        self.schema.node_at(&node.schema_indices())
    }

    /// Data at a reference; `None` when nothing is stored there
    pub fn node(&self, node: &NodeRef) -> Option<NodeView<'_>> {
        view_at(&self.root, node.steps())
    }

    /// Mutable slot at a reference; `None` if an intermediate node is missing
    pub fn slot_mut(&mut self, node: &NodeRef) -> Option<SlotMut<'_>> {
        slot_at(&mut self.root, node.steps())
    }
}

pub(crate) fn view_at<'a>(root: &'a Container, steps: &[Step]) -> Option<NodeView<'a>> {
    let mut view = NodeView::Container(root);
    for step in steps {
        view = match (view, step) {
            (NodeView::Container(c), Step::Field(idx)) => NodeView::of(c.field(*idx)?),
            (NodeView::Collection(list), Step::Entry(key)) => NodeView::Container(list.get(key)?),
            _ => return None,
        };
    }
    Some(view)
}

fn slot_at<'a>(root: &'a mut Container, steps: &[Step]) -> Option<SlotMut<'a>> {
    let mut current = root;
    let mut iter = steps.iter().peekable();
    while let Some(step) = iter.next() {
        let Step::Field(idx) = step else {
            return None;
        };
        let slot = current.slot_mut(*idx);
        match iter.peek() {
            None => return Some(SlotMut::Field(slot)),
            Some(Step::Entry(key)) => {
                iter.next();
                let Some(DataNode::List(list)) = slot.as_mut() else {
                    return None;
                };
                let entry = list.get_mut(key)?;
                current = entry;
            }
            Some(Step::Field(_)) => {
                let Some(DataNode::Container(child)) = slot.as_mut() else {
                    return None;
                };
                current = child;
            }
        }
    }
    Some(SlotMut::Container(current))
}
