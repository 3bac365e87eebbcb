use std::collections::BTreeMap;

use super::LeafValue;
use crate::schema::{NodeKind, SchemaNode};

/// Canonical key values of one list entry, in schema key order
pub type ListKey = Vec<String>;

/// One populated data node
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataNode {
    Container(Container),
    List(List),
    Leaf(LeafValue),
    LeafList(Vec<LeafValue>),
}

impl DataNode {
    /// A freshly allocated, empty node for a container or list schema node
    pub fn empty(schema: &SchemaNode) -> Option<Self> {
        match schema.kind() {
            NodeKind::Container => Some(DataNode::Container(Container::new(schema))),
            NodeKind::List => Some(DataNode::List(List::default())),
            NodeKind::Leaf | NodeKind::LeafList => None,
        }
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            DataNode::Container(_) => NodeKind::Container,
            DataNode::List(_) => NodeKind::List,
            DataNode::Leaf(_) => NodeKind::Leaf,
            DataNode::LeafList(_) => NodeKind::LeafList,
        }
    }

    /// No leaf values anywhere below this node
    pub fn is_empty(&self) -> bool {
        match self {
            DataNode::Container(c) => c.is_empty(),
            DataNode::List(l) => l.is_empty(),
            DataNode::Leaf(_) => false,
            DataNode::LeafList(values) => values.is_empty(),
        }
    }
}

/// Field slots of a container or list entry, indexed like the schema children
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Container {
    fields: Vec<Option<DataNode>>,
}

impl Container {
    pub fn new(schema: &SchemaNode) -> Self {
        Self {
            fields: schema.children().iter().map(|_| None).collect(),
        }
    }

    /// A container with every descendant container allocated but empty
    ///
    /// Lists and leaves stay unset.
    pub fn empty_tree(schema: &SchemaNode) -> Self {
        Self {
            fields: schema
                .children()
                .iter()
                .map(|child| match child.kind() {
                    NodeKind::Container => Some(DataNode::Container(Container::empty_tree(child))),
                    _ => None,
                })
                .collect(),
        }
    }

    pub fn field(&self, index: usize) -> Option<&DataNode> {
        self.fields.get(index).and_then(Option::as_ref)
    }

    /// Mutable slot for a field, growing the slot table if needed
    pub fn slot_mut(&mut self, index: usize) -> &mut Option<DataNode> {
        if self.fields.len() <= index {
            self.fields.resize_with(index + 1, || None);
        }
        &mut self.fields[index]
    }

    pub fn set_field(&mut self, index: usize, node: DataNode) {
        *self.slot_mut(index) = Some(node);
    }

    pub fn take_field(&mut self, index: usize) -> Option<DataNode> {
        self.fields.get_mut(index).and_then(Option::take)
    }

    pub fn leaf(&self, index: usize) -> Option<&LeafValue> {
        match self.field(index) {
            Some(DataNode::Leaf(v)) => Some(v),
            _ => None,
        }
    }

    /// Populated fields with their slot index
    pub fn fields(&self) -> impl Iterator<Item = (usize, &DataNode)> {
        self.fields
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|node| (idx, node)))
    }

    pub(crate) fn slot_count(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields().all(|(_, node)| node.is_empty())
    }
}

/// Entries of a keyed list, ordered by canonical key
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct List {
    entries: BTreeMap<ListKey, Container>,
}

impl List {
    /// A list holding exactly one entry
    pub fn single(key: ListKey, entry: Container) -> Self {
        let mut list = Self::default();
        list.insert(key, entry);
        list
    }

    pub fn get(&self, key: &ListKey) -> Option<&Container> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &ListKey) -> Option<&mut Container> {
        self.entries.get_mut(key)
    }

    pub fn insert(&mut self, key: ListKey, entry: Container) -> Option<Container> {
        self.entries.insert(key, entry)
    }

    pub fn entry_or_insert_with(
        &mut self,
        key: ListKey,
        make: impl FnOnce() -> Container,
    ) -> &mut Container {
        self.entries.entry(key).or_insert_with(make)
    }

    pub fn remove(&mut self, key: &ListKey) -> Option<Container> {
        self.entries.remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ListKey, &Container)> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &ListKey> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{LeafType, Schema};

    fn schema() -> Schema {
        Schema::new([SchemaNode::container("top").in_module("m").with_children([
            SchemaNode::container("inner")
                .with_child(SchemaNode::container("deeper"))
                .with_child(SchemaNode::leaf("x", LeafType::String)),
            SchemaNode::list("item", &["id"]).with_child(SchemaNode::leaf("id", LeafType::String)),
        ])])
        .unwrap()
    }

    #[test]
    fn test_empty_tree_allocates_containers_only() {
        let schema = schema();
        let top = schema.root().child(0).unwrap();
        let tree = Container::empty_tree(top);

        let Some(DataNode::Container(inner)) = tree.field(0) else {
            panic!("inner container not allocated");
        };
        assert!(matches!(inner.field(0), Some(DataNode::Container(_))));
        assert!(inner.field(1).is_none());
        assert!(tree.field(1).is_none());
        assert!(tree.is_empty());
    }

    #[test]
    fn test_leaf_makes_container_non_empty() {
        let mut c = Container::default();
        c.set_field(3, DataNode::Leaf(LeafValue::from("v")));
        assert!(!c.is_empty());
        assert_eq!(c.leaf(3), Some(&LeafValue::from("v")));
        assert_eq!(c.take_field(3), Some(DataNode::Leaf(LeafValue::from("v"))));
        assert!(c.is_empty());
    }

    #[test]
    fn test_list_orders_by_key() {
        let mut list = List::default();
        list.insert(vec!["b".to_string()], Container::default());
        list.insert(vec!["a".to_string()], Container::default());
        let keys: Vec<_> = list.keys().cloned().collect();
        assert_eq!(keys, vec![vec!["a".to_string()], vec!["b".to_string()]]);
    }
}
