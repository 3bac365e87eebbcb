//! Path resolution against a data tree

use std::sync::Arc;

use tracing::debug;

use super::node::{Container, DataNode, List, ListKey};
use super::{slot_at, DataTree, LeafValue, NodeRef, SlotMut, Step};
use crate::errors::{BindError, Result};
use crate::path::{strip_module_prefix, Path, Segment};
use crate::schema::{NodeKind, SchemaNode};

/// Keys a segment supplies for a list
enum KeyMatch {
    /// Every key given; canonical key plus typed values in key order
    Full(ListKey, Vec<LeafValue>),
    /// Some keys given, by key position
    Partial(Vec<Option<LeafValue>>),
}

impl KeyMatch {
    fn accepts(&self, key: &ListKey) -> bool {
        match self {
            KeyMatch::Full(full, _) => full == key,
            KeyMatch::Partial(given) => given
                .iter()
                .zip(key)
                .all(|(want, have)| want.as_ref().map_or(true, |v| v.to_string() == *have)),
        }
    }
}

fn match_keys(path: &Path, list: &SchemaNode, seg: &Segment) -> Result<KeyMatch> {
    let mut given: Vec<Option<LeafValue>> = vec![None; list.keys().len()];
    for pred in &seg.predicates {
        let key_name = strip_module_prefix(&pred.key);
        let pos = list
            .keys()
            .iter()
            .position(|k| k == key_name)
            .ok_or_else(|| BindError::UnknownKey {
                path: path.to_string(),
                list: list.name().to_string(),
                key: pred.key.clone(),
            })?;
        let leaf_type = list
            .child_by_name(key_name)
            .and_then(|(_, leaf)| leaf.leaf_type())
            .ok_or_else(|| BindError::InternalSchema {
                message: format!("key '{}' of list '{}' has no type", key_name, list.name()),
            })?;
        let value = leaf_type
            .from_key(key_name, &pred.value)
            .map_err(|e| BindError::InvalidPath {
                path: path.to_string(),
                reason: e.to_string(),
            })?;
        given[pos] = Some(value);
    }

    if given.iter().all(Option::is_some) {
        let values: Vec<LeafValue> = given.into_iter().flatten().collect();
        let key = values.iter().map(LeafValue::to_string).collect();
        Ok(KeyMatch::Full(key, values))
    } else {
        Ok(KeyMatch::Partial(given))
    }
}

fn child_of<'s>(path: &Path, parent: &'s SchemaNode, seg: &Segment) -> Result<(usize, &'s SchemaNode)> {
    parent
        .child_by_name(&seg.name)
        .ok_or_else(|| BindError::UnknownNode {
            path: path.to_string(),
            segment: seg.name.clone(),
        })
}

fn reject_predicates(path: &Path, seg: &Segment) -> Result<()> {
    if seg.has_predicates() {
        return Err(BindError::InvalidPath {
            path: path.to_string(),
            reason: format!("'{}' is not a list and takes no keys", seg.name),
        });
    }
    Ok(())
}

fn through_leaf(path: &Path, seg: &Segment) -> BindError {
    BindError::InvalidPath {
        path: path.to_string(),
        reason: format!("'{}' is a leaf and has no children", seg.name),
    }
}

fn kind_mismatch(path: &Path, schema: &SchemaNode) -> BindError {
    BindError::InternalSchema {
        message: format!(
            "data stored at '{}' in {} does not match its {:?} schema",
            schema.name(),
            path,
            schema.kind()
        ),
    }
}

/// New list entry with its key leaves set
fn stamped_entry(list: &SchemaNode, values: &[LeafValue]) -> Container {
    let mut entry = Container::new(list);
    for (name, value) in list.keys().iter().zip(values) {
        if let Some(idx) = list.field_index(name) {
            entry.set_field(idx, DataNode::Leaf(value.clone()));
        }
    }
    entry
}

/// Check a path against the schema alone, so errors do not depend on data
fn check_schema_path(root: &SchemaNode, path: &Path, partial_key_match: bool) -> Result<()> {
    let mut parent = root;
    let segments = path.segments();
    for (pos, seg) in segments.iter().enumerate() {
        let last = pos + 1 == segments.len();
        let (_, child) = child_of(path, parent, seg)?;
        match child.kind() {
            NodeKind::Leaf | NodeKind::LeafList => {
                if !last {
                    return Err(through_leaf(path, seg));
                }
                reject_predicates(path, seg)?;
            }
            NodeKind::Container => reject_predicates(path, seg)?,
            NodeKind::List => {
                let keys = match_keys(path, child, seg)?;
                if matches!(keys, KeyMatch::Partial(_)) && !last && !partial_key_match {
                    return Err(BindError::MissingKeys {
                        path: path.to_string(),
                        list: child.name().to_string(),
                    });
                }
            }
        }
        parent = child;
    }
    Ok(())
}

struct Resolver<'p> {
    path: &'p Path,
    partial_key_match: bool,
}

impl Resolver<'_> {
    fn collect(
        &self,
        current: &Container,
        schema: &SchemaNode,
        base: NodeRef,
        segments: &[Segment],
        out: &mut Vec<NodeRef>,
    ) -> Result<()> {
        let Some((seg, rest)) = segments.split_first() else {
            out.push(base);
            return Ok(());
        };
        let last = rest.is_empty();
        let (idx, child) = child_of(self.path, schema, seg)?;
        let here = base.field(idx, child);

        match child.kind() {
            NodeKind::Leaf | NodeKind::LeafList => {
                if !last {
                    return Err(through_leaf(self.path, seg));
                }
                reject_predicates(self.path, seg)?;
                if current.field(idx).is_some() {
                    out.push(here);
                }
                Ok(())
            }
            NodeKind::Container => {
                reject_predicates(self.path, seg)?;
                match current.field(idx) {
                    Some(DataNode::Container(c)) => self.collect(c, child, here, rest, out),
                    Some(_) => Err(kind_mismatch(self.path, child)),
                    None => Ok(()),
                }
            }
            NodeKind::List => {
                let keys = match_keys(self.path, child, seg)?;
                let list = match current.field(idx) {
                    Some(DataNode::List(list)) => list,
                    Some(_) => return Err(kind_mismatch(self.path, child)),
                    None => return Ok(()),
                };
                match &keys {
                    KeyMatch::Full(key, _) => match list.get(key) {
                        Some(entry) => {
                            let entry_ref = here.entry(key.clone(), child);
                            self.collect(entry, child, entry_ref, rest, out)
                        }
                        None => Ok(()),
                    },
                    KeyMatch::Partial(given) if last && !self.partial_key_match => {
                        // Keys that were given still have to match something
                        let any_given = given.iter().any(Option::is_some);
                        if !any_given || list.keys().any(|key| keys.accepts(key)) {
                            out.push(here);
                        }
                        Ok(())
                    }
                    KeyMatch::Partial(_) if !self.partial_key_match => Err(BindError::MissingKeys {
                        path: self.path.to_string(),
                        list: child.name().to_string(),
                    }),
                    KeyMatch::Partial(_) => {
                        for (key, entry) in list.iter().filter(|(key, _)| keys.accepts(key)) {
                            let entry_ref = here.entry(key.clone(), child);
                            self.collect(entry, child, entry_ref, rest, out)?;
                        }
                        Ok(())
                    }
                }
            }
        }
    }
}

/// The entries of `list` agreeing with the keys the last segment of `path`
/// gives; every entry when it gives none
///
/// # Errors
///
/// Returns `InvalidPath`-kind errors when the segment's keys do not fit
/// `list_schema`.
pub(crate) fn matching_entries(path: &Path, list_schema: &SchemaNode, list: &List) -> Result<List> {
    let Some(seg) = path.last() else {
        return Ok(list.clone());
    };
    let keys = match_keys(path, list_schema, seg)?;
    let mut out = List::default();
    for (key, entry) in list.iter().filter(|(key, _)| keys.accepts(key)) {
        out.insert(key.clone(), entry.clone());
    }
    Ok(out)
}

impl DataTree {
    /// Resolve a path without modifying the tree
    ///
    /// Returns every matching node; an empty result means no data exists at
    /// the path. A list segment without its complete keys resolves to the
    /// collection when it is the last segment, provided some entry agrees
    /// with whatever keys it does give. With `partial_key_match` set,
    /// incomplete keys instead match every entry agreeing on the keys given,
    /// at any depth.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`-kind errors for unknown segments or keys, for
    /// descending through a leaf, and for incomplete keys on an intermediate
    /// list segment when `partial_key_match` is off. The path is checked
    /// against the schema before any data is looked at.
    pub fn get_node(&self, path: &Path, partial_key_match: bool) -> Result<Vec<NodeRef>> {
        check_schema_path(self.schema.root(), path, partial_key_match)?;
        let resolver = Resolver {
            path,
            partial_key_match,
        };
        let mut out = Vec::new();
        resolver.collect(
            &self.root,
            self.schema.root(),
            NodeRef::root(),
            path.segments(),
            &mut out,
        )?;
        debug!(path = %path, matches = out.len(), "resolved node");
        Ok(out)
    }

    /// Resolve a path, allocating missing containers and list entries
    ///
    /// New entries get their key leaves set from the path. A final list
    /// segment without complete keys yields the collection itself; a leaf
    /// segment yields a reference whose value may still be unset.
    ///
    /// # Errors
    ///
    /// Returns `InvalidPath`-kind errors for unknown segments or keys, for
    /// descending through a leaf, and `MissingKeys` for incomplete keys on an
    /// intermediate list segment. The whole path is checked against the
    /// schema first, so a failed resolution allocates nothing.
    pub fn get_or_create_node(&mut self, path: &Path) -> Result<NodeRef> {
        check_schema_path(self.schema.root(), path, false)?;
        let schema = Arc::clone(&self.schema);
        let mut parent = schema.root();
        let mut current = &mut self.root;
        let mut node = NodeRef::root();
        let segments = path.segments();

        for (pos, seg) in segments.iter().enumerate() {
            let last = pos + 1 == segments.len();
            let (idx, child) = child_of(path, parent, seg)?;
            node = node.field(idx, child);

            match child.kind() {
                NodeKind::Leaf | NodeKind::LeafList => {
                    if !last {
                        return Err(through_leaf(path, seg));
                    }
                    reject_predicates(path, seg)?;
                }
                NodeKind::Container => {
                    reject_predicates(path, seg)?;
                    let slot = current.slot_mut(idx);
                    let DataNode::Container(c) =
                        slot.get_or_insert_with(|| DataNode::Container(Container::new(child)))
                    else {
                        return Err(kind_mismatch(path, child));
                    };
                    current = c;
                }
                NodeKind::List => {
                    let keys = match_keys(path, child, seg)?;
                    if matches!(keys, KeyMatch::Partial(_)) && !last {
                        return Err(BindError::MissingKeys {
                            path: path.to_string(),
                            list: child.name().to_string(),
                        });
                    }
                    let slot = current.slot_mut(idx);
                    let DataNode::List(list) = slot.get_or_insert_with(|| DataNode::List(List::default()))
                    else {
                        return Err(kind_mismatch(path, child));
                    };
                    let KeyMatch::Full(key, values) = keys else {
                        break;
                    };
                    let entry = list.entry_or_insert_with(key.clone(), || stamped_entry(child, &values));
                    node = node.entry(key, child);
                    current = entry;
                }
            }
            parent = child;
        }

        debug!(path = %path, shape = %node.shape(), "resolved or created node");
        Ok(node)
    }

    /// Remove the node a reference points at
    ///
    /// Removing the root clears the whole tree. Returns whether anything was
    /// removed.
    ///
    /// # Errors
    ///
    /// Returns `InternalSchema` if stored data disagrees with the reference.
    pub fn remove(&mut self, node: &NodeRef) -> Result<bool> {
        let Some((last, parent_steps)) = node.steps().split_last() else {
            self.root = Container::new(self.schema.root());
            return Ok(true);
        };
        let removed = match (last, slot_at(&mut self.root, parent_steps)) {
            (_, None) => false,
            (Step::Field(idx), Some(SlotMut::Container(c))) => c.take_field(*idx).is_some(),
            (Step::Field(idx), Some(SlotMut::Field(Some(DataNode::Container(c))))) => {
                c.take_field(*idx).is_some()
            }
            (Step::Entry(key), Some(SlotMut::Field(Some(DataNode::List(list))))) => {
                list.remove(key).is_some()
            }
            (_, Some(SlotMut::Field(None))) => false,
            _ => {
                return Err(BindError::InternalSchema {
                    message: format!("reference {} does not match stored data", node.path()),
                })
            }
        };
        debug!(path = %node.path(), removed, "removed node");
        Ok(removed)
    }
}
