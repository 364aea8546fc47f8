//! Nested, ordered chains of leaves and groups.
//!
//! Nodes are addressed by paths (child indices from the root). A path is only meaningful for
//! the snapshot it was computed from: every mutating helper here takes durable ids and
//! re-derives paths itself.

use serde::{Deserialize, Serialize};

use crate::chain::instance::{ChainLeaf, new_node_id};
use crate::foundation::error::{FxError, FxResult};

/// Child indices from the root of a chain down to a node.
pub type NodePath = Vec<usize>;

fn default_enabled() -> bool {
    true
}

/// A named, collapsible container of chain nodes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChainGroup<L> {
    /// Durable id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Children in order.
    #[serde(default = "Vec::new")]
    pub items: Vec<ChainNode<L>>,
    /// A disabled group disables every descendant.
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Editor state only.
    #[serde(default)]
    pub collapsed: bool,
}

impl<L> ChainGroup<L> {
    /// Enabled, expanded group with a fresh id.
    pub fn new(name: impl Into<String>, items: Vec<ChainNode<L>>) -> Self {
        Self {
            id: new_node_id(),
            name: name.into(),
            items,
            enabled: true,
            collapsed: false,
        }
    }
}

/// One entry in a chain.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChainNode<L> {
    /// An effect or preset instance.
    Leaf(L),
    /// A group of nodes.
    Group(ChainGroup<L>),
}

impl<L: ChainLeaf> ChainNode<L> {
    /// Durable id.
    pub fn id(&self) -> &str {
        match self {
            Self::Leaf(leaf) => leaf.id(),
            Self::Group(group) => &group.id,
        }
    }

    fn set_id(&mut self, id: String) {
        match self {
            Self::Leaf(leaf) => leaf.set_id(id),
            Self::Group(group) => group.id = id,
        }
    }

    /// Own enabled flag (ancestors not considered).
    pub fn is_enabled(&self) -> bool {
        match self {
            Self::Leaf(leaf) => leaf.is_enabled(),
            Self::Group(group) => group.enabled,
        }
    }

    /// Set the own enabled flag.
    pub fn set_enabled(&mut self, enabled: bool) {
        match self {
            Self::Leaf(leaf) => leaf.set_enabled(enabled),
            Self::Group(group) => group.enabled = enabled,
        }
    }

    /// Group view of this node.
    pub fn as_group(&self) -> Option<&ChainGroup<L>> {
        match self {
            Self::Group(group) => Some(group),
            Self::Leaf(_) => None,
        }
    }

    /// Leaf view of this node.
    pub fn as_leaf(&self) -> Option<&L> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Group(_) => None,
        }
    }
}

/// Where a dragged selection lands relative to the drop target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropPosition {
    /// Immediately before the target, in the target's parent.
    Before,
    /// Immediately after the target, in the target's parent.
    After,
    /// At the end of the target group's items.
    Into,
}

/// Every node path in depth-first order, each group before its children.
pub fn paths_in_chain<L>(nodes: &[ChainNode<L>]) -> Vec<NodePath> {
    fn walk<L>(nodes: &[ChainNode<L>], prefix: &mut NodePath, out: &mut Vec<NodePath>) {
        for (i, node) in nodes.iter().enumerate() {
            prefix.push(i);
            out.push(prefix.clone());
            if let ChainNode::Group(group) = node {
                walk(&group.items, prefix, out);
            }
            prefix.pop();
        }
    }
    let mut out = Vec::new();
    walk(nodes, &mut Vec::new(), &mut out);
    out
}

/// Node at `path`.
pub fn node_at_path<'a, L>(
    nodes: &'a [ChainNode<L>],
    path: &[usize],
) -> Option<&'a ChainNode<L>> {
    let (&first, rest) = path.split_first()?;
    let mut node = nodes.get(first)?;
    for &i in rest {
        node = match node {
            ChainNode::Group(group) => group.items.get(i)?,
            ChainNode::Leaf(_) => return None,
        };
    }
    Some(node)
}

/// Mutable node at `path`.
pub fn node_at_path_mut<'a, L>(
    nodes: &'a mut [ChainNode<L>],
    path: &[usize],
) -> Option<&'a mut ChainNode<L>> {
    let (&first, rest) = path.split_first()?;
    let mut node = nodes.get_mut(first)?;
    for &i in rest {
        node = match node {
            ChainNode::Group(group) => group.items.get_mut(i)?,
            ChainNode::Leaf(_) => return None,
        };
    }
    Some(node)
}

/// Items list that contains the node at `path`, plus the node's index in it.
fn container_mut<'a, L>(
    nodes: &'a mut Vec<ChainNode<L>>,
    path: &[usize],
) -> Option<(&'a mut Vec<ChainNode<L>>, usize)> {
    let (&last, parent) = path.split_last()?;
    if parent.is_empty() {
        return Some((nodes, last));
    }
    match node_at_path_mut(nodes, parent)? {
        ChainNode::Group(group) => Some((&mut group.items, last)),
        ChainNode::Leaf(_) => None,
    }
}

/// Remove and return the node at `path`.
pub fn remove_at_path<L>(nodes: &mut Vec<ChainNode<L>>, path: &[usize]) -> Option<ChainNode<L>> {
    let (items, index) = container_mut(nodes, path)?;
    (index < items.len()).then(|| items.remove(index))
}

/// Insert `node` at `path`, or at the end of the group at `path` when `into` is set.
///
/// The last path index may equal the container length to append.
pub fn insert_at_path<L>(
    nodes: &mut Vec<ChainNode<L>>,
    path: &[usize],
    node: ChainNode<L>,
    into: bool,
) -> FxResult<()> {
    if into {
        return match node_at_path_mut(nodes, path) {
            Some(ChainNode::Group(group)) => {
                group.items.push(node);
                Ok(())
            }
            _ => Err(FxError::chain(format!("no group at path {path:?}"))),
        };
    }
    match container_mut(nodes, path) {
        Some((items, index)) if index <= items.len() => {
            items.insert(index, node);
            Ok(())
        }
        _ => Err(FxError::chain(format!("invalid insert path {path:?}"))),
    }
}

/// Path of the node with `id`, searching depth-first.
pub fn find_path_by_id<L: ChainLeaf>(nodes: &[ChainNode<L>], id: &str) -> Option<NodePath> {
    for (i, node) in nodes.iter().enumerate() {
        if node.id() == id {
            return Some(vec![i]);
        }
        if let ChainNode::Group(group) = node
            && let Some(mut rest) = find_path_by_id(&group.items, id)
        {
            rest.insert(0, i);
            return Some(rest);
        }
    }
    None
}

/// Mutable node with `id`.
pub fn find_by_id_mut<'a, L: ChainLeaf>(
    nodes: &'a mut [ChainNode<L>],
    id: &str,
) -> Option<&'a mut ChainNode<L>> {
    let path = find_path_by_id(nodes, id)?;
    node_at_path_mut(nodes, &path)
}

/// Clones of the nodes whose id is in `ids`, in depth-first order.
///
/// A matched group is returned whole; its descendants are not matched separately.
pub fn collect_by_ids<L: ChainLeaf + Clone>(
    nodes: &[ChainNode<L>],
    ids: &[&str],
) -> Vec<ChainNode<L>> {
    let mut out = Vec::new();
    for node in nodes {
        if ids.contains(&node.id()) {
            out.push(node.clone());
        } else if let ChainNode::Group(group) = node {
            out.extend(collect_by_ids(&group.items, ids));
        }
    }
    out
}

/// Remove the nodes whose id is in `ids` and return them in depth-first order.
pub fn remove_by_ids<L: ChainLeaf>(
    nodes: &mut Vec<ChainNode<L>>,
    ids: &[&str],
) -> Vec<ChainNode<L>> {
    let mut removed = Vec::new();
    let mut kept = Vec::with_capacity(nodes.len());
    for mut node in nodes.drain(..) {
        if ids.contains(&node.id()) {
            removed.push(node);
            continue;
        }
        if let ChainNode::Group(group) = &mut node {
            removed.extend(remove_by_ids(&mut group.items, ids));
        }
        kept.push(node);
    }
    *nodes = kept;
    removed
}

/// Give every node in `nodes` (recursively) a fresh id, e.g. before pasting copies.
pub fn regenerate_ids<L: ChainLeaf>(nodes: &mut [ChainNode<L>]) {
    for node in nodes {
        node.set_id(new_node_id());
        if let ChainNode::Group(group) = node {
            regenerate_ids(&mut group.items);
        }
    }
}

/// Enabled leaves in execution order. A disabled group hides its whole subtree.
pub fn enabled_leaves<L: ChainLeaf>(nodes: &[ChainNode<L>]) -> Vec<&L> {
    fn walk<'a, L: ChainLeaf>(nodes: &'a [ChainNode<L>], out: &mut Vec<&'a L>) {
        for node in nodes {
            match node {
                ChainNode::Leaf(leaf) if leaf.is_enabled() => out.push(leaf),
                ChainNode::Group(group) if group.enabled => walk(&group.items, out),
                _ => {}
            }
        }
    }
    let mut out = Vec::new();
    walk(nodes, &mut out);
    out
}

/// Set the enabled flag of the node with `id`. Returns `false` if no such node exists.
pub fn set_enabled_by_id<L: ChainLeaf>(
    nodes: &mut [ChainNode<L>],
    id: &str,
    enabled: bool,
) -> bool {
    match find_by_id_mut(nodes, id) {
        Some(node) => {
            node.set_enabled(enabled);
            true
        }
        None => false,
    }
}

/// Flip the collapsed flag of the group with `id`. Returns `false` if no such group exists.
pub fn toggle_collapsed_by_id<L: ChainLeaf>(nodes: &mut [ChainNode<L>], id: &str) -> bool {
    match find_by_id_mut(nodes, id) {
        Some(ChainNode::Group(group)) => {
            group.collapsed = !group.collapsed;
            true
        }
        _ => false,
    }
}

/// Move the nodes with `ids` next to or into the node with `target_id`.
///
/// Moved nodes keep their relative depth-first order. The target may not be one of the
/// moved nodes or inside one of them.
pub fn move_by_ids<L: ChainLeaf + Clone>(
    nodes: &mut Vec<ChainNode<L>>,
    ids: &[&str],
    target_id: &str,
    position: DropPosition,
) -> FxResult<()> {
    let moving = collect_by_ids(nodes, ids);
    if moving.is_empty() {
        return Ok(());
    }
    if find_path_by_id(&moving, target_id).is_some() {
        return Err(FxError::chain("cannot drop a selection onto itself"));
    }
    let Some(target) = find_path_by_id(nodes, target_id) else {
        return Err(FxError::chain(format!("unknown drop target '{target_id}'")));
    };
    if position == DropPosition::Into
        && node_at_path(nodes, &target)
            .and_then(ChainNode::as_group)
            .is_none()
    {
        return Err(FxError::chain(format!(
            "drop target '{target_id}' is not a group"
        )));
    }

    let moved = remove_by_ids(nodes, ids);
    let Some(mut path) = find_path_by_id(nodes, target_id) else {
        return Err(FxError::chain(format!("unknown drop target '{target_id}'")));
    };
    match position {
        DropPosition::Into => {
            for node in moved {
                insert_at_path(nodes, &path, node, true)?;
            }
        }
        DropPosition::Before | DropPosition::After => {
            if position == DropPosition::After
                && let Some(last) = path.last_mut()
            {
                *last += 1;
            }
            for node in moved {
                insert_at_path(nodes, &path, node, false)?;
                if let Some(last) = path.last_mut() {
                    *last += 1;
                }
            }
        }
    }
    Ok(())
}

/// Wrap the nodes with `ids` in a new group placed where the first of them (depth-first) was.
///
/// Returns the new group's id, or `None` when no id matched.
pub fn group_by_ids<L: ChainLeaf>(
    nodes: &mut Vec<ChainNode<L>>,
    ids: &[&str],
    name: &str,
) -> FxResult<Option<String>> {
    let Some(anchor) = paths_in_chain(nodes)
        .into_iter()
        .find(|path| node_at_path(nodes, path).is_some_and(|n| ids.contains(&n.id())))
    else {
        return Ok(None);
    };
    // Every other match follows the anchor depth-first, so removing them leaves the anchor's
    // path valid for insertion.
    let items = remove_by_ids(nodes, ids);
    let group = ChainGroup::new(name, items);
    let id = group.id.clone();
    insert_at_path(nodes, &anchor, ChainNode::Group(group), false)?;
    Ok(Some(id))
}

#[cfg(test)]
#[path = "../../tests/unit/chain/tree.rs"]
mod tests;
