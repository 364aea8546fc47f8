use std::collections::BTreeSet;

use crate::chain::tree::{ChainNode, NodePath, paths_in_chain};

/// Reduce a selection so no path is listed together with a fully selected ancestor group.
///
/// A group whose own path and every descendant path are selected collapses to the group's
/// path alone. The result is in depth-first order; unknown paths are dropped.
pub fn normalize_selected_paths<L>(
    nodes: &[ChainNode<L>],
    selected: &[NodePath],
) -> Vec<NodePath> {
    fn walk<L>(
        nodes: &[ChainNode<L>],
        prefix: &mut NodePath,
        selected: &BTreeSet<NodePath>,
        out: &mut Vec<NodePath>,
    ) {
        for (i, node) in nodes.iter().enumerate() {
            prefix.push(i);
            let own = selected.contains(prefix);
            match node {
                ChainNode::Group(group)
                    if own && fully_selected(&group.items, prefix, selected) =>
                {
                    out.push(prefix.clone());
                }
                ChainNode::Group(group) => {
                    if own {
                        out.push(prefix.clone());
                    }
                    walk(&group.items, prefix, selected, out);
                }
                ChainNode::Leaf(_) => {
                    if own {
                        out.push(prefix.clone());
                    }
                }
            }
            prefix.pop();
        }
    }

    let selected: BTreeSet<NodePath> = selected.iter().cloned().collect();
    let mut out = Vec::new();
    walk(nodes, &mut Vec::new(), &selected, &mut out);
    out
}

fn fully_selected<L>(
    items: &[ChainNode<L>],
    prefix: &[usize],
    selected: &BTreeSet<NodePath>,
) -> bool {
    paths_in_chain(items).into_iter().all(|rel| {
        let mut abs = prefix.to_vec();
        abs.extend(rel);
        selected.contains(&abs)
    })
}

/// Every path between `anchor` and `clicked` (inclusive) in depth-first order.
///
/// Falls back to `[clicked]` when the anchor is not in the chain; an unknown `clicked` yields
/// an empty range.
pub fn range_select<L>(
    nodes: &[ChainNode<L>],
    anchor: &[usize],
    clicked: &[usize],
) -> Vec<NodePath> {
    let flat = paths_in_chain(nodes);
    let Some(end) = flat.iter().position(|p| p == clicked) else {
        return Vec::new();
    };
    let Some(start) = flat.iter().position(|p| p == anchor) else {
        return vec![clicked.to_vec()];
    };
    let (lo, hi) = if start <= end { (start, end) } else { (end, start) };
    flat[lo..=hi].to_vec()
}

/// Editor selection over one chain snapshot.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Vec<NodePath>,
    anchor: Option<NodePath>,
}

impl Selection {
    /// Empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected paths in selection order.
    pub fn paths(&self) -> &[NodePath] {
        &self.selected
    }

    /// Anchor used by range selection.
    pub fn anchor(&self) -> Option<&[usize]> {
        self.anchor.as_deref()
    }

    /// Return `true` when `path` is selected.
    pub fn contains(&self, path: &[usize]) -> bool {
        self.selected.iter().any(|p| p == path)
    }

    /// Plain click: select only `path` and make it the anchor.
    pub fn click(&mut self, path: NodePath) {
        self.selected = vec![path.clone()];
        self.anchor = Some(path);
    }

    /// Ctrl-click: add or remove `path`, moving the anchor to it.
    pub fn toggle(&mut self, path: NodePath) {
        if let Some(i) = self.selected.iter().position(|p| *p == path) {
            self.selected.remove(i);
        } else {
            self.selected.push(path.clone());
        }
        self.anchor = Some(path);
    }

    /// Shift-click: select the range from the anchor to `path`, keeping the anchor.
    pub fn extend<L>(&mut self, nodes: &[ChainNode<L>], path: NodePath) {
        match &self.anchor {
            Some(anchor) => self.selected = range_select(nodes, anchor, &path),
            None => self.click(path),
        }
    }

    /// Deselect everything.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.anchor = None;
    }

    /// Selection with redundant descendants removed, see [`normalize_selected_paths`].
    pub fn normalized<L>(&self, nodes: &[ChainNode<L>]) -> Vec<NodePath> {
        normalize_selected_paths(nodes, &self.selected)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/chain/selection.rs"]
mod tests;
