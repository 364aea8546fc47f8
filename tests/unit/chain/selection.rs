use super::*;
use crate::chain::instance::EffectInstance;
use crate::chain::tree::ChainGroup;

type Node = ChainNode<EffectInstance>;

fn leaf() -> Node {
    ChainNode::Leaf(EffectInstance::new("scale"))
}

/// leaf, group[leaf, leaf], leaf
fn sample() -> Vec<Node> {
    vec![
        leaf(),
        ChainNode::Group(ChainGroup::new("G", vec![leaf(), leaf()])),
        leaf(),
    ]
}

#[test]
fn fully_selected_group_collapses_to_its_path() {
    let nodes = sample();
    let out = normalize_selected_paths(&nodes, &[vec![1, 1], vec![1], vec![1, 0]]);
    assert_eq!(out, vec![vec![1]]);
}

#[test]
fn partial_group_selection_is_kept() {
    let nodes = sample();
    let out = normalize_selected_paths(&nodes, &[vec![2], vec![1], vec![1, 0]]);
    assert_eq!(out, vec![vec![1], vec![1, 0], vec![2]]);

    let children_only = normalize_selected_paths(&nodes, &[vec![1, 0], vec![1, 1]]);
    assert_eq!(children_only, vec![vec![1, 0], vec![1, 1]]);
}

#[test]
fn unknown_paths_are_dropped() {
    let nodes = sample();
    assert_eq!(normalize_selected_paths(&nodes, &[vec![7], vec![0]]), vec![vec![0]]);
}

#[test]
fn range_select_spans_flattened_order_both_ways() {
    let nodes = sample();
    let forward = range_select(&nodes, &[0], &[1, 1]);
    assert_eq!(forward, vec![vec![0], vec![1], vec![1, 0], vec![1, 1]]);
    let backward = range_select(&nodes, &[2], &[1, 1]);
    assert_eq!(backward, vec![vec![1, 1], vec![2]]);
    assert_eq!(range_select(&nodes, &[9], &[2]), vec![vec![2]]);
}

#[test]
fn click_toggle_extend() {
    let nodes = sample();
    let mut sel = Selection::new();
    sel.extend(&nodes, vec![1]);
    assert_eq!(sel.paths(), &[vec![1]]);

    sel.click(vec![0]);
    sel.toggle(vec![2]);
    assert!(sel.contains(&[0]) && sel.contains(&[2]));
    sel.toggle(vec![2]);
    assert!(!sel.contains(&[2]));
    assert_eq!(sel.anchor(), Some(&[2][..]));

    sel.click(vec![1]);
    sel.extend(&nodes, vec![1, 1]);
    assert_eq!(sel.normalized(&nodes), vec![vec![1]]);
    assert_eq!(sel.anchor(), Some(&[1][..]));

    sel.clear();
    assert!(sel.paths().is_empty());
    assert!(sel.anchor().is_none());
}
