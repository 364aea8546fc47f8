use super::*;
use crate::chain::instance::EffectInstance;

type Node = ChainNode<EffectInstance>;

fn leaf(id: &str) -> Node {
    let mut inst = EffectInstance::new("intensity");
    inst.id = id.to_owned();
    ChainNode::Leaf(inst)
}

fn group(id: &str, items: Vec<Node>) -> Node {
    let mut g = ChainGroup::new(id.to_uppercase(), items);
    g.id = id.to_owned();
    ChainNode::Group(g)
}

/// a, g[b, c, h[d]], e
fn sample() -> Vec<Node> {
    vec![
        leaf("a"),
        group("g", vec![leaf("b"), leaf("c"), group("h", vec![leaf("d")])]),
        leaf("e"),
    ]
}

fn ids(nodes: &[Node]) -> Vec<String> {
    paths_in_chain(nodes)
        .iter()
        .map(|p| node_at_path(nodes, p).unwrap().id().to_owned())
        .collect()
}

#[test]
fn paths_are_depth_first_with_groups_first() {
    let nodes = sample();
    assert_eq!(
        paths_in_chain(&nodes),
        vec![
            vec![0],
            vec![1],
            vec![1, 0],
            vec![1, 1],
            vec![1, 2],
            vec![1, 2, 0],
            vec![2]
        ]
    );
    assert_eq!(ids(&nodes), ["a", "g", "b", "c", "h", "d", "e"]);
}

#[test]
fn find_and_lookup_by_path() {
    let nodes = sample();
    assert_eq!(find_path_by_id(&nodes, "d"), Some(vec![1, 2, 0]));
    assert_eq!(find_path_by_id(&nodes, "zz"), None);
    assert!(node_at_path(&nodes, &[0, 0]).is_none());
    assert!(node_at_path(&nodes, &[]).is_none());
}

#[test]
fn remove_and_insert_at_path() {
    let mut nodes = sample();
    let removed = remove_at_path(&mut nodes, &[1, 1]).unwrap();
    assert_eq!(removed.id(), "c");
    assert!(remove_at_path(&mut nodes, &[9]).is_none());

    insert_at_path(&mut nodes, &[3], removed, false).unwrap();
    assert_eq!(ids(&nodes), ["a", "g", "b", "h", "d", "e", "c"]);

    insert_at_path(&mut nodes, &[1, 1], leaf("x"), true).unwrap();
    assert_eq!(ids(&nodes), ["a", "g", "b", "h", "d", "x", "e", "c"]);

    assert!(insert_at_path(&mut nodes, &[0], leaf("y"), true).is_err());
    assert!(insert_at_path(&mut nodes, &[0, 0], leaf("y"), false).is_err());
}

#[test]
fn collect_and_remove_by_ids_preserve_order() {
    let mut nodes = sample();
    let picked = collect_by_ids(&nodes, &["e", "d", "a"]);
    let picked: Vec<_> = picked.iter().map(|n| n.id().to_owned()).collect();
    assert_eq!(picked, ["a", "d", "e"]);

    // A matched group is taken whole.
    let whole = collect_by_ids(&nodes, &["h", "d"]);
    assert_eq!(whole.len(), 1);

    let removed = remove_by_ids(&mut nodes, &["c", "e"]);
    assert_eq!(removed.len(), 2);
    assert_eq!(ids(&nodes), ["a", "g", "b", "h", "d"]);
}

#[test]
fn regenerate_ids_is_deep() {
    let mut nodes = sample();
    regenerate_ids(&mut nodes);
    let fresh = ids(&nodes);
    for old in ["a", "g", "b", "c", "h", "d", "e"] {
        assert!(!fresh.iter().any(|id| id == old));
    }
    let mut unique = fresh.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), fresh.len());
}

#[test]
fn disabled_groups_hide_descendants() {
    let mut nodes = sample();
    assert!(set_enabled_by_id(&mut nodes, "h", false));
    assert!(set_enabled_by_id(&mut nodes, "a", false));
    assert!(!set_enabled_by_id(&mut nodes, "nope", false));
    let live: Vec<_> = enabled_leaves(&nodes).iter().map(|l| l.id.clone()).collect();
    assert_eq!(live, ["b", "c", "e"]);
}

#[test]
fn toggle_collapsed_only_affects_groups() {
    let mut nodes = sample();
    assert!(toggle_collapsed_by_id(&mut nodes, "g"));
    assert!(nodes[1].as_group().unwrap().collapsed);
    assert!(!toggle_collapsed_by_id(&mut nodes, "a"));
}

#[test]
fn move_before_after_and_into() {
    let mut nodes = sample();
    move_by_ids(&mut nodes, &["e", "a"], "c", DropPosition::Before).unwrap();
    assert_eq!(ids(&nodes), ["g", "b", "a", "e", "c", "h", "d"]);

    let mut nodes = sample();
    move_by_ids(&mut nodes, &["b"], "e", DropPosition::After).unwrap();
    assert_eq!(ids(&nodes), ["a", "g", "c", "h", "d", "e", "b"]);

    let mut nodes = sample();
    move_by_ids(&mut nodes, &["a"], "h", DropPosition::Into).unwrap();
    assert_eq!(ids(&nodes), ["g", "b", "c", "h", "d", "a", "e"]);
}

#[test]
fn invalid_moves_leave_chain_untouched() {
    let mut nodes = sample();
    assert!(move_by_ids(&mut nodes, &["g"], "d", DropPosition::Before).is_err());
    assert!(move_by_ids(&mut nodes, &["a"], "e", DropPosition::Into).is_err());
    assert!(move_by_ids(&mut nodes, &["a"], "missing", DropPosition::After).is_err());
    assert_eq!(nodes, sample());
    move_by_ids(&mut nodes, &["missing"], "a", DropPosition::After).unwrap();
    assert_eq!(nodes, sample());
}

#[test]
fn group_from_selection_takes_first_position() {
    let mut nodes = sample();
    let id = group_by_ids(&mut nodes, &["e", "c"], "Mine").unwrap().unwrap();
    let path = find_path_by_id(&nodes, &id).unwrap();
    assert_eq!(path, vec![1, 1]);
    let g = node_at_path(&nodes, &path).unwrap().as_group().unwrap();
    assert_eq!(g.name, "Mine");
    let inner: Vec<_> = g.items.iter().map(|n| n.id().to_owned()).collect();
    assert_eq!(inner, ["c", "e"]);
    assert_eq!(nodes.len(), 2);

    assert_eq!(group_by_ids(&mut nodes, &["none"], "X").unwrap(), None);
}

#[test]
fn chain_json_uses_type_tags() {
    let json = serde_json::json!([
        {"type": "leaf", "id": "a", "effect_id": "scale"},
        {"type": "group", "id": "g", "name": "G", "items": [
            {"type": "leaf", "id": "b", "effect_id": "rotate", "enabled": false}
        ]}
    ]);
    let nodes: Vec<Node> = serde_json::from_value(json).unwrap();
    assert_eq!(ids(&nodes), ["a", "g", "b"]);
    assert!(nodes[1].as_group().unwrap().enabled);
    assert!(!nodes[1].as_group().unwrap().items[0].is_enabled());
}

#[test]
fn group_without_items_deserializes_empty() {
    let json = serde_json::json!([
        {"type": "group", "id": "g", "name": "G", "collapsed": true}
    ]);
    let nodes: Vec<Node> = serde_json::from_value(json).unwrap();
    let g = nodes[0].as_group().unwrap();
    assert!(g.items.is_empty());
    assert!(g.enabled && g.collapsed);
    assert!(paths_in_chain(&nodes).len() == 1);
}
