use super::*;
use crate::model::item::ItemKind;

fn item(id: &str, weight: u64) -> WeightedItem {
    WeightedItem::new(id, weight, ItemKind::ChatHistory)
}

#[test]
fn shrunk_and_removed_items_feed_the_waste_sink() {
    let before = [item("h", 20_000), item("r", 15_000), item("t", 1_000)];
    let after = [item("h", 8_000), item("r", 10_000)];
    let graph = diff(&before, &after).unwrap();

    let ids: Vec<_> = graph.edges.iter().map(|e| e.item_id.as_str()).collect();
    assert_eq!(ids, ["h", "r", "t"]);

    let h = graph.edge("h").unwrap();
    assert_eq!(h.status, EdgeStatus::Shrunk);
    assert_eq!((h.before_weight, h.after_weight), (20_000, 8_000));
    assert!((h.pct_change().unwrap() + 0.6).abs() < 1e-12);

    let r = graph.edge("r").unwrap();
    assert_eq!(r.status, EdgeStatus::Shrunk);
    assert!((r.pct_change().unwrap() + 1.0 / 3.0).abs() < 1e-12);

    let t = graph.edge("t").unwrap();
    assert_eq!(t.status, EdgeStatus::Removed);
    assert_eq!(t.after_weight, 0);
    assert_eq!(t.pct_change(), Some(-1.0));

    assert_eq!(graph.waste_total, 1_000);
    assert_eq!(graph.before_total, 36_000);
    assert_eq!(graph.after_total, 18_000);
}

#[test]
fn empty_before_yields_added_edges() {
    let graph = diff(&[], &[item("new", 500)]).unwrap();
    assert_eq!(graph.edges.len(), 1);
    assert_eq!(graph.edges[0].status, EdgeStatus::Added);
    assert_eq!(graph.edges[0].pct_change(), None);
    assert_eq!(graph.waste_total, 0);
    assert_eq!(graph.before_total, 0);
    assert_eq!(graph.after_total, 500);
}

#[test]
fn both_empty_is_an_empty_graph() {
    let graph = diff(&[], &[]).unwrap();
    assert!(graph.edges.is_empty());
    assert_eq!(graph.before_total + graph.after_total + graph.waste_total, 0);
}

#[test]
fn duplicate_ids_name_the_side() {
    let dup = [item("a", 1), item("a", 2)];
    match diff(&dup, &[]).unwrap_err() {
        CtxmapError::DuplicateIdentity { id, side } => {
            assert_eq!(id, "a");
            assert_eq!(side, Side::Before);
        }
        other => panic!("unexpected error: {other}"),
    }
    match diff(&[item("a", 1)], &dup).unwrap_err() {
        CtxmapError::DuplicateIdentity { side, .. } => assert_eq!(side, Side::After),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn edge_order_is_before_then_added_in_after_order() {
    let before = [item("a", 5), item("b", 5), item("c", 5)];
    let after = [item("z", 1), item("c", 7), item("y", 2), item("a", 5)];
    let graph = diff(&before, &after).unwrap();

    let got: Vec<_> = graph
        .edges
        .iter()
        .map(|e| (e.item_id.as_str(), e.status))
        .collect();
    assert_eq!(
        got,
        [
            ("a", EdgeStatus::Unchanged),
            ("b", EdgeStatus::Removed),
            ("c", EdgeStatus::Grown),
            ("z", EdgeStatus::Added),
            ("y", EdgeStatus::Added),
        ]
    );
}

#[test]
fn reordering_alone_changes_nothing() {
    let before = [item("a", 3), item("b", 4)];
    let after = [item("b", 4), item("a", 3)];
    let graph = diff(&before, &after).unwrap();
    assert!(graph.edges.iter().all(|e| e.status == EdgeStatus::Unchanged));
    assert_eq!(graph.saved(), 0);
}

#[test]
fn matched_edge_takes_the_after_kind() {
    let before = [WeightedItem::new("x", 10, ItemKind::ChatHistory)];
    let after = [WeightedItem::new("x", 4, ItemKind::Scratchpad)];
    let graph = diff(&before, &after).unwrap();
    assert_eq!(graph.edges[0].kind, ItemKind::Scratchpad);
}

#[test]
fn overflowing_totals_fail_cleanly() {
    let before = [item("a", u64::MAX), item("b", 1)];
    let err = diff(&before, &[]).unwrap_err();
    assert!(matches!(err, CtxmapError::Validation(_)));
}

#[test]
fn diff_is_deterministic() {
    let before: Vec<_> = (0..500u64).map(|i| item(&format!("b{i}"), i)).collect();
    let after: Vec<_> = (250..800u64).rev().map(|i| item(&format!("b{i}"), i / 2)).collect();
    assert_eq!(diff(&before, &after).unwrap(), diff(&before, &after).unwrap());
}

#[test]
fn labeled_diff_passes_labels_through() {
    let flow = diff_labeled(&[item("a", 1)], &[], DiffLabels::new("Naive", "Compressed")).unwrap();
    assert_eq!(flow.labels.before, "Naive");
    assert_eq!(flow.labels.after, "Compressed");
    assert_eq!(flow.graph.waste_total, 1);
    assert_eq!(DiffLabels::default(), DiffLabels::new("Before", "After"));
}
