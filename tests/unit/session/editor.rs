use std::sync::{Arc, Mutex};

use super::*;
use crate::model::item::ItemKind;

fn snapshot() -> ContextSnapshot {
    ContextSnapshot::new(
        1_000,
        vec![
            WeightedItem::new("sys", 100, ItemKind::SystemPrompt),
            WeightedItem::new("doc", 400, ItemKind::Rag),
            WeightedItem::new("user", 50, ItemKind::UserMessage),
        ],
    )
}

fn focus(id: &str) -> SessionEvent {
    SessionEvent::Focus(id.to_string())
}

#[test]
fn new_rejects_invalid_snapshot() {
    let over = ContextSnapshot::new(10, vec![WeightedItem::new("a", 11, ItemKind::Tool)]);
    assert!(EditSession::new(over).is_err());
}

#[test]
fn view_explore_edit_cycle() {
    let mut s = EditSession::new(snapshot()).unwrap();
    assert_eq!(s.mode(), &InteractionMode::View);

    s.handle(focus("doc")).unwrap();
    assert_eq!(
        s.mode(),
        &InteractionMode::Explore {
            focus: "doc".to_string()
        }
    );

    s.handle(SessionEvent::BeginEdit).unwrap();
    assert_eq!(
        s.mode(),
        &InteractionMode::Edit {
            target: "doc".to_string()
        }
    );

    s.handle(SessionEvent::Cancel).unwrap();
    s.handle(focus("sys")).unwrap();
    s.handle(SessionEvent::Blur).unwrap();
    assert_eq!(s.mode(), &InteractionMode::View);
}

#[test]
fn invalid_transitions_leave_mode_untouched() {
    let mut s = EditSession::new(snapshot()).unwrap();
    assert!(s.handle(SessionEvent::BeginEdit).is_err());
    assert!(s.handle(SessionEvent::Blur).is_err());
    assert!(s.handle(focus("missing")).is_err());
    assert_eq!(s.mode(), &InteractionMode::View);

    s.handle(focus("doc")).unwrap();
    s.handle(SessionEvent::BeginEdit).unwrap();
    assert!(s.handle(focus("sys")).is_err());
    assert!(matches!(s.mode(), InteractionMode::Edit { .. }));
}

#[test]
fn weight_edits_track_original_value() {
    let mut s = EditSession::new(snapshot()).unwrap();
    s.set_weight("doc", 300).unwrap();
    s.set_weight("doc", 200).unwrap();

    assert_eq!(
        s.edits().get("doc"),
        Some(&WeightEdit {
            original: 400,
            edited: 200
        })
    );
    assert_eq!(s.working().item("doc").map(|i| i.weight), Some(200));
    assert_eq!(s.baseline().item("doc").map(|i| i.weight), Some(400));
    assert!(s.has_changes());
    assert!(matches!(s.set_weight("nope", 1), Err(CtxmapError::Validation(_))));
}

#[test]
fn reorder_moves_listed_ids_first() {
    let mut s = EditSession::new(snapshot()).unwrap();
    s.reorder(["user", "ghost", "doc"]);
    let ids: Vec<_> = s.working().items.iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, ["user", "doc", "sys"]);
}

#[test]
fn removing_focused_item_returns_to_view() {
    let mut s = EditSession::new(snapshot()).unwrap();
    s.set_weight("doc", 10).unwrap();
    s.handle(focus("doc")).unwrap();

    let removed = s.remove("doc").unwrap();
    assert_eq!(removed.weight, 10);
    assert_eq!(s.mode(), &InteractionMode::View);
    assert!(s.edits().is_empty());
    assert!(s.remove("doc").is_err());
}

#[test]
fn reset_discards_pending_changes() {
    let mut s = EditSession::new(snapshot()).unwrap();
    s.set_weight("sys", 1).unwrap();
    s.remove("user").unwrap();
    s.handle(focus("doc")).unwrap();

    s.reset();
    assert!(!s.has_changes());
    assert!(s.edits().is_empty());
    assert_eq!(s.mode(), &InteractionMode::View);
    assert_eq!(s.working(), &snapshot());
}

#[test]
fn commit_runs_hook_and_moves_baseline() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let mut s = EditSession::new(snapshot())
        .unwrap()
        .with_on_commit(move |snap| sink.lock().unwrap().push(snap.total_weight()));

    s.set_weight("doc", 100).unwrap();
    s.handle(focus("doc")).unwrap();
    s.handle(SessionEvent::BeginEdit).unwrap();
    s.handle(SessionEvent::Commit).unwrap();

    assert_eq!(*seen.lock().unwrap(), [250]);
    assert_eq!(s.mode(), &InteractionMode::View);
    assert!(!s.has_changes());
    assert!(s.edits().is_empty());
    assert_eq!(s.baseline().item("doc").map(|i| i.weight), Some(100));
}

#[test]
fn failed_commit_keeps_working_copy() {
    let calls = Arc::new(Mutex::new(0));
    let counter = Arc::clone(&calls);
    let mut s = EditSession::new(snapshot())
        .unwrap()
        .with_on_commit(move |_| *counter.lock().unwrap() += 1);

    s.set_weight("doc", 5_000).unwrap();
    let err = s.handle(SessionEvent::Commit).unwrap_err();
    assert!(matches!(err, CtxmapError::CapacityExceeded { .. }));
    assert_eq!(*calls.lock().unwrap(), 0);
    assert!(s.has_changes());
    assert_eq!(s.baseline(), &snapshot());
}

#[test]
fn mode_serializes_with_tag() {
    let json = serde_json::to_string(&InteractionMode::Explore {
        focus: "doc".to_string(),
    })
    .unwrap();
    assert_eq!(json, r#"{"mode":"explore","focus":"doc"}"#);
}

#[test]
fn debug_does_not_require_hook_debug() {
    let s = EditSession::new(snapshot()).unwrap().with_on_commit(|_| {});
    let dbg = format!("{s:?}");
    assert!(dbg.contains("has_on_commit: true"));
}

#[test]
fn restoring_original_weight_clears_the_edit() {
    let mut s = EditSession::new(snapshot()).unwrap();
    s.set_weight("doc", 300).unwrap();
    s.set_weight("doc", 400).unwrap();
    assert!(s.edits().is_empty());
    assert!(!s.has_changes());

    s.set_weight("sys", 100).unwrap();
    assert!(s.edits().is_empty());
}

fn pools() -> Vec<ResourcePool> {
    use crate::model::resource::PoolItem;
    vec![
        ResourcePool::new(
            "retrieved",
            ItemKind::Rag,
            vec![PoolItem::new("d1", 200), PoolItem::new("d2", 150)],
        ),
        ResourcePool::new("shots", ItemKind::Example, vec![PoolItem::new("ex", 80)]),
    ]
}

fn selections(entries: &[(&str, &[&str])]) -> BTreeMap<String, Vec<String>> {
    entries
        .iter()
        .map(|(name, ids)| (name.to_string(), ids.iter().map(|id| id.to_string()).collect()))
        .collect()
}

fn item_ids(s: &EditSession) -> Vec<&str> {
    s.working().items.iter().map(|item| item.id.as_str()).collect()
}

#[test]
fn with_pools_rejects_repeated_names() {
    let mut twice = pools();
    twice.push(twice[0].clone());
    assert!(EditSession::new(snapshot()).unwrap().with_pools(twice).is_err());

    let s = EditSession::new(snapshot()).unwrap().with_pools(pools()).unwrap();
    assert_eq!(s.pools().len(), 2);
    assert!(s.pool("shots").is_some());
    assert!(format!("{s:?}").contains("pools: 2"));
}

#[test]
fn apply_selections_keeps_other_kinds_and_appends_pool_items() {
    let mut s = EditSession::new(snapshot()).unwrap().with_pools(pools()).unwrap();
    s.apply_selections(&selections(&[("retrieved", &["d2", "d1"]), ("shots", &["ex"])]))
        .unwrap();

    // The old Rag item "doc" belongs to the pool kind and is replaced.
    assert_eq!(item_ids(&s), ["sys", "user", "d1", "d2", "ex"]);
    assert_eq!(s.working().item("ex").map(|item| item.kind), Some(ItemKind::Example));
    assert!(s.has_changes());

    s.apply_selections(&selections(&[("retrieved", &[])])).unwrap();
    assert_eq!(item_ids(&s), ["sys", "user", "ex"]);
    assert!(!s.pool("retrieved").unwrap().is_selected("d1"));
}

#[test]
fn apply_selections_with_unknown_pool_changes_nothing() {
    let mut s = EditSession::new(snapshot()).unwrap().with_pools(pools()).unwrap();
    let err = s
        .apply_selections(&selections(&[("retrieved", &["d1"]), ("missing", &["x"])]))
        .unwrap_err();
    assert!(matches!(err, CtxmapError::Validation(msg) if msg.contains("missing")));
    assert_eq!(s.working(), &snapshot());
    assert_eq!(s.pool("retrieved").unwrap().selected_items().count(), 0);
}

#[test]
fn apply_selections_releases_focus_on_removed_item() {
    let mut s = EditSession::new(snapshot()).unwrap().with_pools(pools()).unwrap();
    s.set_weight("doc", 300).unwrap();
    s.handle(focus("doc")).unwrap();
    s.handle(SessionEvent::BeginEdit).unwrap();

    s.apply_selections(&selections(&[("retrieved", &["d1"])])).unwrap();
    assert_eq!(s.mode(), &InteractionMode::View);
    assert!(s.edits().is_empty());

    s.handle(focus("d1")).unwrap();
    s.apply_selections(&selections(&[("shots", &["ex"])])).unwrap();
    assert_eq!(
        s.mode(),
        &InteractionMode::Explore {
            focus: "d1".to_string()
        }
    );
}

#[test]
fn selections_are_validated_on_commit() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&calls);
    let mut s = EditSession::new(snapshot())
        .unwrap()
        .with_pools(pools())
        .unwrap()
        .with_on_commit(move |snap| seen.lock().unwrap().push(snap.total_weight()));

    s.apply_selections(&selections(&[("retrieved", &["d1", "d2"])])).unwrap();
    s.handle(SessionEvent::Commit).unwrap();
    assert_eq!(*calls.lock().unwrap(), [500]);

    let big = ResourcePool::new(
        "retrieved",
        ItemKind::Rag,
        vec![crate::model::resource::PoolItem::new("huge", 2_000)],
    );
    let mut s = EditSession::new(snapshot()).unwrap().with_pools(vec![big]).unwrap();
    s.apply_selections(&selections(&[("retrieved", &["huge"])])).unwrap();
    let err = s.handle(SessionEvent::Commit).unwrap_err();
    assert!(matches!(err, CtxmapError::CapacityExceeded { .. }));
}
