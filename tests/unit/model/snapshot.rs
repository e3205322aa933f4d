use super::*;

fn sample() -> ContextSnapshot {
    ContextSnapshot::new(
        1_000,
        vec![
            WeightedItem::new("sys", 100, ItemKind::SystemPrompt),
            WeightedItem::new("doc1", 300, ItemKind::Rag),
            WeightedItem::new("doc2", 200, ItemKind::Rag),
        ],
    )
}

#[test]
fn derived_totals() {
    let s = sample();
    assert_eq!(s.total_weight(), 600);
    assert_eq!(s.unused(), 400);
    assert!((s.utilization() - 60.0).abs() < 1e-12);
    assert_eq!(s.items_of_kind(ItemKind::Rag).count(), 2);
    assert_eq!(s.item("doc2").map(|i| i.weight), Some(200));
    assert!(s.item("missing").is_none());
}

#[test]
fn zero_capacity_has_zero_utilization() {
    let s = ContextSnapshot::new(0, vec![]);
    assert_eq!(s.utilization(), 0.0);
    assert!(matches!(s.validate(), Err(CtxmapError::Validation(_))));
}

#[test]
fn validate_accepts_sample_and_full_window() {
    sample().validate().unwrap();
    let full = ContextSnapshot::new(10, vec![WeightedItem::new("a", 10, ItemKind::Tool)]);
    full.validate().unwrap();
    assert_eq!(full.unused(), 0);
}

#[test]
fn validate_rejects_bad_snapshots() {
    let over = ContextSnapshot::new(10, vec![WeightedItem::new("a", 11, ItemKind::Tool)]);
    assert!(matches!(
        over.validate(),
        Err(CtxmapError::CapacityExceeded {
            total: 11,
            capacity: 10
        })
    ));

    let dup = ContextSnapshot::new(
        10,
        vec![
            WeightedItem::new("a", 1, ItemKind::Tool),
            WeightedItem::new("a", 1, ItemKind::Tool),
        ],
    );
    assert!(matches!(dup.validate(), Err(CtxmapError::Validation(_))));

    let reserved = ContextSnapshot::new(10, vec![WeightedItem::new("_unused", 1, ItemKind::Tool)]);
    assert!(matches!(reserved.validate(), Err(CtxmapError::Validation(_))));
}

#[test]
fn json_roundtrip_keeps_label() {
    let s = sample().with_label("Naive RAG");
    let json = s.to_json_string().unwrap();
    assert!(json.contains("\"label\": \"Naive RAG\""));
    let back = ContextSnapshot::from_json_str(&json).unwrap();
    assert_eq!(back, s);
}

#[test]
fn label_is_optional_in_json() {
    let s = ContextSnapshot::from_json_str(
        r#"{"capacity": 8, "items": [{"id": "u", "weight": 2, "kind": "user_message"}]}"#,
    )
    .unwrap();
    assert_eq!(s.label, None);
    assert_eq!(s.items[0].kind, ItemKind::UserMessage);
    assert!(!sample().to_json_string().unwrap().contains("label"));
}

#[test]
fn malformed_json_is_serde_error() {
    let err = ContextSnapshot::from_json_str(r#"{"capacity": "big"}"#).unwrap_err();
    assert!(matches!(err, CtxmapError::Serde(_)));
}

#[test]
fn missing_file_is_wrapped() {
    let err = ContextSnapshot::from_json_file("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, CtxmapError::Other(_)));
    assert!(err.to_string().contains("open snapshot"));
}
