use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CtxmapError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CtxmapError::invariant("x")
            .to_string()
            .contains("layout invariant violated:")
    );
    assert!(
        CtxmapError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn capacity_and_duplicate_messages_carry_context() {
    let err = CtxmapError::CapacityExceeded {
        total: 150,
        capacity: 100,
    };
    let msg = err.to_string();
    assert!(msg.contains("150"));
    assert!(msg.contains("100"));

    let err = CtxmapError::duplicate("rag", Side::After);
    assert_eq!(
        err.to_string(),
        "duplicate identity: id 'rag' appears more than once in the after set"
    );
}

#[test]
fn only_invariant_violations_are_internal() {
    assert!(CtxmapError::invariant("drift").is_internal());
    assert!(!CtxmapError::validation("bad").is_internal());
    assert!(!CtxmapError::duplicate("a", Side::Before).is_internal());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CtxmapError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn serde_json_errors_convert() {
    let parse: Result<u64, _> = serde_json::from_str("nope");
    let err: CtxmapError = parse.unwrap_err().into();
    assert!(matches!(err, CtxmapError::Serde(_)));
}
