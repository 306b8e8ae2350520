use super::*;

#[test]
fn test_intern_dedupes() {
    let interner = StringInterner::new();
    let a = interner.intern("leadi");
    let b = interner.intern("leadi");
    let c = interner.intern("leadii");
    assert_eq!(a, b);
    assert_ne!(a, c);
    assert_eq!(interner.len(), 3);
}

#[test]
fn test_lookup_round_trip() {
    let interner = StringInterner::new();
    let name = interner.intern("run_all");
    assert_eq!(interner.lookup(name), "run_all");
    assert_eq!(interner.lookup(Name::EMPTY), "");
}

#[test]
fn test_empty_is_pre_interned() {
    let interner = StringInterner::new();
    assert_eq!(interner.intern(""), Name::EMPTY);
    assert!(!interner.is_empty());
}

#[test]
fn test_get_does_not_insert() {
    let interner = StringInterner::new();
    assert_eq!(interner.get("sub"), None);
    let sub = interner.intern("sub");
    assert_eq!(interner.get("sub"), Some(sub));
}

#[test]
fn test_foreign_name_resolves_empty() {
    let interner = StringInterner::new();
    assert_eq!(interner.lookup(Name::from_raw(999)), "");
}
