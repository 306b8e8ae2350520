use super::*;

#[test]
fn test_span_merge() {
    let merged = Span::new(10, 20).merge(Span::new(15, 30));
    assert_eq!(merged, Span::new(10, 30));
}

#[test]
fn test_span_len_and_empty() {
    assert_eq!(Span::new(4, 9).len(), 5);
    assert!(Span::point(7).is_empty());
    assert!(!Span::new(4, 9).is_empty());
}

#[test]
fn test_dummy_span() {
    assert!(Span::DUMMY.is_dummy());
    assert!(Span::default().is_dummy());
    assert!(!Span::new(0, 1).is_dummy());
}

#[test]
fn test_try_from_range_overflow() {
    let too_big = u32::MAX as usize + 1;
    assert_eq!(
        Span::try_from_range(0..too_big),
        Err(SpanError::EndTooLarge(too_big))
    );
    assert_eq!(
        Span::try_from_range(too_big..too_big),
        Err(SpanError::StartTooLarge(too_big))
    );
}

#[test]
fn test_to_range() {
    assert_eq!(Span::new(3, 8).to_range(), 3..8);
}
