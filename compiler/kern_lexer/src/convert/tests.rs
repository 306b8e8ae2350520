#![allow(clippy::unwrap_used, clippy::expect_used)]

use super::*;

#[test]
fn test_parse_int_radixes() {
    assert_eq!(parse_int("1_000", 10), Ok(1000));
    assert_eq!(parse_int("ff", 16), Ok(255));
    assert_eq!(parse_int("17", 8), Ok(15));
    assert_eq!(parse_int("1010", 2), Ok(10));
}

#[test]
fn test_parse_int_rejects_overflow_and_empty() {
    assert_eq!(
        parse_int("99999999999999999999", 10),
        Err(RawError::InvalidNumber)
    );
    assert_eq!(parse_int("___", 16), Err(RawError::InvalidNumber));
    assert_eq!(parse_int("9", 8), Err(RawError::InvalidNumber));
}

#[test]
#[allow(clippy::float_cmp)]
fn test_parse_float_forms() {
    assert_eq!(parse_float("2.5"), Ok(2.5));
    assert_eq!(parse_float("1_0.0_1"), Ok(10.01));
    assert_eq!(parse_float("1."), Ok(1.0));
    assert_eq!(parse_float(".5"), Ok(0.5));
    assert_eq!(parse_float("1e3"), Ok(1000.0));
}

#[test]
fn test_string_parts() {
    assert_eq!(string_parts("\"abc\""), (false, 0, 1));
    assert_eq!(string_parts("r'a\\b'"), (true, 1, 1));
    assert_eq!(string_parts("\"\"\"doc\"\"\""), (false, 0, 3));
    assert_eq!(string_parts("f'''x'''"), (false, 1, 3));
}

#[test]
fn test_convert_string_raw_and_escaped() {
    let interner = StringInterner::new();
    let mut errors = Vec::new();

    let escaped = convert_string("'a\\tb'", Span::new(0, 6), &interner, &mut errors);
    let raw = convert_string("r'a\\tb'", Span::new(0, 7), &interner, &mut errors);

    assert!(errors.is_empty());
    assert_eq!(escaped, TokenKind::Str(interner.intern("a\tb")));
    assert_eq!(raw, TokenKind::Str(interner.intern("a\\tb")));
}
