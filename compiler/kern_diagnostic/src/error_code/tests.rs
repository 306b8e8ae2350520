use super::*;

#[test]
fn test_error_code_display() {
    assert_eq!(ErrorCode::E1001.to_string(), "E1001");
    assert_eq!(ErrorCode::E2003.as_str(), "E2003");
}

#[test]
fn test_stage_classification() {
    assert!(ErrorCode::E0001.is_syntax_error());
    assert!(ErrorCode::E1006.is_syntax_error());
    assert!(!ErrorCode::E2001.is_syntax_error());

    assert!(ErrorCode::E2002.is_transform_error());
    assert!(!ErrorCode::E3001.is_transform_error());
}

#[test]
fn test_descriptions_are_lowercase_phrases() {
    for code in [
        ErrorCode::E0005,
        ErrorCode::E1005,
        ErrorCode::E2004,
        ErrorCode::E3009,
        ErrorCode::E9001,
    ] {
        let text = code.description();
        assert!(!text.is_empty());
        assert!(!text.ends_with('.'), "{code}: {text}");
        assert_eq!(text, text.to_lowercase());
    }
}
