#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_ir::{StringInterner, TokenKind, TokenList};

use super::*;

/// Owns the token list and interner so `Cursor` can borrow them.
struct TestCtx {
    tokens: TokenList,
    interner: StringInterner,
}

impl TestCtx {
    fn new(source: &str) -> Self {
        let interner = StringInterner::new();
        let tokens = kern_lexer::lex(source, &interner).tokens;
        Self { tokens, interner }
    }

    fn cursor(&self) -> Cursor<'_> {
        Cursor::new(&self.tokens, &self.interner)
    }
}

#[test]
fn test_cursor_navigation() {
    let ctx = TestCtx::new("x = 42");
    let mut cursor = ctx.cursor();

    assert!(cursor.check_ident());
    assert!(!cursor.is_at_end());

    cursor.advance();
    assert!(cursor.check(TokenKind::Assign));

    cursor.advance();
    assert!(matches!(cursor.current_kind(), TokenKind::Int(42)));

    cursor.advance();
    assert!(cursor.check(TokenKind::Newline));

    cursor.advance();
    assert!(cursor.is_at_end());
}

#[test]
fn test_advance_stops_at_eof() {
    let ctx = TestCtx::new("");
    let mut cursor = ctx.cursor();
    assert!(cursor.is_at_end());
    cursor.advance();
    cursor.advance();
    assert!(cursor.is_at_end());
    assert_eq!(cursor.position(), 0);
}

#[test]
fn test_empty_token_list_reads_as_eof() {
    let tokens = TokenList::new();
    let interner = StringInterner::new();
    let cursor = Cursor::new(&tokens, &interner);
    assert!(cursor.is_at_end());
    assert_eq!(cursor.peek_next_kind(), TokenKind::Eof);
}

#[test]
fn test_expect_success() {
    let ctx = TestCtx::new("def f");
    let mut cursor = ctx.cursor();
    assert!(cursor.expect(TokenKind::Def).is_ok());
    assert_eq!(cursor.expect_ident().unwrap(), ctx.interner.intern("f"));
}

#[test]
fn test_expect_failure_names_both_tokens() {
    let ctx = TestCtx::new("class");
    let mut cursor = ctx.cursor();
    let err = cursor.expect(TokenKind::Def).unwrap_err();
    assert_eq!(err.code, ErrorCode::E1001);
    assert_eq!(err.message, "expected `def`, found `class`");
    // The failed expect did not consume anything.
    assert!(cursor.check(TokenKind::Class));
}

#[test]
fn test_expect_ident_on_keyword_has_help() {
    let ctx = TestCtx::new("lambda");
    let mut cursor = ctx.cursor();
    let err = cursor.expect_ident().unwrap_err();
    assert_eq!(err.code, ErrorCode::E1004);
    assert_eq!(err.help, vec!["keywords cannot be used as names".to_string()]);
}

#[test]
fn test_peek_and_previous_span() {
    let ctx = TestCtx::new("a.b");
    let mut cursor = ctx.cursor();
    assert_eq!(cursor.peek_next_kind(), TokenKind::Dot);
    cursor.advance();
    assert_eq!(cursor.previous_span(), Span::new(0, 1));
    assert!(cursor.eat(TokenKind::Dot));
    assert!(!cursor.eat(TokenKind::Dot));
}
