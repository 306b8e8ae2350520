#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_ir::{StringInterner, TokenKind};

use super::*;

#[test]
fn test_synchronize_skips_to_next_line() {
    let interner = StringInterner::new();
    let tokens = kern_lexer::lex("x = = 1\ny = 2\n", &interner).tokens;
    let mut cursor = Cursor::new(&tokens, &interner);
    cursor.advance();
    synchronize(&mut cursor);
    assert_eq!(cursor.current_kind(), TokenKind::Ident(interner.intern("y")));
}

#[test]
fn test_synchronize_drops_block_of_broken_header() {
    let interner = StringInterner::new();
    let source = "def f(x y):\n    return 1\nz = 3\n";
    let tokens = kern_lexer::lex(source, &interner).tokens;
    let mut cursor = Cursor::new(&tokens, &interner);
    synchronize(&mut cursor);
    assert_eq!(cursor.current_kind(), TokenKind::Ident(interner.intern("z")));
}

#[test]
fn test_synchronize_stops_before_enclosing_dedent() {
    let interner = StringInterner::new();
    let source = "if x:\n    y = )\nz = 1\n";
    let tokens = kern_lexer::lex(source, &interner).tokens;
    let mut cursor = Cursor::new(&tokens, &interner);
    // Move to `y`, inside the block.
    while !cursor.check(TokenKind::Indent) {
        cursor.advance();
    }
    cursor.advance();
    synchronize(&mut cursor);
    assert_eq!(cursor.current_kind(), TokenKind::Dedent);
}

#[test]
fn test_synchronize_skips_unexpected_indent() {
    let interner = StringInterner::new();
    let source = "a = 1\n    b = 2\n    c = 3\nd = 4\n";
    let tokens = kern_lexer::lex(source, &interner).tokens;
    let mut cursor = Cursor::new(&tokens, &interner);
    while !cursor.check(TokenKind::Indent) {
        cursor.advance();
    }
    synchronize(&mut cursor);
    assert_eq!(cursor.current_kind(), TokenKind::Ident(interner.intern("d")));
}

#[test]
fn test_skip_block_at_eof() {
    let interner = StringInterner::new();
    let tokens = kern_lexer::lex("if x:\n    y\n", &interner).tokens;
    let mut cursor = Cursor::new(&tokens, &interner);
    while !cursor.check(TokenKind::Indent) {
        cursor.advance();
    }
    skip_block(&mut cursor);
    assert!(cursor.is_at_end());
}
