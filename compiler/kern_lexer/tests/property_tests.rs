//! Property tests for the layout pass.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_ir::{StringInterner, TokenKind};
use kern_lexer::lex;
use proptest::prelude::*;

/// Indentation levels of a well-formed block structure: each line either
/// stays, goes one level deeper, or returns to any outer level.
fn block_levels() -> impl Strategy<Value = Vec<usize>> {
    prop::collection::vec(0usize..4, 1..30).prop_map(|steps| {
        let mut levels = Vec::with_capacity(steps.len());
        let mut current = 0usize;
        for step in steps {
            current = match step {
                0 => current + 1,
                1 => current,
                _ => current.saturating_sub(step - 1),
            };
            if levels.is_empty() {
                current = 0;
            }
            levels.push(current);
        }
        levels
    })
}

fn render(levels: &[usize]) -> String {
    levels
        .iter()
        .map(|level| format!("{}x = 1\n", "    ".repeat(*level)))
        .collect()
}

proptest! {
    #[test]
    fn indents_and_dedents_balance(levels in block_levels()) {
        let interner = StringInterner::new();
        let output = lex(&render(&levels), &interner);
        prop_assert!(output.errors.is_empty());

        let kinds = output.tokens.kinds();
        let indents = kinds.iter().filter(|k| **k == TokenKind::Indent).count();
        let dedents = kinds.iter().filter(|k| **k == TokenKind::Dedent).count();
        prop_assert_eq!(indents, dedents);
        prop_assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn one_newline_per_logical_line(levels in block_levels()) {
        let interner = StringInterner::new();
        let output = lex(&render(&levels), &interner);
        let newlines = output
            .tokens
            .kinds()
            .iter()
            .filter(|k| **k == TokenKind::Newline)
            .count();
        prop_assert_eq!(newlines, levels.len());
    }

    #[test]
    fn arbitrary_input_never_panics(source in "\\PC{0,200}") {
        let interner = StringInterner::new();
        let output = lex(&source, &interner);
        prop_assert_eq!(output.tokens.last_kind(), Some(TokenKind::Eof));
    }
}
