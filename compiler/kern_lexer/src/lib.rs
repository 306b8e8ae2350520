//! Lexer for kern description files.
//!
//! Two passes in one loop:
//! 1. `logos` splits the source into raw tokens (comments and line
//!    continuations are skipped there).
//! 2. The layout pass turns physical lines into `Newline`/`Indent`/`Dedent`
//!    tokens, so the parser never looks at whitespace.
//!
//! Errors never stop lexing: the offending slice becomes a
//! `TokenKind::Error` token and a [`LexError`] is recorded.

mod convert;
mod escape;
mod layout;
mod lex_error;
mod raw_token;

use kern_ir::{Span, StringInterner, TokenKind, TokenList};
use logos::Logos;

pub use lex_error::LexError;

use convert::convert_token;
use layout::Layout;
use raw_token::{RawError, RawToken};

/// Tokens plus every error found while producing them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

fn raw_error(err: RawError, slice: &str, span: Span) -> LexError {
    match err {
        RawError::UnterminatedString => LexError::UnterminatedString { span },
        RawError::InvalidNumber => LexError::InvalidNumber {
            text: slice.to_owned(),
            span,
        },
        RawError::InvalidChar => LexError::InvalidChar {
            ch: slice.chars().next().unwrap_or('\0'),
            span,
        },
    }
}

/// Lex `source` into a layout-aware `TokenList` terminated by `Eof`.
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    let mut layout = Layout::new(source);
    let mut errors = Vec::new();
    let mut raw = RawToken::lexer(source);

    while let Some(result) = raw.next() {
        let span = Span::from_range(raw.span());
        match result {
            Ok(RawToken::Newline) => layout.newline(span),
            Ok(token) => {
                let kind = convert_token(token, raw.slice(), span, interner, &mut errors);
                layout.push(kind, span, &mut errors);
            }
            Err(err) => {
                errors.push(raw_error(err, raw.slice(), span));
                layout.push(TokenKind::Error, span, &mut errors);
            }
        }
    }

    LexOutput {
        tokens: layout.finish(),
        errors,
    }
}
