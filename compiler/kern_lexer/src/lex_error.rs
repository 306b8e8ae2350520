//! Lexer errors (E0xxx).

use kern_diagnostic::{Diagnostic, ErrorCode};
use kern_ir::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("invalid character `{ch}`")]
    InvalidChar { ch: char, span: Span },

    #[error("invalid number literal `{text}`")]
    InvalidNumber { text: String, span: Span },

    #[error("invalid escape sequence `{text}`")]
    InvalidEscape { text: String, span: Span },

    #[error("unindent does not match any outer indentation level")]
    InconsistentDedent { span: Span },

    #[error("unmatched `{ch}`")]
    UnmatchedBracket { ch: char, span: Span },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedString { span }
            | LexError::InvalidChar { span, .. }
            | LexError::InvalidNumber { span, .. }
            | LexError::InvalidEscape { span, .. }
            | LexError::InconsistentDedent { span }
            | LexError::UnmatchedBracket { span, .. } => *span,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LexError::UnterminatedString { .. } => ErrorCode::E0001,
            LexError::InvalidChar { .. } => ErrorCode::E0002,
            LexError::InvalidNumber { .. } => ErrorCode::E0003,
            LexError::InvalidEscape { .. } => ErrorCode::E0004,
            LexError::InconsistentDedent { .. } => ErrorCode::E0005,
            LexError::UnmatchedBracket { .. } => ErrorCode::E0006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            LexError::UnterminatedString { span } => diag
                .with_label(*span, "string starts here")
                .with_suggestion("add the closing quote on the same line, or use `\"\"\"` for multi-line text"),
            LexError::InvalidChar { span, .. } => diag.with_label(*span, "not valid here"),
            LexError::InvalidNumber { span, .. } => diag
                .with_label(*span, "invalid number")
                .with_note("integer literals must fit in 64 bits"),
            LexError::InvalidEscape { span, .. } => diag
                .with_label(*span, "invalid escape")
                .with_suggestion("use a raw string (`r\"...\"`) to keep backslashes literally"),
            LexError::InconsistentDedent { span } => diag
                .with_label(*span, "indentation does not match")
                .with_note("dedent to the column of an enclosing block"),
            LexError::UnmatchedBracket { span, .. } => {
                diag.with_label(*span, "no matching opening bracket")
            }
        }
    }
}
