//! Parse error type.
//!
//! Errors are collected rather than returned one at a time: the parser
//! records a [`ParseError`], synchronizes to the next statement and keeps
//! going, so one run reports every broken line of a description file.

use kern_diagnostic::{Diagnostic, ErrorCode};
use kern_ir::{Span, TokenKind};
use kern_lexer::LexError;
use thiserror::Error;

/// A parse (or lex) error with its location.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseError {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Location of the error.
    pub span: Span,
    /// Label text shown under the span.
    pub context: Option<String>,
    /// Hints for fixing the error.
    pub help: Vec<String>,
}

impl ParseError {
    #[cold]
    pub fn new(code: ErrorCode, message: impl Into<String>, span: Span) -> Self {
        ParseError {
            code,
            message: message.into(),
            span,
            context: None,
            help: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help.push(help.into());
        self
    }

    /// `expected X, found Y`
    #[cold]
    pub fn unexpected(expected: &str, found: TokenKind, span: Span) -> Self {
        ParseError::new(
            ErrorCode::E1001,
            format!("expected {expected}, found {}", found.describe()),
            span,
        )
        .with_context(format!("expected {expected}"))
    }

    /// Syntax that exists in Python but not in the description subset.
    #[cold]
    pub fn unsupported(what: &str, span: Span) -> Self {
        ParseError::new(ErrorCode::E1006, format!("{what} is not supported"), span)
            .with_context("outside the supported subset")
    }

    /// Whether this error came from the lexer (E0xxx).
    pub fn is_lex_error(&self) -> bool {
        self.code.as_str().starts_with("E0")
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let label = self.context.as_deref().unwrap_or("here");
        let mut diag = Diagnostic::error(self.code)
            .with_message(self.message.clone())
            .with_label(self.span, label);
        for help in &self.help {
            diag = diag.with_suggestion(help.clone());
        }
        diag
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        let diag = err.to_diagnostic();
        ParseError {
            code: diag.code,
            message: diag.message,
            span: err.span(),
            context: diag.labels.into_iter().next().map(|label| label.message),
            help: diag.suggestions,
        }
    }
}
