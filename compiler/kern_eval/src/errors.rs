//! Evaluation errors.
//!
//! Every runtime failure is an [`EvalError`]: a typed [`EvalErrorKind`] plus
//! the span of the expression or statement that raised it. Kinds map onto
//! the E3xxx range for diagnostics.

use kern_diagnostic::{Diagnostic, ErrorCode};
use kern_ir::Span;
use thiserror::Error;

/// Typed runtime failure.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum EvalErrorKind {
    #[error("name `{name}` is not defined")]
    UndefinedName { name: String },

    #[error("unsupported operand types for `{op}`: `{left}` and `{right}`")]
    UnsupportedOperands {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    #[error("bad operand type for `{op}`: `{operand}`")]
    BadOperand {
        op: &'static str,
        operand: &'static str,
    },

    #[error("`{type_name}` object is not iterable")]
    NotIterable { type_name: &'static str },

    #[error("invalid literal for {target}(): {text:?}")]
    InvalidLiteral { target: &'static str, text: String },

    #[error("`{function}()` takes {expected} positional arguments but {got} were given")]
    ArityMismatch {
        function: String,
        expected: String,
        got: usize,
    },

    #[error("`{function}()` is missing argument `{param}`")]
    MissingArgument { function: String, param: String },

    #[error("`{function}()` got an unexpected keyword argument `{keyword}`")]
    UnexpectedKeyword { function: String, keyword: String },

    #[error("`{function}()` got multiple values for argument `{param}`")]
    DuplicateArgument { function: String, param: String },

    #[error("`{function}()`: {message}")]
    InvalidArgument {
        function: &'static str,
        message: &'static str,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: i64, len: usize },

    #[error("key {key} not found")]
    KeyNotFound { key: String },

    #[error("`{type_name}` object is not callable")]
    NotCallable { type_name: &'static str },

    #[error("`{type_name}` object has no attribute `{attr}`")]
    UnknownAttribute {
        type_name: &'static str,
        attr: String,
    },

    #[error("integer overflow in `{op}`")]
    IntegerOverflow { op: &'static str },

    #[error("column {column} has {got} rows, expected {expected}")]
    ColumnLengthMismatch {
        column: usize,
        expected: usize,
        got: usize,
    },

    #[error("expected {expected} values to unpack, got {got}")]
    UnpackMismatch { expected: usize, got: usize },

    #[error("maximum recursion depth of {limit} exceeded")]
    RecursionLimit { limit: u32 },

    #[error("{construct} is not supported at runtime")]
    Unsupported { construct: &'static str },

    #[error("internal error: {message}")]
    Internal { message: &'static str },
}

impl EvalErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            EvalErrorKind::UndefinedName { .. } => ErrorCode::E3001,
            EvalErrorKind::UnsupportedOperands { .. }
            | EvalErrorKind::BadOperand { .. }
            | EvalErrorKind::NotIterable { .. }
            | EvalErrorKind::InvalidLiteral { .. } => ErrorCode::E3002,
            EvalErrorKind::ArityMismatch { .. }
            | EvalErrorKind::MissingArgument { .. }
            | EvalErrorKind::UnexpectedKeyword { .. }
            | EvalErrorKind::DuplicateArgument { .. }
            | EvalErrorKind::InvalidArgument { .. } => ErrorCode::E3003,
            EvalErrorKind::DivisionByZero => ErrorCode::E3004,
            EvalErrorKind::IndexOutOfRange { .. } | EvalErrorKind::KeyNotFound { .. } => {
                ErrorCode::E3005
            }
            EvalErrorKind::NotCallable { .. } => ErrorCode::E3006,
            EvalErrorKind::UnknownAttribute { .. } => ErrorCode::E3007,
            EvalErrorKind::IntegerOverflow { .. } => ErrorCode::E3008,
            EvalErrorKind::ColumnLengthMismatch { .. } => ErrorCode::E3009,
            EvalErrorKind::UnpackMismatch { .. } => ErrorCode::E3010,
            EvalErrorKind::RecursionLimit { .. } => ErrorCode::E3011,
            EvalErrorKind::Unsupported { .. } => ErrorCode::E3012,
            EvalErrorKind::Internal { .. } => ErrorCode::E9001,
        }
    }

    /// Attach the span of the failing node.
    #[cold]
    pub fn at(self, span: Span) -> EvalError {
        EvalError { kind: self, span }
    }
}

/// A runtime failure and where it happened.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

impl EvalError {
    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, self.code().description())
    }
}

/// Result of evaluating one expression.
pub type EvalResult<T = crate::Value> = Result<T, EvalError>;
