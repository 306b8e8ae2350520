//! Transformation errors.
//!
//! Every failure of the pipeline is one [`TransformError`]. Names are stored
//! as owned strings so an error can outlive the arena it was raised on, and
//! every variant converts to a renderable [`Diagnostic`].

use std::fmt;

use kern_diagnostic::{Diagnostic, ErrorCode};
use kern_ir::Span;
use thiserror::Error;

/// What a failed lookup was looking for.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LookupTarget {
    /// The declaring class.
    Unit,
    /// The method being vectorized.
    RowFunction,
    /// A method called through the receiver.
    Helper,
}

impl LookupTarget {
    pub fn describe(self) -> &'static str {
        match self {
            LookupTarget::Unit => "class",
            LookupTarget::RowFunction => "row function",
            LookupTarget::Helper => "helper",
        }
    }
}

/// Why a method cannot be turned into a kernel.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShapeReason {
    /// A method without parameters has no receiver to strip.
    NoReceiver { function: String },
    /// The row function does not end with a `return`.
    MissingReturn { function: String },
    /// The row function returns something other than `[a, b, ...]`.
    ReturnNotNameList { function: String },
    OutputCountMismatch { returned: usize, declared: usize },
    InputCountMismatch { params: usize, declared: usize },
    /// A kernel parameter would shadow or be shadowed by another binding.
    NameCollision { name: String, with: &'static str },
    DuplicateColumn { name: String },
    /// A helper or the row function is named after a builtin the loop calls.
    ShadowsLoopBuiltin { name: String },
    /// The receiver is used other than to call a helper.
    ReceiverEscapes { receiver: String },
    NoInputs { function: String },
    NoOutputs { function: String },
}

impl fmt::Display for ShapeReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeReason::NoReceiver { function } => {
                write!(f, "method `{function}` has no receiver parameter")
            }
            ShapeReason::MissingReturn { function } => {
                write!(f, "row function `{function}` does not end with a `return`")
            }
            ShapeReason::ReturnNotNameList { function } => write!(
                f,
                "row function `{function}` must return a list or tuple of names"
            ),
            ShapeReason::OutputCountMismatch { returned, declared } => write!(
                f,
                "row function returns {returned} value(s) but {declared} output column(s) are declared"
            ),
            ShapeReason::InputCountMismatch { params, declared } => write!(
                f,
                "row function takes {params} input(s) but {declared} input column(s) are declared"
            ),
            ShapeReason::NameCollision { name, with } => {
                write!(f, "kernel parameter `{name}` collides with {with}")
            }
            ShapeReason::DuplicateColumn { name } => {
                write!(f, "column `{name}` appears more than once")
            }
            ShapeReason::ShadowsLoopBuiltin { name } => write!(
                f,
                "function `{name}` shadows a builtin called by the kernel loop"
            ),
            ShapeReason::ReceiverEscapes { receiver } => {
                write!(f, "`{receiver}` can only be used to call helper methods")
            }
            ShapeReason::NoInputs { function } => {
                write!(f, "row function `{function}` takes no inputs")
            }
            ShapeReason::NoOutputs { function } => {
                write!(f, "row function `{function}` returns no outputs")
            }
        }
    }
}

/// A failed transformation. No partial kernel is produced alongside it.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum TransformError {
    /// The description file did not parse.
    #[error("description has {} syntax error(s)", .0.len())]
    Syntax(Vec<Diagnostic>),

    /// A class or method was not found, or was declared more than once.
    #[error("{}", describe_lookup(*target, name, scope, matches.len()))]
    Lookup {
        target: LookupTarget,
        name: String,
        /// Where the lookup happened: "module" or the class name.
        scope: String,
        /// Every matching declaration; empty when nothing matched.
        matches: Vec<Span>,
        span: Span,
    },

    #[error("{reason}")]
    Shape { reason: ShapeReason, span: Span },

    /// A helper called through the receiver has no declaration.
    #[error("`{unit}` has no method `{name}`")]
    UnresolvedHelper {
        name: String,
        unit: String,
        span: Span,
    },

    /// A call rooted at the receiver that is not `receiver.method(...)`.
    #[error("calls through `{receiver}` must have the form `{receiver}.method(...)`")]
    MalformedCall { receiver: String, span: Span },
}

fn describe_lookup(target: LookupTarget, name: &str, scope: &str, matches: usize) -> String {
    let what = target.describe();
    if matches == 0 {
        format!("{what} `{name}` not found in {scope}")
    } else {
        format!("{what} `{name}` is declared {matches} times in {scope}")
    }
}

impl TransformError {
    #[cold]
    pub fn shape(reason: ShapeReason, span: Span) -> Self {
        TransformError::Shape { reason, span }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            // Syntax errors carry their own codes; this is the first one.
            TransformError::Syntax(diagnostics) => diagnostics
                .first()
                .map_or(ErrorCode::E1001, |diag| diag.code),
            TransformError::Lookup { .. } => ErrorCode::E2001,
            TransformError::Shape { .. } => ErrorCode::E2002,
            TransformError::UnresolvedHelper { .. } => ErrorCode::E2003,
            TransformError::MalformedCall { .. } => ErrorCode::E2004,
        }
    }

    /// Primary location, `Span::DUMMY` when there is none.
    pub fn span(&self) -> Span {
        match self {
            TransformError::Syntax(diagnostics) => diagnostics
                .first()
                .and_then(Diagnostic::primary_span)
                .unwrap_or(Span::DUMMY),
            TransformError::Lookup { span, .. }
            | TransformError::Shape { span, .. }
            | TransformError::UnresolvedHelper { span, .. }
            | TransformError::MalformedCall { span, .. } => *span,
        }
    }

    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            TransformError::Syntax(diagnostics) => diagnostics.clone(),
            _ => vec![self.to_diagnostic()],
        }
    }

    fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.to_string());
        match self {
            TransformError::Syntax(_) => diag,
            TransformError::Lookup {
                target,
                matches,
                span,
                ..
            } => {
                let mut diag = diag.with_label(*span, "looked up here");
                for &found in matches {
                    diag = diag.with_secondary_label(found, "declared here");
                }
                if matches.is_empty() && *target == LookupTarget::Unit {
                    diag = diag.with_note("only top-level classes are searched");
                } else if !matches.is_empty() {
                    diag = diag.with_suggestion(format!(
                        "rename or remove all but one {}",
                        target.describe()
                    ));
                }
                diag
            }
            TransformError::Shape { reason, span } => {
                let diag = diag.with_label(*span, "cannot be vectorized");
                match reason {
                    ShapeReason::ReturnNotNameList { .. } | ShapeReason::MissingReturn { .. } => {
                        diag.with_suggestion("end the row function with `return [a, b, ...]`")
                    }
                    ShapeReason::ReceiverEscapes { receiver } => diag.with_note(format!(
                        "the kernel has no `{receiver}`; pass the value as a parameter instead"
                    )),
                    ShapeReason::NameCollision { name, .. }
                    | ShapeReason::ShadowsLoopBuiltin { name } => {
                        diag.with_suggestion(format!("rename `{name}`"))
                    }
                    _ => diag,
                }
            }
            TransformError::UnresolvedHelper { span, .. } => diag
                .with_label(*span, "called here")
                .with_note("helpers must be methods of the same class"),
            TransformError::MalformedCall { receiver, span } => diag
                .with_label(*span, "unsupported call shape")
                .with_suggestion(format!("call a method directly: `{receiver}.name(...)`")),
        }
    }
}
