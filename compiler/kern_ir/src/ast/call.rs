//! Call arguments and the tagged view of a call's target.

use super::super::{CallArgRange, ExprId, Name, Span, Spanned};

/// One argument of a call: positional when `name` is `Name::EMPTY`,
/// otherwise `name=value`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct CallArg {
    pub name: Name,
    pub value: ExprId,
    pub span: Span,
}

impl CallArg {
    pub fn positional(value: ExprId, span: Span) -> Self {
        CallArg {
            name: Name::EMPTY,
            value,
            span,
        }
    }

    pub fn keyword(name: Name, value: ExprId, span: Span) -> Self {
        CallArg { name, value, span }
    }

    #[inline]
    pub fn is_keyword(&self) -> bool {
        !self.name.is_empty()
    }
}

impl Spanned for CallArg {
    fn span(&self) -> Span {
        self.span
    }
}

/// How a call addresses its callee.
///
/// Built by [`ExprArena::call_target`](crate::ExprArena::call_target); every
/// call expression maps to exactly one variant.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CallTarget {
    /// `name(args)`
    Direct {
        func: ExprId,
        name: Name,
        args: CallArgRange,
    },
    /// `receiver.method(args)`
    Method {
        receiver: ExprId,
        method: Name,
        args: CallArgRange,
    },
    /// Any other callee: `f()(x)`, `xs[0](y)`, ...
    Other { func: ExprId, args: CallArgRange },
}

impl CallTarget {
    pub fn args(&self) -> CallArgRange {
        match *self {
            CallTarget::Direct { args, .. }
            | CallTarget::Method { args, .. }
            | CallTarget::Other { args, .. } => args,
        }
    }
}
