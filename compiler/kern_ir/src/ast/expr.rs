//! Expression types.

use std::fmt;

use super::super::{CallArgRange, ExprId, ExprRange, Name, Span, Spanned};
use super::operators::{BinaryOp, UnaryOp};

/// Expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl fmt::Debug for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression variants. All children are arena indices.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    /// Integer literal: `42`
    Int(i64),

    /// Float literal: `2.5` (stored as bits)
    Float(u64),

    /// String literal (interned, escapes already processed)
    Str(Name),

    /// `True` / `False`
    Bool(bool),

    /// `None`
    None,

    /// Variable reference
    Ident(Name),

    /// `left op right`
    Binary {
        op: BinaryOp,
        left: ExprId,
        right: ExprId,
    },

    /// `op operand`
    Unary { op: UnaryOp, operand: ExprId },

    /// Call of an arbitrary callee: `func(args)`
    Call { func: ExprId, args: CallArgRange },

    /// Call through attribute access: `receiver.method(args)`
    MethodCall {
        receiver: ExprId,
        method: Name,
        args: CallArgRange,
    },

    /// Attribute read: `value.attr`
    Attribute { value: ExprId, attr: Name },

    /// Subscript: `value[index]`
    Subscript { value: ExprId, index: ExprId },

    /// `[a, b]`
    List(ExprRange),

    /// `(a, b)` or a bare `a, b`
    Tuple(ExprRange),

    /// `{k: v}`; `keys` and `values` have equal length.
    Dict { keys: ExprRange, values: ExprRange },

    /// `[elt for target in iter if cond]`; one `for` clause, `cond` is
    /// `ExprId::INVALID` without `if`.
    ListComp {
        elt: ExprId,
        target: ExprId,
        iter: ExprId,
        cond: ExprId,
    },

    /// Placeholder after a parse error.
    Error,
}

impl ExprKind {
    /// Whether this expression may appear on the left of `=` or as a `for`
    /// target (tuples and lists qualify element-wise, checked by the parser).
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            ExprKind::Ident(_)
                | ExprKind::Attribute { .. }
                | ExprKind::Subscript { .. }
                | ExprKind::Tuple(_)
                | ExprKind::List(_)
        )
    }
}

#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::Expr;
    crate::static_assert_size!(Expr, 32);
}
