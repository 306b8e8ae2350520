//! Statement types.

use super::super::{
    ClassId, ExprId, ExprRange, FunctionId, ImportId, Span, Spanned, StmtRange,
};
use super::operators::BinaryOp;

/// Statement node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement variants.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression statement (calls, docstrings).
    Expr(ExprId),

    /// `t1 = t2 = value`; `targets` holds at least one target.
    Assign { targets: ExprRange, value: ExprId },

    /// `target op= value`
    AugAssign {
        target: ExprId,
        op: BinaryOp,
        value: ExprId,
    },

    /// `return value`; `ExprId::INVALID` for a bare `return`.
    Return(ExprId),

    /// `pass`
    Pass,

    /// `for target in iter: body`
    For {
        target: ExprId,
        iter: ExprId,
        body: StmtRange,
    },

    /// `while cond: body`
    While { cond: ExprId, body: StmtRange },

    /// `with context as target: body`; `target` is `ExprId::INVALID`
    /// without `as`.
    With {
        context: ExprId,
        target: ExprId,
        body: StmtRange,
    },

    Break,
    Continue,

    /// `if cond: then_body else: else_body`. An `elif` chain is an `If`
    /// nested as the only statement of `else_body`.
    If {
        cond: ExprId,
        then_body: StmtRange,
        else_body: StmtRange,
    },

    /// Nested or top-level `def`.
    Def(FunctionId),

    /// `class`
    Class(ClassId),

    /// `import a.b` / `from a import b as c`
    Import(ImportId),
}
