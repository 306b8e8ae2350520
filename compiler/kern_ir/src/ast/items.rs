//! Declarations: functions, classes, parameters, imports and the module root.

use super::super::{ExprId, ExprRange, Name, Named, ParamRange, Span, Spanned, StmtRange};

/// A function parameter. `annotation` and `default` are `ExprId::INVALID`
/// when absent.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Param {
    pub name: Name,
    pub annotation: ExprId,
    pub default: ExprId,
    pub span: Span,
}

impl Param {
    pub fn plain(name: Name, span: Span) -> Self {
        Param {
            name,
            annotation: ExprId::INVALID,
            default: ExprId::INVALID,
            span,
        }
    }

    #[inline]
    pub fn has_default(&self) -> bool {
        self.default.is_valid()
    }
}

impl Named for Param {
    fn name(&self) -> Name {
        self.name
    }
}

/// `def name(params) -> returns: body`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FunctionDef {
    pub name: Name,
    pub params: ParamRange,
    pub body: StmtRange,
    pub decorators: ExprRange,
    /// Return annotation, `ExprId::INVALID` when absent.
    pub returns: ExprId,
    pub span: Span,
}

impl Named for FunctionDef {
    fn name(&self) -> Name {
        self.name
    }
}

impl Spanned for FunctionDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// `class name(bases): body`
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct ClassDef {
    pub name: Name,
    pub bases: ExprRange,
    pub body: StmtRange,
    pub decorators: ExprRange,
    pub span: Span,
}

impl Named for ClassDef {
    fn name(&self) -> Name {
        self.name
    }
}

impl Spanned for ClassDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// One imported path with an optional alias (`Name::EMPTY` when absent).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportItem {
    /// Dotted path as written: `os.path`.
    pub path: Name,
    pub alias: Name,
}

/// `import a, b as c` (`from` is `Name::EMPTY`) or `from m import a, b`.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ImportDef {
    pub from: Name,
    pub items: Vec<ImportItem>,
    pub span: Span,
}

impl Spanned for ImportDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// Root of a parsed file.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Module {
    pub body: StmtRange,
}
