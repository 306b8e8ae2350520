//! Arena allocation for the flat AST.
//!
//! - Contiguous storage for all nodes of one tree
//! - Child references are `u32` indices
//! - Child lists are `(start, len)` ranges into side tables
//!
//! A source file and a synthesized kernel each own one arena. Nodes are
//! never shared across arenas.

use super::ast::{CallArg, CallTarget, ClassDef, Expr, ExprKind, FunctionDef, ImportDef, Param, Stmt};
use super::{
    CallArgRange, ClassId, ExprId, ExprRange, FunctionId, ImportId, ParamRange, StmtId, StmtRange,
};

#[inline]
#[allow(
    clippy::cast_possible_truncation,
    reason = "arenas are bounded by source size, far below u32::MAX"
)]
fn to_u32(len: usize) -> u32 {
    debug_assert!(u32::try_from(len).is_ok(), "arena overflow: {len}");
    len as u32
}

/// Contiguous storage for every node of one tree.
///
/// Derives `Eq` so that two trees built from structurally identical inputs
/// can be compared directly.
#[derive(Clone, Default, PartialEq, Eq, Debug)]
pub struct ExprArena {
    /// All expressions (indexed by `ExprId`).
    exprs: Vec<Expr>,
    /// Flattened expression lists (list/tuple elements, decorators, targets).
    expr_lists: Vec<ExprId>,
    /// Flattened call arguments.
    call_args: Vec<CallArg>,
    /// All statements (indexed by `StmtId`).
    stmts: Vec<Stmt>,
    /// Flattened blocks.
    stmt_lists: Vec<StmtId>,
    /// Flattened parameter lists.
    params: Vec<Param>,
    functions: Vec<FunctionDef>,
    classes: Vec<ClassDef>,
    imports: Vec<ImportDef>,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with capacity estimated from source size.
    /// Heuristic: ~1 expression per 16 bytes of source.
    pub fn with_capacity(source_len: usize) -> Self {
        let estimated_exprs = source_len / 16;
        ExprArena {
            exprs: Vec::with_capacity(estimated_exprs),
            expr_lists: Vec::with_capacity(estimated_exprs / 4),
            call_args: Vec::with_capacity(estimated_exprs / 4),
            stmts: Vec::with_capacity(estimated_exprs / 4),
            stmt_lists: Vec::with_capacity(estimated_exprs / 4),
            params: Vec::with_capacity(estimated_exprs / 8),
            functions: Vec::with_capacity(estimated_exprs / 32),
            classes: Vec::new(),
            imports: Vec::new(),
        }
    }

    // ===== Expressions =====

    #[inline]
    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        let id = ExprId::new(to_u32(self.exprs.len()));
        self.exprs.push(expr);
        id
    }

    /// Get expression by ID.
    ///
    /// # Panics
    /// Panics if `id` is out of bounds.
    #[inline]
    #[track_caller]
    pub fn get_expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    // ===== Expression lists =====

    /// Allocate an expression list. Children must already be allocated, so
    /// callers collect nested lists before calling this.
    pub fn alloc_expr_list(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprRange {
        let start = to_u32(self.expr_lists.len());
        self.expr_lists.extend(exprs);
        ExprRange::new(start, to_u32(self.expr_lists.len()) - start)
    }

    #[inline]
    #[track_caller]
    pub fn get_expr_list(&self, range: ExprRange) -> &[ExprId] {
        &self.expr_lists[range.to_range()]
    }

    // ===== Call arguments =====

    pub fn alloc_call_args(&mut self, args: impl IntoIterator<Item = CallArg>) -> CallArgRange {
        let start = to_u32(self.call_args.len());
        self.call_args.extend(args);
        CallArgRange::new(start, to_u32(self.call_args.len()) - start)
    }

    #[inline]
    #[track_caller]
    pub fn get_call_args(&self, range: CallArgRange) -> &[CallArg] {
        &self.call_args[range.to_range()]
    }

    /// Classify the callee of a call expression. `None` if `id` is not a call.
    pub fn call_target(&self, id: ExprId) -> Option<CallTarget> {
        match self.get_expr(id).kind {
            ExprKind::Call { func, args } => match self.get_expr(func).kind {
                ExprKind::Ident(name) => Some(CallTarget::Direct { func, name, args }),
                _ => Some(CallTarget::Other { func, args }),
            },
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => Some(CallTarget::Method {
                receiver,
                method,
                args,
            }),
            _ => None,
        }
    }

    // ===== Statements =====

    #[inline]
    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        let id = StmtId::new(to_u32(self.stmts.len()));
        self.stmts.push(stmt);
        id
    }

    #[inline]
    #[track_caller]
    pub fn get_stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    pub fn alloc_stmt_list(&mut self, stmts: impl IntoIterator<Item = StmtId>) -> StmtRange {
        let start = to_u32(self.stmt_lists.len());
        self.stmt_lists.extend(stmts);
        StmtRange::new(start, to_u32(self.stmt_lists.len()) - start)
    }

    #[inline]
    #[track_caller]
    pub fn get_stmt_list(&self, range: StmtRange) -> &[StmtId] {
        &self.stmt_lists[range.to_range()]
    }

    // ===== Parameters =====

    pub fn alloc_params(&mut self, params: impl IntoIterator<Item = Param>) -> ParamRange {
        let start = to_u32(self.params.len());
        self.params.extend(params);
        ParamRange::new(start, to_u32(self.params.len()) - start)
    }

    #[inline]
    #[track_caller]
    pub fn get_params(&self, range: ParamRange) -> &[Param] {
        &self.params[range.to_range()]
    }

    // ===== Declarations =====

    pub fn alloc_function(&mut self, def: FunctionDef) -> FunctionId {
        let id = FunctionId::new(to_u32(self.functions.len()));
        self.functions.push(def);
        id
    }

    #[inline]
    #[track_caller]
    pub fn get_function(&self, id: FunctionId) -> &FunctionDef {
        &self.functions[id.index()]
    }

    #[inline]
    pub fn function_count(&self) -> usize {
        self.functions.len()
    }

    pub fn alloc_class(&mut self, def: ClassDef) -> ClassId {
        let id = ClassId::new(to_u32(self.classes.len()));
        self.classes.push(def);
        id
    }

    #[inline]
    #[track_caller]
    pub fn get_class(&self, id: ClassId) -> &ClassDef {
        &self.classes[id.index()]
    }

    pub fn alloc_import(&mut self, def: ImportDef) -> ImportId {
        let id = ImportId::new(to_u32(self.imports.len()));
        self.imports.push(def);
        id
    }

    #[inline]
    #[track_caller]
    pub fn get_import(&self, id: ImportId) -> &ImportDef {
        &self.imports[id.index()]
    }
}
