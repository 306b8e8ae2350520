//! Kernel synthesis.
//!
//! Builds the kernel function around the rewritten row function:
//!
//! ```text
//! def <row>_kernel(in_0, ..., in_n, out_0, ..., out_m):
//!     <helpers>
//!     <row function>
//!     for i, (x0, ..., xn) in enumerate(zip(in_0, ..., in_n)):
//!         y0, ..., ym = <row>(x0, ..., xn)
//!         out_0[i] = y0
//!         ...
//! ```
//!
//! Generated nodes carry `Span::DUMMY`; kernel parameters keep the span of
//! the source name they come from.

use kern_ir::visitor::{walk_expr, walk_function, walk_param, Visitor};
use kern_ir::{
    CallArg, Expr, ExprArena, ExprId, ExprKind, ExprRange, FunctionDef, FunctionId, Name, Param,
    Span, Stmt, StmtId, StmtKind, StringInterner,
};
use rustc_hash::{FxHashMap, FxHashSet};
use tracing::trace;

use crate::{CollectedHelper, ShapeReason, TransformError};

/// Builtins the generated loop calls; no kernel parameter or nested function
/// may shadow them.
const LOOP_BUILTINS: [&str; 2] = ["enumerate", "zip"];

/// Everything the synthesizer needs, already in the kernel arena.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KernelPlan {
    pub name: Name,
    pub inputs: Vec<Param>,
    pub outputs: Vec<Param>,
    pub helpers: Vec<CollectedHelper>,
    /// The rewritten row function.
    pub row: FunctionId,
}

/// The names of the row function's terminal `return [a, b, ...]`.
pub fn declared_outputs(
    arena: &ExprArena,
    row: FunctionId,
    interner: &StringInterner,
) -> Result<Vec<Param>, TransformError> {
    let func = arena.get_function(row);
    let function = || interner.lookup(func.name).to_owned();
    let missing_return = |span| {
        TransformError::shape(
            ShapeReason::MissingReturn {
                function: function(),
            },
            span,
        )
    };

    let Some(&last) = arena.get_stmt_list(func.body).last() else {
        return Err(missing_return(func.span));
    };
    let last = arena.get_stmt(last);
    let value = match last.kind {
        StmtKind::Return(value) if value.is_valid() => value,
        _ => return Err(missing_return(last.span)),
    };

    let expr = arena.get_expr(value);
    let (ExprKind::List(items) | ExprKind::Tuple(items)) = expr.kind else {
        return Err(TransformError::shape(
            ShapeReason::ReturnNotNameList {
                function: function(),
            },
            expr.span,
        ));
    };

    arena
        .get_expr_list(items)
        .iter()
        .map(|&item| {
            let item = arena.get_expr(item);
            match item.kind {
                ExprKind::Ident(name) => Ok(Param::plain(name, item.span)),
                _ => Err(TransformError::shape(
                    ShapeReason::ReturnNotNameList {
                        function: function(),
                    },
                    item.span,
                )),
            }
        })
        .collect()
}

/// Assemble the kernel function in `dst`.
pub fn synthesize(
    dst: &mut ExprArena,
    plan: &KernelPlan,
    interner: &StringInterner,
) -> Result<FunctionId, TransformError> {
    check_columns(dst, plan, interner)?;

    let mut fresh = FreshNames::new(dst, plan, interner);
    let names = LoopNames {
        index: fresh.make("i"),
        row: (0..plan.inputs.len())
            .map(|k| fresh.make(&format!("x{k}")))
            .collect(),
        result: (0..plan.outputs.len())
            .map(|k| fresh.make(&format!("y{k}")))
            .collect(),
        enumerate: interner.intern("enumerate"),
        zip: interner.intern("zip"),
    };

    let mut body: Vec<StmtId> = Vec::with_capacity(plan.helpers.len() + 2);
    for helper in &plan.helpers {
        body.push(def_stmt(dst, helper.function));
    }
    body.push(def_stmt(dst, plan.row));
    body.push(iteration(dst, plan, &names));

    let params = dst.alloc_params(
        plan.inputs
            .iter()
            .chain(&plan.outputs)
            .map(|p| Param::plain(p.name, p.span)),
    );
    let body = dst.alloc_stmt_list(body);
    Ok(dst.alloc_function(FunctionDef {
        name: plan.name,
        params,
        body,
        decorators: ExprRange::EMPTY,
        returns: ExprId::INVALID,
        span: Span::DUMMY,
    }))
}

/// Kernel parameters must be distinct and must not shadow anything the
/// kernel body defines or calls. The row function must return one value
/// per output column, and no nested function may shadow a loop builtin.
fn check_columns(
    dst: &ExprArena,
    plan: &KernelPlan,
    interner: &StringInterner,
) -> Result<(), TransformError> {
    let row = dst.get_function(plan.row);
    let row_name = || interner.lookup(row.name).to_owned();
    if plan.inputs.is_empty() {
        return Err(TransformError::shape(
            ShapeReason::NoInputs {
                function: row_name(),
            },
            row.span,
        ));
    }
    if plan.outputs.is_empty() {
        return Err(TransformError::shape(
            ShapeReason::NoOutputs {
                function: row_name(),
            },
            row.span,
        ));
    }

    let returned = declared_outputs(dst, plan.row, interner)?;
    if returned.len() != plan.outputs.len() {
        return Err(TransformError::shape(
            ShapeReason::OutputCountMismatch {
                returned: returned.len(),
                declared: plan.outputs.len(),
            },
            returned.first().map_or(row.span, |p| p.span),
        ));
    }

    let nested = plan
        .helpers
        .iter()
        .map(|helper| helper.function)
        .chain([plan.row]);
    for function in nested {
        let def = dst.get_function(function);
        let name = interner.lookup(def.name);
        if LOOP_BUILTINS.contains(&name) {
            return Err(TransformError::shape(
                ShapeReason::ShadowsLoopBuiltin {
                    name: name.to_owned(),
                },
                def.span,
            ));
        }
    }

    let collision = |param: &Param, with: &'static str| {
        TransformError::shape(
            ShapeReason::NameCollision {
                name: interner.lookup(param.name).to_owned(),
                with,
            },
            param.span,
        )
    };

    // name -> whether it was first seen as an input
    let mut seen: FxHashMap<Name, bool> = FxHashMap::default();
    for (k, param) in plan.inputs.iter().chain(&plan.outputs).enumerate() {
        let is_input = k < plan.inputs.len();
        match seen.insert(param.name, is_input) {
            Some(true) if !is_input => return Err(collision(param, "an input column")),
            Some(_) => {
                return Err(TransformError::shape(
                    ShapeReason::DuplicateColumn {
                        name: interner.lookup(param.name).to_owned(),
                    },
                    param.span,
                ))
            }
            None => {}
        }
        if param.name == row.name {
            return Err(collision(param, "the row function"));
        }
        if plan.helpers.iter().any(|h| h.name == param.name) {
            return Err(collision(param, "a helper function"));
        }
        if LOOP_BUILTINS.contains(&interner.lookup(param.name)) {
            return Err(collision(param, "a builtin called by the kernel loop"));
        }
    }
    Ok(())
}

fn def_stmt(dst: &mut ExprArena, function: FunctionId) -> StmtId {
    let span = dst.get_function(function).span;
    dst.alloc_stmt(Stmt::new(StmtKind::Def(function), span))
}

/// Fresh and builtin names used by the generated loop.
struct LoopNames {
    index: Name,
    /// One per input: the current row's values.
    row: Vec<Name>,
    /// One per output: the row function's results.
    result: Vec<Name>,
    enumerate: Name,
    zip: Name,
}

/// The generated `for` loop.
fn iteration(dst: &mut ExprArena, plan: &KernelPlan, names: &LoopNames) -> StmtId {
    // i, (x0, ..., xn)
    let index_target = ident(dst, names.index);
    let row_target = name_tuple(dst, &names.row);
    let target_items = dst.alloc_expr_list([index_target, row_target]);
    let target = alloc(dst, ExprKind::Tuple(target_items));

    // enumerate(zip(in_0, ..., in_n))
    let inputs: Vec<Name> = plan.inputs.iter().map(|p| p.name).collect();
    let zipped = call(dst, names.zip, &inputs);
    let iter = call_with(dst, names.enumerate, vec![zipped]);

    let mut body = Vec::with_capacity(names.result.len() + 1);

    // y0, ..., ym = row(x0, ..., xn)
    let row_name = dst.get_function(plan.row).name;
    let value = call(dst, row_name, &names.row);
    let unpack = name_tuple(dst, &names.result);
    let targets = dst.alloc_expr_list([unpack]);
    body.push(dst.alloc_stmt(Stmt::new(StmtKind::Assign { targets, value }, Span::DUMMY)));

    // out_k[i] = y_k
    for (output, &result) in plan.outputs.iter().zip(&names.result) {
        let column = ident(dst, output.name);
        let at = ident(dst, names.index);
        let slot = alloc(
            dst,
            ExprKind::Subscript {
                value: column,
                index: at,
            },
        );
        let targets = dst.alloc_expr_list([slot]);
        let value = ident(dst, result);
        body.push(dst.alloc_stmt(Stmt::new(StmtKind::Assign { targets, value }, Span::DUMMY)));
    }

    trace!(
        inputs = names.row.len(),
        outputs = names.result.len(),
        "built kernel loop"
    );
    let body = dst.alloc_stmt_list(body);
    dst.alloc_stmt(Stmt::new(StmtKind::For { target, iter, body }, Span::DUMMY))
}

fn alloc(dst: &mut ExprArena, kind: ExprKind) -> ExprId {
    dst.alloc_expr(Expr::new(kind, Span::DUMMY))
}

fn ident(dst: &mut ExprArena, name: Name) -> ExprId {
    alloc(dst, ExprKind::Ident(name))
}

fn name_tuple(dst: &mut ExprArena, names: &[Name]) -> ExprId {
    let items: Vec<ExprId> = names.iter().map(|&name| ident(dst, name)).collect();
    let items = dst.alloc_expr_list(items);
    alloc(dst, ExprKind::Tuple(items))
}

/// `func(a, b, ...)` with identifier arguments.
fn call(dst: &mut ExprArena, func: Name, args: &[Name]) -> ExprId {
    let args: Vec<ExprId> = args.iter().map(|&name| ident(dst, name)).collect();
    call_with(dst, func, args)
}

fn call_with(dst: &mut ExprArena, func: Name, args: Vec<ExprId>) -> ExprId {
    let func = ident(dst, func);
    let args = dst.alloc_call_args(
        args.into_iter()
            .map(|value| CallArg::positional(value, Span::DUMMY)),
    );
    alloc(dst, ExprKind::Call { func, args })
}

/// Temporary names that collide with nothing already in the kernel.
struct FreshNames<'a> {
    used: FxHashSet<Name>,
    interner: &'a StringInterner,
}

impl<'a> FreshNames<'a> {
    fn new(dst: &ExprArena, plan: &KernelPlan, interner: &'a StringInterner) -> Self {
        let mut collector = NameCollector::default();
        for helper in &plan.helpers {
            collector.visit_function(dst.get_function(helper.function), dst);
        }
        collector.visit_function(dst.get_function(plan.row), dst);
        collector
            .0
            .extend(plan.inputs.iter().chain(&plan.outputs).map(|p| p.name));
        for builtin in LOOP_BUILTINS {
            collector.0.insert(interner.intern(builtin));
        }
        FreshNames {
            used: collector.0,
            interner,
        }
    }

    /// `base`, or `base_1`, `base_2`, ... if taken.
    fn make(&mut self, base: &str) -> Name {
        let mut name = self.interner.intern(base);
        let mut suffix = 1;
        while self.used.contains(&name) {
            name = self.interner.intern(&format!("{base}_{suffix}"));
            suffix += 1;
        }
        self.used.insert(name);
        name
    }
}

/// Every name bound or referenced inside the visited functions.
#[derive(Default)]
struct NameCollector(FxHashSet<Name>);

impl<'ast> Visitor<'ast> for NameCollector {
    fn visit_function(&mut self, function: &'ast FunctionDef, arena: &'ast ExprArena) {
        self.0.insert(function.name);
        walk_function(self, function, arena);
    }

    fn visit_param(&mut self, param: &'ast Param, arena: &'ast ExprArena) {
        self.0.insert(param.name);
        walk_param(self, param, arena);
    }

    fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
        if let ExprKind::Ident(name) = expr.kind {
            self.0.insert(name);
        }
        walk_expr(self, expr, arena);
    }
}

#[cfg(test)]
mod tests;
