//! AST visitor.
//!
//! Default `visit_*` methods call the matching `walk_*` function, which
//! traverses children. Override a `visit_*` method to act on a node and call
//! `walk_*` from it to keep descending. The tree itself is never mutated.
//!
//! ```text
//! struct NameCollector(FxHashSet<Name>);
//!
//! impl<'ast> Visitor<'ast> for NameCollector {
//!     fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
//!         if let ExprKind::Ident(name) = expr.kind {
//!             self.0.insert(name);
//!         }
//!         walk_expr(self, expr, arena);
//!     }
//! }
//! ```

use super::ast::{ClassDef, Expr, ExprKind, FunctionDef, Module, Param, Stmt, StmtKind};
use super::{ExprArena, ExprId, StmtRange};

pub trait Visitor<'ast> {
    fn visit_module(&mut self, module: &'ast Module, arena: &'ast ExprArena) {
        walk_block(self, module.body, arena);
    }

    fn visit_function(&mut self, function: &'ast FunctionDef, arena: &'ast ExprArena) {
        walk_function(self, function, arena);
    }

    fn visit_class(&mut self, class: &'ast ClassDef, arena: &'ast ExprArena) {
        walk_class(self, class, arena);
    }

    fn visit_param(&mut self, param: &'ast Param, arena: &'ast ExprArena) {
        walk_param(self, param, arena);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt, arena: &'ast ExprArena) {
        walk_stmt(self, stmt, arena);
    }

    fn visit_expr(&mut self, expr: &'ast Expr, arena: &'ast ExprArena) {
        walk_expr(self, expr, arena);
    }

    /// Visit an optional expression; `ExprId::INVALID` is skipped.
    fn visit_expr_id(&mut self, id: ExprId, arena: &'ast ExprArena) {
        if id.is_valid() {
            self.visit_expr(arena.get_expr(id), arena);
        }
    }
}

pub fn walk_block<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    block: StmtRange,
    arena: &'ast ExprArena,
) {
    for &stmt_id in arena.get_stmt_list(block) {
        visitor.visit_stmt(arena.get_stmt(stmt_id), arena);
    }
}

pub fn walk_function<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    function: &'ast FunctionDef,
    arena: &'ast ExprArena,
) {
    for &decorator in arena.get_expr_list(function.decorators) {
        visitor.visit_expr_id(decorator, arena);
    }
    for param in arena.get_params(function.params) {
        visitor.visit_param(param, arena);
    }
    visitor.visit_expr_id(function.returns, arena);
    walk_block(visitor, function.body, arena);
}

pub fn walk_class<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    class: &'ast ClassDef,
    arena: &'ast ExprArena,
) {
    for &decorator in arena.get_expr_list(class.decorators) {
        visitor.visit_expr_id(decorator, arena);
    }
    for &base in arena.get_expr_list(class.bases) {
        visitor.visit_expr_id(base, arena);
    }
    walk_block(visitor, class.body, arena);
}

pub fn walk_param<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    param: &'ast Param,
    arena: &'ast ExprArena,
) {
    visitor.visit_expr_id(param.annotation, arena);
    visitor.visit_expr_id(param.default, arena);
}

pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    stmt: &'ast Stmt,
    arena: &'ast ExprArena,
) {
    match stmt.kind {
        StmtKind::Expr(expr) | StmtKind::Return(expr) => visitor.visit_expr_id(expr, arena),
        StmtKind::Assign { targets, value } => {
            for &target in arena.get_expr_list(targets) {
                visitor.visit_expr_id(target, arena);
            }
            visitor.visit_expr_id(value, arena);
        }
        StmtKind::AugAssign { target, value, .. } => {
            visitor.visit_expr_id(target, arena);
            visitor.visit_expr_id(value, arena);
        }
        StmtKind::For { target, iter, body } => {
            visitor.visit_expr_id(target, arena);
            visitor.visit_expr_id(iter, arena);
            walk_block(visitor, body, arena);
        }
        StmtKind::While { cond, body } => {
            visitor.visit_expr_id(cond, arena);
            walk_block(visitor, body, arena);
        }
        StmtKind::With {
            context,
            target,
            body,
        } => {
            visitor.visit_expr_id(context, arena);
            visitor.visit_expr_id(target, arena);
            walk_block(visitor, body, arena);
        }
        StmtKind::If {
            cond,
            then_body,
            else_body,
        } => {
            visitor.visit_expr_id(cond, arena);
            walk_block(visitor, then_body, arena);
            walk_block(visitor, else_body, arena);
        }
        StmtKind::Def(fid) => visitor.visit_function(arena.get_function(fid), arena),
        StmtKind::Class(cid) => visitor.visit_class(arena.get_class(cid), arena),
        StmtKind::Pass | StmtKind::Break | StmtKind::Continue | StmtKind::Import(_) => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    expr: &'ast Expr,
    arena: &'ast ExprArena,
) {
    match expr.kind {
        ExprKind::Int(_)
        | ExprKind::Float(_)
        | ExprKind::Str(_)
        | ExprKind::Bool(_)
        | ExprKind::None
        | ExprKind::Ident(_)
        | ExprKind::Error => {}
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr_id(left, arena);
            visitor.visit_expr_id(right, arena);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr_id(operand, arena),
        ExprKind::Call { func, args } => {
            visitor.visit_expr_id(func, arena);
            for arg in arena.get_call_args(args) {
                visitor.visit_expr_id(arg.value, arena);
            }
        }
        ExprKind::MethodCall { receiver, args, .. } => {
            visitor.visit_expr_id(receiver, arena);
            for arg in arena.get_call_args(args) {
                visitor.visit_expr_id(arg.value, arena);
            }
        }
        ExprKind::Attribute { value, .. } => visitor.visit_expr_id(value, arena),
        ExprKind::Subscript { value, index } => {
            visitor.visit_expr_id(value, arena);
            visitor.visit_expr_id(index, arena);
        }
        ExprKind::List(items) | ExprKind::Tuple(items) => {
            for &item in arena.get_expr_list(items) {
                visitor.visit_expr_id(item, arena);
            }
        }
        ExprKind::ListComp {
            elt,
            target,
            iter,
            cond,
        } => {
            visitor.visit_expr_id(iter, arena);
            visitor.visit_expr_id(target, arena);
            visitor.visit_expr_id(cond, arena);
            visitor.visit_expr_id(elt, arena);
        }
        ExprKind::Dict { keys, values } => {
            for (&key, &value) in arena
                .get_expr_list(keys)
                .iter()
                .zip(arena.get_expr_list(values))
            {
                visitor.visit_expr_id(key, arena);
                visitor.visit_expr_id(value, arena);
            }
        }
    }
}
