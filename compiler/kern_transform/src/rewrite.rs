//! Call rewriting: copy a method into the kernel's arena with the receiver
//! erased.
//!
//! The rewriter is a deep copier from the source arena into a destination
//! arena. While copying it:
//!
//! - drops the method's first (receiver) parameter and its decorators
//! - turns `receiver.name(args)` into `name(args)` and records `name`
//! - passes every other call through unchanged
//! - rejects any other use of the receiver
//!
//! Calls are classified with [`ExprArena::call_target`], so every call
//! shape is matched explicitly.
//!
//! Each method is rewritten against its own first parameter, so the
//! receiver is never assumed to be called `self`.

use kern_ir::{
    CallArg, CallArgRange, CallTarget, ClassDef, ClassId, Expr, ExprArena, ExprId, ExprKind,
    ExprRange, FunctionDef, FunctionId, ImportId, Name, Param, ParamRange, Span, Stmt, StmtId,
    StmtKind, StmtRange, StringInterner,
};
use kern_stack::ensure_sufficient_stack;
use tracing::trace;

use crate::{HelperSet, ShapeReason, TransformError};

/// Copies methods from `src` into a destination arena, erasing the receiver.
pub struct CallRewriter<'a> {
    src: &'a ExprArena,
    interner: &'a StringInterner,
    /// Receiver of the method being copied; `Name::EMPTY` outside a method.
    receiver: Name,
    helpers: HelperSet,
}

impl<'a> CallRewriter<'a> {
    pub fn new(src: &'a ExprArena, interner: &'a StringInterner) -> Self {
        CallRewriter {
            src,
            interner,
            receiver: Name::EMPTY,
            helpers: HelperSet::new(),
        }
    }

    /// Rewrite expressions as if inside a method whose receiver is `receiver`.
    #[must_use]
    pub fn with_receiver(mut self, receiver: Name) -> Self {
        self.receiver = receiver;
        self
    }

    /// Helpers recorded so far, in first-use order.
    pub fn helpers(&self) -> &HelperSet {
        &self.helpers
    }

    pub fn into_helpers(self) -> HelperSet {
        self.helpers
    }

    /// Copy method `id` into `dst` as a free function: receiver parameter
    /// and decorators removed, receiver calls rewritten.
    pub fn rewrite_method(
        &mut self,
        id: FunctionId,
        dst: &mut ExprArena,
    ) -> Result<FunctionId, TransformError> {
        let src = self.src;
        let func = *src.get_function(id);
        trace!(name = self.interner.lookup(func.name), "rewrite_method");

        let Some((receiver, params)) = src.get_params(func.params).split_first() else {
            return Err(TransformError::shape(
                ShapeReason::NoReceiver {
                    function: self.interner.lookup(func.name).to_owned(),
                },
                func.span,
            ));
        };

        let outer = std::mem::replace(&mut self.receiver, receiver.name);
        let result = self.copy_params(params, dst).and_then(|params| {
            let returns = self.rewrite_opt(func.returns, dst)?;
            let body = self.rewrite_block(func.body, dst)?;
            Ok(dst.alloc_function(FunctionDef {
                name: func.name,
                params,
                body,
                decorators: ExprRange::EMPTY,
                returns,
                span: func.span,
            }))
        });
        self.receiver = outer;
        result
    }

    /// Copy one expression, rewriting receiver calls.
    pub fn rewrite_expr(
        &mut self,
        id: ExprId,
        dst: &mut ExprArena,
    ) -> Result<ExprId, TransformError> {
        ensure_sufficient_stack(|| self.rewrite_expr_inner(id, dst))
    }

    fn rewrite_expr_inner(
        &mut self,
        id: ExprId,
        dst: &mut ExprArena,
    ) -> Result<ExprId, TransformError> {
        let expr = *self.src.get_expr(id);
        let kind = match expr.kind {
            ExprKind::Int(_)
            | ExprKind::Float(_)
            | ExprKind::Str(_)
            | ExprKind::Bool(_)
            | ExprKind::None
            | ExprKind::Error => expr.kind,

            ExprKind::Ident(name) => {
                if self.is_receiver(name) {
                    return Err(self.receiver_escapes(expr.span));
                }
                expr.kind
            }

            ExprKind::Binary { op, left, right } => ExprKind::Binary {
                op,
                left: self.rewrite_expr(left, dst)?,
                right: self.rewrite_expr(right, dst)?,
            },

            ExprKind::Unary { op, operand } => ExprKind::Unary {
                op,
                operand: self.rewrite_expr(operand, dst)?,
            },

            ExprKind::Call { .. } | ExprKind::MethodCall { .. } => {
                return self.rewrite_call(id, expr.span, dst);
            }

            ExprKind::Attribute { value, attr } => ExprKind::Attribute {
                value: self.rewrite_expr(value, dst)?,
                attr,
            },

            ExprKind::Subscript { value, index } => ExprKind::Subscript {
                value: self.rewrite_expr(value, dst)?,
                index: self.rewrite_expr(index, dst)?,
            },

            ExprKind::List(items) => ExprKind::List(self.rewrite_expr_list(items, dst)?),
            ExprKind::Tuple(items) => ExprKind::Tuple(self.rewrite_expr_list(items, dst)?),

            ExprKind::Dict { keys, values } => ExprKind::Dict {
                keys: self.rewrite_expr_list(keys, dst)?,
                values: self.rewrite_expr_list(values, dst)?,
            },

            ExprKind::ListComp {
                elt,
                target,
                iter,
                cond,
            } => ExprKind::ListComp {
                elt: self.rewrite_expr(elt, dst)?,
                target: self.rewrite_expr(target, dst)?,
                iter: self.rewrite_expr(iter, dst)?,
                cond: self.rewrite_opt(cond, dst)?,
            },
        };
        Ok(dst.alloc_expr(Expr::new(kind, expr.span)))
    }

    fn rewrite_call(
        &mut self,
        id: ExprId,
        span: Span,
        dst: &mut ExprArena,
    ) -> Result<ExprId, TransformError> {
        let (func, args) = match self.src.call_target(id) {
            Some(CallTarget::Method {
                receiver,
                method,
                args,
            }) => return self.rewrite_method_call(span, receiver, method, args, dst),
            Some(CallTarget::Direct { func, name, args }) => {
                if self.is_receiver(name) {
                    return Err(self.malformed_call(span));
                }
                (func, args)
            }
            Some(CallTarget::Other { func, args }) => {
                if self.is_rooted_at_receiver(func) {
                    return Err(self.malformed_call(span));
                }
                (func, args)
            }
            None => return Err(self.malformed_call(span)),
        };
        let kind = ExprKind::Call {
            func: self.rewrite_expr(func, dst)?,
            args: self.rewrite_args(args, dst)?,
        };
        Ok(dst.alloc_expr(Expr::new(kind, span)))
    }

    fn rewrite_method_call(
        &mut self,
        span: Span,
        receiver: ExprId,
        method: Name,
        args: CallArgRange,
        dst: &mut ExprArena,
    ) -> Result<ExprId, TransformError> {
        if let ExprKind::Ident(name) = self.src.get_expr(receiver).kind {
            if self.is_receiver(name) {
                if self.helpers.insert(method, span) {
                    trace!(helper = self.interner.lookup(method), "recorded helper");
                }
                let func = dst.alloc_expr(Expr::new(ExprKind::Ident(method), span));
                let args = self.rewrite_args(args, dst)?;
                return Ok(dst.alloc_expr(Expr::new(ExprKind::Call { func, args }, span)));
            }
        }
        if self.is_rooted_at_receiver(receiver) {
            return Err(self.malformed_call(span));
        }

        let kind = ExprKind::MethodCall {
            receiver: self.rewrite_expr(receiver, dst)?,
            method,
            args: self.rewrite_args(args, dst)?,
        };
        Ok(dst.alloc_expr(Expr::new(kind, span)))
    }

    /// `receiver`, `receiver.a`, `receiver[0].b`, ... Calls end the chain.
    fn is_rooted_at_receiver(&self, id: ExprId) -> bool {
        match self.src.get_expr(id).kind {
            ExprKind::Ident(name) => self.is_receiver(name),
            ExprKind::Attribute { value, .. } | ExprKind::Subscript { value, .. } => {
                self.is_rooted_at_receiver(value)
            }
            _ => false,
        }
    }

    fn is_receiver(&self, name: Name) -> bool {
        !self.receiver.is_empty() && name == self.receiver
    }

    #[cold]
    fn receiver_escapes(&self, span: Span) -> TransformError {
        TransformError::shape(
            ShapeReason::ReceiverEscapes {
                receiver: self.interner.lookup(self.receiver).to_owned(),
            },
            span,
        )
    }

    #[cold]
    fn malformed_call(&self, span: Span) -> TransformError {
        TransformError::MalformedCall {
            receiver: self.interner.lookup(self.receiver).to_owned(),
            span,
        }
    }

    /// Copy an optional expression; `ExprId::INVALID` stays invalid.
    fn rewrite_opt(&mut self, id: ExprId, dst: &mut ExprArena) -> Result<ExprId, TransformError> {
        if id.is_valid() {
            self.rewrite_expr(id, dst)
        } else {
            Ok(ExprId::INVALID)
        }
    }

    fn rewrite_expr_list(
        &mut self,
        range: ExprRange,
        dst: &mut ExprArena,
    ) -> Result<ExprRange, TransformError> {
        let src = self.src;
        let items = src
            .get_expr_list(range)
            .iter()
            .map(|&id| self.rewrite_expr(id, dst))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dst.alloc_expr_list(items))
    }

    fn rewrite_args(
        &mut self,
        range: CallArgRange,
        dst: &mut ExprArena,
    ) -> Result<CallArgRange, TransformError> {
        let src = self.src;
        let args = src
            .get_call_args(range)
            .iter()
            .map(|arg| {
                Ok(CallArg {
                    name: arg.name,
                    value: self.rewrite_expr(arg.value, dst)?,
                    span: arg.span,
                })
            })
            .collect::<Result<Vec<_>, TransformError>>()?;
        Ok(dst.alloc_call_args(args))
    }

    fn copy_params(
        &mut self,
        params: &[Param],
        dst: &mut ExprArena,
    ) -> Result<ParamRange, TransformError> {
        let params = params
            .iter()
            .map(|param| {
                Ok(Param {
                    name: param.name,
                    annotation: self.rewrite_opt(param.annotation, dst)?,
                    default: self.rewrite_opt(param.default, dst)?,
                    span: param.span,
                })
            })
            .collect::<Result<Vec<_>, TransformError>>()?;
        Ok(dst.alloc_params(params))
    }

    fn rewrite_block(
        &mut self,
        block: StmtRange,
        dst: &mut ExprArena,
    ) -> Result<StmtRange, TransformError> {
        let src = self.src;
        let stmts = src
            .get_stmt_list(block)
            .iter()
            .map(|&id| self.rewrite_stmt(id, dst))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dst.alloc_stmt_list(stmts))
    }

    fn rewrite_stmt(&mut self, id: StmtId, dst: &mut ExprArena) -> Result<StmtId, TransformError> {
        let stmt = *self.src.get_stmt(id);
        let kind = match stmt.kind {
            StmtKind::Expr(expr) => StmtKind::Expr(self.rewrite_expr(expr, dst)?),
            StmtKind::Assign { targets, value } => StmtKind::Assign {
                targets: self.rewrite_expr_list(targets, dst)?,
                value: self.rewrite_expr(value, dst)?,
            },
            StmtKind::AugAssign { target, op, value } => StmtKind::AugAssign {
                target: self.rewrite_expr(target, dst)?,
                op,
                value: self.rewrite_expr(value, dst)?,
            },
            StmtKind::Return(value) => StmtKind::Return(self.rewrite_opt(value, dst)?),
            StmtKind::Pass => StmtKind::Pass,
            StmtKind::Break => StmtKind::Break,
            StmtKind::Continue => StmtKind::Continue,
            StmtKind::For { target, iter, body } => StmtKind::For {
                target: self.rewrite_expr(target, dst)?,
                iter: self.rewrite_expr(iter, dst)?,
                body: self.rewrite_block(body, dst)?,
            },
            StmtKind::While { cond, body } => StmtKind::While {
                cond: self.rewrite_expr(cond, dst)?,
                body: self.rewrite_block(body, dst)?,
            },
            StmtKind::With {
                context,
                target,
                body,
            } => StmtKind::With {
                context: self.rewrite_expr(context, dst)?,
                target: self.rewrite_opt(target, dst)?,
                body: self.rewrite_block(body, dst)?,
            },
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => StmtKind::If {
                cond: self.rewrite_expr(cond, dst)?,
                then_body: self.rewrite_block(then_body, dst)?,
                else_body: self.rewrite_block(else_body, dst)?,
            },
            StmtKind::Def(func) => StmtKind::Def(self.copy_function(func, dst)?),
            StmtKind::Class(class) => StmtKind::Class(self.copy_class(class, dst)?),
            StmtKind::Import(import) => StmtKind::Import(self.copy_import(import, dst)),
        };
        Ok(dst.alloc_stmt(Stmt::new(kind, stmt.span)))
    }

    /// A nested `def` is copied whole; only the enclosing receiver is erased.
    fn copy_function(
        &mut self,
        id: FunctionId,
        dst: &mut ExprArena,
    ) -> Result<FunctionId, TransformError> {
        let src = self.src;
        let func = *src.get_function(id);
        let decorators = self.rewrite_expr_list(func.decorators, dst)?;
        let params = self.copy_params(src.get_params(func.params), dst)?;
        let returns = self.rewrite_opt(func.returns, dst)?;
        let body = self.rewrite_block(func.body, dst)?;
        Ok(dst.alloc_function(FunctionDef {
            name: func.name,
            params,
            body,
            decorators,
            returns,
            span: func.span,
        }))
    }

    fn copy_class(&mut self, id: ClassId, dst: &mut ExprArena) -> Result<ClassId, TransformError> {
        let class = *self.src.get_class(id);
        let decorators = self.rewrite_expr_list(class.decorators, dst)?;
        let bases = self.rewrite_expr_list(class.bases, dst)?;
        let body = self.rewrite_block(class.body, dst)?;
        Ok(dst.alloc_class(ClassDef {
            name: class.name,
            bases,
            body,
            decorators,
            span: class.span,
        }))
    }

    fn copy_import(&self, id: ImportId, dst: &mut ExprArena) -> ImportId {
        dst.alloc_import(self.src.get_import(id).clone())
    }
}

#[cfg(test)]
mod tests;
