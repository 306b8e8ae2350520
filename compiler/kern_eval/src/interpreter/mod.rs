//! Tree-walking interpreter over the flat arena.
//!
//! Statements return a [`Flow`] telling the enclosing block whether to
//! continue, leave a loop, or return from the current function. Errors carry
//! the span of the node that raised them.

mod call;
mod expr;

use rustc_hash::FxHashMap;
use std::rc::Rc;

use kern_ir::{
    BinaryOp, ClassId, ExprArena, ExprId, ExprKind, FunctionId, ImportId, Module, Name, Span,
    StmtId, StmtKind, StmtRange, StringInterner,
};
use kern_stack::DepthCounter;

use crate::builtins::Builtin;
use crate::environment::{Environment, ScopeKind};
use crate::errors::{EvalErrorKind, EvalResult};
use crate::operators::evaluate_binary;
use crate::stats::CallStats;
use crate::value::{ClassValue, FunctionValue};
use crate::Value;

/// Value of `__name__` for loaded files, so `if __name__ == "__main__":`
/// blocks are skipped.
const MODULE_NAME: &str = "__kern__";

/// How a statement finished.
#[derive(Debug)]
enum Flow {
    Next,
    Break,
    Continue,
    Return(Value),
}

/// Evaluates one arena's module and the calls made into it.
pub struct Interpreter<'a> {
    arena: &'a ExprArena,
    interner: &'a StringInterner,
    globals: Environment,
    stats: CallStats,
    depth: DepthCounter,
    /// Loops enclosing the current statement within the current call.
    loop_depth: u32,
    init: Name,
}

impl<'a> Interpreter<'a> {
    pub fn new(arena: &'a ExprArena, interner: &'a StringInterner) -> Self {
        let builtins = Environment::root(ScopeKind::Builtins);
        for builtin in Builtin::ALL {
            builtins.define(interner.intern(builtin.name()), Value::Builtin(builtin));
        }
        let globals = builtins.child(ScopeKind::Module);
        globals.define(interner.intern("__name__"), Value::str(MODULE_NAME));
        Interpreter {
            arena,
            interner,
            globals,
            stats: CallStats::default(),
            depth: DepthCounter::default(),
            loop_depth: 0,
            init: interner.intern("__init__"),
        }
    }

    /// Run a module's top-level statements, binding its definitions.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn load_module(&mut self, module: &Module) -> EvalResult<()> {
        let globals = self.globals.clone();
        self.exec_block(module.body, &globals)?;
        Ok(())
    }

    /// A module-level binding.
    pub fn global(&self, name: &str) -> Option<Value> {
        self.globals.lookup(self.interner.get(name)?)
    }

    /// Call any callable with positional arguments.
    pub fn call(&mut self, callee: &Value, args: Vec<Value>) -> EvalResult {
        self.call_value(callee, args, Vec::new(), Span::DUMMY)
    }

    /// Read `value.attr`, binding methods and running properties.
    pub fn attribute(&mut self, value: &Value, attr: &str) -> EvalResult {
        let attr = self.interner.intern(attr);
        self.get_attr(value, attr, Span::DUMMY)
    }

    pub fn stats(&self) -> &CallStats {
        &self.stats
    }

    /// Hand over the counters, starting fresh ones.
    pub fn take_stats(&mut self) -> CallStats {
        std::mem::take(&mut self.stats)
    }

    fn exec_block(&mut self, block: StmtRange, env: &Environment) -> EvalResult<Flow> {
        let arena = self.arena;
        for &stmt in arena.get_stmt_list(block) {
            match self.exec_stmt(stmt, env)? {
                Flow::Next => {}
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Next)
    }

    fn exec_stmt(&mut self, id: StmtId, env: &Environment) -> EvalResult<Flow> {
        let arena = self.arena;
        let stmt = arena.get_stmt(id);
        let span = stmt.span;
        match stmt.kind {
            StmtKind::Expr(expr) => {
                self.eval(expr, env)?;
            }
            StmtKind::Assign { targets, value } => {
                let value = self.eval(value, env)?;
                for &target in arena.get_expr_list(targets) {
                    self.assign(target, value.clone(), env)?;
                }
            }
            StmtKind::AugAssign { target, op, value } => {
                self.aug_assign(target, op, value, env)?;
            }
            StmtKind::Return(value) => {
                if self.depth.depth() == 0 {
                    return Err(EvalErrorKind::Unsupported {
                        construct: "`return` outside a function",
                    }
                    .at(span));
                }
                let value = if value.is_valid() {
                    self.eval(value, env)?
                } else {
                    Value::None
                };
                return Ok(Flow::Return(value));
            }
            StmtKind::Pass => {}
            StmtKind::Break | StmtKind::Continue => {
                if self.loop_depth == 0 {
                    return Err(EvalErrorKind::Unsupported {
                        construct: "`break` or `continue` outside a loop",
                    }
                    .at(span));
                }
                return Ok(if matches!(stmt.kind, StmtKind::Break) {
                    Flow::Break
                } else {
                    Flow::Continue
                });
            }
            StmtKind::For { target, iter, body } => {
                let items = self
                    .eval(iter, env)?
                    .iterate()
                    .map_err(|kind| kind.at(arena.get_expr(iter).span))?;
                self.loop_depth += 1;
                let flow = self.run_for(target, items, body, env);
                self.loop_depth -= 1;
                if let Flow::Return(value) = flow? {
                    return Ok(Flow::Return(value));
                }
            }
            StmtKind::While { cond, body } => {
                self.loop_depth += 1;
                let flow = self.run_while(cond, body, env);
                self.loop_depth -= 1;
                if let Flow::Return(value) = flow? {
                    return Ok(Flow::Return(value));
                }
            }
            StmtKind::With { .. } => {
                return Err(EvalErrorKind::Unsupported {
                    construct: "`with`",
                }
                .at(span));
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                let branch = if self.eval(cond, env)?.is_truthy() {
                    then_body
                } else {
                    else_body
                };
                return self.exec_block(branch, env);
            }
            StmtKind::Def(function) => {
                let value = self.define_function(function, env)?;
                env.define(arena.get_function(function).name, value);
            }
            StmtKind::Class(class) => {
                let value = self.define_class(class, env)?;
                env.define(arena.get_class(class).name, value);
            }
            StmtKind::Import(import) => self.bind_import(import, env),
        }
        Ok(Flow::Next)
    }

    fn run_for(
        &mut self,
        target: ExprId,
        items: Vec<Value>,
        body: StmtRange,
        env: &Environment,
    ) -> EvalResult<Flow> {
        for item in items {
            self.assign(target, item, env)?;
            match self.exec_block(body, env)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Next | Flow::Continue => {}
            }
        }
        Ok(Flow::Next)
    }

    fn run_while(&mut self, cond: ExprId, body: StmtRange, env: &Environment) -> EvalResult<Flow> {
        while self.eval(cond, env)?.is_truthy() {
            match self.exec_block(body, env)? {
                Flow::Break => break,
                Flow::Return(value) => return Ok(Flow::Return(value)),
                Flow::Next | Flow::Continue => {}
            }
        }
        Ok(Flow::Next)
    }

    /// Bind `target = value`, unpacking tuples and lists.
    fn assign(&mut self, target: ExprId, value: Value, env: &Environment) -> EvalResult<()> {
        let arena = self.arena;
        let expr = arena.get_expr(target);
        match expr.kind {
            ExprKind::Ident(name) => {
                env.define(name, value);
                Ok(())
            }
            ExprKind::Tuple(items) | ExprKind::List(items) => {
                let targets = arena.get_expr_list(items);
                let values = value.iterate().map_err(|kind| kind.at(expr.span))?;
                if values.len() != targets.len() {
                    return Err(EvalErrorKind::UnpackMismatch {
                        expected: targets.len(),
                        got: values.len(),
                    }
                    .at(expr.span));
                }
                for (&target, value) in targets.iter().zip(values) {
                    self.assign(target, value, env)?;
                }
                Ok(())
            }
            ExprKind::Subscript {
                value: container,
                index,
            } => {
                let object = self.eval(container, env)?;
                let index = self.eval(index, env)?;
                expr::store_item(&object, index, value).map_err(|kind| kind.at(expr.span))?;
                self.record_store(container);
                Ok(())
            }
            ExprKind::Attribute { value: object, attr } => {
                let object = self.eval(object, env)?;
                self.set_attr(&object, attr, value, expr.span)
            }
            _ => Err(EvalErrorKind::Internal {
                message: "invalid assignment target",
            }
            .at(expr.span)),
        }
    }

    fn aug_assign(
        &mut self,
        target: ExprId,
        op: BinaryOp,
        value: ExprId,
        env: &Environment,
    ) -> EvalResult<()> {
        let arena = self.arena;
        let expr = arena.get_expr(target);
        let span = expr.span;
        match expr.kind {
            ExprKind::Ident(name) => {
                let current = self.lookup(name, env, span)?;
                let rhs = self.eval(value, env)?;
                let updated = evaluate_binary(op, &current, &rhs).map_err(|kind| kind.at(span))?;
                env.define(name, updated);
            }
            ExprKind::Subscript {
                value: container,
                index,
            } => {
                let object = self.eval(container, env)?;
                let index = self.eval(index, env)?;
                let current = expr::load_item(&object, &index).map_err(|kind| kind.at(span))?;
                let rhs = self.eval(value, env)?;
                let updated = evaluate_binary(op, &current, &rhs).map_err(|kind| kind.at(span))?;
                expr::store_item(&object, index, updated).map_err(|kind| kind.at(span))?;
                self.record_store(container);
            }
            ExprKind::Attribute { value: object, attr } => {
                let object = self.eval(object, env)?;
                let current = self.get_attr(&object, attr, span)?;
                let rhs = self.eval(value, env)?;
                let updated = evaluate_binary(op, &current, &rhs).map_err(|kind| kind.at(span))?;
                self.set_attr(&object, attr, updated, span)?;
            }
            _ => {
                return Err(EvalErrorKind::Internal {
                    message: "invalid augmented assignment target",
                }
                .at(span))
            }
        }
        Ok(())
    }

    fn record_store(&mut self, container: ExprId) {
        if let ExprKind::Ident(name) = self.arena.get_expr(container).kind {
            self.stats.record_store(name);
        }
    }

    fn lookup(&self, name: Name, env: &Environment, span: Span) -> EvalResult {
        env.lookup(name).ok_or_else(|| {
            EvalErrorKind::UndefinedName {
                name: self.interner.lookup(name).to_owned(),
            }
            .at(span)
        })
    }

    /// A `def`: defaults are evaluated now, decorators applied bottom-up.
    fn define_function(&mut self, id: FunctionId, env: &Environment) -> EvalResult {
        let arena = self.arena;
        let def = arena.get_function(id);
        let mut defaults = Vec::new();
        for param in arena.get_params(def.params) {
            defaults.push(if param.has_default() {
                Some(self.eval(param.default, env)?)
            } else {
                None
            });
        }
        let function = Value::Function(Rc::new(FunctionValue {
            name: def.name,
            label: self.interner.lookup(def.name),
            def: id,
            defaults,
            closure: env.enclosing_function_scope(),
        }));
        self.decorate(function, arena.get_expr_list(def.decorators), env)
    }

    /// A `class`: base attributes first, then the body's bindings.
    fn define_class(&mut self, id: ClassId, env: &Environment) -> EvalResult {
        let arena = self.arena;
        let class = arena.get_class(id);
        let mut attrs = FxHashMap::default();
        for &base in arena.get_expr_list(class.bases) {
            if let Value::Class(base) = self.eval(base, env)? {
                attrs.extend(base.attrs.iter().map(|(name, value)| (*name, value.clone())));
            }
        }

        let body = env.child(ScopeKind::Class);
        self.exec_block(class.body, &body)?;
        attrs.extend(body.own_bindings());
        tracing::trace!(class = self.interner.lookup(class.name), attrs = attrs.len(), "class");

        let value = Value::Class(Rc::new(ClassValue {
            name: class.name,
            label: self.interner.lookup(class.name),
            attrs,
        }));
        self.decorate(value, arena.get_expr_list(class.decorators), env)
    }

    fn decorate(&mut self, value: Value, decorators: &[ExprId], env: &Environment) -> EvalResult {
        let mut value = value;
        for &decorator in decorators.iter().rev() {
            let callee = self.eval(decorator, env)?;
            let span = self.arena.get_expr(decorator).span;
            value = self.call_value(&callee, vec![value], Vec::new(), span)?;
        }
        Ok(value)
    }

    /// Imports bind an opaque module value; nothing is loaded.
    fn bind_import(&self, id: ImportId, env: &Environment) {
        let import = self.arena.get_import(id);
        for item in &import.items {
            let path = self.interner.lookup(item.path);
            let binding = if !item.alias.is_empty() {
                item.alias
            } else if import.from.is_empty() {
                self.interner
                    .intern(path.split_once('.').map_or(path, |(head, _)| head))
            } else {
                item.path
            };
            env.define(binding, Value::Module(path));
        }
    }
}
