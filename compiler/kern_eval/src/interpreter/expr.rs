//! Expression evaluation and item access.

use kern_ir::{BinaryOp, CallArgRange, ExprId, ExprKind, ExprRange, Name};
use kern_stack::ensure_sufficient_stack;

use super::Interpreter;
use crate::environment::{Environment, ScopeKind};
use crate::errors::{EvalErrorKind, EvalResult};
use crate::operators::{evaluate_binary, evaluate_unary};
use crate::Value;

/// Positional and keyword argument values of one call.
pub(super) type Arguments = (Vec<Value>, Vec<(Name, Value)>);

impl Interpreter<'_> {
    pub(super) fn eval(&mut self, id: ExprId, env: &Environment) -> EvalResult {
        ensure_sufficient_stack(|| self.eval_inner(id, env))
    }

    fn eval_inner(&mut self, id: ExprId, env: &Environment) -> EvalResult {
        let arena = self.arena;
        let expr = arena.get_expr(id);
        let span = expr.span;
        match expr.kind {
            ExprKind::Int(n) => Ok(Value::Int(n)),
            ExprKind::Float(bits) => Ok(Value::Float(f64::from_bits(bits))),
            ExprKind::Str(text) => Ok(Value::str(self.interner.lookup(text))),
            ExprKind::Bool(b) => Ok(Value::Bool(b)),
            ExprKind::None => Ok(Value::None),
            ExprKind::Ident(name) => self.lookup(name, env, span),

            ExprKind::Binary {
                op: op @ (BinaryOp::And | BinaryOp::Or),
                left,
                right,
            } => {
                let left = self.eval(left, env)?;
                // `and` stops at the first falsy operand, `or` at the first
                // truthy one; the deciding operand is the result.
                if left.is_truthy() == (op == BinaryOp::Or) {
                    Ok(left)
                } else {
                    self.eval(right, env)
                }
            }
            ExprKind::Binary { op, left, right } => {
                let left = self.eval(left, env)?;
                let right = self.eval(right, env)?;
                evaluate_binary(op, &left, &right).map_err(|kind| kind.at(span))
            }
            ExprKind::Unary { op, operand } => {
                let operand = self.eval(operand, env)?;
                evaluate_unary(op, &operand).map_err(|kind| kind.at(span))
            }

            ExprKind::Call { func, args } => {
                let callee = self.eval(func, env)?;
                let (positional, keywords) = self.eval_args(args, env)?;
                self.call_value(&callee, positional, keywords, span)
            }
            ExprKind::MethodCall {
                receiver,
                method,
                args,
            } => {
                let receiver = self.eval(receiver, env)?;
                let (positional, keywords) = self.eval_args(args, env)?;
                self.call_method(&receiver, method, positional, keywords, span)
            }
            ExprKind::Attribute { value, attr } => {
                let value = self.eval(value, env)?;
                self.get_attr(&value, attr, span)
            }
            ExprKind::Subscript { value, index } => {
                let value = self.eval(value, env)?;
                let index = self.eval(index, env)?;
                load_item(&value, &index).map_err(|kind| kind.at(span))
            }

            ExprKind::List(items) => Ok(Value::list(self.eval_all(items, env)?)),
            ExprKind::Tuple(items) => Ok(Value::tuple(self.eval_all(items, env)?)),
            ExprKind::Dict { keys, values } => {
                let keys = self.eval_all(keys, env)?;
                let values = self.eval_all(values, env)?;
                Ok(Value::dict(keys.into_iter().zip(values).collect()))
            }
            ExprKind::ListComp {
                elt,
                target,
                iter,
                cond,
            } => {
                let items = self
                    .eval(iter, env)?
                    .iterate()
                    .map_err(|kind| kind.at(arena.get_expr(iter).span))?;
                let scope = env.child(ScopeKind::Comprehension);
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    self.assign(target, item, &scope)?;
                    if cond.is_valid() && !self.eval(cond, &scope)?.is_truthy() {
                        continue;
                    }
                    out.push(self.eval(elt, &scope)?);
                }
                Ok(Value::list(out))
            }

            ExprKind::Error => Err(EvalErrorKind::Internal {
                message: "evaluated a parse error placeholder",
            }
            .at(span)),
        }
    }

    fn eval_all(&mut self, items: ExprRange, env: &Environment) -> EvalResult<Vec<Value>> {
        let arena = self.arena;
        arena
            .get_expr_list(items)
            .iter()
            .map(|&item| self.eval(item, env))
            .collect()
    }

    fn eval_args(&mut self, args: CallArgRange, env: &Environment) -> EvalResult<Arguments> {
        let arena = self.arena;
        let mut positional = Vec::new();
        let mut keywords = Vec::new();
        for arg in arena.get_call_args(args) {
            let value = self.eval(arg.value, env)?;
            if arg.is_keyword() {
                keywords.push((arg.name, value));
            } else {
                positional.push(value);
            }
        }
        Ok((positional, keywords))
    }
}

/// `container[index]`.
pub(super) fn load_item(container: &Value, index: &Value) -> Result<Value, EvalErrorKind> {
    match container {
        Value::List(items) => {
            let items = items.borrow();
            let i = position(index, items.len(), container)?;
            Ok(items[i].clone())
        }
        Value::Tuple(items) => {
            let i = position(index, items.len(), container)?;
            Ok(items[i].clone())
        }
        Value::Str(text) => {
            let chars: Vec<char> = text.chars().collect();
            let i = position(index, chars.len(), container)?;
            Ok(Value::str(chars[i].encode_utf8(&mut [0; 4])))
        }
        Value::Dict(pairs) => pairs
            .borrow()
            .iter()
            .find(|(key, _)| key == index)
            .map(|(_, value)| value.clone())
            .ok_or_else(|| EvalErrorKind::KeyNotFound {
                key: index.to_string(),
            }),
        other => Err(EvalErrorKind::BadOperand {
            op: "[]",
            operand: other.type_name(),
        }),
    }
}

/// `container[index] = value`.
pub(super) fn store_item(
    container: &Value,
    index: Value,
    value: Value,
) -> Result<(), EvalErrorKind> {
    match container {
        Value::List(items) => {
            let mut items = items.borrow_mut();
            let i = position(&index, items.len(), container)?;
            items[i] = value;
            Ok(())
        }
        Value::Dict(pairs) => {
            let mut pairs = pairs.borrow_mut();
            match pairs.iter_mut().find(|(key, _)| *key == index) {
                Some(slot) => slot.1 = value,
                None => pairs.push((index, value)),
            }
            Ok(())
        }
        other => Err(EvalErrorKind::BadOperand {
            op: "[]=",
            operand: other.type_name(),
        }),
    }
}

/// A sequence index, negative counting from the end.
fn position(index: &Value, len: usize, container: &Value) -> Result<usize, EvalErrorKind> {
    let Some(raw) = index.as_int() else {
        return Err(EvalErrorKind::UnsupportedOperands {
            op: "[]",
            left: container.type_name(),
            right: index.type_name(),
        });
    };
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let resolved = if raw < 0 { raw + signed_len } else { raw };
    usize::try_from(resolved)
        .ok()
        .filter(|&i| i < len)
        .ok_or(EvalErrorKind::IndexOutOfRange { index: raw, len })
}
