//! Binary and unary operators on values.
//!
//! `and`/`or` short-circuit and are handled by the interpreter; everything
//! else is a pure function of the operand values.
//!
//! Integer arithmetic is checked: overflow is an error, not a wrap. `/`
//! always produces a float, `//` and `%` round toward negative infinity.

use std::cmp::Ordering;

use kern_ir::{BinaryOp, UnaryOp};

use crate::errors::EvalErrorKind;
use crate::Value;

type OpResult = Result<Value, EvalErrorKind>;

pub fn evaluate_binary(op: BinaryOp, left: &Value, right: &Value) -> OpResult {
    match op {
        BinaryOp::Add => add(left, right),
        BinaryOp::Sub => arithmetic(op, left, right, i64::checked_sub, |a, b| a - b),
        BinaryOp::Mul => mul(left, right),
        BinaryOp::Div => div(left, right),
        BinaryOp::FloorDiv => floor_div(left, right),
        BinaryOp::Mod => modulo(left, right),
        BinaryOp::Pow => pow(left, right),
        BinaryOp::Eq => Ok(Value::Bool(left == right)),
        BinaryOp::NotEq => Ok(Value::Bool(left != right)),
        BinaryOp::Lt | BinaryOp::LtEq | BinaryOp::Gt | BinaryOp::GtEq => {
            let ordering = compare(left, right).ok_or_else(|| mismatch(op, left, right))?;
            Ok(Value::Bool(match op {
                BinaryOp::Lt => ordering == Ordering::Less,
                BinaryOp::LtEq => ordering != Ordering::Greater,
                BinaryOp::Gt => ordering == Ordering::Greater,
                _ => ordering != Ordering::Less,
            }))
        }
        BinaryOp::In => contains(right, left).map(Value::Bool),
        BinaryOp::NotIn => contains(right, left).map(|found| Value::Bool(!found)),
        BinaryOp::Is => Ok(Value::Bool(left.is_same(right))),
        BinaryOp::IsNot => Ok(Value::Bool(!left.is_same(right))),
        BinaryOp::And | BinaryOp::Or => Err(EvalErrorKind::Internal {
            message: "short-circuit operator reached the value operator table",
        }),
    }
}

pub fn evaluate_unary(op: UnaryOp, operand: &Value) -> OpResult {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!operand.is_truthy())),
        UnaryOp::Pos => match operand {
            Value::Float(x) => Ok(Value::Float(*x)),
            v => v.as_int().map(Value::Int).ok_or_else(|| bad_operand(op, v)),
        },
        UnaryOp::Neg => match operand {
            Value::Float(x) => Ok(Value::Float(-x)),
            v => {
                let n = v.as_int().ok_or_else(|| bad_operand(op, v))?;
                n.checked_neg()
                    .map(Value::Int)
                    .ok_or(EvalErrorKind::IntegerOverflow { op: "-" })
            }
        },
    }
}

/// Ordering for `<` and friends; `None` when the operands don't compare.
pub fn compare(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Some(a.cmp(b)),
        (Value::List(a), Value::List(b)) => compare_sequences(&a.borrow(), &b.borrow()),
        (Value::Tuple(a), Value::Tuple(b)) => compare_sequences(a, b),
        _ => match (left.as_int(), right.as_int()) {
            (Some(a), Some(b)) => Some(a.cmp(&b)),
            _ => left.as_number()?.partial_cmp(&right.as_number()?),
        },
    }
}

fn compare_sequences(a: &[Value], b: &[Value]) -> Option<Ordering> {
    for (x, y) in a.iter().zip(b) {
        if x != y {
            return compare(x, y);
        }
    }
    Some(a.len().cmp(&b.len()))
}

/// `item in container`.
pub fn contains(container: &Value, item: &Value) -> Result<bool, EvalErrorKind> {
    match container {
        Value::List(items) => Ok(items.borrow().contains(item)),
        Value::Tuple(items) => Ok(items.contains(item)),
        Value::Dict(pairs) => Ok(pairs.borrow().iter().any(|(key, _)| key == item)),
        Value::Str(haystack) => match item {
            Value::Str(needle) => Ok(haystack.contains(&**needle)),
            other => Err(EvalErrorKind::UnsupportedOperands {
                op: "in",
                left: other.type_name(),
                right: "str",
            }),
        },
        other => Err(EvalErrorKind::NotIterable {
            type_name: other.type_name(),
        }),
    }
}

fn add(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::str(&format!("{a}{b}"))),
        (Value::List(a), Value::List(b)) => {
            let mut items = a.borrow().clone();
            items.extend(b.borrow().iter().cloned());
            Ok(Value::list(items))
        }
        (Value::Tuple(a), Value::Tuple(b)) => {
            Ok(Value::tuple(a.iter().chain(b.iter()).cloned().collect()))
        }
        _ => arithmetic(BinaryOp::Add, left, right, i64::checked_add, |a, b| a + b),
    }
}

fn mul(left: &Value, right: &Value) -> OpResult {
    match (left, right) {
        (Value::Str(s), n) | (n, Value::Str(s)) if n.as_int().is_some() => {
            let count = repeat_count(n);
            Ok(Value::str(&s.repeat(count)))
        }
        (Value::List(items), n) | (n, Value::List(items)) if n.as_int().is_some() => {
            let count = repeat_count(n);
            let items = items.borrow();
            let mut out = Vec::with_capacity(items.len() * count);
            for _ in 0..count {
                out.extend(items.iter().cloned());
            }
            Ok(Value::list(out))
        }
        _ => arithmetic(BinaryOp::Mul, left, right, i64::checked_mul, |a, b| a * b),
    }
}

/// Negative repeat counts produce an empty sequence.
fn repeat_count(n: &Value) -> usize {
    n.as_int()
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0)
}

fn div(left: &Value, right: &Value) -> OpResult {
    let (a, b) = numbers(BinaryOp::Div, left, right)?;
    if b == 0.0 {
        return Err(EvalErrorKind::DivisionByZero);
    }
    Ok(Value::Float(a / b))
}

fn floor_div(left: &Value, right: &Value) -> OpResult {
    if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
        if b == 0 {
            return Err(EvalErrorKind::DivisionByZero);
        }
        let q = a
            .checked_div(b)
            .ok_or(EvalErrorKind::IntegerOverflow { op: "//" })?;
        let adjust = a % b != 0 && ((a < 0) != (b < 0));
        return Ok(Value::Int(if adjust { q - 1 } else { q }));
    }
    let (a, b) = numbers(BinaryOp::FloorDiv, left, right)?;
    if b == 0.0 {
        return Err(EvalErrorKind::DivisionByZero);
    }
    Ok(Value::Float((a / b).floor()))
}

fn modulo(left: &Value, right: &Value) -> OpResult {
    if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
        if b == 0 {
            return Err(EvalErrorKind::DivisionByZero);
        }
        let r = a
            .checked_rem(b)
            .ok_or(EvalErrorKind::IntegerOverflow { op: "%" })?;
        let adjust = r != 0 && ((r < 0) != (b < 0));
        return Ok(Value::Int(if adjust { r + b } else { r }));
    }
    let (a, b) = numbers(BinaryOp::Mod, left, right)?;
    if b == 0.0 {
        return Err(EvalErrorKind::DivisionByZero);
    }
    let r = a % b;
    let adjust = r != 0.0 && ((r < 0.0) != (b < 0.0));
    Ok(Value::Float(if adjust { r + b } else { r }))
}

fn pow(left: &Value, right: &Value) -> OpResult {
    if let (Some(base), Some(exp)) = (left.as_int(), right.as_int()) {
        if let Ok(exp) = u32::try_from(exp) {
            return base
                .checked_pow(exp)
                .map(Value::Int)
                .ok_or(EvalErrorKind::IntegerOverflow { op: "**" });
        }
    }
    let (a, b) = numbers(BinaryOp::Pow, left, right)?;
    if a == 0.0 && b < 0.0 {
        return Err(EvalErrorKind::DivisionByZero);
    }
    Ok(Value::Float(a.powf(b)))
}

/// Checked integer op when both sides are integral, float op otherwise.
fn arithmetic(
    op: BinaryOp,
    left: &Value,
    right: &Value,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
) -> OpResult {
    if let (Some(a), Some(b)) = (left.as_int(), right.as_int()) {
        return int_op(a, b)
            .map(Value::Int)
            .ok_or(EvalErrorKind::IntegerOverflow {
                op: op.as_symbol(),
            });
    }
    let (a, b) = numbers(op, left, right)?;
    Ok(Value::Float(float_op(a, b)))
}

fn numbers(op: BinaryOp, left: &Value, right: &Value) -> Result<(f64, f64), EvalErrorKind> {
    match (left.as_number(), right.as_number()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(mismatch(op, left, right)),
    }
}

#[cold]
fn mismatch(op: BinaryOp, left: &Value, right: &Value) -> EvalErrorKind {
    EvalErrorKind::UnsupportedOperands {
        op: op.as_symbol(),
        left: left.type_name(),
        right: right.type_name(),
    }
}

#[cold]
fn bad_operand(op: UnaryOp, operand: &Value) -> EvalErrorKind {
    EvalErrorKind::BadOperand {
        op: op.as_symbol(),
        operand: operand.type_name(),
    }
}
