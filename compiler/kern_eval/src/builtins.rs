//! Builtin functions.
//!
//! The kernel loop itself needs only `zip` and `enumerate`; the rest cover
//! what row functions and helpers commonly call. Sequences are produced
//! eagerly as lists.

use kern_ir::BinaryOp;

use crate::errors::EvalErrorKind;
use crate::operators::{compare, evaluate_binary};
use crate::Value;

type BuiltinResult = Result<Value, EvalErrorKind>;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Builtin {
    Abs,
    Bool,
    Enumerate,
    Float,
    Int,
    Len,
    List,
    Max,
    Min,
    Property,
    Range,
    Round,
    Str,
    Sum,
    Tuple,
    Zip,
}

impl Builtin {
    pub const ALL: [Builtin; 16] = [
        Builtin::Abs,
        Builtin::Bool,
        Builtin::Enumerate,
        Builtin::Float,
        Builtin::Int,
        Builtin::Len,
        Builtin::List,
        Builtin::Max,
        Builtin::Min,
        Builtin::Property,
        Builtin::Range,
        Builtin::Round,
        Builtin::Str,
        Builtin::Sum,
        Builtin::Tuple,
        Builtin::Zip,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Abs => "abs",
            Builtin::Bool => "bool",
            Builtin::Enumerate => "enumerate",
            Builtin::Float => "float",
            Builtin::Int => "int",
            Builtin::Len => "len",
            Builtin::List => "list",
            Builtin::Max => "max",
            Builtin::Min => "min",
            Builtin::Property => "property",
            Builtin::Range => "range",
            Builtin::Round => "round",
            Builtin::Str => "str",
            Builtin::Sum => "sum",
            Builtin::Tuple => "tuple",
            Builtin::Zip => "zip",
        }
    }

    /// Call with positional arguments only.
    pub fn call(self, args: Vec<Value>) -> BuiltinResult {
        match self {
            Builtin::Abs => {
                let [x] = self.exact(args)?;
                abs(&x)
            }
            Builtin::Bool => {
                self.arity(&args, 0, 1)?;
                Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
            }
            Builtin::Enumerate => enumerate(self.arity(&args, 1, 2)?, &args),
            Builtin::Float => {
                self.arity(&args, 0, 1)?;
                args.first().map_or(Ok(Value::Float(0.0)), to_float)
            }
            Builtin::Int => {
                self.arity(&args, 0, 1)?;
                args.first().map_or(Ok(Value::Int(0)), to_int)
            }
            Builtin::Len => {
                let [x] = self.exact(args)?;
                len(&x)
            }
            Builtin::List => {
                self.arity(&args, 0, 1)?;
                let items = args.first().map_or(Ok(Vec::new()), Value::iterate)?;
                Ok(Value::list(items))
            }
            Builtin::Tuple => {
                self.arity(&args, 0, 1)?;
                let items = args.first().map_or(Ok(Vec::new()), Value::iterate)?;
                Ok(Value::tuple(items))
            }
            Builtin::Max => self.extremum(args, std::cmp::Ordering::Greater),
            Builtin::Min => self.extremum(args, std::cmp::Ordering::Less),
            Builtin::Property => match self.exact(args)? {
                [Value::Function(function)] => Ok(Value::Property(function)),
                _ => Err(EvalErrorKind::InvalidArgument {
                    function: "property",
                    message: "expects a function",
                }),
            },
            Builtin::Range => range(self.arity(&args, 1, 3)?, &args),
            Builtin::Round => {
                let [x] = self.exact(args)?;
                round(&x)
            }
            Builtin::Str => {
                self.arity(&args, 0, 1)?;
                Ok(Value::str(&args.first().map(Value::to_str).unwrap_or_default()))
            }
            Builtin::Sum => {
                self.arity(&args, 1, 2)?;
                let start = args.get(1).cloned().unwrap_or(Value::Int(0));
                args[0].iterate()?.iter().try_fold(start, |total, item| {
                    evaluate_binary(BinaryOp::Add, &total, item)
                })
            }
            Builtin::Zip => zip(&args),
        }
    }

    /// Check `min <= args.len() <= max`; returns the count.
    fn arity(self, args: &[Value], min: usize, max: usize) -> Result<usize, EvalErrorKind> {
        if (min..=max).contains(&args.len()) {
            return Ok(args.len());
        }
        let expected = if min == max {
            min.to_string()
        } else {
            format!("{min} to {max}")
        };
        Err(EvalErrorKind::ArityMismatch {
            function: self.name().to_owned(),
            expected,
            got: args.len(),
        })
    }

    fn exact<const N: usize>(self, args: Vec<Value>) -> Result<[Value; N], EvalErrorKind> {
        self.arity(&args, N, N)?;
        args.try_into().map_err(|_| EvalErrorKind::Internal {
            message: "argument count changed after arity check",
        })
    }

    /// `max`/`min` over the arguments, or over a single iterable argument.
    /// The first of equal candidates wins.
    fn extremum(self, args: Vec<Value>, keep: std::cmp::Ordering) -> BuiltinResult {
        let candidates = match args.as_slice() {
            [] => {
                return Err(EvalErrorKind::ArityMismatch {
                    function: self.name().to_owned(),
                    expected: "at least 1".to_owned(),
                    got: 0,
                })
            }
            [single] => single.iterate()?,
            _ => args,
        };
        let mut iter = candidates.into_iter();
        let Some(mut best) = iter.next() else {
            return Err(EvalErrorKind::InvalidArgument {
                function: self.name(),
                message: "arg is an empty sequence",
            });
        };
        for candidate in iter {
            let ordering =
                compare(&candidate, &best).ok_or_else(|| EvalErrorKind::UnsupportedOperands {
                    op: "<",
                    left: candidate.type_name(),
                    right: best.type_name(),
                })?;
            if ordering == keep {
                best = candidate;
            }
        }
        Ok(best)
    }
}

fn abs(x: &Value) -> BuiltinResult {
    match x {
        Value::Float(f) => Ok(Value::Float(f.abs())),
        v => {
            let n = v.as_int().ok_or(EvalErrorKind::BadOperand {
                op: "abs()",
                operand: v.type_name(),
            })?;
            n.checked_abs()
                .map(Value::Int)
                .ok_or(EvalErrorKind::IntegerOverflow { op: "abs()" })
        }
    }
}

fn enumerate(count: usize, args: &[Value]) -> BuiltinResult {
    let mut index = if count == 2 {
        args[1].as_int().ok_or(EvalErrorKind::InvalidArgument {
            function: "enumerate",
            message: "start must be an integer",
        })?
    } else {
        0
    };
    let mut out = Vec::new();
    for item in args[0].iterate()? {
        out.push(Value::tuple(vec![Value::Int(index), item]));
        index = index
            .checked_add(1)
            .ok_or(EvalErrorKind::IntegerOverflow { op: "enumerate()" })?;
    }
    Ok(Value::list(out))
}

/// Columns are paired positionally and truncated to the shortest.
fn zip(args: &[Value]) -> BuiltinResult {
    let columns = args
        .iter()
        .map(Value::iterate)
        .collect::<Result<Vec<_>, _>>()?;
    let rows = columns.iter().map(Vec::len).min().unwrap_or(0);
    let out = (0..rows)
        .map(|row| Value::tuple(columns.iter().map(|column| column[row].clone()).collect()))
        .collect();
    Ok(Value::list(out))
}

fn range(count: usize, args: &[Value]) -> BuiltinResult {
    let ints = args
        .iter()
        .map(|arg| {
            arg.as_int().ok_or(EvalErrorKind::InvalidArgument {
                function: "range",
                message: "arguments must be integers",
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match (count, ints.as_slice()) {
        (1, &[stop]) => (0, stop, 1),
        (2, &[start, stop]) => (start, stop, 1),
        (_, &[start, stop, step]) => (start, stop, step),
        _ => {
            return Err(EvalErrorKind::Internal {
                message: "range arguments do not match their count",
            })
        }
    };
    if step == 0 {
        return Err(EvalErrorKind::InvalidArgument {
            function: "range",
            message: "step must not be zero",
        });
    }
    let mut out = Vec::new();
    let mut i = start;
    while (step > 0 && i < stop) || (step < 0 && i > stop) {
        out.push(Value::Int(i));
        match i.checked_add(step) {
            Some(next) => i = next,
            None => break,
        }
    }
    Ok(Value::list(out))
}

fn len(x: &Value) -> BuiltinResult {
    let n = match x {
        Value::Str(s) => s.chars().count(),
        Value::List(items) => items.borrow().len(),
        Value::Tuple(items) => items.len(),
        Value::Dict(pairs) => pairs.borrow().len(),
        other => {
            return Err(EvalErrorKind::BadOperand {
                op: "len()",
                operand: other.type_name(),
            })
        }
    };
    i64::try_from(n)
        .map(Value::Int)
        .map_err(|_| EvalErrorKind::IntegerOverflow { op: "len()" })
}

fn to_float(x: &Value) -> BuiltinResult {
    match x {
        Value::Str(s) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalErrorKind::InvalidLiteral {
                target: "float",
                text: s.to_string(),
            }),
        v => v
            .as_number()
            .map(Value::Float)
            .ok_or(EvalErrorKind::BadOperand {
                op: "float()",
                operand: v.type_name(),
            }),
    }
}

fn to_int(x: &Value) -> BuiltinResult {
    match x {
        Value::Str(s) => s
            .trim()
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| EvalErrorKind::InvalidLiteral {
                target: "int",
                text: s.to_string(),
            }),
        Value::Float(f) => float_to_int(f.trunc(), "int"),
        v => v.as_int().map(Value::Int).ok_or(EvalErrorKind::BadOperand {
            op: "int()",
            operand: v.type_name(),
        }),
    }
}

fn round(x: &Value) -> BuiltinResult {
    match x {
        Value::Float(f) => float_to_int(f.round_ties_even(), "round"),
        v => v.as_int().map(Value::Int).ok_or(EvalErrorKind::BadOperand {
            op: "round()",
            operand: v.type_name(),
        }),
    }
}

/// An integral float as `int`, rejecting values outside `i64`.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    reason = "range is checked before the cast"
)]
fn float_to_int(f: f64, target: &'static str) -> BuiltinResult {
    if !f.is_finite() || f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(EvalErrorKind::InvalidLiteral {
            target,
            text: Value::Float(f).to_string(),
        });
    }
    Ok(Value::Int(f as i64))
}
