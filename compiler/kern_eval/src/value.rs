//! Runtime values.
//!
//! Scalars are stored inline; lists and dicts are shared and mutable, so a
//! column passed into the kernel and written through `out[i] = y` is the
//! same list the caller reads back afterwards.
//!
//! Equality follows the description language: `1 == 1.0`, lists compare
//! element-wise, functions and instances compare by identity.

use rustc_hash::FxHashMap;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use kern_ir::{FunctionId, Name};

use crate::builtins::Builtin;
use crate::environment::Environment;
use crate::errors::EvalErrorKind;

/// A value produced by evaluation.
#[derive(Clone)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(Rc<RefCell<Vec<Value>>>),
    Tuple(Rc<[Value]>),
    /// Insertion-ordered pairs; keys are unique under `==`.
    Dict(Rc<RefCell<Vec<(Value, Value)>>>),
    Function(Rc<FunctionValue>),
    Builtin(Builtin),
    Class(Rc<ClassValue>),
    Instance(Rc<Instance>),
    BoundMethod(Rc<BoundMethod>),
    /// A function decorated with `@property`.
    Property(Rc<FunctionValue>),
    /// An imported module. Only its binding exists.
    Module(&'static str),
}

/// A user-defined function and the scope it closes over.
pub struct FunctionValue {
    pub name: Name,
    pub label: &'static str,
    pub def: FunctionId,
    /// Default per parameter, evaluated when the `def` ran.
    pub defaults: Vec<Option<Value>>,
    pub closure: Environment,
}

pub struct ClassValue {
    pub name: Name,
    pub label: &'static str,
    pub attrs: FxHashMap<Name, Value>,
}

pub struct Instance {
    pub class: Rc<ClassValue>,
    pub fields: RefCell<FxHashMap<Name, Value>>,
}

/// A function bound to the instance it was read from.
pub struct BoundMethod {
    pub receiver: Value,
    pub function: Rc<FunctionValue>,
}

impl Value {
    pub fn str(text: &str) -> Self {
        Value::Str(Rc::from(text))
    }

    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Rc::new(RefCell::new(items)))
    }

    pub fn tuple(items: Vec<Value>) -> Self {
        Value::Tuple(Rc::from(items))
    }

    pub fn dict(pairs: Vec<(Value, Value)>) -> Self {
        let mut unique: Vec<(Value, Value)> = Vec::with_capacity(pairs.len());
        for (key, value) in pairs {
            match unique.iter_mut().find(|(k, _)| *k == key) {
                Some(slot) => slot.1 = value,
                None => unique.push((key, value)),
            }
        }
        Value::Dict(Rc::new(RefCell::new(unique)))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::None => "NoneType",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::Tuple(_) => "tuple",
            Value::Dict(_) => "dict",
            Value::Function(_) => "function",
            Value::Builtin(_) => "builtin_function",
            Value::Class(_) => "type",
            Value::Instance(instance) => instance.class.label,
            Value::BoundMethod(_) => "method",
            Value::Property(_) => "property",
            Value::Module(_) => "module",
        }
    }

    pub fn is_truthy(&self) -> bool {
        match self {
            Value::None => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Float(f) => *f != 0.0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.borrow().is_empty(),
            Value::Tuple(items) => !items.is_empty(),
            Value::Dict(pairs) => !pairs.borrow().is_empty(),
            _ => true,
        }
    }

    /// The elements a `for` loop visits, snapshotted.
    pub fn iterate(&self) -> Result<Vec<Value>, EvalErrorKind> {
        match self {
            Value::List(items) => Ok(items.borrow().clone()),
            Value::Tuple(items) => Ok(items.to_vec()),
            Value::Str(s) => Ok(s
                .chars()
                .map(|c| Value::str(c.encode_utf8(&mut [0; 4])))
                .collect()),
            Value::Dict(pairs) => Ok(pairs.borrow().iter().map(|(k, _)| k.clone()).collect()),
            _ => Err(EvalErrorKind::NotIterable {
                type_name: self.type_name(),
            }),
        }
    }

    /// Integer view of `int` and `bool`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            Value::Bool(b) => Some(i64::from(*b)),
            _ => None,
        }
    }

    /// Text for `str(x)`: strings are not quoted.
    pub fn to_str(&self) -> String {
        match self {
            Value::Str(s) => s.to_string(),
            other => other.to_string(),
        }
    }

    /// Identity comparison for `is`.
    pub fn is_same(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Dict(a), Value::Dict(b)) => Rc::ptr_eq(a, b),
            (Value::Tuple(a), Value::Tuple(b)) => Rc::ptr_eq(a, b),
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (
                Value::Function(_)
                | Value::Builtin(_)
                | Value::Class(_)
                | Value::Instance(_)
                | Value::BoundMethod(_)
                | Value::Property(_)
                | Value::Module(_),
                _,
            ) => self == other,
            _ => false,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::None, Value::None) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Tuple(a), Value::Tuple(b)) => a == b,
            (Value::Dict(a), Value::Dict(b)) => {
                let (a, b) = (a.borrow(), b.borrow());
                a.len() == b.len()
                    && a.iter()
                        .all(|(key, value)| b.iter().any(|(k, v)| k == key && v == value))
            }
            (Value::Function(a), Value::Function(b)) | (Value::Property(a), Value::Property(b)) => {
                Rc::ptr_eq(a, b)
            }
            (Value::Builtin(a), Value::Builtin(b)) => a == b,
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            (Value::BoundMethod(a), Value::BoundMethod(b)) => {
                Rc::ptr_eq(&a.function, &b.function) && a.receiver.is_same(&b.receiver)
            }
            (Value::Module(a), Value::Module(b)) => a == b,
            (Value::Float(a), _) => other.as_number().is_some_and(|b| *a == b),
            (_, Value::Float(b)) => self.as_number().is_some_and(|a| a == *b),
            (a, b) => match (a.as_int(), b.as_int()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Value {
    /// Float view of any number.
    #[expect(
        clippy::cast_precision_loss,
        reason = "mixed int/float arithmetic converts like the description language"
    )]
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            other => other.as_int().map(|n| n as f64),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::None => f.write_str("None"),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) => fmt_float(*x, f),
            Value::Str(s) => write!(f, "'{}'", s.escape_default()),
            Value::List(items) => {
                f.write_str("[")?;
                fmt_items(&items.borrow(), f)?;
                f.write_str("]")
            }
            Value::Tuple(items) => {
                f.write_str("(")?;
                fmt_items(items, f)?;
                if items.len() == 1 {
                    f.write_str(",")?;
                }
                f.write_str(")")
            }
            Value::Dict(pairs) => {
                f.write_str("{")?;
                for (i, (key, value)) in pairs.borrow().iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                f.write_str("}")
            }
            Value::Function(func) => write!(f, "<function {}>", func.label),
            Value::Builtin(builtin) => write!(f, "<built-in function {}>", builtin.name()),
            Value::Class(class) => write!(f, "<class '{}'>", class.label),
            Value::Instance(instance) => write!(f, "<{} object>", instance.class.label),
            Value::BoundMethod(method) => write!(
                f,
                "<bound method {} of {}>",
                method.function.label, method.receiver
            ),
            Value::Property(func) => write!(f, "<property {}>", func.label),
            Value::Module(name) => write!(f, "<module '{name}'>"),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn fmt_items(items: &[Value], f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn fmt_float(x: f64, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if x.is_nan() {
        f.write_str("nan")
    } else if x.is_infinite() {
        f.write_str(if x < 0.0 { "-inf" } else { "inf" })
    } else if x.fract() == 0.0 && x.abs() < 1e16 {
        write!(f, "{x:.1}")
    } else {
        write!(f, "{x}")
    }
}
