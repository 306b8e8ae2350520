//! Kern reference evaluator.
//!
//! A tree-walking interpreter for the description language, used to check
//! a synthesized kernel against the method it came from:
//! - [`run_kernel`] executes a kernel over column sequences and returns the
//!   filled output columns
//! - [`call_method`] invokes a method on a fresh instance of a class, the
//!   per-row reference result
//!
//! Both report [`CallStats`] so callers can count helper invocations and
//! per-position writes.
//!
//! The interpreter runs whole description files: imports bind opaque
//! module values, `@property` is honoured, `if __name__ == "__main__":`
//! blocks are skipped.

mod builtins;
mod environment;
mod errors;
mod interpreter;
mod operators;
mod stats;
mod value;

use kern_ir::{ExprArena, Module, Span, StringInterner};

pub use builtins::Builtin;
pub use environment::{Environment, ScopeKind};
pub use errors::{EvalError, EvalErrorKind, EvalResult};
pub use interpreter::Interpreter;
pub use operators::{compare, evaluate_binary, evaluate_unary};
pub use stats::CallStats;
pub use value::{BoundMethod, ClassValue, FunctionValue, Instance, Value};

/// Output columns and counters of one kernel run.
#[derive(Debug)]
pub struct KernelRun {
    pub outputs: Vec<Vec<Value>>,
    pub stats: CallStats,
}

/// Load `module`, then call the function `kernel` with `inputs` followed by
/// `outputs` freshly allocated output columns of the input length.
///
/// Output slots start as `None`; a slot the kernel never writes stays
/// `None`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(kernel = kernel, rows = inputs.first().map_or(0, Vec::len), outputs = outputs)
)]
pub fn run_kernel(
    arena: &ExprArena,
    module: &Module,
    kernel: &str,
    inputs: Vec<Vec<Value>>,
    outputs: usize,
    interner: &StringInterner,
) -> Result<KernelRun, EvalError> {
    let rows = inputs.first().map_or(0, Vec::len);
    if let Some((column, values)) = inputs
        .iter()
        .enumerate()
        .find(|(_, values)| values.len() != rows)
    {
        return Err(EvalErrorKind::ColumnLengthMismatch {
            column,
            expected: rows,
            got: values.len(),
        }
        .at(Span::DUMMY));
    }

    let mut interpreter = Interpreter::new(arena, interner);
    interpreter.load_module(module)?;
    let function = interpreter.global(kernel).ok_or_else(|| {
        EvalErrorKind::UndefinedName {
            name: kernel.to_owned(),
        }
        .at(Span::DUMMY)
    })?;

    let columns: Vec<Value> = (0..outputs)
        .map(|_| Value::list(vec![Value::None; rows]))
        .collect();
    let mut args: Vec<Value> = inputs.into_iter().map(Value::list).collect();
    args.extend(columns.iter().cloned());
    interpreter.call(&function, args)?;

    let outputs = columns
        .iter()
        .map(|column| match column {
            Value::List(items) => items.borrow().clone(),
            _ => Vec::new(),
        })
        .collect();
    tracing::debug!(calls = interpreter.stats().total_calls(), "kernel finished");
    Ok(KernelRun {
        outputs,
        stats: interpreter.take_stats(),
    })
}

/// Load `module`, instantiate `class` without arguments and call its
/// `method` with `args`.
#[tracing::instrument(level = "debug", skip(arena, module, args, interner))]
pub fn call_method(
    arena: &ExprArena,
    module: &Module,
    class: &str,
    method: &str,
    args: Vec<Value>,
    interner: &StringInterner,
) -> Result<Value, EvalError> {
    let mut interpreter = Interpreter::new(arena, interner);
    interpreter.load_module(module)?;
    let class_value = interpreter.global(class).ok_or_else(|| {
        EvalErrorKind::UndefinedName {
            name: class.to_owned(),
        }
        .at(Span::DUMMY)
    })?;
    let instance = interpreter.call(&class_value, Vec::new())?;
    let bound = interpreter.attribute(&instance, method)?;
    interpreter.call(&bound, args)
}
