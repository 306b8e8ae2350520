//! The `run` command: build the kernel and execute it with the reference
//! evaluator over columns given on the command line.

use std::fmt;

use kern_diagnostic::{Diagnostic, ErrorCode};
use kern_eval::{EvalError, Value};
use kern_ir::StringInterner;
use kern_transform::{transform_source, KernelConfig, TransformError};
use thiserror::Error;

use super::{option_error, read_file, report, required_path};
use crate::options::{OptionError, Options};

#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum RunError {
    #[error(transparent)]
    Transform(#[from] TransformError),
    #[error(transparent)]
    Eval(#[from] EvalError),
    #[error("kernel takes {expected} input column(s) but {got} were given")]
    ColumnCount { expected: usize, got: usize },
}

impl RunError {
    pub fn to_diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            RunError::Transform(err) => err.to_diagnostics(),
            RunError::Eval(err) => vec![err.to_diagnostic()],
            RunError::ColumnCount { .. } => vec![Diagnostic::error(ErrorCode::E3003)
                .with_message(self.to_string())
                .with_suggestion("pass one `--column=` per input column")],
        }
    }
}

/// Filled output columns and call counts of one run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunReport {
    pub outputs: Vec<(String, Vec<Value>)>,
    /// Calls per nested function: helpers first, then the row function.
    pub calls: Vec<(String, usize)>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, values) in &self.outputs {
            let items: Vec<String> = values.iter().map(ToString::to_string).collect();
            writeln!(f, "{name} = [{}]", items.join(", "))?;
        }
        let calls: Vec<String> = self
            .calls
            .iter()
            .map(|(name, count)| format!("{name}={count}"))
            .collect();
        writeln!(f, "calls: {}", calls.join(", "))
    }
}

/// `1, 2.5, -3` as a column of numbers. An empty string is an empty column.
pub fn parse_column(text: &str) -> Result<Vec<Value>, OptionError> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(|item| {
            let item = item.trim();
            item.parse::<i64>()
                .map(Value::Int)
                .or_else(|_| item.parse::<f64>().map(Value::Float))
                .map_err(|_| OptionError::InvalidValue {
                    option: "column",
                    value: item.to_owned(),
                })
        })
        .collect()
}

/// Build the kernel and run it over `columns`.
pub fn run_source(
    source: &str,
    config: &KernelConfig,
    columns: Vec<Vec<Value>>,
) -> Result<RunReport, RunError> {
    let interner = StringInterner::new();
    let kernel = transform_source(source, config, &interner)?;
    if columns.len() != kernel.inputs.len() {
        return Err(RunError::ColumnCount {
            expected: kernel.inputs.len(),
            got: columns.len(),
        });
    }

    tracing::debug!(
        kernel = interner.lookup(kernel.name),
        rows = columns.first().map_or(0, Vec::len),
        "running kernel"
    );
    let run = kern_eval::run_kernel(
        &kernel.arena,
        &kernel.module,
        interner.lookup(kernel.name),
        columns,
        kernel.outputs.len(),
        &interner,
    )?;

    let outputs = kernel
        .outputs
        .iter()
        .map(|&name| interner.lookup(name).to_owned())
        .zip(run.outputs)
        .collect();
    let calls = kernel
        .helpers
        .iter()
        .chain([&kernel.row_function])
        .map(|&name| (interner.lookup(name).to_owned(), run.stats.calls(name)))
        .collect();
    Ok(RunReport { outputs, calls })
}

pub fn run_file(options: &Options) {
    let path = required_path("run", options);
    let config = options
        .kernel_config()
        .unwrap_or_else(|err| option_error("run", &err));
    let columns = options
        .columns
        .iter()
        .map(|text| parse_column(text))
        .collect::<Result<Vec<_>, _>>()
        .unwrap_or_else(|err| option_error("run", &err));
    let source = read_file(path);

    match run_source(&source, &config, columns) {
        Ok(summary) => print!("{summary}"),
        Err(err) => {
            report(path, &source, options.color, &err.to_diagnostics());
            std::process::exit(1);
        }
    }
}
