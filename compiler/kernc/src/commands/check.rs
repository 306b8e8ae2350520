//! The `check` command: run the transformation and report, without
//! printing the kernel.

use kern_ir::StringInterner;
use kern_transform::{transform_source, KernelConfig, TransformError};

use super::{option_error, read_file, report, required_path};
use crate::options::Options;

/// One-line summary of the kernel `config` would produce.
pub fn check_source(source: &str, config: &KernelConfig) -> Result<String, TransformError> {
    let interner = StringInterner::new();
    let kernel = transform_source(source, config, &interner)?;
    let helpers: Vec<&str> = kernel
        .helpers
        .iter()
        .map(|&name| interner.lookup(name))
        .collect();
    Ok(format!(
        "kernel `{}` ({} inputs, {} outputs, helpers: [{}])",
        interner.lookup(kernel.name),
        kernel.inputs.len(),
        kernel.outputs.len(),
        helpers.join(", ")
    ))
}

pub fn check_file(options: &Options) {
    let path = required_path("check", options);
    let config = options
        .kernel_config()
        .unwrap_or_else(|err| option_error("check", &err));
    let source = read_file(path);

    match check_source(&source, &config) {
        Ok(summary) => println!("OK: {path}: {summary}"),
        Err(err) => {
            report(path, &source, options.color, &err.to_diagnostics());
            std::process::exit(1);
        }
    }
}
