//! The `kernel` command: print the kernel built from a description file.

use kern_ir::StringInterner;
use kern_transform::{transform_source, KernelConfig, TransformError};

use super::{option_error, read_file, report, required_path};
use crate::options::Options;

/// Build the kernel `config` describes and print it as source text.
pub fn kernel_source(source: &str, config: &KernelConfig) -> Result<String, TransformError> {
    let interner = StringInterner::new();
    let kernel = transform_source(source, config, &interner)?;
    Ok(kern_fmt::format_module(&kernel.module, &kernel.arena, &interner))
}

pub fn kernel_file(options: &Options) {
    let path = required_path("kernel", options);
    let config = options
        .kernel_config()
        .unwrap_or_else(|err| option_error("kernel", &err));
    let source = read_file(path);

    match kernel_source(&source, &config) {
        Ok(text) => print!("{text}"),
        Err(err) => {
            report(path, &source, options.color, &err.to_diagnostics());
            std::process::exit(1);
        }
    }
}
