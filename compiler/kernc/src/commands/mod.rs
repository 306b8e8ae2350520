//! Command handlers for the `kern` CLI.
//!
//! Each submodule implements one command. The `*_source` functions do the
//! work on in-memory text and return a result; the `*_file` wrappers read
//! the file, print, render diagnostics and exit.

mod check;
mod debug;
mod kernel;
mod run;

use kern_diagnostic::emitter::{ColorMode, DiagnosticEmitter, TerminalEmitter};
use kern_diagnostic::Diagnostic;

use crate::options::{OptionError, Options};

pub use check::{check_file, check_source};
pub use debug::{describe_source, parse_file};
pub use kernel::{kernel_file, kernel_source};
pub use run::{parse_column, run_file, run_source, RunError, RunReport};

/// Read a file from disk, exiting with a user-friendly error message on failure.
pub(crate) fn read_file(path: &str) -> String {
    match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            let msg = match e.kind() {
                std::io::ErrorKind::NotFound => format!("cannot find file '{path}'"),
                std::io::ErrorKind::PermissionDenied => {
                    format!("permission denied reading '{path}'")
                }
                std::io::ErrorKind::InvalidData => {
                    format!("'{path}' contains invalid UTF-8 data")
                }
                _ => format!("error reading '{path}': {e}"),
            };
            eprintln!("{msg}");
            std::process::exit(1);
        }
    }
}

/// Render `diagnostics` against `source` on stderr.
pub(crate) fn report(path: &str, source: &str, color: ColorMode, diagnostics: &[Diagnostic]) {
    let is_tty = std::io::IsTerminal::is_terminal(&std::io::stderr());
    let mut emitter = TerminalEmitter::with_color_mode(std::io::stderr(), color, is_tty)
        .with_source(path, source);
    emitter.emit_all(diagnostics);
    let errors = diagnostics.iter().filter(|diag| diag.is_error()).count();
    emitter.emit_summary(errors, diagnostics.len() - errors);
    emitter.flush();
}

/// Exit with a usage error.
pub(crate) fn option_error(command: &str, err: &OptionError) -> ! {
    eprintln!("error: {err}");
    eprintln!("Usage: kern {command} <file> --unit=<class> --row=<method> [options]");
    std::process::exit(1);
}

/// The file path, or a usage error.
pub(crate) fn required_path<'o>(command: &str, options: &'o Options) -> &'o str {
    options
        .path()
        .unwrap_or_else(|err| option_error(command, &err))
}
