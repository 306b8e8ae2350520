//! Kern source printer.
//!
//! Prints a tree back to description-language source. Used to emit the
//! synthesized kernel as text for a Python-hosted JIT, and to dump parsed
//! files.
//!
//! # Guarantees
//!
//! - Output re-parses to the same tree (modulo spans): parentheses are
//!   inserted from `BinaryOp::precedence`, never copied from the input.
//! - Printing is a pure function of the tree: identical trees print
//!   identically.
//!
//! # Layout
//!
//! - 4-space indentation
//! - one blank line around nested `def`/`class`, two at module level
//! - tuples are bare at statement level (`a, b = f(x)`) and parenthesized
//!   inside expressions
//! - empty blocks print as `pass`

mod emitter;
mod printer;

use kern_ir::{ExprArena, ExprId, FunctionId, Module, StringInterner};

pub use emitter::{Emitter, StringEmitter};
pub use printer::Printer;

/// Spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Print a whole module.
pub fn format_module(module: &Module, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut printer = Printer::new(arena, interner, StringEmitter::new());
    printer.print_module(module);
    let mut out = printer.finish();
    out.trim_trailing_blank_lines();
    out.output()
}

/// Print one function definition, decorators included.
pub fn format_function(
    function: FunctionId,
    arena: &ExprArena,
    interner: &StringInterner,
) -> String {
    let mut printer = Printer::new(arena, interner, StringEmitter::new());
    printer.print_function(function);
    let mut out = printer.finish();
    out.trim_trailing_blank_lines();
    out.output()
}

/// Print one expression on a single line, without a trailing newline.
pub fn format_expr(expr: ExprId, arena: &ExprArena, interner: &StringInterner) -> String {
    let mut printer = Printer::new(arena, interner, StringEmitter::new());
    printer.print_expr(expr);
    printer.finish().output()
}
