//! The `parse` command: list the declarations of a description file.

use std::fmt::Write as _;

use kern_ir::{ExprArena, FunctionId, StmtKind, StmtRange, StringInterner};

use super::{read_file, report, required_path};
use crate::options::Options;

/// Classes with their methods, and top-level functions, one per line.
///
/// ```text
/// class LeadLogic
///   @property names(self)
///   scale(self, x, factor=0.5)
/// def main()
/// ```
///
/// Returns the parser's diagnostics instead when the file does not parse.
pub fn describe_source(source: &str) -> Result<String, Vec<kern_diagnostic::Diagnostic>> {
    let interner = StringInterner::new();
    let output = kern_parse::parse_source(source, &interner);
    if output.has_errors() {
        return Err(output.diagnostics());
    }

    let arena = &output.arena;
    let mut out = String::new();
    for &id in arena.get_stmt_list(output.module.body) {
        match arena.get_stmt(id).kind {
            StmtKind::Class(class) => {
                let class = arena.get_class(class);
                let _ = writeln!(out, "class {}", interner.lookup(class.name));
                for method in functions_in(arena, class.body) {
                    let _ = writeln!(out, "  {}", signature(method, arena, &interner));
                }
            }
            StmtKind::Def(function) => {
                let _ = writeln!(out, "def {}", signature(function, arena, &interner));
            }
            _ => {}
        }
    }
    let _ = writeln!(
        out,
        "({} functions, {} statements, {} expressions)",
        arena.function_count(),
        arena.stmt_count(),
        arena.expr_count()
    );
    Ok(out)
}

pub fn parse_file(options: &Options) {
    let path = required_path("parse", options);
    let source = read_file(path);

    match describe_source(&source) {
        Ok(text) => {
            println!("Parse result for '{path}':");
            print!("{text}");
        }
        Err(diagnostics) => {
            report(path, &source, options.color, &diagnostics);
            std::process::exit(1);
        }
    }
}

fn functions_in(arena: &ExprArena, block: StmtRange) -> impl Iterator<Item = FunctionId> + '_ {
    arena
        .get_stmt_list(block)
        .iter()
        .filter_map(|&id| match arena.get_stmt(id).kind {
            StmtKind::Def(function) => Some(function),
            _ => None,
        })
}

/// `@decorator name(a, b=1)`
fn signature(function: FunctionId, arena: &ExprArena, interner: &StringInterner) -> String {
    let def = arena.get_function(function);
    let mut out = String::new();
    for &decorator in arena.get_expr_list(def.decorators) {
        let _ = write!(out, "@{} ", kern_fmt::format_expr(decorator, arena, interner));
    }
    let params: Vec<String> = arena
        .get_params(def.params)
        .iter()
        .map(|param| {
            let name = interner.lookup(param.name);
            if param.default.is_valid() {
                format!(
                    "{name}={}",
                    kern_fmt::format_expr(param.default, arena, interner)
                )
            } else {
                name.to_owned()
            }
        })
        .collect();
    let _ = write!(out, "{}({})", interner.lookup(def.name), params.join(", "));
    out
}
