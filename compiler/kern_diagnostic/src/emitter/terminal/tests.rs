#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_ir::Span;
use pretty_assertions::assert_eq;

use super::*;
use crate::ErrorCode;

fn render(diag: &Diagnostic, source: Option<(&str, &str)>) -> String {
    let emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    let mut emitter = match source {
        Some((path, text)) => emitter.with_source(path, text),
        None => emitter,
    };
    emitter.emit(diag);
    String::from_utf8(emitter.into_inner()).unwrap()
}

#[test]
fn test_color_mode_resolution() {
    assert!(ColorMode::Auto.should_use_colors(true));
    assert!(!ColorMode::Auto.should_use_colors(false));
    assert!(ColorMode::Always.should_use_colors(false));
    assert!(!ColorMode::Never.should_use_colors(true));
}

#[test]
fn test_color_mode_parse() {
    assert_eq!(ColorMode::parse("always"), Some(ColorMode::Always));
    assert_eq!(ColorMode::parse("never"), Some(ColorMode::Never));
    assert_eq!(ColorMode::parse("auto"), Some(ColorMode::Auto));
    assert_eq!(ColorMode::parse("sometimes"), None);
}

#[test]
fn test_emit_without_source_uses_byte_ranges() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("no class named `Leads`")
        .with_label(Span::new(3, 8), "searched here");

    assert_eq!(
        render(&diag, None),
        "error[E2001]: no class named `Leads`\n  --> 3..8: searched here\n\n"
    );
}

#[test]
fn test_emit_with_source_snippet() {
    let source = "class A:\n    def f(self):\n        return self.x\n";
    let start = u32::try_from(source.find("self.x").unwrap()).unwrap();
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_message("receiver used outside a method call")
        .with_label(Span::new(start, start + 6), "receiver escapes here")
        .with_note("only `self.helper(...)` calls can be rewritten");

    let expected = "\
error[E2002]: receiver used outside a method call
 --> rows.py:3:16
  |
3 |         return self.x
  |                ^^^^^^ receiver escapes here
  = note: only `self.helper(...)` calls can be rewritten

";
    assert_eq!(render(&diag, Some(("rows.py", source))), expected);
}

#[test]
fn test_emit_colored_wraps_severity() {
    let diag = Diagnostic::error(ErrorCode::E1001).with_message("unexpected token");
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Always, false);
    emitter.emit(&diag);
    let output = String::from_utf8(emitter.into_inner()).unwrap();
    assert!(output.starts_with("\x1b[1;31merror\x1b[0m"));
}

#[test]
fn test_summary_counts() {
    let mut emitter = TerminalEmitter::with_color_mode(Vec::new(), ColorMode::Never, false);
    emitter.emit_summary(2, 1);
    emitter.emit_summary(0, 0);
    emitter.emit_summary(0, 3);
    let output = String::from_utf8(emitter.into_inner()).unwrap();
    assert_eq!(
        output,
        "error: aborting due to 2 errors; 1 warning emitted\nwarning: 3 warnings emitted\n"
    );
}
