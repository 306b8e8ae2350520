use pretty_assertions::assert_eq;

use super::*;

#[test]
fn test_builder_collects_parts() {
    let diag = Diagnostic::error(ErrorCode::E2002)
        .with_message("row function returns 3 values but 2 outputs are declared")
        .with_label(Span::new(40, 60), "returned here")
        .with_secondary_label(Span::new(0, 10), "declared here")
        .with_note("outputs: i_ii, i_iii")
        .with_suggestion("declare one output column per returned name");

    assert!(diag.is_error());
    assert_eq!(diag.labels.len(), 2);
    assert_eq!(diag.primary_span(), Some(Span::new(40, 60)));
    assert_eq!(diag.notes, vec!["outputs: i_ii, i_iii".to_string()]);
}

#[test]
fn test_dummy_spans_are_not_labeled() {
    let diag = Diagnostic::error(ErrorCode::E9001)
        .with_message("internal")
        .with_label(Span::DUMMY, "nowhere");
    assert!(diag.labels.is_empty());
    assert_eq!(diag.primary_span(), None);
}

#[test]
fn test_display_format() {
    let diag = Diagnostic::error(ErrorCode::E2003)
        .with_message("helper `mul` is not declared")
        .with_label(Span::new(5, 13), "called here")
        .with_suggestion("add `def mul(self, ...)` to the class");

    assert_eq!(
        diag.to_string(),
        "error[E2003]: helper `mul` is not declared\n  --> 5..13: called here\n  = help: add `def mul(self, ...)` to the class"
    );
}

#[test]
fn test_display_secondary_labels() {
    let diag = Diagnostic::error(ErrorCode::E2001)
        .with_message("class `C` is declared 2 times in module")
        .with_label(Span::new(0, 7), "first declaration")
        .with_secondary_label(Span::new(20, 27), "declared here");

    assert_eq!(
        diag.to_string(),
        "error[E2001]: class `C` is declared 2 times in module\n  --> 0..7: first declaration\n  ... 20..27: declared here"
    );
}

#[test]
fn test_warning_severity() {
    let diag = Diagnostic::warning(ErrorCode::E1006);
    assert!(!diag.is_error());
    assert_eq!(diag.severity.to_string(), "warning");
}
