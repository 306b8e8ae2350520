#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_diagnostic::ErrorCode;
use kern_ir::{Span, StringInterner};
use pretty_assertions::assert_eq;

use super::load;
use crate::{LookupTarget, TransformError};

const SOURCE: &str = "\
import numpy as np


class LeadLogic:
    scale = 2

    def sub(self, x, y):
        return x - y

    @property
    def names(self):
        return [\"a\"]

    def run_all(self, a, b):
        return [self.sub(a, b)]


class Other:
    def run_all(self, a):
        return [a]
";

#[test]
fn test_load_and_list_classes() {
    let interner = StringInterner::new();
    let unit = load(SOURCE, &interner).unwrap();
    let names: Vec<&str> = unit
        .classes()
        .map(|(class, _)| interner.lookup(unit.arena.get_class(class).name))
        .collect();
    assert_eq!(names, vec!["LeadLogic", "Other"]);

    let (_, header) = unit.classes().next().unwrap();
    assert_eq!(&SOURCE[header.to_range()], "class LeadLogic");
}

#[test]
fn test_members_in_declaration_order() {
    let interner = StringInterner::new();
    let unit = load(SOURCE, &interner).unwrap();
    let class = unit.find_unit("LeadLogic", &interner).unwrap();
    let members: Vec<&str> = unit
        .members(class)
        .iter()
        .map(|member| interner.lookup(member.name))
        .collect();
    assert_eq!(members, vec!["sub", "names", "run_all"]);

    let names = unit.members(class)[1];
    assert_eq!(&SOURCE[names.span.to_range()], "@property\n    def names(self)");
}

#[test]
fn test_find_member() {
    let interner = StringInterner::new();
    let unit = load(SOURCE, &interner).unwrap();
    let class = unit.find_unit("Other", &interner).unwrap();
    let id = unit
        .find_member(class, "run_all", LookupTarget::RowFunction, &interner)
        .unwrap();
    assert_eq!(unit.arena.get_params(unit.arena.get_function(id).params).len(), 2);
}

#[test]
fn test_syntax_error_fails_load() {
    let interner = StringInterner::new();
    let err = load("class C:\n    def f(self:\n        pass\n", &interner).unwrap_err();
    let TransformError::Syntax(diagnostics) = &err else {
        panic!("expected a syntax error, got {err:?}");
    };
    assert!(!diagnostics.is_empty());
    assert_ne!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_missing_unit() {
    let interner = StringInterner::new();
    let unit = load(SOURCE, &interner).unwrap();
    let err = unit.find_unit("Missing", &interner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2001);
    assert_eq!(err.to_string(), "class `Missing` not found in module");
    assert_eq!(err.span(), Span::DUMMY);
}

#[test]
fn test_nested_classes_are_not_units() {
    let interner = StringInterner::new();
    let source = "class Outer:\n    class Inner:\n        pass\n";
    let unit = load(source, &interner).unwrap();
    assert!(unit.find_unit("Outer", &interner).is_ok());
    assert!(unit.find_unit("Inner", &interner).is_err());
}

#[test]
fn test_duplicate_unit_is_ambiguous() {
    let interner = StringInterner::new();
    let source = "class C:\n    pass\n\n\nclass C:\n    pass\n";
    let unit = load(source, &interner).unwrap();
    let err = unit.find_unit("C", &interner).unwrap_err();
    let TransformError::Lookup { matches, span, .. } = &err else {
        panic!("expected a lookup error, got {err:?}");
    };
    assert_eq!(matches.len(), 2);
    assert_eq!(*span, matches[0]);
    assert_eq!(err.to_string(), "class `C` is declared 2 times in module");
}

#[test]
fn test_missing_and_duplicate_members() {
    let interner = StringInterner::new();
    let source = "\
class C:
    def f(self):
        return [1]

    def f(self):
        return [2]
";
    let unit = load(source, &interner).unwrap();
    let class = unit.find_unit("C", &interner).unwrap();

    let err = unit
        .find_member(class, "g", LookupTarget::RowFunction, &interner)
        .unwrap_err();
    assert_eq!(err.to_string(), "row function `g` not found in class `C`");
    assert_eq!(&source[err.span().to_range()], "class C");

    let err = unit
        .find_member(class, "f", LookupTarget::RowFunction, &interner)
        .unwrap_err();
    assert_eq!(err.to_string(), "row function `f` is declared 2 times in class `C`");
}

#[test]
fn test_names_never_interned_are_not_found() {
    let interner = StringInterner::new();
    let unit = load(SOURCE, &interner).unwrap();
    let class = unit.find_unit("LeadLogic", &interner).unwrap();
    assert!(unit
        .find_member(class, "never_seen_anywhere", LookupTarget::Helper, &interner)
        .is_err());
}
