//! Property-based tests for the printer.
//!
//! Random expressions and statements are parsed and printed, then:
//! 1. Parse-ability: printed output parses without errors
//! 2. Idempotence: print(parse(print(x))) == print(x)

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use kern_fmt::format_module;
use kern_ir::StringInterner;
use proptest::prelude::*;

fn leaf() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(vec!["a", "b", "leadi", "x0", "None", "True"]).prop_map(String::from),
        (0i64..1000).prop_map(|n| n.to_string()),
        (0u32..100).prop_map(|n| format!("{n}.5")),
        "[a-z ]{0,6}".prop_map(|s| format!("\"{s}\"")),
    ]
}

fn expression() -> impl Strategy<Value = String> {
    leaf().prop_recursive(5, 48, 3, |inner| {
        let op = prop::sample::select(vec![
            "+", "-", "*", "/", "//", "%", "**", "<", "==", "and", "or", "in", "not in", "is not",
        ]);
        prop_oneof![
            (inner.clone(), op, inner.clone()).prop_map(|(l, op, r)| format!("({l} {op} {r})")),
            (prop::sample::select(vec!["-", "not ", "+"]), inner.clone())
                .prop_map(|(op, e)| format!("({op}{e})")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|args| format!("f({})", args.join(", "))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("self.sub({a}, k={b})")),
            prop::collection::vec(inner.clone(), 0..3)
                .prop_map(|items| format!("[{}]", items.join(", "))),
            (inner.clone(), inner.clone()).prop_map(|(a, b)| format!("({a}, {b})")),
            (inner.clone(), inner).prop_map(|(a, i)| format!("({a})[{i}].attr")),
        ]
    })
}

fn statement() -> impl Strategy<Value = String> {
    prop_oneof![
        expression().prop_map(|e| format!("x = {e}\n")),
        (expression(), expression()).prop_map(|(a, b)| format!("y, z = {a}, {b}\n")),
        expression().prop_map(|e| format!("if {e}:\n    pass\nelse:\n    w = 1\n")),
        expression().prop_map(|e| format!("def g(p, q=1):\n    return [{e}]\n")),
        expression().prop_map(|e| format!("for i, (u, v) in {e}:\n    out[i] = u\n")),
    ]
}

fn print(source: &str) -> String {
    let interner = StringInterner::new();
    let output = kern_parse::parse_source(source, &interner);
    assert!(output.errors.is_empty(), "{source:?}: {:?}", output.errors);
    format_module(&output.module, &output.arena, &interner)
}

proptest! {
    #[test]
    fn printed_expressions_are_fixpoints(expr in expression()) {
        let once = print(&format!("x = {expr}\n"));
        let twice = print(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn printed_modules_are_fixpoints(stmts in prop::collection::vec(statement(), 1..5)) {
        let source = stmts.concat();
        let once = print(&source);
        let twice = print(&once);
        prop_assert_eq!(once, twice);
    }
}
