//! Property-based tests for evaluator arithmetic.
//!
//! 1. Floor division and modulo agree: `a == (a // b) * b + a % b`
//! 2. `a % b` takes the sign of `b`
//! 3. Source-level evaluation matches the operator table

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use kern_eval::{evaluate_binary, Interpreter, Value};
use kern_ir::{BinaryOp, StringInterner};
use proptest::prelude::*;

fn eval_source(source: &str) -> Value {
    let interner = StringInterner::new();
    let output = kern_parse::parse_source(source, &interner);
    assert!(output.errors.is_empty(), "{source:?}: {:?}", output.errors);
    let mut interpreter = Interpreter::new(&output.arena, &interner);
    interpreter.load_module(&output.module).unwrap();
    interpreter.global("r").unwrap()
}

proptest! {
    #[test]
    fn floor_div_and_mod_agree(a in -10_000i64..10_000, b in -100i64..100) {
        prop_assume!(b != 0);
        let q = evaluate_binary(BinaryOp::FloorDiv, &Value::Int(a), &Value::Int(b)).unwrap();
        let r = evaluate_binary(BinaryOp::Mod, &Value::Int(a), &Value::Int(b)).unwrap();
        let (Value::Int(q), Value::Int(r)) = (q, r) else {
            panic!("integer operands give integer results");
        };
        prop_assert_eq!(q * b + r, a);
        prop_assert!(r == 0 || (r < 0) == (b < 0));
    }

    #[test]
    fn source_arithmetic_matches_operator_table(
        a in -1000i64..1000,
        b in 1i64..1000,
        op in prop::sample::select(vec!["+", "-", "*", "//", "%"]),
    ) {
        let expected_op = match op {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "//" => BinaryOp::FloorDiv,
            _ => BinaryOp::Mod,
        };
        let expected = evaluate_binary(expected_op, &Value::Int(a), &Value::Int(b)).unwrap();
        let source = format!("def f(x, y):\n    return x {op} y\n\nr = f({a}, {b})\n");
        prop_assert_eq!(eval_source(&source), expected);
    }
}
