//! Core parser tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_ir::{
    BinaryOp, CallTarget, ExprId, ExprKind, Name, StmtKind, StringInterner, UnaryOp,
};
use pretty_assertions::assert_eq;

use crate::{parse_source, ParseOutput};

fn parse_ok(source: &str, interner: &StringInterner) -> ParseOutput {
    let output = parse_source(source, interner);
    assert!(output.errors.is_empty(), "{:?}", output.errors);
    output
}

/// The expression of the single expression statement in `source`.
fn single_expr(output: &ParseOutput) -> ExprId {
    let body = output.arena.get_stmt_list(output.module.body);
    assert_eq!(body.len(), 1);
    match output.arena.get_stmt(body[0]).kind {
        StmtKind::Expr(id) => id,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn ident(output: &ParseOutput, id: ExprId) -> Name {
    match output.arena.get_expr(id).kind {
        ExprKind::Ident(name) => name,
        other => panic!("expected identifier, got {other:?}"),
    }
}

#[test]
fn test_parse_binary_precedence() {
    let interner = StringInterner::new();
    let output = parse_ok("1 + 2 * 3\n", &interner);
    let ExprKind::Binary {
        op: BinaryOp::Add,
        left,
        right,
    } = output.arena.get_expr(single_expr(&output)).kind
    else {
        panic!("expected addition");
    };
    assert!(matches!(output.arena.get_expr(left).kind, ExprKind::Int(1)));
    assert!(matches!(
        output.arena.get_expr(right).kind,
        ExprKind::Binary {
            op: BinaryOp::Mul,
            ..
        }
    ));
}

#[test]
fn test_parse_subtraction_is_left_associative() {
    let interner = StringInterner::new();
    let output = parse_ok("a - b - c\n", &interner);
    let ExprKind::Binary { left, right, .. } = output.arena.get_expr(single_expr(&output)).kind
    else {
        panic!("expected binary");
    };
    assert!(matches!(
        output.arena.get_expr(left).kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
    assert_eq!(ident(&output, right), interner.intern("c"));
}

#[test]
fn test_parse_power_is_right_associative_and_binds_tighter_than_minus() {
    let interner = StringInterner::new();
    let output = parse_ok("-2 ** 3 ** 2\n", &interner);
    let ExprKind::Unary {
        op: UnaryOp::Neg,
        operand,
    } = output.arena.get_expr(single_expr(&output)).kind
    else {
        panic!("expected negation at the root");
    };
    let ExprKind::Binary {
        op: BinaryOp::Pow,
        right,
        ..
    } = output.arena.get_expr(operand).kind
    else {
        panic!("expected power");
    };
    assert!(matches!(
        output.arena.get_expr(right).kind,
        ExprKind::Binary {
            op: BinaryOp::Pow,
            ..
        }
    ));
}

#[test]
fn test_parse_two_token_comparisons() {
    let interner = StringInterner::new();
    for (source, expected) in [
        ("a not in b\n", BinaryOp::NotIn),
        ("a is not None\n", BinaryOp::IsNot),
        ("a in b\n", BinaryOp::In),
        ("a is b\n", BinaryOp::Is),
        ("a >= b\n", BinaryOp::GtEq),
    ] {
        let output = parse_ok(source, &interner);
        match output.arena.get_expr(single_expr(&output)).kind {
            ExprKind::Binary { op, .. } => assert_eq!(op, expected, "{source}"),
            other => panic!("{source}: expected comparison, got {other:?}"),
        }
    }
}

#[test]
fn test_parse_not_binds_looser_than_comparison() {
    let interner = StringInterner::new();
    let output = parse_ok("not a == b and c\n", &interner);
    let ExprKind::Binary {
        op: BinaryOp::And,
        left,
        ..
    } = output.arena.get_expr(single_expr(&output)).kind
    else {
        panic!("expected `and` at the root");
    };
    let ExprKind::Unary {
        op: UnaryOp::Not,
        operand,
    } = output.arena.get_expr(left).kind
    else {
        panic!("expected `not`");
    };
    assert!(matches!(
        output.arena.get_expr(operand).kind,
        ExprKind::Binary {
            op: BinaryOp::Eq,
            ..
        }
    ));
}

#[test]
fn test_parse_method_call_is_tagged() {
    let interner = StringInterner::new();
    let output = parse_ok("self.sub(a, b)\n", &interner);
    let call = single_expr(&output);
    let Some(CallTarget::Method {
        receiver,
        method,
        args,
    }) = output.arena.call_target(call)
    else {
        panic!("expected method call");
    };
    assert_eq!(ident(&output, receiver), interner.intern("self"));
    assert_eq!(method, interner.intern("sub"));
    assert_eq!(args.len(), 2);
}

#[test]
fn test_parse_call_targets() {
    let interner = StringInterner::new();

    let output = parse_ok("sub(x)\n", &interner);
    assert!(matches!(
        output.arena.call_target(single_expr(&output)),
        Some(CallTarget::Direct { .. })
    ));

    let output = parse_ok("fs[0](x)\n", &interner);
    assert!(matches!(
        output.arena.call_target(single_expr(&output)),
        Some(CallTarget::Other { .. })
    ));

    let output = parse_ok("a.b.c(x)\n", &interner);
    let Some(CallTarget::Method { receiver, .. }) = output.arena.call_target(single_expr(&output))
    else {
        panic!("expected method call");
    };
    assert!(matches!(
        output.arena.get_expr(receiver).kind,
        ExprKind::Attribute { .. }
    ));
}

#[test]
fn test_parse_keyword_arguments() {
    let interner = StringInterner::new();
    let output = parse_ok("f(1, scale=2.5, name='x')\n", &interner);
    let target = output.arena.call_target(single_expr(&output)).unwrap();
    let args = output.arena.get_call_args(target.args());
    assert_eq!(args.len(), 3);
    assert!(!args[0].is_keyword());
    assert_eq!(args[1].name, interner.intern("scale"));
    assert_eq!(args[2].name, interner.intern("name"));
    assert!(matches!(
        output.arena.get_expr(args[2].value).kind,
        ExprKind::Str(s) if s == interner.intern("x")
    ));
}

#[test]
fn test_parse_adjacent_strings_concatenate() {
    let interner = StringInterner::new();
    let output = parse_ok("('a' \"b\"\n 'c')\n", &interner);
    assert!(matches!(
        output.arena.get_expr(single_expr(&output)).kind,
        ExprKind::Str(s) if s == interner.intern("abc")
    ));
}

#[test]
fn test_parse_tuple_forms() {
    let interner = StringInterner::new();
    for (source, len) in [("()\n", 0), ("(a,)\n", 1), ("(a, b)\n", 2), ("a, b, c\n", 3), ("a,\n", 1)] {
        let output = parse_ok(source, &interner);
        match output.arena.get_expr(single_expr(&output)).kind {
            ExprKind::Tuple(elems) => assert_eq!(elems.len(), len, "{source}"),
            other => panic!("{source}: expected tuple, got {other:?}"),
        }
    }
    // Parentheses alone do not make a tuple.
    let output = parse_ok("(a)\n", &interner);
    assert!(matches!(
        output.arena.get_expr(single_expr(&output)).kind,
        ExprKind::Ident(_)
    ));
}

#[test]
fn test_parse_list_dict_and_comprehension() {
    let interner = StringInterner::new();
    let output = parse_ok("[1, 2,]\n", &interner);
    assert!(matches!(
        output.arena.get_expr(single_expr(&output)).kind,
        ExprKind::List(r) if r.len() == 2
    ));

    let output = parse_ok("{'a': 1, 'b': 2}\n", &interner);
    let ExprKind::Dict { keys, values } = output.arena.get_expr(single_expr(&output)).kind else {
        panic!("expected dict");
    };
    assert_eq!((keys.len(), values.len()), (2, 2));

    let output = parse_ok("[x * 2 for i, x in enumerate(xs) if i > 0]\n", &interner);
    let ExprKind::ListComp { target, cond, .. } = output.arena.get_expr(single_expr(&output)).kind
    else {
        panic!("expected list comprehension");
    };
    assert!(matches!(
        output.arena.get_expr(target).kind,
        ExprKind::Tuple(r) if r.len() == 2
    ));
    assert!(cond.is_valid());
}

#[test]
fn test_parse_assignments() {
    let interner = StringInterner::new();
    let output = parse_ok("a = b = 1\nx, (y, z) = t\nv[i] += 2\n", &interner);
    let body = output.arena.get_stmt_list(output.module.body);
    assert_eq!(body.len(), 3);

    let StmtKind::Assign { targets, .. } = output.arena.get_stmt(body[0]).kind else {
        panic!("expected chained assignment");
    };
    assert_eq!(targets.len(), 2);

    let StmtKind::Assign { targets, .. } = output.arena.get_stmt(body[1]).kind else {
        panic!("expected unpacking assignment");
    };
    let target = output.arena.get_expr_list(targets)[0];
    assert!(matches!(
        output.arena.get_expr(target).kind,
        ExprKind::Tuple(r) if r.len() == 2
    ));

    assert!(matches!(
        output.arena.get_stmt(body[2]).kind,
        StmtKind::AugAssign {
            op: BinaryOp::Add,
            ..
        }
    ));
}

#[test]
fn test_parse_class_with_method() {
    let interner = StringInterner::new();
    let source = "\
class Logic(Base):
    def run_all(self, a, b=2):
        x = self.sub(a, b)
        return [x]
";
    let output = parse_ok(source, &interner);
    let body = output.arena.get_stmt_list(output.module.body);
    let StmtKind::Class(class_id) = output.arena.get_stmt(body[0]).kind else {
        panic!("expected class");
    };
    let class = output.arena.get_class(class_id);
    assert_eq!(class.name, interner.intern("Logic"));
    assert_eq!(class.bases.len(), 1);

    let members = output.arena.get_stmt_list(class.body);
    let StmtKind::Def(func_id) = output.arena.get_stmt(members[0]).kind else {
        panic!("expected method");
    };
    let func = output.arena.get_function(func_id);
    let params = output.arena.get_params(func.params);
    let names: Vec<&str> = params.iter().map(|p| interner.lookup(p.name)).collect();
    assert_eq!(names, vec!["self", "a", "b"]);
    assert!(params[2].has_default());
    assert_eq!(func.body.len(), 2);
}

#[test]
fn test_parse_def_with_annotations_and_decorators() {
    let interner = StringInterner::new();
    let source = "\
@property
@cache(size=2)
def f(x: int, ys: List[float] = None) -> float:
    pass
";
    let output = parse_ok(source, &interner);
    let body = output.arena.get_stmt_list(output.module.body);
    let StmtKind::Def(func_id) = output.arena.get_stmt(body[0]).kind else {
        panic!("expected def");
    };
    let func = output.arena.get_function(func_id);
    assert_eq!(func.decorators.len(), 2);
    assert!(func.returns.is_valid());
    let params = output.arena.get_params(func.params);
    assert!(params[0].annotation.is_valid());
    assert!(!params[0].has_default());
    assert!(matches!(
        output.arena.get_expr(params[1].annotation).kind,
        ExprKind::Subscript { .. }
    ));
}

#[test]
fn test_parse_control_flow() {
    let interner = StringInterner::new();
    let source = "\
for i, (a, b) in enumerate(zip(xs, ys)):
    if a > b:
        continue
    elif a == b: break
    else:
        out[i] = a
while n > 0:
    n -= 1
with open(path) as f:
    data = f.read()
";
    let output = parse_ok(source, &interner);
    let body = output.arena.get_stmt_list(output.module.body);
    assert_eq!(body.len(), 3);

    let StmtKind::For { body: for_body, .. } = output.arena.get_stmt(body[0]).kind else {
        panic!("expected for");
    };
    let if_stmt = output.arena.get_stmt_list(for_body)[0];
    let StmtKind::If { else_body, .. } = output.arena.get_stmt(if_stmt).kind else {
        panic!("expected if");
    };
    // `elif` nests as the only statement of the else branch.
    let elif = output.arena.get_stmt_list(else_body);
    assert_eq!(elif.len(), 1);
    let StmtKind::If {
        then_body,
        else_body,
        ..
    } = output.arena.get_stmt(elif[0]).kind
    else {
        panic!("expected nested if");
    };
    assert!(matches!(
        output.arena.get_stmt(output.arena.get_stmt_list(then_body)[0]).kind,
        StmtKind::Break
    ));
    assert_eq!(else_body.len(), 1);

    assert!(matches!(output.arena.get_stmt(body[1]).kind, StmtKind::While { .. }));
    let StmtKind::With { target, .. } = output.arena.get_stmt(body[2]).kind else {
        panic!("expected with");
    };
    assert!(target.is_valid());
}

#[test]
fn test_parse_return_forms() {
    let interner = StringInterner::new();
    let source = "def f():\n    return\ndef g():\n    return a, b\n";
    let output = parse_ok(source, &interner);
    let body = output.arena.get_stmt_list(output.module.body);

    let returns: Vec<ExprId> = body
        .iter()
        .map(|&stmt| {
            let StmtKind::Def(func) = output.arena.get_stmt(stmt).kind else {
                panic!("expected def");
            };
            let inner = output.arena.get_stmt_list(output.arena.get_function(func).body)[0];
            match output.arena.get_stmt(inner).kind {
                StmtKind::Return(value) => value,
                other => panic!("expected return, got {other:?}"),
            }
        })
        .collect();
    assert!(!returns[0].is_valid());
    assert!(matches!(
        output.arena.get_expr(returns[1]).kind,
        ExprKind::Tuple(r) if r.len() == 2
    ));
}

#[test]
fn test_parse_imports() {
    let interner = StringInterner::new();
    let output = parse_ok(
        "import os.path as p, ast\nfrom typing import (List,\n    Dict as D)\n",
        &interner,
    );
    let body = output.arena.get_stmt_list(output.module.body);

    let StmtKind::Import(first) = output.arena.get_stmt(body[0]).kind else {
        panic!("expected import");
    };
    let first = output.arena.get_import(first);
    assert!(first.from.is_empty());
    assert_eq!(first.items[0].path, interner.intern("os.path"));
    assert_eq!(first.items[0].alias, interner.intern("p"));
    assert!(first.items[1].alias.is_empty());

    let StmtKind::Import(second) = output.arena.get_stmt(body[1]).kind else {
        panic!("expected from-import");
    };
    let second = output.arena.get_import(second);
    assert_eq!(second.from, interner.intern("typing"));
    assert_eq!(second.items.len(), 2);
    assert_eq!(second.items[1].alias, interner.intern("D"));
}

#[test]
fn test_parse_one_line_suite() {
    let interner = StringInterner::new();
    let output = parse_ok("if x: y = 1\nz = 2\n", &interner);
    assert_eq!(output.module.body.len(), 2);
}

#[test]
fn test_spans_cover_source_text() {
    let interner = StringInterner::new();
    let source = "x = self.sub(a, b)\n";
    let output = parse_ok(source, &interner);
    let body = output.arena.get_stmt_list(output.module.body);
    let stmt = output.arena.get_stmt(body[0]);
    assert_eq!(&source[stmt.span.to_range()], "x = self.sub(a, b)");

    let StmtKind::Assign { value, .. } = stmt.kind else {
        panic!("expected assignment");
    };
    assert_eq!(
        &source[output.arena.get_expr(value).span.to_range()],
        "self.sub(a, b)"
    );
}
