#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_diagnostic::ErrorCode;
use kern_ir::{ExprArena, StringInterner};
use pretty_assertions::assert_eq;

use super::CallRewriter;
use crate::{load, LookupTarget, ShapeReason, TransformError};

/// Rewrite method `method` of the single class in `source` and print it.
fn rewrite(source: &str, method: &str) -> Result<(String, Vec<String>), TransformError> {
    let interner = StringInterner::new();
    let unit = load(source, &interner).unwrap();
    let (class, _) = unit.classes().next().unwrap();
    let id = unit
        .find_member(class, method, LookupTarget::RowFunction, &interner)
        .unwrap();

    let mut dst = ExprArena::new();
    let mut rewriter = CallRewriter::new(&unit.arena, &interner);
    let function = rewriter.rewrite_method(id, &mut dst)?;
    let helpers = rewriter
        .helpers()
        .iter()
        .map(|name| interner.lookup(name).to_owned())
        .collect();
    Ok((kern_fmt::format_function(function, &dst, &interner), helpers))
}

#[test]
fn test_receiver_calls_become_free_calls() {
    let source = "\
class LeadLogic:
    def run_all(self, leadi, leadii, leadiii):
        i_ii = self.sub(leadi, leadii)
        i_iii = self.sub(leadi, leadiii)
        return [i_ii, self.neg(i_iii)]
";
    let (printed, helpers) = rewrite(source, "run_all").unwrap();
    assert_eq!(
        printed,
        "\
def run_all(leadi, leadii, leadiii):
    i_ii = sub(leadi, leadii)
    i_iii = sub(leadi, leadiii)
    return [i_ii, neg(i_iii)]
"
    );
    assert_eq!(helpers, vec!["sub", "neg"]);
}

#[test]
fn test_other_calls_pass_through() {
    let source = "\
class C:
    def f(self, x):
        y = helper_module.compute(x)
        z = np.abs(y).sum()
        return [max(y, z), [v.real for v in y if v]]
";
    let (printed, helpers) = rewrite(source, "f").unwrap();
    assert_eq!(
        printed,
        "\
def f(x):
    y = helper_module.compute(x)
    z = np.abs(y).sum()
    return [max(y, z), [v.real for v in y if v]]
"
    );
    assert!(helpers.is_empty());
}

#[test]
fn test_receiver_name_is_not_assumed() {
    let source = "\
class C:
    def f(this, x):
        return [this.g(x), self.g(x)]
";
    let (printed, helpers) = rewrite(source, "f").unwrap();
    assert_eq!(printed, "def f(x):\n    return [g(x), self.g(x)]\n");
    assert_eq!(helpers, vec!["g"]);
}

#[test]
fn test_decorators_dropped_and_nested_code_kept() {
    let source = "\
class C:
    @staticmethod
    def f(self, xs, k=2):
        def inner(v):
            return v * k

        total = 0
        for x in xs:
            if x > 0:
                total += self.scale(inner(x))
            else:
                continue
        return [total]
";
    let (printed, helpers) = rewrite(source, "f").unwrap();
    assert_eq!(
        printed,
        "\
def f(xs, k=2):
    def inner(v):
        return v * k

    total = 0
    for x in xs:
        if x > 0:
            total += scale(inner(x))
        else:
            continue
    return [total]
"
    );
    assert_eq!(helpers, vec!["scale"]);
}

#[test]
fn test_receiver_in_nested_call_arguments() {
    let source = "\
class C:
    def f(self, a, b):
        return [self.outer(self.inner(a), key=self.inner(b))]
";
    let (printed, helpers) = rewrite(source, "f").unwrap();
    assert_eq!(printed, "def f(a, b):\n    return [outer(inner(a), key=inner(b))]\n");
    assert_eq!(helpers, vec!["outer", "inner"]);
}

#[test]
fn test_receiver_escape_is_rejected() {
    let cases = [
        "        return [self]\n",
        "        return [self.scale]\n",
        "        self.total = a\n        return [a]\n",
        "        return [g(self)]\n",
    ];
    for body in cases {
        let source = format!("class C:\n    def f(self, a):\n{body}");
        let err = rewrite(&source, "f").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2002, "{body}");
        assert!(
            matches!(
                &err,
                TransformError::Shape {
                    reason: ShapeReason::ReceiverEscapes { receiver },
                    ..
                } if receiver == "self"
            ),
            "{body}: {err:?}"
        );
        assert_eq!(&source[err.span().to_range()], "self", "{body}");
    }
}

#[test]
fn test_malformed_receiver_calls() {
    let cases = [
        ("        return [self.inner.g(a)]\n", "self.inner.g(a)"),
        ("        return [self.table[0](a)]\n", "self.table[0](a)"),
        ("        return [self.fns[a].run()]\n", "self.fns[a].run()"),
        ("        return [self(a)]\n", "self(a)"),
    ];
    for (body, call) in cases {
        let source = format!("class C:\n    def f(self, a):\n{body}");
        let err = rewrite(&source, "f").unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2004, "{body}");
        assert_eq!(&source[err.span().to_range()], call);
    }
}

#[test]
fn test_method_without_receiver() {
    let source = "class C:\n    def f():\n        return [1]\n";
    let err = rewrite(source, "f").unwrap_err();
    assert_eq!(
        err,
        TransformError::Shape {
            reason: ShapeReason::NoReceiver {
                function: "f".to_owned()
            },
            span: err.span(),
        }
    );
    assert_eq!(err.to_string(), "method `f` has no receiver parameter");
}

#[test]
fn test_rewriting_twice_is_stable() {
    let source = "\
class C:
    def f(self, a):
        return [self.g(a)]

    def g(self, a):
        return a + 1
";
    let interner = StringInterner::new();
    let unit = load(source, &interner).unwrap();
    let (class, _) = unit.classes().next().unwrap();
    let f = unit
        .find_member(class, "f", LookupTarget::RowFunction, &interner)
        .unwrap();

    let mut first = ExprArena::new();
    let mut second = ExprArena::new();
    CallRewriter::new(&unit.arena, &interner)
        .rewrite_method(f, &mut first)
        .unwrap();
    CallRewriter::new(&unit.arena, &interner)
        .rewrite_method(f, &mut second)
        .unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_with_receiver_rewrites_free_expressions() {
    let interner = StringInterner::new();
    let output = kern_parse::parse_source("obj.g(obj.h(1))\n", &interner);
    let stmt = output.arena.get_stmt_list(output.module.body)[0];
    let kern_ir::StmtKind::Expr(expr) = output.arena.get_stmt(stmt).kind else {
        panic!("expected an expression statement");
    };

    let mut dst = ExprArena::new();
    let mut rewriter =
        CallRewriter::new(&output.arena, &interner).with_receiver(interner.intern("obj"));
    let rewritten = rewriter.rewrite_expr(expr, &mut dst).unwrap();
    assert_eq!(kern_fmt::format_expr(rewritten, &dst, &interner), "g(h(1))");

    let helpers = rewriter.into_helpers();
    assert_eq!(
        helpers.names(),
        &[interner.intern("g"), interner.intern("h")]
    );
}
