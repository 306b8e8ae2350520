#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_diagnostic::ErrorCode;
use kern_ir::{ExprArena, FunctionId, Param, Span, StringInterner};
use pretty_assertions::assert_eq;

use super::{declared_outputs, synthesize, KernelPlan};
use crate::{collect_helpers, load, CallRewriter, LookupTarget, ShapeReason, TransformError};

/// Rewrite `row` with its helpers into a fresh arena.
fn prepare(
    source: &str,
    row: &str,
    interner: &StringInterner,
) -> (ExprArena, FunctionId, Vec<crate::CollectedHelper>) {
    let unit = load(source, interner).unwrap();
    let (class, _) = unit.classes().next().unwrap();
    let row_id = unit
        .find_member(class, row, LookupTarget::RowFunction, interner)
        .unwrap();
    let mut dst = ExprArena::new();
    let mut rewriter = CallRewriter::new(&unit.arena, interner);
    let function = rewriter.rewrite_method(row_id, &mut dst).unwrap();
    let row_name = unit.arena.get_function(row_id).name;
    let helpers =
        collect_helpers(&unit, class, row_name, &mut rewriter, &mut dst, interner).unwrap();
    (dst, function, helpers)
}

fn params(names: &[&str], interner: &StringInterner) -> Vec<Param> {
    names
        .iter()
        .map(|name| Param::plain(interner.intern(name), Span::DUMMY))
        .collect()
}

/// Synthesize with explicit columns and print the kernel.
fn kernel(source: &str, inputs: &[&str], outputs: &[&str]) -> Result<String, TransformError> {
    let interner = StringInterner::new();
    let (mut dst, row, helpers) = prepare(source, "f", &interner);
    let plan = KernelPlan {
        name: interner.intern("f_kernel"),
        inputs: params(inputs, &interner),
        outputs: params(outputs, &interner),
        helpers,
        row,
    };
    let function = synthesize(&mut dst, &plan, &interner)?;
    Ok(kern_fmt::format_function(function, &dst, &interner))
}

#[test]
fn test_declared_outputs_reads_terminal_return() {
    let interner = StringInterner::new();
    let source = "\
class C:
    def f(self, a):
        if a:
            return [a, a]
        return (lo, hi)
";
    let (dst, row, _) = prepare(source, "f", &interner);
    let outputs = declared_outputs(&dst, row, &interner).unwrap();
    let names: Vec<&str> = outputs.iter().map(|p| interner.lookup(p.name)).collect();
    assert_eq!(names, vec!["lo", "hi"]);
    assert_eq!(&source[outputs[1].span.to_range()], "hi");
}

#[test]
fn test_declared_outputs_shape_errors() {
    let cases = [
        ("        pass\n", "does not end with a `return`"),
        ("        return\n", "does not end with a `return`"),
        ("        return a\n", "must return a list or tuple of names"),
        ("        return [a, a + 1]\n", "must return a list or tuple of names"),
    ];
    for (body, message) in cases {
        let interner = StringInterner::new();
        let source = format!("class C:\n    def f(self, a):\n{body}");
        let (dst, row, _) = prepare(&source, "f", &interner);
        let err = declared_outputs(&dst, row, &interner).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2002, "{body}");
        assert!(err.to_string().contains(message), "{body}: {err}");
    }
}

#[test]
fn test_kernel_layout() {
    let source = "\
class C:
    def g(self, x):
        return x * 2

    def f(self, a, b):
        s = self.g(a) + b
        return [s]
";
    assert_eq!(
        kernel(source, &["a", "b"], &["s"]).unwrap(),
        "\
def f_kernel(a, b, s):
    def g(x):
        return x * 2

    def f(a, b):
        s = g(a) + b
        return [s]

    for i, (x0, x1) in enumerate(zip(a, b)):
        y0, = f(x0, x1)
        s[i] = y0
"
    );
}

#[test]
fn test_loop_names_avoid_existing_names() {
    let source = "\
class C:
    def f(self, i, x0):
        y0 = i + x0
        return [y0]
";
    assert_eq!(
        kernel(source, &["i", "x0"], &["out"]).unwrap(),
        "\
def f_kernel(i, x0, out):
    def f(i, x0):
        y0 = i + x0
        return [y0]

    for i_1, (x0_1, x1) in enumerate(zip(i, x0)):
        y0_1, = f(x0_1, x1)
        out[i_1] = y0_1
"
    );
}

#[test]
fn test_column_collisions() {
    let source = "\
class C:
    def g(self, x):
        return x

    def f(self, a):
        return [self.g(a)]
";
    let cases: [(&[&str], &[&str], &str); 5] = [
        (&["a"], &["a"], "kernel parameter `a` collides with an input column"),
        (&["a", "a"], &["b"], "column `a` appears more than once"),
        (&["a"], &["f"], "kernel parameter `f` collides with the row function"),
        (&["g"], &["b"], "kernel parameter `g` collides with a helper function"),
        (
            &["zip"],
            &["b"],
            "kernel parameter `zip` collides with a builtin called by the kernel loop",
        ),
    ];
    for (inputs, outputs, message) in cases {
        let err = kernel(source, inputs, outputs).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2002);
        assert_eq!(err.to_string(), message);
    }
}

#[test]
fn test_nested_functions_shadowing_loop_builtins() {
    let helper_zip = "\
class C:
    def zip(self, a, b):
        return a - b

    def f(self, a, b):
        d = self.zip(a, b)
        return [d]
";
    let err = kernel(helper_zip, &["a", "b"], &["d"]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(
        err.to_string(),
        "function `zip` shadows a builtin called by the kernel loop"
    );
    assert!(helper_zip[err.span().to_range()].starts_with("def zip(self, a, b)"));

    let interner = StringInterner::new();
    let row_enumerate = "class C:\n    def enumerate(self, a):\n        return [a]\n";
    let (mut dst, row, helpers) = prepare(row_enumerate, "enumerate", &interner);
    let plan = KernelPlan {
        name: interner.intern("k"),
        inputs: params(&["a"], &interner),
        outputs: params(&["b"], &interner),
        helpers,
        row,
    };
    let err = synthesize(&mut dst, &plan, &interner).unwrap_err();
    assert_eq!(
        err,
        TransformError::Shape {
            reason: ShapeReason::ShadowsLoopBuiltin {
                name: "enumerate".to_owned()
            },
            span: err.span(),
        }
    );
}

#[test]
fn test_output_count_checked_against_return() {
    let source = "\
class C:
    def f(self, a):
        p = a + 1
        q = a + 2
        r = a + 3
        return [p, q, r]
";
    let err = kernel(source, &["a"], &["p"]).unwrap_err();
    assert!(matches!(
        err,
        TransformError::Shape {
            reason: ShapeReason::OutputCountMismatch {
                returned: 3,
                declared: 1
            },
            ..
        }
    ));
    assert_eq!(&source[err.span().to_range()], "p");

    let err = kernel(source, &["a"], &["p", "q", "r", "s"]).unwrap_err();
    assert_eq!(
        err.to_string(),
        "row function returns 3 value(s) but 4 output column(s) are declared"
    );
    assert!(kernel(source, &["a"], &["x", "y", "z"]).is_ok());
}

#[test]
fn test_empty_columns_rejected() {
    let source = "class C:\n    def f(self, a):\n        return [a]\n";
    let err = kernel(source, &[], &["b"]).unwrap_err();
    assert!(matches!(
        err,
        TransformError::Shape {
            reason: ShapeReason::NoInputs { .. },
            ..
        }
    ));
    let err = kernel(source, &["a"], &[]).unwrap_err();
    assert_eq!(err.to_string(), "row function `f` returns no outputs");
}

#[test]
fn test_generated_nodes_have_dummy_spans() {
    let interner = StringInterner::new();
    let source = "class C:\n    def f(self, a):\n        return [a]\n";
    let (mut dst, row, helpers) = prepare(source, "f", &interner);
    let plan = KernelPlan {
        name: interner.intern("k"),
        inputs: params(&["a"], &interner),
        outputs: params(&["b"], &interner),
        helpers,
        row,
    };
    let function = synthesize(&mut dst, &plan, &interner).unwrap();
    let def = dst.get_function(function);
    assert!(def.span.is_dummy());
    let body = dst.get_stmt_list(def.body);
    assert_eq!(body.len(), 2);
    assert!(dst.get_stmt(body[1]).span.is_dummy());
    assert!(!dst.get_stmt(body[0]).span.is_dummy());
}
