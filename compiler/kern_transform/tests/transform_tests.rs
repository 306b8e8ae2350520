//! End-to-end transformation tests.
//!
//! Covers the pipeline from description text to kernel: parameter order,
//! shape checks, receiver erasure, helper resolution, determinism, and
//! execution of the kernel with the reference evaluator.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use kern_diagnostic::ErrorCode;
use kern_eval::Value;
use kern_ir::{ExprArena, StmtKind, StringInterner};
use kern_transform::{
    load, transform, transform_source, CallRewriter, KernelConfig, LookupTarget, ShapeReason,
    TransformError,
};
use pretty_assertions::assert_eq;

const LEAD_LOGIC: &str = include_str!("fixtures/lead_logic.py");
const LIMB_LEADS: &str = include_str!("fixtures/limb_leads.py");

fn lead_config() -> KernelConfig {
    KernelConfig::new("LeadLogic", "run_all")
}

fn names(interner: &StringInterner, names: &[kern_ir::Name]) -> Vec<&'static str> {
    names.iter().map(|&name| interner.lookup(name)).collect()
}

#[test]
fn test_parameter_ordering() {
    let interner = StringInterner::new();
    let kernel = transform_source(LEAD_LOGIC, &lead_config(), &interner).unwrap();
    let params: Vec<&str> = kernel
        .params()
        .iter()
        .map(|param| interner.lookup(param.name))
        .collect();
    assert_eq!(
        params,
        vec!["leadi", "leadii", "leadiii", "leadavr", "i_ii", "i_iii", "i_avr"]
    );
    assert_eq!(names(&interner, &kernel.inputs), &params[..4]);
    assert_eq!(names(&interner, &kernel.outputs), &params[4..]);
    assert_eq!(interner.lookup(kernel.name), "run_all_kernel");
    assert_eq!(interner.lookup(kernel.row_function), "run_all");
}

#[test]
fn test_kernel_body_structure() {
    let interner = StringInterner::new();
    let kernel = transform_source(LEAD_LOGIC, &lead_config(), &interner).unwrap();
    assert_eq!(names(&interner, &kernel.helpers), vec!["sub"]);

    let kinds: Vec<&str> = kernel
        .body()
        .iter()
        .map(|&id| match kernel.arena.get_stmt(id).kind {
            StmtKind::Def(_) => "def",
            StmtKind::For { .. } => "for",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["def", "def", "for"]);

    let module_body = kernel.arena.get_stmt_list(kernel.module.body);
    assert_eq!(module_body.len(), 1);
    assert_eq!(
        kernel.arena.get_stmt(module_body[0]).kind,
        StmtKind::Def(kernel.function)
    );
}

#[test]
fn test_output_count_mismatch_is_a_shape_error() {
    let interner = StringInterner::new();
    let config = lead_config().with_outputs(["i_ii", "i_iii"]);
    let err = transform_source(LEAD_LOGIC, &config, &interner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(
        err,
        TransformError::Shape {
            reason: ShapeReason::OutputCountMismatch {
                returned: 3,
                declared: 2,
            },
            span: err.span(),
        }
    );
    assert_eq!(&LEAD_LOGIC[err.span().to_range()], "i_ii");
}

#[test]
fn test_input_count_mismatch_is_a_shape_error() {
    let interner = StringInterner::new();
    let config = lead_config().with_inputs(["a", "b"]);
    let err = transform_source(LEAD_LOGIC, &config, &interner).unwrap_err();
    assert_eq!(
        err.to_string(),
        "row function takes 4 input(s) but 2 input column(s) are declared"
    );
}

#[test]
fn test_helper_named_after_loop_builtin_is_rejected() {
    let source = "\
class U:
    def zip(self, a, b):
        return a - b

    def row(self, a, b):
        d = self.zip(a, b)
        return [d]
";
    let interner = StringInterner::new();
    let err = transform_source(source, &KernelConfig::new("U", "row"), &interner).unwrap_err();
    assert!(matches!(
        &err,
        TransformError::Shape {
            reason: ShapeReason::ShadowsLoopBuiltin { name },
            ..
        } if name == "zip"
    ));
    let diagnostics = err.to_diagnostics();
    assert_eq!(diagnostics[0].code, ErrorCode::E2002);
    assert_eq!(diagnostics[0].suggestions, vec!["rename `zip`".to_owned()]);
}

#[test]
fn test_non_receiver_calls_pass_through() {
    let source = "\
import helper_module


class Unit:
    def row(self, x):
        y = helper_module.compute(x)
        return [y]
";
    let interner = StringInterner::new();
    let kernel = transform_source(source, &KernelConfig::new("Unit", "row"), &interner).unwrap();
    assert!(kernel.helpers.is_empty());
    let printed = kern_fmt::format_function(kernel.function, &kernel.arena, &interner);
    assert!(
        printed.contains("        y = helper_module.compute(x)\n"),
        "{printed}"
    );
}

#[test]
fn test_rewriting_receiver_free_code_is_identity() {
    let interner = StringInterner::new();
    let source = "r = sub(a, helper_module.compute(b), key=[c for c in d])\n";
    let output = kern_parse::parse_source(source, &interner);
    let stmt = output.arena.get_stmt_list(output.module.body)[0];
    let StmtKind::Assign { value, .. } = output.arena.get_stmt(stmt).kind else {
        panic!("expected an assignment");
    };

    let mut dst = ExprArena::new();
    let mut rewriter =
        CallRewriter::new(&output.arena, &interner).with_receiver(interner.intern("self"));
    let rewritten = rewriter.rewrite_expr(value, &mut dst).unwrap();
    assert_eq!(
        kern_fmt::format_expr(rewritten, &dst, &interner),
        kern_fmt::format_expr(value, &output.arena, &interner)
    );
    assert!(rewriter.helpers().is_empty());
}

#[test]
fn test_helpers_lose_exactly_their_receiver() {
    let interner = StringInterner::new();
    let unit = load(LIMB_LEADS, &interner).unwrap();
    let config = KernelConfig::new("LimbLeads", "derive");
    let kernel = transform(&unit, &config, &interner).unwrap();
    let class = unit.find_unit("LimbLeads", &interner).unwrap();

    let emitted: Vec<_> = kernel
        .body()
        .iter()
        .filter_map(|&id| match kernel.arena.get_stmt(id).kind {
            StmtKind::Def(function) => Some(kernel.arena.get_function(function)),
            _ => None,
        })
        .collect();
    assert_eq!(emitted.len(), kernel.helpers.len() + 1);

    for emitted in emitted {
        let name = interner.lookup(emitted.name);
        let original = unit
            .find_member(class, name, LookupTarget::Helper, &interner)
            .unwrap();
        let original = unit.arena.get_params(unit.arena.get_function(original).params);
        let rewritten = kernel.arena.get_params(emitted.params);
        assert_eq!(rewritten.len() + 1, original.len(), "{name}");
        assert_eq!(interner.lookup(original[0].name), "self");
        let kept: Vec<_> = original[1..].iter().map(|p| p.name).collect();
        let got: Vec<_> = rewritten.iter().map(|p| p.name).collect();
        assert_eq!(got, kept, "{name}");
    }
}

#[test]
fn test_transitive_helper_set() {
    let interner = StringInterner::new();
    let kernel =
        transform_source(LIMB_LEADS, &KernelConfig::new("LimbLeads", "derive"), &interner)
            .unwrap();
    assert_eq!(
        names(&interner, &kernel.helpers),
        vec!["mean", "augmented", "magnitude", "square"]
    );
}

#[test]
fn test_unresolved_helper_fails_the_transform() {
    let source = LEAD_LOGIC.replace("self.sub(leadi, leadavr)", "self.diff(leadi, leadavr)");
    let interner = StringInterner::new();
    let err = transform_source(&source, &lead_config(), &interner).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.to_string(), "`LeadLogic` has no method `diff`");
    assert_eq!(&source[err.span().to_range()], "self.diff(leadi, leadavr)");
}

#[test]
fn test_lookup_failures() {
    let interner = StringInterner::new();
    let err = transform_source(LEAD_LOGIC, &KernelConfig::new("Leads", "run_all"), &interner)
        .unwrap_err();
    assert_eq!(err.to_string(), "class `Leads` not found in module");

    let err = transform_source(LEAD_LOGIC, &KernelConfig::new("LeadLogic", "run"), &interner)
        .unwrap_err();
    assert_eq!(err.to_string(), "row function `run` not found in class `LeadLogic`");
    assert_eq!(err.code(), ErrorCode::E2001);
}

#[test]
fn test_syntax_errors_stop_the_pipeline() {
    let interner = StringInterner::new();
    let source = "class LeadLogic:\n    def run_all(self, a\n        return [a]\n";
    let err = transform_source(source, &lead_config(), &interner).unwrap_err();
    assert!(matches!(err, TransformError::Syntax(_)));
    assert!(!err.to_diagnostics().is_empty());
}

#[test]
fn test_transform_is_deterministic() {
    let interner = StringInterner::new();
    let unit = load(LIMB_LEADS, &interner).unwrap();
    let config = KernelConfig::new("LimbLeads", "derive");
    let first = transform(&unit, &config, &interner).unwrap();
    let second = transform(&unit, &config, &interner).unwrap();
    assert_eq!(first, second);

    let other = StringInterner::new();
    let third = transform_source(LIMB_LEADS, &config, &other).unwrap();
    assert_eq!(
        kern_fmt::format_module(&first.module, &first.arena, &interner),
        kern_fmt::format_module(&third.module, &third.arena, &other)
    );
}

#[test]
fn test_kernel_counts_helper_calls_and_writes() {
    let interner = StringInterner::new();
    let kernel = transform_source(LEAD_LOGIC, &lead_config(), &interner).unwrap();
    let column = |values: [f64; 5]| values.into_iter().map(Value::Float).collect::<Vec<_>>();
    let inputs = vec![
        column([1.0, 2.0, 3.0, 4.0, 5.0]),
        column([0.5, 1.5, 2.5, 3.5, 4.5]),
        column([1.0, 1.0, 1.0, 1.0, 1.0]),
        column([-1.0, -2.0, -3.0, -4.0, -5.0]),
    ];

    let run = kern_eval::run_kernel(
        &kernel.arena,
        &kernel.module,
        "run_all_kernel",
        inputs,
        kernel.outputs.len(),
        &interner,
    )
    .unwrap();

    assert_eq!(run.stats.calls(interner.intern("sub")), 15);
    assert_eq!(run.stats.calls(interner.intern("run_all")), 5);
    for &output in &kernel.outputs {
        assert_eq!(run.stats.stores(output), 5, "{}", interner.lookup(output));
    }
    assert_eq!(
        run.outputs,
        vec![
            column([0.5, 0.5, 0.5, 0.5, 0.5]),
            column([0.0, 1.0, 2.0, 3.0, 4.0]),
            column([2.0, 4.0, 6.0, 8.0, 10.0]),
        ]
    );
}

#[test]
fn test_kernel_rows_match_the_method() {
    let interner = StringInterner::new();
    let unit = load(LEAD_LOGIC, &interner).unwrap();
    let kernel = transform(&unit, &lead_config(), &interner).unwrap();
    let rows = [[3.0, 1.0, 2.0, 0.25], [-1.0, 4.0, 0.0, 8.0]];

    let columns: Vec<Vec<Value>> = (0..4)
        .map(|k| rows.iter().map(|row| Value::Float(row[k])).collect())
        .collect();
    let run = kern_eval::run_kernel(
        &kernel.arena,
        &kernel.module,
        "run_all_kernel",
        columns,
        3,
        &interner,
    )
    .unwrap();

    for (i, row) in rows.iter().enumerate() {
        let expected = kern_eval::call_method(
            &unit.arena,
            &unit.module,
            "LeadLogic",
            "run_all",
            row.iter().copied().map(Value::Float).collect(),
            &interner,
        )
        .unwrap();
        let got = Value::list(run.outputs.iter().map(|column| column[i].clone()).collect());
        assert_eq!(got, expected, "row {i}");
    }
}
