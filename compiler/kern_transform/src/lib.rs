//! Row-function to loop-kernel transformation.
//!
//! Four stages, run once per [`transform`] call:
//!
//! 1. **Load** ([`load`], [`SourceUnit::find_unit`], [`SourceUnit::find_member`]):
//!    parse the description file and locate the class and row method.
//! 2. **Rewrite** ([`CallRewriter`]): copy the row method into a fresh arena
//!    with its receiver erased, recording each `receiver.helper(...)` call.
//! 3. **Collect** ([`collect_helpers`]): resolve and rewrite every recorded
//!    helper, transitively.
//! 4. **Synthesize** ([`synthesize`]): wrap helpers and row function in a
//!    kernel whose loop applies the row function to every row of its input
//!    columns.
//!
//! Every stage fails with a [`TransformError`]; no partial kernel is ever
//! returned.

mod collect;
mod config;
mod error;
mod helpers;
mod kernel;
mod loader;
mod rewrite;
mod synth;

use kern_ir::{ExprArena, Module, Param, Span, Stmt, StmtKind, StringInterner};
use tracing::debug;

pub use collect::{collect_helpers, CollectedHelper};
pub use config::KernelConfig;
pub use error::{LookupTarget, ShapeReason, TransformError};
pub use helpers::HelperSet;
pub use kernel::Kernel;
pub use loader::{load, Member, SourceUnit};
pub use rewrite::CallRewriter;
pub use synth::{declared_outputs, synthesize, KernelPlan};

/// Build the kernel `config` describes from a loaded description.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(unit = %config.unit, row = %config.row_function)
)]
pub fn transform(
    source: &SourceUnit,
    config: &KernelConfig,
    interner: &StringInterner,
) -> Result<Kernel, TransformError> {
    let class = source.find_unit(&config.unit, interner)?;
    let row_id = source.find_member(
        class,
        &config.row_function,
        LookupTarget::RowFunction,
        interner,
    )?;
    let row_name = source.arena.get_function(row_id).name;

    let mut dst = ExprArena::new();
    let mut rewriter = CallRewriter::new(&source.arena, interner);
    let row = rewriter.rewrite_method(row_id, &mut dst)?;
    debug!(helpers = rewriter.helpers().len(), "rewrote row function");

    let helpers = collect_helpers(source, class, row_name, &mut rewriter, &mut dst, interner)?;

    let row_def = *dst.get_function(row);
    let params = dst.get_params(row_def.params).to_vec();
    let param_count = params.len();
    let inputs = rename_columns(params, config.inputs.as_deref(), interner).map_err(|declared| {
        TransformError::shape(
            ShapeReason::InputCountMismatch {
                params: param_count,
                declared,
            },
            row_def.span,
        )
    })?;

    let returned = declared_outputs(&dst, row, interner)?;
    let returned_count = returned.len();
    let returned_span = returned.first().map(|p| p.span).unwrap_or_default();
    let outputs =
        rename_columns(returned, config.outputs.as_deref(), interner).map_err(|declared| {
            TransformError::shape(
                ShapeReason::OutputCountMismatch {
                    returned: returned_count,
                    declared,
                },
                returned_span,
            )
        })?;

    let plan = KernelPlan {
        name: interner.intern(&config.kernel_name()),
        inputs,
        outputs,
        helpers,
        row,
    };
    let function = synthesize(&mut dst, &plan, interner)?;
    debug!(
        inputs = plan.inputs.len(),
        outputs = plan.outputs.len(),
        helpers = plan.helpers.len(),
        "synthesized kernel"
    );

    let def = dst.alloc_stmt(Stmt::new(StmtKind::Def(function), Span::DUMMY));
    let module = Module {
        body: dst.alloc_stmt_list([def]),
    };
    Ok(Kernel {
        arena: dst,
        module,
        function,
        name: plan.name,
        row_function: row_name,
        helpers: plan.helpers.iter().map(|h| h.name).collect(),
        inputs: plan.inputs.iter().map(|p| p.name).collect(),
        outputs: plan.outputs.iter().map(|p| p.name).collect(),
    })
}

/// Load `source` and transform it in one step.
pub fn transform_source(
    source: &str,
    config: &KernelConfig,
    interner: &StringInterner,
) -> Result<Kernel, TransformError> {
    let unit = load(source, interner)?;
    transform(&unit, config, interner)
}

/// Rename `columns` positionally to `names`. On a count mismatch, returns
/// the number of configured names.
fn rename_columns(
    columns: Vec<Param>,
    names: Option<&[String]>,
    interner: &StringInterner,
) -> Result<Vec<Param>, usize> {
    let Some(names) = names else {
        return Ok(columns.into_iter().map(|p| Param::plain(p.name, p.span)).collect());
    };
    if names.len() != columns.len() {
        return Err(names.len());
    }
    Ok(columns
        .into_iter()
        .zip(names)
        .map(|(column, name)| Param::plain(interner.intern(name), column.span))
        .collect())
}
