//! Helper collection.
//!
//! Rewriting a method can record new helper names, so collection runs to a
//! fixpoint: every recorded name is resolved and rewritten exactly once,
//! and helpers called only from other helpers are picked up on the way.

use kern_ir::{ClassId, ExprArena, FunctionId, Name, Span, StringInterner};
use rustc_hash::FxHashMap;
use tracing::debug;

use crate::loader::Member;
use crate::{CallRewriter, LookupTarget, SourceUnit, TransformError};

/// A helper method, rewritten into the kernel arena.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CollectedHelper {
    pub name: Name,
    pub function: FunctionId,
}

/// Resolve and rewrite every helper the rewriter has recorded.
///
/// `row` is the method being vectorized; a row function calling itself
/// through the receiver resolves to its own rewritten copy and is skipped.
/// The result is in the class's declaration order.
pub fn collect_helpers(
    source: &SourceUnit,
    class: ClassId,
    row: Name,
    rewriter: &mut CallRewriter<'_>,
    dst: &mut ExprArena,
    interner: &StringInterner,
) -> Result<Vec<CollectedHelper>, TransformError> {
    let members = source.members(class);
    let mut rewritten: FxHashMap<Name, FunctionId> = FxHashMap::default();

    let mut next = 0;
    while let Some(&name) = rewriter.helpers().names().get(next) {
        next += 1;
        if name == row {
            continue;
        }
        let first_use = rewriter.helpers().first_use(name).unwrap_or(Span::DUMMY);
        let member = resolve(source, class, &members, name, first_use, interner)?;
        let function = rewriter.rewrite_method(member.function, dst)?;
        rewritten.insert(name, function);
    }

    let collected: Vec<CollectedHelper> = members
        .iter()
        .filter_map(|member| {
            rewritten.get(&member.name).map(|&function| CollectedHelper {
                name: member.name,
                function,
            })
        })
        .collect();
    debug!(helpers = collected.len(), "collected helpers");
    Ok(collected)
}

fn resolve(
    source: &SourceUnit,
    class: ClassId,
    members: &[Member],
    name: Name,
    first_use: Span,
    interner: &StringInterner,
) -> Result<Member, TransformError> {
    let matches: Vec<&Member> = members.iter().filter(|m| m.name == name).collect();
    match matches.as_slice() {
        [member] => Ok(**member),
        [] => Err(TransformError::UnresolvedHelper {
            name: interner.lookup(name).to_owned(),
            unit: interner.lookup(source.arena.get_class(class).name).to_owned(),
            span: first_use,
        }),
        _ => Err(TransformError::Lookup {
            target: LookupTarget::Helper,
            name: interner.lookup(name).to_owned(),
            scope: format!(
                "class `{}`",
                interner.lookup(source.arena.get_class(class).name)
            ),
            matches: matches.iter().map(|m| m.span).collect(),
            span: first_use,
        }),
    }
}
