//! Source loading: parse a description file and find the class and methods
//! the transformation works on.

use kern_ir::{
    ClassId, ExprArena, FunctionId, Module, Name, Span, StmtKind, StmtRange, StringInterner,
};
use tracing::debug;

use crate::{LookupTarget, TransformError};

/// A parsed description file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceUnit {
    pub module: Module,
    pub arena: ExprArena,
}

/// A method declared directly in a class body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub name: Name,
    pub function: FunctionId,
    /// Span of the `def` header.
    pub span: Span,
}

/// Parse `source`. Any syntax error fails the load; lookups never run on a
/// partially parsed file.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn load(source: &str, interner: &StringInterner) -> Result<SourceUnit, TransformError> {
    let output = kern_parse::parse_source(source, interner);
    if output.has_errors() {
        debug!(errors = output.errors.len(), "load failed");
        return Err(TransformError::Syntax(output.diagnostics()));
    }
    Ok(SourceUnit {
        module: output.module,
        arena: output.arena,
    })
}

impl SourceUnit {
    /// Top-level classes with their header spans, in declaration order.
    pub fn classes(&self) -> impl Iterator<Item = (ClassId, Span)> + '_ {
        self.arena
            .get_stmt_list(self.module.body)
            .iter()
            .filter_map(|&id| {
                let stmt = self.arena.get_stmt(id);
                match stmt.kind {
                    StmtKind::Class(class) => Some((class, stmt.span)),
                    _ => None,
                }
            })
    }

    /// Methods declared directly in `class`, in declaration order.
    pub fn members(&self, class: ClassId) -> Vec<Member> {
        defs_in(&self.arena, self.arena.get_class(class).body)
    }

    /// The single top-level class called `name`.
    pub fn find_unit(&self, name: &str, interner: &StringInterner) -> Result<ClassId, TransformError> {
        let wanted = interner.get(name);
        let matches: Vec<(ClassId, Span)> = self
            .classes()
            .filter(|&(class, _)| Some(self.arena.get_class(class).name) == wanted)
            .collect();

        match matches.as_slice() {
            [(class, _)] => Ok(*class),
            _ => Err(TransformError::Lookup {
                target: LookupTarget::Unit,
                name: name.to_owned(),
                scope: "module".to_owned(),
                span: matches.first().map_or(Span::DUMMY, |&(_, span)| span),
                matches: matches.into_iter().map(|(_, span)| span).collect(),
            }),
        }
    }

    /// The single method of `class` called `name`.
    pub fn find_member(
        &self,
        class: ClassId,
        name: &str,
        target: LookupTarget,
        interner: &StringInterner,
    ) -> Result<FunctionId, TransformError> {
        let wanted = interner.get(name);
        let matches: Vec<Member> = self
            .members(class)
            .into_iter()
            .filter(|member| Some(member.name) == wanted)
            .collect();

        match matches.as_slice() {
            [member] => Ok(member.function),
            _ => {
                let class_def = self.arena.get_class(class);
                Err(TransformError::Lookup {
                    target,
                    name: name.to_owned(),
                    scope: format!("class `{}`", interner.lookup(class_def.name)),
                    span: self.class_header(class).unwrap_or(class_def.span),
                    matches: matches.iter().map(|member| member.span).collect(),
                })
            }
        }
    }

    fn class_header(&self, class: ClassId) -> Option<Span> {
        self.classes()
            .find(|&(id, _)| id == class)
            .map(|(_, span)| span)
    }
}

/// `def` statements of a block, without descending into nested blocks.
pub(crate) fn defs_in(arena: &ExprArena, block: StmtRange) -> Vec<Member> {
    arena
        .get_stmt_list(block)
        .iter()
        .filter_map(|&id| {
            let stmt = arena.get_stmt(id);
            match stmt.kind {
                StmtKind::Def(function) => Some(Member {
                    name: arena.get_function(function).name,
                    function,
                    span: stmt.span,
                }),
                _ => None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests;
