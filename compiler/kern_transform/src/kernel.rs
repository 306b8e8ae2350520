//! The synthesized kernel.

use kern_ir::{ExprArena, FunctionDef, FunctionId, Module, Name, Param, StmtId};

/// A kernel function and the arena that owns it.
///
/// Nothing in `arena` points back into the source it was built from.
/// `module` wraps the kernel in a one-statement module so it can be printed
/// or evaluated like a parsed file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Kernel {
    pub arena: ExprArena,
    pub module: Module,
    pub function: FunctionId,
    pub name: Name,
    /// The rewritten row function nested in the kernel.
    pub row_function: Name,
    /// Helper functions nested in the kernel, in emission order.
    pub helpers: Vec<Name>,
    pub inputs: Vec<Name>,
    pub outputs: Vec<Name>,
}

impl Kernel {
    pub fn definition(&self) -> &FunctionDef {
        self.arena.get_function(self.function)
    }

    /// Inputs followed by outputs.
    pub fn params(&self) -> &[Param] {
        self.arena.get_params(self.definition().params)
    }

    pub fn body(&self) -> &[StmtId] {
        self.arena.get_stmt_list(self.definition().body)
    }
}
