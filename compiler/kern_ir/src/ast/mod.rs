//! Flat AST types using arena allocation.
//!
//! The tree models the subset of Python that row-function descriptions are
//! written in: classes, `def`, assignments, `return`, `for`, `if`, calls and
//! arithmetic. Children are ids into an [`ExprArena`](crate::ExprArena).
//!
//! # Module Structure
//!
//! - `expr`: expressions (`Expr`, `ExprKind`)
//! - `operators`: binary and unary operators
//! - `stmt`: statements
//! - `items`: functions, classes, parameters, imports, the module root
//! - `call`: the tagged view of a call's target used by the rewriter

mod call;
mod expr;
mod items;
mod operators;
mod stmt;

pub use call::{CallArg, CallTarget};
pub use expr::{Expr, ExprKind};
pub use items::{ClassDef, FunctionDef, ImportDef, ImportItem, Module, Param};
pub use operators::{BinaryOp, UnaryOp};
pub use stmt::{Stmt, StmtKind};
