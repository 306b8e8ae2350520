//! Kern IR - Intermediate Representation Types
//!
//! This crate contains the core data structures shared by every stage of the
//! row-function transformer:
//! - Spans for source locations
//! - Names for interned identifiers
//! - Tokens and `TokenList` for lexer output
//! - AST nodes (Expr, Stmt, `FunctionDef`, `ClassDef`, ...)
//! - Arena allocation for all nodes
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers and string literals are `Name(u32)`
//! - **Flatten Everything**: no `Box<Expr>`, children are `ExprId(u32)` indices
//! - **Own Your Arena**: a tree never points into another arena; moving a node
//!   between trees means copying it
//!
//! Floats are stored as u64 bits so every node is `Eq + Hash`.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod ids;
mod interner;
mod name;
mod span;
mod token;
mod traits;
pub mod visitor;

pub use arena::ExprArena;
pub use ast::{
    BinaryOp, CallArg, CallTarget, ClassDef, Expr, ExprKind, FunctionDef, ImportDef, ImportItem,
    Module, Param, Stmt, StmtKind, UnaryOp,
};
pub use ids::{
    CallArgRange, ClassId, ExprId, ExprRange, FunctionId, ImportId, ParamRange, StmtId, StmtRange,
};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use span::{Span, SpanError};
pub use token::{Token, TokenKind, TokenList};
pub use traits::{Named, Spanned};
