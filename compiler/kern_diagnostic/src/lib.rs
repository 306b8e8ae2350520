//! Diagnostics for every stage of the transformer.
//!
//! A [`Diagnostic`] carries:
//! - an [`ErrorCode`] for searchability
//! - a message saying what went wrong
//! - labeled spans saying where
//! - notes and suggestions
//!
//! Stage-specific error enums (`LexError`, `ParseError`, `TransformError`,
//! `EvalError`) live in their own crates and convert into `Diagnostic` for
//! rendering.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod span_utils;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use error_code::ErrorCode;
