//! Stack safety for the recursive stages: the parser descends once per
//! nesting level of the source, the evaluator once per call.
//!
//! - [`ensure_sufficient_stack`] grows the native stack on demand (`stacker`),
//!   so deeply nested source cannot overflow the parser.
//! - [`DepthCounter`] bounds user-level recursion in the evaluator, turning a
//!   runaway helper into an error instead of unbounded stack growth.
//!
//! Growth policy: keep a 128KB red zone, grow 1MB at a time.

mod depth;

pub use depth::{DepthCounter, DepthExceeded};

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 128 * 1024;

/// Size of each new stack segment.
const GROWTH: usize = 1024 * 1024;

/// Run `f`, first growing the stack if fewer than `RED_ZONE` bytes remain.
///
/// ```text
/// fn parse_unary(&mut self) -> ExprId {
///     ensure_sufficient_stack(|| { /* may recurse into parse_unary */ })
/// }
/// ```
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, GROWTH, f)
}

/// WASM manages its own stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
