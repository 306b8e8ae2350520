//! Focused traits for node access.

use super::{Name, Span};

/// Types that have a source location span.
pub trait Spanned {
    fn span(&self) -> Span;
}

/// Types that have a declared name.
pub trait Named {
    fn name(&self) -> Name;
}
