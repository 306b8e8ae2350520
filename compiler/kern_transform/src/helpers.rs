//! The set of helper names a row function calls through its receiver.

use kern_ir::{Name, Span};
use rustc_hash::FxHashMap;

/// Distinct helper names in first-use order, each with the span of its
/// first call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HelperSet {
    names: Vec<Name>,
    first_use: FxHashMap<Name, Span>,
}

impl HelperSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a call to `name`. Returns `false` if it was already known.
    pub fn insert(&mut self, name: Name, span: Span) -> bool {
        if self.first_use.contains_key(&name) {
            return false;
        }
        self.first_use.insert(name, span);
        self.names.push(name);
        true
    }

    pub fn contains(&self, name: Name) -> bool {
        self.first_use.contains_key(&name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in first-use order.
    pub fn names(&self) -> &[Name] {
        &self.names
    }

    pub fn iter(&self) -> impl Iterator<Item = Name> + '_ {
        self.names.iter().copied()
    }

    pub fn first_use(&self, name: Name) -> Option<Span> {
        self.first_use.get(&name).copied()
    }
}
