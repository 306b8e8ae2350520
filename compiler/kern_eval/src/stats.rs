//! Call and store counters.

use rustc_hash::FxHashMap;

use kern_ir::Name;

/// What an evaluation did, by name.
///
/// `calls` counts invocations of user-defined functions (methods included)
/// by function name; `stores` counts `name[index] = value` writes by the
/// name of the written container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CallStats {
    calls: FxHashMap<Name, usize>,
    stores: FxHashMap<Name, usize>,
}

impl CallStats {
    pub fn calls(&self, function: Name) -> usize {
        self.calls.get(&function).copied().unwrap_or(0)
    }

    pub fn stores(&self, container: Name) -> usize {
        self.stores.get(&container).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.values().sum()
    }

    pub(crate) fn record_call(&mut self, function: Name) {
        *self.calls.entry(function).or_default() += 1;
    }

    pub(crate) fn record_store(&mut self, container: Name) {
        *self.stores.entry(container).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use kern_ir::StringInterner;

    use super::CallStats;

    #[test]
    fn test_counts_by_name() {
        let interner = StringInterner::new();
        let (f, g, out) = (
            interner.intern("f"),
            interner.intern("g"),
            interner.intern("out"),
        );
        let mut stats = CallStats::default();
        stats.record_call(f);
        stats.record_call(f);
        stats.record_call(g);
        stats.record_store(out);

        assert_eq!(stats.calls(f), 2);
        assert_eq!(stats.calls(g), 1);
        assert_eq!(stats.calls(out), 0);
        assert_eq!(stats.stores(out), 1);
        assert_eq!(stats.total_calls(), 3);
    }
}
