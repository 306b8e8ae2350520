use std::fmt;

/// Recursion depth exceeded the configured limit.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct DepthExceeded {
    pub limit: u32,
}

impl fmt::Display for DepthExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "maximum recursion depth of {} exceeded", self.limit)
    }
}

impl std::error::Error for DepthExceeded {}

/// Counts active nested calls against a fixed limit.
///
/// Every successful [`enter`](Self::enter) must be paired with an
/// [`exit`](Self::exit).
#[derive(Copy, Clone, Debug)]
pub struct DepthCounter {
    depth: u32,
    limit: u32,
}

impl DepthCounter {
    /// Default user-level call depth, the limit Python programs are written
    /// against.
    pub const DEFAULT_LIMIT: u32 = 1000;

    pub const fn new(limit: u32) -> Self {
        DepthCounter { depth: 0, limit }
    }

    pub fn enter(&mut self) -> Result<(), DepthExceeded> {
        if self.depth >= self.limit {
            return Err(DepthExceeded { limit: self.limit });
        }
        self.depth += 1;
        Ok(())
    }

    pub fn exit(&mut self) {
        debug_assert!(self.depth > 0, "unbalanced DepthCounter::exit");
        self.depth = self.depth.saturating_sub(1);
    }

    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for DepthCounter {
    fn default() -> Self {
        Self::new(Self::DEFAULT_LIMIT)
    }
}

#[cfg(test)]
mod tests;
