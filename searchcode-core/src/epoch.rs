//! Request generations.
//!
//! Each logical stream (search, content, debounce timer) owns one
//! [`EpochCounter`]. Every issued request is tagged with the epoch returned by
//! [`EpochCounter::advance`]; a completion is applied only if its tag is still
//! [`EpochCounter::current`].

use std::fmt;

/// Generation tag of one issued request. Zero means "nothing issued yet".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Epoch(u64);

impl Epoch {
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Epoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic epoch source for a single stream.
#[derive(Debug, Default)]
pub struct EpochCounter {
    current: Epoch,
}

impl EpochCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new generation, superseding every earlier one.
    pub fn advance(&mut self) -> Epoch {
        self.current = Epoch(self.current.0.wrapping_add(1));
        self.current
    }

    pub fn current(&self) -> Epoch {
        self.current
    }

    /// `true` when `epoch` belongs to the most recent generation.
    pub fn is_current(&self, epoch: Epoch) -> bool {
        self.current == epoch
    }
}
