//! Arena configuration parameters.

/// Configuration for the storage providers.
///
/// Controls the initial buffer size and an optional growth ceiling.
/// Validated when an allocator is built from it; immutable afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArenaConfig {
    /// Number of element slots in the first buffer.
    ///
    /// Default: 10.
    pub initial_capacity: usize,

    /// Upper bound on the number of slots the buffer may grow to.
    ///
    /// Default: `None` (bounded only by available memory). When set, a
    /// request that cannot fit under the ceiling fails with
    /// `ResourceExhausted` and leaves the allocator untouched.
    pub max_capacity: Option<usize>,
}

impl ArenaConfig {
    /// Default initial capacity in element slots.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 10;

    /// Create a config with the given initial capacity and no ceiling.
    pub fn new(initial_capacity: usize) -> Self {
        Self {
            initial_capacity,
            max_capacity: None,
        }
    }

    /// Cap growth at `max_capacity` slots.
    pub fn with_max_capacity(mut self, max_capacity: usize) -> Self {
        self.max_capacity = Some(max_capacity);
        self
    }

    /// The growth ceiling, `usize::MAX` when unbounded.
    pub fn limit(&self) -> usize {
        self.max_capacity.unwrap_or(usize::MAX)
    }
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self::new(Self::DEFAULT_INITIAL_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_initial_capacity_is_ten() {
        let config = ArenaConfig::default();
        assert_eq!(config.initial_capacity, 10);
        assert_eq!(config.max_capacity, None);
    }

    #[test]
    fn unbounded_limit_is_usize_max() {
        assert_eq!(ArenaConfig::new(4).limit(), usize::MAX);
    }

    #[test]
    fn max_capacity_preserved() {
        let config = ArenaConfig::new(4).with_max_capacity(64);
        assert_eq!(config.limit(), 64);
        assert_eq!(config.initial_capacity, 4);
    }
}
