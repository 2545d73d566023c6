//! Test fixtures for strata development.
//!
//! Provides [`Tracked`], a value that records its own drops in a shared
//! [`DropLog`], so tests can assert exactly when an allocator or container
//! destroys the objects it holds. Also hosts [`FACTORIALS`], the expected
//! values for the factorial map scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::cell::RefCell;
use std::rc::Rc;

/// Shared record of dropped [`Tracked`] values, in drop order.
#[derive(Clone, Debug, Default)]
pub struct DropLog {
    dropped: Rc<RefCell<Vec<i64>>>,
}

impl DropLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a tracked value that reports to this log when dropped.
    pub fn track(&self, value: i64) -> Tracked {
        Tracked {
            value,
            log: self.clone(),
        }
    }

    /// Number of tracked values dropped so far.
    pub fn count(&self) -> usize {
        self.dropped.borrow().len()
    }

    /// Values dropped so far, in drop order.
    pub fn dropped(&self) -> Vec<i64> {
        self.dropped.borrow().clone()
    }
}

/// A value whose drop is observable through its [`DropLog`].
#[derive(Debug)]
pub struct Tracked {
    value: i64,
    log: DropLog,
}

impl Tracked {
    pub fn value(&self) -> i64 {
        self.value
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.log.dropped.borrow_mut().push(self.value);
    }
}

/// `0!` through `9!`.
pub const FACTORIALS: [u64; 10] = [1, 1, 2, 6, 24, 120, 720, 5_040, 40_320, 362_880];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_is_recorded() {
        let log = DropLog::new();
        let a = log.track(3);
        let b = log.track(7);
        assert_eq!(log.count(), 0);
        drop(b);
        drop(a);
        assert_eq!(log.dropped(), vec![7, 3]);
    }

    #[test]
    fn factorials_grow_by_index() {
        for (i, pair) in FACTORIALS.windows(2).enumerate() {
            assert_eq!(pair[1], pair[0] * (i as u64 + 1));
        }
    }
}
