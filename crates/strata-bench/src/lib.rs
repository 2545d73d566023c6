//! Benchmark inputs for the strata workspace.
//!
//! - [`scattered_keys`]: a deterministic permutation of `0..n`, so map
//!   benchmarks insert in a non-sorted order without an RNG dependency.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

/// Every key in `0..n` exactly once, in a scattered but reproducible order.
///
/// Walks `0..n` with a stride coprime to `n`.
pub fn scattered_keys(n: u64) -> Vec<u64> {
    if n == 0 {
        return Vec::new();
    }
    let mut stride = (n / 2 + 1) | 1;
    while gcd(stride, n) != 1 {
        stride += 2;
    }
    (0..n).map(|i| (i * stride) % n).collect()
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scattered_keys_is_a_permutation() {
        for n in [0, 1, 2, 10, 1000, 1024] {
            let mut keys = scattered_keys(n);
            assert_eq!(keys.len() as u64, n);
            keys.sort_unstable();
            assert_eq!(keys, (0..n).collect::<Vec<_>>());
        }
    }

    #[test]
    fn scattered_keys_is_not_sorted() {
        let keys = scattered_keys(100);
        assert_ne!(keys, (0..100).collect::<Vec<_>>());
    }
}
