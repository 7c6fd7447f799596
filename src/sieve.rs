use std::sync::atomic::{AtomicBool, Ordering};

/// Primality flags for every integer in `[0, limit]`, shared by the producer
/// and the worker pool while the sieve runs.
///
/// - Entry `i` starts `true` and only ever moves to `false`
/// - Indices 0 and 1 are placeholders and never counted
/// - Writers never read before writing, so concurrent marks of the same
///   index are idempotent and need no lock
pub struct SieveArray {
    flags: Vec<AtomicBool>,
}

impl SieveArray {
    pub fn new(limit: usize) -> Self {
        let flags = (0..=limit).map(|_| AtomicBool::new(true)).collect();
        Self { flags }
    }

    /// Whether `index` has not yet been struck out.
    #[inline]
    pub fn is_candidate(&self, index: usize) -> bool {
        self.flags[index].load(Ordering::Relaxed)
    }

    /// Unconditionally marks `index` as composite.
    #[inline]
    pub fn mark_composite(&self, index: usize) {
        // Plain store, never a compare: a mark must not depend on what another
        // thread already wrote. Visibility to the aggregator comes from join().
        self.flags[index].store(false, Ordering::Relaxed);
    }

    /// Marks `start, start + step, ...` up to and including `end`.
    pub fn mark_multiples(&self, start: usize, step: usize, end: usize) {
        for index in (start..=end).step_by(step) {
            self.mark_composite(index);
        }
    }

    /// Counts primes in `[2, limit]`.
    ///
    /// Takes `&mut self` so it can only run once no worker holds a reference.
    pub fn count_primes(&mut self) -> usize {
        self.flags
            .iter_mut()
            .skip(2)
            .map(AtomicBool::get_mut)
            .filter(|prime| **prime)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_array_is_all_candidates() {
        let sieve = SieveArray::new(10);
        assert!((0..=10).all(|i| sieve.is_candidate(i)));
    }

    #[test]
    fn test_count_skips_placeholders() {
        assert_eq!(SieveArray::new(0).count_primes(), 0);
        assert_eq!(SieveArray::new(1).count_primes(), 0);
        assert_eq!(SieveArray::new(2).count_primes(), 1);
        // Nothing struck out yet: 2..=10 are all still candidates
        assert_eq!(SieveArray::new(10).count_primes(), 9);
    }

    #[test]
    fn test_marking_is_monotonic() {
        let mut sieve = SieveArray::new(30);

        sieve.mark_composite(12);
        sieve.mark_composite(12);
        assert!(!sieve.is_candidate(12));

        // 12 is a multiple of both 2 and 3; marking it again via either keeps it false
        sieve.mark_multiples(4, 2, 30);
        sieve.mark_multiples(6, 3, 30);
        assert!(!sieve.is_candidate(12));
        assert!(!sieve.is_candidate(30));
        assert!(sieve.is_candidate(29));

        let primes_left = sieve.count_primes();
        sieve.mark_multiples(4, 2, 30);
        assert_eq!(sieve.count_primes(), primes_left);
    }

    #[test]
    fn test_mark_multiples_bounds() {
        let sieve = SieveArray::new(20);

        // Start past the end marks nothing
        sieve.mark_multiples(21, 7, 20);
        assert!((0..=20).all(|i| sieve.is_candidate(i)));

        // End is inclusive
        sieve.mark_multiples(14, 3, 20);
        assert!(!sieve.is_candidate(14));
        assert!(!sieve.is_candidate(17));
        assert!(!sieve.is_candidate(20));
        assert!(sieve.is_candidate(15));
    }

    #[test]
    fn test_mark_multiples_near_usize_max_does_not_overflow() {
        // step_by over an inclusive range stops cleanly at the end bound
        let sieve = SieveArray::new(8);
        sieve.mark_multiples(8, usize::MAX, 8);
        assert!(!sieve.is_candidate(8));
    }
}
