//! Bloom filter sizing

use std::f64::consts::LN_2;

use byteorder::{BigEndian, ByteOrder};

use crate::filter::BloomFilter;

/// Number of disjoint keys probed by [`BloomFilter::estimate_false_positive_rate`]
const FALSE_POSITIVE_ROUNDS: u32 = 100_000;

/// Estimate the bit count `m` and probe count `k` for a filter expected to
/// hold `n` items with false positive probability `p` (`0 < p < 1`).
///
/// Uses the standard optimal sizing formulas, rounded up:
///
/// ```text
/// m = ceil(-n * ln(p) / ln(2)^2)
/// k = ceil(ln(2) * m / n)
/// ```
///
/// Degenerate inputs (`n == 0`, or `p` outside the open unit interval) yield
/// parameters clamped to at least one.
pub fn estimate_parameters(n: usize, p: f64) -> (usize, usize) {
    let n = n as f64;
    let m = (-n * p.ln() / (LN_2 * LN_2)).ceil();
    let k = (LN_2 * m / n).ceil();

    // Float to int casts saturate, and NaN becomes zero
    ((m as usize).max(1), (k as usize).max(1))
}

impl BloomFilter {
    /// Measure the false positive rate this filter's `m` and `k` give when
    /// storing `n` items.
    ///
    /// Clears the filter, adds the big-endian encodings of `0..n`, then tests
    /// 100 000 keys that were never added and returns the fraction reported
    /// present. The filter is cleared again before returning.
    pub fn estimate_false_positive_rate(&mut self, n: u32) -> f64 {
        let mut key = [0u8; 4];

        self.clear_all();
        for i in 0..n {
            BigEndian::write_u32(&mut key, i);
            self.add(key);
        }

        let mut false_positives = 0u32;
        for i in 0..FALSE_POSITIVE_ROUNDS {
            BigEndian::write_u32(&mut key, i.wrapping_add(n).wrapping_add(1));
            if self.test(key) {
                false_positives += 1;
            }
        }

        self.clear_all();
        f64::from(false_positives) / f64::from(FALSE_POSITIVE_ROUNDS)
    }
}
