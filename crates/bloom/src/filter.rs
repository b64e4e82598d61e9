//! Fixed-size Bloom filter

use fixedbitset::FixedBitSet;

use crate::error::{FilterError, Result};
use crate::estimate::estimate_parameters;
use crate::hash::{BaseHashes, base_hashes, location};

/// Number of bits held by one word of [`BloomFilter::from_words`] input
const WORD_BITS: usize = u64::BITS as usize;

/// A Bloom filter of `m` bits probed `k` times per item.
///
/// Membership tests have one-sided error: a negative answer is definitive, a
/// positive answer may be a false positive. Individual items cannot be
/// removed; [`clear_all`](Self::clear_all) resets the whole filter.
///
/// `m` and `k` are fixed for the lifetime of the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(into = "FilterWords", try_from = "FilterWords"))]
pub struct BloomFilter {
    m: usize,
    k: usize,
    bits: FixedBitSet,
}

impl BloomFilter {
    /// Create an empty filter with `m` bits and `k` probes.
    ///
    /// Both parameters are clamped to at least one.
    pub fn new(m: usize, k: usize) -> Self {
        let m = m.max(1);
        Self {
            m,
            k: k.max(1),
            bits: FixedBitSet::with_capacity(m),
        }
    }

    /// Wrap pre-existing bit data.
    ///
    /// The filter holds `64 * words.len()` bits (at least one), with bit `j` of
    /// `words[i]` becoming filter bit `64 * i + j`.
    pub fn from_words(words: &[u64], k: usize) -> Self {
        let mut filter = Self::new(words.len() * WORD_BITS, k);
        filter.insert_words(words);
        filter
    }

    /// Restore a filter of exactly `m` bits and `k` probes from the output of
    /// [`to_words`](Self::to_words).
    ///
    /// Unlike [`from_words`](Self::from_words) nothing is clamped: fails if
    /// `m` or `k` is zero, if there are not exactly `ceil(m / 64)` words, or
    /// if a bit at or beyond `m` is set.
    pub fn with_words(m: usize, k: usize, words: &[u64]) -> Result<Self> {
        if m == 0 {
            return Err(FilterError::InvalidData("m must be at least 1"));
        }
        if k == 0 {
            return Err(FilterError::InvalidData("k must be at least 1"));
        }
        if words.len() != m.div_ceil(WORD_BITS) {
            return Err(FilterError::InvalidData("word count does not match m"));
        }

        let tail = m % WORD_BITS;
        if tail != 0 && words.last().is_some_and(|last| last >> tail != 0) {
            return Err(FilterError::InvalidData("bit set beyond m"));
        }

        let mut filter = Self::new(m, k);
        filter.insert_words(words);
        Ok(filter)
    }

    /// Create a filter sized for about `n` items at false positive rate `p`.
    ///
    /// See [`estimate_parameters`] for the sizing formulas.
    pub fn with_estimates(n: usize, p: f64) -> Self {
        let (m, k) = estimate_parameters(n, p);
        Self::new(m, k)
    }

    /// The number of bits, `m`
    #[inline(always)]
    pub const fn capacity(&self) -> usize {
        self.m
    }

    /// The number of probes per item, `k`
    #[inline(always)]
    pub const fn hash_count(&self) -> usize {
        self.k
    }

    /// Add `data` to the filter. Returns the filter to allow chaining.
    pub fn add(&mut self, data: impl AsRef<[u8]>) -> &mut Self {
        let h = base_hashes(data.as_ref());
        for i in 0..self.k as u64 {
            let bit = self.position(&h, i);
            self.bits.insert(bit);
        }
        self
    }

    /// Test whether `data` may be in the filter.
    ///
    /// `false` means `data` was definitely never added. `true` may be a false
    /// positive.
    pub fn test(&self, data: impl AsRef<[u8]>) -> bool {
        let h = base_hashes(data.as_ref());
        (0..self.k as u64).all(|i| self.bits.contains(self.position(&h, i)))
    }

    /// Test for `data` and then add it, hashing only once.
    ///
    /// Returns the membership result from before the insertion.
    pub fn test_and_add(&mut self, data: impl AsRef<[u8]>) -> bool {
        let h = base_hashes(data.as_ref());
        let mut present = true;
        for i in 0..self.k as u64 {
            let bit = self.position(&h, i);
            if !self.bits.put(bit) {
                present = false;
            }
        }
        present
    }

    /// Test raw probe locations as returned by [`locations`](crate::locations).
    ///
    /// Each location is reduced modulo this filter's capacity.
    pub fn test_locations(&self, locations: &[u64]) -> bool {
        locations
            .iter()
            .all(|loc| self.bits.contains((loc % self.m as u64) as usize))
    }

    /// Merge `other` into this filter with a bitwise OR.
    ///
    /// Fails if `m` or `k` differ; the filter is left untouched in that case.
    pub fn merge(&mut self, other: &Self) -> Result<()> {
        if self.m != other.m {
            return Err(FilterError::parameter_mismatch("m", self.m, other.m));
        }
        if self.k != other.k {
            return Err(FilterError::parameter_mismatch("k", self.k, other.k));
        }

        self.bits.union_with(&other.bits);
        Ok(())
    }

    /// Clear every bit. Returns the filter to allow chaining.
    pub fn clear_all(&mut self) -> &mut Self {
        self.bits.clear();
        self
    }

    /// Whether no bit is set
    pub fn is_empty(&self) -> bool {
        self.bits.is_clear()
    }

    /// The number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones(..)
    }

    /// The bit array as 64-bit words, the inverse of [`from_words`](Self::from_words).
    pub fn to_words(&self) -> Vec<u64> {
        let mut words = vec![0u64; self.m.div_ceil(WORD_BITS)];
        for bit in self.bits.ones() {
            words[bit / WORD_BITS] |= 1 << (bit % WORD_BITS);
        }
        words
    }

    #[inline(always)]
    fn position(&self, h: &BaseHashes, i: u64) -> usize {
        (location(h, i) % self.m as u64) as usize
    }

    /// Set bit `64 * i + j` for every set bit `j` of `words[i]`. Every such
    /// bit must lie below `m`.
    fn insert_words(&mut self, words: &[u64]) {
        for (i, &word) in words.iter().enumerate() {
            let mut word = word;
            while word != 0 {
                self.bits.insert(i * WORD_BITS + word.trailing_zeros() as usize);
                word &= word - 1;
            }
        }
    }
}

/// Serialized form of a [`BloomFilter`]
#[cfg(feature = "serde")]
#[derive(serde::Serialize, serde::Deserialize)]
struct FilterWords {
    m: usize,
    k: usize,
    words: Vec<u64>,
}

#[cfg(feature = "serde")]
impl From<BloomFilter> for FilterWords {
    fn from(filter: BloomFilter) -> Self {
        Self {
            words: filter.to_words(),
            m: filter.m,
            k: filter.k,
        }
    }
}

#[cfg(feature = "serde")]
impl TryFrom<FilterWords> for BloomFilter {
    type Error = FilterError;

    fn try_from(raw: FilterWords) -> Result<Self> {
        Self::with_words(raw.m, raw.k, &raw.words)
    }
}
