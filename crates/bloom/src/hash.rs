//! Probe position derivation
//!
//! Two MurmurHash3 x64/128 digests are taken per item: one over the raw bytes
//! and one over the raw bytes followed by a single marker byte. Their four
//! 64-bit halves feed the enhanced double hashing scheme below, which behaves
//! like `k` independent hash functions.

use crate::murmur::murmur3_x64_128;

/// Byte appended to the input for the second base digest
const MARKER: u8 = 1;

/// The four 64-bit base hash values of an item
pub(crate) type BaseHashes = [u64; 4];

/// Compute the base hash values used to derive every probe position.
pub(crate) fn base_hashes(data: &[u8]) -> BaseHashes {
    let (h0, h1) = murmur3_x64_128(data, 0);

    let mut marked = Vec::with_capacity(data.len() + 1);
    marked.extend_from_slice(data);
    marked.push(MARKER);
    let (h2, h3) = murmur3_x64_128(&marked, 0);

    [h0, h1, h2, h3]
}

/// The `i`-th probe location before reduction modulo the filter size.
///
/// Overflow wraps; it is part of the scheme.
#[inline]
pub(crate) const fn location(h: &BaseHashes, i: u64) -> u64 {
    let step = h[2 + (((i + (i % 2)) % 4) / 2) as usize];
    h[(i % 2) as usize].wrapping_add(i.wrapping_mul(step))
}

/// Return the `k` raw probe locations for `data`.
///
/// The values are not reduced modulo any filter size, so they can be stored
/// and later checked against a filter of any capacity with
/// [`BloomFilter::test_locations`](crate::BloomFilter::test_locations).
pub fn locations(data: impl AsRef<[u8]>, k: usize) -> Vec<u64> {
    let h = base_hashes(data.as_ref());
    (0..k as u64).map(|i| location(&h, i)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_hashes() {
        let h = base_hashes(b"hello");
        assert_eq!(
            h,
            [
                0xcbd8_a7b3_41bd_9b02,
                0x5b1e_906a_48ae_1d19,
                0xb8ea_181a_11c6_bf22,
                0x5e83_9703_b348_769c,
            ]
        );
    }

    #[test]
    fn test_locations() {
        let locs = locations(b"hello", 4);
        assert_eq!(
            locs,
            vec![
                0xcbd8_a7b3_41bd_9b02,
                0xb9a2_276d_fbf6_93b5,
                0x88df_d5ba_a84e_883a,
                0x85dc_d8b8_7e02_5a7f,
            ]
        );
    }

    #[test]
    fn test_locations_prefix_stable() {
        // Asking for more probes never changes the earlier ones
        let short = locations(b"prefix", 3);
        let long = locations(b"prefix", 7);
        assert_eq!(short[..], long[..3]);
    }

    #[test]
    fn test_zero_probes() {
        assert!(locations(b"anything", 0).is_empty());
    }
}
