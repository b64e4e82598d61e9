//! Bloom filters for hash-tree membership indexes
//!
//! This crate provides a fixed-size Bloom filter whose `k` probe positions are
//! derived from two MurmurHash3 x64/128 digests using enhanced double hashing
//! (Kirsch–Mitzenmacher), so only two real hashes are computed per item no
//! matter how many probes the filter uses.
//!
//! ## Usage
//!
//! ```
//! use thicket_bloom::BloomFilter;
//!
//! // Sized for 1000 items at a 1% false positive rate
//! let mut filter = BloomFilter::with_estimates(1000, 0.01);
//! filter.add(b"apple").add(b"banana");
//!
//! assert!(filter.test(b"apple"));
//! assert!(filter.test(b"banana"));
//!
//! // Filters with identical parameters can be merged
//! let mut other = BloomFilter::new(filter.capacity(), filter.hash_count());
//! other.add(b"cherry");
//! filter.merge(&other).unwrap();
//! assert!(filter.test(b"cherry"));
//! ```

pub mod error;
mod estimate;
mod filter;
mod hash;
mod murmur;

pub use error::{FilterError, Result};
pub use estimate::estimate_parameters;
pub use filter::BloomFilter;
pub use hash::locations;
