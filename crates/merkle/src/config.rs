//! Tree construction settings
//!
//! A [`TreeConfig`] decides whether a tree carries a Bloom filter on every
//! node. The hash policy is not part of the configuration: it is the `D` type
//! parameter of [`MerkleTree`](crate::MerkleTree) and [`TreeBuilder`].

use std::marker::PhantomData;

use digest::Digest;
use sha2::Sha256;

use crate::content::Content;
use crate::error::{Result, TreeError};
use crate::tree::MerkleTree;

/// Settings for the per-node Bloom filters
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BloomConfig {
    /// Target false positive probability, `0 < p < 1`
    pub false_positive_rate: f64,
}

impl BloomConfig {
    /// Create Bloom settings targeting false positive probability `p`
    pub const fn new(false_positive_rate: f64) -> Self {
        Self {
            false_positive_rate,
        }
    }

    /// Check that the target lies strictly between zero and one
    pub fn validate(&self) -> Result<()> {
        let p = self.false_positive_rate;
        if p > 0.0 && p < 1.0 {
            Ok(())
        } else {
            Err(TreeError::InvalidFalsePositiveRate(p))
        }
    }
}

/// How a tree is built
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TreeConfig {
    /// Bloom filter settings; `None` builds a tree without filters
    pub bloom: Option<BloomConfig>,
}

impl TreeConfig {
    /// A configuration with Bloom filters targeting false positive probability `p`
    pub const fn with_bloom(false_positive_rate: f64) -> Self {
        Self {
            bloom: Some(BloomConfig::new(false_positive_rate)),
        }
    }

    /// Whether trees built with this configuration carry Bloom filters
    pub const fn is_bloom_enabled(&self) -> bool {
        self.bloom.is_some()
    }

    /// Check every setting
    pub fn validate(&self) -> Result<()> {
        self.bloom.as_ref().map_or(Ok(()), BloomConfig::validate)
    }
}

/// Fluent construction of a [`MerkleTree`].
///
/// ```
/// use sha2::Sha512;
/// use thicket_merkle::{DigestContent, TreeBuilder};
///
/// let contents: Vec<DigestContent> = vec!["a".into(), "b".into(), "c".into()];
/// let tree = TreeBuilder::new()
///     .bloom_false_positive_rate(0.01)
///     .hash_policy::<Sha512>()
///     .build(contents)
///     .unwrap();
///
/// assert_eq!(tree.root_hash().len(), 64);
/// assert!(tree.is_bloom_enabled());
/// ```
pub struct TreeBuilder<D = Sha256> {
    config: TreeConfig,
    _hasher: PhantomData<fn() -> D>,
}

impl TreeBuilder {
    /// Start from the default configuration and SHA-256
    pub const fn new() -> Self {
        Self {
            config: TreeConfig { bloom: None },
            _hasher: PhantomData,
        }
    }
}

impl Default for TreeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Digest> TreeBuilder<D> {
    /// Replace the whole configuration
    pub const fn config(mut self, config: TreeConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach Bloom filters targeting false positive probability `p`
    pub const fn bloom_false_positive_rate(mut self, p: f64) -> Self {
        self.config.bloom = Some(BloomConfig::new(p));
        self
    }

    /// Build without Bloom filters
    pub const fn without_bloom(mut self) -> Self {
        self.config.bloom = None;
        self
    }

    /// Hash internal nodes with `H` instead
    pub fn hash_policy<H: Digest>(self) -> TreeBuilder<H> {
        TreeBuilder {
            config: self.config,
            _hasher: PhantomData,
        }
    }

    /// Build a tree over `contents`
    pub fn build<C: Content>(self, contents: Vec<C>) -> Result<MerkleTree<C, D>> {
        MerkleTree::with_config(contents, &self.config)
    }
}

impl<D> std::fmt::Debug for TreeBuilder<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
