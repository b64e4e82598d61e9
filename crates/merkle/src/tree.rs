//! Tree construction
//!
//! Leaves are hashed from their content in input order. An odd leaf count is
//! made even by appending a duplicate of the last leaf. Levels are then paired
//! `(2i, 2i + 1)` bottom-up until a single root remains; a level that is still
//! odd pairs its last node with itself. Each parent hashes the concatenation of
//! its children's hashes, left first, and when Bloom filters are enabled its
//! filter is the union of its children's filters.

use std::fmt;
use std::marker::PhantomData;

use bytes::Bytes;
use digest::Digest;
use sha2::Sha256;
use thicket_bloom::{BloomFilter, estimate_parameters};
use tracing::debug;

use crate::config::TreeConfig;
use crate::content::Content;
use crate::error::{Result, TreeError};
use crate::node::{Node, NodeId};

/// A Merkle tree over an ordered sequence of [`Content`] items.
///
/// `D` is the hash policy used to combine child hashes into parent hashes.
/// Leaf hashes come from [`Content::digest`].
///
/// A tree is immutable once built. To change its contents build a new tree,
/// for example from [`contents`](Self::contents).
pub struct MerkleTree<C, D = Sha256> {
    /// Node arena; leaves first, root last
    pub(crate) nodes: Vec<Node>,
    pub(crate) root: NodeId,
    pub(crate) root_hash: Bytes,
    /// Number of leaves, including the duplicate
    pub(crate) leaf_count: usize,
    pub(crate) contents: Vec<C>,
    /// Bloom parameters `(m, k)` shared by every node's filter
    pub(crate) bloom: Option<(usize, usize)>,
    depth: usize,
    _hasher: PhantomData<fn() -> D>,
}

impl<C: Content> MerkleTree<C> {
    /// Build a tree over `contents` using SHA-256 and no Bloom filters.
    pub fn new(contents: Vec<C>) -> Result<Self> {
        Self::with_config(contents, &TreeConfig::default())
    }

    /// Build a tree over `contents` using SHA-256, with a Bloom filter on every
    /// node sized for false positive probability `p`.
    pub fn with_bloom_filter(contents: Vec<C>, p: f64) -> Result<Self> {
        Self::with_config(contents, &TreeConfig::with_bloom(p))
    }
}

impl<C: Content, D: Digest> MerkleTree<C, D> {
    /// Build a tree over `contents` hashing internal nodes with `D`.
    pub fn with_hash_policy(contents: Vec<C>) -> Result<Self> {
        Self::with_config(contents, &TreeConfig::default())
    }

    /// Build a tree over `contents` hashing internal nodes with `D`, with a
    /// Bloom filter on every node sized for false positive probability `p`.
    pub fn with_hash_policy_and_bloom_filter(contents: Vec<C>, p: f64) -> Result<Self> {
        Self::with_config(contents, &TreeConfig::with_bloom(p))
    }

    /// Build a tree over `contents` as described by `config`.
    ///
    /// Fails with [`TreeError::NoContents`] if `contents` is empty. Bloom
    /// filters, when enabled, are sized for `contents.len()` items.
    pub fn with_config(contents: Vec<C>, config: &TreeConfig) -> Result<Self> {
        config.validate()?;
        if contents.is_empty() {
            return Err(TreeError::NoContents);
        }

        let bloom = config
            .bloom
            .map(|bloom| estimate_parameters(contents.len(), bloom.false_positive_rate));

        let mut nodes = Vec::with_capacity(2 * contents.len() + 2);
        for (index, content) in contents.iter().enumerate() {
            let hash = content.digest().map_err(TreeError::content)?;
            nodes.push(Node::leaf(hash, index, false, bloom));
        }

        if contents.len() % 2 == 1 {
            let last = contents.len() - 1;
            let hash = nodes[last].hash.clone();
            nodes.push(Node::leaf(hash, last, true, bloom));
        }
        let leaf_count = nodes.len();

        debug!(
            "Building merkle tree over {} contents ({} leaves, bloom {:?})",
            contents.len(),
            leaf_count,
            bloom
        );

        let (root, depth) = build_levels::<D>(&mut nodes)?;
        let root_hash = nodes[root.0].hash.clone();

        debug!("Built merkle tree with {} nodes over {} levels", nodes.len(), depth);

        Ok(Self {
            nodes,
            root,
            root_hash,
            leaf_count,
            contents,
            bloom,
            depth,
            _hasher: PhantomData,
        })
    }
}

impl<C, D> MerkleTree<C, D> {
    /// The root hash committing to every leaf
    #[inline(always)]
    pub const fn root_hash(&self) -> &Bytes {
        &self.root_hash
    }

    /// The number of leaves, including the duplicate added for odd counts
    #[inline(always)]
    pub const fn leaf_count(&self) -> usize {
        self.leaf_count
    }

    /// The number of levels above the leaves
    #[inline(always)]
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// The contents the tree was built from, in order
    #[inline(always)]
    pub fn contents(&self) -> &[C] {
        &self.contents
    }

    /// Whether every node carries a Bloom filter
    #[inline(always)]
    pub const fn is_bloom_enabled(&self) -> bool {
        self.bloom.is_some()
    }

    /// The `(m, k)` parameters of every node's Bloom filter, if enabled
    #[inline(always)]
    pub const fn bloom_parameters(&self) -> Option<(usize, usize)> {
        self.bloom
    }

    /// The root's Bloom filter, if enabled
    pub fn root_filter(&self) -> Option<&BloomFilter> {
        self.nodes[self.root.0].filter.as_ref()
    }

    /// The leaf at `index`, if any
    pub fn leaf(&self, index: usize) -> Option<LeafRef<'_, C>> {
        (index < self.leaf_count).then(|| self.leaf_ref(NodeId(index)))
    }

    /// All leaves in order, including the duplicate
    pub fn leaves(&self) -> impl ExactSizeIterator<Item = LeafRef<'_, C>> + '_ {
        (0..self.leaf_count).map(|index| self.leaf_ref(NodeId(index)))
    }

    #[inline(always)]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// View a leaf node. Leaves occupy the first `leaf_count` arena slots and
    /// only the trailing duplicate reuses an earlier content.
    pub(crate) fn leaf_ref(&self, id: NodeId) -> LeafRef<'_, C> {
        let node = self.node(id);
        LeafRef {
            index: id.0,
            content: &self.contents[id.0.min(self.contents.len() - 1)],
            hash: &node.hash,
            duplicate: node.is_duplicate(),
        }
    }
}

/// Pair levels bottom-up until one node remains.
///
/// Returns the root and the number of levels built above the leaves.
fn build_levels<D: Digest>(nodes: &mut Vec<Node>) -> Result<(NodeId, usize)> {
    let mut level: Vec<NodeId> = (0..nodes.len()).map(NodeId).collect();
    let mut depth = 0;

    while level.len() > 1 {
        let pairs: Vec<(NodeId, NodeId)> = level
            .chunks(2)
            .map(|pair| (pair[0], pair[pair.len() - 1]))
            .collect();

        if level.len() % 2 == 1 {
            debug!("Pairing last node of level {} with itself", depth);
        }

        let parents = combine_level::<D>(nodes, &pairs)?;

        let mut next = Vec::with_capacity(pairs.len());
        for ((left, right), (hash, filter)) in pairs.into_iter().zip(parents) {
            let id = NodeId(nodes.len());
            nodes.push(Node::internal(hash, filter, left, right));
            nodes[left.0].parent = Some(id);
            nodes[right.0].parent = Some(id);
            next.push(id);
        }

        level = next;
        depth += 1;
    }

    Ok((level[0], depth))
}

/// Compute the hash and filter of every parent of a level.
#[cfg(feature = "parallel")]
fn combine_level<D: Digest>(
    nodes: &[Node],
    pairs: &[(NodeId, NodeId)],
) -> Result<Vec<(Bytes, Option<BloomFilter>)>> {
    use rayon::prelude::*;

    pairs
        .par_iter()
        .map(|&(left, right)| combine::<D>(&nodes[left.0], &nodes[right.0]))
        .collect()
}

/// Compute the hash and filter of every parent of a level.
#[cfg(not(feature = "parallel"))]
fn combine_level<D: Digest>(
    nodes: &[Node],
    pairs: &[(NodeId, NodeId)],
) -> Result<Vec<(Bytes, Option<BloomFilter>)>> {
    pairs
        .iter()
        .map(|&(left, right)| combine::<D>(&nodes[left.0], &nodes[right.0]))
        .collect()
}

fn combine<D: Digest>(left: &Node, right: &Node) -> Result<(Bytes, Option<BloomFilter>)> {
    let hash = hash_pair::<D>(&left.hash, &right.hash);

    let filter = match (&left.filter, &right.filter) {
        (Some(left), Some(right)) => {
            let mut filter = left.clone();
            filter.merge(right)?;
            Some(filter)
        }
        _ => None,
    };

    Ok((hash, filter))
}

/// Hash `left || right` with a fresh `D`
#[inline]
pub(crate) fn hash_pair<D: Digest>(left: &[u8], right: &[u8]) -> Bytes {
    let mut hasher = D::new();
    hasher.update(left);
    hasher.update(right);
    Bytes::copy_from_slice(&hasher.finalize())
}

/// A borrowed view of one leaf
#[derive(Debug)]
pub struct LeafRef<'a, C> {
    index: usize,
    content: &'a C,
    hash: &'a Bytes,
    duplicate: bool,
}

impl<'a, C> LeafRef<'a, C> {
    /// Position in the leaf list
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The content this leaf wraps. A duplicate leaf wraps the same content
    /// as the leaf before it.
    #[inline(always)]
    pub const fn content(&self) -> &'a C {
        self.content
    }

    /// The leaf hash, the content's digest
    #[inline(always)]
    pub const fn hash(&self) -> &'a Bytes {
        self.hash
    }

    /// Whether this is the synthetic copy of the last leaf
    #[inline(always)]
    pub const fn is_duplicate(&self) -> bool {
        self.duplicate
    }
}

impl<C> Clone for LeafRef<'_, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<C> Copy for LeafRef<'_, C> {}

impl<C: fmt::Display> fmt::Display for LeafRef<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = if self.duplicate { " (dup)" } else { "" };
        write!(
            f,
            "{}: {}{} {}",
            self.index,
            hex::encode(self.hash),
            marker,
            self.content
        )
    }
}

/// One line per leaf: index, hex hash, duplicate marker, content.
impl<C: fmt::Display, D> fmt::Display for MerkleTree<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for leaf in self.leaves() {
            writeln!(f, "{leaf}")?;
        }
        Ok(())
    }
}

impl<C: fmt::Debug, D> fmt::Debug for MerkleTree<C, D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MerkleTree")
            .field("root_hash", &hex::encode(&self.root_hash))
            .field("leaf_count", &self.leaf_count)
            .field("depth", &self.depth)
            .field("bloom", &self.bloom)
            .field("contents", &self.contents)
            .finish_non_exhaustive()
    }
}
