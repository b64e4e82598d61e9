//! Arena nodes
//!
//! Every node of a tree lives in one flat vector owned by the tree. Children
//! and parents refer to each other by [`NodeId`], so the parent back-reference
//! never owns anything.
//!
//! Arena order is construction order: the leaves come first, in leaf order,
//! followed by each internal level from the bottom up. A node's children
//! therefore always precede it, and the root is the last node.

use bytes::Bytes;
use thicket_bloom::BloomFilter;

/// Index of a node in its tree's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(pub(crate) usize);

/// What a node holds besides its hash
#[derive(Debug, Clone, Copy)]
pub(crate) enum NodeKind {
    /// A leaf wrapping one content item
    Leaf {
        /// Index of the content in the tree's content list
        content: usize,
        /// Set on the synthetic copy of the last leaf added for odd counts
        duplicate: bool,
    },
    /// An internal node; both children are the same node when a level's
    /// last node is paired with itself
    Internal { left: NodeId, right: NodeId },
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) hash: Bytes,
    pub(crate) parent: Option<NodeId>,
    pub(crate) filter: Option<BloomFilter>,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Create a leaf. With Bloom parameters `(m, k)` its filter holds exactly
    /// the leaf's own hash.
    pub(crate) fn leaf(
        hash: Bytes,
        content: usize,
        duplicate: bool,
        bloom: Option<(usize, usize)>,
    ) -> Self {
        let filter = bloom.map(|(m, k)| {
            let mut filter = BloomFilter::new(m, k);
            filter.add(&hash);
            filter
        });

        Self {
            hash,
            parent: None,
            filter,
            kind: NodeKind::Leaf { content, duplicate },
        }
    }

    pub(crate) const fn internal(
        hash: Bytes,
        filter: Option<BloomFilter>,
        left: NodeId,
        right: NodeId,
    ) -> Self {
        Self {
            hash,
            parent: None,
            filter,
            kind: NodeKind::Internal { left, right },
        }
    }

    #[inline(always)]
    pub(crate) const fn is_duplicate(&self) -> bool {
        matches!(
            self.kind,
            NodeKind::Leaf {
                duplicate: true,
                ..
            }
        )
    }

    /// `(left, right)` for internal nodes
    #[inline(always)]
    pub(crate) const fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Internal { left, right } => Some((left, right)),
            NodeKind::Leaf { .. } => None,
        }
    }
}
