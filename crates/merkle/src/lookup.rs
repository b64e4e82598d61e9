//! Finding the leaf that holds a content item
//!
//! Two strategies exist. The linear scan compares the query with every leaf in
//! order. The Bloom-guided search walks down from the root and skips every
//! subtree whose filter rules the query's digest out.
//!
//! A positive filter answer on an internal node does not say which child holds
//! the item, so both children are searched, left first. The first leaf that
//! compares equal wins. That is the same leaf the linear scan finds, so both
//! strategies always agree.

use digest::Digest;
use tracing::trace;

use crate::content::Content;
use crate::error::{Result, TreeError};
use crate::node::{NodeId, NodeKind};
use crate::tree::{LeafRef, MerkleTree};

impl<C: Content, D: Digest> MerkleTree<C, D> {
    /// Find the first leaf holding `content`.
    ///
    /// Uses the Bloom-guided search when the tree carries filters and the
    /// linear scan otherwise. Returns `Ok(None)` if `content` is not in the
    /// tree.
    pub fn locate(&self, content: &C) -> Result<Option<LeafRef<'_, C>>> {
        if self.is_bloom_enabled() {
            self.locate_filtered(content)
        } else {
            self.locate_linear(content)
        }
    }

    /// Find the first leaf holding `content` by comparing every leaf in order.
    pub fn locate_linear(&self, content: &C) -> Result<Option<LeafRef<'_, C>>> {
        for leaf in self.leaves() {
            if leaf.content().equals(content).map_err(TreeError::content)? {
                return Ok(Some(leaf));
            }
        }
        Ok(None)
    }

    /// Find the first leaf holding `content`, pruning subtrees whose Bloom
    /// filter reports the content's digest absent.
    ///
    /// Fails with [`TreeError::BloomDisabled`] on a tree built without filters.
    pub fn locate_filtered(&self, content: &C) -> Result<Option<LeafRef<'_, C>>> {
        if !self.is_bloom_enabled() {
            return Err(TreeError::BloomDisabled);
        }

        let digest = content.digest().map_err(TreeError::content)?;

        // Depth-first, left before right
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            match node.kind {
                NodeKind::Leaf { content: index, .. } => {
                    if self.contents[index]
                        .equals(content)
                        .map_err(TreeError::content)?
                    {
                        return Ok(Some(self.leaf_ref(id)));
                    }
                }
                NodeKind::Internal { left, right } => {
                    let Some(filter) = node.filter.as_ref() else {
                        return Err(TreeError::BloomDisabled);
                    };
                    if !filter.test(&digest) {
                        trace!("Pruned subtree at node {}", id.0);
                        continue;
                    }
                    if right != left {
                        stack.push(right);
                    }
                    stack.push(left);
                }
            }
        }

        Ok(None)
    }

    /// The leaf id of `content`, by whichever strategy [`locate`](Self::locate) uses
    pub(crate) fn locate_id(&self, content: &C) -> Result<Option<NodeId>> {
        Ok(self.locate(content)?.map(|leaf| NodeId(leaf.index())))
    }
}

#[cfg(test)]
mod tests {
    use crate::content::DigestContent;
    use crate::error::TreeError;
    use crate::tree::MerkleTree;

    fn contents(items: &[&'static str]) -> Vec<DigestContent> {
        items.iter().map(|&item| item.into()).collect()
    }

    #[test]
    fn test_linear_finds_first_match() {
        let tree = MerkleTree::new(contents(&["a", "b", "a", "c"])).unwrap();

        let leaf = tree.locate(&"a".into()).unwrap().unwrap();
        assert_eq!(leaf.index(), 0);

        let leaf = tree.locate(&"c".into()).unwrap().unwrap();
        assert_eq!(leaf.index(), 3);

        assert!(tree.locate(&"z".into()).unwrap().is_none());
    }

    #[test]
    fn test_filtered_finds_first_match() {
        let tree = MerkleTree::with_bloom_filter(contents(&["a", "b", "a", "c"]), 0.01).unwrap();

        let leaf = tree.locate_filtered(&"a".into()).unwrap().unwrap();
        assert_eq!(leaf.index(), 0);
        assert_eq!(leaf.content(), &DigestContent::from("a"));

        assert!(tree.locate_filtered(&"z".into()).unwrap().is_none());
    }

    #[test]
    fn test_filtered_requires_bloom() {
        let tree = MerkleTree::new(contents(&["a", "b"])).unwrap();
        assert!(matches!(
            tree.locate_filtered(&"a".into()),
            Err(TreeError::BloomDisabled)
        ));
    }

    #[test]
    fn test_duplicate_leaf_is_not_preferred() {
        // "c" sits at index 2 and again as the duplicate at index 3
        let tree = MerkleTree::with_bloom_filter(contents(&["a", "b", "c"]), 0.01).unwrap();

        let leaf = tree.locate(&"c".into()).unwrap().unwrap();
        assert_eq!(leaf.index(), 2);
        assert!(!leaf.is_duplicate());
    }

    #[test]
    fn test_strategies_agree() {
        let items: Vec<String> = (0..37).map(|i| format!("item-{i}")).collect();
        let build = || -> Vec<DigestContent> {
            items.iter().map(|item| item.clone().into_bytes().into()).collect()
        };

        let tree = MerkleTree::with_bloom_filter(build(), 0.05).unwrap();
        for query in build()
            .into_iter()
            .chain(std::iter::once(DigestContent::from("missing")))
        {
            let linear = tree.locate_linear(&query).unwrap().map(|leaf| leaf.index());
            let filtered = tree.locate_filtered(&query).unwrap().map(|leaf| leaf.index());
            assert_eq!(linear, filtered);
        }
    }
}
