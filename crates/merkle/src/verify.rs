//! Integrity checks
//!
//! [`verify_tree`](MerkleTree::verify_tree) recomputes every hash from the
//! contents and compares the result with the cached root hash.
//! [`verify_content`](MerkleTree::verify_content) locates a content item and
//! checks only the ancestors on its path to the root.
//!
//! A mismatch is a negative answer, never an error.

use bytes::Bytes;
use digest::Digest;
use tracing::debug;

use crate::content::Content;
use crate::error::{Result, TreeError};
use crate::node::{NodeId, NodeKind};
use crate::tree::{MerkleTree, hash_pair};

impl<C: Content, D: Digest> MerkleTree<C, D> {
    /// Recompute every node hash from the contents and compare the recomputed
    /// root with the cached root hash.
    ///
    /// Cached node hashes are ignored entirely. Fails only if a content item
    /// fails to hash.
    pub fn verify_tree(&self) -> Result<bool> {
        // Children precede parents in the arena, so one forward pass suffices
        let mut fresh: Vec<Bytes> = Vec::with_capacity(self.nodes.len());
        for node in &self.nodes {
            let hash = match node.kind {
                NodeKind::Leaf { content, .. } => self.contents[content]
                    .digest()
                    .map_err(TreeError::content)?,
                NodeKind::Internal { left, right } => {
                    hash_pair::<D>(&fresh[left.0], &fresh[right.0])
                }
            };
            fresh.push(hash);
        }

        let valid = fresh[self.root.0] == self.root_hash;
        if !valid {
            debug!(
                "Recomputed root {} does not match cached root {}",
                hex::encode(&fresh[self.root.0]),
                hex::encode(&self.root_hash)
            );
        }
        Ok(valid)
    }

    /// Check that `content` is included under the root hash.
    ///
    /// Locates the content (see [`locate`](Self::locate)) and then walks from
    /// its leaf to the root. Every ancestor's hash is recomputed from freshly
    /// recomputed child hashes and compared with the ancestor's cached hash.
    /// Returns `Ok(false)` if the content is absent or any ancestor mismatches.
    pub fn verify_content(&self, content: &C) -> Result<bool> {
        match self.locate_id(content)? {
            Some(leaf) => self.verify_path(leaf),
            None => Ok(false),
        }
    }

    /// Walk from `leaf` to the root checking every ancestor.
    fn verify_path(&self, leaf: NodeId) -> Result<bool> {
        let mut current = self.node(leaf).parent;
        let mut level = 1;

        while let Some(id) = current {
            let node = self.node(id);
            let Some((left, right)) = node.children() else {
                debug!("Ancestor {} of leaf {} is not an internal node", id.0, leaf.0);
                return Ok(false);
            };

            let recomputed = hash_pair::<D>(&self.fresh_hash(left)?, &self.fresh_hash(right)?);
            if recomputed != node.hash {
                debug!("Hash mismatch at level {} on the path of leaf {}", level, leaf.0);
                return Ok(false);
            }

            current = node.parent;
            level += 1;
        }

        Ok(true)
    }

    /// A node's hash recomputed one level deep: a leaf rehashes its content,
    /// an internal node rehashes its children's cached hashes.
    fn fresh_hash(&self, id: NodeId) -> Result<Bytes> {
        let node = self.node(id);
        match node.kind {
            NodeKind::Leaf { content, .. } => {
                self.contents[content].digest().map_err(TreeError::content)
            }
            NodeKind::Internal { left, right } => Ok(hash_pair::<D>(
                &self.node(left).hash,
                &self.node(right).hash,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use crate::content::DigestContent;
    use crate::node::NodeId;
    use crate::tree::MerkleTree;

    fn tree(items: &[&'static str], bloom: bool) -> MerkleTree<DigestContent> {
        let contents = items.iter().map(|&item| item.into()).collect();
        if bloom {
            MerkleTree::with_bloom_filter(contents, 0.01).unwrap()
        } else {
            MerkleTree::new(contents).unwrap()
        }
    }

    #[test]
    fn test_verify_tree() {
        for bloom in [false, true] {
            assert!(tree(&["a"], bloom).verify_tree().unwrap());
            assert!(tree(&["a", "b", "c", "d", "e"], bloom).verify_tree().unwrap());
        }
    }

    #[test]
    fn test_verify_tree_detects_tampered_root() {
        let mut tree = tree(&["a", "b", "c", "d"], false);
        tree.root_hash = Bytes::from_static(&[0u8; 32]);
        assert!(!tree.verify_tree().unwrap());
    }

    #[test]
    fn test_verify_tree_ignores_cached_hashes() {
        // Corrupting an internal cache below the root does not change the
        // recomputation, which starts from the contents
        let mut tree = tree(&["a", "b", "c", "d"], false);
        let first_parent = NodeId(tree.leaf_count());
        tree.nodes[first_parent.0].hash = Bytes::from_static(&[1u8; 32]);
        assert!(tree.verify_tree().unwrap());
    }

    #[test]
    fn test_verify_content() {
        for bloom in [false, true] {
            let tree = tree(&["a", "b", "c", "d", "e"], bloom);
            for item in ["a", "b", "c", "d", "e"] {
                assert!(tree.verify_content(&item.into()).unwrap());
            }
            assert!(!tree.verify_content(&"f".into()).unwrap());
        }
    }

    #[test]
    fn test_verify_content_detects_corrupted_ancestor() {
        for bloom in [false, true] {
            let mut tree = tree(&["a", "b", "c", "d"], bloom);

            // Parent of "a" and "b"
            let parent = NodeId(tree.leaf_count());
            tree.nodes[parent.0].hash = Bytes::from_static(&[7u8; 32]);

            assert!(!tree.verify_content(&"a".into()).unwrap());
            assert!(!tree.verify_content(&"b".into()).unwrap());
            // Off the path of "c": the root is recomputed from the cached
            // hashes of the leaves below the corrupted node, not from it
            assert!(tree.verify_content(&"c".into()).unwrap());
        }
    }

    #[test]
    fn test_verify_content_detects_corrupted_leaf_hash() {
        let mut tree = tree(&["a", "b", "c", "d"], false);
        tree.nodes[3].hash = Bytes::from_static(&[9u8; 32]);

        // Every path reaches the root, which is recomputed from the parent of
        // "c" and "d" as rehashed from their cached leaf hashes
        assert!(!tree.verify_content(&"c".into()).unwrap());
        assert!(!tree.verify_content(&"a".into()).unwrap());
        assert!(tree.verify_tree().unwrap());
    }
}
