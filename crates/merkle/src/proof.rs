//! Inclusion proofs
//!
//! A [`MultiProof`] lists, from the leaf up to the root, the hash of the
//! sibling at every level together with the side that sibling sits on. Given
//! only a leaf hash and the proof, a verifier can recompute the root hash
//! without access to the rest of the tree.

use bytes::Bytes;
use digest::Digest;

use crate::content::Content;
use crate::error::Result;
use crate::node::NodeId;
use crate::tree::{MerkleTree, hash_pair};

/// Which side of its parent a recorded sibling sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Direction {
    /// The sibling is the left child; the proven node is the right child
    Left = 0,
    /// The sibling is the right child; the proven node is the left child
    Right = 1,
}

impl From<Direction> for u8 {
    fn from(direction: Direction) -> Self {
        direction as Self
    }
}

/// One level of a [`MultiProof`]
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProofStep {
    /// The sibling's hash
    pub sibling: Bytes,
    /// The side the sibling sits on
    pub direction: Direction,
}

impl ProofStep {
    /// Create a proof step
    pub const fn new(sibling: Bytes, direction: Direction) -> Self {
        Self { sibling, direction }
    }
}

/// Sibling hashes and directions from a leaf up to the root
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiProof {
    steps: Vec<ProofStep>,
}

impl MultiProof {
    /// Create a proof from its steps, ordered leaf to root
    pub const fn new(steps: Vec<ProofStep>) -> Self {
        Self { steps }
    }

    /// The steps, ordered leaf to root
    #[inline(always)]
    pub fn steps(&self) -> &[ProofStep] {
        &self.steps
    }

    /// The number of levels covered
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether the proof has no steps
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Split into sibling hashes and direction markers (`0` for left, `1`
    /// for right)
    pub fn into_parts(self) -> (Vec<Bytes>, Vec<u8>) {
        self.steps
            .into_iter()
            .map(|step| (step.sibling, u8::from(step.direction)))
            .unzip()
    }

    /// Fold `leaf_hash` with every sibling, bottom-up, hashing with `D`.
    pub fn compute_root<D: Digest>(&self, leaf_hash: &[u8]) -> Bytes {
        self.steps
            .iter()
            .fold(Bytes::copy_from_slice(leaf_hash), |current, step| {
                match step.direction {
                    Direction::Left => hash_pair::<D>(&step.sibling, &current),
                    Direction::Right => hash_pair::<D>(&current, &step.sibling),
                }
            })
    }

    /// Whether `leaf_hash` combined with this proof yields `root_hash`
    pub fn verify<D: Digest>(&self, leaf_hash: &[u8], root_hash: &[u8]) -> bool {
        self.compute_root::<D>(leaf_hash).as_ref() == root_hash
    }
}

impl FromIterator<ProofStep> for MultiProof {
    fn from_iter<I: IntoIterator<Item = ProofStep>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<C: Content, D: Digest> MerkleTree<C, D> {
    /// The inclusion proof for `content`, or `Ok(None)` if it is not in the
    /// tree.
    ///
    /// The leaf is found the same way [`locate`](Self::locate) finds it.
    pub fn multi_proof(&self, content: &C) -> Result<Option<MultiProof>> {
        Ok(self.locate_id(content)?.map(|leaf| self.proof_for(leaf)))
    }

    /// The inclusion proof for the leaf at `index`, if any
    pub fn leaf_proof(&self, index: usize) -> Option<MultiProof> {
        (index < self.leaf_count).then(|| self.proof_for(NodeId(index)))
    }

    /// Check a proof produced by this tree's hash policy against its root.
    pub fn verify_proof(&self, leaf_hash: &[u8], proof: &MultiProof) -> bool {
        proof.verify::<D>(leaf_hash, &self.root_hash)
    }
}

impl<C, D> MerkleTree<C, D> {
    fn proof_for(&self, leaf: NodeId) -> MultiProof {
        let mut steps = Vec::with_capacity(self.depth());
        let mut current = leaf;

        while let Some(parent) = self.node(current).parent {
            if let Some((left, right)) = self.node(parent).children() {
                let step = if left == current {
                    ProofStep::new(self.node(right).hash.clone(), Direction::Right)
                } else {
                    ProofStep::new(self.node(left).hash.clone(), Direction::Left)
                };
                steps.push(step);
            }
            current = parent;
        }

        MultiProof::new(steps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::DigestContent;
    use sha2::Sha256;

    fn tree(items: &[&'static str]) -> MerkleTree<DigestContent> {
        MerkleTree::new(items.iter().map(|&item| item.into()).collect()).unwrap()
    }

    #[test]
    fn test_proof_round_trip() {
        let tree = tree(&["a", "b", "c", "d", "e", "f", "g"]);
        for leaf in tree.leaves() {
            let proof = tree.leaf_proof(leaf.index()).unwrap();
            assert_eq!(proof.len(), tree.depth());
            assert!(tree.verify_proof(leaf.hash(), &proof));
        }
    }

    #[test]
    fn test_proof_rejects_other_leaf() {
        let tree = tree(&["a", "b", "c", "d"]);
        let proof = tree.multi_proof(&"a".into()).unwrap().unwrap();
        let other = tree.leaf(1).unwrap();
        assert!(!tree.verify_proof(other.hash(), &proof));
    }

    #[test]
    fn test_absent_content_has_no_proof() {
        let tree = tree(&["a", "b"]);
        assert!(tree.multi_proof(&"z".into()).unwrap().is_none());
        assert!(tree.leaf_proof(2).is_none());
    }

    #[test]
    fn test_self_paired_level() {
        // Six leaves give a three node level whose last node pairs with itself
        let tree = tree(&["a", "b", "c", "d", "e"]);
        let proof = tree.multi_proof(&"e".into()).unwrap().unwrap();

        let directions: Vec<Direction> = proof.steps().iter().map(|s| s.direction).collect();
        assert_eq!(
            directions,
            vec![Direction::Right, Direction::Right, Direction::Left]
        );
        // The duplicate leaf, then the self-paired node as its own sibling
        let e = tree.leaf(4).unwrap().hash().clone();
        assert_eq!(proof.steps()[0].sibling, e);
        assert_eq!(proof.steps()[1].sibling, hash_pair::<Sha256>(&e, &e));
    }

    #[test]
    fn test_into_parts() {
        let tree = tree(&["a", "b", "c", "d"]);
        let proof = tree.multi_proof(&"c".into()).unwrap().unwrap();
        let (hashes, directions) = proof.into_parts();
        assert_eq!(hashes.len(), 2);
        assert_eq!(directions, vec![1, 0]);
    }
}
