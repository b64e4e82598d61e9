//! Merkle hash trees with per-node Bloom filters
//!
//! This crate builds a binary hash tree over an ordered sequence of
//! [`Content`] items. The root hash commits to the whole sequence; the tree
//! can re-verify itself, locate an item and produce a [`MultiProof`] that the
//! item is included under the root.
//!
//! ## Key Components
//!
//! - **Trees**: [`MerkleTree`], built directly, from a [`TreeConfig`] or with a [`TreeBuilder`]
//! - **Content**: the [`Content`] trait, with [`DigestContent`] as a ready-made implementation
//! - **Proofs**: [`MultiProof`] sibling paths that verify against a root hash alone
//! - **Bloom acceleration**: optional filters on every node, from [`thicket_bloom`],
//!   that let lookups skip subtrees which cannot hold the item
//!
//! ## Usage Examples
//!
//! ```
//! use sha2::Sha256;
//! use thicket_merkle::{DigestContent, MerkleTree};
//!
//! let contents: Vec<DigestContent> = vec!["A".into(), "B".into(), "C".into(), "D".into()];
//! let tree = MerkleTree::with_bloom_filter(contents, 0.01).unwrap();
//!
//! assert!(tree.verify_tree().unwrap());
//! assert!(tree.verify_content(&"C".into()).unwrap());
//! assert!(!tree.verify_content(&"E".into()).unwrap());
//!
//! // Proofs verify against the root hash without the tree
//! let proof = tree.multi_proof(&"C".into()).unwrap().unwrap();
//! let leaf = tree.leaf(2).unwrap();
//! assert!(proof.verify::<Sha256>(leaf.hash(), tree.root_hash()));
//! ```

// Re-export dependencies that are part of our public API
pub use bytes;
pub use thicket_bloom;

mod config;
mod content;
pub mod error;
mod lookup;
mod node;
mod proof;
mod tree;
mod verify;

pub use config::{BloomConfig, TreeBuilder, TreeConfig};
pub use content::{Content, DigestContent};
pub use error::{Result, TreeError};
pub use proof::{Direction, MultiProof, ProofStep};
pub use tree::{LeafRef, MerkleTree};
