//! Basic usage of thicket-merkle
//!
//! Run with `RUST_LOG=debug` to see construction and verification logs.

use sha2::Sha256;
use thicket_merkle::{Content, DigestContent, MerkleTree, Result, TreeBuilder};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Thicket Merkle Tree Basic Usage Example");
    println!("=======================================\n");

    // Build a tree without Bloom filters
    let contents: Vec<DigestContent> = ["alpha", "beta", "gamma", "delta", "epsilon"]
        .into_iter()
        .map(DigestContent::from)
        .collect();
    let tree = MerkleTree::new(contents.clone())?;

    println!("Leaves:");
    print!("{tree}");
    println!("Root hash: {}", hex::encode(tree.root_hash()));
    println!("Tree verifies: {}", tree.verify_tree()?);

    // The same contents with a Bloom filter on every node
    let filtered = TreeBuilder::new()
        .bloom_false_positive_rate(0.01)
        .build(contents)?;
    let (m, k) = filtered.bloom_parameters().unwrap_or_default();
    println!("\nBloom parameters: m = {m}, k = {k}");
    println!(
        "Same root hash: {}",
        filtered.root_hash() == tree.root_hash()
    );

    // Inclusion checks
    for query in ["gamma", "omega"] {
        let query = DigestContent::from(query);
        println!(
            "Contains {query}: {} (bloom-guided: {})",
            tree.verify_content(&query)?,
            filtered.verify_content(&query)?
        );
    }

    // Proofs verify against the root hash alone
    let query = DigestContent::from("delta");
    if let Some(proof) = filtered.multi_proof(&query)? {
        println!("\nProof for {query}:");
        for step in proof.steps() {
            println!(
                "  {:?} sibling {}",
                step.direction,
                hex::encode(&step.sibling)
            );
        }

        let Ok(leaf_hash) = query.digest();
        println!(
            "Proof verifies: {}",
            proof.verify::<Sha256>(&leaf_hash, filtered.root_hash())
        );
    }

    Ok(())
}
