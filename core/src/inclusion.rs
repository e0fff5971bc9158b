//! # Transaction Inclusion
//!
//! Seam for Merkle-proof verifiers. The relay resolves which Merkle root a
//! block committed to and whether the block is buried deep enough; the
//! verifier decides whether a transaction is a member of that root.

use bitcoin::hashes::Hash;
use bitcoin::merkle_tree::PartialMerkleTree;
use bitcoin::Txid;

pub trait InclusionVerifier {
    type Proof;

    /// Whether `proof` shows `txid` is committed to by `merkle_root`, given in
    /// the byte order it has inside the serialized header.
    fn verify(&self, merkle_root: &[u8; 32], txid: &Txid, proof: &Self::Proof) -> bool;
}

/// Verifies BIP37 partial Merkle trees, as served in `merkleblock` messages
/// and by `gettxoutproof`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PartialMerkleTreeVerifier;

impl InclusionVerifier for PartialMerkleTreeVerifier {
    type Proof = PartialMerkleTree;

    fn verify(&self, merkle_root: &[u8; 32], txid: &Txid, proof: &PartialMerkleTree) -> bool {
        let mut matches = Vec::new();
        let mut indexes = Vec::new();

        match proof.extract_matches(&mut matches, &mut indexes) {
            Ok(root) => root.to_byte_array() == *merkle_root && matches.contains(txid),
            Err(e) => {
                tracing::debug!("Malformed partial Merkle tree: {e}");
                false
            }
        }
    }
}
