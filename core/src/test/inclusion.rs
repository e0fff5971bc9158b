use super::common::*;
use crate::inclusion::PartialMerkleTreeVerifier;
use bitcoin::hashes::Hash;
use bitcoin::merkle_tree::PartialMerkleTree;
use bitcoin::Txid;
use header_chain::{BlockHeader, HeaderHash};
use relay_errors::InclusionError;

#[test]
fn transaction_in_buried_block() {
    let (mut relay, genesis) = bootstrap(regtest(), 0, Some(REGTEST_BITS));
    let genesis_hash = genesis.compute_block_hash();

    let txids: Vec<Txid> = (1..=4u8).map(|i| Txid::from_byte_array([i; 32])).collect();
    let proof = PartialMerkleTree::from_txids(&txids, &[false, true, false, false]);
    let merkle_root = proof
        .extract_matches(&mut Vec::new(), &mut Vec::new())
        .unwrap()
        .to_byte_array();

    let block = mine(BlockHeader {
        version: 0x2000_0000,
        prev_block_hash: genesis_hash,
        merkle_root,
        time: GENESIS_TIME + 600,
        bits: REGTEST_BITS,
        nonce: 0,
    });
    let block_hash = relay.store_header(&block.encode()).unwrap();
    let main = extend_by(&mut relay, block_hash, 2, 1);
    let fork = extend(&mut relay, genesis_hash, 600, 2);

    let verifier = PartialMerkleTreeVerifier;
    relay
        .verify_inclusion(&verifier, &block_hash, &txids[1], &proof, 3)
        .unwrap();

    assert_eq!(
        relay.verify_inclusion(&verifier, &block_hash, &txids[1], &proof, 4),
        Err(InclusionError::InsufficientConfirmations {
            hash: block_hash,
            confirmations: 3,
            required: 4,
        })
    );
    assert_eq!(
        relay.verify_inclusion(&verifier, &block_hash, &txids[0], &proof, 1),
        Err(InclusionError::ProofRejected(block_hash))
    );
    assert_eq!(
        relay.verify_inclusion(&verifier, &main[0], &txids[1], &proof, 1),
        Err(InclusionError::ProofRejected(main[0]))
    );
    assert_eq!(
        relay.verify_inclusion(&verifier, &fork, &txids[1], &proof, 0),
        Err(InclusionError::NotInMainChain(fork))
    );
    assert_eq!(
        relay.verify_inclusion(&verifier, &HeaderHash([0x42; 32]), &txids[1], &proof, 0),
        Err(InclusionError::UnknownBlock(HeaderHash([0x42; 32])))
    );
}
