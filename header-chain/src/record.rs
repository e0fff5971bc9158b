//! # Header Records
//!
//! The stored form of an accepted header, and the bootstrap seed that creates
//! the first one.

use borsh::{BorshDeserialize, BorshSerialize};
use crypto_bigint::{Encoding, U256};
use serde::{Deserialize, Serialize};

use crate::{hashes::HeaderHash, header::BlockHeader, target::target_to_bits};

/// An accepted block header with its chain metadata.
///
/// Records are immutable once stored. `target` and `chain_work` are 256-bit
/// big-endian integers.
///
/// ## Fields
///
/// * `hash` - Block hash, display order; the record's key
/// * `prev_hash` - Parent's hash; the parent record always exists except for the bootstrap record
/// * `merkle_root` - Transaction Merkle root exactly as serialized
/// * `height` - Parent height + 1
/// * `target` - Full target this block satisfied
/// * `chain_work` - Cumulative work from the bootstrap record's base to this block
/// * `epoch_start` - First block of this block's difficulty epoch (itself on a retarget height)
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug, BorshDeserialize, BorshSerialize)]
pub struct HeaderRecord {
    pub hash: HeaderHash,
    pub version: i32,
    pub prev_hash: HeaderHash,
    pub merkle_root: [u8; 32],
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
    pub height: u32,
    pub target: [u8; 32],
    pub chain_work: [u8; 32],
    pub epoch_start: HeaderHash,
}

impl HeaderRecord {
    /// Builds the record of a validated header.
    pub fn from_header(
        header: &BlockHeader,
        hash: HeaderHash,
        height: u32,
        target: &U256,
        chain_work: &U256,
        epoch_start: HeaderHash,
    ) -> Self {
        HeaderRecord {
            hash,
            version: header.version,
            prev_hash: header.prev_block_hash,
            merkle_root: header.merkle_root,
            time: header.time,
            bits: header.bits,
            nonce: header.nonce,
            height,
            target: target.to_be_bytes(),
            chain_work: chain_work.to_be_bytes(),
            epoch_start,
        }
    }

    pub fn target(&self) -> U256 {
        U256::from_be_bytes(self.target)
    }

    pub fn chain_work(&self) -> U256 {
        U256::from_be_bytes(self.chain_work)
    }
}

/// Trusted starting point of the relay. Its fields are taken as given and
/// never validated.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug, BorshDeserialize, BorshSerialize)]
pub struct GenesisSeed {
    pub hash: HeaderHash,
    pub height: u32,
    pub time: u32,
    pub merkle_root: [u8; 32],
    pub target: [u8; 32],
    pub chain_work: [u8; 32],
}

impl GenesisSeed {
    /// Seeds from a full header whose height and cumulative work are known.
    pub fn from_header(
        header: &BlockHeader,
        height: u32,
        target: &U256,
        chain_work: &U256,
    ) -> Self {
        GenesisSeed {
            hash: header.compute_block_hash(),
            height,
            time: header.time,
            merkle_root: header.merkle_root,
            target: target.to_be_bytes(),
            chain_work: chain_work.to_be_bytes(),
        }
    }

    /// The bootstrap record. It anchors its own difficulty epoch, and fields
    /// the seed does not carry are left zeroed.
    pub fn into_record(self) -> HeaderRecord {
        let target = U256::from_be_bytes(self.target);
        HeaderRecord {
            hash: self.hash,
            version: 0,
            prev_hash: HeaderHash::ZERO,
            merkle_root: self.merkle_root,
            time: self.time,
            bits: target_to_bits(&target),
            nonce: 0,
            height: self.height,
            target: self.target,
            chain_work: self.chain_work,
            epoch_start: self.hash,
        }
    }
}
