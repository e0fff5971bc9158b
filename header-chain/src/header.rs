//! # Header Codec
//!
//! Decoding and encoding of the 80-byte Bitcoin block header, plus the block
//! hash. All byte order handling for header fields lives in [`HEADER_LAYOUT`].

use bitcoin::{
    block::{Header, Version},
    hashes::Hash,
    BlockHash, CompactTarget, TxMerkleNode,
};
use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::{
    error::HeaderError,
    hashes::{calculate_double_sha256, HeaderHash},
};

/// Size of a serialized block header in bytes.
pub const HEADER_SIZE: usize = 80;

/// How a field's bytes map to its in-memory value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    /// Unsigned or signed integer, least significant byte first.
    LittleEndian,
    /// Hash stored reversed so it reads in display order.
    Reversed,
    /// Opaque bytes, kept exactly as serialized.
    Raw,
}

/// One entry of the header layout table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField {
    pub name: &'static str,
    pub offset: usize,
    pub width: usize,
    pub order: ByteOrder,
}

pub const VERSION: HeaderField = HeaderField {
    name: "version",
    offset: 0,
    width: 4,
    order: ByteOrder::LittleEndian,
};
pub const PREV_BLOCK_HASH: HeaderField = HeaderField {
    name: "prev_block_hash",
    offset: 4,
    width: 32,
    order: ByteOrder::Reversed,
};
pub const MERKLE_ROOT: HeaderField = HeaderField {
    name: "merkle_root",
    offset: 36,
    width: 32,
    order: ByteOrder::Raw,
};
pub const TIME: HeaderField = HeaderField {
    name: "time",
    offset: 68,
    width: 4,
    order: ByteOrder::LittleEndian,
};
pub const BITS: HeaderField = HeaderField {
    name: "bits",
    offset: 72,
    width: 4,
    order: ByteOrder::LittleEndian,
};
pub const NONCE: HeaderField = HeaderField {
    name: "nonce",
    offset: 76,
    width: 4,
    order: ByteOrder::LittleEndian,
};

/// Serialized header layout, in wire order.
pub const HEADER_LAYOUT: [HeaderField; 6] =
    [VERSION, PREV_BLOCK_HASH, MERKLE_ROOT, TIME, BITS, NONCE];

impl HeaderField {
    /// Reads the field out of a serialized header, applying its byte order.
    /// Integer fields come back in big-endian order so callers can use
    /// `from_be_bytes` uniformly.
    fn read<const N: usize>(&self, raw: &[u8; HEADER_SIZE]) -> [u8; N] {
        debug_assert_eq!(N, self.width, "width mismatch for {}", self.name);
        let mut out = [0u8; N];
        out.copy_from_slice(&raw[self.offset..self.offset + N]);
        if self.order != ByteOrder::Raw {
            out.reverse();
        }
        out
    }

    /// Inverse of [`HeaderField::read`].
    fn write<const N: usize>(&self, raw: &mut [u8; HEADER_SIZE], mut value: [u8; N]) {
        debug_assert_eq!(N, self.width, "width mismatch for {}", self.name);
        if self.order != ByteOrder::Raw {
            value.reverse();
        }
        raw[self.offset..self.offset + N].copy_from_slice(&value);
    }
}

/// Decoded Bitcoin block header.
///
/// `prev_block_hash` is kept in display order, `merkle_root` exactly as it was
/// serialized. `bits` is the compact target.
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug, BorshDeserialize, BorshSerialize)]
pub struct BlockHeader {
    pub version: i32,
    pub prev_block_hash: HeaderHash,
    pub merkle_root: [u8; 32],
    pub time: u32,
    pub bits: u32,
    pub nonce: u32,
}

impl BlockHeader {
    /// Decodes a serialized header. Anything other than exactly 80 bytes is
    /// rejected with [`HeaderError::MalformedHeader`].
    pub fn decode(raw: &[u8]) -> Result<Self, HeaderError> {
        let raw: &[u8; HEADER_SIZE] = raw
            .try_into()
            .map_err(|_| HeaderError::MalformedHeader(raw.len()))?;

        Ok(BlockHeader {
            version: i32::from_be_bytes(VERSION.read(raw)),
            prev_block_hash: HeaderHash(PREV_BLOCK_HASH.read(raw)),
            merkle_root: MERKLE_ROOT.read(raw),
            time: u32::from_be_bytes(TIME.read(raw)),
            bits: u32::from_be_bytes(BITS.read(raw)),
            nonce: u32::from_be_bytes(NONCE.read(raw)),
        })
    }

    /// Serializes the header back into its 80-byte wire form.
    pub fn encode(&self) -> [u8; HEADER_SIZE] {
        let mut raw = [0u8; HEADER_SIZE];
        VERSION.write(&mut raw, self.version.to_be_bytes());
        PREV_BLOCK_HASH.write(&mut raw, self.prev_block_hash.0);
        MERKLE_ROOT.write(&mut raw, self.merkle_root);
        TIME.write(&mut raw, self.time.to_be_bytes());
        BITS.write(&mut raw, self.bits.to_be_bytes());
        NONCE.write(&mut raw, self.nonce.to_be_bytes());
        raw
    }

    /// Computes the block hash: double SHA256 over the serialized header,
    /// reversed into display order.
    pub fn compute_block_hash(&self) -> HeaderHash {
        HeaderHash::from_internal_bytes(calculate_double_sha256(&self.encode()))
    }
}

impl From<Header> for BlockHeader {
    fn from(header: Header) -> Self {
        BlockHeader {
            version: header.version.to_consensus(),
            prev_block_hash: HeaderHash::from_internal_bytes(header.prev_blockhash.to_byte_array()),
            merkle_root: header.merkle_root.to_byte_array(),
            time: header.time,
            bits: header.bits.to_consensus(),
            nonce: header.nonce,
        }
    }
}

impl From<BlockHeader> for Header {
    fn from(val: BlockHeader) -> Self {
        Header {
            version: Version::from_consensus(val.version),
            prev_blockhash: BlockHash::from_byte_array(val.prev_block_hash.to_internal_bytes()),
            merkle_root: TxMerkleNode::from_byte_array(val.merkle_root),
            time: val.time,
            bits: CompactTarget::from_consensus(val.bits),
            nonce: val.nonce,
        }
    }
}
