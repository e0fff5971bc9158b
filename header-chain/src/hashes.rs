use borsh::{BorshDeserialize, BorshSerialize};
use crypto_bigint::{Encoding, U256};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

pub fn calculate_double_sha256(input: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::default();
    hasher.update(input);
    let result = hasher.finalize_reset();
    hasher.update(result);
    hasher.finalize().into()
}

/// Block hash in display (big-endian) byte order.
///
/// This is the double SHA256 of the serialized header with its bytes reversed,
/// which is how block explorers and `bitcoin-cli` print hashes. Interpreting
/// the bytes as a big-endian integer gives the value compared against the
/// difficulty target.
#[derive(
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
)]
pub struct HeaderHash(#[serde(with = "hex::serde")] pub [u8; 32]);

impl HeaderHash {
    pub const ZERO: HeaderHash = HeaderHash([0u8; 32]);

    /// Builds a hash from the raw digest order used inside serialized headers.
    pub fn from_internal_bytes(mut bytes: [u8; 32]) -> Self {
        bytes.reverse();
        HeaderHash(bytes)
    }

    /// Returns the bytes in the order they appear inside serialized headers.
    pub fn to_internal_bytes(self) -> [u8; 32] {
        let mut bytes = self.0;
        bytes.reverse();
        bytes
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// The hash as an unsigned 256-bit integer.
    pub fn to_u256(&self) -> U256 {
        U256::from_be_bytes(self.0)
    }
}

impl fmt::Display for HeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for HeaderHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HeaderHash({self})")
    }
}

impl FromStr for HeaderHash {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s, &mut bytes)?;
        Ok(HeaderHash(bytes))
    }
}

impl From<[u8; 32]> for HeaderHash {
    fn from(bytes: [u8; 32]) -> Self {
        HeaderHash(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bitcoin::hashes::{sha256d, Hash};

    #[test]
    fn test_double_sha256_matches_bitcoin_hashes() {
        let message = b"relay header chain";
        let expected = sha256d::Hash::hash(message);
        assert_eq!(calculate_double_sha256(message), expected.to_byte_array());
    }

    #[test]
    fn test_display_and_parse() {
        let hash: HeaderHash = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
            .parse()
            .unwrap();
        assert_eq!(hash.0[0..3], [0, 0, 0]);
        assert_eq!(hash.0[31], 0x6f);
        assert_eq!(
            hash.to_string(),
            "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
        );
        assert!("00".parse::<HeaderHash>().is_err());
    }

    #[test]
    fn test_internal_order_roundtrip() {
        let mut internal = [0u8; 32];
        internal[0] = 0xaa;
        let hash = HeaderHash::from_internal_bytes(internal);
        assert_eq!(hash.0[31], 0xaa);
        assert_eq!(hash.to_internal_bytes(), internal);
        assert_eq!(hash.to_u256(), U256::from(0xaau32));
    }

    #[test]
    fn test_serializes_as_hex_string() {
        let json = serde_json::to_string(&HeaderHash::ZERO).unwrap();
        assert_eq!(json, format!("\"{}\"", "00".repeat(32)));
        assert_eq!(serde_json::from_str::<HeaderHash>(&json).unwrap(), HeaderHash::ZERO);
    }
}
