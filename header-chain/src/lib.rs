//! # Header Chain
//! Bitcoin header chain consensus rules: header decoding and hashing, compact
//! targets, proof-of-work, difficulty retargeting and chain work.
//!
//! Nothing in this crate touches storage. Callers look up the records a rule
//! needs and pass them in, which keeps every rule testable against known
//! mainnet data.
//!
//! Implementation of this crate is inspired by the Bitcoin Core source code.
//!
//! **⚠️ Warning:** This implementation is not a word-to-word translation of the Bitcoin Core source code.

pub mod error;
pub mod hashes;
pub mod header;
pub mod params;
pub mod record;
pub mod retarget;
pub mod target;
pub mod work;

pub use crypto_bigint::{Encoding, U256};
pub use error::HeaderError;
pub use hashes::HeaderHash;
pub use header::{BlockHeader, HEADER_SIZE};
pub use params::{ConsensusParams, BLOCKS_PER_EPOCH, EXPECTED_EPOCH_TIMESPAN};
pub use record::{GenesisSeed, HeaderRecord};
pub use retarget::{calculate_new_difficulty, required_target, verify_difficulty_target};
pub use target::{bits_to_target, check_proof_of_work, target_to_bits, verify_proof_of_work};
pub use work::{accumulate_chain_work, calculate_work};
