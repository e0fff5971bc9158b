//! # Relay Config
//!
//! Configuration options for the header relay.
//!
//! ## Configuration File
//!
//! Configuration options can be read from a TOML file. File contents are
//! described in the [`RelayConfig`] struct:
//!
//! ```toml
//! network = "bitcoin"
//! log_level = "info"
//!
//! [genesis]
//! hash = "000000000019d6689c085ae165831e934ff763ae46a2a6c172b3f1b60a8ce26f"
//! height = 0
//! time = 1231006505
//! merkle_root = "3ba3edfd7a7b12b27ac72c3e67768f617fc81bc3888a51323a9fb8aa4b1e5e4a"
//! bits = 0x1d00ffff
//! chain_work = "0000000000000000000000000000000000000000000000000000000100010001"
//! ```

use bitcoin::Network;
use header_chain::{bits_to_target, ConsensusParams, Encoding, GenesisSeed, HeaderHash, U256};
use relay_errors::RelayError;
use serde::{Deserialize, Serialize};
use std::{fs::File, io::Read, path::PathBuf};

/// Configuration options for the relay binary and tests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayConfig {
    /// Bitcoin network whose difficulty rules are enforced.
    pub network: Network,
    /// Trusted header the relay starts from.
    pub genesis: GenesisConfig,
    /// Default log level, used when `RUST_LOG` is not set.
    #[serde(default)]
    pub log_level: Option<String>,
}

/// Bootstrap seed as written in the configuration file.
///
/// `hash` is in display order, `merkle_root` in serialized order and
/// `chain_work` is a big-endian 256-bit integer, all hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisConfig {
    #[serde(with = "hex::serde")]
    pub hash: [u8; 32],
    pub height: u32,
    pub time: u32,
    #[serde(with = "hex::serde")]
    pub merkle_root: [u8; 32],
    /// Compact target of the seed block. Zero leaves the target unset.
    pub bits: u32,
    #[serde(with = "hex::serde")]
    pub chain_work: [u8; 32],
}

impl RelayConfig {
    /// Create a new `RelayConfig` with default values.
    pub fn new() -> Self {
        RelayConfig {
            ..Default::default()
        }
    }

    /// Read contents of a TOML file and generate a `RelayConfig`.
    pub fn try_parse_file(path: PathBuf) -> Result<Self, RelayError> {
        let mut contents = String::new();

        let mut file = match File::open(path.clone()) {
            Ok(f) => f,
            Err(e) => return Err(RelayError::ConfigError(e.to_string())),
        };

        if let Err(e) = file.read_to_string(&mut contents) {
            return Err(RelayError::ConfigError(e.to_string()));
        }

        tracing::trace!("Using configuration file: {:?}", path);

        RelayConfig::try_parse_from(&contents)
    }

    /// Try to parse a `RelayConfig` from given TOML formatted string.
    pub fn try_parse_from(input: &str) -> Result<Self, RelayError> {
        Ok(toml::from_str::<RelayConfig>(input)?)
    }

    /// Difficulty rules of the configured network.
    pub fn consensus_params(&self) -> ConsensusParams {
        ConsensusParams::new(self.network)
    }

    /// Builds the bootstrap seed from the `genesis` section.
    pub fn genesis_seed(&self) -> Result<GenesisSeed, RelayError> {
        self.genesis.to_seed()
    }
}

impl GenesisConfig {
    pub fn to_seed(&self) -> Result<GenesisSeed, RelayError> {
        let target = if self.bits == 0 {
            U256::ZERO
        } else {
            bits_to_target(self.bits)?
        };

        Ok(GenesisSeed {
            hash: HeaderHash(self.hash),
            height: self.height,
            time: self.time,
            merkle_root: self.merkle_root,
            target: target.to_be_bytes(),
            chain_work: self.chain_work,
        })
    }
}

impl Default for GenesisConfig {
    /// Bitcoin mainnet genesis block.
    fn default() -> Self {
        GenesisConfig {
            hash: [
                0x00, 0x00, 0x00, 0x00, 0x00, 0x19, 0xd6, 0x68, 0x9c, 0x08, 0x5a, 0xe1, 0x65, 0x83,
                0x1e, 0x93, 0x4f, 0xf7, 0x63, 0xae, 0x46, 0xa2, 0xa6, 0xc1, 0x72, 0xb3, 0xf1, 0xb6,
                0x0a, 0x8c, 0xe2, 0x6f,
            ],
            height: 0,
            time: 1231006505,
            merkle_root: [
                0x3b, 0xa3, 0xed, 0xfd, 0x7a, 0x7b, 0x12, 0xb2, 0x7a, 0xc7, 0x2c, 0x3e, 0x67, 0x76,
                0x8f, 0x61, 0x7f, 0xc8, 0x1b, 0xc3, 0x88, 0x8a, 0x51, 0x32, 0x3a, 0x9f, 0xb8, 0xaa,
                0x4b, 0x1e, 0x5e, 0x4a,
            ],
            bits: 0x1d00ffff,
            chain_work: [
                0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1,
                0, 1, 0, 1,
            ],
        }
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            network: Network::Bitcoin,
            genesis: GenesisConfig::default(),
            log_level: None,
        }
    }
}
