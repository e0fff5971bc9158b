//! # Consensus Parameters
//!
//! Network dependent constants for difficulty validation.

use bitcoin::Network;
use crypto_bigint::U256;

/// Expected duration of a difficulty adjustment epoch in seconds.
///
/// Bitcoin adjusts difficulty every 2016 blocks, aiming for 10 minutes per
/// block: 60 * 60 * 24 * 14 = 1,209,600 seconds.
pub const EXPECTED_EPOCH_TIMESPAN: u32 = 60 * 60 * 24 * 14;

/// Number of blocks in a difficulty adjustment epoch.
pub const BLOCKS_PER_EPOCH: u32 = 2016;

/// Upper bound for retargeted mainnet targets, 2^224 - 1. Its compact form is
/// `0x1d00ffff`, the same as the mainnet proof-of-work limit.
pub const MAINNET_MAX_TARGET: U256 =
    U256::from_be_hex("00000000FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF");

/// Signet proof-of-work limit, compact `0x1e0377ae`.
pub const SIGNET_MAX_TARGET: U256 =
    U256::from_be_hex("00000377AE000000000000000000000000000000000000000000000000000000");

/// Regtest proof-of-work limit, compact `0x207fffff`.
pub const REGTEST_MAX_TARGET: U256 =
    U256::from_be_hex("7FFFFF0000000000000000000000000000000000000000000000000000000000");

/// Difficulty rules of one network.
///
/// ## Fields
///
/// * `max_target` - Largest (easiest) target a block may carry; retargets are clamped to it
/// * `target_timespan` - Expected epoch duration in seconds
/// * `blocks_per_epoch` - Retarget interval in blocks
/// * `no_retargeting` - Keep the parent's target at epoch boundaries (regtest)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsensusParams {
    pub network: Network,
    pub max_target: U256,
    pub target_timespan: u32,
    pub blocks_per_epoch: u32,
    pub no_retargeting: bool,
}

impl ConsensusParams {
    pub fn new(network: Network) -> Self {
        let (max_target, no_retargeting) = match network {
            Network::Signet => (SIGNET_MAX_TARGET, false),
            Network::Regtest => (REGTEST_MAX_TARGET, true),
            _ => (MAINNET_MAX_TARGET, false),
        };

        ConsensusParams {
            network,
            max_target,
            target_timespan: EXPECTED_EPOCH_TIMESPAN,
            blocks_per_epoch: BLOCKS_PER_EPOCH,
            no_retargeting,
        }
    }

    /// Whether `height` opens a new difficulty epoch.
    pub fn is_retarget_height(&self, height: u32) -> bool {
        height % self.blocks_per_epoch == 0
    }
}

impl Default for ConsensusParams {
    fn default() -> Self {
        ConsensusParams::new(Network::Bitcoin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::target_to_bits;

    #[test]
    fn test_max_targets_compact_form() {
        assert_eq!(target_to_bits(&MAINNET_MAX_TARGET), 0x1d00ffff);
        assert_eq!(target_to_bits(&SIGNET_MAX_TARGET), 0x1e0377ae);
        assert_eq!(target_to_bits(&REGTEST_MAX_TARGET), 0x207fffff);
    }

    #[test]
    fn test_network_selection() {
        assert!(ConsensusParams::new(Network::Regtest).no_retargeting);
        assert!(!ConsensusParams::new(Network::Testnet).no_retargeting);
        assert_eq!(ConsensusParams::default().max_target, MAINNET_MAX_TARGET);
        assert!(ConsensusParams::default().is_retarget_height(4032));
        assert!(!ConsensusParams::default().is_retarget_height(4031));
    }
}
