//! # Chain Selection
//!
//! Tracks the heaviest tip of the header forest. [`ChainSelector::on_insert`]
//! is the only transition that changes which chain is canonical.

use borsh::{BorshDeserialize, BorshSerialize};
use header_chain::{Encoding, HeaderHash, HeaderRecord, U256};
use serde::{Deserialize, Serialize};

/// Canonical chain pointer.
///
/// ## Fields
///
/// * `heaviest_tip` - Hash of the record with the most chain work seen so far
/// * `high_score` - Chain work of `heaviest_tip`, big-endian
/// * `last_retarget_block` - First block of the heaviest tip's difficulty epoch
/// * `version` - Bumped on every tip change
#[derive(Serialize, Deserialize, Eq, PartialEq, Clone, Debug, BorshDeserialize, BorshSerialize)]
pub struct ChainState {
    pub heaviest_tip: HeaderHash,
    #[serde(with = "hex::serde")]
    pub high_score: [u8; 32],
    pub last_retarget_block: HeaderHash,
    pub version: u64,
}

impl ChainState {
    /// State pointing at the bootstrap record.
    pub fn from_bootstrap(record: &HeaderRecord) -> Self {
        ChainState {
            heaviest_tip: record.hash,
            high_score: record.chain_work,
            last_retarget_block: record.epoch_start,
            version: 0,
        }
    }

    pub fn high_score(&self) -> U256 {
        U256::from_be_bytes(self.high_score)
    }
}

#[derive(Debug, Clone)]
pub struct ChainSelector {
    state: ChainState,
}

impl ChainSelector {
    pub fn new(bootstrap: &HeaderRecord) -> Self {
        ChainSelector {
            state: ChainState::from_bootstrap(bootstrap),
        }
    }

    pub fn state(&self) -> &ChainState {
        &self.state
    }

    /// Moves the tip to `record` if it has strictly more chain work than the
    /// current tip. Equal work keeps the earlier tip.
    ///
    /// Returns whether the tip changed.
    pub fn on_insert(&mut self, record: &HeaderRecord) -> bool {
        if record.chain_work() <= self.state.high_score() {
            return false;
        }

        let reorg = record.prev_hash != self.state.heaviest_tip;
        self.state = ChainState {
            heaviest_tip: record.hash,
            high_score: record.chain_work,
            last_retarget_block: record.epoch_start,
            version: self.state.version + 1,
        };

        if reorg {
            tracing::info!(
                tip = %record.hash,
                height = record.height,
                "Heaviest tip moved to another branch"
            );
        } else {
            tracing::debug!(tip = %record.hash, height = record.height, "Heaviest tip extended");
        }

        true
    }
}
