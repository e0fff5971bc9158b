//! # Common Utilities for Relay Tests
//!
//! Synthetic chains are mined against easy regtest targets, so a few nonces
//! are enough for each header.

use crate::events::{RelayEvent, RelayObserver};
use crate::relay::Relay;
use crate::store::{HeaderStore, MemoryHeaderStore};
use bitcoin::Network;
use header_chain::{
    bits_to_target, calculate_work, check_proof_of_work, required_target, target_to_bits,
    BlockHeader, ConsensusParams, GenesisSeed, HeaderHash, U256,
};
use std::sync::{Arc, Mutex};

/// Regtest proof-of-work limit, about one in two hashes meets it.
pub const REGTEST_BITS: u32 = 0x207fffff;
/// About one in 256 hashes meets it.
pub const HARDER_BITS: u32 = 0x2000ffff;
pub const GENESIS_TIME: u32 = 1_700_000_000;

/// Collects every event the relay emits.
#[derive(Debug, Clone, Default)]
pub struct EventRecorder {
    events: Arc<Mutex<Vec<RelayEvent>>>,
}

impl EventRecorder {
    pub fn events(&self) -> Vec<RelayEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl RelayObserver for EventRecorder {
    fn notify(&self, event: &RelayEvent) {
        self.events.lock().unwrap().push(event.clone());
    }
}

pub fn regtest() -> ConsensusParams {
    ConsensusParams::new(Network::Regtest)
}

/// Regtest parameters with difficulty adjustment switched on.
pub fn retargeting_params() -> ConsensusParams {
    ConsensusParams {
        no_retargeting: false,
        ..regtest()
    }
}

/// Grinds the nonce until the header meets its own declared target.
pub fn mine(mut header: BlockHeader) -> BlockHeader {
    let target = bits_to_target(header.bits).unwrap();
    while !check_proof_of_work(&header.compute_block_hash(), &target) {
        header.nonce += 1;
    }
    header
}

/// Grinds the nonce until the header fails its own declared target.
pub fn unmine(mut header: BlockHeader) -> BlockHeader {
    let target = bits_to_target(header.bits).unwrap();
    while check_proof_of_work(&header.compute_block_hash(), &target) {
        header.nonce += 1;
    }
    header
}

/// A mined header. `tag` fills the Merkle root to tell siblings apart.
pub fn mined_header(prev: HeaderHash, time: u32, bits: u32, tag: u8) -> BlockHeader {
    mine(BlockHeader {
        version: 0x2000_0000,
        prev_block_hash: prev,
        merkle_root: [tag; 32],
        time,
        bits,
        nonce: 0,
    })
}

/// Bootstraps a relay from a mined header at `height`.
///
/// `seed_bits` of `None` leaves the seed target unset, which lets the first
/// blocks pick their own target.
pub fn bootstrap(
    params: ConsensusParams,
    height: u32,
    seed_bits: Option<u32>,
) -> (Relay<MemoryHeaderStore>, BlockHeader) {
    let genesis = mined_header(HeaderHash::ZERO, GENESIS_TIME, REGTEST_BITS, 0xee);
    let target = match seed_bits {
        Some(bits) => bits_to_target(bits).unwrap(),
        None => U256::ZERO,
    };
    let seed = GenesisSeed::from_header(&genesis, height, &target, &U256::from(1000u64));

    let relay = Relay::new(params, MemoryHeaderStore::new(), seed).unwrap();
    (relay, genesis)
}

/// Mines a child of `parent` declaring whatever target the relay requires,
/// and submits it.
pub fn extend<S: HeaderStore>(
    relay: &mut Relay<S>,
    parent: HeaderHash,
    time_delta: u32,
    tag: u8,
) -> HeaderHash {
    let header = next_header(relay, parent, time_delta, tag);
    relay.store_header(&header.encode()).unwrap()
}

/// Mines, without submitting, a child of `parent` at the required target.
pub fn next_header<S: HeaderStore>(
    relay: &Relay<S>,
    parent: HeaderHash,
    time_delta: u32,
    tag: u8,
) -> BlockHeader {
    let parent = relay.header(&parent).unwrap();
    let last_retarget = relay.header(&parent.epoch_start).unwrap();
    let required = required_target(relay.params(), &parent, parent.height + 1, &last_retarget)
        .unwrap()
        .unwrap_or(relay.params().max_target);

    mined_header(
        parent.hash,
        parent.time + time_delta,
        target_to_bits(&required),
        tag,
    )
}

/// Submits `count` blocks on top of `parent`, ten minutes apart.
pub fn extend_by<S: HeaderStore>(
    relay: &mut Relay<S>,
    mut parent: HeaderHash,
    count: u32,
    tag: u8,
) -> Vec<HeaderHash> {
    let mut hashes = Vec::new();
    for _ in 0..count {
        parent = extend(relay, parent, 600, tag);
        hashes.push(parent);
    }
    hashes
}

/// Work of a single block declaring `bits`.
pub fn block_work(bits: u32) -> U256 {
    calculate_work(&bits_to_target(bits).unwrap())
}
