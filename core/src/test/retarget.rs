use super::common::*;
use header_chain::params::REGTEST_MAX_TARGET;
use header_chain::{calculate_new_difficulty, target_to_bits, HeaderError, HeaderHash};

/// Mines blocks 1..=2015 five minutes apart, so the first epoch runs twice as
/// fast as expected.
fn first_epoch() -> (crate::Relay<crate::MemoryHeaderStore>, HeaderHash, HeaderHash) {
    let (mut relay, genesis) = bootstrap(retargeting_params(), 0, Some(REGTEST_BITS));
    let genesis_hash = genesis.compute_block_hash();

    let mut tip = genesis_hash;
    for _ in 1..2016 {
        tip = extend(&mut relay, tip, 300, 0);
    }
    assert_eq!(relay.block_height(&tip), Some(2015));
    assert_eq!(relay.last_retarget_block(), genesis_hash);

    (relay, genesis_hash, tip)
}

#[test]
fn retarget_boundary_requires_recomputed_target() {
    let (mut relay, genesis_hash, parent) = first_epoch();
    let parent_time = relay.header(&parent).unwrap().time;

    let expected = calculate_new_difficulty(
        relay.params(),
        GENESIS_TIME,
        GENESIS_TIME + 2015 * 300,
        &REGTEST_MAX_TARGET,
    )
    .unwrap();
    let expected_bits = target_to_bits(&expected);
    assert_ne!(expected_bits, REGTEST_BITS);

    let stale = mined_header(parent, parent_time + 300, REGTEST_BITS, 1);
    assert_eq!(
        relay.store_header(&stale.encode()),
        Err(HeaderError::BadDifficultyTarget {
            height: 2016,
            expected: expected_bits,
            got: REGTEST_BITS,
        })
    );
    assert_eq!(relay.last_retarget_block(), genesis_hash);

    let parent_work = relay.chain_work(&parent);
    let boundary = mined_header(parent, parent_time + 300, expected_bits, 2);
    let boundary_hash = relay.store_header(&boundary.encode()).unwrap();

    let record = relay.header(&boundary_hash).unwrap();
    assert_eq!(record.height, 2016);
    assert_eq!(record.target(), expected);
    assert_eq!(record.epoch_start, boundary_hash);
    assert_eq!(
        relay.chain_work(&boundary_hash),
        parent_work.wrapping_add(&block_work(expected_bits))
    );
    assert_eq!(relay.heaviest_tip(), boundary_hash);
    assert_eq!(relay.last_retarget_block(), boundary_hash);

    // The new target carries over to the rest of the epoch.
    let next = mined_header(boundary_hash, boundary.time + 300, REGTEST_BITS, 3);
    assert!(matches!(
        relay.store_header(&next.encode()),
        Err(HeaderError::BadDifficultyTarget { height: 2017, .. })
    ));
    let next = mined_header(boundary_hash, boundary.time + 300, expected_bits, 3);
    relay.store_header(&next.encode()).unwrap();
    assert_eq!(relay.last_retarget_block(), boundary_hash);
}

#[test]
fn regtest_keeps_target_at_boundary() {
    let (mut relay, genesis) = bootstrap(regtest(), 2012, Some(REGTEST_BITS));
    let hashes = extend_by(&mut relay, genesis.compute_block_hash(), 4, 1);

    let boundary = relay.header(&hashes[3]).unwrap();
    assert_eq!(boundary.height, 2016);
    assert_eq!(boundary.bits, REGTEST_BITS);
    assert_eq!(relay.last_retarget_block(), hashes[3]);
}

#[test]
fn unset_seed_target_at_boundary_leaves_first_target_open() {
    let (mut relay, genesis) = bootstrap(retargeting_params(), 2015, None);
    let genesis_hash = genesis.compute_block_hash();

    let boundary = mined_header(genesis_hash, GENESIS_TIME + 600, HARDER_BITS, 1);
    let boundary_hash = relay.store_header(&boundary.encode()).unwrap();

    let record = relay.header(&boundary_hash).unwrap();
    assert_eq!(record.height, 2016);
    assert_eq!(record.bits, HARDER_BITS);
    assert_eq!(record.epoch_start, boundary_hash);
    assert_eq!(relay.heaviest_tip(), boundary_hash);
    assert_eq!(relay.last_retarget_block(), boundary_hash);

    // A sibling may pick its own target as well.
    let sibling = mined_header(genesis_hash, GENESIS_TIME + 600, REGTEST_BITS, 2);
    relay.store_header(&sibling.encode()).unwrap();

    // From then on the chosen target binds the epoch.
    let loose = mined_header(boundary_hash, boundary.time + 600, REGTEST_BITS, 3);
    assert_eq!(
        relay.store_header(&loose.encode()),
        Err(HeaderError::BadDifficultyTarget {
            height: 2017,
            expected: HARDER_BITS,
            got: REGTEST_BITS,
        })
    );
    let next = mined_header(boundary_hash, boundary.time + 600, HARDER_BITS, 3);
    relay.store_header(&next.encode()).unwrap();
    assert_eq!(relay.last_retarget_block(), boundary_hash);
}
