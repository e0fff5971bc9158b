//! # Difficulty Retargeting
//!
//! Decides the target a block must carry at a given height. Within an epoch
//! the target is inherited from the parent; on the first block of an epoch it
//! is recomputed from how long the previous epoch took.
//!
//! Everything here is pure: the caller hands in the parent record and the
//! record that opened the parent's epoch.

use crypto_bigint::{CheckedAdd, CheckedMul, U256};

use crate::{
    error::HeaderError,
    params::ConsensusParams,
    record::HeaderRecord,
    target::{normalize_target, target_to_bits},
};

/// Calculates the new difficulty target after a difficulty adjustment epoch.
///
/// ## Algorithm
///
/// 1. Calculate actual timespan: `last_timestamp - epoch_start_time`
/// 2. Clamp timespan to [expected/4, expected*4] to limit adjustment range
/// 3. New target = old target * actual_timespan / expected_timespan
/// 4. Ensure new target doesn't exceed network maximum
/// 5. Round to compact precision, as a header can only declare compact targets
///
/// ## Parameters
///
/// * `epoch_start_time` - Timestamp of the first block in the epoch
/// * `last_timestamp` - Timestamp of the last block in the epoch
/// * `current_target` - Target of the last block in the epoch
pub fn calculate_new_difficulty(
    params: &ConsensusParams,
    epoch_start_time: u32,
    last_timestamp: u32,
    current_target: &U256,
) -> Result<U256, HeaderError> {
    let expected_timespan = i64::from(params.target_timespan);
    // Timestamps are not monotonic, so the difference may be negative.
    let actual_timespan = (i64::from(last_timestamp) - i64::from(epoch_start_time))
        .clamp(expected_timespan / 4, expected_timespan * 4);

    let actual = U256::from(actual_timespan as u64);
    let expected = U256::from(params.target_timespan);

    // target * actual / expected, split as target = q * expected + r. A product
    // that leaves 256 bits is above any max target, so it clamps like one.
    let quotient = current_target.wrapping_div(&expected);
    let remainder = current_target.wrapping_rem(&expected);
    let new_target = Option::<U256>::from(quotient.checked_mul(&actual))
        .and_then(|scaled| {
            let carry = remainder.wrapping_mul(&actual).wrapping_div(&expected);
            Option::<U256>::from(scaled.checked_add(&carry))
        })
        .filter(|new_target| *new_target <= params.max_target)
        .unwrap_or(params.max_target);

    normalize_target(&new_target)
}

/// Target a block at `candidate_height` on top of `parent` must declare.
///
/// Returns `None` when no constraint applies: the parent's target is zero, i.e.
/// a bootstrap record seeded without one. This holds on epoch boundaries too,
/// as there is no target to scale.
///
/// ## Parameters
///
/// * `parent` - Record the candidate extends
/// * `candidate_height` - `parent.height + 1`
/// * `last_retarget` - Record that opened the parent's epoch (`parent.epoch_start`)
pub fn required_target(
    params: &ConsensusParams,
    parent: &HeaderRecord,
    candidate_height: u32,
    last_retarget: &HeaderRecord,
) -> Result<Option<U256>, HeaderError> {
    let parent_target = parent.target();
    if parent_target == U256::ZERO {
        return Ok(None);
    }

    if !params.is_retarget_height(candidate_height) || params.no_retargeting {
        return Ok(Some(parent_target));
    }

    calculate_new_difficulty(params, last_retarget.time, parent.time, &parent_target).map(Some)
}

/// Checks the declared target of a candidate block against [`required_target`].
///
/// Unconstrained candidates still have to declare a non-zero target no larger
/// than the network maximum.
pub fn verify_difficulty_target(
    params: &ConsensusParams,
    parent: &HeaderRecord,
    candidate_height: u32,
    last_retarget: &HeaderRecord,
    declared_bits: u32,
    declared_target: &U256,
) -> Result<(), HeaderError> {
    let expected = required_target(params, parent, candidate_height, last_retarget)?;

    let valid = match expected {
        Some(expected) => *declared_target == expected,
        None => *declared_target != U256::ZERO && *declared_target <= params.max_target,
    };

    if valid {
        return Ok(());
    }

    let expected_bits = target_to_bits(&expected.unwrap_or(params.max_target));
    tracing::debug!(
        candidate_height,
        expected_bits,
        declared_bits,
        "Declared target does not match the consensus target"
    );

    Err(HeaderError::BadDifficultyTarget {
        height: candidate_height,
        expected: expected_bits,
        got: declared_bits,
    })
}
