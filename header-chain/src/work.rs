use crypto_bigint::{CheckedAdd, U256};

use crate::error::HeaderError;

/// Calculates the amount of work represented by a difficulty target.
///
/// The work for a single block is inversely proportional to its target:
/// work = 2 ** 256 / (target + 1)
///
/// This calculation uses the mathematical identity:
/// 2**256 / (x + 1) == ~x / (x + 1) + 1
/// (Equation shamelessly stolen from bitcoind)
pub fn calculate_work(target: &U256) -> U256 {
    // A zero target never passes the proof-of-work check, so its work is
    // never accumulated. Define the inverse of 0 and 1 as max.
    if *target == U256::ZERO || *target == U256::ONE {
        return U256::MAX;
    }
    // We define the inverse of max as 1.
    if *target == U256::MAX {
        return U256::ONE;
    }

    let comp = !*target;
    let ret = comp.wrapping_div(&target.wrapping_add(&U256::ONE));
    ret.wrapping_add(&U256::ONE)
}

/// Adds the work of a block with `target` on top of its parent's cumulative
/// chain work.
///
/// ## Errors
///
/// [`HeaderError::ArithmeticOverflow`] if the sum leaves 256 bits.
pub fn accumulate_chain_work(parent_work: &U256, target: &U256) -> Result<U256, HeaderError> {
    Option::<U256>::from(parent_work.checked_add(&calculate_work(target)))
        .ok_or(HeaderError::ArithmeticOverflow("chain work"))
}
