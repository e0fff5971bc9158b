//! # Targets
//!
//! Conversion between the compact `nBits` encoding and full 256-bit targets,
//! and the proof-of-work comparison against a target.

use crypto_bigint::{Encoding, U256};

use crate::{error::HeaderError, hashes::HeaderHash};

/// Bit 23 of the mantissa. Bitcoin Core treats the mantissa as signed, so a
/// set sign bit encodes a negative target.
const MANTISSA_SIGN_BIT: u32 = 0x0080_0000;

/// Converts compact target representation (bits) to the full 256-bit target.
///
/// ## Compact Target Format
///
/// - Bits 24-31: Size/exponent `e`, the number of bytes of the full target
/// - Bits 0-23: Mantissa `m`
///
/// The target is `m * 256^(e - 3)`. Exponents below 3 shift the mantissa right.
/// A negative mantissa decodes to zero, which no hash can satisfy.
///
/// ## Errors
///
/// [`HeaderError::TargetOverflow`] if the decoded value needs more than 256 bits.
pub fn bits_to_target(bits: u32) -> Result<U256, HeaderError> {
    let size = (bits >> 24) as usize;
    let mantissa = bits & 0x00ff_ffff;

    // https://github.com/bitcoin/bitcoin/blob/ee42d59d4de970769ebabf77b89ff4269498f61e/src/arith_uint256.cpp#L175
    if mantissa & MANTISSA_SIGN_BIT != 0 || mantissa == 0 {
        return Ok(U256::ZERO);
    }

    if size <= 3 {
        return Ok(U256::from(mantissa >> (8 * (3 - size))));
    }

    let shift = 8 * (size - 3);
    let mantissa_bits = (u32::BITS - mantissa.leading_zeros()) as usize;
    if mantissa_bits + shift > 256 {
        return Err(HeaderError::TargetOverflow(bits));
    }

    Ok(U256::from(mantissa) << shift)
}

/// Converts a full target to its compact representation (bits).
///
/// Inverse of [`bits_to_target`] up to precision: the mantissa keeps the
/// three most significant bytes and the rest is truncated. If the top
/// mantissa byte would set the sign bit, the mantissa is shifted down one
/// byte and the size grows by one.
pub fn target_to_bits(target: &U256) -> u32 {
    let mut size = target.bits().div_ceil(8);

    let mut compact = if size <= 3 {
        low_u32(target) << (8 * (3 - size))
    } else {
        low_u32(&(*target >> (8 * (size - 3))))
    };

    if compact & MANTISSA_SIGN_BIT != 0 {
        compact >>= 8;
        size += 1;
    }

    compact | ((size as u32) << 24)
}

/// Rounds a target to the precision representable in compact form.
pub fn normalize_target(target: &U256) -> Result<U256, HeaderError> {
    bits_to_target(target_to_bits(target))
}

fn low_u32(value: &U256) -> u32 {
    let bytes = value.to_be_bytes();
    u32::from_be_bytes([bytes[28], bytes[29], bytes[30], bytes[31]])
}

/// Whether the block hash, read as a big-endian integer, is strictly below
/// the target.
pub fn check_proof_of_work(hash: &HeaderHash, target: &U256) -> bool {
    hash.to_u256() < *target
}

/// Fails with [`HeaderError::InsufficientProofOfWork`] unless the hash meets
/// the target.
pub fn verify_proof_of_work(hash: &HeaderHash, target: &U256) -> Result<(), HeaderError> {
    if check_proof_of_work(hash, target) {
        Ok(())
    } else {
        Err(HeaderError::InsufficientProofOfWork(*hash))
    }
}
