//! # Header Errors
//!
//! Rejection reasons for a submitted header. None of them ever leaves a
//! partial write behind: every check runs before the store is touched.

use thiserror::Error;

use crate::hashes::HeaderHash;

/// Errors returned while decoding or validating a block header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    #[error("Malformed header data: {0} bytes")]
    MalformedHeader(usize),
    #[error("Header hash is zero")]
    InvalidHash,
    #[error("Previous block {0} is not stored")]
    UnknownParent(HeaderHash),
    #[error("Block {0} is already stored")]
    DuplicateHeader(HeaderHash),
    #[error("Block hash {0} is not below its target")]
    InsufficientProofOfWork(HeaderHash),
    #[error("Bad difficulty target at height {height}: expected bits {expected:#010x}, got {got:#010x}")]
    BadDifficultyTarget { height: u32, expected: u32, got: u32 },
    #[error("Compact target {0:#010x} does not fit in 256 bits")]
    TargetOverflow(u32),
    #[error("Arithmetic overflow occurred: {0}")]
    ArithmeticOverflow(&'static str),
}

impl HeaderError {
    /// Numeric code carried by rejection notifications in place of a height.
    pub fn code(&self) -> u32 {
        match self {
            HeaderError::MalformedHeader(_) => 10_010,
            HeaderError::InvalidHash => 10_020,
            HeaderError::UnknownParent(_) => 10_030,
            HeaderError::DuplicateHeader(_) => 10_040,
            HeaderError::InsufficientProofOfWork(_) => 10_050,
            HeaderError::BadDifficultyTarget { .. } => 10_060,
            HeaderError::TargetOverflow(_) => 10_070,
            HeaderError::ArithmeticOverflow(_) => 10_080,
        }
    }
}
