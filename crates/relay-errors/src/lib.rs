//! # Relay Errors
//!
//! This crate defines the crate-level error wrapper ([`RelayError`]) and
//! extension traits for error/result conversion.
//!
//! ## Error Hierarchy
//!
//! 1. **[`HeaderError`]** - Consensus rejections of a submitted header, defined
//!    next to the rules in `header-chain`.
//! 2. **Domain-specific errors** - [`InclusionError`] for transaction inclusion
//!    queries.
//! 3. **[`RelayError`]** - The main error wrapper. It wraps the errors above and
//!    errors of external crates (I/O, hex, TOML), and carries shared variants
//!    for configuration and bootstrap failures.
//!
//! Extension traits ([`ErrorExt`], [`ResultExt`]) convert errors into
//! `eyre::Report` via [`RelayError`], for binaries that report with `eyre`.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use relay_errors::{RelayError, ResultExt};
//!
//! fn load() -> Result<Vec<u8>, hex::FromHexError> {
//!     hex::decode("zz")
//! }
//!
//! fn example() -> Result<(), eyre::Report> {
//!     load().map_to_eyre()?;
//!     Ok(())
//! }
//! ```

use hex::FromHexError;
use thiserror::Error;

pub use header_chain::{HeaderError, HeaderHash};

/// Errors returned when checking a transaction against a stored block.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InclusionError {
    #[error("Block {0} is not stored")]
    UnknownBlock(HeaderHash),
    #[error("Block {0} is not on the heaviest chain")]
    NotInMainChain(HeaderHash),
    #[error("Block {hash} has {confirmations} confirmations, {required} required")]
    InsufficientConfirmations {
        hash: HeaderHash,
        confirmations: u32,
        required: u32,
    },
    #[error("Inclusion proof rejected for block {0}")]
    ProofRejected(HeaderHash),
}

/// Errors returned by the relay.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RelayError {
    #[error("Header rejected: {0}")]
    Header(#[from] HeaderError),
    #[error("Inclusion check failed: {0}")]
    Inclusion(#[from] InclusionError),

    // Shared error messages
    #[error("Invalid configuration: {0}")]
    ConfigError(String),
    #[error("Bootstrap failed: {0}")]
    Bootstrap(String),

    // External crate error wrappers
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to convert hex string: {0}")]
    FromHexError(#[from] FromHexError),
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    // Base wrapper for eyre
    #[error(transparent)]
    Eyre(#[from] eyre::Report),
}

/// Extension trait for errors to easily convert them to eyre::Report through
/// RelayError.
pub trait ErrorExt: Sized {
    /// Converts the error into an eyre::Report, first wrapping in
    /// RelayError if necessary. It does not rewrap in eyre::Report if
    /// the given error is already an eyre::Report.
    fn into_eyre(self) -> eyre::Report;
}

/// Extension trait for results to easily convert them to eyre::Report through
/// RelayError.
pub trait ResultExt: Sized {
    type Output;

    fn map_to_eyre(self) -> Result<Self::Output, eyre::Report>;
}

impl<T: Into<RelayError>> ErrorExt for T {
    fn into_eyre(self) -> eyre::Report {
        match self.into() {
            RelayError::Eyre(report) => report,
            other => eyre::eyre!(other),
        }
    }
}

impl<U: Sized, T: Into<RelayError>> ResultExt for Result<U, T> {
    type Output = U;

    fn map_to_eyre(self) -> Result<Self::Output, eyre::Report> {
        self.map_err(ErrorExt::into_eyre)
    }
}
