//! # Relay Core
//!
//! Bitcoin light-client relay: stores submitted block headers that extend a
//! trusted bootstrap header, validates them with the rules in `header-chain`
//! and tracks the chain with the most accumulated proof-of-work.
//!
//! - [`store`]: the header forest and its storage backends
//! - [`selector`]: heaviest tip bookkeeping
//! - [`relay`]: header submission and chain queries
//! - [`events`]: notifications for observers
//! - [`inclusion`]: transaction inclusion proofs against stored headers

pub mod cli;
pub mod events;
pub mod inclusion;
pub mod relay;
pub mod selector;
pub mod store;
pub mod utils;

#[cfg(test)]
mod test;

pub use events::{RelayEvent, RelayObserver, TracingObserver};
pub use inclusion::{InclusionVerifier, PartialMerkleTreeVerifier};
pub use relay::{BatchError, Relay};
pub use selector::{ChainSelector, ChainState};
pub use store::{HeaderStore, MemoryHeaderStore};
