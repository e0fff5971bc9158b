//! # Relay
//!
//! Accepts serialized block headers from untrusted submitters, validates each
//! one against the stored forest and keeps the heaviest tip up to date.
//!
//! ## Submission
//!
//! [`Relay::store_header`] is one transaction. Decoding, every consensus check
//! and the chain work computation read from the store only; the record is
//! written by a single [`HeaderStore::insert`] and the tip is then moved by
//! [`ChainSelector::on_insert`], which cannot fail. A rejected header
//! therefore leaves no trace except its notification.
//!
//! The relay takes `&mut self` for submissions, so callers that share it
//! across submitters serialize them behind their own lock.

use crate::{
    events::{RelayEvent, RelayObserver},
    inclusion::InclusionVerifier,
    selector::{ChainSelector, ChainState},
    store::HeaderStore,
};
use bitcoin::Txid;
use header_chain::{
    accumulate_chain_work, bits_to_target, verify_difficulty_target, verify_proof_of_work,
    BlockHeader, ConsensusParams, GenesisSeed, HeaderError, HeaderHash, HeaderRecord, HEADER_SIZE,
    U256,
};
use relay_errors::{InclusionError, RelayError};
use thiserror::Error;

/// A batch submission stopped at a rejected header.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Batch stopped after {accepted} accepted headers: {source}")]
pub struct BatchError {
    /// Headers stored before the failure.
    pub accepted: usize,
    #[source]
    pub source: HeaderError,
}

pub struct Relay<S: HeaderStore> {
    params: ConsensusParams,
    store: S,
    selector: ChainSelector,
    observers: Vec<Box<dyn RelayObserver>>,
}

impl<S: HeaderStore> Relay<S> {
    /// Bootstraps a relay from a trusted seed.
    ///
    /// The seed record is written as is, without validation. `store` must be
    /// empty: a relay is bootstrapped exactly once.
    pub fn new(
        params: ConsensusParams,
        mut store: S,
        seed: GenesisSeed,
    ) -> Result<Self, RelayError> {
        if seed.hash.is_zero() {
            return Err(RelayError::Bootstrap("seed hash is zero".to_string()));
        }
        if !store.is_empty() {
            return Err(RelayError::Bootstrap(
                "header store already holds records".to_string(),
            ));
        }

        let record = seed.into_record();
        store.put(record.clone());
        let selector = ChainSelector::new(&record);

        tracing::info!(
            hash = %record.hash,
            height = record.height,
            network = %params.network,
            "Relay bootstrapped"
        );

        Ok(Relay {
            params,
            store,
            selector,
            observers: Vec::new(),
        })
    }

    /// Registers an observer for [`RelayEvent`]s.
    pub fn with_observer(mut self, observer: impl RelayObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    pub fn params(&self) -> &ConsensusParams {
        &self.params
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and stores one serialized header.
    ///
    /// Emits exactly one event: [`RelayEvent::Stored`] on success,
    /// [`RelayEvent::Rejected`] otherwise.
    ///
    /// # Returns
    ///
    /// The hash of the stored block.
    pub fn store_header(&mut self, raw: &[u8]) -> Result<HeaderHash, HeaderError> {
        let (hash, result) = match BlockHeader::decode(raw) {
            Ok(header) => {
                let hash = header.compute_block_hash();
                let result = self
                    .validate_header(&header, hash)
                    .and_then(|record| self.commit(record));
                (hash, result)
            }
            Err(e) => (HeaderHash::ZERO, Err(e)),
        };

        let event = match &result {
            Ok(height) => RelayEvent::Stored {
                hash,
                height: *height,
            },
            Err(e) => {
                tracing::debug!(%hash, "Header rejected: {e}");
                RelayEvent::rejected(hash, e)
            }
        };
        self.emit(&event);

        result.map(|_| hash)
    }

    /// Stores a concatenation of serialized headers in order.
    ///
    /// Stops at the first rejected header; headers before it stay stored. A
    /// length that is not a multiple of [`HEADER_SIZE`] is rejected before
    /// anything is submitted.
    ///
    /// # Returns
    ///
    /// Number of headers stored.
    pub fn store_headers(&mut self, raw: &[u8]) -> Result<usize, BatchError> {
        if raw.len() % HEADER_SIZE != 0 {
            return Err(BatchError {
                accepted: 0,
                source: HeaderError::MalformedHeader(raw.len()),
            });
        }

        for (accepted, chunk) in raw.chunks_exact(HEADER_SIZE).enumerate() {
            self.store_header(chunk)
                .map_err(|source| BatchError { accepted, source })?;
        }

        Ok(raw.len() / HEADER_SIZE)
    }

    /// Runs every check against the current state and builds the record to
    /// insert. Nothing is written.
    fn validate_header(
        &self,
        header: &BlockHeader,
        hash: HeaderHash,
    ) -> Result<HeaderRecord, HeaderError> {
        if hash.is_zero() {
            return Err(HeaderError::InvalidHash);
        }
        if self.store.contains(&hash) {
            return Err(HeaderError::DuplicateHeader(hash));
        }

        let parent = self
            .store
            .get(&header.prev_block_hash)
            .ok_or(HeaderError::UnknownParent(header.prev_block_hash))?;
        let height = parent
            .height
            .checked_add(1)
            .ok_or(HeaderError::ArithmeticOverflow("height"))?;

        let target = bits_to_target(header.bits)?;
        verify_proof_of_work(&hash, &target)?;

        let last_retarget = self
            .store
            .get(&parent.epoch_start)
            .ok_or(HeaderError::UnknownParent(parent.epoch_start))?;
        verify_difficulty_target(
            &self.params,
            &parent,
            height,
            &last_retarget,
            header.bits,
            &target,
        )?;

        let chain_work = accumulate_chain_work(&parent.chain_work(), &target)?;
        let epoch_start = if self.params.is_retarget_height(height) {
            hash
        } else {
            parent.epoch_start
        };

        Ok(HeaderRecord::from_header(
            header,
            hash,
            height,
            &target,
            &chain_work,
            epoch_start,
        ))
    }

    fn commit(&mut self, record: HeaderRecord) -> Result<u32, HeaderError> {
        let height = record.height;
        self.store.insert(record.clone())?;
        tracing::debug!(hash = %record.hash, height, "Header accepted");
        self.selector.on_insert(&record);

        Ok(height)
    }

    fn emit(&self, event: &RelayEvent) {
        for observer in &self.observers {
            observer.notify(event);
        }
    }

    /// Cumulative work of a stored block, zero for unknown hashes.
    pub fn chain_work(&self, hash: &HeaderHash) -> U256 {
        self.store
            .get(hash)
            .map(|record| record.chain_work())
            .unwrap_or(U256::ZERO)
    }

    pub fn chain_state(&self) -> &ChainState {
        self.selector.state()
    }

    pub fn heaviest_tip(&self) -> HeaderHash {
        self.chain_state().heaviest_tip
    }

    pub fn high_score(&self) -> U256 {
        self.chain_state().high_score()
    }

    pub fn last_retarget_block(&self) -> HeaderHash {
        self.chain_state().last_retarget_block
    }

    pub fn header(&self, hash: &HeaderHash) -> Option<HeaderRecord> {
        self.store.get(hash)
    }

    pub fn block_height(&self, hash: &HeaderHash) -> Option<u32> {
        self.store.get(hash).map(|record| record.height)
    }

    pub fn merkle_root(&self, hash: &HeaderHash) -> Option<[u8; 32]> {
        self.store.get(hash).map(|record| record.merkle_root)
    }

    /// Hash of the heaviest chain's block at `height`. `None` above the tip
    /// or below the bootstrap record.
    pub fn main_chain_hash_at(&self, height: u32) -> Option<HeaderHash> {
        let mut record = self.store.get(&self.heaviest_tip())?;
        if height > record.height {
            return None;
        }

        while record.height > height {
            record = self.store.get(&record.prev_hash)?;
        }

        Some(record.hash)
    }

    pub fn is_in_main_chain(&self, hash: &HeaderHash) -> bool {
        self.block_height(hash)
            .and_then(|height| self.main_chain_hash_at(height))
            .is_some_and(|main| main == *hash)
    }

    /// Number of heaviest-chain blocks from `hash` to the tip, both included.
    /// `None` for blocks off the heaviest chain.
    pub fn confirmations(&self, hash: &HeaderHash) -> Option<u32> {
        if !self.is_in_main_chain(hash) {
            return None;
        }

        let tip_height = self.block_height(&self.heaviest_tip())?;
        let height = self.block_height(hash)?;
        Some(tip_height - height + 1)
    }

    /// Checks that `txid` is included in a heaviest-chain block buried under
    /// at least `min_confirmations` blocks.
    pub fn verify_inclusion<V: InclusionVerifier>(
        &self,
        verifier: &V,
        block_hash: &HeaderHash,
        txid: &Txid,
        proof: &V::Proof,
        min_confirmations: u32,
    ) -> Result<(), InclusionError> {
        let record = self
            .store
            .get(block_hash)
            .ok_or(InclusionError::UnknownBlock(*block_hash))?;

        let confirmations = self
            .confirmations(block_hash)
            .ok_or(InclusionError::NotInMainChain(*block_hash))?;
        if confirmations < min_confirmations {
            return Err(InclusionError::InsufficientConfirmations {
                hash: *block_hash,
                confirmations,
                required: min_confirmations,
            });
        }

        if !verifier.verify(&record.merkle_root, txid, proof) {
            return Err(InclusionError::ProofRejected(*block_hash));
        }

        Ok(())
    }
}
