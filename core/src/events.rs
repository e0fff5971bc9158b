//! # Notifications
//!
//! Every `store_header` attempt produces exactly one [`RelayEvent`]. Events are
//! informational for indexers and never feed back into consensus state.

use header_chain::{HeaderError, HeaderHash};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RelayEvent {
    Stored { hash: HeaderHash, height: u32 },
    /// `hash` is zero when the submission was too malformed to hash.
    Rejected { hash: HeaderHash, code: u32 },
}

impl RelayEvent {
    pub fn rejected(hash: HeaderHash, error: &HeaderError) -> Self {
        RelayEvent::Rejected {
            hash,
            code: error.code(),
        }
    }

    pub fn hash(&self) -> HeaderHash {
        match self {
            RelayEvent::Stored { hash, .. } | RelayEvent::Rejected { hash, .. } => *hash,
        }
    }

    /// The `(blockHash, heightOrErrorCode)` pair carried by the event.
    pub fn height_or_code(&self) -> u32 {
        match self {
            RelayEvent::Stored { height, .. } => *height,
            RelayEvent::Rejected { code, .. } => *code,
        }
    }
}

pub trait RelayObserver: Send + Sync {
    fn notify(&self, event: &RelayEvent);
}

/// Writes every event to the `tracing` subscriber.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl RelayObserver for TracingObserver {
    fn notify(&self, event: &RelayEvent) {
        match event {
            RelayEvent::Stored { hash, height } => {
                tracing::info!(%hash, height, "Header stored");
            }
            RelayEvent::Rejected { hash, code } => {
                tracing::warn!(%hash, code, "Header rejected");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_height_or_code() {
        let hash = HeaderHash([7; 32]);
        let stored = RelayEvent::Stored { hash, height: 101 };
        assert_eq!(stored.height_or_code(), 101);
        assert_eq!(stored.hash(), hash);

        let rejected = RelayEvent::rejected(hash, &HeaderError::DuplicateHeader(hash));
        assert_eq!(
            rejected.height_or_code(),
            HeaderError::DuplicateHeader(hash).code()
        );
    }

    #[test]
    fn test_json_shape() {
        let event = RelayEvent::Stored {
            hash: HeaderHash::ZERO,
            height: 5,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "stored");
        assert_eq!(json["height"], 5);
    }
}
