//! Error types for the Till engine.

use thiserror::Error;

/// All possible errors from the Till engine.
///
/// The engine is deliberately hard to fail: the codec leaves malformed
/// fields untouched, reconciliation always picks a winner, and the
/// aggregator never rejects a record. What remains are the two places
/// where input genuinely cannot be made sense of.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown entity type: {0}")]
    UnknownEntity(String),

    #[error("invalid sync state: {0}")]
    InvalidState(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
