//! Error types for bcrypt operations.
//!
//! Every failure is a local validation failure on caller input. None of them
//! is transient, so retrying with the same input cannot succeed.

use thiserror::Error;

/// Errors that can occur while encoding, hashing or verifying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BcryptError {
    /// Cost outside `MIN_COST..=MAX_COST`
    #[error("Invalid cost: {0} (must be between 4 and 31)")]
    InvalidCost(u32),

    /// Raw salt of the wrong size
    #[error("Invalid salt length: expected {expected} bytes, got {actual}")]
    InvalidSaltLength {
        /// Required salt size in bytes
        expected: usize,
        /// Size that was supplied
        actual: usize,
    },

    /// A character outside the bcrypt radix-64 alphabet, or a dangling
    /// character that cannot complete a byte
    #[error("Invalid encoding: {character:?} at position {position}")]
    InvalidEncoding {
        /// Offending character
        character: char,
        /// Character offset in the input
        position: usize,
    },

    /// Hash or setting string that does not follow `$2?$NN$...`
    #[error("Malformed hash: {0}")]
    MalformedHash(String),

    /// The random source could not produce a salt
    #[error("Insufficient entropy: {0}")]
    InsufficientEntropy(String),

    /// An offloaded hashing task panicked or was cancelled
    #[cfg(feature = "tokio")]
    #[error("Hashing task failed: {0}")]
    TaskFailed(String),
}

/// Result alias used across the crate.
pub type BcryptResult<T> = Result<T, BcryptError>;
