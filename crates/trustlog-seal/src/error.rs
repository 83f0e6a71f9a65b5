//! Error types for the sealed-message codec.

use thiserror::Error;

/// Errors produced when parsing sealer key material or sealing/unsealing.
#[derive(Debug, Error)]
pub enum SealError {
    #[error("invalid prefix: {field} must start with '{prefix}'")]
    InvalidPrefix {
        field: &'static str,
        prefix: &'static str,
    },

    #[error("invalid base58 in {0}")]
    Base58(&'static str),

    #[error("invalid length for {field} (expected {expected} bytes, got {actual})")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("sealing failed")]
    SealFailed,

    #[error("authentication failed: wrong keys, wrong direction, or tampered message")]
    AuthenticationFailed,
}
