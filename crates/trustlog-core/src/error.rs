//! Error types for the trustlog core.

use thiserror::Error;

/// Errors produced by the core engine and its crypto primitives.
///
/// Every expected failure mode (bad signature, wrong key, malformed input)
/// is a typed variant; the engine never panics on caller input.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid prefix: {field} must start with '{prefix}'")]
    InvalidPrefix {
        field: &'static str,
        prefix: &'static str,
    },

    #[error("invalid base58 in {0}")]
    Base58(&'static str),

    #[error("invalid base64 in {0}")]
    Base64(&'static str),

    #[error("invalid length for {field} (expected {expected} bytes, got {actual})")]
    InvalidLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("invalid verifying key")]
    InvalidVerifyingKey,

    #[error("signature verification failed")]
    SignatureFailed,

    #[error("encryption failed")]
    EncryptionFailed,

    #[error("decryption failed: wrong key or tampered ciphertext")]
    DecryptionFailed,

    #[error("malformed transaction JSON: {0}")]
    MalformedTransaction(String),

    #[error("changes payload of {actual} bytes exceeds the {max} byte limit")]
    PayloadTooLarge { actual: usize, max: usize },

    #[error("transaction index {index} out of range (log length {len})")]
    IndexOutOfRange { index: u32, len: usize },

    #[error("transaction at index {0} is trusting, not private")]
    NotPrivate(u32),

    #[error("signer secret does not match the log's signer {0}")]
    SignerMismatch(String),
}
