//! # Trustlog Core
//!
//! Pure primitives for trustlog: hash-chained, signed session logs with
//! optionally encrypted transactions.
//!
//! This crate contains no I/O, no storage, no networking. It is pure
//! computation over cryptographic data structures.
//!
//! ## Key Types
//!
//! - [`SessionLog`] - An append-only transaction log for one signer
//! - [`Transaction`] - A trusting (plaintext) or private (encrypted) entry
//! - [`Digest`] - The Blake3 running hash over the log's chain
//! - [`SignerSecret`] / [`SignerId`] - Ed25519 signing identity
//! - [`KeySecret`] - Symmetric key for private transactions
//!
//! ## Canonicalization
//!
//! Signatures and the hash chain are computed over canonical JSON: sorted
//! object keys, fixed field order. See the [`canonical`] module.

pub mod canonical;
pub mod chain;
pub mod crypto;
pub mod error;
pub mod session_log;
pub mod transaction;

pub use canonical::{canonicalize_json, stable_stringify};
pub use chain::{chain_extend, chain_next, chain_seed};
pub use crypto::{
    Digest, Encrypted, KeyId, KeySecret, NonceContext, SignerId, SignerSecret, TxSignature,
};
pub use error::CoreError;
pub use session_log::{SessionLog, SignedTransaction, TransactionMode};
pub use transaction::{
    PrivateTransaction, Transaction, TrustingTransaction, MAX_CHANGES_SIZE,
};
