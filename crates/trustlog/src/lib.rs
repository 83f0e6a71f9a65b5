//! # Trustlog
//!
//! The unified API for trustlog: cryptographically verifiable session logs
//! plus a sealed-message codec.
//!
//! ## Overview
//!
//! - **Session logs**: Append-only transaction logs, one per
//!   `(document, session, signer)`, protected by a Blake3 hash chain and
//!   an Ed25519 signature over the chain state.
//! - **Transactions**: Trusting (plaintext) or private (encrypted under a
//!   named symmetric key with deterministic per-index nonces).
//! - **Registry**: Logs live behind opaque [`LogHandle`]s; handles are
//!   never reused, so destroyed logs stay unreachable.
//! - **Sealed messages**: Authenticated X25519 + XChaCha20-Poly1305
//!   encryption between sealer identities, direction bound into the key.
//!
//! ## Usage
//!
//! ```rust
//! use trustlog::{LogRegistry, SignerSecret};
//!
//! let registry = LogRegistry::new();
//! let secret = SignerSecret::generate();
//!
//! let handle = registry
//!     .create("co_zDoc1", "session_1", secret.signer_id())
//!     .unwrap();
//!
//! let out = registry
//!     .add_new_trusting_transaction(handle, r#"{"op":"set","k":1}"#, None, 100, &secret)
//!     .unwrap();
//!
//! assert_eq!(registry.len(handle).unwrap(), 1);
//! assert_eq!(registry.running_hash(handle).unwrap(), out.new_hash);
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `trustlog::core` - Core primitives (SessionLog, Transaction, crypto)
//! - `trustlog::seal` - Sealed-message codec

pub mod error;
pub mod registry;

// Re-export component crates
pub use trustlog_core as core;
pub use trustlog_seal as seal;

// Re-export main types for convenience
pub use error::{RegistryError, Result};
pub use registry::{AppendOutcome, LogHandle, LogRegistry};

// Re-export commonly used core types
pub use trustlog_core::{
    Digest, KeyId, KeySecret, SessionLog, SignedTransaction, SignerId, SignerSecret, Transaction,
    TxSignature,
};
pub use trustlog_seal::{seal, unseal, SealerId, SealerSecret};
