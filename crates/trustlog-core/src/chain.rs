//! The running hash chain over a session log.
//!
//! Each link is `Blake3(previous_digest || canonical_bytes)`. The previous
//! digest is a fixed 32-byte prefix, never delimited, so transaction bytes
//! cannot be shifted across the boundary. Re-deriving the chain from the
//! seed always reproduces the digest the log holds.

use crate::crypto::Digest;
use crate::transaction::Transaction;

const CHAIN_GENESIS: &[u8] = b"trustlog-v0-chain-genesis";

/// The well-known genesis digest every log starts from.
pub fn chain_seed() -> Digest {
    Digest::hash(CHAIN_GENESIS)
}

/// Extend the chain by one transaction encoding.
pub fn chain_next(prev: &Digest, canonical_bytes: &[u8]) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hasher.update(prev.as_bytes());
    hasher.update(canonical_bytes);
    Digest::from_bytes(*hasher.finalize().as_bytes())
}

/// Pure re-derivation of the chain from `start` over the given transactions.
///
/// Used by real appends, the dry-run expected-hash check, and verification;
/// all three must agree by construction.
pub fn chain_extend<'a>(
    start: Digest,
    transactions: impl IntoIterator<Item = &'a Transaction>,
) -> Digest {
    transactions.into_iter().fold(start, |digest, tx| {
        chain_next(&digest, &tx.canonical_bytes())
    })
}
