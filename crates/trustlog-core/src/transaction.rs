//! Transaction: the atomic entry of a session log.
//!
//! A transaction is either trusting (plaintext changes, integrity-protected
//! by signature and hash chain only) or private (changes additionally
//! encrypted under a named symmetric key). The two kinds map to a sum type
//! with exhaustive matching at encode and decrypt sites.
//!
//! Serde field order is alphabetical in every struct, which makes
//! `serde_json::to_string` the canonical injective encoding (matching
//! [`stable_stringify`](crate::canonical::stable_stringify) output for the
//! same value). `madeAt` and `meta` are part of the encoding and therefore
//! signed and hash-protected.

use serde::{Deserialize, Serialize};

use crate::crypto::{Encrypted, KeyId};
use crate::error::CoreError;

/// Maximum size of a changes payload (plaintext or encoded ciphertext).
///
/// Oversized transactions fail fast with a validation error before any
/// crypto runs.
pub const MAX_CHANGES_SIZE: usize = 16 * 1024 * 1024;

/// A private transaction: changes encrypted under `key_used`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PrivateTransaction {
    // Fields in alphabetical order: encryptedChanges, keyUsed, madeAt, meta, privacy
    #[serde(rename = "encryptedChanges")]
    pub encrypted_changes: Encrypted,
    #[serde(rename = "keyUsed")]
    pub key_used: KeyId,
    #[serde(rename = "madeAt")]
    pub made_at: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<Encrypted>,
    pub privacy: PrivateTag,
}

/// A trusting transaction: plaintext changes visible to all log members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TrustingTransaction {
    // Fields in alphabetical order: changes, madeAt, meta, privacy
    pub changes: String,
    #[serde(rename = "madeAt")]
    pub made_at: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub meta: Option<String>,
    pub privacy: TrustingTag,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivateTag {
    #[serde(rename = "private")]
    Private,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrustingTag {
    #[serde(rename = "trusting")]
    Trusting,
}

/// A session-log transaction, discriminated by its `privacy` field in the
/// external JSON form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Transaction {
    Private(PrivateTransaction),
    Trusting(TrustingTransaction),
}

impl Transaction {
    /// Decode a transaction from its external JSON form.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let tx: Transaction = serde_json::from_str(json)
            .map_err(|e| CoreError::MalformedTransaction(e.to_string()))?;
        tx.check_size()?;
        Ok(tx)
    }

    /// The canonical byte encoding of this transaction.
    ///
    /// Deterministic and injective: field order is fixed and the changes
    /// payload was normalized at construction.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        serde_json::to_string(self)
            .expect("transaction serialization should not fail")
            .into_bytes()
    }

    /// Caller-supplied logical timestamp. Monotonicity is the caller's
    /// responsibility.
    pub fn made_at(&self) -> u64 {
        match self {
            Transaction::Private(tx) => tx.made_at,
            Transaction::Trusting(tx) => tx.made_at,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Transaction::Private(_))
    }

    /// Size of the changes payload, for the fail-fast input guard.
    pub fn changes_size(&self) -> usize {
        match self {
            Transaction::Private(tx) => tx.encrypted_changes.len(),
            Transaction::Trusting(tx) => tx.changes.len(),
        }
    }

    /// Reject oversized payloads before any crypto runs.
    pub fn check_size(&self) -> Result<(), CoreError> {
        let size = self.changes_size();
        if size > MAX_CHANGES_SIZE {
            return Err(CoreError::PayloadTooLarge {
                actual: size,
                max: MAX_CHANGES_SIZE,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trusting_json_roundtrip() {
        let json = r#"{"changes":"{\"op\":\"set\",\"k\":1}","madeAt":100,"privacy":"trusting"}"#;
        let tx = Transaction::from_json(json).unwrap();

        assert!(!tx.is_private());
        assert_eq!(tx.made_at(), 100);
        assert_eq!(String::from_utf8(tx.canonical_bytes()).unwrap(), json);
    }

    #[test]
    fn test_private_json_roundtrip() {
        let json = r#"{"encryptedChanges":"encrypted_UAAAA","keyUsed":"key_z1","madeAt":7,"privacy":"private"}"#;
        let tx = Transaction::from_json(json).unwrap();

        assert!(tx.is_private());
        assert_eq!(String::from_utf8(tx.canonical_bytes()).unwrap(), json);
    }

    #[test]
    fn test_meta_is_part_of_encoding() {
        let without = Transaction::Trusting(TrustingTransaction {
            changes: "{}".into(),
            made_at: 1,
            meta: None,
            privacy: TrustingTag::Trusting,
        });
        let with = Transaction::Trusting(TrustingTransaction {
            changes: "{}".into(),
            made_at: 1,
            meta: Some("{\"app\":\"x\"}".into()),
            privacy: TrustingTag::Trusting,
        });

        assert_ne!(without.canonical_bytes(), with.canonical_bytes());
    }

    #[test]
    fn test_wrong_privacy_tag_rejected() {
        let json = r#"{"changes":"{}","madeAt":1,"privacy":"secret"}"#;
        assert!(matches!(
            Transaction::from_json(json),
            Err(CoreError::MalformedTransaction(_))
        ));
    }

    #[test]
    fn test_private_missing_key_rejected() {
        let json = r#"{"encryptedChanges":"encrypted_UAAAA","madeAt":7,"privacy":"private"}"#;
        assert!(Transaction::from_json(json).is_err());
    }

    #[test]
    fn test_oversized_payload_rejected() {
        let tx = Transaction::Trusting(TrustingTransaction {
            changes: "x".repeat(MAX_CHANGES_SIZE + 1),
            made_at: 1,
            meta: None,
            privacy: TrustingTag::Trusting,
        });
        assert!(matches!(
            tx.check_size(),
            Err(CoreError::PayloadTooLarge { .. })
        ));
    }
}
