//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use trustlog_core::{
    KeyId, KeySecret, SessionLog, SignerId, SignerSecret, TransactionMode, TxSignature,
};

/// A test fixture with a signing identity and a symmetric key.
pub struct TestFixture {
    pub signer_secret: SignerSecret,
    pub key_secret: KeySecret,
    pub key_id: KeyId,
}

impl TestFixture {
    /// Create a new fixture with random key material.
    pub fn new() -> Self {
        Self {
            signer_secret: SignerSecret::generate(),
            key_secret: KeySecret::generate(),
            key_id: KeyId("key_ztest".to_string()),
        }
    }

    /// Create with deterministic key material from a seed byte.
    pub fn with_seed(seed: u8) -> Self {
        Self {
            signer_secret: SignerSecret::from_seed([seed; 32]),
            key_secret: KeySecret::from_bytes([seed.wrapping_add(1); 32]),
            key_id: KeyId(format!("key_ztest{seed}")),
        }
    }

    pub fn signer_id(&self) -> SignerId {
        self.signer_secret.signer_id()
    }

    /// An empty log owned by this fixture's signer.
    pub fn log(&self, document_id: &str, session_id: &str) -> SessionLog {
        SessionLog::new(document_id, session_id, self.signer_id())
    }

    /// Author a batch of trusting transactions into a scratch log and
    /// return their canonical JSON forms together with the signature over
    /// the final chain state, ready to feed a replica's `try_add`.
    pub fn signed_batch(
        &self,
        document_id: &str,
        session_id: &str,
        changes: &[&str],
    ) -> (Vec<String>, TxSignature) {
        let mut scratch = self.log(document_id, session_id);
        let mut jsons = Vec::with_capacity(changes.len());
        let mut signature = None;
        for (i, c) in changes.iter().enumerate() {
            let out = scratch
                .add_new(c, None, i as u64, TransactionMode::Trusting, &self.signer_secret)
                .expect("fixture changes must be valid JSON");
            jsons.push(
                String::from_utf8(out.transaction.canonical_bytes())
                    .expect("canonical bytes are UTF-8"),
            );
            signature = Some(out.signature);
        }
        (jsons, signature.expect("batch must not be empty"))
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixtures for a two-party scenario (for example sealer tests).
pub fn two_parties() -> (TestFixture, TestFixture) {
    (TestFixture::with_seed(1), TestFixture::with_seed(101))
}
