//! The session log: an append-only, hash-chained, signed transaction list.
//!
//! A log is keyed by `(document_id, session_id, signer_id)` and owned by a
//! single signer. Appends come in two shapes: [`SessionLog::try_add`] verifies
//! and admits already-signed transactions received from elsewhere, and
//! [`SessionLog::add_new`] authors a new transaction locally, encrypting it
//! first when the caller asks for privacy.
//!
//! Every mutation is all-or-nothing. A batch that fails verification leaves
//! the log exactly as it was.

use crate::canonical::canonicalize_json;
use crate::chain::{chain_extend, chain_next, chain_seed};
use crate::crypto::{
    self, Digest, KeyId, KeySecret, NonceContext, SignerId, SignerSecret, TxSignature,
};
use crate::error::CoreError;
use crate::transaction::{
    PrivateTag, PrivateTransaction, Transaction, TrustingTag, TrustingTransaction,
};

/// Domain prefix for chain-state signatures.
///
/// The signed message is this prefix followed by the 32 digest bytes, so a
/// signature over a chain state can never be confused with a signature over
/// arbitrary data.
const SIGN_DOMAIN: &[u8] = b"trustlog-v0-sign:";

fn signed_message(digest: &Digest) -> Vec<u8> {
    let mut message = Vec::with_capacity(SIGN_DOMAIN.len() + 32);
    message.extend_from_slice(SIGN_DOMAIN);
    message.extend_from_slice(digest.as_bytes());
    message
}

/// How [`SessionLog::add_new`] should treat the changes payload.
pub enum TransactionMode<'a> {
    /// Plaintext changes, readable by anyone holding the log.
    Trusting,
    /// Changes encrypted under `key_secret`, recorded as made with `key_id`.
    Private {
        key_id: KeyId,
        key_secret: &'a KeySecret,
    },
}

/// A locally authored transaction, ready to hand to other replicas.
#[derive(Clone, Debug)]
pub struct SignedTransaction {
    pub transaction: Transaction,
    pub signature: TxSignature,
    pub new_hash: Digest,
}

/// An append-only transaction log for one `(document, session, signer)`.
#[derive(Clone, Debug)]
pub struct SessionLog {
    document_id: String,
    session_id: String,
    signer_id: SignerId,
    transactions: Vec<Transaction>,
    running_hash: Digest,
    last_signature: Option<TxSignature>,
}

impl SessionLog {
    /// Create an empty log. The running hash starts at the well-known seed.
    pub fn new(document_id: impl Into<String>, session_id: impl Into<String>, signer_id: SignerId) -> Self {
        Self {
            document_id: document_id.into(),
            session_id: session_id.into(),
            signer_id,
            transactions: Vec::new(),
            running_hash: chain_seed(),
            last_signature: None,
        }
    }

    pub fn document_id(&self) -> &str {
        &self.document_id
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn signer_id(&self) -> &SignerId {
        &self.signer_id
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// The digest covering every transaction admitted so far.
    pub fn running_hash(&self) -> &Digest {
        &self.running_hash
    }

    /// The signature over the current running hash, if any transaction has
    /// been admitted.
    pub fn last_signature(&self) -> Option<&TxSignature> {
        self.last_signature.as_ref()
    }

    /// Verify and append a batch of already-signed transactions.
    ///
    /// `signature` must cover the chain state after the whole batch, made by
    /// this log's signer. `skip_verify` admits the batch without checking the
    /// signature, for bulk import from a source that already verified it.
    ///
    /// All-or-nothing: on any error the log is unchanged.
    pub fn try_add(
        &mut self,
        new_transactions: &[String],
        signature: &TxSignature,
        skip_verify: bool,
    ) -> Result<Digest, CoreError> {
        let parsed = new_transactions
            .iter()
            .map(|json| Transaction::from_json(json))
            .collect::<Result<Vec<_>, _>>()?;

        let new_hash = chain_extend(self.running_hash, &parsed);
        if !skip_verify {
            self.signer_id.verify(&signed_message(&new_hash), signature)?;
        }

        self.transactions.extend(parsed);
        self.running_hash = new_hash;
        self.last_signature = Some(signature.clone());
        Ok(new_hash)
    }

    /// The chain state this log would reach after admitting the batch,
    /// without mutating anything. An empty batch yields the current hash.
    pub fn expected_hash_after(&self, new_transactions: &[String]) -> Result<Digest, CoreError> {
        let parsed = new_transactions
            .iter()
            .map(|json| Transaction::from_json(json))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(chain_extend(self.running_hash, &parsed))
    }

    /// Author, sign, and append a new transaction.
    ///
    /// The changes payload is normalized to canonical JSON before anything
    /// else, so logically equal inputs produce identical transactions. In
    /// private mode the canonical changes (and meta, if present) are
    /// encrypted under the supplied key with a nonce bound to this log and
    /// the transaction's index.
    pub fn add_new(
        &mut self,
        changes_json: &str,
        meta_json: Option<&str>,
        made_at: u64,
        mode: TransactionMode<'_>,
        secret: &SignerSecret,
    ) -> Result<SignedTransaction, CoreError> {
        if secret.signer_id() != self.signer_id {
            return Err(CoreError::SignerMismatch(self.signer_id.to_string()));
        }

        let changes = canonicalize_json(changes_json)?;
        let meta = meta_json.map(canonicalize_json).transpose()?;

        let transaction = match mode {
            TransactionMode::Trusting => Transaction::Trusting(TrustingTransaction {
                changes,
                made_at,
                meta,
                privacy: TrustingTag::Trusting,
            }),
            TransactionMode::Private { key_id, key_secret } => {
                let ctx = self.nonce_context(self.transactions.len() as u32);
                let encrypted_changes =
                    crypto::encrypt_changes(key_secret, &ctx, changes.as_bytes())?;
                let meta = meta
                    .map(|m| crypto::encrypt_meta(key_secret, &ctx, m.as_bytes()))
                    .transpose()?;
                Transaction::Private(PrivateTransaction {
                    encrypted_changes,
                    key_used: key_id,
                    made_at,
                    meta,
                    privacy: PrivateTag::Private,
                })
            }
        };
        transaction.check_size()?;

        let new_hash = chain_next(&self.running_hash, &transaction.canonical_bytes());
        let signature = secret.sign(&signed_message(&new_hash));

        self.transactions.push(transaction.clone());
        self.running_hash = new_hash;
        self.last_signature = Some(signature.clone());

        Ok(SignedTransaction {
            transaction,
            signature,
            new_hash,
        })
    }

    /// Decrypt the changes of the private transaction at `tx_index`.
    pub fn decrypt_changes(&self, tx_index: u32, key: &KeySecret) -> Result<String, CoreError> {
        let tx = self.private_at(tx_index)?;
        let ctx = self.nonce_context(tx_index);
        let plaintext = crypto::decrypt_changes(key, &ctx, &tx.encrypted_changes)?;
        String::from_utf8(plaintext).map_err(|_| CoreError::DecryptionFailed)
    }

    /// Decrypt the meta annotation of the private transaction at `tx_index`.
    ///
    /// `Ok(None)` if the transaction carries no meta.
    pub fn decrypt_meta(
        &self,
        tx_index: u32,
        key: &KeySecret,
    ) -> Result<Option<String>, CoreError> {
        let tx = self.private_at(tx_index)?;
        let Some(meta) = &tx.meta else {
            return Ok(None);
        };
        let ctx = self.nonce_context(tx_index);
        let plaintext = crypto::decrypt_meta(key, &ctx, meta)?;
        String::from_utf8(plaintext)
            .map(Some)
            .map_err(|_| CoreError::DecryptionFailed)
    }

    fn private_at(&self, tx_index: u32) -> Result<&PrivateTransaction, CoreError> {
        let tx = self
            .transactions
            .get(tx_index as usize)
            .ok_or(CoreError::IndexOutOfRange {
                index: tx_index,
                len: self.transactions.len(),
            })?;
        match tx {
            Transaction::Private(tx) => Ok(tx),
            Transaction::Trusting(_) => Err(CoreError::NotPrivate(tx_index)),
        }
    }

    fn nonce_context(&self, tx_index: u32) -> NonceContext<'_> {
        NonceContext {
            document_id: &self.document_id,
            session_id: &self.session_id,
            tx_index,
        }
    }
}
