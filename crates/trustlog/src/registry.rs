//! The log registry: handle-based access to session logs.
//!
//! Callers hold opaque [`LogHandle`]s instead of the logs themselves.
//! Handles come from a monotonically increasing counter and are never
//! reused, so a handle kept past [`LogRegistry::destroy`] can only ever
//! fail with [`RegistryError::HandleInvalid`], never resolve to a newer
//! log.
//!
//! Per-handle operations resolve the log under the map's read lock, then
//! work under that log's own mutex: calls on the same handle serialize,
//! calls on different handles run concurrently.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use tracing::{debug, warn};
use trustlog_core::{
    Digest, KeyId, KeySecret, SessionLog, SignedTransaction, SignerId, SignerSecret,
    TransactionMode, TxSignature,
};

use crate::error::{RegistryError, Result};

/// An opaque handle to a registered session log.
///
/// Handle 0 is reserved and never issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LogHandle(pub(crate) u64);

impl LogHandle {
    /// The reserved invalid handle.
    pub const INVALID: LogHandle = LogHandle(0);

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// Result of a verified batch append.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppendOutcome {
    /// The running hash after the batch.
    pub new_hash: Digest,
    /// How many transactions the batch admitted.
    pub appended: usize,
}

/// A registry of session logs, addressed by handle.
///
/// No global instance exists; callers construct a registry and thread it
/// through explicitly.
pub struct LogRegistry {
    next_id: AtomicU64,
    logs: RwLock<HashMap<u64, Arc<Mutex<SessionLog>>>>,
}

impl LogRegistry {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            logs: RwLock::new(HashMap::new()),
        }
    }

    /// Create an empty log for `(document_id, session_id, signer_id)` and
    /// return its handle.
    pub fn create(
        &self,
        document_id: impl Into<String>,
        session_id: impl Into<String>,
        signer_id: SignerId,
    ) -> Result<LogHandle> {
        let log = SessionLog::new(document_id, session_id, signer_id);
        let handle = self.register(log)?;
        debug!(handle = handle.0, "created session log");
        Ok(handle)
    }

    /// Deep-copy the log behind `handle` into a fresh, independent handle.
    pub fn clone_log(&self, handle: LogHandle) -> Result<LogHandle> {
        let copy = self.resolve(handle)?.lock().map_err(|_| RegistryError::LockPoisoned)?.clone();
        let new_handle = self.register(copy)?;
        debug!(
            source = handle.0,
            handle = new_handle.0,
            "cloned session log"
        );
        Ok(new_handle)
    }

    /// Destroy the log behind `handle`. The handle is permanently invalid
    /// afterwards.
    pub fn destroy(&self, handle: LogHandle) -> Result<()> {
        let mut logs = self.logs.write().map_err(|_| RegistryError::LockPoisoned)?;
        logs.remove(&handle.0)
            .ok_or(RegistryError::HandleInvalid(handle))?;
        debug!(handle = handle.0, "destroyed session log");
        Ok(())
    }

    /// Verify and append a batch of already-signed transactions.
    pub fn try_add_transactions(
        &self,
        handle: LogHandle,
        new_transactions: &[String],
        signature: &TxSignature,
        skip_verify: bool,
    ) -> Result<AppendOutcome> {
        self.with_log(handle, |log| {
            match log.try_add(new_transactions, signature, skip_verify) {
                Ok(new_hash) => Ok(AppendOutcome {
                    new_hash,
                    appended: new_transactions.len(),
                }),
                Err(e) => {
                    warn!(handle = handle.0, error = %e, "rejected transaction batch");
                    Err(e.into())
                }
            }
        })
    }

    /// Author, sign, and append a plaintext transaction.
    pub fn add_new_trusting_transaction(
        &self,
        handle: LogHandle,
        changes_json: &str,
        meta_json: Option<&str>,
        made_at: u64,
        secret: &SignerSecret,
    ) -> Result<SignedTransaction> {
        self.with_log(handle, |log| {
            Ok(log.add_new(
                changes_json,
                meta_json,
                made_at,
                TransactionMode::Trusting,
                secret,
            )?)
        })
    }

    /// Author, sign, and append a transaction encrypted under `key_secret`.
    pub fn add_new_private_transaction(
        &self,
        handle: LogHandle,
        changes_json: &str,
        meta_json: Option<&str>,
        made_at: u64,
        key_id: KeyId,
        key_secret: &KeySecret,
        secret: &SignerSecret,
    ) -> Result<SignedTransaction> {
        self.with_log(handle, |log| {
            Ok(log.add_new(
                changes_json,
                meta_json,
                made_at,
                TransactionMode::Private { key_id, key_secret },
                secret,
            )?)
        })
    }

    /// The hash the log would reach after the batch, without mutating it.
    pub fn expected_hash_after(
        &self,
        handle: LogHandle,
        new_transactions: &[String],
    ) -> Result<Digest> {
        self.with_log(handle, |log| {
            Ok(log.expected_hash_after(new_transactions)?)
        })
    }

    /// Decrypt the changes of the private transaction at `tx_index`.
    pub fn decrypt_transaction_changes(
        &self,
        handle: LogHandle,
        tx_index: u32,
        key: &KeySecret,
    ) -> Result<String> {
        self.with_log(handle, |log| Ok(log.decrypt_changes(tx_index, key)?))
    }

    /// Decrypt the meta annotation of the private transaction at `tx_index`.
    pub fn decrypt_transaction_meta(
        &self,
        handle: LogHandle,
        tx_index: u32,
        key: &KeySecret,
    ) -> Result<Option<String>> {
        self.with_log(handle, |log| Ok(log.decrypt_meta(tx_index, key)?))
    }

    /// The log's current running hash.
    pub fn running_hash(&self, handle: LogHandle) -> Result<Digest> {
        self.with_log(handle, |log| Ok(*log.running_hash()))
    }

    /// The signature over the current running hash, if any.
    pub fn last_signature(&self, handle: LogHandle) -> Result<Option<TxSignature>> {
        self.with_log(handle, |log| Ok(log.last_signature().cloned()))
    }

    /// Number of transactions in the log.
    pub fn len(&self, handle: LogHandle) -> Result<usize> {
        self.with_log(handle, |log| Ok(log.len()))
    }

    fn register(&self, log: SessionLog) -> Result<LogHandle> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut logs = self.logs.write().map_err(|_| RegistryError::LockPoisoned)?;
        logs.insert(id, Arc::new(Mutex::new(log)));
        Ok(LogHandle(id))
    }

    fn resolve(&self, handle: LogHandle) -> Result<Arc<Mutex<SessionLog>>> {
        let logs = self.logs.read().map_err(|_| RegistryError::LockPoisoned)?;
        logs.get(&handle.0)
            .cloned()
            .ok_or(RegistryError::HandleInvalid(handle))
    }

    fn with_log<T>(
        &self,
        handle: LogHandle,
        f: impl FnOnce(&mut SessionLog) -> Result<T>,
    ) -> Result<T> {
        let log = self.resolve(handle)?;
        let mut guard = log.lock().map_err(|_| RegistryError::LockPoisoned)?;
        f(&mut guard)
    }
}

impl Default for LogRegistry {
    fn default() -> Self {
        Self::new()
    }
}
