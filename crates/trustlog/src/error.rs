//! Error types for the registry facade.

use thiserror::Error;
use trustlog_core::CoreError;

use crate::registry::LogHandle;

/// Errors that can occur during registry operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The handle was never issued or its log has been destroyed.
    #[error("invalid or destroyed log handle: {0:?}")]
    HandleInvalid(LogHandle),

    /// A lock was poisoned by a panicking holder.
    #[error("registry lock poisoned")]
    LockPoisoned,

    /// Core engine error.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Result type for registry operations.
pub type Result<T> = std::result::Result<T, RegistryError>;
