//! # Trustlog Seal
//!
//! Sealed messages between X25519 sealer identities: authenticated
//! encryption with the sender-to-recipient direction bound into the key.
//!
//! Pure computation, no I/O. See [`seal`] and [`unseal`].

pub mod codec;
pub mod error;
pub mod sealer;

pub use codec::{seal, unseal};
pub use error::SealError;
pub use sealer::{SealerId, SealerSecret};
