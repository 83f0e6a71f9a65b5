//! The sealed-message codec: authenticated encryption between two sealers.
//!
//! The message key is derived from the X25519 shared secret together with
//! both public keys in sender-then-recipient order, so the direction of the
//! message is part of the key. Unsealing with the parties swapped, a wrong
//! key, or different nonce material fails authentication; it never yields
//! wrong plaintext.

use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use x25519_dalek::PublicKey;

use crate::error::SealError;
use crate::sealer::{SealerId, SealerSecret};

const SEAL_KEY_DOMAIN: &str = "trustlog-v0-seal-key";
const SEAL_NONCE_DOMAIN: &str = "trustlog-v0-seal-nonce";

fn message_key(
    secret: &SealerSecret,
    peer: &PublicKey,
    sender_pub: &PublicKey,
    recipient_pub: &PublicKey,
) -> [u8; 32] {
    let shared = secret.static_secret().diffie_hellman(peer);
    let mut hasher = blake3::Hasher::new_derive_key(SEAL_KEY_DOMAIN);
    hasher.update(shared.as_bytes());
    hasher.update(sender_pub.as_bytes());
    hasher.update(recipient_pub.as_bytes());
    *hasher.finalize().as_bytes()
}

fn derive_nonce(nonce_material: &[u8]) -> [u8; 24] {
    let full = blake3::derive_key(SEAL_NONCE_DOMAIN, nonce_material);
    let mut nonce = [0u8; 24];
    nonce.copy_from_slice(&full[..24]);
    nonce
}

/// Seal a message from `sender` to `recipient`.
///
/// `nonce_material` must be unique per (sender, recipient) pair; the
/// unsealing side must present the same bytes.
pub fn seal(
    message: &[u8],
    sender: &SealerSecret,
    recipient: &SealerId,
    nonce_material: &[u8],
) -> Result<Vec<u8>, SealError> {
    let sender_pub = PublicKey::from(&sender.static_secret());
    let recipient_pub = recipient.public_key()?;
    let key = message_key(sender, &recipient_pub, &sender_pub, &recipient_pub);

    let nonce = derive_nonce(nonce_material);
    XChaCha20Poly1305::new_from_slice(&key)
        .expect("32-byte key")
        .encrypt(XNonce::from_slice(&nonce), message)
        .map_err(|_| SealError::SealFailed)
}

/// Unseal a message addressed to `recipient`, authenticating `sender`.
pub fn unseal(
    sealed: &[u8],
    recipient: &SealerSecret,
    sender: &SealerId,
    nonce_material: &[u8],
) -> Result<Vec<u8>, SealError> {
    let recipient_pub = PublicKey::from(&recipient.static_secret());
    let sender_pub = sender.public_key()?;
    let key = message_key(recipient, &sender_pub, &sender_pub, &recipient_pub);

    let nonce = derive_nonce(nonce_material);
    XChaCha20Poly1305::new_from_slice(&key)
        .expect("32-byte key")
        .decrypt(XNonce::from_slice(&nonce), sealed)
        .map_err(|_| SealError::AuthenticationFailed)
}
