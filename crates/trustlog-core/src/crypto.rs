//! Cryptographic primitives for trustlog.
//!
//! Wraps Ed25519 signing, Blake3 hashing, and XChaCha20-Poly1305
//! authenticated encryption with strong types. All key material crosses the
//! API boundary as prefixed base58 strings (`signerSecret_z…`, `signer_z…`,
//! `keySecret_z…`), which these types parse and validate.

use base64::Engine;
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{XChaCha20Poly1305, XNonce};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroize;

use crate::error::CoreError;

/// Base64 engine for `encrypted_U…` payloads (URL-safe, no padding).
const B64: base64::engine::general_purpose::GeneralPurpose =
    base64::engine::general_purpose::URL_SAFE_NO_PAD;

fn encode_z(prefix: &str, bytes: &[u8]) -> String {
    format!("{prefix}{}", bs58::encode(bytes).into_string())
}

fn decode_z(
    value: &str,
    prefix: &'static str,
    field: &'static str,
    expected: usize,
) -> Result<Vec<u8>, CoreError> {
    let body = value
        .strip_prefix(prefix)
        .ok_or(CoreError::InvalidPrefix { field, prefix })?;
    let bytes = bs58::decode(body)
        .into_vec()
        .map_err(|_| CoreError::Base58(field))?;
    if bytes.len() != expected {
        return Err(CoreError::InvalidLength {
            field,
            expected,
            actual: bytes.len(),
        });
    }
    Ok(bytes)
}

/// A 32-byte Blake3 digest.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest(pub [u8; 32]);

impl Digest {
    /// Prefix of the string form.
    pub const PREFIX: &'static str = "hash_z";

    /// Compute the Blake3 digest of the given data.
    pub fn hash(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Create from raw bytes.
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Get the raw bytes.
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Parse from the `hash_z…` string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = decode_z(s, Self::PREFIX, "digest", 32)?;
        let mut arr = [0u8; 32];
        arr.copy_from_slice(&bytes);
        Ok(Self(arr))
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", encode_z(Self::PREFIX, &self.0))
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({})", &hex::encode(self.0)[..16])
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// A signer's public identity (`signer_z…`, 32-byte Ed25519 verifying key).
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SignerId(String);

impl SignerId {
    pub const PREFIX: &'static str = "signer_z";

    /// Parse and validate the string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = decode_z(s, Self::PREFIX, "signer id", 32)?;
        let arr: [u8; 32] = bytes.try_into().expect("length checked");
        VerifyingKey::from_bytes(&arr).map_err(|_| CoreError::InvalidVerifyingKey)?;
        Ok(Self(s.to_string()))
    }

    /// Verify a signature over a message.
    pub fn verify(&self, message: &[u8], signature: &TxSignature) -> Result<(), CoreError> {
        let bytes = decode_z(&self.0, Self::PREFIX, "signer id", 32)?;
        let arr: [u8; 32] = bytes.try_into().expect("length checked");
        let key = VerifyingKey::from_bytes(&arr).map_err(|_| CoreError::InvalidVerifyingKey)?;
        let sig = ed25519_dalek::Signature::from_bytes(&signature.to_bytes()?);
        key.verify(message, &sig)
            .map_err(|_| CoreError::SignatureFailed)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SignerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerId({})", &self.0[..Self::PREFIX.len() + 8])
    }
}

/// A signer's secret (`signerSecret_z…`, 32-byte Ed25519 seed).
///
/// Caller-supplied per call; the seed bytes are zeroized on drop.
pub struct SignerSecret {
    seed: [u8; 32],
}

impl SignerSecret {
    pub const PREFIX: &'static str = "signerSecret_z";

    /// Parse the string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = decode_z(s, Self::PREFIX, "signer secret", 32)?;
        let seed: [u8; 32] = bytes.try_into().expect("length checked");
        Ok(Self { seed })
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed }
    }

    /// Generate a new random secret.
    pub fn generate() -> Self {
        let mut rng = rand::thread_rng();
        let key = SigningKey::generate(&mut rng);
        Self {
            seed: key.to_bytes(),
        }
    }

    /// Derive the public signer id.
    pub fn signer_id(&self) -> SignerId {
        let key = SigningKey::from_bytes(&self.seed);
        SignerId(encode_z(
            SignerId::PREFIX,
            key.verifying_key().as_bytes(),
        ))
    }

    /// Sign a message.
    pub fn sign(&self, message: &[u8]) -> TxSignature {
        let key = SigningKey::from_bytes(&self.seed);
        TxSignature(encode_z(
            TxSignature::PREFIX,
            &key.sign(message).to_bytes(),
        ))
    }

    /// Render the string form.
    pub fn to_secret_string(&self) -> String {
        encode_z(Self::PREFIX, &self.seed)
    }
}

impl Drop for SignerSecret {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl fmt::Debug for SignerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignerSecret(..)")
    }
}

/// A signature over a chain state (`signature_z…`, 64 bytes).
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxSignature(String);

impl TxSignature {
    pub const PREFIX: &'static str = "signature_z";

    /// Parse and validate the string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        decode_z(s, Self::PREFIX, "signature", 64)?;
        Ok(Self(s.to_string()))
    }

    fn to_bytes(&self) -> Result<[u8; 64], CoreError> {
        let bytes = decode_z(&self.0, Self::PREFIX, "signature", 64)?;
        Ok(bytes.try_into().expect("length checked"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for TxSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxSignature({}...)", &self.0[..Self::PREFIX.len() + 8])
    }
}

/// Identifier naming which symmetric key encrypted a private transaction.
///
/// Opaque to the core; carried through the canonical encoding unmodified.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyId(pub String);

/// A symmetric encryption key (`keySecret_z…`, 32 bytes).
///
/// Caller-supplied per call; zeroized on drop.
pub struct KeySecret {
    key: [u8; 32],
}

impl KeySecret {
    pub const PREFIX: &'static str = "keySecret_z";

    /// Parse the string form.
    pub fn parse(s: &str) -> Result<Self, CoreError> {
        let bytes = decode_z(s, Self::PREFIX, "key secret", 32)?;
        let key: [u8; 32] = bytes.try_into().expect("length checked");
        Ok(Self { key })
    }

    /// Create from raw bytes.
    pub fn from_bytes(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Generate a new random key.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self { key }
    }

    /// Render the string form.
    pub fn to_secret_string(&self) -> String {
        encode_z(Self::PREFIX, &self.key)
    }

    fn cipher(&self) -> XChaCha20Poly1305 {
        XChaCha20Poly1305::new_from_slice(&self.key).expect("32-byte key")
    }
}

impl Drop for KeySecret {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

impl fmt::Debug for KeySecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "KeySecret(..)")
    }
}

/// An encrypted payload in the `encrypted_U…` string form.
#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Encrypted(pub String);

impl Encrypted {
    pub const PREFIX: &'static str = "encrypted_U";

    fn ciphertext(&self) -> Result<Vec<u8>, CoreError> {
        let body = self
            .0
            .strip_prefix(Self::PREFIX)
            .ok_or(CoreError::InvalidPrefix {
                field: "encrypted payload",
                prefix: Self::PREFIX,
            })?;
        B64.decode(body)
            .map_err(|_| CoreError::Base64("encrypted payload"))
    }

    /// Length of the encoded ciphertext, for size accounting.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Encrypted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The context a per-transaction nonce is derived from.
///
/// The triple is unique within a log, so the keystream never repeats for a
/// given key, and decryption can re-derive the nonce without storing it.
#[derive(Debug, Clone, Copy)]
pub struct NonceContext<'a> {
    pub document_id: &'a str,
    pub session_id: &'a str,
    pub tx_index: u32,
}

const NONCE_DOMAIN: &str = "trustlog-v0-tx-nonce";
const META_NONCE_DOMAIN: &str = "trustlog-v0-meta-nonce";

fn derive_nonce_in(domain: &str, ctx: &NonceContext<'_>) -> [u8; 24] {
    let mut material = Vec::new();
    material.extend_from_slice(ctx.document_id.as_bytes());
    material.push(0);
    material.extend_from_slice(ctx.session_id.as_bytes());
    material.push(0);
    material.extend_from_slice(&ctx.tx_index.to_be_bytes());
    let full = blake3::derive_key(domain, &material);
    let mut nonce = [0u8; 24];
    nonce.copy_from_slice(&full[..24]);
    nonce
}

fn encrypt_in(
    domain: &str,
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    plaintext: &[u8],
) -> Result<Encrypted, CoreError> {
    let nonce = derive_nonce_in(domain, ctx);
    let ciphertext = key
        .cipher()
        .encrypt(XNonce::from_slice(&nonce), plaintext)
        .map_err(|_| CoreError::EncryptionFailed)?;
    Ok(Encrypted(format!(
        "{}{}",
        Encrypted::PREFIX,
        B64.encode(ciphertext)
    )))
}

fn decrypt_in(
    domain: &str,
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    encrypted: &Encrypted,
) -> Result<Vec<u8>, CoreError> {
    let nonce = derive_nonce_in(domain, ctx);
    let ciphertext = encrypted.ciphertext()?;
    key.cipher()
        .decrypt(XNonce::from_slice(&nonce), ciphertext.as_slice())
        .map_err(|_| CoreError::DecryptionFailed)
}

/// Encrypt a changes payload for a private transaction.
pub fn encrypt_changes(
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    plaintext: &[u8],
) -> Result<Encrypted, CoreError> {
    encrypt_in(NONCE_DOMAIN, key, ctx, plaintext)
}

/// Decrypt a private transaction's changes payload.
///
/// Fails with [`CoreError::DecryptionFailed`] on a wrong key or tampered
/// ciphertext (the AEAD tag does not verify).
pub fn decrypt_changes(
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    encrypted: &Encrypted,
) -> Result<Vec<u8>, CoreError> {
    decrypt_in(NONCE_DOMAIN, key, ctx, encrypted)
}

/// Encrypt a private transaction's meta annotation.
///
/// Uses a separate nonce domain so meta and changes of the same
/// transaction never share a keystream.
pub fn encrypt_meta(
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    plaintext: &[u8],
) -> Result<Encrypted, CoreError> {
    encrypt_in(META_NONCE_DOMAIN, key, ctx, plaintext)
}

/// Decrypt a private transaction's meta annotation.
pub fn decrypt_meta(
    key: &KeySecret,
    ctx: &NonceContext<'_>,
    encrypted: &Encrypted,
) -> Result<Vec<u8>, CoreError> {
    decrypt_in(META_NONCE_DOMAIN, key, ctx, encrypted)
}
