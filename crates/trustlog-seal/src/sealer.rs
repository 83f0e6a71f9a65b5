//! Sealer identities: X25519 key pairs for authenticated sealed messages.
//!
//! Unlike signer keys, sealer keys are only for key agreement, not signing.
//! Both halves cross the API boundary as prefixed base58 strings
//! (`sealerSecret_z…`, `sealer_z…`).

use std::fmt;

use x25519_dalek::{PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::SealError;

fn encode_z(prefix: &str, bytes: &[u8]) -> String {
    format!("{prefix}{}", bs58::encode(bytes).into_string())
}

fn decode_z(
    value: &str,
    prefix: &'static str,
    field: &'static str,
) -> Result<[u8; 32], SealError> {
    let body = value
        .strip_prefix(prefix)
        .ok_or(SealError::InvalidPrefix { field, prefix })?;
    let bytes = bs58::decode(body)
        .into_vec()
        .map_err(|_| SealError::Base58(field))?;
    let len = bytes.len();
    bytes.try_into().map_err(|_| SealError::InvalidLength {
        field,
        expected: 32,
        actual: len,
    })
}

/// A sealer's public identity (`sealer_z…`, 32-byte X25519 public key).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SealerId(String);

impl SealerId {
    pub const PREFIX: &'static str = "sealer_z";

    /// Parse and validate the string form.
    pub fn parse(s: &str) -> Result<Self, SealError> {
        decode_z(s, Self::PREFIX, "sealer id")?;
        Ok(Self(s.to_string()))
    }

    pub(crate) fn public_key(&self) -> Result<PublicKey, SealError> {
        Ok(PublicKey::from(decode_z(
            &self.0,
            Self::PREFIX,
            "sealer id",
        )?))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SealerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for SealerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealerId({})", &self.0[..Self::PREFIX.len() + 8])
    }
}

/// A sealer's secret (`sealerSecret_z…`, 32-byte X25519 secret).
///
/// Zeroized on drop.
pub struct SealerSecret {
    seed: [u8; 32],
}

impl SealerSecret {
    pub const PREFIX: &'static str = "sealerSecret_z";

    /// Parse the string form.
    pub fn parse(s: &str) -> Result<Self, SealError> {
        Ok(Self {
            seed: decode_z(s, Self::PREFIX, "sealer secret")?,
        })
    }

    /// Create from a 32-byte seed.
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self { seed }
    }

    /// Generate a new random secret.
    pub fn generate() -> Self {
        use rand::RngCore;
        let mut seed = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut seed);
        Self { seed }
    }

    /// Derive the public sealer id.
    pub fn sealer_id(&self) -> SealerId {
        let public = PublicKey::from(&StaticSecret::from(self.seed));
        SealerId(encode_z(SealerId::PREFIX, public.as_bytes()))
    }

    /// Render the string form.
    pub fn to_secret_string(&self) -> String {
        encode_z(Self::PREFIX, &self.seed)
    }

    pub(crate) fn static_secret(&self) -> StaticSecret {
        StaticSecret::from(self.seed)
    }
}

impl Drop for SealerSecret {
    fn drop(&mut self) {
        self.seed.zeroize();
    }
}

impl fmt::Debug for SealerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SealerSecret(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sealer_id_deterministic_from_seed() {
        let s1 = SealerSecret::from_seed([0x42; 32]);
        let s2 = SealerSecret::from_seed([0x42; 32]);
        assert_eq!(s1.sealer_id(), s2.sealer_id());
    }

    #[test]
    fn test_secret_string_roundtrip() {
        let secret = SealerSecret::generate();
        let s = secret.to_secret_string();
        assert!(s.starts_with("sealerSecret_z"));
        let recovered = SealerSecret::parse(&s).unwrap();
        assert_eq!(secret.sealer_id(), recovered.sealer_id());
    }

    #[test]
    fn test_sealer_id_roundtrip() {
        let id = SealerSecret::from_seed([0x07; 32]).sealer_id();
        assert!(id.as_str().starts_with("sealer_z"));
        assert_eq!(SealerId::parse(id.as_str()).unwrap(), id);
    }

    #[test]
    fn test_bad_inputs_rejected() {
        assert!(matches!(
            SealerId::parse("signer_zabc"),
            Err(SealError::InvalidPrefix { .. })
        ));
        assert!(matches!(
            SealerId::parse("sealer_z!!!"),
            Err(SealError::Base58(_))
        ));
        assert!(matches!(
            SealerSecret::parse("sealerSecret_zab"),
            Err(SealError::InvalidLength { .. })
        ));
    }
}
