//! Proptest generators for property-based testing.

use proptest::prelude::*;
use serde_json::Value as JsonValue;
use trustlog_core::{KeySecret, SignerSecret};
use trustlog_seal::SealerSecret;

/// Generate a random signer secret.
pub fn signer_secret() -> impl Strategy<Value = SignerSecret> {
    any::<[u8; 32]>().prop_map(SignerSecret::from_seed)
}

/// Generate a random symmetric key secret.
pub fn key_secret() -> impl Strategy<Value = KeySecret> {
    any::<[u8; 32]>().prop_map(KeySecret::from_bytes)
}

/// Generate a random sealer secret.
pub fn sealer_secret() -> impl Strategy<Value = SealerSecret> {
    any::<[u8; 32]>().prop_map(SealerSecret::from_seed)
}

/// Generate an arbitrary JSON value, nested up to three levels.
pub fn json_value() -> impl Strategy<Value = JsonValue> {
    let leaf = prop_oneof![
        Just(JsonValue::Null),
        any::<bool>().prop_map(JsonValue::from),
        any::<i64>().prop_map(JsonValue::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(JsonValue::from),
    ];
    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(JsonValue::Array),
            prop::collection::hash_map("[a-z]{1,8}", inner, 0..8)
                .prop_map(|m| JsonValue::Object(m.into_iter().collect())),
        ]
    })
}

/// Generate a JSON changes payload as a string.
pub fn changes_json() -> impl Strategy<Value = String> {
    json_value().prop_map(|v| v.to_string())
}

/// Generate a document or session identifier.
pub fn log_id() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,23}".prop_map(String::from)
}

/// Generate a logical timestamp.
pub fn made_at() -> impl Strategy<Value = u64> {
    0u64..=1_800_000_000_000u64
}
