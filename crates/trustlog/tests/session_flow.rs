//! End-to-end tests over the public registry API.

use proptest::prelude::*;
use trustlog::{core::chain_seed, LogRegistry, RegistryError, SealerSecret};
use trustlog_testkit::generators;
use trustlog_testkit::TestFixture;

#[test]
fn untouched_log_sits_at_the_seed() {
    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);

    let handle = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();

    assert_eq!(registry.len(handle).unwrap(), 0);
    assert_eq!(registry.running_hash(handle).unwrap(), chain_seed());
    assert_eq!(registry.last_signature(handle).unwrap(), None);
    // A dry run over an empty batch reports the current state.
    assert_eq!(
        registry.expected_hash_after(handle, &[]).unwrap(),
        chain_seed()
    );
}

#[test]
fn author_then_replicate() {
    tracing_subscriber::fmt().with_test_writer().try_init().ok();

    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);

    // Author two transactions on one log.
    let source = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();
    registry
        .add_new_trusting_transaction(source, r#"{"op":"set","k":1}"#, None, 100, &fixture.signer_secret)
        .unwrap();
    let out = registry
        .add_new_trusting_transaction(source, r#"{"op":"set","k":2}"#, None, 101, &fixture.signer_secret)
        .unwrap();
    assert_eq!(registry.running_hash(source).unwrap(), out.new_hash);

    // Replicate them onto a fresh log through the verified batch path.
    let (batch, signature) = fixture.signed_batch(
        "doc1",
        "s1",
        &[r#"{"op":"set","k":1}"#, r#"{"op":"set","k":2}"#],
    );
    let replica = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();

    let predicted = registry.expected_hash_after(replica, &batch).unwrap();
    let outcome = registry
        .try_add_transactions(replica, &batch, &signature, false)
        .unwrap();

    assert_eq!(outcome.appended, 2);
    assert_eq!(outcome.new_hash, predicted);
    assert_eq!(registry.len(replica).unwrap(), 2);
}

#[test]
fn forged_signature_leaves_replica_unchanged() {
    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);
    let attacker = TestFixture::with_seed(2);

    let (batch, _) = fixture.signed_batch("doc1", "s1", &[r#"{"a":1}"#]);
    let (_, forged) = attacker.signed_batch("doc1", "s1", &[r#"{"a":1}"#]);

    let replica = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();
    let before = registry.running_hash(replica).unwrap();

    let err = registry
        .try_add_transactions(replica, &batch, &forged, false)
        .unwrap_err();
    assert!(matches!(err, RegistryError::Core(_)));
    assert_eq!(registry.len(replica).unwrap(), 0);
    assert_eq!(registry.running_hash(replica).unwrap(), before);

    // skip_verify admits the same batch for trusted bulk import.
    registry
        .try_add_transactions(replica, &batch, &forged, true)
        .unwrap();
    assert_eq!(registry.len(replica).unwrap(), 1);
}

#[test]
fn private_transactions_decrypt_for_key_holders_only() {
    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);
    let outsider = TestFixture::with_seed(2);

    let handle = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();
    registry
        .add_new_private_transaction(
            handle,
            r#"{"balance":1000}"#,
            Some(r#"{"origin":"import"}"#),
            7,
            fixture.key_id.clone(),
            &fixture.key_secret,
            &fixture.signer_secret,
        )
        .unwrap();

    assert_eq!(
        registry
            .decrypt_transaction_changes(handle, 0, &fixture.key_secret)
            .unwrap(),
        r#"{"balance":1000}"#
    );
    assert_eq!(
        registry
            .decrypt_transaction_meta(handle, 0, &fixture.key_secret)
            .unwrap(),
        Some(r#"{"origin":"import"}"#.to_string())
    );
    assert!(registry
        .decrypt_transaction_changes(handle, 0, &outsider.key_secret)
        .is_err());
    assert!(registry
        .decrypt_transaction_changes(handle, 3, &fixture.key_secret)
        .is_err());
}

#[test]
fn trusting_entries_are_not_decryptable() {
    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);

    let handle = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();
    registry
        .add_new_trusting_transaction(handle, "{}", None, 1, &fixture.signer_secret)
        .unwrap();

    let err = registry
        .decrypt_transaction_changes(handle, 0, &fixture.key_secret)
        .unwrap_err();
    assert!(matches!(
        err,
        RegistryError::Core(trustlog::core::CoreError::NotPrivate(0))
    ));
}

#[test]
fn cloned_logs_diverge_independently() {
    let registry = LogRegistry::new();
    let fixture = TestFixture::with_seed(1);

    let original = registry
        .create("doc1", "s1", fixture.signer_id())
        .unwrap();
    registry
        .add_new_trusting_transaction(original, r#"{"a":1}"#, None, 1, &fixture.signer_secret)
        .unwrap();

    let copy = registry.clone_log(original).unwrap();
    assert_eq!(
        registry.running_hash(copy).unwrap(),
        registry.running_hash(original).unwrap()
    );

    registry
        .add_new_trusting_transaction(copy, r#"{"b":2}"#, None, 2, &fixture.signer_secret)
        .unwrap();
    assert_eq!(registry.len(original).unwrap(), 1);
    assert_eq!(registry.len(copy).unwrap(), 2);

    registry.destroy(original).unwrap();
    assert!(matches!(
        registry.len(original),
        Err(RegistryError::HandleInvalid(_))
    ));
    // The clone outlives the original.
    assert_eq!(registry.len(copy).unwrap(), 2);
}

#[test]
fn sealed_message_between_log_owners() {
    let alice = SealerSecret::from_seed([1; 32]);
    let bob = SealerSecret::from_seed([2; 32]);

    let sealed = trustlog::seal::seal(b"key handover", &alice, &bob.sealer_id(), b"doc1/s1/0")
        .unwrap();
    let opened =
        trustlog::seal::unseal(&sealed, &bob, &alice.sealer_id(), b"doc1/s1/0").unwrap();
    assert_eq!(opened, b"key handover");

    // The direction is part of the key.
    assert!(trustlog::seal::unseal(&sealed, &alice, &bob.sealer_id(), b"doc1/s1/0").is_err());
}

proptest! {
    #[test]
    fn prop_replicated_batches_converge(
        changes in proptest::collection::vec(generators::changes_json(), 1..8),
    ) {
        let registry = LogRegistry::new();
        let fixture = TestFixture::with_seed(1);
        let refs: Vec<&str> = changes.iter().map(String::as_str).collect();
        let (batch, signature) = fixture.signed_batch("doc1", "s1", &refs);

        let a = registry.create("doc1", "s1", fixture.signer_id()).unwrap();
        let b = registry.create("doc1", "s1", fixture.signer_id()).unwrap();

        let ha = registry.try_add_transactions(a, &batch, &signature, false).unwrap();
        let hb = registry.try_add_transactions(b, &batch, &signature, false).unwrap();
        prop_assert_eq!(ha, hb);
    }

    #[test]
    fn prop_dry_run_never_mutates(
        changes in proptest::collection::vec(generators::changes_json(), 1..4),
    ) {
        let registry = LogRegistry::new();
        let fixture = TestFixture::with_seed(1);
        let refs: Vec<&str> = changes.iter().map(String::as_str).collect();
        let (batch, _) = fixture.signed_batch("doc1", "s1", &refs);

        let handle = registry.create("doc1", "s1", fixture.signer_id()).unwrap();
        let before = registry.running_hash(handle).unwrap();
        registry.expected_hash_after(handle, &batch).unwrap();

        prop_assert_eq!(registry.running_hash(handle).unwrap(), before);
        prop_assert_eq!(registry.len(handle).unwrap(), 0);
    }
}
