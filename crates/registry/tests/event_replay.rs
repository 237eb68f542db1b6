mod common;

use common::*;
use multipass_registry::{LedgerProjection, NameQuery, RegistryEvent};

fn busy_harness() -> Harness {
    let mut harness = Harness::with_domains(&["alpha", "beta"]);
    let ann_keys = keys(1);
    let ann = address_of(&ann_keys);
    let bob = address_of(&keys(2));

    let ann_alpha = harness.record("ann.alpha", "ann-id.alpha", ann, "alpha");
    harness.register(ann_alpha, 2 * ETHER).unwrap();
    let bob_alpha = harness.record("bob.alpha", "bob-id.alpha", bob, "alpha");
    let referral = NameQuery::by_name("alpha", "ann.alpha").unwrap();
    harness
        .register_referred(bob_alpha.clone(), &referral, &ann_keys, ETHER)
        .unwrap();
    let bob_beta = harness.record("bob.beta", "bob-id.beta", bob, "beta");
    harness.register(bob_beta, 2 * ETHER).unwrap();

    let mut renewed = bob_alpha;
    renewed.nonce = 1;
    renewed.valid_until += 1_000;
    let signature = harness.sign(&renewed);
    harness
        .multipass
        .renew_record(
            &NameQuery::by_wallet("alpha", bob).unwrap(),
            renewed,
            &signature,
            ETHER,
        )
        .unwrap();

    harness
        .multipass
        .delete_name(&OWNER, &NameQuery::by_name("beta", "bob.beta").unwrap())
        .unwrap();
    harness.multipass.change_fee(&OWNER, "beta", 3 * ETHER).unwrap();
    harness
        .multipass
        .change_referral_program(&OWNER, ETHER, ETHER, "beta")
        .unwrap();
    harness
        .multipass
        .change_renewal_fee(&OWNER, 2 * ETHER, "alpha")
        .unwrap();
    harness.multipass.deactivate_domain(&OWNER, "beta").unwrap();
    harness
        .multipass
        .transfer_ownership(&OWNER, multipass_registry::Address([0xCC; 32]))
        .unwrap();
    harness
}

#[test]
fn replay_reproduces_live_state() {
    let harness = busy_harness();
    let projection = LedgerProjection::replay(harness.multipass.events()).unwrap();
    assert_eq!(projection, harness.multipass.snapshot());
}

#[test]
fn replay_survives_json_export() {
    let harness = busy_harness();
    let json = serde_json::to_string(harness.multipass.events()).unwrap();
    let events: Vec<RegistryEvent> = serde_json::from_str(&json).unwrap();
    let projection = LedgerProjection::replay(&events).unwrap();
    assert_eq!(projection, harness.multipass.snapshot());
}

#[test]
fn every_event_kind_is_emitted() {
    let mut harness = busy_harness();
    harness
        .multipass
        .change_registrar(&multipass_registry::Address([0xCC; 32]), "alpha", address_of(&keys(9)))
        .unwrap();
    harness
        .multipass
        .activate_domain(&multipass_registry::Address([0xCC; 32]), "beta")
        .unwrap();

    let mut kinds: Vec<&str> = harness.multipass.events().iter().map(|e| e.kind()).collect();
    kinds.sort_unstable();
    kinds.dedup();
    assert_eq!(kinds.len(), 12);
}

#[test]
fn drained_events_leave_an_empty_log() {
    let mut harness = busy_harness();
    let drained = harness.multipass.drain_events();
    assert!(!drained.is_empty());
    assert!(harness.multipass.events().is_empty());
    assert_eq!(
        LedgerProjection::replay(&drained).unwrap(),
        harness.multipass.snapshot()
    );
}

#[test]
fn failed_operations_emit_nothing() {
    let mut harness = busy_harness();
    let before = harness.multipass.events().len();
    assert!(harness.multipass.change_fee(&OWNER, "alpha", 0).is_err());
    let duplicate = harness.record("ann.alpha", "x", address_of(&keys(7)), "alpha");
    assert!(harness.register(duplicate, 2 * ETHER).is_err());
    assert_eq!(harness.multipass.events().len(), before);
}
