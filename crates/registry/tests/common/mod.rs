#![allow(dead_code)]

use multipass_crypto::{KeyPair, TypedDataDomain};
use multipass_registry::{
    sign_referral, sign_registration, Address, Amount, AuthorizationVerifier, ManualClock,
    Multipass, NameQuery, Record, Result,
};
use multipass_treasury::{FeeTreasury, InMemoryAccountLedger};
use std::sync::Arc;

pub const ETHER: Amount = 1_000_000_000_000_000_000;
pub const OWNER: Address = Address([0xAA; 32]);
pub const NOW: u64 = 1_700_000_000;

pub fn typed_domain() -> TypedDataDomain {
    TypedDataDomain::new("MultipassDNS", "0.0.1", 1, [0x42; 32])
}

pub fn keys(seed: u8) -> KeyPair {
    KeyPair::from_seed(&[seed; 32])
}

pub fn address_of(keypair: &KeyPair) -> Address {
    Address(keypair.public_key())
}

pub struct Harness {
    pub multipass: Multipass,
    pub registrar: KeyPair,
    pub clock: ManualClock,
}

impl Harness {
    pub fn new() -> Self {
        let registrar = KeyPair::from_seed(&[0x5E; 32]);
        let clock = ManualClock::new(NOW);
        let treasury = FeeTreasury::new(Box::new(InMemoryAccountLedger::new()));
        let verifier = AuthorizationVerifier::ed25519(typed_domain());
        let multipass = Multipass::new(OWNER, verifier, treasury, Arc::new(clock.clone()))
            .expect("owner is non-zero");
        Self {
            multipass,
            registrar,
            clock,
        }
    }

    /// Active domain with fee 2, renewal fee 1, reward 0.5 and discount 1 ether.
    pub fn add_domain(&mut self, name: &str) {
        let registrar = address_of(&self.registrar);
        self.multipass
            .initialize_domain(&OWNER, registrar, 2 * ETHER, ETHER, name, ETHER / 2, ETHER)
            .unwrap();
        self.multipass.activate_domain(&OWNER, name).unwrap();
    }

    pub fn with_domains(names: &[&str]) -> Self {
        let mut harness = Self::new();
        for name in names {
            harness.add_domain(name);
        }
        harness
    }

    pub fn record(&self, name: &str, id: &str, wallet: Address, domain: &str) -> Record {
        Record::new(name, id, wallet, domain, NOW + 3_600, 0).unwrap()
    }

    pub fn sign(&self, record: &Record) -> Vec<u8> {
        sign_registration(&self.registrar, &typed_domain(), record)
    }

    pub fn register(&mut self, record: Record, payment: Amount) -> Result<()> {
        let signature = self.sign(&record);
        self.multipass
            .register(record, &signature, &NameQuery::empty(), &[], payment)
    }

    pub fn register_referred(
        &mut self,
        record: Record,
        referral_query: &NameQuery,
        referrer: &KeyPair,
        payment: Amount,
    ) -> Result<()> {
        let signature = self.sign(&record);
        let proof = sign_referral(referrer, &typed_domain());
        self.multipass
            .register(record, &signature, referral_query, &proof, payment)
    }

    pub fn balance(&self, account: &Address) -> Amount {
        self.multipass.treasury().balance_of(account)
    }
}
