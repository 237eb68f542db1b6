//! Registrar and referrer authorisation checks.
//!
//! Registrars sign a `RegisterName` message per record off-ledger; referrers
//! sign a `proofOfReferrer` naming their own wallet. Both are hashed under the
//! registry's [`TypedDataDomain`] and checked by a pluggable
//! [`SignatureScheme`]. Verification never touches registry state.

use crate::errors::{MultipassError, Result};
use multipass_crypto::{
    typed_data_digest, Ed25519Scheme, KeyPair, SignatureScheme, StructEncoder, TypedDataDomain,
    TypedStruct,
};
use multipass_types::{Address, Record};
use std::sync::Arc;

/// Payload a registrar signs to authorise a registration or renewal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrarMessage<'a> {
    pub record: &'a Record,
}

impl TypedStruct for RegistrarMessage<'_> {
    const TYPE: &'static str = "RegisterName(bytes32 name,bytes32 id,bytes32 domainName,address wallet,uint256 validUntil,uint256 nonce)";

    fn encode_fields(&self, encoder: &mut StructEncoder) {
        encoder
            .bytes32(self.record.name.as_bytes())
            .bytes32(self.record.id.as_bytes())
            .bytes32(self.record.domain_name.as_bytes())
            .bytes32(self.record.wallet.as_bytes())
            .uint(self.record.valid_until as u128)
            .uint(self.record.nonce as u128);
    }
}

/// Payload a referrer signs to prove control of the referring wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferrerMessage {
    pub referrer_address: Address,
}

impl TypedStruct for ReferrerMessage {
    const TYPE: &'static str = "proofOfReferrer(address referrerAddress)";

    fn encode_fields(&self, encoder: &mut StructEncoder) {
        encoder.bytes32(self.referrer_address.as_bytes());
    }
}

#[derive(Debug, Clone)]
pub struct AuthorizationVerifier {
    domain: TypedDataDomain,
    scheme: Arc<dyn SignatureScheme>,
}

impl AuthorizationVerifier {
    pub fn new(domain: TypedDataDomain, scheme: Arc<dyn SignatureScheme>) -> Self {
        Self { domain, scheme }
    }

    pub fn ed25519(domain: TypedDataDomain) -> Self {
        Self::new(domain, Arc::new(Ed25519Scheme))
    }

    pub fn domain(&self) -> &TypedDataDomain {
        &self.domain
    }

    /// Check that `signature` over `message` comes from `expected`, returning the signer.
    pub fn verify<T: TypedStruct>(
        &self,
        message: &T,
        signature: &[u8],
        expected: &Address,
    ) -> Result<Address> {
        let digest = typed_data_digest(&self.domain, message);
        if expected.is_zero() || !self.scheme.verify(expected.as_bytes(), &digest, signature) {
            return Err(MultipassError::InvalidSignature {
                expected: *expected,
            });
        }
        Ok(*expected)
    }

    pub fn verify_registration(
        &self,
        record: &Record,
        signature: &[u8],
        registrar: &Address,
    ) -> Result<Address> {
        self.verify(&RegistrarMessage { record }, signature, registrar)
    }

    pub fn verify_referral(&self, referrer: &Address, signature: &[u8]) -> Result<Address> {
        let message = ReferrerMessage {
            referrer_address: *referrer,
        };
        self.verify(&message, signature, referrer)
    }
}

/// Fail with `SignatureExpired` when `valid_until` lies before `now`.
pub fn ensure_fresh(valid_until: u64, now: u64) -> Result<()> {
    if valid_until < now {
        return Err(MultipassError::SignatureExpired { valid_until, now });
    }
    Ok(())
}

/// Registrar-side helper: sign `record` for submission to this registry domain.
pub fn sign_registration(keypair: &KeyPair, domain: &TypedDataDomain, record: &Record) -> Vec<u8> {
    keypair.sign_typed(domain, &RegistrarMessage { record }).to_vec()
}

/// Referrer-side helper: prove control of the keypair's wallet.
pub fn sign_referral(keypair: &KeyPair, domain: &TypedDataDomain) -> Vec<u8> {
    let message = ReferrerMessage {
        referrer_address: Address(keypair.public_key()),
    };
    keypair.sign_typed(domain, &message).to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use multipass_crypto::keccak256;

    fn domain() -> TypedDataDomain {
        TypedDataDomain::new("MultipassDNS", "0.0.1", 1, [0xAA; 32])
    }

    fn record(wallet: Address) -> Record {
        Record::new("bob.alpha", "bob-id.alpha", wallet, "alpha", 5_000, 0).unwrap()
    }

    #[test]
    fn accepts_registrar_signature() {
        let registrar = KeyPair::from_seed(&[1u8; 32]);
        let record = record(Address([9u8; 32]));
        let signature = sign_registration(&registrar, &domain(), &record);

        let verifier = AuthorizationVerifier::ed25519(domain());
        let signer = verifier
            .verify_registration(&record, &signature, &Address(registrar.public_key()))
            .unwrap();
        assert_eq!(signer, Address(registrar.public_key()));
    }

    #[test]
    fn rejects_signature_by_someone_else() {
        let registrar = KeyPair::from_seed(&[1u8; 32]);
        let intruder = KeyPair::from_seed(&[2u8; 32]);
        let record = record(Address([9u8; 32]));
        let signature = sign_registration(&intruder, &domain(), &record);

        let verifier = AuthorizationVerifier::ed25519(domain());
        let err = verifier
            .verify_registration(&record, &signature, &Address(registrar.public_key()))
            .unwrap_err();
        assert!(matches!(err, MultipassError::InvalidSignature { .. }));
    }

    #[test]
    fn rejects_tampered_record() {
        let registrar = KeyPair::from_seed(&[1u8; 32]);
        let mut record = record(Address([9u8; 32]));
        let signature = sign_registration(&registrar, &domain(), &record);
        record.valid_until += 1;

        let verifier = AuthorizationVerifier::ed25519(domain());
        assert!(verifier
            .verify_registration(&record, &signature, &Address(registrar.public_key()))
            .is_err());
    }

    #[test]
    fn rejects_replay_on_other_deployment() {
        let registrar = KeyPair::from_seed(&[1u8; 32]);
        let record = record(Address([9u8; 32]));
        let signature = sign_registration(&registrar, &domain(), &record);

        let mut elsewhere = domain();
        elsewhere.verifying_contract = [0xBB; 32];
        let verifier = AuthorizationVerifier::ed25519(elsewhere);
        assert!(verifier
            .verify_registration(&record, &signature, &Address(registrar.public_key()))
            .is_err());
    }

    #[test]
    fn referral_proof_binds_referrer_wallet() {
        let referrer = KeyPair::from_seed(&[3u8; 32]);
        let signature = sign_referral(&referrer, &domain());
        let verifier = AuthorizationVerifier::ed25519(domain());

        assert!(verifier
            .verify_referral(&Address(referrer.public_key()), &signature)
            .is_ok());
        assert!(verifier
            .verify_referral(&Address([4u8; 32]), &signature)
            .is_err());
    }

    #[test]
    fn referral_proof_uses_lower_camel_type_name() {
        let wallet = Address([5u8; 32]);
        let mut preimage = keccak256(b"proofOfReferrer(address referrerAddress)").to_vec();
        preimage.extend_from_slice(wallet.as_bytes());
        let message = ReferrerMessage {
            referrer_address: wallet,
        };
        assert_eq!(message.struct_hash(), keccak256(&preimage));

        let mut capitalised = StructEncoder::new("ProofOfReferrer(address referrerAddress)");
        capitalised.bytes32(wallet.as_bytes());
        assert_ne!(message.struct_hash(), capitalised.finish());
    }

    #[test]
    fn zero_authorizer_never_verifies() {
        let verifier = AuthorizationVerifier::ed25519(domain());
        let record = record(Address([9u8; 32]));
        assert!(verifier
            .verify_registration(&record, &[0u8; 64], &Address::ZERO)
            .is_err());
    }

    #[test]
    fn freshness_is_inclusive_of_deadline() {
        assert!(ensure_fresh(100, 100).is_ok());
        assert_eq!(
            ensure_fresh(99, 100),
            Err(MultipassError::SignatureExpired {
                valid_until: 99,
                now: 100
            })
        );
    }
}
