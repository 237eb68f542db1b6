//! Hashing and signature primitives for Multipass authorisations.

use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use rand_core::{OsRng, RngCore};

pub mod hash_functions;
pub mod signature_schemes;
pub mod typed_data;

pub use hash_functions::{keccak256, HashFunction, Keccak256};
pub use signature_schemes::{Ed25519Scheme, SignatureScheme};
pub use typed_data::{typed_data_digest, StructEncoder, TypedDataDomain, TypedStruct};

/// Ed25519 key pair used by registrars and referrers to sign authorisations
#[derive(Debug, Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
    verifying_key: VerifyingKey,
}

impl KeyPair {
    /// Generate a new key pair
    pub fn generate() -> Self {
        let mut secret_key = [0u8; 32];
        OsRng.fill_bytes(&mut secret_key);
        Self::from_seed(&secret_key)
    }

    /// Deterministic key pair from a 32-byte secret
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();

        Self {
            signing_key,
            verifying_key,
        }
    }

    /// Get the public key as bytes
    pub fn public_key(&self) -> [u8; 32] {
        self.verifying_key.to_bytes()
    }

    /// Sign a digest
    pub fn sign(&self, digest: &[u8; 32]) -> [u8; 64] {
        self.signing_key.sign(digest).to_bytes()
    }

    /// Sign a typed message under `domain`
    pub fn sign_typed<T: TypedStruct>(&self, domain: &TypedDataDomain, message: &T) -> [u8; 64] {
        self.sign(&typed_data_digest(domain, message))
    }

    /// Verify a signature
    pub fn verify(&self, digest: &[u8; 32], signature: &[u8; 64]) -> Result<(), ed25519_dalek::SignatureError> {
        let sig = Signature::from_bytes(signature);
        self.verifying_key.verify(digest, &sig)
    }
}
