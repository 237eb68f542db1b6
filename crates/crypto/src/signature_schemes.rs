//! Signature schemes accepted for registrar and referrer authorisations.
//!
//! The registry only ever asks "did `signer` sign `digest`?", so any curve
//! with 32-byte public keys can be plugged in behind [`SignatureScheme`].

use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use std::fmt;

pub trait SignatureScheme: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Whether `signature` over `digest` was produced by the key `signer`.
    fn verify(&self, signer: &[u8; 32], digest: &[u8; 32], signature: &[u8]) -> bool;
}

/// Ed25519 over the raw 32-byte digest.
#[derive(Debug, Default, Clone, Copy)]
pub struct Ed25519Scheme;

impl SignatureScheme for Ed25519Scheme {
    fn name(&self) -> &'static str {
        "ed25519"
    }

    fn verify(&self, signer: &[u8; 32], digest: &[u8; 32], signature: &[u8]) -> bool {
        if signature.len() != 64 {
            return false;
        }

        let Ok(verifying_key) = VerifyingKey::from_bytes(signer) else {
            return false;
        };

        let Ok(signature) = Signature::from_slice(signature) else {
            return false;
        };

        verifying_key.verify(digest, &signature).is_ok()
    }
}
