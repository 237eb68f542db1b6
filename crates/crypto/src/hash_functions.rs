//! Hash functions used by the typed-data scheme.

/// Trait for hash functions
pub trait HashFunction {
    /// Hash input data and return a fixed-size array
    fn hash_fixed(&self, data: &[u8]) -> [u8; 32];

    /// Get the name of the hash function
    fn name(&self) -> &'static str;
}

/// Keccak256 hash implementation
#[derive(Debug, Default, Clone, Copy)]
pub struct Keccak256;

impl HashFunction for Keccak256 {
    fn hash_fixed(&self, data: &[u8]) -> [u8; 32] {
        use sha3::Digest;
        let mut hasher = sha3::Keccak256::new();
        hasher.update(data);
        hasher.finalize().into()
    }

    fn name(&self) -> &'static str {
        "Keccak256"
    }
}

/// Keccak-256 of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    Keccak256.hash_fixed(data)
}
