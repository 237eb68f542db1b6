//! Domain-separated structured message hashing.
//!
//! A message digest is `keccak256(0x19 0x01 || domain_separator || struct_hash)`.
//! The domain separator binds the registry name, version, chain id and the
//! verifying registry's address, so a signature produced for one deployment
//! is never valid for another. Struct hashes are
//! `keccak256(type_hash || field words)`, where every field occupies one
//! 32-byte word.

use crate::hash_functions::keccak256;

/// Type string of the domain separator.
pub const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Signing domain of one registry deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedDataDomain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: [u8; 32],
}

impl TypedDataDomain {
    pub fn new(
        name: impl Into<String>,
        version: impl Into<String>,
        chain_id: u64,
        verifying_contract: [u8; 32],
    ) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            chain_id,
            verifying_contract,
        }
    }

    pub fn separator(&self) -> [u8; 32] {
        let mut encoder = StructEncoder::new(DOMAIN_TYPE);
        encoder
            .string(&self.name)
            .string(&self.version)
            .uint(self.chain_id as u128)
            .bytes32(&self.verifying_contract);
        encoder.finish()
    }
}

/// A message that can be hashed under a [`TypedDataDomain`].
pub trait TypedStruct {
    /// Canonical type string, e.g. `Mail(address to,string contents)`.
    const TYPE: &'static str;

    /// Append every field, in type-string order.
    fn encode_fields(&self, encoder: &mut StructEncoder);

    fn struct_hash(&self) -> [u8; 32] {
        let mut encoder = StructEncoder::new(Self::TYPE);
        self.encode_fields(&mut encoder);
        encoder.finish()
    }
}

/// Accumulates 32-byte field words behind a type hash.
#[derive(Debug)]
pub struct StructEncoder {
    buf: Vec<u8>,
}

impl StructEncoder {
    pub fn new(type_string: &str) -> Self {
        let mut buf = Vec::with_capacity(32 * 8);
        buf.extend_from_slice(&keccak256(type_string.as_bytes()));
        Self { buf }
    }

    /// `bytes32` and `address` fields are written verbatim.
    pub fn bytes32(&mut self, value: &[u8; 32]) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    /// Unsigned integers are big-endian, left-padded to 32 bytes.
    pub fn uint(&mut self, value: u128) -> &mut Self {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&value.to_be_bytes());
        self.buf.extend_from_slice(&word);
        self
    }

    /// Dynamic strings are replaced by their hash.
    pub fn string(&mut self, value: &str) -> &mut Self {
        self.buf.extend_from_slice(&keccak256(value.as_bytes()));
        self
    }

    pub fn finish(&self) -> [u8; 32] {
        keccak256(&self.buf)
    }
}

/// Digest a registrar or referrer signs for `message` under `domain`.
pub fn typed_data_digest<T: TypedStruct>(domain: &TypedDataDomain, message: &T) -> [u8; 32] {
    let mut buf = [0u8; 66];
    buf[0] = 0x19;
    buf[1] = 0x01;
    buf[2..34].copy_from_slice(&domain.separator());
    buf[34..].copy_from_slice(&message.struct_hash());
    keccak256(&buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ping {
        target: [u8; 32],
        count: u64,
    }

    impl TypedStruct for Ping {
        const TYPE: &'static str = "Ping(address target,uint256 count)";

        fn encode_fields(&self, encoder: &mut StructEncoder) {
            encoder.bytes32(&self.target).uint(self.count as u128);
        }
    }

    fn domain() -> TypedDataDomain {
        TypedDataDomain::new("MultipassDNS", "0.0.1", 1, [9u8; 32])
    }

    #[test]
    fn every_domain_field_changes_the_digest() {
        let msg = Ping { target: [1u8; 32], count: 3 };
        let base = typed_data_digest(&domain(), &msg);

        let mut other = domain();
        other.name = "Other".into();
        assert_ne!(typed_data_digest(&other, &msg), base);

        let mut other = domain();
        other.version = "0.0.2".into();
        assert_ne!(typed_data_digest(&other, &msg), base);

        let mut other = domain();
        other.chain_id = 5;
        assert_ne!(typed_data_digest(&other, &msg), base);

        let mut other = domain();
        other.verifying_contract = [8u8; 32];
        assert_ne!(typed_data_digest(&other, &msg), base);
    }

    #[test]
    fn message_fields_change_the_digest() {
        let a = typed_data_digest(&domain(), &Ping { target: [1u8; 32], count: 3 });
        let b = typed_data_digest(&domain(), &Ping { target: [1u8; 32], count: 4 });
        assert_ne!(a, b);
        assert_eq!(a, typed_data_digest(&domain(), &Ping { target: [1u8; 32], count: 3 }));
    }

    #[test]
    fn uint_words_are_big_endian() {
        let mut encoder = StructEncoder::new("T(uint256 v)");
        encoder.uint(1);
        assert_eq!(encoder.buf.len(), 64);
        assert_eq!(encoder.buf[63], 1);
        assert!(encoder.buf[32..63].iter().all(|b| *b == 0));
    }
}
