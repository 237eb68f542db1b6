//! Fixed-width identifiers for names, ids and domain names.
//!
//! An [`Ident32`] stores the UTF-8 bytes of a string right-padded with zeros
//! to 32 bytes. At most [`IDENT_MAX_LEN`] content bytes are accepted so the
//! last byte is always zero, and interior NUL characters are rejected. Input
//! is never truncated, so distinct strings always have distinct encodings.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Width of the encoded identifier.
pub const IDENT_BYTES: usize = 32;
/// Largest number of content bytes an identifier may carry.
pub const IDENT_MAX_LEN: usize = IDENT_BYTES - 1;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IdentError {
    #[error("identifier is {len} bytes, at most {max} are allowed")]
    TooLong { len: usize, max: usize },

    #[error("identifier contains a NUL character")]
    ContainsNul,

    #[error("identifier bytes are not in canonical zero-padded form")]
    NonCanonical,
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ident32([u8; IDENT_BYTES]);

impl Ident32 {
    pub const EMPTY: Ident32 = Ident32([0u8; IDENT_BYTES]);

    /// Encode a string, rejecting anything that cannot round-trip.
    pub fn new(value: &str) -> Result<Self, IdentError> {
        let raw = value.as_bytes();
        if raw.len() > IDENT_MAX_LEN {
            return Err(IdentError::TooLong {
                len: raw.len(),
                max: IDENT_MAX_LEN,
            });
        }
        if raw.contains(&0) {
            return Err(IdentError::ContainsNul);
        }

        let mut bytes = [0u8; IDENT_BYTES];
        bytes[..raw.len()].copy_from_slice(raw);
        Ok(Self(bytes))
    }

    /// Decode raw bytes, accepting only the canonical encoding produced by [`Ident32::new`].
    pub fn from_bytes(bytes: [u8; IDENT_BYTES]) -> Result<Self, IdentError> {
        let len = bytes.iter().position(|b| *b == 0).unwrap_or(IDENT_BYTES);
        if len > IDENT_MAX_LEN || bytes[len..].iter().any(|b| *b != 0) {
            return Err(IdentError::NonCanonical);
        }
        if std::str::from_utf8(&bytes[..len]).is_err() {
            return Err(IdentError::NonCanonical);
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; IDENT_BYTES] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0[0] == 0
    }

    /// Content length in bytes, excluding padding.
    pub fn len(&self) -> usize {
        self.0.iter().position(|b| *b == 0).unwrap_or(IDENT_BYTES)
    }

    pub fn as_str(&self) -> &str {
        // Both constructors guarantee valid UTF-8 content.
        std::str::from_utf8(&self.0[..self.len()]).unwrap_or_default()
    }
}

impl TryFrom<&str> for Ident32 {
    type Error = IdentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ident32::new(value)
    }
}

impl TryFrom<String> for Ident32 {
    type Error = IdentError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Ident32::new(&value)
    }
}

impl From<Ident32> for String {
    fn from(value: Ident32) -> Self {
        value.as_str().to_string()
    }
}

impl fmt::Display for Ident32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Ident32 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ident32({:?})", self.as_str())
    }
}
