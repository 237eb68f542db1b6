use crate::{Address, Ident32, IdentError};
use serde::{Deserialize, Serialize};

/// A registered identity inside one domain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub name: Ident32,
    pub id: Ident32,
    pub wallet: Address,
    pub domain_name: Ident32,
    /// Unix timestamp (seconds) until which the registrar authorised this record.
    pub valid_until: u64,
    pub nonce: u64,
}

impl Record {
    pub fn new(
        name: &str,
        id: &str,
        wallet: Address,
        domain_name: &str,
        valid_until: u64,
        nonce: u64,
    ) -> Result<Self, IdentError> {
        Ok(Self {
            name: Ident32::new(name)?,
            id: Ident32::new(id)?,
            wallet,
            domain_name: Ident32::new(domain_name)?,
            valid_until,
            nonce,
        })
    }

    /// Whether the record's authorisation window has passed. Advisory only.
    pub fn is_expired(&self, now: u64) -> bool {
        self.valid_until < now
    }

    /// True when `other` describes the same identity (ignoring nonce and validity).
    pub fn same_identity(&self, other: &Record) -> bool {
        self.name == other.name
            && self.id == other.id
            && self.wallet == other.wallet
            && self.domain_name == other.domain_name
    }
}

/// Partial lookup key. Empty identifiers and the zero address mean "not given".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameQuery {
    #[serde(default)]
    pub name: Ident32,
    #[serde(default)]
    pub id: Ident32,
    #[serde(default)]
    pub wallet: Address,
    pub domain_name: Ident32,
    /// When non-empty, the resolved wallet is looked up again in this domain.
    #[serde(default)]
    pub target_domain: Ident32,
}

impl NameQuery {
    /// A query with no lookup key at all.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn by_name(domain_name: &str, name: &str) -> Result<Self, IdentError> {
        Ok(Self {
            name: Ident32::new(name)?,
            domain_name: Ident32::new(domain_name)?,
            ..Self::default()
        })
    }

    pub fn by_id(domain_name: &str, id: &str) -> Result<Self, IdentError> {
        Ok(Self {
            id: Ident32::new(id)?,
            domain_name: Ident32::new(domain_name)?,
            ..Self::default()
        })
    }

    pub fn by_wallet(domain_name: &str, wallet: Address) -> Result<Self, IdentError> {
        Ok(Self {
            wallet,
            domain_name: Ident32::new(domain_name)?,
            ..Self::default()
        })
    }

    /// Query matching every key of an existing record.
    pub fn for_record(record: &Record) -> Self {
        Self {
            name: record.name,
            id: record.id,
            wallet: record.wallet,
            domain_name: record.domain_name,
            target_domain: Ident32::EMPTY,
        }
    }

    /// Resolve the match in `target_domain` instead of `domain_name`.
    pub fn with_target(mut self, target_domain: &str) -> Result<Self, IdentError> {
        self.target_domain = Ident32::new(target_domain)?;
        Ok(self)
    }

    /// True when none of name, id or wallet is set.
    pub fn has_no_key(&self) -> bool {
        self.name.is_empty() && self.id.is_empty() && self.wallet.is_zero()
    }

    pub fn is_cross_domain(&self) -> bool {
        !self.target_domain.is_empty()
    }
}
