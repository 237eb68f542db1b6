//! Read-only record lookups, optionally translated into another domain.

use crate::domains::DomainRegistry;
use crate::errors::{MultipassError, Result};
use crate::ledger::{IdentityLedger, LookupKey};
use multipass_types::{Ident32, NameQuery, Record};

#[derive(Debug, Clone, Copy)]
pub struct QueryResolver<'a> {
    domains: &'a DomainRegistry,
    ledger: &'a IdentityLedger,
}

impl<'a> QueryResolver<'a> {
    pub fn new(domains: &'a DomainRegistry, ledger: &'a IdentityLedger) -> Self {
        Self { domains, ledger }
    }

    /// Resolve `query` to a live record.
    ///
    /// Only the highest-precedence key is consulted (id, then wallet, then
    /// name). An unknown domain resolves to `None`. With a target domain set,
    /// the wallet of the first match is looked up again in the target domain.
    /// Record expiry is not consulted.
    pub fn resolve(&self, query: &NameQuery) -> Result<Option<&'a Record>> {
        if query.domain_name.is_empty() {
            return Err(MultipassError::InvalidQuery {
                reason: "domain name is empty",
            });
        }
        let key = LookupKey::for_query(query).ok_or(MultipassError::InvalidQuery {
            reason: "no name, id or wallet given",
        })?;

        let Some(found) = self.lookup(&query.domain_name, &key) else {
            return Ok(None);
        };
        if !query.is_cross_domain() {
            return Ok(Some(found));
        }
        Ok(self.lookup(&query.target_domain, &LookupKey::Wallet(found.wallet)))
    }

    fn lookup(&self, domain_name: &Ident32, key: &LookupKey) -> Option<&'a Record> {
        self.domains.get(domain_name)?;
        self.ledger.find(domain_name, key)
    }
}
