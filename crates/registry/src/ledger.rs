//! Per-domain record storage and uniqueness indices.
//!
//! Each domain keeps its records in slots, with three indices (name, id,
//! wallet) pointing into them. The indices of a live record always point at
//! the same slot and never map one key to two slots. Insertion, renewal and
//! removal maintain all three indices together.

use crate::errors::{MultipassError, RecordField, Result};
use multipass_types::{Address, Ident32, NameQuery, Record};
use std::collections::{BTreeMap, HashMap};

/// The single key a lookup consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupKey {
    Id(Ident32),
    Wallet(Address),
    Name(Ident32),
}

impl LookupKey {
    /// Pick the highest-precedence key of `query`: id, then wallet, then name.
    pub fn for_query(query: &NameQuery) -> Option<Self> {
        if !query.id.is_empty() {
            Some(LookupKey::Id(query.id))
        } else if !query.wallet.is_zero() {
            Some(LookupKey::Wallet(query.wallet))
        } else if !query.name.is_empty() {
            Some(LookupKey::Name(query.name))
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct DomainRecords {
    slots: BTreeMap<u64, Record>,
    by_name: HashMap<Ident32, u64>,
    by_id: HashMap<Ident32, u64>,
    by_wallet: HashMap<Address, u64>,
    next_slot: u64,
}

impl DomainRecords {
    fn slot_of(&self, key: &LookupKey) -> Option<u64> {
        match key {
            LookupKey::Id(id) => self.by_id.get(id),
            LookupKey::Wallet(wallet) => self.by_wallet.get(wallet),
            LookupKey::Name(name) => self.by_name.get(name),
        }
        .copied()
    }

    fn collision(&self, record: &Record) -> Option<(RecordField, String)> {
        if self.by_name.contains_key(&record.name) {
            return Some((RecordField::Name, record.name.to_string()));
        }
        if self.by_id.contains_key(&record.id) {
            return Some((RecordField::Id, record.id.to_string()));
        }
        if self.by_wallet.contains_key(&record.wallet) {
            return Some((RecordField::Wallet, record.wallet.to_string()));
        }
        None
    }
}

/// Record store of every domain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdentityLedger {
    domains: HashMap<Ident32, DomainRecords>,
}

impl IdentityLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail with `RecordExists` if any key of `record` is taken in its domain.
    pub fn ensure_unique(&self, record: &Record) -> Result<()> {
        let collision = self
            .domains
            .get(&record.domain_name)
            .and_then(|records| records.collision(record));
        match collision {
            Some((field, value)) => Err(MultipassError::RecordExists {
                domain: record.domain_name,
                field,
                value,
            }),
            None => Ok(()),
        }
    }

    /// Store a new record under all three indices and return its slot.
    pub fn insert(&mut self, record: Record) -> Result<u64> {
        self.ensure_unique(&record)?;

        let records = self.domains.entry(record.domain_name).or_default();
        let slot = records.next_slot;
        records.next_slot += 1;
        records.by_name.insert(record.name, slot);
        records.by_id.insert(record.id, slot);
        records.by_wallet.insert(record.wallet, slot);
        records.slots.insert(slot, record);
        Ok(slot)
    }

    /// Take back the most recent `insert` into `domain_name`.
    ///
    /// Restores the slot counter and drops the domain bucket if the insert
    /// created it, leaving the ledger equal to its state before the insert.
    pub fn undo_insert(&mut self, domain_name: &Ident32, slot: u64) -> Option<Record> {
        let records = self.domains.get_mut(domain_name)?;
        if records.next_slot != slot + 1 {
            return None;
        }
        let record = records.slots.remove(&slot)?;
        records.by_name.remove(&record.name);
        records.by_id.remove(&record.id);
        records.by_wallet.remove(&record.wallet);
        records.next_slot = slot;
        if records.next_slot == 0 {
            self.domains.remove(domain_name);
        }
        Some(record)
    }

    pub fn find(&self, domain_name: &Ident32, key: &LookupKey) -> Option<&Record> {
        let records = self.domains.get(domain_name)?;
        records
            .slot_of(key)
            .and_then(|slot| records.slots.get(&slot))
    }

    /// Replace the validity and nonce of the record with `renewed`'s name.
    pub fn renew(&mut self, renewed: &Record) -> Result<()> {
        let not_found = || MultipassError::RecordNotFound {
            domain: renewed.domain_name,
        };
        let records = self
            .domains
            .get_mut(&renewed.domain_name)
            .ok_or_else(not_found)?;
        let slot = records
            .slot_of(&LookupKey::Name(renewed.name))
            .ok_or_else(not_found)?;
        let stored = records.slots.get_mut(&slot).ok_or_else(not_found)?;
        if !stored.same_identity(renewed) {
            return Err(MultipassError::RecordMismatch);
        }
        stored.valid_until = renewed.valid_until;
        stored.nonce = renewed.nonce;
        Ok(())
    }

    /// Remove the record `key` resolves to, dropping all of its index entries.
    pub fn remove(&mut self, domain_name: &Ident32, key: &LookupKey) -> Option<Record> {
        let records = self.domains.get_mut(domain_name)?;
        let slot = records.slot_of(key)?;
        let record = records.slots.remove(&slot)?;
        records.by_name.remove(&record.name);
        records.by_id.remove(&record.id);
        records.by_wallet.remove(&record.wallet);
        Some(record)
    }

    /// Live records of one domain, in insertion order.
    pub fn records(&self, domain_name: &Ident32) -> impl Iterator<Item = &Record> {
        self.domains
            .get(domain_name)
            .into_iter()
            .flat_map(|records| records.slots.values())
    }

    pub fn live_count(&self, domain_name: &Ident32) -> usize {
        self.domains
            .get(domain_name)
            .map(|records| records.slots.len())
            .unwrap_or(0)
    }
}
