//! Registry events and state reconstruction by replay.
//!
//! Every successful mutation appends one or more [`RegistryEvent`]s to the
//! service's [`EventLog`]. Events carry enough data for [`LedgerProjection`]
//! to rebuild ownership, domain and record state from scratch.

use crate::domains::DomainRegistry;
use crate::errors::{MultipassError, Result};
use crate::ledger::{IdentityLedger, LookupKey};
use multipass_types::{Address, Amount, Domain, Ident32, Record};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistryEvent {
    DomainInitialized {
        domain: Domain,
    },
    DomainActivated {
        domain_name: Ident32,
    },
    DomainDeactivated {
        domain_name: Ident32,
    },
    DomainFeeChanged {
        domain_name: Ident32,
        fee: Amount,
    },
    RenewalFeeChanged {
        domain_name: Ident32,
        renewal_fee: Amount,
    },
    RegistrarChanged {
        domain_name: Ident32,
        registrar: Address,
    },
    ReferralProgramChanged {
        domain_name: Ident32,
        referrer_reward: Amount,
        referral_discount: Amount,
    },
    Registered {
        record: Record,
        paid: Amount,
    },
    Renewed {
        record: Record,
        paid: Amount,
    },
    Referred {
        domain_name: Ident32,
        referrer: Record,
        applicant: Address,
        reward: Amount,
    },
    NameDeleted {
        record: Record,
    },
    OwnershipTransferred {
        previous_owner: Address,
        new_owner: Address,
    },
}

impl RegistryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            RegistryEvent::DomainInitialized { .. } => "DomainInitialized",
            RegistryEvent::DomainActivated { .. } => "DomainActivated",
            RegistryEvent::DomainDeactivated { .. } => "DomainDeactivated",
            RegistryEvent::DomainFeeChanged { .. } => "DomainFeeChanged",
            RegistryEvent::RenewalFeeChanged { .. } => "RenewalFeeChanged",
            RegistryEvent::RegistrarChanged { .. } => "RegistrarChanged",
            RegistryEvent::ReferralProgramChanged { .. } => "ReferralProgramChanged",
            RegistryEvent::Registered { .. } => "Registered",
            RegistryEvent::Renewed { .. } => "Renewed",
            RegistryEvent::Referred { .. } => "Referred",
            RegistryEvent::NameDeleted { .. } => "NameDeleted",
            RegistryEvent::OwnershipTransferred { .. } => "OwnershipTransferred",
        }
    }
}

/// Append-only event buffer.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<RegistryEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: RegistryEvent) {
        self.events.push(event);
    }

    pub fn as_slice(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Take every buffered event, leaving the log empty.
    pub fn drain(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Export as a JSON array.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.events)
    }
}

/// State rebuilt from an event stream.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerProjection {
    pub owner: Address,
    pub domains: DomainRegistry,
    pub ledger: IdentityLedger,
}

impl LedgerProjection {
    pub fn replay<'e>(events: impl IntoIterator<Item = &'e RegistryEvent>) -> Result<Self> {
        let mut projection = Self::default();
        for event in events {
            projection.apply(event)?;
        }
        Ok(projection)
    }

    pub fn apply(&mut self, event: &RegistryEvent) -> Result<()> {
        match event {
            RegistryEvent::DomainInitialized { domain } => {
                self.domains.initialize_domain(
                    domain.registrar,
                    domain.fee,
                    domain.renewal_fee,
                    domain.name,
                    domain.referrer_reward,
                    domain.referral_discount,
                )?;
            }
            RegistryEvent::DomainActivated { domain_name } => {
                self.domains.set_active(domain_name, true)?
            }
            RegistryEvent::DomainDeactivated { domain_name } => {
                self.domains.set_active(domain_name, false)?
            }
            RegistryEvent::DomainFeeChanged { domain_name, fee } => {
                self.domains.change_fee(domain_name, *fee)?
            }
            RegistryEvent::RenewalFeeChanged {
                domain_name,
                renewal_fee,
            } => self.domains.change_renewal_fee(domain_name, *renewal_fee)?,
            RegistryEvent::RegistrarChanged {
                domain_name,
                registrar,
            } => self.domains.change_registrar(domain_name, *registrar)?,
            RegistryEvent::ReferralProgramChanged {
                domain_name,
                referrer_reward,
                referral_discount,
            } => self.domains.change_referral_program(
                *referrer_reward,
                *referral_discount,
                domain_name,
            )?,
            RegistryEvent::Registered { record, .. } => {
                self.ledger.insert(record.clone())?;
                self.domains.count_registration(&record.domain_name)?;
            }
            RegistryEvent::Renewed { record, .. } => self.ledger.renew(record)?,
            RegistryEvent::Referred { .. } => {}
            RegistryEvent::NameDeleted { record } => {
                self.ledger
                    .remove(&record.domain_name, &LookupKey::Name(record.name))
                    .ok_or(MultipassError::RecordNotFound {
                        domain: record.domain_name,
                    })?;
            }
            RegistryEvent::OwnershipTransferred { new_owner, .. } => self.owner = *new_owner,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ident(s: &str) -> Ident32 {
        Ident32::new(s).unwrap()
    }

    #[test]
    fn events_survive_json() {
        let mut log = EventLog::new();
        log.push(RegistryEvent::DomainFeeChanged {
            domain_name: ident("alpha"),
            fee: 2_000_000_000_000_000_000,
        });
        log.push(RegistryEvent::OwnershipTransferred {
            previous_owner: Address::ZERO,
            new_owner: Address([1u8; 32]),
        });

        let json = log.to_json().unwrap();
        let decoded: Vec<RegistryEvent> = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, log.as_slice());
    }

    #[test]
    fn drain_empties_the_log() {
        let mut log = EventLog::new();
        log.push(RegistryEvent::DomainActivated {
            domain_name: ident("alpha"),
        });
        assert_eq!(log.drain().len(), 1);
        assert!(log.is_empty());
    }

    #[test]
    fn replay_rebuilds_records() {
        let domain = Domain::new(ident("alpha"), Address([9u8; 32]), 10, 5, 0, 0);
        let record =
            Record::new("bob.alpha", "bob-id.alpha", Address([1u8; 32]), "alpha", 100, 0).unwrap();
        let mut renewed = record.clone();
        renewed.nonce = 1;
        renewed.valid_until = 200;

        let events = vec![
            RegistryEvent::DomainInitialized { domain },
            RegistryEvent::DomainActivated {
                domain_name: ident("alpha"),
            },
            RegistryEvent::Registered {
                record: record.clone(),
                paid: 10,
            },
            RegistryEvent::Renewed {
                record: renewed.clone(),
                paid: 5,
            },
        ];
        let projection = LedgerProjection::replay(&events).unwrap();

        let alpha = projection.domains.require(&ident("alpha")).unwrap();
        assert!(alpha.is_active);
        assert_eq!(alpha.register_size, 1);
        assert_eq!(
            projection
                .ledger
                .find(&ident("alpha"), &LookupKey::Name(ident("bob.alpha"))),
            Some(&renewed)
        );
    }

    #[test]
    fn replay_of_inconsistent_stream_fails() {
        let record =
            Record::new("bob.alpha", "bob-id.alpha", Address([1u8; 32]), "alpha", 100, 0).unwrap();
        let events = [RegistryEvent::NameDeleted { record }];
        assert!(matches!(
            LedgerProjection::replay(&events),
            Err(MultipassError::RecordNotFound { .. })
        ));
    }
}
