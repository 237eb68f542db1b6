//! Domain configuration lifecycle.
//!
//! Domains are created inactive, toggled by the owner and never removed.
//! Every change to the fee or the referral program re-checks
//! `referrer_reward + referral_discount <= fee`.

use crate::errors::{MultipassError, Result};
use multipass_types::{Address, Amount, Domain, Ident32};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainRegistry {
    /// Domains in initialisation order.
    domains: Vec<Domain>,
    by_name: HashMap<Ident32, usize>,
}

impl DomainRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize_domain(
        &mut self,
        registrar: Address,
        fee: Amount,
        renewal_fee: Amount,
        domain_name: Ident32,
        referrer_reward: Amount,
        referral_discount: Amount,
    ) -> Result<&Domain> {
        if registrar.is_zero() {
            return Err(MultipassError::InvalidRegistrar);
        }
        if domain_name.is_empty() {
            return Err(MultipassError::InvalidQuery {
                reason: "domain name is empty",
            });
        }
        check_referral_program(fee, referrer_reward, referral_discount)?;
        if self.by_name.contains_key(&domain_name) {
            return Err(MultipassError::NameExists {
                domain: domain_name,
            });
        }

        self.domains.push(Domain::new(
            domain_name,
            registrar,
            fee,
            renewal_fee,
            referrer_reward,
            referral_discount,
        ));
        let index = self.domains.len() - 1;
        self.by_name.insert(domain_name, index);
        Ok(&self.domains[index])
    }

    pub fn set_active(&mut self, domain_name: &Ident32, active: bool) -> Result<()> {
        self.require_mut(domain_name)?.is_active = active;
        Ok(())
    }

    pub fn change_fee(&mut self, domain_name: &Ident32, fee: Amount) -> Result<()> {
        let domain = self.require_mut(domain_name)?;
        check_referral_program(fee, domain.referrer_reward, domain.referral_discount)?;
        domain.fee = fee;
        Ok(())
    }

    pub fn change_renewal_fee(&mut self, domain_name: &Ident32, renewal_fee: Amount) -> Result<()> {
        self.require_mut(domain_name)?.renewal_fee = renewal_fee;
        Ok(())
    }

    pub fn change_registrar(&mut self, domain_name: &Ident32, registrar: Address) -> Result<()> {
        let domain = self.require_mut(domain_name)?;
        if registrar.is_zero() {
            return Err(MultipassError::InvalidRegistrar);
        }
        domain.registrar = registrar;
        Ok(())
    }

    pub fn change_referral_program(
        &mut self,
        referrer_reward: Amount,
        referral_discount: Amount,
        domain_name: &Ident32,
    ) -> Result<()> {
        let domain = self.require_mut(domain_name)?;
        check_referral_program(domain.fee, referrer_reward, referral_discount)?;
        domain.referrer_reward = referrer_reward;
        domain.referral_discount = referral_discount;
        Ok(())
    }

    /// Bump the registration counter, returning its previous value.
    pub fn count_registration(&mut self, domain_name: &Ident32) -> Result<u64> {
        let domain = self.require_mut(domain_name)?;
        let previous = domain.register_size;
        domain.register_size = previous
            .checked_add(1)
            .ok_or(MultipassError::MathOverflow {
                context: "register size",
            })?;
        Ok(previous)
    }

    /// Number of domains ever initialised.
    pub fn count(&self) -> usize {
        self.domains.len()
    }

    pub fn get(&self, domain_name: &Ident32) -> Option<&Domain> {
        self.by_name.get(domain_name).map(|i| &self.domains[*i])
    }

    pub fn require(&self, domain_name: &Ident32) -> Result<&Domain> {
        self.get(domain_name)
            .ok_or_else(|| MultipassError::unknown_domain(domain_name))
    }

    pub(crate) fn require_mut(&mut self, domain_name: &Ident32) -> Result<&mut Domain> {
        match self.by_name.get(domain_name) {
            Some(i) => Ok(&mut self.domains[*i]),
            None => Err(MultipassError::unknown_domain(domain_name)),
        }
    }

    /// Domain by 1-based initialisation order.
    pub fn get_by_index(&self, index: usize) -> Result<&Domain> {
        index
            .checked_sub(1)
            .and_then(|i| self.domains.get(i))
            .ok_or_else(|| MultipassError::InvalidDomain {
                domain: format!("#{}", index),
            })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Domain> {
        self.domains.iter()
    }
}

/// `reward + discount <= fee`, with the sum itself overflow-checked.
pub fn check_referral_program(fee: Amount, reward: Amount, discount: Amount) -> Result<()> {
    let total = reward
        .checked_add(discount)
        .ok_or(MultipassError::MathOverflow {
            context: "referral reward plus discount",
        })?;
    if total > fee {
        return Err(MultipassError::ReferralRewardsTooHigh {
            reward,
            discount,
            fee,
        });
    }
    Ok(())
}
